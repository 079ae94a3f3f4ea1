//! Reporting transaction events back to the commerce platform.
//!
//! The platform exposes a single GraphQL mutation for this purpose; the
//! rest of its schema is out of scope here, so the request is assembled by
//! hand rather than through a generated client.

use async_trait::async_trait;
use common_utils::CustomResult;
use domain_types::{errors::ConnectorError, types::SyncResult};
use error_stack::{report, ResultExt};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use url::Url;

/// Seam between the synchronization flow and the platform transport.
#[async_trait]
pub trait TransactionEventReporter: Send + Sync {
    /// Submit one transaction event report. Implementations must not retry;
    /// the processor redelivers failed webhooks.
    async fn report_event(&self, result: &SyncResult) -> CustomResult<(), ConnectorError>;
}

const TRANSACTION_EVENT_REPORT: &str = r#"
mutation TransactionEventReport(
    $id: ID!
    $type: TransactionEventTypeEnum!
    $amount: PositiveDecimal!
    $pspReference: String!
    $time: DateTime
) {
    transactionEventReport(
        id: $id
        type: $type
        amount: $amount
        pspReference: $pspReference
        time: $time
    ) {
        alreadyProcessed
        errors {
            field
            code
            message
        }
    }
}
"#;

/// GraphQL client for the platform's event-report mutation.
pub struct PlatformClient {
    api_url: Url,
    auth_token: SecretString,
    http: reqwest::Client,
}

impl PlatformClient {
    pub fn new(api_url: Url, auth_token: SecretString, http: reqwest::Client) -> Self {
        Self {
            api_url,
            auth_token,
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    transaction_event_report: Option<ReportPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportPayload {
    #[serde(default)]
    already_processed: Option<bool>,
    #[serde(default)]
    errors: Vec<ReportError>,
}

#[derive(Debug, Deserialize)]
struct ReportError {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ReportError {
    fn describe(&self) -> String {
        format!(
            "{}/{}: {}",
            self.field.as_deref().unwrap_or("-"),
            self.code.as_deref().unwrap_or("-"),
            self.message.as_deref().unwrap_or("-")
        )
    }
}

#[async_trait]
impl TransactionEventReporter for PlatformClient {
    async fn report_event(&self, result: &SyncResult) -> CustomResult<(), ConnectorError> {
        let time = result
            .time
            .format(&Rfc3339)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let body = serde_json::json!({
            "query": TRANSACTION_EVENT_REPORT,
            "variables": {
                "id": result.transaction_id.as_str(),
                "type": result.event_type,
                "amount": result.amount,
                "pspReference": result.psp_reference,
                "time": time,
            },
        });

        let response = self
            .http
            .post(self.api_url.clone())
            .bearer_auth(self.auth_token.expose_secret())
            .json(&body)
            .send()
            .await
            .change_context(ConnectorError::RequestFailed {
                service: "platform graphql api",
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(report!(ConnectorError::SyncReport {
                reason: format!("platform returned {status}"),
            }));
        }

        let parsed: GraphQlResponse =
            response
                .json()
                .await
                .change_context(ConnectorError::ResponseValidation {
                    context: "transactionEventReport",
                })?;

        if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
            let reason = errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(report!(ConnectorError::SyncReport { reason }));
        }

        let payload = parsed
            .data
            .and_then(|data| data.transaction_event_report)
            .ok_or_else(|| {
                report!(ConnectorError::SyncReport {
                    reason: "mutation returned no payload".to_string(),
                })
            })?;

        if !payload.errors.is_empty() {
            let reason = payload
                .errors
                .iter()
                .map(ReportError::describe)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::error!(
                %reason,
                "platform rejected the event report; check that the app token \
                 is current and may report events for this transaction"
            );
            return Err(report!(ConnectorError::SyncReport { reason }));
        }

        if payload.already_processed == Some(true) {
            tracing::debug!(
                psp_reference = %result.psp_reference,
                "event report was already processed by the platform"
            );
        }
        Ok(())
    }
}
