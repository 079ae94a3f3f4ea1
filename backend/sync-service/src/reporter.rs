//! Inbound webhook flow: verify, parse, enrich from the processor, report
//! to the platform.

use std::sync::Arc;

use common_utils::{ext_traits::ByteSliceExt, CustomResult};
use connector_integration::{
    connectors::authorizedotnet::webhooks::WebhookSignatureVerifier, types::ProcessorApi,
};
use domain_types::{
    correlation,
    errors::ConnectorError,
    events::{self, WebhookEvent},
    types::SyncResult,
};
use error_stack::{report, ResultExt};

use crate::platform::TransactionEventReporter;

/// Stateless webhook handler. No state survives a delivery; duplicate
/// deliveries produce duplicate reports and are deduplicated, if at all,
/// by the platform.
pub struct SynchronizationReporter {
    verifier: WebhookSignatureVerifier,
    processor: Arc<dyn ProcessorApi>,
    platform: Arc<dyn TransactionEventReporter>,
}

impl SynchronizationReporter {
    pub fn new(
        verifier: WebhookSignatureVerifier,
        processor: Arc<dyn ProcessorApi>,
        platform: Arc<dyn TransactionEventReporter>,
    ) -> Self {
        Self {
            verifier,
            processor,
            platform,
        }
    }

    /// Handle one raw webhook delivery.
    ///
    /// The signature is verified over the raw bytes before any parsing;
    /// nothing in an unverified body is trusted, including its claimed
    /// event type.
    pub async fn handle_webhook(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> CustomResult<SyncResult, ConnectorError> {
        self.verifier.verify(signature_header, raw_body)?;

        let event: WebhookEvent = raw_body
            .parse_struct("WebhookEvent")
            .change_context(ConnectorError::ResponseValidation {
                context: "webhook notification",
            })?;
        self.synchronize(&event).await
    }

    /// Synchronize one verified processor event with the platform.
    ///
    /// The event-type mapping runs first: unsupported lifecycle events are
    /// rejected before any processor round trip. No internal retries at any
    /// step; failed deliveries are redelivered by the processor.
    pub async fn synchronize(
        &self,
        event: &WebhookEvent,
    ) -> CustomResult<SyncResult, ConnectorError> {
        let event_type = events::map_event(event.event_type)?;

        let transaction = self
            .processor
            .get_transaction_details(&event.payload.id)
            .await?;

        let description = transaction
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
            .ok_or_else(|| {
                report!(ConnectorError::MissingCorrelationId {
                    transaction_id: transaction.id.clone(),
                })
            })?;
        let transaction_id = correlation::decode(description)?;

        let result = SyncResult {
            transaction_id,
            event_type,
            amount: transaction.amount,
            psp_reference: transaction.id,
            time: event.event_date,
        };

        self.platform
            .report_event(&result)
            .await
            .attach_printable_lazy(|| {
                format!("failed to report {event_type} for {}", result.psp_reference)
            })?;

        tracing::info!(
            psp_reference = %result.psp_reference,
            event_type = %result.event_type,
            "synchronized processor event with the platform"
        );
        Ok(result)
    }
}
