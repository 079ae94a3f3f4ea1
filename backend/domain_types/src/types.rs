//! Payment-session payloads, gateway variants, processor records and
//! component configuration.

use common_utils::{CustomResult, FloatMajorUnit};
use error_stack::{report, ResultExt};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

use crate::{
    correlation::CorrelationId,
    errors::ConnectorError,
    events::{TransactionEventType, WebhookEventType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    Aud,
    Brl,
    Cad,
    Chf,
    Czk,
    Dkk,
    Eur,
    Gbp,
    Hkd,
    Inr,
    Jpy,
    Mxn,
    Nok,
    Nzd,
    Pln,
    Sek,
    Sgd,
    Usd,
    Zar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2.
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: FloatMajorUnit,
}

/// Discriminated payment-method payload as delivered by the platform:
/// `{"type": ..., "data": ...}`. The `data` blob is validated against a
/// per-variant schema during [`GatewayVariant::resolve`].
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedRedirectData {
    /// When set and a customer email is present, a processor customer
    /// profile is resolved (or created) and attached to the request.
    #[serde(default)]
    pub create_profile: bool,
}

/// Opaque pair produced by the client-side wallet SDK.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTokenData {
    pub data_descriptor: String,
    pub data_value: SecretString,
}

/// Closed union over the supported payment methods. Adding a method means
/// adding one variant and one match arm per handler, not subclassing.
#[derive(Debug)]
pub enum GatewayVariant {
    HostedRedirect(HostedRedirectData),
    WalletToken(WalletTokenData),
    ThirdPartyRedirect,
}

impl GatewayVariant {
    pub fn resolve(payload: &PaymentMethodPayload) -> CustomResult<Self, ConnectorError> {
        match payload.kind.as_str() {
            "hostedRedirect" => {
                let data = match &payload.data {
                    Some(value) => serde_json::from_value(value.clone()).change_context(
                        ConnectorError::InvalidGatewayPayload {
                            reason: "hostedRedirect data failed schema validation".to_string(),
                        },
                    )?,
                    None => HostedRedirectData::default(),
                };
                Ok(Self::HostedRedirect(data))
            }
            "walletToken" => {
                let value = payload.data.clone().ok_or_else(|| {
                    report!(ConnectorError::InvalidGatewayPayload {
                        reason: "walletToken requires opaque wallet data".to_string(),
                    })
                })?;
                let data: WalletTokenData = serde_json::from_value(value).change_context(
                    ConnectorError::InvalidGatewayPayload {
                        reason: "walletToken data failed schema validation".to_string(),
                    },
                )?;
                if data.data_descriptor.is_empty() || data.data_value.expose_secret().is_empty() {
                    return Err(report!(ConnectorError::InvalidGatewayPayload {
                        reason: "walletToken dataDescriptor and dataValue must be non-empty"
                            .to_string(),
                    }));
                }
                Ok(Self::WalletToken(data))
            }
            "thirdPartyRedirect" => Ok(Self::ThirdPartyRedirect),
            other => Err(report!(ConnectorError::UnsupportedPaymentMethod {
                method: other.to_string(),
            })),
        }
    }
}

/// Platform payment-initialization payload for one transaction session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionPayload {
    pub transaction_id: CorrelationId,
    pub amount: FloatMajorUnit,
    pub currency: Currency,
    /// Processor transaction to resume or synchronize, if any.
    #[serde(default)]
    pub previous_transaction_id: Option<String>,
    /// Human-readable order number; absent until the order is placed.
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub payment_method: PaymentMethodPayload,
}

/// Immediate outcome of a transaction create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    Approved,
    Declined,
    Error,
    HeldForReview,
    RequiresAction,
}

/// Outcome of a transaction create call against the processor.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    pub psp_reference: String,
    pub status: AuthorizationStatus,
}

/// Processor transaction record as read back from the transaction API.
/// Read-only from this core's perspective.
#[derive(Debug, Clone)]
pub struct ProcessorTransaction {
    pub id: String,
    pub status: ProcessorTransactionStatus,
    pub amount: FloatMajorUnit,
    pub currency: Option<Currency>,
    /// Free-text order description carrying the encoded correlation id.
    /// Chosen over the processor's native short reference field, which is
    /// too short to hold a platform identifier.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessorTransactionStatus {
    AuthorizedPendingCapture,
    CapturedPendingSettlement,
    SettledSuccessfully,
    Declined,
    Voided,
    CouldNotVoid,
    GeneralError,
    RefundSettledSuccessfully,
    RefundPendingSettlement,
    #[serde(rename = "FDSPendingReview")]
    FdsPendingReview,
    #[serde(rename = "FDSAuthorizedPendingReview")]
    FdsAuthorizedPendingReview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfileId(String);

impl CustomerProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct HostedPageToken(String);

impl HostedPageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    Active,
    Inactive,
}

/// Subscription record as listed by the processor's webhook-management API.
/// Event types stay untyped here: listings may contain subscriptions
/// registered by other integrations with event types outside our enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    #[serde(default)]
    pub webhook_id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub event_types: Vec<String>,
    pub status: WebhookStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRegistration {
    pub url: String,
    pub event_types: Vec<WebhookEventType>,
    pub status: WebhookStatus,
}

/// Outcome reported back to the platform for one webhook delivery.
/// Write-once; no durable local state is retained between requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub transaction_id: CorrelationId,
    #[serde(rename = "type")]
    pub event_type: TransactionEventType,
    pub amount: FloatMajorUnit,
    pub psp_reference: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

/// Session response handed back to the platform after the outbound flow.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum PaymentSessionResponse {
    #[serde(rename_all = "camelCase")]
    HostedPage {
        form_token: String,
        communicator_url: String,
        public_client_key: String,
    },
    #[serde(rename_all = "camelCase")]
    TransactionCreated {
        psp_reference: String,
        status: AuthorizationStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Production,
}

impl Environment {
    /// JSON endpoint of the transaction API.
    pub fn transaction_endpoint(self) -> &'static str {
        match self {
            Self::Sandbox => "https://apitest.authorize.net/xml/v1/request.api",
            Self::Production => "https://api.authorize.net/xml/v1/request.api",
        }
    }

    /// REST endpoint of the webhook-management API.
    pub fn webhooks_endpoint(self) -> &'static str {
        match self {
            Self::Sandbox => "https://apitest.authorize.net/rest/v1/webhooks",
            Self::Production => "https://api.authorize.net/rest/v1/webhooks",
        }
    }
}

/// Processor credentials and environment selection, passed explicitly into
/// each component at construction. No environment reads happen at call
/// time.
#[derive(Debug, Deserialize)]
pub struct AuthorizedotnetConfig {
    pub api_login_id: SecretString,
    pub transaction_key: SecretString,
    pub signature_key: SecretString,
    pub public_client_key: String,
    pub environment: Environment,
    /// Externally reachable base URL of this service; used for the webhook
    /// callback and the hosted-redirect iframe communicator.
    pub app_base_url: Url,
}

impl AuthorizedotnetConfig {
    fn url_with_path(&self, path: &str) -> CustomResult<Url, ConnectorError> {
        let raw = format!(
            "{}/{}",
            self.app_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).change_context(ConnectorError::RequestEncodingFailed)
    }

    /// Canonical callback URL registered with the processor.
    pub fn webhook_callback_url(&self) -> CustomResult<Url, ConnectorError> {
        self.url_with_path("api/webhooks/authorizedotnet")
    }

    /// Iframe communicator page for the hosted payment page.
    pub fn iframe_communicator_url(&self) -> CustomResult<Url, ConnectorError> {
        self.url_with_path("accept-hosted/communicator")
    }
}
