//! Idempotent registration of the webhook subscription with the processor.

use std::sync::Arc;

use common_utils::CustomResult;
use connector_integration::types::ProcessorApi;
use domain_types::{
    errors::ConnectorError,
    events::WebhookEventType,
    types::{AuthorizedotnetConfig, WebhookRegistration, WebhookStatus},
};

/// Lifecycle events the subscription asks for. Broader than the mapped set
/// so that coverage can grow without re-registering.
pub const REGISTERED_EVENT_TYPES: [WebhookEventType; 6] = [
    WebhookEventType::AuthorizationCreated,
    WebhookEventType::CaptureCreated,
    WebhookEventType::AuthCaptureCreated,
    WebhookEventType::RefundCreated,
    WebhookEventType::PriorAuthCaptureCreated,
    WebhookEventType::VoidCreated,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    AlreadyRegistered,
    Created,
}

pub struct WebhookSubscriptionManager {
    processor: Arc<dyn ProcessorApi>,
    config: Arc<AuthorizedotnetConfig>,
}

impl WebhookSubscriptionManager {
    pub fn new(processor: Arc<dyn ProcessorApi>, config: Arc<AuthorizedotnetConfig>) -> Self {
        Self { processor, config }
    }

    /// Ensure a subscription for the canonical callback URL exists.
    ///
    /// Matching is by exact URL string only. A subscription whose event
    /// types have drifted from [`REGISTERED_EVENT_TYPES`] is left as-is;
    /// reconciling drift requires deleting the subscription out of band.
    pub async fn register(&self) -> CustomResult<RegistrationOutcome, ConnectorError> {
        let callback_url = self.config.webhook_callback_url()?;

        let existing = self.processor.list_webhooks().await?;
        if existing
            .iter()
            .any(|subscription| subscription.url == callback_url.as_str())
        {
            tracing::debug!(url = %callback_url, "webhook subscription already registered");
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let registration = WebhookRegistration {
            url: callback_url.to_string(),
            event_types: REGISTERED_EVENT_TYPES.to_vec(),
            status: WebhookStatus::Active,
        };
        self.processor.create_webhook(&registration).await?;
        tracing::info!(url = %callback_url, "registered webhook subscription");
        Ok(RegistrationOutcome::Created)
    }
}
