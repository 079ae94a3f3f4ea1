//! Webhook event model and the mapping onto platform transaction events.

use common_utils::CustomResult;
use error_stack::report;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::ConnectorError;

/// Processor transaction lifecycle events this integration subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum WebhookEventType {
    #[serde(rename = "net.authorize.payment.authorization.created")]
    #[strum(serialize = "net.authorize.payment.authorization.created")]
    AuthorizationCreated,
    #[serde(rename = "net.authorize.payment.capture.created")]
    #[strum(serialize = "net.authorize.payment.capture.created")]
    CaptureCreated,
    #[serde(rename = "net.authorize.payment.authcapture.created")]
    #[strum(serialize = "net.authorize.payment.authcapture.created")]
    AuthCaptureCreated,
    #[serde(rename = "net.authorize.payment.refund.created")]
    #[strum(serialize = "net.authorize.payment.refund.created")]
    RefundCreated,
    #[serde(rename = "net.authorize.payment.priorAuthCapture.created")]
    #[strum(serialize = "net.authorize.payment.priorAuthCapture.created")]
    PriorAuthCaptureCreated,
    #[serde(rename = "net.authorize.payment.void.created")]
    #[strum(serialize = "net.authorize.payment.void.created")]
    VoidCreated,
}

/// Processor entity a webhook refers to. Currently always `transaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityName {
    #[serde(rename = "transaction")]
    Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub entity_name: EntityName,
    /// Processor-assigned transaction id.
    pub id: String,
}

/// Inbound processor notification, parsed only after signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub notification_id: String,
    pub event_type: WebhookEventType,
    #[serde(with = "time::serde::rfc3339")]
    pub event_date: OffsetDateTime,
    pub webhook_id: String,
    pub payload: WebhookPayload,
}

/// Platform-side transaction event types reported back via the
/// `transactionEventReport` mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionEventType {
    ChargeSuccess,
    ChargeFailure,
}

/// Map a processor lifecycle event onto a platform transaction event.
///
/// Deliberately partial: only settled captures and voids currently have a
/// defined platform meaning. Everything else is rejected rather than
/// guessed at; extending coverage means adding match arms here.
pub fn map_event(
    event_type: WebhookEventType,
) -> CustomResult<TransactionEventType, ConnectorError> {
    match event_type {
        WebhookEventType::PriorAuthCaptureCreated => Ok(TransactionEventType::ChargeSuccess),
        WebhookEventType::VoidCreated => Ok(TransactionEventType::ChargeFailure),
        other => Err(report!(ConnectorError::UnsupportedEventType {
            event_type: other.to_string(),
        })),
    }
}
