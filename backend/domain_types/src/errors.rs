/// Typed failure taxonomy for the synchronization core.
///
/// Nothing here is retried internally; retry policy belongs to the HTTP
/// boundary (the processor redelivers webhooks on non-2xx, the platform
/// retries its own deliveries).
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Webhook authenticity failed. The request is rejected before any
    /// processing takes place.
    #[error("Webhook signature verification failed")]
    InvalidSignature,

    /// The embedded correlation identifier requires a padding length that
    /// can never occur in valid base64, which signals truncation or
    /// corruption in transit.
    #[error("Correlation identifier is corrupt")]
    CorruptIdentifier,

    /// The processor transaction carries no order description, so the
    /// correlation identifier cannot be recovered. The transaction was
    /// most likely not created by this integration.
    #[error("Processor transaction {transaction_id} has no embedded correlation identifier")]
    MissingCorrelationId { transaction_id: String },

    /// The processor returned something we do not understand. Distinct from
    /// an explicit business error; indicates processor API drift.
    #[error("Processor response did not match the expected shape: {context}")]
    ResponseValidation { context: &'static str },

    /// The processor explicitly reported a business failure. Carries the
    /// concatenated processor message codes and texts.
    #[error("Processor reported an error result: {messages}")]
    ProcessorResult { messages: String },

    /// A known lifecycle event with no defined platform mapping. Extending
    /// coverage means adding mapping cases, never guessing here.
    #[error("No mapping defined for webhook event type {event_type}")]
    UnsupportedEventType { event_type: String },

    #[error("Unsupported payment method type {method}")]
    UnsupportedPaymentMethod { method: String },

    /// Billing and shipping addresses are required inputs, not empty
    /// defaults.
    #[error("Missing required address: {field_name}")]
    MissingAddress { field_name: &'static str },

    /// Caller-supplied payment-method data failed its per-variant schema.
    #[error("Invalid gateway payload: {reason}")]
    InvalidGatewayPayload { reason: String },

    /// The platform rejected the transaction-event report.
    #[error("Failed to report transaction event to the platform: {reason}")]
    SyncReport { reason: String },

    #[error("Failed to encode processor request")]
    RequestEncodingFailed,

    #[error("Request to {service} failed")]
    RequestFailed { service: &'static str },
}
