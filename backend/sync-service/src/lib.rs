//! Orchestration of payment-event synchronization: configuration, logging,
//! the platform event reporter, the webhook synchronization flow, the
//! outbound payment-session flow and webhook subscription management.

pub mod config;
pub mod logger;
pub mod platform;
pub mod reporter;
pub mod sessions;
pub mod subscriptions;

pub use reporter::SynchronizationReporter;
pub use sessions::PaymentSessionService;
pub use subscriptions::WebhookSubscriptionManager;
