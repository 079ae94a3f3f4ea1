//! Data model for the payment-event synchronization core: correlation
//! identifier codec, webhook event model, gateway variants, configuration
//! and the typed error taxonomy.

pub mod correlation;
pub mod errors;
pub mod events;
pub mod types;
