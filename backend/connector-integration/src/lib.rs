//! Authorize.Net connector: request transformers, webhook signature
//! verification and the typed HTTP client behind the [`types::ProcessorApi`]
//! seam.

pub mod connectors;
pub mod types;

pub use connectors::Authorizedotnet;
