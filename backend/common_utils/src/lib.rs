//! Shared plumbing for the payment synchronization service: error alias,
//! crypto primitives, serde extension traits and amount newtypes. Nothing in
//! this crate knows about the processor or the commerce platform.

pub mod consts;
pub mod crypto;
pub mod errors;
pub mod ext_traits;
pub mod types;

pub use errors::{CustomResult, ParsingError};
pub use types::FloatMajorUnit;
