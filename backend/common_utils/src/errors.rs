/// Result alias threading an [`error_stack::Report`] through fallible calls.
pub type CustomResult<T, E> = Result<T, error_stack::Report<E>>;

/// Parsing failures raised while decoding bytes or values into typed
/// structures. The variant carries the type name being decoded so failures
/// are diagnosable without re-deriving state.
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to parse struct: {0}")]
    StructParseFailure(&'static str),
    #[error("Failed to serialize to {0} format")]
    EncodeError(&'static str),
}

/// Cryptographic primitive failures.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Failed to sign message")]
    MessageSigningFailed,
    #[error("Failed to verify signature")]
    SignatureVerificationFailed,
}
