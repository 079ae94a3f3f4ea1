//! Reversible encoding of the opaque platform transaction identifier into
//! the processor's constrained order-description field.
//!
//! The processor rejects `=` characters in that field, so the trailing
//! base64 padding is stripped on encode and recomputed on decode.

use base64::Engine;
use common_utils::{consts::BASE64_ENGINE, CustomResult};
use error_stack::{report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::errors::ConnectorError;

/// Opaque platform-issued transaction identifier. Created by the commerce
/// platform; never mutated by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base64 form of a [`CorrelationId`] with trailing padding stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedCorrelationId(String);

impl EncodedCorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EncodedCorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode a platform identifier for embedding in the order description.
/// Deterministic; the result never contains `=`.
pub fn encode(id: &CorrelationId) -> EncodedCorrelationId {
    let encoded = BASE64_ENGINE.encode(id.as_str().as_bytes());
    EncodedCorrelationId(encoded.trim_end_matches('=').to_string())
}

/// Recover a platform identifier from its stripped-padding encoding.
///
/// A required padding length of 3 can never occur in valid base64 and
/// signals truncation in transit; it is rejected, never repaired.
pub fn decode(encoded: &str) -> CustomResult<CorrelationId, ConnectorError> {
    let padding = (4 - encoded.len() % 4) % 4;
    if padding == 3 {
        return Err(report!(ConnectorError::CorruptIdentifier))
            .attach_printable("encoded identifier length requires 3 padding characters");
    }

    let padded = format!("{encoded}{}", "=".repeat(padding));
    let bytes = BASE64_ENGINE
        .decode(padded)
        .change_context(ConnectorError::CorruptIdentifier)?;
    let id = String::from_utf8(bytes).change_context(ConnectorError::CorruptIdentifier)?;
    Ok(CorrelationId::new(id))
}
