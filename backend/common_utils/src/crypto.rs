//! Keyed-hash primitives behind small traits so callers stay testable and
//! algorithm-agnostic.

use crate::errors::{CryptoError, CustomResult};

/// Sign a message with a secret key.
pub trait SignMessage {
    fn sign_message(&self, secret: &[u8], message: &[u8]) -> CustomResult<Vec<u8>, CryptoError>;
}

/// Verify a signature over a message with a secret key.
///
/// Implementations must compare in constant time; callers are expected to
/// gate on signature length first, since constant-time comparison is only
/// defined for equal-length buffers.
pub trait VerifySignature {
    fn verify_signature(
        &self,
        secret: &[u8],
        signature: &[u8],
        message: &[u8],
    ) -> CustomResult<bool, CryptoError>;
}

/// HMAC-SHA512.
#[derive(Debug, Clone, Copy)]
pub struct HmacSha512;

/// Output length of SHA-512 in bytes.
pub const SHA512_DIGEST_LENGTH: usize = 64;

impl SignMessage for HmacSha512 {
    fn sign_message(&self, secret: &[u8], message: &[u8]) -> CustomResult<Vec<u8>, CryptoError> {
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA512, secret);
        Ok(ring::hmac::sign(&key, message).as_ref().to_vec())
    }
}

impl VerifySignature for HmacSha512 {
    fn verify_signature(
        &self,
        secret: &[u8],
        signature: &[u8],
        message: &[u8],
    ) -> CustomResult<bool, CryptoError> {
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA512, secret);
        Ok(ring::hmac::verify(&key, message, signature).is_ok())
    }
}
