//! HMAC-SHA512 verification of inbound webhook notifications.
//!
//! Verification runs over the exact raw request body, before any JSON
//! parsing. Parsing first and re-serializing would change byte order and
//! whitespace and break the signature.

use common_utils::{
    crypto::{HmacSha512, SignMessage, VerifySignature, SHA512_DIGEST_LENGTH},
    CustomResult,
};
use domain_types::errors::ConnectorError;
use error_stack::{report, ResultExt};
use secrecy::{ExposeSecret, SecretString};

const SIGNATURE_PREFIX: &str = "sha512=";

/// Verifies webhook deliveries against the merchant signature key.
pub struct WebhookSignatureVerifier {
    signature_key: SecretString,
}

impl WebhookSignatureVerifier {
    pub fn new(signature_key: SecretString) -> Self {
        Self { signature_key }
    }

    /// Check the `X-ANET-Signature` header value against the raw body.
    ///
    /// Every failure mode maps to [`ConnectorError::InvalidSignature`]:
    /// missing or malformed header, wrong digest length, or digest
    /// mismatch. The comparison itself is constant-time; the length gate
    /// before it only rejects values that cannot be valid SHA-512 digests.
    pub fn verify(&self, header: Option<&str>, body: &[u8]) -> CustomResult<(), ConnectorError> {
        let header = header.ok_or_else(|| {
            report!(ConnectorError::InvalidSignature)
                .attach_printable("signature header is missing")
        })?;

        let hex_digest = header
            .strip_prefix(SIGNATURE_PREFIX)
            .ok_or_else(|| {
                report!(ConnectorError::InvalidSignature)
                    .attach_printable("signature header lacks the sha512= prefix")
            })?;

        // Hex decoding is case-insensitive; the processor sends uppercase.
        let claimed = hex::decode(hex_digest).change_context(ConnectorError::InvalidSignature)?;
        if claimed.len() != SHA512_DIGEST_LENGTH {
            return Err(report!(ConnectorError::InvalidSignature))
                .attach_printable("signature digest has the wrong length");
        }

        let verified = HmacSha512
            .verify_signature(self.signature_key.expose_secret().as_bytes(), &claimed, body)
            .change_context(ConnectorError::InvalidSignature)?;
        if !verified {
            return Err(report!(ConnectorError::InvalidSignature))
                .attach_printable("signature digest does not match the request body");
        }
        Ok(())
    }

    /// Produce the header value the processor would send for `body`.
    /// Used by tests and local delivery tooling.
    pub fn expected_header(&self, body: &[u8]) -> CustomResult<String, ConnectorError> {
        let digest = HmacSha512
            .sign_message(self.signature_key.expose_secret().as_bytes(), body)
            .change_context(ConnectorError::InvalidSignature)?;
        Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode_upper(digest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> WebhookSignatureVerifier {
        WebhookSignatureVerifier::new(SecretString::new("0123456789ABCDEF".into()))
    }

    const BODY: &[u8] = br#"{"notificationId":"n-1","eventType":"net.authorize.payment.void.created"}"#;

    #[test]
    fn accepts_matching_signature() {
        let verifier = verifier();
        let header = verifier.expected_header(BODY).expect("sign");
        verifier.verify(Some(&header), BODY).expect("verify");
    }

    #[test]
    fn accepts_lowercase_hex_digest() {
        let verifier = verifier();
        let header = verifier.expected_header(BODY).expect("sign").to_lowercase();
        verifier.verify(Some(&header), BODY).expect("verify");
    }

    #[test]
    fn rejects_missing_header() {
        let err = verifier().verify(None, BODY).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidSignature
        ));
    }

    #[test]
    fn rejects_header_without_prefix() {
        let verifier = verifier();
        let header = verifier.expected_header(BODY).expect("sign");
        let stripped = header.trim_start_matches(SIGNATURE_PREFIX);
        let err = verifier.verify(Some(stripped), BODY).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidSignature
        ));
    }

    #[test]
    fn rejects_tampered_body() {
        let verifier = verifier();
        let header = verifier.expected_header(BODY).expect("sign");
        let mut tampered = BODY.to_vec();
        tampered[10] ^= 0x01;
        let err = verifier.verify(Some(&header), &tampered).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidSignature
        ));
    }

    #[test]
    fn rejects_wrong_length_digest() {
        let header = format!("{SIGNATURE_PREFIX}{}", hex::encode_upper([0u8; 32]));
        let err = verifier().verify(Some(&header), BODY).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidSignature
        ));
    }

    #[test]
    fn rejects_non_hex_digest() {
        let header = format!("{SIGNATURE_PREFIX}{}", "zz".repeat(SHA512_DIGEST_LENGTH));
        let err = verifier().verify(Some(&header), BODY).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidSignature
        ));
    }

    #[test]
    fn rejects_key_mismatch() {
        let signer = WebhookSignatureVerifier::new(SecretString::new("other-key".into()));
        let header = signer.expected_header(BODY).expect("sign");
        let err = verifier().verify(Some(&header), BODY).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::InvalidSignature
        ));
    }
}
