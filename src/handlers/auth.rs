use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Extractor that verifies the X-Payment-Signature header against the
/// request body using HMAC-SHA256 before the callback payload is parsed.
pub struct VerifiedCallback {
    pub body: Vec<u8>,
}

impl VerifiedCallback {
    /// Verify the signature using constant-time comparison
    fn verify_signature(secret: &str, body: &[u8], signature_header: &str) -> Result<(), AuthError> {
        // Decode the hex signature from the header
        let expected_signature =
            hex::decode(signature_header).map_err(|_| AuthError::InvalidSignatureFormat)?;

        // Compute HMAC-SHA256 of the body
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| AuthError::InvalidSecret)?;
        mac.update(body);

        // Constant-time comparison to prevent timing attacks
        mac.verify_slice(&expected_signature)
            .map_err(|_| AuthError::SignatureMismatch)?;

        Ok(())
    }
}

#[async_trait]
impl FromRequest<crate::AppState> for VerifiedCallback {
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &crate::AppState) -> Result<Self, Self::Rejection> {
        // Extract the signature header before consuming the body
        let signature = req
            .headers()
            .get("X-Payment-Signature")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or(AuthError::MissingSignature)?;

        let body = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(|_| AuthError::BodyReadError)?
            .to_vec();

        Self::verify_signature(&state.config.payment_webhook_secret, &body, &signature)?;

        Ok(VerifiedCallback { body })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingSignature,
    InvalidSignatureFormat,
    InvalidSecret,
    SignatureMismatch,
    BodyReadError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSignature => {
                (StatusCode::UNAUTHORIZED, "Missing X-Payment-Signature header")
            }
            AuthError::InvalidSignatureFormat => {
                (StatusCode::UNAUTHORIZED, "Invalid signature format")
            }
            AuthError::InvalidSecret => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid webhook secret configuration")
            }
            AuthError::SignatureMismatch => {
                (StatusCode::UNAUTHORIZED, "Signature verification failed")
            }
            AuthError::BodyReadError => {
                (StatusCode::BAD_REQUEST, "Failed to read request body")
            }
        };

        tracing::warn!("Callback authentication failed: {:?}", self);
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let secret = "test-secret";
        let body = br#"{"transaction_id":"abc","status":"completed"}"#;
        let signature = sign(secret, body);

        assert!(VerifiedCallback::verify_signature(secret, body, &signature).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let secret = "test-secret";
        let signature = sign(secret, b"original body");

        let result = VerifiedCallback::verify_signature(secret, b"tampered body", &signature);
        assert!(matches!(result, Err(AuthError::SignatureMismatch)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"body";
        let signature = sign("secret-a", body);

        let result = VerifiedCallback::verify_signature("secret-b", body, &signature);
        assert!(matches!(result, Err(AuthError::SignatureMismatch)));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let result = VerifiedCallback::verify_signature("secret", b"body", "not-hex!");
        assert!(matches!(result, Err(AuthError::InvalidSignatureFormat)));
    }
}
