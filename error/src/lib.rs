//! Common error types for token issuing and verification.
//!
//! Every failure carries an [`ErrorKind`] so callers can tell a tampered
//! token from an expired one, plus a human-readable cause.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of token failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Key material could not be parsed or is not an RSA key
    InvalidKeyMaterial,
    /// The signing engine failed to produce a token
    SigningFailed,
    /// The compact token could not be parsed
    MalformedToken,
    /// The token declares an algorithm outside the RSA family
    UnsupportedAlgorithm,
    /// The signature does not match the verifier's public key
    SignatureInvalid,
    /// The token is past its expiry
    Expired,
    /// The token was issued after the current instant
    IssuedInFuture,
    /// Client id or token use does not match the expectation
    ClaimsInvalid,
    /// Issuer does not match the expectation
    IssuerMismatch,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidKeyMaterial => "TOKEN_INVALID_KEY_MATERIAL",
            Self::SigningFailed => "TOKEN_SIGNING_FAILED",
            Self::MalformedToken => "TOKEN_MALFORMED",
            Self::UnsupportedAlgorithm => "TOKEN_UNSUPPORTED_ALGORITHM",
            Self::SignatureInvalid => "TOKEN_SIGNATURE_INVALID",
            Self::Expired => "TOKEN_EXPIRED",
            Self::IssuedInFuture => "TOKEN_ISSUED_IN_FUTURE",
            Self::ClaimsInvalid => "TOKEN_CLAIMS_INVALID",
            Self::IssuerMismatch => "TOKEN_ISSUER_MISMATCH",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidKeyMaterial => "invalid key material",
            Self::SigningFailed => "signing failed",
            Self::MalformedToken => "malformed token",
            Self::UnsupportedAlgorithm => "unsupported algorithm",
            Self::SignatureInvalid => "signature invalid",
            Self::Expired => "expired",
            Self::IssuedInFuture => "issued in future",
            Self::ClaimsInvalid => "claims invalid",
            Self::IssuerMismatch => "issuer mismatch",
        };
        f.write_str(name)
    }
}

/// A token failure: what went wrong and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {cause}")]
pub struct TokenError {
    kind: ErrorKind,
    cause: String,
}

impl TokenError {
    /// Create a new error of the given kind.
    pub fn new(kind: ErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }

    /// The token envelope was rejected before its claims were looked at.
    pub fn is_cryptographic(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedToken | ErrorKind::UnsupportedAlgorithm | ErrorKind::SignatureInvalid
        )
    }

    /// The envelope was authentic but the claims were not acceptable.
    pub fn is_semantic(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Expired
                | ErrorKind::IssuedInFuture
                | ErrorKind::ClaimsInvalid
                | ErrorKind::IssuerMismatch
        )
    }

    pub fn invalid_key_material(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidKeyMaterial, cause)
    }

    pub fn signing_failed(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::SigningFailed, cause)
    }

    pub fn malformed(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedToken, cause)
    }

    pub fn unsupported_algorithm(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedAlgorithm, cause)
    }

    pub fn signature_invalid(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureInvalid, cause)
    }
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        let message = match err.kind() {
            ErrorKind::InvalidKeyMaterial | ErrorKind::SigningFailed => "Failed to create token",
            ErrorKind::MalformedToken
            | ErrorKind::UnsupportedAlgorithm
            | ErrorKind::SignatureInvalid => "Invalid token",
            ErrorKind::Expired => "Token has expired",
            ErrorKind::IssuedInFuture
            | ErrorKind::ClaimsInvalid
            | ErrorKind::IssuerMismatch => "Token not accepted",
        };
        Self::new(err.kind().code(), message)
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_cause() {
        let err = TokenError::new(ErrorKind::Expired, "token expired");
        assert_eq!(err.to_string(), "expired: token expired");
        assert_eq!(err.cause(), "token expired");
    }

    #[test]
    fn test_classification() {
        let tampered = TokenError::signature_invalid("verification error");
        assert!(tampered.is_cryptographic());
        assert!(!tampered.is_semantic());

        let expired = TokenError::new(ErrorKind::Expired, "token expired");
        assert!(expired.is_semantic());
        assert!(!expired.is_cryptographic());

        let key = TokenError::invalid_key_material("not a pem");
        assert!(!key.is_semantic());
        assert!(!key.is_cryptographic());
    }

    #[test]
    fn test_error_response_hides_cause() {
        let err = TokenError::new(ErrorKind::IssuerMismatch, "invalid token claims issuer");
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "TOKEN_ISSUER_MISMATCH");
        assert_eq!(response.message, "Token not accepted");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
        assert!(!json.to_string().contains("invalid token claims issuer"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::IssuedInFuture).unwrap();
        assert_eq!(json, "\"issued_in_future\"");
    }
}
