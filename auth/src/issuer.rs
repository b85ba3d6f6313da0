//! Token issuing.

use error::TokenError;
use jwt::SignWithKey;
use std::fmt;

use crate::claims::Claims;
use crate::engine::{self, RsaAlgorithm, RsaSigner};

/// Signs claim sets with an RSA private key (RS256).
#[derive(Clone)]
pub struct Issuer {
    signer: RsaSigner,
}

impl Issuer {
    /// Create an issuer from a PEM-encoded RSA private key.
    pub fn new(private_key: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let key = engine::parse_private_key(private_key.as_ref())?;
        tracing::debug!("Loaded RSA private key for token issuing");
        Ok(Self {
            signer: RsaSigner::new(key, RsaAlgorithm::Rs256),
        })
    }

    /// Encode and sign `claims` into a compact token.
    ///
    /// Expectation fields are never part of the payload; extension fields
    /// of the claim type are.
    pub fn issue<C: Claims>(&self, claims: &C) -> Result<String, TokenError> {
        claims
            .sign_with_key(&self.signer)
            .map_err(|e| TokenError::signing_failed(format!("error signing token: {e}")))
    }
}

impl fmt::Debug for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Issuer")
            .field("algorithm", &self.signer.algorithm())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::SimpleClaims;
    use crate::engine::fixtures::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use error::ErrorKind;

    fn segment(token: &str, index: usize) -> serde_json::Value {
        let part = token.split('.').nth(index).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    #[test]
    fn test_issue_token_shape() {
        let issuer = Issuer::new(PRIVATE_KEY).unwrap();
        let mut claims = SimpleClaims::new("access", "otter", "otter-client", 1_700_000_000, 60);
        claims.expected_issuer = "should-not-leak".to_string();

        let token = issuer.issue(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);

        assert_eq!(segment(&token, 0)["alg"], "RS256");

        let payload = segment(&token, 1);
        assert_eq!(payload["iss"], "otter");
        assert_eq!(payload["client_id"], "otter-client");
        assert_eq!(payload["token_use"], "access");
        assert_eq!(payload["iat"], 1_700_000_000);
        assert_eq!(payload["exp"], 1_700_000_060);
        assert!(!token.contains("should-not-leak"));
        assert_eq!(payload.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let issuer = Issuer::new(PRIVATE_KEY).unwrap();
        let claims = SimpleClaims::new("id", "otter", "otter-client", 0, 1);
        assert_eq!(issuer.issue(&claims).unwrap(), issuer.issue(&claims).unwrap());
    }

    #[test]
    fn test_rejects_wrong_key_shape() {
        let err = Issuer::new(EC_PRIVATE_KEY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);

        let err = Issuer::new("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);
    }

    #[test]
    fn test_debug_hides_key() {
        let issuer = Issuer::new(PRIVATE_KEY).unwrap();
        assert_eq!(format!("{issuer:?}"), "Issuer { algorithm: Rs256, .. }");
    }
}
