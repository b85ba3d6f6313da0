//! Token verification.
//!
//! A call moves through parsing, algorithm check, signature check and the
//! semantic claim check; each stage rejects on its own and nothing later
//! runs once a stage has failed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use error::TokenError;
use jwt::VerifyWithKey;
use rsa::RsaPublicKey;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::engine::{self, RsaAlgorithm, RsaVerifier};

type Payload = Map<String, Value>;

/// Header fields read before the algorithm is known to be supported.
#[derive(Debug, Deserialize)]
struct DeclaredHeader {
    alg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Parsing,
    AlgorithmCheck,
    SignatureCheck,
    SemanticCheck,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Parsing => "parsing",
            Stage::AlgorithmCheck => "algorithm_check",
            Stage::SignatureCheck => "signature_check",
            Stage::SemanticCheck => "semantic_check",
        };
        f.write_str(name)
    }
}

/// Verifies RSA-signed tokens and validates their claims.
#[derive(Clone)]
pub struct Verifier<K = SystemClock> {
    key: RsaPublicKey,
    clock: K,
}

impl Verifier {
    /// Create a verifier from a PEM-encoded RSA public key.
    pub fn new(public_key: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let key = engine::parse_public_key(public_key.as_ref())?;
        tracing::debug!("Loaded RSA public key for token verification");
        Ok(Self {
            key,
            clock: SystemClock,
        })
    }
}

impl<K: Clock> Verifier<K> {
    /// Replace the time source used for the claim check.
    pub fn with_clock<T: Clock>(self, clock: T) -> Verifier<T> {
        Verifier {
            key: self.key,
            clock,
        }
    }

    /// Verify `token` and return its claims.
    ///
    /// `claims` carries the caller's expectations; they are copied onto the
    /// decoded payload before the claim check runs. On success the returned
    /// value holds every transmitted field, extension fields included.
    pub fn verify<C: Claims>(&self, token: &str, claims: C) -> Result<C, TokenError> {
        let header = parse_compact(token).map_err(|cause| {
            reject(
                Stage::Parsing,
                TokenError::malformed(format!("error parsing token: {cause}")),
            )
        })?;

        let algorithm = RsaAlgorithm::from_name(&header.alg).ok_or_else(|| {
            reject(
                Stage::AlgorithmCheck,
                TokenError::unsupported_algorithm(format!("unexpected method: {}", header.alg)),
            )
        })?;

        let payload: Payload = token
            .verify_with_key(&RsaVerifier::new(&self.key, algorithm))
            .map_err(|e| {
                reject(
                    Stage::SignatureCheck,
                    TokenError::signature_invalid(format!("validate token: {e}")),
                )
            })?;

        let mut verified: C = serde_json::from_value(Value::Object(payload)).map_err(|e| {
            reject(
                Stage::SemanticCheck,
                TokenError::malformed(format!("error decoding claims: {e}")),
            )
        })?;
        verified.simple_mut().copy_expectations_from(claims.simple());
        verified
            .validate(self.clock.now())
            .map_err(|e| reject(Stage::SemanticCheck, e))?;

        Ok(verified)
    }
}

impl<K> fmt::Debug for Verifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier").finish_non_exhaustive()
    }
}

/// Check the three-segment framing and decode header and payload.
fn parse_compact(token: &str) -> Result<DeclaredHeader, String> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err("expected three segments".to_string());
    };
    let header: DeclaredHeader = decode_segment(header)?;
    decode_segment::<Payload>(payload)?;
    Ok(header)
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, String> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

fn reject(stage: Stage, err: TokenError) -> TokenError {
    tracing::debug!(%stage, kind = %err.kind(), cause = err.cause(), "Token rejected");
    err
}
