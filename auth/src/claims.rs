//! Token claims and their semantic validation.

use error::{ErrorKind, TokenError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Canonical claim set carried by every token.
///
/// The `expected_*` fields are filled in by the verifying caller and are
/// never serialized. Application claim types embed this struct with
/// `#[serde(flatten)]` and implement [`Claims`] to reuse its validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleClaims {
    /// Declared purpose of the token ("access", "id")
    pub token_use: String,
    /// Issuer
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Audience application
    pub client_id: String,

    #[serde(skip)]
    pub expected_issuer: String,
    #[serde(skip)]
    pub expected_client_id: String,
    #[serde(skip)]
    pub expected_token_use: String,
}

impl SimpleClaims {
    /// Create transmitted claims valid from `issued_at` for `expires_in_secs`.
    ///
    /// The expiry saturates at the `i64` range.
    pub fn new(
        token_use: impl Into<String>,
        issuer: impl Into<String>,
        client_id: impl Into<String>,
        issued_at: i64,
        expires_in_secs: i64,
    ) -> Self {
        Self {
            token_use: token_use.into(),
            issuer: issuer.into(),
            expires_at: issued_at.saturating_add(expires_in_secs),
            issued_at,
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    /// Create an expectations-only claim set to hand to a verifier.
    pub fn expecting(
        issuer: impl Into<String>,
        client_id: impl Into<String>,
        token_use: impl Into<String>,
    ) -> Self {
        Self {
            expected_issuer: issuer.into(),
            expected_client_id: client_id.into(),
            expected_token_use: token_use.into(),
            ..Default::default()
        }
    }

    /// Copy the verifier-side expectations from `other`.
    pub fn copy_expectations_from(&mut self, other: &SimpleClaims) {
        self.expected_issuer.clone_from(&other.expected_issuer);
        self.expected_client_id.clone_from(&other.expected_client_id);
        self.expected_token_use.clone_from(&other.expected_token_use);
    }

    /// Check the claims at instant `now`.
    ///
    /// Rules run in a fixed order and the first violation is reported:
    /// expiry, issued-at, client id, issuer, token use.
    pub fn validate(&self, now: i64) -> Result<(), TokenError> {
        if !self.verify_expires_at(now) {
            return Err(TokenError::new(ErrorKind::Expired, "token expired"));
        }
        if !self.verify_issued_at(now) {
            return Err(TokenError::new(
                ErrorKind::IssuedInFuture,
                "invalid token claims issued at",
            ));
        }
        if !self.verify_client_id() {
            return Err(TokenError::new(
                ErrorKind::ClaimsInvalid,
                "invalid token claims app client id",
            ));
        }
        if !self.verify_issuer() {
            return Err(TokenError::new(
                ErrorKind::IssuerMismatch,
                "invalid token claims issuer",
            ));
        }
        if !self.verify_token_use() {
            return Err(TokenError::new(
                ErrorKind::ClaimsInvalid,
                "invalid token claims token use",
            ));
        }
        Ok(())
    }

    fn verify_expires_at(&self, now: i64) -> bool {
        now <= self.expires_at
    }

    fn verify_issued_at(&self, now: i64) -> bool {
        now >= self.issued_at
    }

    fn verify_client_id(&self) -> bool {
        self.client_id == self.expected_client_id
    }

    fn verify_issuer(&self) -> bool {
        self.issuer == self.expected_issuer
    }

    fn verify_token_use(&self) -> bool {
        self.token_use == self.expected_token_use
    }
}

/// A claim set that can be issued and verified.
///
/// Extension types expose their embedded [`SimpleClaims`]; validation only
/// ever inspects the canonical fields.
///
/// ```
/// use jwtauth::{Claims, SimpleClaims};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct RoleClaims {
///     #[serde(flatten)]
///     base: SimpleClaims,
///     role: String,
/// }
///
/// impl Claims for RoleClaims {
///     fn simple(&self) -> &SimpleClaims {
///         &self.base
///     }
///
///     fn simple_mut(&mut self) -> &mut SimpleClaims {
///         &mut self.base
///     }
/// }
/// ```
pub trait Claims: Serialize + DeserializeOwned {
    fn simple(&self) -> &SimpleClaims;

    fn simple_mut(&mut self) -> &mut SimpleClaims;

    fn validate(&self, now: i64) -> Result<(), TokenError> {
        self.simple().validate(now)
    }
}

impl Claims for SimpleClaims {
    fn simple(&self) -> &SimpleClaims {
        self
    }

    fn simple_mut(&mut self) -> &mut SimpleClaims {
        self
    }
}
