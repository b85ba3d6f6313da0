//! RSA-signed bearer tokens for microservices.
//!
//! An [`Issuer`] signs a claim set into a compact RS256 token. A
//! [`Verifier`] checks the envelope and then the claims: expiry, issued-at,
//! client id, issuer and token use, in that order.
//!
//! ```no_run
//! use jwtauth::{Issuer, SimpleClaims, Verifier};
//!
//! # fn main() -> Result<(), jwtauth::TokenError> {
//! let issuer = Issuer::new(std::fs::read("private_key.pem").unwrap())?;
//! let now = chrono::Utc::now().timestamp();
//! let token = issuer.issue(&SimpleClaims::new("access", "otter", "otter-client", now, 60))?;
//!
//! let verifier = Verifier::new(std::fs::read("public_key.pem").unwrap())?;
//! let claims = verifier.verify(&token, SimpleClaims::expecting("otter", "otter-client", "access"))?;
//! assert_eq!(claims.client_id, "otter-client");
//! # Ok(())
//! # }
//! ```

mod claims;
mod clock;
mod config;
mod engine;
mod issuer;
mod verifier;

pub use claims::{Claims, SimpleClaims};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AuthConfig, ConfigError};
pub use issuer::Issuer;
pub use verifier::Verifier;

pub use error::{ErrorKind, ErrorResponse, TokenError};
