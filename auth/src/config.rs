//! Token configuration loaded from the environment.

use error::TokenError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::claims::SimpleClaims;
use crate::issuer::Issuer;
use crate::verifier::Verifier;

/// Errors that can occur while turning configuration into an issuer or verifier
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key error: {0}")]
    Key(#[from] TokenError),
}

/// Token issuing and verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the PEM-encoded RSA private key (issuing side)
    pub private_key_path: Option<PathBuf>,
    /// Path to the PEM-encoded RSA public key (verifying side)
    pub public_key_path: Option<PathBuf>,
    /// Token issuer
    pub issuer: String,
    /// Audience application
    pub client_id: String,
    /// Token use (default: "access")
    pub token_use: String,
    /// Token validity duration in seconds (default: 3600)
    pub expires_in_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            private_key_path: None,
            public_key_path: None,
            issuer: String::new(),
            client_id: String::new(),
            token_use: "access".to_string(),
            expires_in_secs: 3600,
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("JWT_PRIVATE_KEY_PATH") {
            config.private_key_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("JWT_PUBLIC_KEY_PATH") {
            config.public_key_path = Some(PathBuf::from(path));
        }

        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.issuer = issuer;
        }

        if let Ok(client_id) = std::env::var("JWT_CLIENT_ID") {
            config.client_id = client_id;
        }

        if let Ok(token_use) = std::env::var("JWT_TOKEN_USE") {
            config.token_use = token_use;
        }

        if let Ok(expires) = std::env::var("JWT_EXPIRES_IN_SECS") {
            if let Ok(n) = expires.parse() {
                config.expires_in_secs = n;
            }
        }

        config
    }

    /// Read the private key and build an issuer.
    pub fn load_issuer(&self) -> Result<Issuer, ConfigError> {
        let path = self
            .private_key_path
            .as_deref()
            .ok_or(ConfigError::Missing("private_key_path"))?;
        Ok(Issuer::new(read_pem(path)?)?)
    }

    /// Read the public key and build a verifier.
    pub fn load_verifier(&self) -> Result<Verifier, ConfigError> {
        let path = self
            .public_key_path
            .as_deref()
            .ok_or(ConfigError::Missing("public_key_path"))?;
        Ok(Verifier::new(read_pem(path)?)?)
    }

    /// Claims to issue at `now`, valid for `expires_in_secs`.
    pub fn claims(&self, now: i64) -> SimpleClaims {
        SimpleClaims::new(
            self.token_use.clone(),
            self.issuer.clone(),
            self.client_id.clone(),
            now,
            self.expires_in_secs,
        )
    }

    /// Expectations to verify against.
    pub fn expectations(&self) -> SimpleClaims {
        SimpleClaims::expecting(
            self.issuer.clone(),
            self.client_id.clone(),
            self.token_use.clone(),
        )
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    tracing::debug!("Reading key material from {}", path.display());
    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
