//! Persisted login session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `login` stores the bearer token in a small JSON file; every later command
//! reads it back and hands it to the API client. The token's payload also
//! carries the user and company identity shown by `whoami` and used to scope
//! account listings. The client cannot verify the signature (the secret is
//! server-side), so claims are decoded for display only.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::path::{Path, PathBuf};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token payload could not be decoded: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

/// Identity claims the backend puts in the token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    pub usuario_id: String,
    #[serde(default)]
    pub empresa_nome: String,
    #[serde(default)]
    pub empresa_id: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Whether `exp` is set and not after `now` (unix seconds).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }
}

impl Session {
    /// Decode the token payload without verifying its signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a well-formed JWT or the payload
    /// lacks `usuario_id`.
    pub fn claims(&self) -> Result<TokenClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        let data = jsonwebtoken::decode::<TokenClaims>(&self.token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(data.claims)
    }
}

/// File-backed session storage.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let rendered = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, rendered)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Forget the stored session. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
