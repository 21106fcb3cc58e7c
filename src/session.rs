//! Login credentials and their on-disk store.
//!
//! `Credentials` is passed explicitly to every backend call. The store is only
//! touched at the CLI edge: `login` writes it, `logout` removes it, and every
//! authenticated command loads it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::paths::session_path;
use crate::types::Role;

/// An authenticated session. The token is opaque to the client.
pub struct Credentials {
    pub email: String,
    token: SecretBox<String>,
    pub role: Role,
}

impl Credentials {
    pub fn new(email: impl Into<String>, token: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            token: SecretBox::new(Box::new(token.into())),
            role,
        }
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(DeskError::RoleRequired(role.to_string()))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct SessionFile {
    email: String,
    token: String,
    role: Role,
}

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(session_path())
    }
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if any
    pub fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let file: SessionFile = serde_yaml_ng::from_str(&content)?;
        Ok(Some(Credentials::new(file.email, file.token, file.role)))
    }

    /// The stored session, or `NotLoggedIn`
    pub fn require(&self) -> Result<Credentials> {
        self.load()?.ok_or(DeskError::NotLoggedIn)
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = SessionFile {
            email: credentials.email.clone(),
            token: credentials.token().to_string(),
            role: credentials.role,
        };
        fs::write(&self.path, serde_yaml_ng::to_string(&file)?)?;
        crate::utils::restrict_permissions(&self.path)?;

        tracing::debug!("Saved session for {}", credentials.email);
        Ok(())
    }

    /// Remove the stored session. Returns false when there was none.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}
