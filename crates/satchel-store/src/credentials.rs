//! Credential vault.
//!
//! Each record pairs an application url with a username and a sealed secret.
//! The combined `(app_url, username)` pair is unique per user; a bare url
//! may legitimately repeat across records as long as the usernames differ.
//! Secrets pass through the injected cipher and are stored base64-encoded
//! in the catalog.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use satchel_core::{validate, Credential, EntityId, Error, Result, UserId};

use crate::state::CredentialRow;
use crate::StoreInner;

/// Repository for credential records.
pub struct CredentialRepository {
    inner: Arc<StoreInner>,
}

impl CredentialRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Register a credential. The `(app_url, username)` pair must be unique
    /// for the owner.
    pub fn register(
        &self,
        owner: UserId,
        app_url: &str,
        username: &str,
        secret: &[u8],
    ) -> Result<EntityId> {
        validate::require_url("app url", app_url)?;
        validate::require_name("credential username", username)?;
        let sealed = self.inner.cipher.seal(secret)?;
        let id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        self.inner.with_user_mut(owner, |state| {
            if state.credential_pair_taken(app_url, username) {
                return Err(Error::DuplicateName(format!(
                    "credential '{}' at '{}'",
                    username, app_url
                )));
            }
            state.credentials.insert(
                id,
                CredentialRow {
                    id,
                    app_url: app_url.to_string(),
                    username: username.to_string(),
                    sealed_secret: BASE64.encode(&sealed),
                    created_at: now,
                },
            );
            debug!(owner, id, "credentials: registered");
            Ok(id)
        })
    }

    /// Fetch a credential record (without its secret).
    pub fn get(&self, owner: UserId, id: EntityId) -> Result<Credential> {
        validate::require_id("credential id", id)?;
        self.inner
            .with_user(owner, |state| Ok(state.credential(id)?.to_credential()))
    }

    /// All credential records of a user (without secrets), ordered by url
    /// then username.
    pub fn list(&self, owner: UserId) -> Result<Vec<Credential>> {
        self.inner.with_user(owner, |state| {
            let mut creds: Vec<_> = state
                .credentials
                .values()
                .map(CredentialRow::to_credential)
                .collect();
            creds.sort_by(|a, b| (&a.app_url, &a.username).cmp(&(&b.app_url, &b.username)));
            Ok(creds)
        })
    }

    /// Resolve a credential by its `(app_url, username)` pair.
    pub fn find(&self, owner: UserId, app_url: &str, username: &str) -> Result<Credential> {
        validate::require_url("app url", app_url)?;
        validate::require_name("credential username", username)?;
        self.inner.with_user(owner, |state| {
            state
                .credentials
                .values()
                .find(|c| c.app_url == app_url && c.username == username)
                .map(CredentialRow::to_credential)
                .ok_or_else(|| {
                    Error::NotFound(format!("credential '{}' at '{}'", username, app_url))
                })
        })
    }

    /// Open and return the secret of a credential.
    pub fn secret(&self, owner: UserId, id: EntityId) -> Result<Vec<u8>> {
        validate::require_id("credential id", id)?;
        self.inner.with_user(owner, |state| {
            let row = state.credential(id)?;
            let sealed = BASE64
                .decode(&row.sealed_secret)
                .map_err(|e| Error::Serialization(format!("sealed secret: {}", e)))?;
            self.inner.cipher.open(&sealed)
        })
    }

    /// Replace the secret of a credential.
    pub fn update_secret(&self, owner: UserId, id: EntityId, secret: &[u8]) -> Result<()> {
        validate::require_id("credential id", id)?;
        let sealed = self.inner.cipher.seal(secret)?;
        self.inner.with_user_mut(owner, |state| {
            state.credential(id)?;
            if let Some(row) = state.credentials.get_mut(&id) {
                row.sealed_secret = BASE64.encode(&sealed);
            }
            Ok(())
        })
    }

    /// Delete a credential record.
    pub fn delete(&self, owner: UserId, id: EntityId) -> Result<()> {
        validate::require_id("credential id", id)?;
        self.inner.with_user_mut(owner, |state| {
            state.credential(id)?;
            state.credentials.remove(&id);
            debug!(owner, id, "credentials: deleted");
            Ok(())
        })
    }
}
