//! Account registry and session establishment.
//!
//! Creating an account provisions the user's tenant subtree and the
//! implicit, non-deletable Global Briefcase. Deleting an account removes the
//! whole subtree; sibling tenants sharing the same shard bucket are never
//! touched.

use std::sync::Arc;

use tracing::info;

use satchel_core::defaults::{GLOBAL_BRIEFCASE_DESC, GLOBAL_BRIEFCASE_NAME};
use satchel_core::{validate, Account, Briefcase, Error, Result, UserId};

use crate::state::UserState;
use crate::StoreInner;

/// Repository for user accounts.
pub struct AccountRepository {
    inner: Arc<StoreInner>,
}

impl AccountRepository {
    pub(crate) fn new(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    /// Create an account and its storage subtree. The username must match
    /// the configured pattern and be unique across the store; the auth hash
    /// must be a fixed-width hex digest.
    pub fn create(&self, username: &str, auth_hash: &str) -> Result<UserId> {
        validate::require_username(username)?;
        validate::require_auth_hash(auth_hash)?;

        let mut usernames = self.inner.usernames.write();
        if usernames.contains_key(username) {
            return Err(Error::DuplicateName(format!("username '{}'", username)));
        }

        let user = self.inner.ids.next_id()?;
        let global_id = self.inner.ids.next_id()?;
        let now = self.inner.now();
        let account = Account {
            id: user,
            username: username.to_string(),
            auth_hash: auth_hash.to_string(),
            created_at: now,
        };
        let global = Briefcase {
            id: global_id,
            name: GLOBAL_BRIEFCASE_NAME.to_string(),
            description: GLOBAL_BRIEFCASE_DESC.to_string(),
            created_at: now,
        };
        let state = UserState::new(account, global);

        self.inner.tenants.create_user(user)?;
        state.save(&self.inner.catalog_path(user))?;

        self.inner.users.write().insert(user, state);
        usernames.insert(username.to_string(), user);
        info!(user, username, "accounts: created");
        Ok(user)
    }

    /// Establish a session: resolve the username and compare the supplied
    /// auth hash. A mismatch is an authentication failure, not a lookup
    /// failure.
    pub fn authenticate(&self, username: &str, auth_hash: &str) -> Result<UserId> {
        validate::require_username(username)?;
        validate::require_auth_hash(auth_hash)?;

        let user = *self
            .inner
            .usernames
            .read()
            .get(username)
            .ok_or_else(|| Error::NotFound(format!("user '{}'", username)))?;
        self.inner.with_user(user, |state| {
            if !state.account.auth_hash.eq_ignore_ascii_case(auth_hash) {
                return Err(Error::AuthenticationFailure(format!(
                    "invalid credentials for '{}'",
                    username
                )));
            }
            Ok(user)
        })
    }

    /// Replace the account's auth hash.
    pub fn update_auth_hash(&self, user: UserId, auth_hash: &str) -> Result<()> {
        validate::require_auth_hash(auth_hash)?;
        self.inner.with_user_mut(user, |state| {
            state.account.auth_hash = auth_hash.to_string();
            Ok(())
        })
    }

    /// Fetch an account by id.
    pub fn get(&self, user: UserId) -> Result<Account> {
        self.inner.with_user(user, |state| Ok(state.account.clone()))
    }

    /// Check whether an account exists.
    pub fn exists(&self, user: UserId) -> Result<bool> {
        validate::require_id("user id", user)?;
        Ok(self.inner.users.read().contains_key(&user))
    }

    /// Number of live documents the user owns.
    pub fn document_count(&self, user: UserId) -> Result<usize> {
        self.inner.with_user(user, |state| Ok(state.documents.len()))
    }

    /// Delete an account and its entire storage subtree.
    pub fn delete(&self, user: UserId) -> Result<()> {
        validate::require_id("user id", user)?;
        let mut usernames = self.inner.usernames.write();
        let mut users = self.inner.users.write();
        let state = users
            .get(&user)
            .ok_or_else(|| Error::NotFound(format!("user {}", user)))?;
        let username = state.account.username.clone();

        self.inner.tenants.delete_user(user)?;
        users.remove(&user);
        usernames.remove(&username);
        info!(user, username, "accounts: deleted");
        Ok(())
    }
}
