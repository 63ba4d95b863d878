//! # satchel-store
//!
//! Directory-backed storage layer for the satchel document store.
//!
//! This crate provides:
//! - The Identity Allocator and Tenant Directory Manager
//! - Repository implementations for all core entities, composed behind one
//!   [`Store`] facade
//! - The per-user catalog substrate: in-memory indices persisted as one
//!   atomically-rewritten JSON catalog per user, plus raw blob files for
//!   file version contents
//!
//! The engine is synchronous: no operation suspends, and mutations
//! to one user's state are fully isolated from every other user's state.
//! Concurrent writers to the *same* user are expected to be serialized by
//! the host application; the internal lock protects the index maps, not the
//! business semantics.
//!
//! ## Example
//!
//! ```rust,ignore
//! use satchel_store::Store;
//!
//! let store = Store::open("/var/lib/satchel")?;
//! let user = store.accounts.create("alice", &satchel_core::sha256_hex(b"pw"))?;
//!
//! let note = store.documents.create_note(user, "remember the milk")?;
//! let aspect = store.aspects.create(user, "errands", "")?;
//! store.aspects.apply(user, aspect, note)?;
//! ```

pub mod accounts;
pub mod aspects;
pub mod bookmarks;
pub mod briefcases;
pub mod collections;
pub mod credentials;
pub mod documents;
mod fsio;
pub mod ids;
pub mod relations;
pub mod sealing;
pub mod settings;
mod state;
pub mod tenants;
pub mod versions;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use satchel_core::{
    validate, Blake3Hasher, Cipher, Clock, ContentHasher, EntityId, Error, NullCipher, Result,
    SystemClock, UserId,
};

use crate::ids::{IdAllocator, COUNTER_FILE};
use crate::state::{UserState, CATALOG_FILE};
use crate::tenants::TenantDirs;

// Re-export core types
pub use satchel_core::*;

// Re-export repository implementations
pub use accounts::AccountRepository;
pub use aspects::AspectRepository;
pub use bookmarks::BookmarkRepository;
pub use briefcases::BriefcaseRepository;
pub use collections::CollectionRepository;
pub use credentials::CredentialRepository;
pub use documents::DocumentRepository;
pub use relations::RelationRepository;
pub use sealing::AesGcmCipher;
pub use settings::Settings;
pub use versions::VersionRepository;

/// Injected services for a store. The default wires the BLAKE3 hasher, the
/// system clock, and the pass-through cipher; hosts that encrypt credential
/// secrets at rest inject an [`AesGcmCipher`] (or their own) instead.
pub struct StoreOptions {
    pub hasher: Box<dyn ContentHasher>,
    pub clock: Box<dyn Clock>,
    pub cipher: Box<dyn Cipher>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            hasher: Box::new(Blake3Hasher),
            clock: Box::new(SystemClock),
            cipher: Box::new(NullCipher),
        }
    }
}

/// Shared context behind every repository.
pub(crate) struct StoreInner {
    pub tenants: TenantDirs,
    pub ids: IdAllocator,
    pub users: RwLock<HashMap<UserId, UserState>>,
    pub usernames: RwLock<HashMap<String, UserId>>,
    pub hasher: Box<dyn ContentHasher>,
    pub clock: Box<dyn Clock>,
    pub cipher: Box<dyn Cipher>,
}

impl StoreInner {
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run a read-only closure against a user's state.
    pub fn with_user<T>(
        &self,
        user: UserId,
        f: impl FnOnce(&UserState) -> Result<T>,
    ) -> Result<T> {
        validate::require_id("user id", user)?;
        let users = self.users.read();
        let state = users
            .get(&user)
            .ok_or_else(|| Error::NotFound(format!("user {}", user)))?;
        f(state)
    }

    /// Run a mutating closure against a copy of a user's state. The copy
    /// replaces the live index only after the catalog write lands, so a
    /// failed call leaves the store exactly as it was.
    pub fn with_user_mut<T>(
        &self,
        user: UserId,
        f: impl FnOnce(&mut UserState) -> Result<T>,
    ) -> Result<T> {
        validate::require_id("user id", user)?;
        let mut users = self.users.write();
        let live = users
            .get(&user)
            .ok_or_else(|| Error::NotFound(format!("user {}", user)))?;
        let mut draft = live.clone();
        let out = f(&mut draft)?;
        draft.save(&self.catalog_path(user))?;
        users.insert(user, draft);
        Ok(out)
    }

    pub fn catalog_path(&self, user: UserId) -> PathBuf {
        self.tenants.root_for(user).join(CATALOG_FILE)
    }

    /// Blob file holding one version of one file document.
    pub fn blob_path(&self, user: UserId, file: EntityId, version: u32) -> PathBuf {
        self.blob_dir(user, file).join(format!("v{}.bin", version))
    }

    /// Directory holding every version blob of one file document.
    pub fn blob_dir(&self, user: UserId, file: EntityId) -> PathBuf {
        self.tenants
            .root_for(user)
            .join("blobs")
            .join(file.to_string())
    }
}

/// Combined store context with all repositories.
///
/// Repositories are exposed as public fields and share the Identity
/// Allocator, Tenant Directory Manager, hasher, clock, and cipher by
/// reference.
pub struct Store {
    inner: Arc<StoreInner>,
    /// Account registry and session establishment.
    pub accounts: AccountRepository,
    /// Polymorphic document registry.
    pub documents: DocumentRepository,
    /// Many-to-many tag engine.
    pub aspects: AspectRepository,
    /// Exclusive filing engine with the per-user Global Briefcase.
    pub briefcases: BriefcaseRepository,
    /// Many-to-many folder engine.
    pub collections: CollectionRepository,
    /// Predicate registry and triple index.
    pub relations: RelationRepository,
    /// File version history, content hashing, duplicate detection.
    pub versions: VersionRepository,
    /// Flag set over document ids.
    pub bookmarks: BookmarkRepository,
    /// Credential vault.
    pub credentials: CredentialRepository,
}

impl Store {
    /// Open (or initialize) a store at `root` with default services.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(root, StoreOptions::default())
    }

    /// Open (or initialize) a store at `root` with injected services.
    pub fn open_with(root: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let ids = IdAllocator::open(root.join(COUNTER_FILE))?;
        let tenants = TenantDirs::new(root);

        let mut users = HashMap::new();
        let mut usernames = HashMap::new();
        for user in tenants.scan_users()? {
            let state = UserState::load(&tenants.root_for(user).join(CATALOG_FILE))?;
            usernames.insert(state.account.username.clone(), user);
            users.insert(user, state);
        }
        info!(users = users.len(), "store: opened");

        let inner = Arc::new(StoreInner {
            tenants,
            ids,
            users: RwLock::new(users),
            usernames: RwLock::new(usernames),
            hasher: options.hasher,
            clock: options.clock,
            cipher: options.cipher,
        });
        debug!("store: repositories wired");

        Ok(Self {
            accounts: AccountRepository::new(Arc::clone(&inner)),
            documents: DocumentRepository::new(Arc::clone(&inner)),
            aspects: AspectRepository::new(Arc::clone(&inner)),
            briefcases: BriefcaseRepository::new(Arc::clone(&inner)),
            collections: CollectionRepository::new(Arc::clone(&inner)),
            relations: RelationRepository::new(Arc::clone(&inner)),
            versions: VersionRepository::new(Arc::clone(&inner)),
            bookmarks: BookmarkRepository::new(Arc::clone(&inner)),
            credentials: CredentialRepository::new(Arc::clone(&inner)),
            inner,
        })
    }

    /// The directory this store lives in.
    pub fn root(&self) -> &std::path::Path {
        self.inner.tenants.root()
    }
}
