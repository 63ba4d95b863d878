//! Tenant Directory Manager.
//!
//! Maps a user identifier to an isolated storage root. Top-level directory
//! names are derived from a hash of the user identifier, not the literal
//! identifier, so storage stays balanced as the population grows:
//!
//! ```text
//! {root}/shards/{blake3(user-id be-bytes)[0] as two hex digits}/u{user-id}/
//! ```
//!
//! Two distinct users may shard to the same bucket; the literal-id leaf
//! directory disambiguates them, and deleting one user's leaf never touches
//! a sibling leaf in the same bucket.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use satchel_core::defaults::TENANT_FAN_OUT;
use satchel_core::{Result, UserId};

use crate::fsio;

/// Two-level tenant directory layout under one store root.
pub struct TenantDirs {
    root: PathBuf,
}

impl TenantDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root this manager serves.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shard bucket for a user: first 8 bytes of the blake3 digest of the
    /// identifier's big-endian bytes, reduced modulo the fan-out.
    pub fn shard_of(user: UserId) -> u64 {
        let digest = blake3::hash(&user.to_be_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_be_bytes(prefix) % TENANT_FAN_OUT
    }

    /// Storage root for a user. The path is stable whether or not the
    /// directory exists yet.
    pub fn root_for(&self, user: UserId) -> PathBuf {
        self.root
            .join("shards")
            .join(format!("{:02x}", Self::shard_of(user)))
            .join(format!("u{}", user))
    }

    /// Create a user's storage subtree.
    pub fn create_user(&self, user: UserId) -> Result<PathBuf> {
        let path = self.root_for(user);
        fs::create_dir_all(&path)?;
        debug!(user, path = %path.display(), "tenants: created");
        Ok(path)
    }

    /// Delete a user's storage subtree. Only the user's own leaf directory
    /// is removed; sibling leaves in the same shard bucket are untouched.
    pub fn delete_user(&self, user: UserId) -> Result<()> {
        let path = self.root_for(user);
        fsio::remove_tree(&path)?;
        debug!(user, path = %path.display(), "tenants: deleted");
        Ok(())
    }

    /// Enumerate the user ids that have a storage subtree, by walking the
    /// two-level layout. Foreign entries are skipped with a warning.
    pub fn scan_users(&self) -> Result<Vec<UserId>> {
        let shards = self.root.join("shards");
        let mut users = Vec::new();
        let buckets = match fs::read_dir(&shards) {
            Ok(iter) => iter,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(users),
            Err(e) => return Err(e.into()),
        };
        for bucket in buckets {
            let bucket = bucket?;
            if !bucket.file_type()?.is_dir() {
                continue;
            }
            for leaf in fs::read_dir(bucket.path())? {
                let leaf = leaf?;
                let name = leaf.file_name();
                let name = name.to_string_lossy();
                match name.strip_prefix('u').and_then(|s| s.parse::<u64>().ok()) {
                    Some(user) => users.push(user),
                    None => {
                        warn!(entry = %name, "tenants: skipping foreign directory entry");
                    }
                }
            }
        }
        users.sort_unstable();
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_is_stable_and_bounded() {
        for user in [1u64, 2, 3, 1000, u64::MAX] {
            let shard = TenantDirs::shard_of(user);
            assert_eq!(shard, TenantDirs::shard_of(user));
            assert!(shard < TENANT_FAN_OUT);
        }
    }

    #[test]
    fn test_root_for_embeds_literal_id_in_leaf() {
        let dirs = TenantDirs::new("/tmp/satchel");
        let path = dirs.root_for(42);
        assert!(path.ends_with(format!("u{}", 42)));
    }

    #[test]
    fn test_delete_leaves_bucket_siblings_alone() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = TenantDirs::new(dir.path());

        // Find two users that land in the same shard bucket.
        let a = 1u64;
        let b = (2..10_000u64)
            .find(|b| TenantDirs::shard_of(*b) == TenantDirs::shard_of(a))
            .expect("some user collides within the fan-out");

        let root_a = dirs.create_user(a).unwrap();
        let root_b = dirs.create_user(b).unwrap();
        std::fs::write(root_b.join("catalog.json"), b"{}").unwrap();

        dirs.delete_user(a).unwrap();
        assert!(!root_a.exists());
        assert!(root_b.join("catalog.json").exists());
    }

    #[test]
    fn test_scan_users_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = TenantDirs::new(dir.path());
        for user in [3u64, 17, 400] {
            dirs.create_user(user).unwrap();
        }
        assert_eq!(dirs.scan_users().unwrap(), vec![3, 17, 400]);
    }
}
