//! # satchel-core
//!
//! Core types, traits, and pure algorithms for the satchel document store.
//!
//! This crate provides the foundational data structures, the error type, the
//! set-algebra filter pipeline, and the injected-service traits (clock,
//! hasher, cipher) that the store crate depends on. Nothing here touches
//! storage.

pub mod cipher;
pub mod clock;
pub mod dedup;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod hash;
pub mod models;
pub mod uuid_utils;
pub mod validate;

// Re-export commonly used types at crate root
pub use cipher::{Cipher, NullCipher};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dedup::duplicate_score;
pub use error::{Error, Result};
pub use filter::{
    combine_and, combine_or, combine_xor, filter_within, filter_without, invert, IdSet, MatchMode,
};
pub use hash::{sha256_hex, Blake3Hasher, ContentHasher};
pub use models::*;
pub use uuid_utils::{document_uuid, DOCUMENT_NAMESPACE};
