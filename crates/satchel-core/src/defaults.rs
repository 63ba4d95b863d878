//! Centralized default constants for the satchel document store.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Maximum length for name-style fields (aspect/briefcase/collection names,
/// predicate labels, file and record names, credential usernames).
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length for description-style fields (aspect/briefcase/collection
/// descriptions, file narrations, version comments).
pub const MAX_DESC_LEN: usize = 2000;

/// Maximum length for URL fields (url documents, credential app urls).
pub const MAX_URL_LEN: usize = 2048;

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Pattern an account username must match: leading alphanumeric, then
/// alphanumerics, underscores, dots, or dashes, 3-32 characters total.
pub const USERNAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_.-]{2,31}$";

/// Required length of an authentication hash: SHA-256 rendered as hex.
pub const AUTH_HASH_LEN: usize = 64;

// =============================================================================
// TENANT LAYOUT
// =============================================================================

/// Number of top-level shard buckets user directories are spread across.
pub const TENANT_FAN_OUT: u64 = 256;

// =============================================================================
// BRIEFCASES
// =============================================================================

/// Name of the implicit, non-deletable default briefcase every user owns.
pub const GLOBAL_BRIEFCASE_NAME: &str = "Global";

/// Description of the Global Briefcase.
pub const GLOBAL_BRIEFCASE_DESC: &str = "Default briefcase";

// =============================================================================
// DUPLICATE DETECTION
// =============================================================================
//
// Empirical constants from observed behavior; preserved exactly rather than
// re-derived from a formula.

/// Content, name, and narration all match.
pub const DUP_SCORE_EXACT: f64 = 1.0;

/// Content and name match, narration differs.
pub const DUP_SCORE_NAME_MATCH: f64 = 0.90;

/// Content and narration match, name differs.
pub const DUP_SCORE_NARRATION_MATCH: f64 = 0.85;

/// Content matches only.
pub const DUP_SCORE_CONTENT_ONLY: f64 = 0.75;

// =============================================================================
// HASHING
// =============================================================================

/// Width of the content digest exposed to callers (blake3 as lowercase hex).
pub const CONTENT_HASH_LEN: usize = 64;
