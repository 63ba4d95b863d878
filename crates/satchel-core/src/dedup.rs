//! Heuristic duplicate scoring for same-content files.
//!
//! The version engine only scores file pairs whose content hashes match
//! exactly; different content never produces a score, regardless of name or
//! narration similarity. For a same-content pair, the four cases below are
//! exhaustive and mutually exclusive, and the numeric constants are part of
//! the contract (exact equality, not ranges).

use crate::defaults::{
    DUP_SCORE_CONTENT_ONLY, DUP_SCORE_EXACT, DUP_SCORE_NAME_MATCH, DUP_SCORE_NARRATION_MATCH,
};

/// Score a same-content file pair by name and narration agreement.
pub fn duplicate_score(name_matches: bool, narration_matches: bool) -> f64 {
    match (name_matches, narration_matches) {
        (true, true) => DUP_SCORE_EXACT,
        (true, false) => DUP_SCORE_NAME_MATCH,
        (false, true) => DUP_SCORE_NARRATION_MATCH,
        (false, false) => DUP_SCORE_CONTENT_ONLY,
    }
}
