//! Pure set algebra over identifier sets.
//!
//! These operations are side-effect-free and never touch storage. They are
//! used to compose grouping and date-range query results: the store produces
//! [`IdSet`]s, the algebra combines them.
//!
//! NAND and NOR are not primitives. They are obtained compositionally as
//! `invert(candidates, filter_within(..., All | Any))`, which is why the
//! De Morgan equivalences between the four primitives are part of the
//! correctness contract (and tested below).

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::models::EntityId;

/// An ordered set of entity identifiers.
pub type IdSet = BTreeSet<EntityId>;

/// Retention rule used by [`filter_within`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Retain a candidate only when every aspect is applied to it (AND).
    All,
    /// Retain a candidate when at least one aspect is applied to it (OR).
    Any,
}

/// Set intersection. Commutative; an empty operand yields the empty set.
pub fn combine_and(a: &IdSet, b: &IdSet) -> IdSet {
    a.intersection(b).copied().collect()
}

/// Set union. Commutative; an empty operand yields the other operand.
pub fn combine_or(a: &IdSet, b: &IdSet) -> IdSet {
    a.union(b).copied().collect()
}

/// Symmetric difference. Commutative; an empty operand yields the other
/// operand.
pub fn combine_xor(a: &IdSet, b: &IdSet) -> IdSet {
    a.symmetric_difference(b).copied().collect()
}

/// Complement of `subset` within `universe`.
///
/// `subset` must be contained in `universe`, otherwise the call is an
/// illegal argument. An empty `subset` returns `universe` unchanged.
pub fn invert(universe: &IdSet, subset: &IdSet) -> Result<IdSet> {
    if !subset.is_subset(universe) {
        return Err(Error::IllegalArgument(
            "subset is not contained in universe".to_string(),
        ));
    }
    Ok(universe.difference(subset).copied().collect())
}

/// Retain the candidates whose applied-aspect set satisfies `mode` against
/// `aspects`. The applied-aspect set of each candidate is produced by the
/// injected `applied` lookup.
///
/// With an empty `aspects` set, `All` retains every candidate (vacuous
/// truth) and `Any` retains none.
pub fn filter_within<F>(aspects: &IdSet, candidates: &IdSet, mode: MatchMode, applied: F) -> IdSet
where
    F: Fn(EntityId) -> IdSet,
{
    candidates
        .iter()
        .copied()
        .filter(|doc| {
            let present = applied(*doc);
            match mode {
                MatchMode::All => aspects.iter().all(|a| present.contains(a)),
                MatchMode::Any => aspects.iter().any(|a| present.contains(a)),
            }
        })
        .collect()
}

/// The compositional NAND/NOR form: candidates *not* retained by
/// [`filter_within`] under `mode`.
pub fn filter_without<F>(
    aspects: &IdSet,
    candidates: &IdSet,
    mode: MatchMode,
    applied: F,
) -> Result<IdSet>
where
    F: Fn(EntityId) -> IdSet,
{
    let kept = filter_within(aspects, candidates, mode, applied);
    invert(candidates, &kept)
}
