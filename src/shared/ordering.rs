//! Sibling Ordering
//!
//! This module maintains the dense integer ranks of entities that share a
//! parent: columns within a board, cards within a column. It is pure
//! arithmetic over a snapshot of `(id, rank)` pairs and performs no I/O.
//! Every operation returns a [`ShiftSet`]: the `(id, new rank)` pairs the
//! caller must persist, as one unit, to keep the scope dense.
//!
//! # Density
//!
//! A scope of `n` siblings is dense when its ranks are exactly `0..n`, with
//! no gaps and no duplicates. Each operation assumes a dense snapshot and
//! leaves the scope dense once its shift set is applied. Scopes that were
//! corrupted by earlier writers can be repaired with [`compact`].
//!
//! # Operations
//!
//! - [`append`] - rank for a new entity at the end of the scope
//! - [`insert_at`] - make room for a new entity at a given rank
//! - [`reposition`] - move one entity to a target rank
//! - [`remove`] - close the gap left by a deleted entity
//! - [`transfer`] - move an entity to the end of another scope
//!
//! # Example
//!
//! ```rust
//! use taskboard::shared::ordering::{reposition, Sibling};
//!
//! let siblings = vec![
//!     Sibling::new('A', 0),
//!     Sibling::new('B', 1),
//!     Sibling::new('C', 2),
//!     Sibling::new('D', 3),
//! ];
//! let shift = reposition(&siblings, &'A', 3).unwrap();
//! assert_eq!(shift.rank_of(&'A'), Some(3));
//! assert_eq!(shift.rank_of(&'B'), Some(0));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One member of a sibling scope as seen by the ordering functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sibling<Id> {
    pub id: Id,
    pub rank: usize,
}

impl<Id> Sibling<Id> {
    pub fn new(id: Id, rank: usize) -> Self {
        Self { id, rank }
    }
}

/// A single rank assignment to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankUpdate<Id> {
    pub id: Id,
    pub rank: usize,
}

/// The set of rank assignments produced by one ordering operation
///
/// Entries are kept in the order they were produced and each id appears at
/// most once; recording an id twice keeps the later rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSet<Id> {
    updates: Vec<RankUpdate<Id>>,
}

impl<Id> Default for ShiftSet<Id> {
    fn default() -> Self {
        Self {
            updates: Vec::new(),
        }
    }
}

impl<Id: Clone + PartialEq> ShiftSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new rank for `id`, replacing any earlier entry for it
    pub fn assign(&mut self, id: Id, rank: usize) {
        match self.updates.iter_mut().find(|u| u.id == id) {
            Some(existing) => existing.rank = rank,
            None => self.updates.push(RankUpdate { id, rank }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankUpdate<Id>> {
        self.updates.iter()
    }

    /// New rank recorded for `id`, if any
    pub fn rank_of(&self, id: &Id) -> Option<usize> {
        self.updates.iter().find(|u| &u.id == id).map(|u| u.rank)
    }

    /// Drop the entry for `id`
    ///
    /// Used when the entity is deleted in the same write, so no rank is
    /// persisted for it.
    pub fn without(mut self, id: &Id) -> Self {
        self.updates.retain(|u| &u.id != id);
        self
    }

    /// Chain two shift sets computed one after the other
    ///
    /// `later` must have been computed against the snapshot produced by
    /// applying `self`; its entries win on conflicts.
    pub fn then(mut self, later: ShiftSet<Id>) -> Self {
        for update in later.updates {
            self.assign(update.id, update.rank);
        }
        self
    }

    /// Apply the shift set to an in-memory snapshot
    pub fn apply_to(&self, siblings: &mut [Sibling<Id>]) {
        for sibling in siblings.iter_mut() {
            if let Some(rank) = self.rank_of(&sibling.id) {
                sibling.rank = rank;
            }
        }
    }
}

impl<Id> IntoIterator for ShiftSet<Id> {
    type Item = RankUpdate<Id>;
    type IntoIter = std::vec::IntoIter<RankUpdate<Id>>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

/// Result of moving an entity into another scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer<Id> {
    /// Compaction of the scope the entity left
    pub old_scope: ShiftSet<Id>,
    /// Rank of the entity in the destination scope
    pub new_rank: usize,
}

/// Ordering errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Requested rank lies outside the allowed range for the scope
    #[error("order {requested} is out of range (expected 0..={max})")]
    OutOfRange {
        requested: i64,
        max: usize,
    },

    /// The entity acted on is not part of the snapshot
    #[error("entity is not a member of the sibling scope")]
    NotFound,
}

/// Validate a client-supplied rank against the largest allowed value
///
/// Negative and oversized ranks are rejected, never clamped.
pub fn checked_rank(requested: i64, max: usize) -> Result<usize, OrderError> {
    usize::try_from(requested)
        .ok()
        .filter(|rank| *rank <= max)
        .ok_or(OrderError::OutOfRange { requested, max })
}

/// True when the ranks of `siblings` are exactly `0..siblings.len()`
pub fn is_dense<Id>(siblings: &[Sibling<Id>]) -> bool {
    let mut seen = vec![false; siblings.len()];
    for sibling in siblings {
        match seen.get_mut(sibling.rank) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Renumber a possibly corrupted scope to `0..n`
///
/// Siblings keep their relative order by current rank; ties keep the order
/// in which they appear in `siblings`. Only entities whose rank changes are
/// part of the result.
pub fn compact<Id: Clone + PartialEq>(siblings: &[Sibling<Id>]) -> ShiftSet<Id> {
    let mut sorted: Vec<&Sibling<Id>> = siblings.iter().collect();
    sorted.sort_by_key(|s| s.rank);

    let mut shift = ShiftSet::new();
    for (rank, sibling) in sorted.into_iter().enumerate() {
        if sibling.rank != rank {
            shift.assign(sibling.id.clone(), rank);
        }
    }
    shift
}

/// Rank for a new entity appended to a scope of `count` siblings
pub fn append(count: usize) -> usize {
    count
}

/// Open a slot at `rank` for a new entity
///
/// `rank` may equal the sibling count, which is the same as appending.
pub fn insert_at<Id: Clone + PartialEq>(
    siblings: &[Sibling<Id>],
    rank: usize,
) -> Result<ShiftSet<Id>, OrderError> {
    if rank > siblings.len() {
        return Err(OrderError::OutOfRange {
            requested: rank as i64,
            max: siblings.len(),
        });
    }

    let mut shift = ShiftSet::new();
    for sibling in siblings.iter().filter(|s| s.rank >= rank) {
        shift.assign(sibling.id.clone(), sibling.rank + 1);
    }
    Ok(shift)
}

/// Move `id` to `target`, displacing the siblings in between by one
pub fn reposition<Id: Clone + PartialEq>(
    siblings: &[Sibling<Id>],
    id: &Id,
    target: usize,
) -> Result<ShiftSet<Id>, OrderError> {
    let current = siblings
        .iter()
        .find(|s| &s.id == id)
        .map(|s| s.rank)
        .ok_or(OrderError::NotFound)?;

    let max = siblings.len() - 1;
    if target > max {
        return Err(OrderError::OutOfRange {
            requested: target as i64,
            max,
        });
    }

    let mut shift = ShiftSet::new();
    if target == current {
        return Ok(shift);
    }

    let others = siblings.iter().filter(|s| &s.id != id);
    if target > current {
        for sibling in others.filter(|s| s.rank >= current && s.rank <= target) {
            shift.assign(sibling.id.clone(), sibling.rank - 1);
        }
    } else {
        for sibling in others.filter(|s| s.rank >= target && s.rank <= current) {
            shift.assign(sibling.id.clone(), sibling.rank + 1);
        }
    }
    shift.assign(id.clone(), target);
    Ok(shift)
}

/// Close the gap left by the entity at `removed_rank`
///
/// `siblings` may still contain the removed entity; it is never part of the
/// result.
pub fn remove<Id: Clone + PartialEq>(siblings: &[Sibling<Id>], removed_rank: usize) -> ShiftSet<Id> {
    let mut shift = ShiftSet::new();
    for sibling in siblings.iter().filter(|s| s.rank > removed_rank) {
        shift.assign(sibling.id.clone(), sibling.rank - 1);
    }
    shift
}

/// Move `id` out of `old_siblings` and append it to a scope of `new_count`
pub fn transfer<Id: Clone + PartialEq>(
    old_siblings: &[Sibling<Id>],
    new_count: usize,
    id: &Id,
) -> Result<Transfer<Id>, OrderError> {
    let old_rank = old_siblings
        .iter()
        .find(|s| &s.id == id)
        .map(|s| s.rank)
        .ok_or(OrderError::NotFound)?;

    Ok(Transfer {
        old_scope: remove(old_siblings, old_rank),
        new_rank: append(new_count),
    })
}
