//! Rank Maintenance for Requests
//!
//! Glue between the pure ordering functions in [`crate::shared::ordering`]
//! and the request handlers:
//!
//! - **`locks`** - per-scope mutual exclusion for read-compute-write cycles
//! - [`reconcile`] - repair of scopes that are no longer dense
//!
//! A handler locks the scope, re-reads its siblings, reconciles the snapshot
//! and only then computes the shift set for the requested change. The
//! compaction shift (if any) is chained in front of the operation's shift
//! set and written in the same transaction.

/// Per-scope locks
pub mod locks;

pub use locks::{Scope, ScopeGuard, ScopeLocks};

use uuid::Uuid;

use crate::shared::board::snapshot;
use crate::shared::ordering::{compact, is_dense};
use crate::shared::{Ranked, ShiftSet, Sibling};

/// A dense view of a sibling scope
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Siblings with their ranks after compaction
    pub siblings: Vec<Sibling<Uuid>>,
    /// Rank writes needed to make the stored scope match `siblings`
    pub repair: ShiftSet<Uuid>,
}

impl Reconciled {
    /// Rank of `id` in the dense view
    pub fn rank_of(&self, id: Uuid) -> Option<usize> {
        self.siblings.iter().find(|s| s.id == id).map(|s| s.rank)
    }

    /// Chain the repair in front of an operation's shift set
    pub fn with(&self, shift: ShiftSet<Uuid>) -> ShiftSet<Uuid> {
        self.repair.clone().then(shift)
    }
}

/// Snapshot `items` and compact it when its ranks are not `0..n`
pub fn reconcile<T: Ranked>(scope: Scope, items: &[T]) -> Reconciled {
    let mut siblings = snapshot(items);
    if is_dense(&siblings) {
        return Reconciled {
            siblings,
            repair: ShiftSet::new(),
        };
    }

    let repair = compact(&siblings);
    tracing::warn!(
        ?scope,
        siblings = siblings.len(),
        repaired = repair.len(),
        "Sibling ranks are not dense, compacting scope"
    );
    repair.apply_to(&mut siblings);
    Reconciled { siblings, repair }
}
