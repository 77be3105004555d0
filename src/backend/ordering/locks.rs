/**
 * Scope Locks
 *
 * One async mutex per sibling scope. Every rank-changing request holds the
 * lock of each scope it touches from the moment it reads the sibling
 * snapshot until its shift set is committed, so two writers never compute
 * shift sets from the same stale snapshot.
 *
 * A transfer touches two scopes; `lock_pair` always acquires them in
 * ascending scope order, which rules out lock-order deadlocks between
 * opposite transfers.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// A sibling scope: the columns of a board or the cards of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Board(Uuid),
    Column(Uuid),
}

/// Held while a scope's ranks are being rewritten
pub struct ScopeGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

/// Registry of per-scope locks
#[derive(Clone, Default)]
pub struct ScopeLocks {
    locks: Arc<Mutex<HashMap<Scope, Arc<AsyncMutex<()>>>>>,
}

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, scope: Scope) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(scope).or_default().clone()
    }

    /// Wait for exclusive access to one scope
    pub async fn lock(&self, scope: Scope) -> ScopeGuard {
        let guard = self.handle(scope).lock_owned().await;
        ScopeGuard {
            _guards: vec![guard],
        }
    }

    /// Wait for exclusive access to two scopes, in ascending order
    pub async fn lock_pair(&self, first: Scope, second: Scope) -> ScopeGuard {
        if first == second {
            return self.lock(first).await;
        }
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let low = self.handle(low).lock_owned().await;
        let high = self.handle(high).lock_owned().await;
        ScopeGuard {
            _guards: vec![low, high],
        }
    }

    /// Drop locks nobody holds or waits for
    pub fn cleanup_idle(&self) -> usize {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let before = locks.len();
        // The registry's own Arc is the only reference left for idle scopes
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }

    /// Number of scopes with a registered lock
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
