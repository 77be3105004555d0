//! Property-based tests for sibling ordering

use proptest::prelude::*;

use taskboard::shared::ordering::{
    append, checked_rank, insert_at, is_dense, remove, reposition, transfer, ShiftSet, Sibling,
};

/// Dense scope of `n` siblings with ids `base..base + n`
fn scope(base: u32, n: usize) -> Vec<Sibling<u32>> {
    (0..n).map(|rank| Sibling::new(base + rank as u32, rank)).collect()
}

fn ordered_ids(siblings: &[Sibling<u32>]) -> Vec<u32> {
    let mut sorted = siblings.to_vec();
    sorted.sort_by_key(|s| s.rank);
    sorted.into_iter().map(|s| s.id).collect()
}

#[derive(Debug, Clone)]
enum Op {
    Append { scope: usize },
    Insert { scope: usize, at: usize },
    Reposition { scope: usize, pick: usize, to: usize },
    Remove { scope: usize, pick: usize },
    Transfer { from: usize, pick: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..2usize).prop_map(|scope| Op::Append { scope }),
        (0..2usize, 0..16usize).prop_map(|(scope, at)| Op::Insert { scope, at }),
        (0..2usize, 0..16usize, 0..16usize).prop_map(|(scope, pick, to)| Op::Reposition {
            scope,
            pick,
            to
        }),
        (0..2usize, 0..16usize).prop_map(|(scope, pick)| Op::Remove { scope, pick }),
        (0..2usize, 0..16usize).prop_map(|(from, pick)| Op::Transfer { from, pick }),
    ]
}

/// Two scopes driven only through the ordering functions
struct Model {
    scopes: [Vec<Sibling<u32>>; 2],
    next_id: u32,
}

impl Model {
    fn new() -> Self {
        Self {
            scopes: [scope(0, 3), scope(100, 2)],
            next_id: 1000,
        }
    }

    fn fresh_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn apply(&mut self, op: Op) {
        match op {
            Op::Append { scope } => {
                let id = self.fresh_id();
                let rank = append(self.scopes[scope].len());
                self.scopes[scope].push(Sibling::new(id, rank));
            }
            Op::Insert { scope, at } => {
                let at = at % (self.scopes[scope].len() + 1);
                let shift = insert_at(&self.scopes[scope], at).unwrap();
                shift.apply_to(&mut self.scopes[scope]);
                let id = self.fresh_id();
                self.scopes[scope].push(Sibling::new(id, at));
            }
            Op::Reposition { scope, pick, to } => {
                let n = self.scopes[scope].len();
                if n == 0 {
                    return;
                }
                let id = self.scopes[scope][pick % n].id;
                let shift = reposition(&self.scopes[scope], &id, to % n).unwrap();
                shift.apply_to(&mut self.scopes[scope]);
            }
            Op::Remove { scope, pick } => {
                let n = self.scopes[scope].len();
                if n == 0 {
                    return;
                }
                let removed = self.scopes[scope].remove(pick % n);
                remove(&self.scopes[scope], removed.rank).apply_to(&mut self.scopes[scope]);
            }
            Op::Transfer { from, pick } => {
                let to = 1 - from;
                let n = self.scopes[from].len();
                if n == 0 {
                    return;
                }
                let id = self.scopes[from][pick % n].id;
                let moved = transfer(&self.scopes[from], self.scopes[to].len(), &id).unwrap();
                self.scopes[from].retain(|s| s.id != id);
                moved.old_scope.apply_to(&mut self.scopes[from]);
                self.scopes[to].push(Sibling::new(id, moved.new_rank));
            }
        }
    }
}

proptest! {
    #[test]
    fn test_any_operation_sequence_keeps_scopes_dense(ops in prop::collection::vec(op(), 0..64)) {
        let mut model = Model::new();
        for op in ops {
            model.apply(op.clone());
            prop_assert!(is_dense(&model.scopes[0]), "scope 0 after {:?}: {:?}", op, model.scopes[0]);
            prop_assert!(is_dense(&model.scopes[1]), "scope 1 after {:?}: {:?}", op, model.scopes[1]);
        }
    }

    #[test]
    fn test_reposition_round_trip_restores_ranks(n in 1..20usize, a in 0..20usize, b in 0..20usize) {
        let (a, b) = (a % n, b % n);
        let original = scope(0, n);
        let id = original[a].id;

        let mut moved = original.clone();
        reposition(&moved, &id, b).unwrap().apply_to(&mut moved);
        prop_assert_eq!(moved.iter().find(|s| s.id == id).map(|s| s.rank), Some(b));

        reposition(&moved, &id, a).unwrap().apply_to(&mut moved);
        prop_assert_eq!(moved, original);
    }

    #[test]
    fn test_reposition_to_current_rank_is_empty(n in 1..20usize, r in 0..20usize) {
        let siblings = scope(0, n);
        let r = r % n;
        prop_assert!(reposition(&siblings, &siblings[r].id, r).unwrap().is_empty());
    }

    #[test]
    fn test_remove_shifts_exactly_the_tail(n in 1..20usize, k in 0..20usize) {
        let siblings = scope(0, n);
        let k = k % n;
        let shift = remove(&siblings, k);

        prop_assert_eq!(shift.len(), n - k - 1);
        for update in shift.iter() {
            let old = siblings.iter().find(|s| s.id == update.id).unwrap().rank;
            prop_assert!(old > k);
            prop_assert_eq!(update.rank, old - 1);
        }
    }

    #[test]
    fn test_transfer_compacts_old_and_appends_new(n_old in 1..20usize, r in 0..20usize, n_new in 0..20usize) {
        let old = scope(0, n_old);
        let r = r % n_old;
        let moved = transfer(&old, n_new, &old[r].id).unwrap();

        prop_assert_eq!(moved.new_rank, n_new);
        prop_assert_eq!(moved.old_scope.len(), n_old - r - 1);
        prop_assert_eq!(moved.old_scope.rank_of(&old[r].id), None);
    }

    #[test]
    fn test_checked_rank_never_clamps(requested in -50i64..50, max in 0..20usize) {
        match checked_rank(requested, max) {
            Ok(rank) => prop_assert_eq!(rank as i64, requested),
            Err(_) => prop_assert!(requested < 0 || requested as usize > max),
        }
    }

    #[test]
    fn test_insert_preserves_relative_order(n in 0..20usize, at in 0..21usize) {
        let mut siblings = scope(0, n);
        let at = at % (n + 1);
        let before = ordered_ids(&siblings);

        insert_at(&siblings, at).unwrap().apply_to(&mut siblings);
        siblings.push(Sibling::new(999, at));
        prop_assert!(is_dense(&siblings));

        let after: Vec<u32> = ordered_ids(&siblings).into_iter().filter(|id| *id != 999).collect();
        prop_assert_eq!(after, before);
    }
}

#[test]
fn test_chained_shift_sets_apply_in_order() {
    let siblings = scope(0, 4);
    let first: ShiftSet<u32> = reposition(&siblings, &0, 3).unwrap();
    let mut after_first = siblings.clone();
    first.apply_to(&mut after_first);
    let second = reposition(&after_first, &3, 0).unwrap();

    let mut chained = siblings.clone();
    first.clone().then(second.clone()).apply_to(&mut chained);
    let mut stepwise = after_first;
    second.apply_to(&mut stepwise);

    assert_eq!(ordered_ids(&chained), ordered_ids(&stepwise));
}
