//! Property-based tests for pane tree edits
//!
//! Every tree reachable from a single leaf through split, close, resize and
//! resolve must stay structurally valid.

use std::collections::HashSet;

use proptest::prelude::*;
use tessera_core::pane::{
    LeafKind, MIN_PANE_PERCENT, NodeId, PaneNode, SIZE_EPSILON, SequentialIdGenerator,
    removed_sessions,
};

use super::strategies::{
    RESIZE_EXTENT, apply_op, build_tree, split_direction_strategy, tree_ops_strategy,
};

fn assert_structure(tree: &PaneNode) -> Result<(), TestCaseError> {
    prop_assert!(tree.validate().is_ok(), "invalid tree: {:?}", tree.validate());
    Ok(())
}

fn split_ids(tree: &PaneNode) -> Vec<NodeId> {
    tree.node_ids()
        .into_iter()
        .filter(|id| tree.find_node(*id).is_some_and(PaneNode::is_split))
        .collect()
}

// ============================================================================
// Structural invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sizes sum to 100, splits keep two or more children and ids stay unique
    #[test]
    fn prop_edits_preserve_structure(ops in tree_ops_strategy(40)) {
        let mut ids = SequentialIdGenerator::new();
        let mut tree = build_tree(&[], &mut ids);
        for op in &ops {
            match apply_op(&tree, op, &mut ids) {
                Some(next) => {
                    assert_structure(&next)?;
                    tree = next;
                }
                None => break,
            }
        }
    }

    /// Leaf count changes only through split (+1) and close (-n)
    #[test]
    fn prop_split_adds_exactly_one_leaf(
        ops in tree_ops_strategy(20),
        node_index in 0usize..32,
        direction in split_direction_strategy(),
    ) {
        let mut ids = SequentialIdGenerator::new();
        let tree = build_tree(&ops, &mut ids);
        let node_ids = tree.node_ids();
        let target = node_ids[node_index % node_ids.len()];

        let outcome = tree.split_with_pending(target, direction, &mut ids);
        prop_assert!(outcome.inserted);
        prop_assert_eq!(outcome.tree.leaf_count(), tree.leaf_count() + 1);
        prop_assert!(outcome.tree.is_pending_leaf(outcome.pending_id));
        assert_structure(&outcome.tree)?;
    }
}

// ============================================================================
// Round trips and no-ops
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Splitting any node then closing the new pending leaf restores the tree
    #[test]
    fn prop_split_then_close_is_identity(
        ops in tree_ops_strategy(20),
        node_index in 0usize..32,
        direction in split_direction_strategy(),
    ) {
        let mut ids = SequentialIdGenerator::new();
        let tree = build_tree(&ops, &mut ids);
        let node_ids = tree.node_ids();
        let target = node_ids[node_index % node_ids.len()];

        let outcome = tree.split_with_pending(target, direction, &mut ids);
        let restored = outcome.tree.close_node(outcome.pending_id);
        prop_assert_eq!(restored.as_ref(), Some(&tree));
    }

    /// Closing an id that is not in the tree returns an equal tree
    #[test]
    fn prop_close_unknown_is_noop(ops in tree_ops_strategy(20), stray in any::<u128>()) {
        let mut ids = SequentialIdGenerator::starting_at(1 << 64);
        let tree = build_tree(&ops, &mut ids);
        let stray = NodeId::from_uuid(uuid::Uuid::from_u128(stray % (1 << 63)));
        prop_assume!(!tree.contains(stray));

        let closed = tree.close_node(stray);
        prop_assert_eq!(closed.as_ref(), Some(&tree));
        prop_assert_eq!(&tree.resize_split(stray, 0, 50.0, RESIZE_EXTENT), &tree);
        prop_assert_eq!(
            &tree.replace_pending_with_terminal(stray, tessera_core::SessionId::new("x").unwrap()),
            &tree
        );
    }

    /// Closing the same node twice only changes the tree once
    #[test]
    fn prop_close_twice_is_idempotent(ops in tree_ops_strategy(20), node_index in 0usize..32) {
        let mut ids = SequentialIdGenerator::new();
        let tree = build_tree(&ops, &mut ids);
        let node_ids = tree.node_ids();
        let target = node_ids[node_index % node_ids.len()];

        match tree.close_node(target) {
            Some(once) => {
                prop_assert!(!once.contains(target));
                let twice = once.close_node(target);
                prop_assert_eq!(twice.as_ref(), Some(&once));
            }
            None => prop_assert_eq!(target, tree.id()),
        }
    }

    /// Resolution replaces pending leaves only and never moves ids
    #[test]
    fn prop_resolve_keeps_node_ids(ops in tree_ops_strategy(30)) {
        let mut ids = SequentialIdGenerator::new();
        let tree = build_tree(&ops, &mut ids);
        let pending = tree.collect_leaf_ids(LeafKind::Pending);

        let mut resolved = tree.clone();
        for (n, pending_id) in pending.iter().enumerate() {
            let session = tessera_core::SessionId::new(format!("r{n}")).unwrap();
            resolved = resolved.replace_pending_with_terminal(*pending_id, session);
        }

        prop_assert_eq!(resolved.node_ids(), tree.node_ids());
        prop_assert!(resolved.collect_leaf_ids(LeafKind::Pending).is_empty());
        let terminals = tree.collect_leaf_ids(LeafKind::Terminal).len();
        prop_assert_eq!(
            resolved.collect_leaf_ids(LeafKind::Terminal).len(),
            terminals + pending.len()
        );
    }
}

// ============================================================================
// Resize and teardown
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A split whose panes are all at or above the floor stays there
    #[test]
    fn prop_resize_respects_floor(
        ops in tree_ops_strategy(20),
        split_index in 0usize..16,
        handle in 0usize..4,
        delta in -2000.0f64..2000.0,
    ) {
        let mut ids = SequentialIdGenerator::new();
        let tree = build_tree(&ops, &mut ids);
        let splits = split_ids(&tree);
        prop_assume!(!splits.is_empty());
        let split_id = splits[split_index % splits.len()];
        let before = tree.find_node(split_id).and_then(PaneNode::as_split).unwrap();
        prop_assume!(before.sizes().iter().all(|s| *s >= MIN_PANE_PERCENT - SIZE_EPSILON));

        let resized = tree.resize_split(split_id, handle, delta, RESIZE_EXTENT);
        assert_structure(&resized)?;
        let after = resized.find_node(split_id).and_then(PaneNode::as_split).unwrap();
        for size in after.sizes() {
            prop_assert!(*size >= MIN_PANE_PERCENT - SIZE_EPSILON, "size {} below floor", size);
        }
    }

    /// The teardown diff lists exactly the sessions that disappeared
    #[test]
    fn prop_removed_sessions_matches_set_difference(
        ops in tree_ops_strategy(30),
        node_index in 0usize..32,
    ) {
        let mut ids = SequentialIdGenerator::new();
        let tree = build_tree(&ops, &mut ids);
        let node_ids = tree.node_ids();
        let target = node_ids[node_index % node_ids.len()];
        let next = tree.close_node(target);

        let removed = removed_sessions(&tree, next.as_ref());
        let remaining: HashSet<_> = next
            .as_ref()
            .map(|t| t.all_session_ids().into_iter().collect())
            .unwrap_or_default();
        let expected: HashSet<_> = tree
            .all_session_ids()
            .into_iter()
            .filter(|s| !remaining.contains(s))
            .collect();

        let removed_set: HashSet<_> = removed.iter().cloned().collect();
        prop_assert_eq!(removed_set.len(), removed.len(), "duplicates in {:?}", removed);
        prop_assert_eq!(removed_set, expected);
    }
}
