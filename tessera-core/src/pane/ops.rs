//! Tree algorithms for pane layouts
//!
//! Every operation here borrows a tree and returns a brand-new one. The
//! input is never modified, so callers can keep the previous value for undo
//! or diffing. Operations that reference an unknown or stale id degrade to
//! returning an equal tree instead of failing: UI edits race with
//! asynchronous session setup, and "pane already gone" is expected.

use std::collections::HashSet;

use super::tree::{
    FULL_EXTENT, LeafContent, LeafPane, PaneNode, SplitPane, even_sizes, normalize_sizes,
};
use super::types::{IdGenerator, NodeId, SessionId, SplitDirection};

/// Smallest share, in percent, that a pane may be resized down to.
pub const MIN_PANE_PERCENT: f64 = 10.0;

/// Sizes given to the two halves of a fresh split.
pub const SPLIT_HALF: f64 = FULL_EXTENT / 2.0;

/// Result of [`PaneNode::split_with_pending`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    /// The new tree.
    pub tree: PaneNode,
    /// Id of the pending leaf created by the split.
    ///
    /// When `inserted` is false the id was allocated but never placed.
    pub pending_id: NodeId,
    /// Whether the target was found and split.
    pub inserted: bool,
}

impl PaneNode {
    // ========================================================================
    // Split
    // ========================================================================

    /// Splits the node `target` in `direction`.
    ///
    /// The target is replaced by a new split holding `[target, pending]`
    /// at `[50, 50]`. Ancestors keep their sizes. An unknown target yields
    /// an equal tree and `inserted == false`.
    #[must_use]
    pub fn split_with_pending(
        &self,
        target: NodeId,
        direction: SplitDirection,
        ids: &mut dyn IdGenerator,
    ) -> SplitOutcome {
        let pending = Self::create_pending_leaf(ids);
        let pending_id = pending.id();
        let split_id = ids.next_id();
        let mut slot = Some(pending);

        let tree = self.split_at(target, direction, split_id, &mut slot);
        let inserted = slot.is_none();
        if inserted {
            tracing::debug!(pane_id = %target, pending_id = %pending_id, %direction, "Split pane");
        } else {
            tracing::trace!(pane_id = %target, "Split target not found, tree unchanged");
        }

        SplitOutcome {
            tree,
            pending_id,
            inserted,
        }
    }

    fn split_at(
        &self,
        target: NodeId,
        direction: SplitDirection,
        split_id: NodeId,
        pending: &mut Option<Self>,
    ) -> Self {
        if self.id() == target {
            if let Some(pending) = pending.take() {
                return Self::Split(SplitPane::from_parts(
                    split_id,
                    direction,
                    vec![self.clone(), pending],
                    vec![SPLIT_HALF, SPLIT_HALF],
                ));
            }
        }
        match self {
            Self::Leaf(_) => self.clone(),
            Self::Split(split) => Self::Split(SplitPane::from_parts(
                split.id(),
                split.direction(),
                split
                    .children()
                    .iter()
                    .map(|child| child.split_at(target, direction, split_id, pending))
                    .collect(),
                split.sizes().to_vec(),
            )),
        }
    }

    // ========================================================================
    // Resolve
    // ========================================================================

    /// Turns the pending leaf `pending_id` into a terminal bound to `session`.
    ///
    /// The leaf keeps its id. If no pending leaf has that id (closed, or
    /// already resolved) the tree is returned unchanged.
    #[must_use]
    pub fn replace_pending_with_terminal(&self, pending_id: NodeId, session: SessionId) -> Self {
        self.resolve_pending(pending_id, &LeafContent::terminal(session))
    }

    /// Turns the pending leaf `pending_id` into a file browser bound to
    /// `session`, opened at `initial_path`.
    ///
    /// Same no-op rules as [`Self::replace_pending_with_terminal`].
    #[must_use]
    pub fn replace_pending_with_file_browser(
        &self,
        pending_id: NodeId,
        session: SessionId,
        initial_path: impl Into<String>,
    ) -> Self {
        self.resolve_pending(
            pending_id,
            &LeafContent::file_browser(session, initial_path),
        )
    }

    /// Returns true if `id` names a pending leaf in this tree.
    #[must_use]
    pub fn is_pending_leaf(&self, id: NodeId) -> bool {
        self.find_leaf(id).is_some_and(LeafPane::is_pending)
    }

    fn resolve_pending(&self, pending_id: NodeId, content: &LeafContent) -> Self {
        if !self.is_pending_leaf(pending_id) {
            tracing::trace!(pane_id = %pending_id, "No pending pane to resolve, tree unchanged");
            return self.clone();
        }
        tracing::debug!(pane_id = %pending_id, kind = %content.kind(), "Resolved pending pane");
        self.rebuild_pending(pending_id, content)
    }

    fn rebuild_pending(&self, pending_id: NodeId, content: &LeafContent) -> Self {
        match self {
            Self::Leaf(leaf) if leaf.id == pending_id && leaf.is_pending() => {
                Self::Leaf(LeafPane::new(leaf.id, content.clone()))
            }
            Self::Leaf(_) => self.clone(),
            Self::Split(split) => Self::Split(SplitPane::from_parts(
                split.id(),
                split.direction(),
                split
                    .children()
                    .iter()
                    .map(|child| child.rebuild_pending(pending_id, content))
                    .collect(),
                split.sizes().to_vec(),
            )),
        }
    }

    // ========================================================================
    // Close
    // ========================================================================

    /// Removes the node `target` and collapses the splits left behind.
    ///
    /// - Closing the root returns `None`: the tree is now empty.
    /// - A split left with one child is replaced by that child, all the way
    ///   up the chain.
    /// - A split that lost a direct child but keeps two or more resets its
    ///   sizes to `100 / n` each. Splits whose direct children all survive
    ///   keep their sizes.
    /// - An unknown target yields an equal tree.
    ///
    /// Targeting a split removes its whole subtree.
    #[must_use]
    pub fn close_node(&self, target: NodeId) -> Option<Self> {
        let result = self.close_at(target);
        match &result {
            None => tracing::debug!(pane_id = %target, "Closed root pane, tree is empty"),
            Some(tree) if tree.leaf_count() < self.leaf_count() => {
                tracing::debug!(pane_id = %target, "Closed pane");
            }
            Some(_) => tracing::trace!(pane_id = %target, "Close target not found, tree unchanged"),
        }
        result
    }

    fn close_at(&self, target: NodeId) -> Option<Self> {
        if self.id() == target {
            return None;
        }
        let split = match self {
            Self::Leaf(_) => return Some(self.clone()),
            Self::Split(split) => split,
        };

        let mut survivors: Vec<Self> = split
            .children()
            .iter()
            .filter_map(|child| child.close_at(target))
            .collect();
        let dropped = survivors.len() != split.child_count();

        match survivors.len() {
            0 => None,
            1 => survivors.pop(),
            count => {
                let sizes = if dropped {
                    even_sizes(count)
                } else {
                    split.sizes().to_vec()
                };
                Some(Self::Split(SplitPane::from_parts(
                    split.id(),
                    split.direction(),
                    survivors,
                    sizes,
                )))
            }
        }
    }

    // ========================================================================
    // Resize
    // ========================================================================

    /// Moves the handle between children `index` and `index + 1` of the
    /// split `split_id` by `delta_pixels`.
    ///
    /// `extent_pixels` is the split container's size along its main axis.
    /// See [`resize_sizes`] for the clamping rules. Unknown splits, an
    /// out-of-range index or a non-positive extent yield an equal tree.
    #[must_use]
    pub fn resize_split(
        &self,
        split_id: NodeId,
        index: usize,
        delta_pixels: f64,
        extent_pixels: f64,
    ) -> Self {
        if !delta_pixels.is_finite() || !extent_pixels.is_finite() || extent_pixels <= 0.0 {
            tracing::warn!(
                split_id = %split_id,
                delta_pixels,
                extent_pixels,
                "Ignoring resize with invalid geometry"
            );
            return self.clone();
        }
        let delta_percent = delta_pixels / extent_pixels * FULL_EXTENT;
        self.resize_at(split_id, index, delta_percent)
    }

    fn resize_at(&self, split_id: NodeId, index: usize, delta_percent: f64) -> Self {
        match self {
            Self::Leaf(_) => self.clone(),
            Self::Split(split) if split.id() == split_id => {
                if index >= split.child_count().saturating_sub(1) {
                    tracing::trace!(split_id = %split_id, index, "Resize handle out of range");
                    return self.clone();
                }
                Self::Split(SplitPane::from_parts(
                    split.id(),
                    split.direction(),
                    split.children().to_vec(),
                    resize_sizes(split.sizes(), index, delta_percent),
                ))
            }
            Self::Split(split) => Self::Split(SplitPane::from_parts(
                split.id(),
                split.direction(),
                split
                    .children()
                    .iter()
                    .map(|child| child.resize_at(split_id, index, delta_percent))
                    .collect(),
                split.sizes().to_vec(),
            )),
        }
    }
}

/// Applies a handle drag of `delta_percent` between `sizes[index]` and
/// `sizes[index + 1]`.
///
/// Both entries are floored at [`MIN_PANE_PERCENT`]. When one side hits the
/// floor its neighbour absorbs the overshoot, so the pair keeps its combined
/// share. The whole array is then renormalized to 100, which only changes
/// anything when the pair's share was below twice the floor. An
/// out-of-range `index` returns the sizes unchanged.
#[must_use]
pub fn resize_sizes(sizes: &[f64], index: usize, delta_percent: f64) -> Vec<f64> {
    let mut out = sizes.to_vec();
    if index >= out.len().saturating_sub(1) {
        return out;
    }

    let pair_total = out[index] + out[index + 1];
    let first = (out[index] + delta_percent).max(MIN_PANE_PERCENT);
    let second = (pair_total - first).max(MIN_PANE_PERCENT);
    out[index] = (pair_total - second).max(MIN_PANE_PERCENT);
    out[index + 1] = second;

    normalize_sizes(&mut out);
    out
}

/// Returns the sessions present in `old` but not in `new`.
///
/// `new == None` means the tree was emptied, so every session of `old` is
/// returned. This is the set the session layer must tear down after a
/// close. Each session appears once, in `old`'s visual order.
#[must_use]
pub fn removed_sessions(old: &PaneNode, new: Option<&PaneNode>) -> Vec<SessionId> {
    let mut seen: HashSet<SessionId> = new
        .map(|tree| tree.all_session_ids().into_iter().collect())
        .unwrap_or_default();
    old.all_session_ids()
        .into_iter()
        .filter(|session| seen.insert(session.clone()))
        .collect()
}
