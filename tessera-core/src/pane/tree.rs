//! Pane tree structure for workspace layouts
//!
//! This module provides the n-ary tree used to represent the layout of one
//! workspace tab. Each node is either a leaf pane (terminal, file browser,
//! or pending picker) or a split dividing its region among two or more
//! children.
//!
//! # Tree Structure
//!
//! ```text
//! Split(Vertical, [50, 50])
//! ├── Leaf(A, Terminal(s0))
//! └── Split(Horizontal, [34, 33, 33])
//!     ├── Leaf(B, FileBrowser(s1, "/srv"))
//!     ├── Leaf(C, Terminal(s2))
//!     └── Leaf(D, Pending)
//! ```
//!
//! Children are owned by value, so the tree is acyclic by construction.
//! Edits never mutate a tree in place: the algorithms in `ops` rebuild the
//! affected path and return a new value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::PaneError;
use super::types::{IdGenerator, LeafKind, NodeId, SessionId, SplitDirection};

/// Total extent that the sizes of every split add up to.
pub const FULL_EXTENT: f64 = 100.0;

/// Tolerance used when checking that sizes add up to [`FULL_EXTENT`].
pub const SIZE_EPSILON: f64 = 1e-6;

/// A node in the pane tree.
///
/// Deserialized trees are checked with [`PaneNode::validate`], so a tree
/// read back from disk meets the same invariants as one built in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawPaneNode")]
pub enum PaneNode {
    /// A pane that renders content.
    Leaf(LeafPane),
    /// A split dividing its region among ordered children.
    Split(SplitPane),
}

/// What a leaf pane displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeafContent {
    /// A live shell, SSH, Telnet or Serial session.
    Terminal {
        /// Session bound to this pane.
        session: SessionId,
    },
    /// A live file-transfer session browsing a directory.
    FileBrowser {
        /// Session bound to this pane.
        session: SessionId,
        /// Directory shown when the browser opens.
        path: String,
    },
    /// Awaiting the user's choice of what to open. Holds no session.
    Pending,
}

impl LeafContent {
    /// Creates terminal content bound to `session`.
    #[must_use]
    pub const fn terminal(session: SessionId) -> Self {
        Self::Terminal { session }
    }

    /// Creates file-browser content bound to `session`.
    #[must_use]
    pub fn file_browser(session: SessionId, path: impl Into<String>) -> Self {
        Self::FileBrowser {
            session,
            path: path.into(),
        }
    }

    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        match self {
            Self::Terminal { .. } => LeafKind::Terminal,
            Self::FileBrowser { .. } => LeafKind::FileBrowser,
            Self::Pending => LeafKind::Pending,
        }
    }

    /// Returns the bound session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionId> {
        match self {
            Self::Terminal { session } | Self::FileBrowser { session, .. } => Some(session),
            Self::Pending => None,
        }
    }

    /// Returns the browser path for file-browser content.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileBrowser { path, .. } => Some(path),
            Self::Terminal { .. } | Self::Pending => None,
        }
    }
}

/// A leaf pane in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPane {
    /// Unique identifier for this pane.
    pub id: NodeId,
    /// What the pane displays.
    pub content: LeafContent,
}

impl LeafPane {
    /// Creates a leaf with an explicit id.
    #[must_use]
    pub const fn new(id: NodeId, content: LeafContent) -> Self {
        Self { id, content }
    }

    /// Returns the leaf kind.
    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        self.content.kind()
    }

    /// Returns true if the pane is still waiting to be resolved.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.content, LeafContent::Pending)
    }

    /// Returns the bound session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionId> {
        self.content.session()
    }
}

/// A split node dividing its region among two or more children.
///
/// `sizes[i]` is the share of the main axis given to `children[i]`, as a
/// percentage. Fields are private so that every split in a tree satisfies
/// the length and sum invariants. Deserialization goes through
/// [`SplitPane::with_sizes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSplitPane")]
pub struct SplitPane {
    id: NodeId,
    direction: SplitDirection,
    children: Vec<PaneNode>,
    sizes: Vec<f64>,
}

/// Wire shape of a [`PaneNode`] before validation.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawPaneNode {
    Leaf(LeafPane),
    Split(SplitPane),
}

impl TryFrom<RawPaneNode> for PaneNode {
    type Error = PaneError;

    fn try_from(raw: RawPaneNode) -> Result<Self, Self::Error> {
        let node = match raw {
            RawPaneNode::Leaf(leaf) => Self::Leaf(leaf),
            RawPaneNode::Split(split) => Self::Split(split),
        };
        node.validate()?;
        Ok(node)
    }
}

/// Wire shape of a [`SplitPane`] before validation.
#[derive(Deserialize)]
struct RawSplitPane {
    id: NodeId,
    direction: SplitDirection,
    children: Vec<PaneNode>,
    sizes: Vec<f64>,
}

impl TryFrom<RawSplitPane> for SplitPane {
    type Error = PaneError;

    fn try_from(raw: RawSplitPane) -> Result<Self, Self::Error> {
        Self::with_sizes(raw.id, raw.direction, raw.children, raw.sizes)
    }
}

impl SplitPane {
    /// Creates a split whose children share the space evenly.
    ///
    /// # Errors
    ///
    /// Returns `PaneError::TooFewChildren` if fewer than two children are given.
    pub fn new(
        id: NodeId,
        direction: SplitDirection,
        children: Vec<PaneNode>,
    ) -> Result<Self, PaneError> {
        let sizes = even_sizes(children.len());
        Self::with_sizes(id, direction, children, sizes)
    }

    /// Creates a split with explicit proportional sizes.
    ///
    /// The sizes are renormalized so they add up to exactly 100.
    ///
    /// # Errors
    ///
    /// - `PaneError::TooFewChildren` if fewer than two children are given
    /// - `PaneError::SizeCountMismatch` if `sizes` and `children` differ in length
    /// - `PaneError::InvalidSize` if a size is negative or not finite, or all are zero
    pub fn with_sizes(
        id: NodeId,
        direction: SplitDirection,
        children: Vec<PaneNode>,
        mut sizes: Vec<f64>,
    ) -> Result<Self, PaneError> {
        if children.len() < 2 {
            return Err(PaneError::TooFewChildren {
                split: id,
                count: children.len(),
            });
        }
        if sizes.len() != children.len() {
            return Err(PaneError::SizeCountMismatch {
                split: id,
                children: children.len(),
                sizes: sizes.len(),
            });
        }
        if let Some(&bad) = sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(PaneError::InvalidSize { split: id, value: bad });
        }
        let total: f64 = sizes.iter().sum();
        if total <= 0.0 {
            return Err(PaneError::InvalidSize {
                split: id,
                value: total,
            });
        }
        normalize_sizes(&mut sizes);
        Ok(Self {
            id,
            direction,
            children,
            sizes,
        })
    }

    /// Builds a split from parts the caller has already checked.
    pub(crate) fn from_parts(
        id: NodeId,
        direction: SplitDirection,
        children: Vec<PaneNode>,
        sizes: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(children.len(), sizes.len());
        Self {
            id,
            direction,
            children,
            sizes,
        }
    }

    /// Returns the split's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the split direction.
    #[must_use]
    pub const fn direction(&self) -> SplitDirection {
        self.direction
    }

    /// Returns the children in visual order.
    #[must_use]
    pub fn children(&self) -> &[PaneNode] {
        &self.children
    }

    /// Returns the proportional sizes, one per child.
    #[must_use]
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterates over `(child, size)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&PaneNode, f64)> {
        self.children.iter().zip(self.sizes.iter().copied())
    }
}

impl PaneNode {
    /// Creates a leaf with a fresh id.
    #[must_use]
    pub fn create_leaf(ids: &mut dyn IdGenerator, content: LeafContent) -> Self {
        Self::Leaf(LeafPane::new(ids.next_id(), content))
    }

    /// Creates a pending leaf with a fresh id.
    #[must_use]
    pub fn create_pending_leaf(ids: &mut dyn IdGenerator) -> Self {
        Self::create_leaf(ids, LeafContent::Pending)
    }

    /// Creates an evenly sized split with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `PaneError::TooFewChildren` if fewer than two children are given.
    pub fn create_split(
        ids: &mut dyn IdGenerator,
        direction: SplitDirection,
        children: Vec<Self>,
    ) -> Result<Self, PaneError> {
        SplitPane::new(ids.next_id(), direction, children).map(Self::Split)
    }

    /// Returns this node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Leaf(leaf) => leaf.id,
            Self::Split(split) => split.id,
        }
    }

    /// Returns true if this is a leaf node.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns true if this is a split node.
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }

    /// Returns the leaf pane if this is a leaf node.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&LeafPane> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    /// Returns the split node if this is a split node.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitPane> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => Some(split),
        }
    }

    // ========================================================================
    // Tree Traversal Methods
    // ========================================================================

    /// Finds a node (leaf or split) by id, depth-first.
    #[must_use]
    pub fn find_node(&self, id: NodeId) -> Option<&Self> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => split.children.iter().find_map(|c| c.find_node(id)),
        }
    }

    /// Finds a leaf pane by id.
    #[must_use]
    pub fn find_leaf(&self, id: NodeId) -> Option<&LeafPane> {
        self.find_node(id).and_then(Self::as_leaf)
    }

    /// Returns true if the tree contains a node with the given id.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.find_node(id).is_some()
    }

    /// Returns every leaf in visual order (depth-first, left-to-right).
    #[must_use]
    pub fn leaves(&self) -> Vec<&LeafPane> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafPane>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf),
            Self::Split(split) => {
                for child in &split.children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Returns the ids of all leaves of `kind`, in visual order.
    #[must_use]
    pub fn collect_leaf_ids(&self, kind: LeafKind) -> Vec<NodeId> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.kind() == kind)
            .map(|leaf| leaf.id)
            .collect()
    }

    /// Returns the session ids held by leaves of `kind`, in visual order.
    ///
    /// Always empty for `LeafKind::Pending`.
    #[must_use]
    pub fn collect_session_ids(&self, kind: LeafKind) -> Vec<SessionId> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.kind() == kind)
            .filter_map(|leaf| leaf.session().cloned())
            .collect()
    }

    /// Returns every session id in the tree, terminals and file browsers alike.
    #[must_use]
    pub fn all_session_ids(&self) -> Vec<SessionId> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| leaf.session().cloned())
            .collect()
    }

    /// Returns the ids of every node, splits included, in pre-order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_node_ids(&mut ids);
        ids
    }

    fn collect_node_ids(&self, ids: &mut Vec<NodeId>) {
        ids.push(self.id());
        if let Self::Split(split) = self {
            for child in &split.children {
                child.collect_node_ids(ids);
            }
        }
    }

    /// Finds the leaf bound to `session`.
    #[must_use]
    pub fn leaf_for_session(&self, session: &SessionId) -> Option<&LeafPane> {
        self.leaves()
            .into_iter()
            .find(|leaf| leaf.session() == Some(session))
    }

    /// Returns the total number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Split(split) => split.children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Returns the depth of the tree.
    ///
    /// A single leaf has depth 0. Each level of splits adds 1 to the depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Split(split) => {
                1 + split
                    .children
                    .iter()
                    .map(Self::depth)
                    .max()
                    .unwrap_or_default()
            }
        }
    }

    /// Returns the first leaf in the tree (leftmost/topmost).
    ///
    /// `None` only for a malformed split without children.
    #[must_use]
    pub fn first_leaf(&self) -> Option<&LeafPane> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(split) => split.children.first().and_then(Self::first_leaf),
        }
    }

    /// Checks every structural invariant of the tree.
    ///
    /// Trees built through the constructors and algorithms of this crate
    /// always pass; this is meant for trees from deserialization and tests.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), PaneError> {
        let mut seen = HashSet::new();
        self.validate_into(&mut seen)
    }

    fn validate_into(&self, seen: &mut HashSet<NodeId>) -> Result<(), PaneError> {
        if !seen.insert(self.id()) {
            return Err(PaneError::DuplicateNodeId(self.id()));
        }
        let Self::Split(split) = self else {
            return Ok(());
        };
        if split.children.len() < 2 {
            return Err(PaneError::TooFewChildren {
                split: split.id,
                count: split.children.len(),
            });
        }
        if split.sizes.len() != split.children.len() {
            return Err(PaneError::SizeCountMismatch {
                split: split.id,
                children: split.children.len(),
                sizes: split.sizes.len(),
            });
        }
        if let Some(&bad) = split.sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(PaneError::InvalidSize {
                split: split.id,
                value: bad,
            });
        }
        let sum: f64 = split.sizes.iter().sum();
        if (sum - FULL_EXTENT).abs() > SIZE_EPSILON {
            return Err(PaneError::SizesNotNormalized {
                split: split.id,
                sum,
            });
        }
        split
            .children
            .iter()
            .try_for_each(|child| child.validate_into(seen))
    }
}

/// Returns `count` equal sizes adding up to 100.
#[must_use]
pub fn even_sizes(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    vec![FULL_EXTENT / count as f64; count]
}

/// Scales `sizes` in place so they add up to 100.
///
/// Leaves the slice untouched when its sum is already within
/// [`SIZE_EPSILON`] of 100, or when the sum is not positive.
pub fn normalize_sizes(sizes: &mut [f64]) {
    let total: f64 = sizes.iter().sum();
    if total <= 0.0 || !total.is_finite() || (total - FULL_EXTENT).abs() <= SIZE_EPSILON {
        return;
    }
    for size in sizes.iter_mut() {
        *size = *size * FULL_EXTENT / total;
    }
}
