//! Pane tree layouts
//!
//! Each tab of the client shows a tree of panes. Leaves hold a terminal, a
//! file browser or a pending placeholder waiting for its session; splits
//! lay out two or more children side by side or stacked, with percentage
//! sizes that always sum to 100.
//!
//! # Architecture
//!
//! - **Immutable updates**: every edit borrows a tree and returns a new one
//! - **N-ary splits**: closing a child redistributes the survivors evenly
//! - **Stale ids are no-ops**: edits racing with session setup never fail
//! - **Injected ids**: node ids come from an [`IdGenerator`]
//!
//! # Module Structure
//!
//! - `types` - Identifiers and enums (`NodeId`, `TabId`, `SessionId`, `LeafKind`, `SplitDirection`)
//! - `tree` - Tree structure and queries (`PaneNode`, `LeafPane`, `SplitPane`)
//! - `ops` - Split, resolve, close and resize
//! - `render` - Geometry and renderer callbacks (`LayoutRenderer`, `PaneRenderer`)
//! - `workspace` - Per-tab ownership and focus (`PaneWorkspace`)
//! - `error` - Error types (`PaneError`, `WorkspaceError`)
//!
//! # Example
//!
//! ```
//! use tessera_core::pane::{
//!     LeafContent, PaneNode, SequentialIdGenerator, SessionId, SplitDirection,
//! };
//!
//! let mut ids = SequentialIdGenerator::new();
//! let session = SessionId::new("ssh-1").unwrap();
//! let root = PaneNode::create_leaf(&mut ids, LeafContent::terminal(session));
//!
//! // Split the root; the new pane waits for its session
//! let outcome = root.split_with_pending(root.id(), SplitDirection::Vertical, &mut ids);
//! assert!(outcome.inserted);
//! assert_eq!(outcome.tree.leaf_count(), 2);
//!
//! // The session came up: bind it
//! let sftp = SessionId::new("sftp-1").unwrap();
//! let tree = outcome
//!     .tree
//!     .replace_pending_with_file_browser(outcome.pending_id, sftp, "/home");
//! assert!(!tree.is_pending_leaf(outcome.pending_id));
//!
//! // Closing it collapses the split back to the original leaf
//! let tree = tree.close_node(outcome.pending_id).unwrap();
//! assert_eq!(tree, root);
//! ```

mod error;
mod ops;
mod render;
mod tree;
mod types;
mod workspace;

pub use error::{PaneError, WorkspaceError};
pub use ops::{MIN_PANE_PERCENT, SPLIT_HALF, SplitOutcome, removed_sessions, resize_sizes};
pub use render::{
    DEFAULT_HANDLE_THICKNESS, DragHandle, LayoutRenderer, PaneLayout, PanePlacement, PaneRenderer,
    Rect, compute_layout,
};
pub use tree::{
    FULL_EXTENT, LeafContent, LeafPane, PaneNode, SIZE_EPSILON, SplitPane, even_sizes,
    normalize_sizes,
};
pub use types::{
    IdGenerator, LeafKind, NodeId, SequentialIdGenerator, SessionId, SplitDirection, TabId,
    UuidIdGenerator,
};
pub use workspace::{CloseOutcome, PaneWorkspace, SessionTerminator, TabLayout, WorkspaceResult};
