//! Per-tab layout ownership
//!
//! [`PaneWorkspace`] owns one pane tree per tab, tracks the focused leaf and
//! forwards teardown of dropped sessions to a [`SessionTerminator`]. All
//! structural edits go through the pure operations on [`PaneNode`].

use std::collections::HashMap;

use crate::config::LayoutSettings;
use crate::tracing::span_names;

use super::error::WorkspaceError;
use super::ops::removed_sessions;
use super::render::{PaneLayout, Rect};
use super::tree::{LeafContent, PaneNode};
use super::types::{IdGenerator, NodeId, SessionId, SplitDirection, TabId};

/// Result type for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Tears down sessions whose last pane was closed.
pub trait SessionTerminator {
    /// Ends `session`. Called once per dropped session.
    fn terminate(&mut self, session: &SessionId);
}

impl<F: FnMut(&SessionId)> SessionTerminator for F {
    fn terminate(&mut self, session: &SessionId) {
        self(session);
    }
}

/// The pane tree of one tab together with its focused leaf.
///
/// `focused` always names a leaf of `root`.
#[derive(Debug, Clone, PartialEq)]
pub struct TabLayout {
    root: PaneNode,
    focused: NodeId,
}

impl TabLayout {
    /// Current tree.
    #[must_use]
    pub const fn root(&self) -> &PaneNode {
        &self.root
    }

    /// Focused leaf.
    #[must_use]
    pub const fn focused(&self) -> NodeId {
        self.focused
    }

    fn replace_root(&mut self, root: PaneNode) {
        self.root = root;
        if self.root.find_leaf(self.focused).is_none() {
            if let Some(leaf) = self.root.first_leaf() {
                tracing::debug!(pane_id = %leaf.id, "Focus moved to first pane");
                self.focused = leaf.id;
            }
        }
    }
}

/// What a close did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseOutcome {
    /// Sessions that no longer appear in the tab and were terminated.
    pub removed_sessions: Vec<SessionId>,
    /// Whether the tab was emptied and removed.
    pub tab_closed: bool,
}

/// Owns the layouts of all open tabs.
pub struct PaneWorkspace {
    settings: LayoutSettings,
    ids: Box<dyn IdGenerator>,
    terminator: Box<dyn SessionTerminator>,
    tabs: HashMap<TabId, TabLayout>,
    /// Tab ids in opening order.
    order: Vec<TabId>,
}

impl std::fmt::Debug for PaneWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneWorkspace")
            .field("settings", &self.settings)
            .field("tabs", &self.order.len())
            .finish_non_exhaustive()
    }
}

impl PaneWorkspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new(
        settings: LayoutSettings,
        ids: Box<dyn IdGenerator>,
        terminator: Box<dyn SessionTerminator>,
    ) -> Self {
        Self {
            settings,
            ids,
            terminator,
            tabs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Layout settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Open tabs in opening order.
    #[must_use]
    pub fn tab_ids(&self) -> &[TabId] {
        &self.order
    }

    /// Number of open tabs.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.order.len()
    }

    /// Layout of `tab`, if open.
    #[must_use]
    pub fn tab(&self, tab: TabId) -> Option<&TabLayout> {
        self.tabs.get(&tab)
    }

    /// Opens a tab holding a single leaf with `content` and focuses it.
    pub fn open_tab(&mut self, content: LeafContent) -> TabId {
        let tab = TabId::new();
        let _span = tracing::debug_span!(span_names::TAB_OPEN, tab_id = %tab).entered();
        let root = PaneNode::create_leaf(self.ids.as_mut(), content);
        let focused = root.id();
        self.tabs.insert(tab, TabLayout { root, focused });
        self.order.push(tab);
        tracing::info!(tab_id = %tab, pane_id = %focused, "Opened tab");
        tab
    }

    /// Splits the focused leaf of `tab` in `direction`.
    ///
    /// Returns the id of the new pending leaf. Focus moves to it when
    /// `focus_new_pane` is set.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn split(&mut self, tab: TabId, direction: SplitDirection) -> WorkspaceResult<NodeId> {
        let focus_new = self.settings.focus_new_pane;
        let layout = self
            .tabs
            .get_mut(&tab)
            .ok_or(WorkspaceError::TabNotFound(tab))?;
        let _span = tracing::debug_span!(
            span_names::PANE_SPLIT,
            tab_id = %tab,
            pane_id = %layout.focused,
            %direction
        )
        .entered();

        let outcome = layout
            .root
            .split_with_pending(layout.focused, direction, self.ids.as_mut());
        layout.replace_root(outcome.tree);
        if focus_new && outcome.inserted {
            layout.focused = outcome.pending_id;
        }
        Ok(outcome.pending_id)
    }

    /// Splits the focused leaf of `tab` in the configured initial direction.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn split_default(&mut self, tab: TabId) -> WorkspaceResult<NodeId> {
        self.split(tab, self.settings.initial_direction)
    }

    /// Closes `node` in `tab` and terminates the sessions it dropped.
    ///
    /// `node` may be a leaf or a split, in which case its whole subtree goes.
    /// Closing a node that is no longer in the tree succeeds with an empty
    /// outcome. When the tree empties the tab is removed.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn close(&mut self, tab: TabId, node: NodeId) -> WorkspaceResult<CloseOutcome> {
        let layout = self
            .tabs
            .get_mut(&tab)
            .ok_or(WorkspaceError::TabNotFound(tab))?;
        let _span =
            tracing::debug_span!(span_names::PANE_CLOSE, tab_id = %tab, pane_id = %node).entered();

        if !layout.root.contains(node) {
            tracing::trace!(pane_id = %node, "Close target already gone");
            return Ok(CloseOutcome::default());
        }

        let next = layout.root.close_node(node);
        let removed = removed_sessions(&layout.root, next.as_ref());
        let tab_closed = match next {
            Some(root) => {
                layout.replace_root(root);
                false
            }
            None => {
                self.remove_tab(tab);
                true
            }
        };

        self.terminate_all(&removed);
        Ok(CloseOutcome {
            removed_sessions: removed,
            tab_closed,
        })
    }

    /// Closes the focused leaf of `tab`.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn close_focused(&mut self, tab: TabId) -> WorkspaceResult<CloseOutcome> {
        let focused = self
            .tabs
            .get(&tab)
            .ok_or(WorkspaceError::TabNotFound(tab))?
            .focused;
        self.close(tab, focused)
    }

    /// Moves focus to `leaf`.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open and
    /// `WorkspaceError::PaneNotFound` if `leaf` is not a leaf of it.
    pub fn focus(&mut self, tab: TabId, leaf: NodeId) -> WorkspaceResult<()> {
        let layout = self
            .tabs
            .get_mut(&tab)
            .ok_or(WorkspaceError::TabNotFound(tab))?;
        if layout.root.find_leaf(leaf).is_none() {
            return Err(WorkspaceError::PaneNotFound(leaf));
        }
        layout.focused = leaf;
        tracing::trace!(tab_id = %tab, pane_id = %leaf, "Focused pane");
        Ok(())
    }

    /// Drags handle `index` of split `split_id` by `delta_pixels`.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open and
    /// `WorkspaceError::PaneNotFound` if `split_id` is not a split of it.
    pub fn resize(
        &mut self,
        tab: TabId,
        split_id: NodeId,
        index: usize,
        delta_pixels: f64,
        extent_pixels: f64,
    ) -> WorkspaceResult<()> {
        let layout = self
            .tabs
            .get_mut(&tab)
            .ok_or(WorkspaceError::TabNotFound(tab))?;
        if !layout.root.find_node(split_id).is_some_and(PaneNode::is_split) {
            return Err(WorkspaceError::PaneNotFound(split_id));
        }
        let _span = tracing::trace_span!(
            span_names::PANE_RESIZE,
            tab_id = %tab,
            split_id = %split_id,
            index
        )
        .entered();
        let root = layout
            .root
            .resize_split(split_id, index, delta_pixels, extent_pixels);
        layout.replace_root(root);
        Ok(())
    }

    /// Binds the pending leaf `pending_id` to a terminal session.
    ///
    /// Returns false when the pending leaf was closed or resolved before the
    /// session came up. The caller owns `session` in that case.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn resolve_terminal(
        &mut self,
        tab: TabId,
        pending_id: NodeId,
        session: SessionId,
    ) -> WorkspaceResult<bool> {
        self.resolve(tab, pending_id, |root| {
            root.replace_pending_with_terminal(pending_id, session)
        })
    }

    /// Binds the pending leaf `pending_id` to a file browser session.
    ///
    /// Same outcome rules as [`Self::resolve_terminal`].
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn resolve_file_browser(
        &mut self,
        tab: TabId,
        pending_id: NodeId,
        session: SessionId,
        initial_path: impl Into<String>,
    ) -> WorkspaceResult<bool> {
        self.resolve(tab, pending_id, |root| {
            root.replace_pending_with_file_browser(pending_id, session, initial_path)
        })
    }

    fn resolve(
        &mut self,
        tab: TabId,
        pending_id: NodeId,
        apply: impl FnOnce(&PaneNode) -> PaneNode,
    ) -> WorkspaceResult<bool> {
        let layout = self
            .tabs
            .get_mut(&tab)
            .ok_or(WorkspaceError::TabNotFound(tab))?;
        let _span = tracing::debug_span!(
            span_names::PANE_RESOLVE,
            tab_id = %tab,
            pane_id = %pending_id
        )
        .entered();
        if !layout.root.is_pending_leaf(pending_id) {
            tracing::debug!(pane_id = %pending_id, "Pending pane gone before resolution");
            return Ok(false);
        }
        let root = apply(&layout.root);
        layout.replace_root(root);
        Ok(true)
    }

    /// Closes `tab` and terminates every session it held.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn close_tab(&mut self, tab: TabId) -> WorkspaceResult<Vec<SessionId>> {
        let _span = tracing::debug_span!(span_names::TAB_CLOSE, tab_id = %tab).entered();
        let layout = self.remove_tab(tab).ok_or(WorkspaceError::TabNotFound(tab))?;
        let removed = removed_sessions(&layout.root, None);
        self.terminate_all(&removed);
        Ok(removed)
    }

    /// Computes the geometry of `tab` inside `area`.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::TabNotFound` if the tab is not open.
    pub fn layout(&self, tab: TabId, area: Rect) -> WorkspaceResult<PaneLayout> {
        let layout = self.tabs.get(&tab).ok_or(WorkspaceError::TabNotFound(tab))?;
        Ok(self.settings.layout_renderer().layout(&layout.root, area))
    }

    fn remove_tab(&mut self, tab: TabId) -> Option<TabLayout> {
        let layout = self.tabs.remove(&tab)?;
        self.order.retain(|id| *id != tab);
        tracing::info!(tab_id = %tab, "Closed tab");
        Some(layout)
    }

    fn terminate_all(&mut self, sessions: &[SessionId]) {
        for session in sessions {
            tracing::debug!(session_id = %session, "Terminating session");
            self.terminator.terminate(session);
        }
    }
}
