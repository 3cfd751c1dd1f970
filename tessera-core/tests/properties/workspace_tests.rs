//! Property-based tests for workspace orchestration
//!
//! Random user actions are replayed against a `PaneWorkspace` with a
//! recording terminator. Focus must always name a leaf, and a session is
//! terminated exactly when it leaves the tab being edited.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;
use tessera_core::pane::{
    LeafContent, NodeId, PaneWorkspace, SequentialIdGenerator, SessionId, SplitDirection, TabId,
};
use tessera_core::LayoutSettings;

use super::strategies::{session_strategy, split_direction_strategy};

#[derive(Debug, Clone)]
enum WorkspaceOp {
    OpenTab(SessionId),
    Split { tab_index: usize, direction: SplitDirection },
    CloseFocused { tab_index: usize },
    CloseAt { tab_index: usize, node_index: usize },
    Focus { tab_index: usize, leaf_index: usize },
    Resolve { tab_index: usize, leaf_index: usize, session: SessionId },
    CloseTab { tab_index: usize },
}

fn workspace_op_strategy() -> impl Strategy<Value = WorkspaceOp> {
    prop_oneof![
        1 => session_strategy().prop_map(WorkspaceOp::OpenTab),
        3 => (0usize..4, split_direction_strategy())
            .prop_map(|(tab_index, direction)| WorkspaceOp::Split { tab_index, direction }),
        1 => (0usize..4).prop_map(|tab_index| WorkspaceOp::CloseFocused { tab_index }),
        2 => (0usize..4, 0usize..16)
            .prop_map(|(tab_index, node_index)| WorkspaceOp::CloseAt { tab_index, node_index }),
        1 => (0usize..4, 0usize..16)
            .prop_map(|(tab_index, leaf_index)| WorkspaceOp::Focus { tab_index, leaf_index }),
        3 => (0usize..4, 0usize..16, session_strategy()).prop_map(
            |(tab_index, leaf_index, session)| WorkspaceOp::Resolve {
                tab_index,
                leaf_index,
                session,
            }
        ),
        1 => (0usize..4).prop_map(|tab_index| WorkspaceOp::CloseTab { tab_index }),
    ]
}

struct Harness {
    workspace: PaneWorkspace,
    log: Rc<RefCell<Vec<SessionId>>>,
}

impl Harness {
    fn new() -> Self {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let workspace = PaneWorkspace::new(
            LayoutSettings::default(),
            Box::new(SequentialIdGenerator::new()),
            Box::new(move |session: &SessionId| sink.borrow_mut().push(session.clone())),
        );
        Self { workspace, log }
    }

    fn tab(&self, index: usize) -> Option<TabId> {
        let tabs = self.workspace.tab_ids();
        if tabs.is_empty() {
            None
        } else {
            Some(tabs[index % tabs.len()])
        }
    }

    fn pick_leaf(&self, tab: TabId, index: usize) -> NodeId {
        let root = self.workspace.tab(tab).unwrap().root();
        let leaves = root.leaves();
        leaves[index % leaves.len()].id
    }

    fn pick_node(&self, tab: TabId, index: usize) -> NodeId {
        let ids = self.workspace.tab(tab).unwrap().root().node_ids();
        ids[index % ids.len()]
    }

    fn sessions_of(&self, tab: TabId) -> HashSet<SessionId> {
        self.workspace
            .tab(tab)
            .map(|layout| layout.root().all_session_ids().into_iter().collect())
            .unwrap_or_default()
    }

    fn apply(&mut self, op: &WorkspaceOp) {
        match op {
            WorkspaceOp::OpenTab(session) => {
                self.workspace.open_tab(LeafContent::terminal(session.clone()));
            }
            WorkspaceOp::Split { tab_index, direction } => {
                if let Some(tab) = self.tab(*tab_index) {
                    self.workspace.split(tab, *direction).unwrap();
                }
            }
            WorkspaceOp::CloseFocused { tab_index } => {
                if let Some(tab) = self.tab(*tab_index) {
                    self.workspace.close_focused(tab).unwrap();
                }
            }
            WorkspaceOp::CloseAt { tab_index, node_index } => {
                if let Some(tab) = self.tab(*tab_index) {
                    let node = self.pick_node(tab, *node_index);
                    self.workspace.close(tab, node).unwrap();
                }
            }
            WorkspaceOp::Focus { tab_index, leaf_index } => {
                if let Some(tab) = self.tab(*tab_index) {
                    let leaf = self.pick_leaf(tab, *leaf_index);
                    self.workspace.focus(tab, leaf).unwrap();
                }
            }
            WorkspaceOp::Resolve { tab_index, leaf_index, session } => {
                if let Some(tab) = self.tab(*tab_index) {
                    let leaf = self.pick_leaf(tab, *leaf_index);
                    let _ = self.workspace.resolve_terminal(tab, leaf, session.clone()).unwrap();
                }
            }
            WorkspaceOp::CloseTab { tab_index } => {
                if let Some(tab) = self.tab(*tab_index) {
                    self.workspace.close_tab(tab).unwrap();
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Focus always names a leaf of its tab and trees stay valid
    #[test]
    fn prop_focus_is_always_a_leaf(
        ops in proptest::collection::vec(workspace_op_strategy(), 1..40),
    ) {
        let mut harness = Harness::new();
        harness.apply(&WorkspaceOp::OpenTab(SessionId::new("base").unwrap()));
        for op in &ops {
            harness.apply(op);
            for tab in harness.workspace.tab_ids() {
                let layout = harness.workspace.tab(*tab).unwrap();
                prop_assert!(layout.root().validate().is_ok());
                prop_assert!(layout.root().find_leaf(layout.focused()).is_some());
            }
        }
    }

    /// Each edit terminates exactly the sessions that left the edited tab
    #[test]
    fn prop_terminator_sees_exactly_dropped_sessions(
        ops in proptest::collection::vec(workspace_op_strategy(), 1..40),
    ) {
        let mut harness = Harness::new();
        for op in &ops {
            let tab = match op {
                WorkspaceOp::OpenTab(_) => None,
                WorkspaceOp::Split { tab_index, .. }
                | WorkspaceOp::CloseFocused { tab_index }
                | WorkspaceOp::CloseAt { tab_index, .. }
                | WorkspaceOp::Focus { tab_index, .. }
                | WorkspaceOp::Resolve { tab_index, .. }
                | WorkspaceOp::CloseTab { tab_index } => harness.tab(*tab_index),
            };
            let before = tab.map(|t| harness.sessions_of(t)).unwrap_or_default();
            let logged = harness.log.borrow().len();

            harness.apply(op);

            let after = tab.map(|t| harness.sessions_of(t)).unwrap_or_default();
            let terminated: HashSet<SessionId> =
                harness.log.borrow()[logged..].iter().cloned().collect();
            let expected: HashSet<SessionId> = before.difference(&after).cloned().collect();
            prop_assert_eq!(terminated, expected);
        }
    }

    /// Edits on one tab never change another tab
    #[test]
    fn prop_tabs_are_independent(ops in proptest::collection::vec(workspace_op_strategy(), 1..30)) {
        let mut harness = Harness::new();
        let bystander = harness
            .workspace
            .open_tab(LeafContent::terminal(SessionId::new("bystander").unwrap()));
        let snapshot = harness.workspace.tab(bystander).unwrap().clone();
        let active = harness
            .workspace
            .open_tab(LeafContent::terminal(SessionId::new("active").unwrap()));

        for op in &ops {
            if harness.workspace.tab(active).is_none() {
                break;
            }
            match op {
                WorkspaceOp::OpenTab(_) => {}
                WorkspaceOp::Split { direction, .. } => {
                    harness.workspace.split(active, *direction).unwrap();
                }
                WorkspaceOp::CloseAt { node_index, .. } => {
                    let node = harness.pick_node(active, *node_index);
                    harness.workspace.close(active, node).unwrap();
                }
                WorkspaceOp::Resolve { leaf_index, session, .. } => {
                    let leaf = harness.pick_leaf(active, *leaf_index);
                    let _ = harness
                        .workspace
                        .resolve_terminal(active, leaf, session.clone())
                        .unwrap();
                }
                WorkspaceOp::Focus { leaf_index, .. } => {
                    let leaf = harness.pick_leaf(active, *leaf_index);
                    harness.workspace.focus(active, leaf).unwrap();
                }
                WorkspaceOp::CloseFocused { .. } | WorkspaceOp::CloseTab { .. } => {
                    harness.workspace.close_focused(active).unwrap();
                }
            }
        }

        prop_assert_eq!(harness.workspace.tab(bystander), Some(&snapshot));
    }
}
