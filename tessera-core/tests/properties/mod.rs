mod pane_tree_tests;
mod workspace_tests;
