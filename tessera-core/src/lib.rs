//! `Tessera` Core Library
//!
//! This crate provides the pane layout engine of the `Tessera` terminal
//! client: the per-tab pane tree shared by SSH, Telnet, Serial and SFTP
//! sessions, its geometry, and the settings and logging around it.
//!
//! # Crate Structure
//!
//! - [`pane`] - Pane tree model, edits, geometry and per-tab workspace
//! - [`config`] - Layout settings and TOML persistence
//! - [`error`] - Crate-level error types
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod pane;
pub mod tracing;

pub use config::{LayoutSettings, LoggingSettings};
pub use error::{ConfigError, ConfigResult};
pub use pane::{
    CloseOutcome, IdGenerator, LayoutRenderer, LeafContent, LeafKind, LeafPane, NodeId,
    PaneError, PaneLayout, PaneNode, PaneRenderer, PaneWorkspace, Rect, SequentialIdGenerator,
    SessionId, SessionTerminator, SplitDirection, SplitOutcome, SplitPane, TabId, TabLayout,
    UuidIdGenerator, WorkspaceError,
};
pub use crate::tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, init_tracing,
    is_tracing_initialized,
};
