//! Core type definitions for the pane tree
//!
//! This module contains the identifier types, enums, and id generators used
//! throughout the pane-tree engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PaneError;

/// Unique identifier for a node (leaf or split) in a pane tree.
///
/// Ids are minted once by an [`IdGenerator`] when the node is created and
/// never change afterwards, so they can key focus tracking and host widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Creates a node ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pane({})", self.0)
    }
}

/// Unique identifier for a workspace tab.
///
/// Each open tab owns exactly one pane tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a new random tab ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Opaque handle to a live session owned by the external session layer.
///
/// The engine stores and returns it but never interprets it. The only rule
/// it enforces is that the handle is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a session handle minted by the session layer.
    ///
    /// # Errors
    ///
    /// Returns `PaneError::EmptySessionId` if `raw` is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, PaneError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PaneError::EmptySessionId);
        }
        Ok(Self(raw))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = PaneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl FromStr for SessionId {
    type Err = PaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    /// A shell, SSH, Telnet or Serial terminal.
    Terminal,
    /// A file-transfer browser.
    FileBrowser,
    /// A pane waiting for the user to pick what to open.
    Pending,
}

impl LeafKind {
    /// Returns true for kinds that are bound to a live session.
    #[must_use]
    pub const fn has_session(self) -> bool {
        matches!(self, Self::Terminal | Self::FileBrowser)
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal => write!(f, "Terminal"),
            Self::FileBrowser => write!(f, "FileBrowser"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// Split direction for dividing panes.
///
/// `Horizontal` stacks children top to bottom, `Vertical` places them
/// left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Split horizontally, creating top and bottom panes.
    Horizontal,
    /// Split vertically, creating left and right panes.
    #[default]
    Vertical,
}

impl fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "Horizontal"),
            Self::Vertical => write!(f, "Vertical"),
        }
    }
}

/// Source of fresh node ids.
///
/// The workspace owns one generator and hands it to every tree operation
/// that creates nodes, so tests can plug in a deterministic sequence.
pub trait IdGenerator {
    /// Returns an id that this generator has never returned before.
    fn next_id(&mut self) -> NodeId;
}

/// Generates random v4 UUID node ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> NodeId {
        NodeId(Uuid::new_v4())
    }
}

/// Generates node ids from an incrementing counter.
///
/// The first id is `Uuid::from_u128(start)`, then `start + 1`, and so on.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    next: u128,
}

impl SequentialIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Creates a generator starting at `start`.
    #[must_use]
    pub const fn starting_at(start: u128) -> Self {
        Self { next: start }
    }

    /// Returns the id the next call to `next_id` will produce.
    #[must_use]
    pub const fn peek(&self) -> NodeId {
        NodeId(Uuid::from_u128(self.next))
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(Uuid::from_u128(self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}
