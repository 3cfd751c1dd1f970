//! Layout renderer for pane trees
//!
//! Walks a tree, hands every leaf to a caller-supplied [`PaneRenderer`]
//! keyed by leaf kind, and lays out split children along the split axis
//! using their stored sizes, with a drag handle between adjacent children.
//!
//! The engine never draws anything itself. [`compute_layout`] exposes the
//! same geometry as plain rectangles for hit testing and resize plumbing.

use super::tree::{FULL_EXTENT, LeafContent, PaneNode, SplitPane};
use super::types::{LeafKind, NodeId, SessionId, SplitDirection};

/// Default thickness of a drag handle, in pixels.
pub const DEFAULT_HANDLE_THICKNESS: f64 = 4.0;

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom exclusive.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Extent along the main axis of a split in `direction`.
    #[must_use]
    pub const fn main_extent(&self, direction: SplitDirection) -> f64 {
        match direction {
            SplitDirection::Vertical => self.width,
            SplitDirection::Horizontal => self.height,
        }
    }

    fn slice(&self, direction: SplitDirection, offset: f64, length: f64) -> Self {
        match direction {
            SplitDirection::Vertical => Self::new(self.x + offset, self.y, length, self.height),
            SplitDirection::Horizontal => Self::new(self.x, self.y + offset, self.width, length),
        }
    }
}

/// Where a leaf ends up on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PanePlacement {
    /// The leaf.
    pub leaf_id: NodeId,
    /// Its kind.
    pub kind: LeafKind,
    /// Its rectangle.
    pub area: Rect,
}

/// A drag handle between `children[index]` and `children[index + 1]` of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct DragHandle {
    /// The split owning the handle.
    pub split_id: NodeId,
    /// Index of the child before the handle.
    pub index: usize,
    /// Direction of the owning split.
    pub direction: SplitDirection,
    /// The handle's rectangle.
    pub area: Rect,
    /// The owning split's extent along its main axis, for converting drag
    /// deltas into percentages.
    pub main_extent: f64,
}

/// Flat geometry of a whole tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaneLayout {
    /// Every leaf, in visual order.
    pub panes: Vec<PanePlacement>,
    /// Every drag handle, outer splits first.
    pub handles: Vec<DragHandle>,
}

impl PaneLayout {
    /// Returns the placement of `leaf_id`.
    #[must_use]
    pub fn pane(&self, leaf_id: NodeId) -> Option<&PanePlacement> {
        self.panes.iter().find(|p| p.leaf_id == leaf_id)
    }

    /// Returns the leaf under the point.
    #[must_use]
    pub fn leaf_at(&self, x: f64, y: f64) -> Option<&PanePlacement> {
        self.panes.iter().find(|p| p.area.contains(x, y))
    }

    /// Returns the drag handle under the point.
    #[must_use]
    pub fn handle_at(&self, x: f64, y: f64) -> Option<&DragHandle> {
        self.handles.iter().find(|h| h.area.contains(x, y))
    }
}

/// Per-leaf-kind render callbacks supplied by the UI layer.
pub trait PaneRenderer {
    /// Whatever the host toolkit builds (a widget, a draw list, a string).
    type Output;

    /// Renders a terminal pane.
    fn render_terminal(
        &mut self,
        leaf_id: NodeId,
        session: &SessionId,
        is_focused: bool,
        area: Rect,
    ) -> Self::Output;

    /// Renders a file-browser pane.
    fn render_file_browser(
        &mut self,
        leaf_id: NodeId,
        session: &SessionId,
        initial_path: &str,
        area: Rect,
    ) -> Self::Output;

    /// Renders a pending pane (the connection picker).
    fn render_pending(&mut self, leaf_id: NodeId, area: Rect) -> Self::Output;

    /// Renders the drag handle between two children.
    fn render_handle(&mut self, handle: &DragHandle) -> Self::Output;

    /// Combines the rendered parts of a split.
    ///
    /// `parts` alternates child, handle, child, ... in visual order.
    fn render_split(
        &mut self,
        split_id: NodeId,
        direction: SplitDirection,
        area: Rect,
        parts: Vec<Self::Output>,
    ) -> Self::Output;
}

/// Walks pane trees and drives a [`PaneRenderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRenderer {
    handle_thickness: f64,
}

impl Default for LayoutRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_THICKNESS)
    }
}

impl LayoutRenderer {
    /// Creates a renderer with the given handle thickness in pixels.
    ///
    /// Negative or non-finite thicknesses are treated as zero.
    #[must_use]
    pub fn new(handle_thickness: f64) -> Self {
        let handle_thickness = if handle_thickness.is_finite() {
            handle_thickness.max(0.0)
        } else {
            0.0
        };
        Self { handle_thickness }
    }

    /// Returns the handle thickness in pixels.
    #[must_use]
    pub const fn handle_thickness(&self) -> f64 {
        self.handle_thickness
    }

    /// Renders `tree` into `area`.
    ///
    /// `focused` marks which terminal leaf, if any, is rendered as focused.
    pub fn render<R: PaneRenderer>(
        &self,
        tree: &PaneNode,
        area: Rect,
        focused: Option<NodeId>,
        renderer: &mut R,
    ) -> R::Output {
        match tree {
            PaneNode::Leaf(leaf) => match &leaf.content {
                LeafContent::Terminal { session } => {
                    renderer.render_terminal(leaf.id, session, focused == Some(leaf.id), area)
                }
                LeafContent::FileBrowser { session, path } => {
                    renderer.render_file_browser(leaf.id, session, path, area)
                }
                LeafContent::Pending => renderer.render_pending(leaf.id, area),
            },
            PaneNode::Split(split) => {
                let (areas, handles) = self.split_areas(split, area);
                let mut parts = Vec::with_capacity(areas.len() + handles.len());
                for (index, (child, child_area)) in split.children().iter().zip(areas).enumerate() {
                    if let Some(handle) = index.checked_sub(1).and_then(|i| handles.get(i)) {
                        parts.push(renderer.render_handle(handle));
                    }
                    parts.push(self.render(child, child_area, focused, renderer));
                }
                renderer.render_split(split.id(), split.direction(), area, parts)
            }
        }
    }

    /// Computes the rectangles of every leaf and handle of `tree`.
    #[must_use]
    pub fn layout(&self, tree: &PaneNode, area: Rect) -> PaneLayout {
        let mut layout = PaneLayout::default();
        self.layout_into(tree, area, &mut layout);
        layout
    }

    fn layout_into(&self, node: &PaneNode, area: Rect, layout: &mut PaneLayout) {
        match node {
            PaneNode::Leaf(leaf) => layout.panes.push(PanePlacement {
                leaf_id: leaf.id,
                kind: leaf.kind(),
                area,
            }),
            PaneNode::Split(split) => {
                let (areas, handles) = self.split_areas(split, area);
                layout.handles.extend(handles);
                for (child, child_area) in split.children().iter().zip(areas) {
                    self.layout_into(child, child_area, layout);
                }
            }
        }
    }

    /// Divides `area` among the children of `split`.
    ///
    /// Handles take a fixed thickness out of the main axis; the rest is
    /// shared proportionally to `sizes`. The last child absorbs rounding so
    /// the children exactly cover the area.
    fn split_areas(&self, split: &SplitPane, area: Rect) -> (Vec<Rect>, Vec<DragHandle>) {
        let direction = split.direction();
        let count = split.child_count();
        let main = area.main_extent(direction).max(0.0);
        let gaps = count.saturating_sub(1);

        let thickness = if gaps == 0 {
            0.0
        } else {
            self.handle_thickness.min(main / gaps as f64)
        };
        let available = (main - thickness * gaps as f64).max(0.0);

        let mut areas = Vec::with_capacity(count);
        let mut handles = Vec::with_capacity(gaps);
        let mut offset = 0.0;
        for (index, size) in split.sizes().iter().enumerate() {
            let length = if index + 1 == count {
                (main - offset).max(0.0)
            } else {
                available * size / FULL_EXTENT
            };
            areas.push(area.slice(direction, offset, length));
            offset += length;

            if index + 1 < count {
                handles.push(DragHandle {
                    split_id: split.id(),
                    index,
                    direction,
                    area: area.slice(direction, offset, thickness),
                    main_extent: main,
                });
                offset += thickness;
            }
        }
        (areas, handles)
    }
}

/// Computes the geometry of `tree` with the given handle thickness.
#[must_use]
pub fn compute_layout(tree: &PaneNode, area: Rect, handle_thickness: f64) -> PaneLayout {
    LayoutRenderer::new(handle_thickness).layout(tree, area)
}
