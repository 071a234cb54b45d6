//! Measured node boxes, kept in content space so camera moves do not
//! invalidate them.

use crate::geometry::Rect;
use crate::graph::NodeId;
use crate::view::Transform;
use std::collections::HashMap;

/// Measured boxes of rendered nodes.
///
/// The renderer reports boxes in viewport-local screen coordinates; they are
/// stored in **content space** (the inverse of the transform active at
/// report time), so pan and zoom never invalidate the cache. A node missing
/// here has not been laid out yet.
#[derive(Debug, Default, Clone)]
pub struct GeometryCache {
    pub node_rects: HashMap<NodeId, Rect>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a screen-space box reported while `transform` was applied.
    pub fn handle_node_rect_report(&mut self, id: NodeId, screen: Rect, transform: &Transform) {
        self.update_node_rect(id, transform.invert_rect(screen));
    }

    /// Record a content-space box directly.
    pub fn update_node_rect(&mut self, id: NodeId, rect: Rect) {
        self.node_rects.insert(id, rect);
    }

    pub fn remove(&mut self, id: &NodeId) -> Option<Rect> {
        self.node_rects.remove(id)
    }

    pub fn content_rect(&self, id: &NodeId) -> Option<Rect> {
        self.node_rects.get(id).copied()
    }

    /// Where `id` currently sits in the viewport.
    pub fn screen_rect(&self, id: &NodeId, transform: &Transform) -> Option<Rect> {
        self.content_rect(id).map(|r| transform.apply_rect(r))
    }

    pub fn content_boxes(&self) -> impl Iterator<Item = Rect> + '_ {
        self.node_rects.values().copied()
    }

    pub fn len(&self) -> usize {
        self.node_rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_rects.is_empty()
    }
}
