//! Connector engine: parent→child curves derived from measured node boxes.
//!
//! Edges are computed from the boxes as they currently appear in the
//! viewport (the cached content-space box pushed through the live
//! transform), so they stay glued to the nodes while panning and zooming.
//!
//! Two kinds of edges are skipped without error:
//!
//! - a child whose parent is no longer in the store (dangling reference);
//! - an edge where either node has not been measured yet, which happens for
//!   one frame between inserting a node and the renderer reporting its box.

use crate::graph::{NodeId, NodeStore};
use crate::path::ConnectorCurve;
use crate::state::GeometryCache;
use crate::view::Transform;
use std::collections::HashSet;

/// One drawable parent→child edge, in viewport coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent_id: NodeId,
    pub child_id: NodeId,
    pub curve: ConnectorCurve,
}

impl Connector {
    pub fn path_commands(&self) -> String {
        self.curve.to_svg_path()
    }
}

/// Compute every drawable connector, in node collection order.
pub fn compute_connectors(
    store: &NodeStore,
    cache: &GeometryCache,
    transform: &Transform,
    curve_factor: f32,
) -> Vec<Connector> {
    let present: HashSet<&NodeId> = store.iter().map(|n| &n.id).collect();
    let mut connectors = Vec::new();
    let mut unmeasured = 0usize;

    for child in store.iter() {
        let Some(parent_id) = &child.parent_id else {
            continue;
        };
        if !present.contains(parent_id) {
            continue;
        }
        let parent_box = cache.screen_rect(parent_id, transform);
        let child_box = cache.screen_rect(&child.id, transform);
        let (Some(parent_box), Some(child_box)) = (parent_box, child_box) else {
            unmeasured += 1;
            continue;
        };
        connectors.push(Connector {
            parent_id: parent_id.clone(),
            child_id: child.id.clone(),
            curve: ConnectorCurve::between(parent_box, child_box, curve_factor),
        });
    }

    if unmeasured > 0 {
        tracing::debug!(unmeasured, drawn = connectors.len(), "skipped connectors awaiting layout");
    }
    connectors
}
