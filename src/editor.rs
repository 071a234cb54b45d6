//! The editor state machine.
//!
//! [`Editor`] is the single owner of the document and its view: node store,
//! camera, active selection, measured geometry and the pending-recompute
//! slot. Nothing here is global, so independent editors can coexist and
//! every operation is testable without a UI.
//!
//! Mutations never talk to the UI directly. They record what changed and
//! [`take_output`](Editor::take_output) hands that to the caller (normally
//! [`ImpactMapController`](crate::ImpactMapController)), which pushes it to
//! the render sink and to storage.

use crate::config::EditorConfig;
use crate::error::ConfigError;
use crate::connectors::{compute_connectors, Connector};
use crate::event::EditorEvent;
use crate::geometry::{Rect, Size};
use crate::graph::{Node, NodeId, NodeStore, Removal};
use crate::layout::{arrange_columns, ColumnView};
use crate::persistence::Snapshot;
use crate::schedule::{FrameScheduler, FrameToken};
use crate::selection::ActiveSelection;
use crate::sink::RenderFrame;
use crate::state::GeometryCache;
use crate::view::{PanSession, Transform, ViewState};

/// Owned copy of what a render pass needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub nodes: Vec<Node>,
    pub columns: Vec<ColumnView>,
    pub active_id: Option<NodeId>,
    pub labels: Vec<String>,
}

impl FrameSnapshot {
    pub fn as_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            nodes: &self.nodes,
            columns: &self.columns,
            active_id: self.active_id.as_ref(),
            labels: &self.labels,
            version: crate::VERSION,
        }
    }
}

/// Everything that changed since the last [`Editor::take_output`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorOutput {
    /// Structure or selection changed; re-render the nodes.
    pub frame: Option<FrameSnapshot>,
    /// Camera changed; re-apply the transform.
    pub transform: Option<Transform>,
    /// Document or camera should be written to storage.
    pub save: bool,
    /// Work is waiting for the next paint (connectors or focus).
    pub wants_frame: bool,
}

/// Work done on a paint opportunity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameWork {
    /// The recomputation request this frame served.
    pub token: Option<FrameToken>,
    /// Fresh connectors, if a recomputation was pending.
    pub connectors: Option<Vec<Connector>>,
    /// Title field to focus, if a focus request is open.
    pub focus: Option<NodeId>,
}

pub struct Editor {
    config: EditorConfig,
    store: NodeStore,
    view: ViewState,
    selection: ActiveSelection,
    geometry: GeometryCache,
    scheduler: FrameScheduler,
    pan: Option<PanSession>,
    viewport: Size,
    pending_center: bool,
    needs_render: bool,
    needs_transform: bool,
    needs_save: bool,
}

impl Editor {
    /// Fresh document: one blank root, active and awaiting focus.
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        Self::from_snapshot(config, Snapshot::default())
    }

    /// Rebuild from stored state.
    ///
    /// An empty node list yields a synthesized root that requests focus;
    /// otherwise the first node becomes active without stealing focus.
    /// Fails if `config` does not validate.
    pub fn from_snapshot(config: EditorConfig, snapshot: Snapshot) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut store = NodeStore::from_nodes(snapshot.nodes, config.column_count());
        let mut selection = ActiveSelection::new();
        match store.first_id().cloned() {
            Some(first) => selection.restore(first),
            None => selection.select(store.add_root()),
        }

        let mut editor = Self {
            config,
            store,
            view: snapshot.view,
            selection,
            geometry: GeometryCache::new(),
            scheduler: FrameScheduler::new(),
            pan: None,
            viewport: Size::default(),
            pending_center: false,
            needs_render: true,
            needs_transform: true,
            needs_save: false,
        };
        editor.scheduler.schedule();
        Ok(editor)
    }

    // === Accessors ===

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn transform(&self) -> Transform {
        self.view.transform()
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn active_id(&self) -> Option<&NodeId> {
        self.selection.active()
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The connector recomputation waiting for the next frame, if any.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.scheduler.pending()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn columns(&self) -> Vec<ColumnView> {
        arrange_columns(&self.store, &self.config.column_labels)
    }

    /// Connectors for the current geometry and camera, computed now.
    pub fn connectors(&self) -> Vec<Connector> {
        compute_connectors(&self.store, &self.geometry, &self.transform(), self.config.curve_factor)
    }

    // === Node store operations ===

    /// Add a root node and make it active.
    pub fn add_root(&mut self) -> NodeId {
        let id = self.store.add_root();
        self.set_active(id.clone());
        id
    }

    /// Add a sibling of `id` and make it active.
    pub fn add_sibling(&mut self, id: &NodeId) -> Option<NodeId> {
        let sibling = self.store.add_sibling(id)?;
        self.set_active(sibling.clone());
        Some(sibling)
    }

    /// Add a child of `id` and make it active.
    pub fn add_child(&mut self, id: &NodeId) -> Option<NodeId> {
        let child = self.store.add_child(id)?;
        self.set_active(child.clone());
        Some(child)
    }

    /// Remove `id` with all descendants, then activate the first remaining
    /// node (or the synthesized root).
    pub fn remove_subtree(&mut self, id: &NodeId) -> Option<Removal> {
        let removal = self.store.remove_subtree(id)?;
        for gone in &removal.removed {
            self.geometry.remove(gone);
        }
        self.set_active(removal.next_active.clone());
        Some(removal)
    }

    /// Set a node's title. The field already shows the text, so this only saves.
    pub fn update_title(&mut self, id: &NodeId, text: impl Into<String>) -> bool {
        let updated = self.store.update_title(id, text);
        if updated {
            self.needs_save = true;
        }
        updated
    }

    /// Make `id` active, request focus for it and bring it into view.
    pub fn set_active(&mut self, id: NodeId) {
        self.selection.select(id);
        self.needs_render = true;
        self.needs_save = true;
        self.scheduler.schedule();
        self.center_on_active();
    }

    /// Node clicked or focused by the user. Re-activating the active node
    /// does not raise another focus request.
    pub fn activate_from_input(&mut self, id: &NodeId) {
        if !self.store.contains(id) {
            return;
        }
        if self.selection.is_active(id) {
            self.needs_render = true;
            self.needs_save = true;
            self.center_on_active();
        } else {
            self.set_active(id.clone());
        }
    }

    // === Viewport operations ===

    pub fn zoom(&mut self, delta: f32) {
        if self.view.zoom(delta, self.config.zoom) {
            self.transform_changed(true);
        } else {
            tracing::debug!(delta, "ignoring non-finite zoom step");
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(-self.config.zoom_step);
    }

    /// Set the offsets absolutely.
    pub fn pan(&mut self, offset_x: f32, offset_y: f32) {
        if self.view.pan(offset_x, offset_y) {
            self.transform_changed(true);
        }
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.transform_changed(true);
    }

    /// Fit all measured nodes into the viewport.
    pub fn fit_view(&mut self) {
        if !has_area(self.viewport) {
            tracing::debug!("fit skipped: viewport size unknown");
            return;
        }
        // The cache only ever holds nodes still in the store.
        let fitted = self.view.fit_to_content(
            self.geometry.content_boxes(),
            self.viewport,
            self.config.fit_padding,
            self.config.fit,
        );
        if fitted {
            self.transform_changed(true);
        }
    }

    /// Bring the active node to the viewport center, now if it has been
    /// measured, otherwise as soon as its box is reported.
    pub fn center_on_active(&mut self) {
        let target = self
            .selection
            .active()
            .and_then(|id| self.geometry.screen_rect(id, &self.view.transform()));
        match target {
            Some(screen_box) if has_area(self.viewport) => {
                self.view.center_on(screen_box, self.viewport);
                self.pending_center = false;
                self.transform_changed(true);
            }
            _ => self.pending_center = true,
        }
    }

    pub fn has_pending_center(&self) -> bool {
        self.pending_center
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.scheduler.schedule();
        if self.pending_center {
            self.center_on_active();
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pan = Some(PanSession::begin(&self.view, x, y));
    }

    /// Drag the canvas. Saved once, on release.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let Some(session) = self.pan else {
            return;
        };
        let (offset_x, offset_y) = session.offsets_for(x, y);
        if self.view.pan(offset_x, offset_y) {
            self.transform_changed(false);
        } else {
            tracing::debug!(x, y, "ignoring non-finite pointer position");
        }
    }

    pub fn pointer_up(&mut self) {
        if self.pan.take().is_some() {
            self.needs_save = true;
        }
    }

    fn transform_changed(&mut self, save: bool) {
        self.needs_transform = true;
        self.needs_save |= save;
        self.scheduler.schedule();
    }

    // === Keyboard ===

    /// Tab: add a child of the focused node.
    pub fn tab_pressed(&mut self, id: &NodeId) -> Option<NodeId> {
        let target = self.key_target(id)?;
        self.add_child(&target)
    }

    /// Enter: add a sibling of the focused node.
    pub fn enter_pressed(&mut self, id: &NodeId) -> Option<NodeId> {
        let target = self.key_target(id)?;
        self.add_sibling(&target)
    }

    /// Delete/Backspace: remove the active subtree, unless the key is
    /// editing a title that still has text.
    pub fn delete_pressed(&mut self, id: &NodeId, input_empty: bool) -> Option<Removal> {
        if !input_empty {
            return None;
        }
        let target = self
            .selection
            .active()
            .filter(|active| self.store.contains(active))
            .cloned()
            .or_else(|| self.store.contains(id).then(|| id.clone()))?;
        self.remove_subtree(&target)
    }

    /// The node a key event applies to: the event's node if it exists,
    /// else the active node.
    fn key_target(&self, id: &NodeId) -> Option<NodeId> {
        if self.store.contains(id) {
            return Some(id.clone());
        }
        self.selection
            .active()
            .filter(|active| self.store.contains(active))
            .cloned()
    }

    // === Geometry reports ===

    /// Record a node box measured by the renderer, in viewport-local
    /// coordinates under the current transform.
    pub fn report_node_rect(&mut self, id: &NodeId, screen: Rect) {
        if !self.store.contains(id) {
            return;
        }
        let transform = self.view.transform();
        self.geometry.handle_node_rect_report(id.clone(), screen, &transform);
        self.scheduler.schedule();
        if self.pending_center && self.selection.is_active(id) {
            self.center_on_active();
        }
    }

    // === Event dispatch ===

    pub fn dispatch(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::TitleChanged { id, text } => {
                self.update_title(&id, text);
            }
            EditorEvent::NodeClicked(id) => self.activate_from_input(&id),
            EditorEvent::AddRootRequested => {
                self.add_root();
            }
            EditorEvent::AddChildRequested(id) => {
                self.add_child(&id);
            }
            EditorEvent::RemoveRequested(id) => {
                self.remove_subtree(&id);
            }
            EditorEvent::TabPressed(id) => {
                self.tab_pressed(&id);
            }
            EditorEvent::EnterPressed(id) => {
                self.enter_pressed(&id);
            }
            EditorEvent::DeleteOrBackspacePressed { id, input_empty } => {
                self.delete_pressed(&id, input_empty);
            }
            EditorEvent::PointerDown { x, y } => self.pointer_down(x, y),
            EditorEvent::PointerMoved { x, y } => self.pointer_moved(x, y),
            EditorEvent::PointerUp => self.pointer_up(),
            EditorEvent::Zoom(delta) => self.zoom(delta),
            EditorEvent::ZoomIn => self.zoom_in(),
            EditorEvent::ZoomOut => self.zoom_out(),
            EditorEvent::FitRequested => self.fit_view(),
            EditorEvent::ResetRequested => self.reset_view(),
            EditorEvent::Resized(size) => self.resize(size),
        }
    }

    // === Output ===

    /// Drain pending render/transform/save work.
    pub fn take_output(&mut self) -> EditorOutput {
        let frame = std::mem::take(&mut self.needs_render).then(|| FrameSnapshot {
            nodes: self.store.nodes().to_vec(),
            columns: self.columns(),
            active_id: self.selection.active().cloned(),
            labels: self.config.column_labels.clone(),
        });
        let transform = std::mem::take(&mut self.needs_transform).then(|| self.view.transform());
        EditorOutput {
            frame,
            transform,
            save: std::mem::take(&mut self.needs_save),
            wants_frame: self.scheduler.is_pending() || self.selection.has_pending_focus(),
        }
    }

    /// Run deferred work for a paint opportunity.
    pub fn run_frame(&mut self) -> FrameWork {
        let token = self.scheduler.take();
        let connectors = token.map(|token| {
            tracing::trace!(generation = token.generation(), "recomputing connectors");
            self.connectors()
        });
        FrameWork {
            token,
            connectors,
            focus: self.selection.focus_target().cloned(),
        }
    }

    /// The renderer focused `id`'s title. Ignored if the request has moved on.
    pub fn focus_applied(&mut self, id: &NodeId) {
        if self.selection.focus_target() == Some(id) {
            self.selection.focus_applied();
        }
    }
}

fn has_area(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}
