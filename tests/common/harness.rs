//! Test harness driving an [`ImpactMapController`] headlessly.
//!
//! Nodes and connectors land in `VecModel`s through a [`ModelSink`], exactly
//! as a Slint window would bind them. Layout is simulated: a node in column
//! `c`, row `r` occupies a `NODE_W` x `NODE_H` box at
//! `(c * COLUMN_PITCH, r * ROW_PITCH)` in content space, reported in screen
//! space under the current transform.

#![allow(dead_code)]

use super::CallbackTracker;
use impact_map::{
    ConnectorRow, EditorConfig, EditorEvent, ImpactMapController, MemoryStorage, ModelSink, Node,
    NodeId, NodeRow, Rect, Size, StorageBackend, ViewState, DEFAULT_NODES_KEY, DEFAULT_VIEW_KEY,
};
use slint::{Model, VecModel};
use std::rc::Rc;
use std::sync::Arc;

pub const COLUMN_PITCH: f32 = 260.0;
pub const ROW_PITCH: f32 = 90.0;
pub const NODE_W: f32 = 200.0;
pub const NODE_H: f32 = 60.0;
pub const VIEWPORT: Size = Size::new(800.0, 600.0);

pub struct EditorHarness {
    pub ctrl: ImpactMapController,
    pub nodes: Rc<VecModel<NodeRow>>,
    pub links: Rc<VecModel<ConnectorRow>>,
    pub column_titles: Rc<VecModel<slint::SharedString>>,
    pub tracker: CallbackTracker,
    pub storage: Arc<MemoryStorage>,
}

impl EditorHarness {
    /// Fresh document on empty storage, started and laid out.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    /// Start from previously stored nodes and view.
    pub fn with_document(nodes: &[Node], view: ViewState) -> Self {
        let storage = MemoryStorage::with_entries([
            (DEFAULT_NODES_KEY, serde_json::to_string(nodes).unwrap()),
            (DEFAULT_VIEW_KEY, serde_json::to_string(&view).unwrap()),
        ]);
        Self::with_storage(Arc::new(storage))
    }

    pub fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        Self::with_config(EditorConfig::default(), storage)
    }

    pub fn with_config(config: EditorConfig, storage: Arc<MemoryStorage>) -> Self {
        let tracker = CallbackTracker::new();
        let nodes = Rc::new(VecModel::<NodeRow>::default());
        let links = Rc::new(VecModel::<ConnectorRow>::default());
        let sink = ModelSink::new(nodes.clone(), |r: &NodeRow| r.clone(), links.clone(), |c: &ConnectorRow| c.clone())
            .with_transform_handler({
                let tracker = tracker.clone();
                move |t| tracker.transforms.borrow_mut().push(t)
            })
            .with_focus_handler({
                let tracker = tracker.clone();
                move |id| {
                    tracker.focus_requests.borrow_mut().push(id.clone());
                    tracker.focus_ready.get()
                }
            })
            .with_frame_requester({
                let tracker = tracker.clone();
                move || tracker.frame_requests.set(tracker.frame_requests.get() + 1)
            });
        let column_titles = sink.column_titles();

        let ctrl = ImpactMapController::new(config, storage.clone(), sink).unwrap();
        ctrl.startup();
        ctrl.dispatch(EditorEvent::Resized(VIEWPORT));

        let harness = Self { ctrl, nodes, links, column_titles, tracker, storage };
        harness.pump();
        harness
    }

    /// Report every rendered node's box, then run a frame.
    pub fn pump(&self) {
        self.layout();
        self.ctrl.on_frame();
    }

    /// Report every rendered node's box under the transform current at the
    /// time of each report, like a renderer that measures after each change.
    pub fn layout(&self) {
        let rows: Vec<NodeRow> = self.nodes.iter().collect();
        for row in rows {
            let content = Self::content_rect(&row);
            let screen = self.ctrl.editor().transform().apply_rect(content);
            self.ctrl
                .handle_node_rect(&row.id, screen.x, screen.y, screen.width, screen.height);
        }
    }

    pub fn content_rect(row: &NodeRow) -> Rect {
        Rect::new(
            row.column as f32 * COLUMN_PITCH,
            row.row as f32 * ROW_PITCH,
            NODE_W,
            NODE_H,
        )
    }

    // === Input ===

    pub fn dispatch(&self, event: EditorEvent) {
        self.ctrl.dispatch(event);
        self.pump();
    }

    pub fn add_root(&self) -> NodeId {
        self.dispatch(EditorEvent::AddRootRequested);
        self.active().unwrap()
    }

    pub fn add_child(&self, id: &NodeId) -> NodeId {
        self.dispatch(EditorEvent::AddChildRequested(id.clone()));
        self.active().unwrap()
    }

    pub fn remove(&self, id: &NodeId) {
        self.dispatch(EditorEvent::RemoveRequested(id.clone()));
    }

    pub fn click(&self, id: &NodeId) {
        self.dispatch(EditorEvent::NodeClicked(id.clone()));
    }

    pub fn type_title(&self, id: &NodeId, text: &str) {
        (self.ctrl.title_changed_callback())(id.as_str().into(), text.into());
    }

    /// Press a key on `id`'s title field. Returns whether it was consumed.
    pub fn key(&self, id: &NodeId, text: &str, input_empty: bool) -> bool {
        let handled = (self.ctrl.key_pressed_callback())(id.as_str().into(), text.into(), input_empty);
        self.pump();
        handled
    }

    /// Drag the canvas background from one point to another.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.ctrl.dispatch(EditorEvent::PointerDown { x: from.0, y: from.1 });
        self.ctrl.dispatch(EditorEvent::PointerMoved { x: to.0, y: to.1 });
        self.ctrl.dispatch(EditorEvent::PointerUp);
        self.pump();
    }

    // === Queries ===

    pub fn active(&self) -> Option<NodeId> {
        self.ctrl.active_id()
    }

    pub fn root(&self) -> NodeId {
        self.ctrl.editor().store().first_id().cloned().unwrap()
    }

    pub fn node(&self, id: &NodeId) -> Node {
        self.ctrl.editor().store().find_by_id(id).cloned().unwrap()
    }

    pub fn node_count(&self) -> usize {
        self.ctrl.editor().store().len()
    }

    pub fn view(&self) -> ViewState {
        *self.ctrl.editor().view()
    }

    pub fn row(&self, id: &NodeId) -> Option<NodeRow> {
        self.nodes.iter().find(|r| r.id.as_str() == id.as_str())
    }

    pub fn link(&self, child: &NodeId) -> Option<ConnectorRow> {
        self.links.iter().find(|l| l.child_id.as_str() == child.as_str())
    }

    /// Screen-space center of a measured node.
    pub fn screen_center(&self, id: &NodeId) -> Option<(f32, f32)> {
        let editor = self.ctrl.editor();
        editor
            .geometry()
            .screen_rect(id, &editor.transform())
            .map(|r| r.center())
    }

    pub fn stored_nodes(&self) -> Vec<Node> {
        let raw = self.storage.get(DEFAULT_NODES_KEY).unwrap().unwrap_or_default();
        serde_json::from_str(&raw).unwrap_or_default()
    }

    pub fn stored_view(&self) -> Option<ViewState> {
        let raw = self.storage.get(DEFAULT_VIEW_KEY).unwrap()?;
        serde_json::from_str(&raw).ok()
    }
}
