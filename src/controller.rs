//! High-level controller for impact map applications.
//!
//! The [`ImpactMapController`] ties an [`Editor`] to storage and to a
//! [`RenderSink`], and hands out ready-made Slint callbacks.
//!
//! # Example
//!
//! ```ignore
//! use impact_map::{EditorConfig, FileStorage, ImpactMapController, ModelSink};
//! use std::sync::Arc;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let w = window.as_weak();
//!     let sink = ModelSink::new(nodes.clone(), to_node_data, links.clone(), to_link_path)
//!         .with_transform_handler({
//!             let w = w.clone();
//!             move |t| if let Some(w) = w.upgrade() {
//!                 w.set_zoom(t.scale);
//!                 w.set_pan_x(t.translate_x);
//!                 w.set_pan_y(t.translate_y);
//!             }
//!         })
//!         .with_frame_requester({
//!             let w = w.clone();
//!             move || if let Some(w) = w.upgrade() { w.invoke_request_frame() }
//!         });
//!
//!     let storage = Arc::new(FileStorage::new("impact-map.json"));
//!     let ctrl = ImpactMapController::new(EditorConfig::default(), storage, sink).unwrap();
//!
//!     window.on_node_rect_changed(ctrl.node_rect_callback());
//!     window.on_title_changed(ctrl.title_changed_callback());
//!     window.on_node_clicked(ctrl.node_clicked_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback());
//!     window.on_zoom(ctrl.zoom_callback());
//!     window.on_frame(ctrl.frame_callback());
//!
//!     ctrl.startup();
//!     window.run().unwrap();
//! }
//! ```

use crate::config::EditorConfig;
use crate::connectors::Connector;
use crate::editor::Editor;
use crate::error::ConfigError;
use crate::event::EditorEvent;
use crate::geometry::{Rect, Size};
use crate::graph::NodeId;
use crate::persistence::{Persistence, StorageBackend};
use crate::sink::RenderSink;
use slint::SharedString;
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

/// Work items processed one at a time against the editor.
#[derive(Debug)]
enum Task {
    Event(EditorEvent),
    NodeRect(NodeId, Rect),
    Frame,
    Startup,
}

/// Controller that owns the editor and drives its sink and storage.
///
/// Every input is applied to the [`Editor`], then the resulting render,
/// transform and save work is pushed out. Sink callbacks that feed input
/// back in (a focus change raising a click, say) are queued and run after
/// the current task, so the editor and sink are never borrowed twice.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct ImpactMapController {
    editor: Rc<RefCell<Editor>>,
    persistence: Persistence,
    sink: Rc<RefCell<dyn RenderSink>>,
    queue: Rc<RefCell<VecDeque<Task>>>,
    busy: Rc<Cell<bool>>,
}

impl ImpactMapController {
    /// Load the stored document and bind it to `sink`.
    ///
    /// Nothing is pushed to the sink until [`startup`](Self::startup).
    pub fn new(
        config: EditorConfig,
        backend: Arc<dyn StorageBackend>,
        sink: impl RenderSink + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let persistence = Persistence::new(backend, config.nodes_key.clone(), config.view_key.clone());
        let snapshot = persistence.load();
        let editor = Editor::from_snapshot(config, snapshot)?;
        Ok(Self {
            editor: Rc::new(RefCell::new(editor)),
            persistence,
            sink: Rc::new(RefCell::new(sink)),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            busy: Rc::new(Cell::new(false)),
        })
    }

    /// Borrow the editor for inspection.
    pub fn editor(&self) -> Ref<'_, Editor> {
        self.editor.borrow()
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn active_id(&self) -> Option<NodeId> {
        self.editor.borrow().active_id().cloned()
    }

    pub fn connectors(&self) -> Vec<Connector> {
        self.editor.borrow().connectors()
    }

    // === Direct handlers ===

    /// Push the initial render and transform.
    pub fn startup(&self) {
        self.run(Task::Startup);
    }

    pub fn dispatch(&self, event: EditorEvent) {
        self.run(Task::Event(event));
    }

    /// Handle node-rect-changed with a viewport-local box.
    pub fn handle_node_rect(&self, id: &str, x: f32, y: f32, w: f32, h: f32) {
        self.run(Task::NodeRect(NodeId::from(id), Rect::new(x, y, w, h)));
    }

    /// Paint opportunity: redraw connectors if due and retry pending focus.
    pub fn on_frame(&self) {
        self.run(Task::Frame);
    }

    fn run(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
        if self.busy.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(task) = next else { break };
            self.process(task);
            self.flush();
        }
        self.busy.set(false);
    }

    fn process(&self, task: Task) {
        match task {
            Task::Startup => {}
            Task::Event(event) => self.editor.borrow_mut().dispatch(event),
            Task::NodeRect(id, rect) => self.editor.borrow_mut().report_node_rect(&id, rect),
            Task::Frame => {
                let work = self.editor.borrow_mut().run_frame();
                let mut sink = self.sink.borrow_mut();
                if let Some(connectors) = &work.connectors {
                    sink.draw_connectors(connectors);
                }
                if let Some(id) = work.focus {
                    let focused = sink.focus_title(&id);
                    drop(sink);
                    if focused {
                        self.editor.borrow_mut().focus_applied(&id);
                    } else {
                        tracing::debug!(node = %id, "title field not ready, retrying focus");
                    }
                }
            }
        }
    }

    fn flush(&self) {
        let output = {
            let mut editor = self.editor.borrow_mut();
            let output = editor.take_output();
            if output.save {
                self.persistence.save(editor.store().nodes(), editor.view());
            }
            output
        };
        let mut sink = self.sink.borrow_mut();
        if let Some(frame) = &output.frame {
            sink.render(&frame.as_frame());
        }
        if let Some(transform) = output.transform {
            sink.apply_transform(transform);
        }
        if output.wants_frame {
            sink.request_frame();
        }
    }

    // === Callback factories ===

    /// Returns a callback for `node-rect-changed(id, x, y, width, height)`.
    pub fn node_rect_callback(&self) -> impl Fn(SharedString, f32, f32, f32, f32) {
        let ctrl = self.clone();
        move |id, x, y, w, h| ctrl.handle_node_rect(&id, x, y, w, h)
    }

    /// Returns a callback for `title-changed(id, text)`.
    pub fn title_changed_callback(&self) -> impl Fn(SharedString, SharedString) {
        let ctrl = self.clone();
        move |id, text| {
            ctrl.dispatch(EditorEvent::TitleChanged {
                id: NodeId::from(id.as_str()),
                text: text.into(),
            })
        }
    }

    /// Returns a callback for `node-clicked(id)`, also used for title focus.
    pub fn node_clicked_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |id| ctrl.dispatch(EditorEvent::NodeClicked(NodeId::from(id.as_str())))
    }

    /// Returns a callback for the "add root" button.
    pub fn add_root_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.dispatch(EditorEvent::AddRootRequested)
    }

    /// Returns a callback for a node's "+" button.
    pub fn add_child_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |id| ctrl.dispatch(EditorEvent::AddChildRequested(NodeId::from(id.as_str())))
    }

    /// Returns a callback for a node's "×" button.
    pub fn remove_callback(&self) -> impl Fn(SharedString) {
        let ctrl = self.clone();
        move |id| ctrl.dispatch(EditorEvent::RemoveRequested(NodeId::from(id.as_str())))
    }

    /// Returns a callback for `key-pressed(id, text, input-empty) -> bool`.
    ///
    /// Returns `true` when the key was consumed. Delete/Backspace inside a
    /// title with text is left to the text field.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString, SharedString, bool) -> bool {
        let ctrl = self.clone();
        move |id, text, input_empty| {
            match EditorEvent::from_key(NodeId::from(id.as_str()), &text, input_empty) {
                Some(EditorEvent::DeleteOrBackspacePressed { input_empty: false, .. }) | None => false,
                Some(event) => {
                    ctrl.dispatch(event);
                    true
                }
            }
        }
    }

    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.dispatch(EditorEvent::PointerDown { x, y })
    }

    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.dispatch(EditorEvent::PointerMoved { x, y })
    }

    pub fn pointer_up_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.dispatch(EditorEvent::PointerUp)
    }

    /// Returns a callback for `zoom(delta)` (wheel).
    pub fn zoom_callback(&self) -> impl Fn(f32) {
        let ctrl = self.clone();
        move |delta| ctrl.dispatch(EditorEvent::Zoom(delta))
    }

    pub fn zoom_in_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.dispatch(EditorEvent::ZoomIn)
    }

    pub fn zoom_out_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.dispatch(EditorEvent::ZoomOut)
    }

    pub fn fit_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.dispatch(EditorEvent::FitRequested)
    }

    pub fn reset_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.dispatch(EditorEvent::ResetRequested)
    }

    /// Returns a callback for `viewport-resized(width, height)`.
    pub fn resized_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |width, height| ctrl.dispatch(EditorEvent::Resized(Size::new(width, height)))
    }

    /// Returns a callback for the host's next-frame notification.
    pub fn frame_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.on_frame()
    }
}
