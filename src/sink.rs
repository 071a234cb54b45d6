//! Render sink: where the editor pushes what should be on screen.
//!
//! The editor core never touches UI objects. After each change it hands a
//! [`RenderFrame`], the current [`Transform`] and, one frame later, the
//! connector list to a [`RenderSink`]. [`ModelSink`] is the stock
//! implementation that mirrors everything into Slint models.
//!
//! # Example
//!
//! ```ignore
//! use impact_map::{ModelSink, ImpactMapController};
//!
//! let nodes = Rc::new(VecModel::<NodeData>::default());
//! let links = Rc::new(VecModel::<LinkPath>::default());
//! let sink = ModelSink::new(
//!     nodes.clone(),
//!     |row| NodeData { id: row.id.clone(), title: row.title.clone(), column: row.column, row: row.row, active: row.active },
//!     links.clone(),
//!     |c| LinkPath { id: c.child_id.clone(), path_commands: c.path_commands.clone() },
//! )
//! .with_transform_handler({
//!     let w = window.as_weak();
//!     move |t| if let Some(w) = w.upgrade() { w.set_zoom(t.scale); w.set_pan_x(t.translate_x); w.set_pan_y(t.translate_y); }
//! });
//! window.set_nodes(ModelRc::from(nodes));
//! window.set_link_paths(ModelRc::from(links));
//! ```

use crate::connectors::Connector;
use crate::graph::{Node, NodeId};
use crate::layout::ColumnView;
use crate::view::Transform;
use slint::{Model, SharedString, VecModel};
use std::collections::HashMap;
use std::rc::Rc;

/// Snapshot of the document for one render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub nodes: &'a [Node],
    pub columns: &'a [ColumnView],
    pub active_id: Option<&'a NodeId>,
    /// Column labels, indexed by `Node::column`.
    pub labels: &'a [String],
    pub version: &'static str,
}

/// Flattened node for list models.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub id: SharedString,
    pub title: SharedString,
    pub column: i32,
    /// Position within the column, top to bottom.
    pub row: i32,
    /// Label of the node's column, shown as the node's caption.
    pub label: SharedString,
    pub active: bool,
}

/// Flattened connector for list models.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorRow {
    pub parent_id: SharedString,
    pub child_id: SharedString,
    pub path_commands: SharedString,
}

impl RenderFrame<'_> {
    /// Placed nodes in column order, then top to bottom.
    pub fn node_rows(&self) -> Vec<NodeRow> {
        let by_id: HashMap<&NodeId, &Node> = self.nodes.iter().map(|n| (&n.id, n)).collect();
        let mut rows = Vec::with_capacity(self.nodes.len());
        for column in self.columns {
            let label: SharedString = self
                .labels
                .get(column.index)
                .map(|l| l.as_str())
                .unwrap_or_default()
                .into();
            for (row, id) in column.node_ids.iter().enumerate() {
                let Some(node) = by_id.get(id) else { continue };
                rows.push(NodeRow {
                    id: id.as_str().into(),
                    title: node.title.as_str().into(),
                    column: column.index as i32,
                    row: row as i32,
                    label: label.clone(),
                    active: self.active_id == Some(id),
                });
            }
        }
        rows
    }
}

impl From<&Connector> for ConnectorRow {
    fn from(c: &Connector) -> Self {
        Self {
            parent_id: c.parent_id.as_str().into(),
            child_id: c.child_id.as_str().into(),
            path_commands: c.path_commands().into(),
        }
    }
}

/// Consumer of editor output. Implemented by the UI layer.
pub trait RenderSink {
    /// Rebuild the node display.
    fn render(&mut self, frame: &RenderFrame<'_>);

    /// Move the content layer.
    fn apply_transform(&mut self, transform: Transform);

    /// Replace all connector curves.
    fn draw_connectors(&mut self, connectors: &[Connector]);

    /// Focus and select the title field of `id`. Returns `false` if the
    /// field does not exist yet, in which case the editor retries next frame.
    fn focus_title(&mut self, id: &NodeId) -> bool;

    /// Ask the host to call back on the next paint opportunity.
    fn request_frame(&mut self) {}
}

/// Overwrite `model` with `rows`, reusing existing rows.
fn sync_rows<T, I>(model: &VecModel<T>, rows: I)
where
    T: Clone + 'static,
    I: IntoIterator<Item = T>,
{
    let mut count = 0;
    for (i, item) in rows.into_iter().enumerate() {
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
        count = i + 1;
    }
    while model.row_count() > count {
        model.remove(model.row_count() - 1);
    }
}

/// [`RenderSink`] mirroring the editor into Slint `VecModel`s.
///
/// Row types are the application's generated Slint structs; the constructors
/// map the crate's [`NodeRow`] / [`ConnectorRow`] onto them.
pub struct ModelSink<N, C> {
    nodes: Rc<VecModel<N>>,
    node_ctor: Box<dyn Fn(&NodeRow) -> N>,
    connectors: Rc<VecModel<C>>,
    connector_ctor: Box<dyn Fn(&ConnectorRow) -> C>,
    column_titles: Rc<VecModel<SharedString>>,
    version: SharedString,
    on_transform: Option<Box<dyn Fn(Transform)>>,
    on_focus: Option<Box<dyn Fn(&NodeId) -> bool>>,
    on_frame_request: Option<Box<dyn Fn()>>,
}

impl<N, C> ModelSink<N, C>
where
    N: Clone + 'static,
    C: Clone + 'static,
{
    pub fn new<FN, FC>(
        nodes: Rc<VecModel<N>>,
        node_ctor: FN,
        connectors: Rc<VecModel<C>>,
        connector_ctor: FC,
    ) -> Self
    where
        FN: Fn(&NodeRow) -> N + 'static,
        FC: Fn(&ConnectorRow) -> C + 'static,
    {
        Self {
            nodes,
            node_ctor: Box::new(node_ctor),
            connectors,
            connector_ctor: Box::new(connector_ctor),
            column_titles: Rc::new(VecModel::default()),
            version: SharedString::default(),
            on_transform: None,
            on_focus: None,
            on_frame_request: None,
        }
    }

    pub fn with_transform_handler(mut self, f: impl Fn(Transform) + 'static) -> Self {
        self.on_transform = Some(Box::new(f));
        self
    }

    pub fn with_focus_handler(mut self, f: impl Fn(&NodeId) -> bool + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    pub fn with_frame_requester(mut self, f: impl Fn() + 'static) -> Self {
        self.on_frame_request = Some(Box::new(f));
        self
    }

    /// Column header titles, e.g. `"1. Objective"`.
    pub fn column_titles(&self) -> Rc<VecModel<SharedString>> {
        self.column_titles.clone()
    }

    /// Version string from the last rendered frame.
    pub fn version(&self) -> SharedString {
        self.version.clone()
    }
}

impl<N, C> RenderSink for ModelSink<N, C>
where
    N: Clone + 'static,
    C: Clone + 'static,
{
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let rows = frame.node_rows();
        sync_rows(&self.nodes, rows.iter().map(|r| (self.node_ctor)(r)));
        sync_rows(
            &self.column_titles,
            frame.columns.iter().map(|c| SharedString::from(c.title.as_str())),
        );
        self.version = frame.version.into();
    }

    fn apply_transform(&mut self, transform: Transform) {
        if let Some(f) = &self.on_transform {
            f(transform);
        }
    }

    fn draw_connectors(&mut self, connectors: &[Connector]) {
        sync_rows(
            &self.connectors,
            connectors.iter().map(|c| (self.connector_ctor)(&ConnectorRow::from(c))),
        );
    }

    fn focus_title(&mut self, id: &NodeId) -> bool {
        match &self.on_focus {
            Some(f) => f(id),
            None => true,
        }
    }

    fn request_frame(&mut self) {
        if let Some(f) = &self.on_frame_request {
            f();
        }
    }
}
