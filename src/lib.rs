//! # Impact Map Editor
//!
//! Editing core for impact maps: trees of short text nodes laid out in
//! fixed columns (objective, tier, means, ...) on a pannable, zoomable
//! canvas, with curved connectors drawn from each parent to its children.
//!
//! ## Features
//!
//! - **Column Tree Model** - Parent links, one column per depth, cascading removal
//! - **Explicit State** - One [`Editor`] value, no globals, fully testable headless
//! - **Sink-Based Rendering** - The core emits frames; any UI can implement [`RenderSink`]
//! - **Deferred Connectors** - Recomputed once per paint, however many changes land
//! - **Pluggable Storage** - [`MemoryStorage`] and [`FileStorage`] behind [`StorageBackend`]
//!
//! ## Quick Start
//!
//! ```ignore
//! let storage = Arc::new(MemoryStorage::new());
//! let ctrl = ImpactMapController::new(EditorConfig::default(), storage, my_sink)?;
//! ctrl.startup();
//! ctrl.dispatch(EditorEvent::AddRootRequested);
//! ```
//!
//! ## Rust Helpers
//!
//! - [`NodeStore`] - Node collection and tree edits
//! - [`ViewState`] - Pan/zoom camera with fit and center
//! - [`GeometryCache`] - Measured node boxes in content space
//! - [`compute_connectors`] - Bezier connectors for every measured edge
//! - [`arrange_columns`] - Column bucketing for the renderer
//! - [`ModelSink`] - [`RenderSink`] backed by Slint `VecModel`s

pub mod config;
pub mod connectors;
pub mod controller;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod path;
pub mod persistence;
pub mod schedule;
pub mod selection;
pub mod sink;
pub mod state;
pub mod view;

pub use config::{EditorConfig, ScaleBounds, DEFAULT_COLUMN_LABELS, DEFAULT_NODES_KEY, DEFAULT_VIEW_KEY};
pub use connectors::{compute_connectors, Connector};
pub use controller::ImpactMapController;
pub use editor::{Editor, EditorOutput, FrameSnapshot, FrameWork};
pub use error::{ConfigError, StorageError, StorageResult};
pub use event::EditorEvent;
pub use geometry::{bounding_box, NodeGeometry, Rect, Size};
pub use graph::{Node, NodeId, NodeStore, Removal};
pub use layout::{arrange_columns, ColumnView};
pub use path::ConnectorCurve;
pub use persistence::{FileStorage, MemoryStorage, Persistence, Snapshot, StorageBackend};
pub use schedule::{FrameScheduler, FrameToken};
pub use selection::{ActiveSelection, SelectionState};
pub use sink::{ConnectorRow, ModelSink, NodeRow, RenderFrame, RenderSink};
pub use state::GeometryCache;
pub use view::{PanSession, Transform, ViewState};

/// Version shown in the editor's footer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
