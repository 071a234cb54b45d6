use crate::geometry::Size;
use crate::graph::NodeId;

/// Input raised by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Title field edited.
    TitleChanged { id: NodeId, text: String },
    /// Node card clicked or its title field focused.
    NodeClicked(NodeId),
    /// "Add root" button.
    AddRootRequested,
    /// The node's "+" button.
    AddChildRequested(NodeId),
    /// The node's "×" button.
    RemoveRequested(NodeId),
    /// Tab while a node (or its title field) has focus.
    TabPressed(NodeId),
    /// Enter while a node (or its title field) has focus.
    EnterPressed(NodeId),
    /// Delete or Backspace. `input_empty` is `false` only when the key went
    /// to a title field that still has text, in which case it just edits.
    DeleteOrBackspacePressed { id: NodeId, input_empty: bool },
    /// Pointer pressed on the canvas background; starts a pan.
    PointerDown { x: f32, y: f32 },
    PointerMoved { x: f32, y: f32 },
    PointerUp,
    /// Wheel or button zoom by an arbitrary step.
    Zoom(f32),
    ZoomIn,
    ZoomOut,
    FitRequested,
    ResetRequested,
    /// Viewport resized to the given size.
    Resized(Size),
}

/// Key text as delivered by Slint's `KeyEvent::text`.
mod keys {
    pub const TAB: &str = "\t";
    pub const BACKTAB: &str = "\u{19}";
    pub const RETURN: &str = "\n";
    pub const BACKSPACE: &str = "\u{8}";
    pub const DELETE: &str = "\u{7f}";
}

impl EditorEvent {
    /// Map a key press on node `id` to an event. `input_empty` is whether the
    /// title field receiving the key is empty (pass `true` outside a field).
    ///
    /// Shift-Tab behaves like Tab.
    pub fn from_key(id: NodeId, text: &str, input_empty: bool) -> Option<Self> {
        match text {
            keys::TAB | keys::BACKTAB => Some(Self::TabPressed(id)),
            keys::RETURN => Some(Self::EnterPressed(id)),
            keys::BACKSPACE | keys::DELETE => Some(Self::DeleteOrBackspacePressed { id, input_empty }),
            _ => None,
        }
    }
}
