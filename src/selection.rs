//! The active node and its one-shot focus request.

use crate::graph::NodeId;

/// Which node, if any, is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    NoSelection,
    Selected(NodeId),
}

/// Active node plus a one-shot "give its title field focus" request.
///
/// Entering `Selected` through [`select`](Self::select) raises the request;
/// it stays raised across re-renders until the renderer confirms focus with
/// [`focus_applied`](Self::focus_applied). Unrelated re-renders therefore
/// never steal focus again.
#[derive(Debug, Default)]
pub struct ActiveSelection {
    state: SelectionState,
    pending_focus: bool,
}

impl ActiveSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` active and request focus for it.
    pub fn select(&mut self, id: NodeId) {
        self.state = SelectionState::Selected(id);
        self.pending_focus = true;
    }

    /// Make `id` active without requesting focus.
    pub fn restore(&mut self, id: NodeId) {
        self.state = SelectionState::Selected(id);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn active(&self) -> Option<&NodeId> {
        match &self.state {
            SelectionState::Selected(id) => Some(id),
            SelectionState::NoSelection => None,
        }
    }

    pub fn is_active(&self, id: &NodeId) -> bool {
        self.active() == Some(id)
    }

    /// Node whose title should receive focus, while the request is open.
    pub fn focus_target(&self) -> Option<&NodeId> {
        if self.pending_focus {
            self.active()
        } else {
            None
        }
    }

    pub fn has_pending_focus(&self) -> bool {
        self.pending_focus
    }

    /// Close the focus request after the renderer focused the field.
    pub fn focus_applied(&mut self) {
        self.pending_focus = false;
    }
}
