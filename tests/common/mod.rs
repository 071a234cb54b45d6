//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use impact_map::{NodeId, Transform};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Tracks sink handler invocations for testing.
///
/// Each field records calls to the corresponding handler with their arguments.
#[derive(Clone)]
pub struct CallbackTracker {
    /// Every transform pushed to the content layer.
    pub transforms: Rc<RefCell<Vec<Transform>>>,
    /// Node ids whose title field was asked to take focus.
    pub focus_requests: Rc<RefCell<Vec<NodeId>>>,
    /// Count of request_frame calls.
    pub frame_requests: Rc<Cell<usize>>,
    /// Whether focus requests succeed (the field exists).
    pub focus_ready: Rc<Cell<bool>>,
}

impl Default for CallbackTracker {
    fn default() -> Self {
        Self {
            transforms: Rc::default(),
            focus_requests: Rc::default(),
            frame_requests: Rc::default(),
            focus_ready: Rc::new(Cell::new(true)),
        }
    }
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.transforms.borrow_mut().clear();
        self.focus_requests.borrow_mut().clear();
        self.frame_requests.set(0);
    }

    pub fn last_transform(&self) -> Option<Transform> {
        self.transforms.borrow().last().copied()
    }
}
