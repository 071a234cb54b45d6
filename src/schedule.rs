//! Single-slot deferral of connector recomputation to the next paint.
//!
//! At most one request is outstanding. Scheduling again replaces it: the old
//! token goes stale and only the newest one runs, so any burst of triggers
//! within a frame collapses into one recomputation.

/// Handle for a scheduled recomputation. Later requests carry higher
/// generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    generation: u64,
    pending: Option<FrameToken>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new pending request, cancelling any outstanding one.
    pub fn schedule(&mut self) -> FrameToken {
        self.generation += 1;
        let token = FrameToken(self.generation);
        self.pending = Some(token);
        token
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The outstanding request, without consuming it.
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }
}
