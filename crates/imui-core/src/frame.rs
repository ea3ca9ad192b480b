use std::fmt;

use crate::{ControlId, ReconcileError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Between frames; widget calls are rejected.
    Idle,
    Active,
    Disposed,
}

/// Per-frame id counter and begin/end protocol.
#[derive(Debug)]
pub struct FrameController {
    phase: FramePhase,
    counter: ControlId,
    frames: u64,
}

impl Default for FrameController {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameController {
    pub fn new() -> Self {
        Self {
            phase: FramePhase::Idle,
            counter: ControlId::default(),
            frames: 0,
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of frames begun so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Next id to be handed out; after the last call it is the exclusive
    /// upper bound of ids used this frame.
    pub fn counter(&self) -> ControlId {
        self.counter
    }

    pub fn begin(&mut self) -> Result<(), ReconcileError> {
        match self.phase {
            FramePhase::Idle => {
                self.phase = FramePhase::Active;
                self.counter = ControlId::default();
                self.frames += 1;
                Ok(())
            }
            FramePhase::Active => Err(ReconcileError::FrameAlreadyActive),
            FramePhase::Disposed => Err(ReconcileError::Disposed),
        }
    }

    pub fn ensure_active(&self) -> Result<(), ReconcileError> {
        match self.phase {
            FramePhase::Active => Ok(()),
            FramePhase::Idle => Err(ReconcileError::NoActiveFrame),
            FramePhase::Disposed => Err(ReconcileError::Disposed),
        }
    }

    pub fn next_id(&mut self) -> Result<ControlId, ReconcileError> {
        self.ensure_active()?;
        let id = self.counter;
        self.counter = id.next();
        Ok(id)
    }

    /// Hands `id` back when it was the last one issued.
    pub(crate) fn rewind(&mut self, id: ControlId) {
        if self.phase == FramePhase::Active && self.counter == id.next() {
            self.counter = id;
        }
    }

    /// Closes the frame and returns the final counter value.
    pub fn end(&mut self) -> Result<ControlId, ReconcileError> {
        self.ensure_active()?;
        self.phase = FramePhase::Idle;
        Ok(self.counter)
    }

    pub fn dispose(&mut self) {
        self.phase = FramePhase::Disposed;
    }
}

/// What one frame (or a disposal) did to the retained tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub calls: usize,
    pub created: usize,
    pub reused: usize,
    pub destroyed: usize,
    pub containers_created: usize,
    pub containers_pruned: usize,
}

impl FrameStats {
    /// True when the frame neither created nor destroyed anything.
    pub fn is_stable(&self) -> bool {
        self.created == 0
            && self.destroyed == 0
            && self.containers_created == 0
            && self.containers_pruned == 0
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} calls: {} created, {} reused, {} destroyed, {} containers created, {} containers pruned",
            self.calls,
            self.created,
            self.reused,
            self.destroyed,
            self.containers_created,
            self.containers_pruned
        )
    }
}
