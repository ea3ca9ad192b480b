//! Error types for the reconciler, the toolkit tree and the executor hand-off.

use thiserror::Error;

use crate::{ControlId, NodeId, WidgetKind};

/// Failures reported by the toolkit tree or by a widget touching it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("node {id} missing")]
    Missing { id: NodeId },
    #[error("node {id} type mismatch; expected {expected}")]
    TypeMismatch { id: NodeId, expected: &'static str },
    #[error("node {id} is already attached to node {parent}")]
    AlreadyAttached { id: NodeId, parent: NodeId },
    #[error("node {id} cannot be attached to itself")]
    Cycle { id: NodeId },
    #[error("widget `{kind}` received arguments for another kind")]
    UnexpectedArgs { kind: WidgetKind },
}

/// Failures of the hand-off between the driver and the UI executor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorError {
    /// The executor no longer accepts jobs.
    #[error("ui executor is shut down")]
    Closed,
    /// The job was accepted but never reported back (it panicked or was dropped).
    #[error("ui executor dropped the job before completing it")]
    Dropped,
}

/// Top-level error of every reconciler operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("no factory registered for widget kind `{kind}`")]
    MissingFactory { kind: WidgetKind },
    #[error("factories cannot be registered once the first frame began (kind `{kind}`)")]
    RegistrationClosed { kind: WidgetKind },
    #[error("widget call issued outside of begin_frame/end_frame")]
    NoActiveFrame,
    #[error("begin_frame called while a frame is already active")]
    FrameAlreadyActive,
    #[error("reconciler has been disposed")]
    Disposed,
    #[error("end_frame called with {open} layout scope(s) still open")]
    UnbalancedLayout { open: usize },
    #[error("control {id} would leave a gap in the registry (next free id is {next})")]
    NonContiguous { id: ControlId, next: ControlId },
    #[error("control {id} has no widget instance")]
    InstanceMissing { id: ControlId },
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}
