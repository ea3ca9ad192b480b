//! Platform abstraction for the thread that owns the widget tree.
//!
//! Host toolkits usually allow their visual tree to be touched from a single
//! thread only. The reconciler never mutates the tree directly; it hands each
//! mutation to a [`UiExecutor`] and waits for the result, so the driver can
//! live on any thread while the tree stays with its owner.

use crate::{Applier, ExecutorError};

/// A unit of work that runs with exclusive access to the tree.
pub type Job = Box<dyn FnOnce(&mut dyn Applier) + Send + 'static>;

/// Serialized, single-consumer execution context owning the widget tree.
///
/// Implementations must run jobs one at a time, in dispatch order, each to
/// completion before the next one starts. They must be safe to share between
/// threads.
pub trait UiExecutor: Send + Sync {
    /// Queue `job` for execution on the tree owner.
    ///
    /// Returns [`ExecutorError::Closed`] once the executor stopped accepting
    /// work. Completion is signalled by the job itself; see
    /// [`ExecutorHandle::run`](crate::ExecutorHandle::run).
    fn dispatch(&self, job: Job) -> Result<(), ExecutorError>;
}
