use std::fmt;
use std::sync::Arc;

use crossbeam_channel::bounded;
use parking_lot::Mutex;

use crate::platform::{Job, UiExecutor};
use crate::{Applier, ExecutorError};

/// Cloneable handle the reconciler uses to reach the UI executor.
#[derive(Clone)]
pub struct ExecutorHandle {
    executor: Arc<dyn UiExecutor>,
}

impl ExecutorHandle {
    pub fn new(executor: Arc<dyn UiExecutor>) -> Self {
        Self { executor }
    }

    /// Runs `job` on the executor and blocks until it finished, returning its output.
    pub fn run<R, F>(&self, job: F) -> Result<R, ExecutorError>
    where
        F: FnOnce(&mut dyn Applier) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, completion) = bounded(1);
        self.executor.dispatch(Box::new(move |tree: &mut dyn Applier| {
            // The waiting side only disappears if the driver itself panicked.
            let _ = reply.send(job(tree));
        }))?;
        completion.recv().map_err(|_| ExecutorError::Dropped)
    }

    /// Queues `job` without waiting for it.
    pub fn post(&self, job: impl FnOnce(&mut dyn Applier) + Send + 'static) -> Result<(), ExecutorError> {
        self.executor.dispatch(Box::new(job))
    }
}

impl fmt::Debug for ExecutorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorHandle").finish_non_exhaustive()
    }
}

/// Executor that runs every job on the dispatching thread.
///
/// Jobs are serialized by a mutex around the tree, so concurrent drivers still
/// never observe two mutations at once. Useful for tests and for hosts whose
/// driver already runs on the UI thread.
pub struct InlineExecutor {
    tree: Mutex<Box<dyn Applier>>,
}

impl InlineExecutor {
    pub fn new(tree: impl Applier + 'static) -> Self {
        Self {
            tree: Mutex::new(Box::new(tree)),
        }
    }

    /// Wraps a new inline executor into a handle.
    pub fn handle(tree: impl Applier + 'static) -> ExecutorHandle {
        ExecutorHandle::new(Arc::new(Self::new(tree)))
    }
}

impl UiExecutor for InlineExecutor {
    fn dispatch(&self, job: Job) -> Result<(), ExecutorError> {
        let mut tree = self.tree.lock();
        job(&mut **tree);
        Ok(())
    }
}
