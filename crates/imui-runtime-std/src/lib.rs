//! Standard UI executor backed by a dedicated `std` thread.
//!
//! This crate provides a concrete implementation of the
//! [`imui_core::UiExecutor`] trait. A [`ThreadExecutor`] moves the widget
//! tree onto its own named thread and runs every dispatched job there, one
//! at a time and in dispatch order. The reconciler can then be driven from
//! any other thread; each of its steps blocks until the executor thread has
//! applied it.

use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{unbounded, Receiver, Sender};
use imui_core::{Applier, ExecutorError, ExecutorHandle, Job, UiExecutor};
use parking_lot::Mutex;

/// Name given to the executor thread unless overridden.
pub const DEFAULT_THREAD_NAME: &str = "imui-ui";

/// Executor owning the widget tree on a dedicated thread.
pub struct ThreadExecutor {
    sender: Mutex<Option<Sender<Job>>>,
    thread: Mutex<Option<JoinHandle<Box<dyn Applier>>>>,
    thread_id: ThreadId,
    completed: Arc<AtomicU64>,
}

impl ThreadExecutor {
    /// Spawns the executor thread with the default name and hands `tree` to it.
    pub fn spawn(tree: impl Applier + 'static) -> io::Result<Arc<Self>> {
        Self::spawn_named(DEFAULT_THREAD_NAME, tree)
    }

    /// Spawns the executor thread under `name` and hands `tree` to it.
    pub fn spawn_named(name: &str, tree: impl Applier + 'static) -> io::Result<Arc<Self>> {
        let (sender, receiver) = unbounded();
        let completed = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&completed);
        let tree: Box<dyn Applier> = Box::new(tree);
        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_jobs(tree, receiver, counter))?;
        log::debug!("ui executor thread `{name}` started");
        Ok(Arc::new(Self {
            sender: Mutex::new(Some(sender)),
            thread_id: thread.thread().id(),
            thread: Mutex::new(Some(thread)),
            completed,
        }))
    }

    /// Returns a handle suitable for [`imui_core::Reconciler`].
    pub fn handle(self: &Arc<Self>) -> ExecutorHandle {
        ExecutorHandle::new(Arc::clone(self) as Arc<dyn UiExecutor>)
    }

    /// Identifier of the thread that owns the tree.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Returns whether the caller is running on the executor thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Number of jobs that ran to completion so far.
    pub fn completed_jobs(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Jobs queued but not yet started.
    pub fn pending_jobs(&self) -> usize {
        self.sender.lock().as_ref().map_or(0, Sender::len)
    }

    /// Returns whether the executor still accepts jobs.
    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Stops accepting jobs, lets the queued ones finish and returns the tree.
    ///
    /// Returns `None` when the executor was already shut down, when called
    /// from the executor thread itself, or when the thread died.
    pub fn shutdown(&self) -> Option<Box<dyn Applier>> {
        if self.is_current() {
            log::warn!("ui executor cannot shut itself down from one of its own jobs");
            return None;
        }
        drop(self.sender.lock().take());
        let thread = self.thread.lock().take()?;
        match thread.join() {
            Ok(tree) => {
                log::debug!("ui executor stopped after {} job(s)", self.completed_jobs());
                Some(tree)
            }
            Err(_) => {
                log::error!("ui executor thread panicked");
                None
            }
        }
    }
}

impl UiExecutor for ThreadExecutor {
    fn dispatch(&self, job: Job) -> Result<(), ExecutorError> {
        let sender = self.sender.lock();
        let sender = sender.as_ref().ok_or(ExecutorError::Closed)?;
        sender.send(job).map_err(|_| ExecutorError::Closed)
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        if self.thread.get_mut().is_some() {
            self.shutdown();
        }
    }
}

impl fmt::Debug for ThreadExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadExecutor")
            .field("thread_id", &self.thread_id)
            .field("running", &self.is_running())
            .field("completed", &self.completed_jobs())
            .finish()
    }
}

/// Body of the executor thread. Ends when every sender is gone.
fn run_jobs(
    mut tree: Box<dyn Applier>,
    receiver: Receiver<Job>,
    completed: Arc<AtomicU64>,
) -> Box<dyn Applier> {
    for job in receiver {
        // A panicking job drops its reply channel; the waiting caller sees
        // `ExecutorError::Dropped` and later jobs still run.
        if panic::catch_unwind(AssertUnwindSafe(|| job(&mut *tree))).is_err() {
            log::error!("ui job panicked; continuing with the next job");
            continue;
        }
        completed.fetch_add(1, Ordering::SeqCst);
    }
    tree
}
