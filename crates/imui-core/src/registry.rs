//! Positional id → live widget instance.
//!
//! The registry is dense: ids `0..len` are live and nothing else is. Inserting
//! past the end is rejected, so liveness is contiguous from 0 and the
//! invalidator's "scan until the first absent id" visits exactly the stale
//! tail.

use std::fmt;

use crate::{ControlId, NodeId, ReconcileError, Widget, WidgetKind};

pub(crate) struct ControlEntry {
    pub(crate) kind: WidgetKind,
    /// Container the handle was attached to when the instance was created.
    pub(crate) parent: NodeId,
    pub(crate) handle: NodeId,
    /// `None` only while the instance is out on the executor.
    pub(crate) widget: Option<Box<dyn Widget>>,
}

impl ControlEntry {
    pub(crate) fn new(parent: NodeId, widget: Box<dyn Widget>) -> Self {
        Self {
            kind: widget.kind(),
            parent,
            handle: widget.handle(),
            widget: Some(widget),
        }
    }
}

#[derive(Default)]
pub struct ControlRegistry {
    entries: Vec<ControlEntry>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ControlId) -> bool {
        id.raw() < self.entries.len()
    }

    pub fn kind_of(&self, id: ControlId) -> Option<WidgetKind> {
        self.entries.get(id.raw()).map(|entry| entry.kind)
    }

    pub fn handle_of(&self, id: ControlId) -> Option<NodeId> {
        self.entries.get(id.raw()).map(|entry| entry.handle)
    }

    pub fn ids(&self) -> impl Iterator<Item = ControlId> + '_ {
        (0..self.entries.len()).map(ControlId::new)
    }

    /// Reuse check: same kind, attached under the same container.
    pub(crate) fn matches(&self, id: ControlId, kind: WidgetKind, parent: NodeId) -> bool {
        self.entries
            .get(id.raw())
            .is_some_and(|entry| entry.kind == kind && entry.parent == parent)
    }

    pub(crate) fn insert(&mut self, id: ControlId, entry: ControlEntry) -> Result<(), ReconcileError> {
        let index = id.raw();
        match index.cmp(&self.entries.len()) {
            std::cmp::Ordering::Less => {
                self.entries[index] = entry;
                Ok(())
            }
            std::cmp::Ordering::Equal => {
                self.entries.push(entry);
                Ok(())
            }
            std::cmp::Ordering::Greater => Err(ReconcileError::NonContiguous {
                id,
                next: ControlId::new(self.entries.len()),
            }),
        }
    }

    pub(crate) fn take_widget(&mut self, id: ControlId) -> Result<Box<dyn Widget>, ReconcileError> {
        self.entries
            .get_mut(id.raw())
            .and_then(|entry| entry.widget.take())
            .ok_or(ReconcileError::InstanceMissing { id })
    }

    pub(crate) fn restore_widget(&mut self, id: ControlId, widget: Box<dyn Widget>) {
        if let Some(entry) = self.entries.get_mut(id.raw()) {
            entry.widget = Some(widget);
        }
    }

    /// Handles of every live id from `from` up to the first absent one.
    pub(crate) fn handles_from(&self, from: ControlId) -> Vec<NodeId> {
        self.entries
            .get(from.raw()..)
            .map(|tail| tail.iter().map(|entry| entry.handle).collect())
            .unwrap_or_default()
    }

    /// Removes every id `>= from` in one batch.
    pub(crate) fn remove_from(&mut self, from: ControlId) -> usize {
        let before = self.entries.len();
        self.entries.truncate(from.raw());
        before - self.entries.len()
    }
}

impl fmt::Debug for ControlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|entry| (entry.kind.name(), entry.handle)),
            )
            .finish()
    }
}
