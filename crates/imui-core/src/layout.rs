//! Nesting scopes and the containers that back them.
//!
//! The stack answers two questions: where does a newly created widget attach
//! (the innermost open scope, or the frame root), and which containers must
//! survive empty-container collapse while they are still open.
//!
//! Scope containers are retained between frames by ordinal: the k-th scope
//! opened in a frame reuses the container of the k-th scope of the previous
//! frame when axis, parent and the id of the first call after the opening all
//! agree, and the container is still attached there.

use std::ops::{Deref, DerefMut};

use indexmap::IndexSet;

use crate::collections::NodeSet;
use crate::{ControlId, Node, NodeId, Reconciler, StyleProps, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn kind(self) -> WidgetKind {
        match self {
            Axis::Horizontal => WidgetKind::HORIZONTAL,
            Axis::Vertical => WidgetKind::VERTICAL,
        }
    }
}

/// Toolkit container used for layout scopes and implicit roots.
#[derive(Debug, Clone)]
pub struct ContainerNode {
    axis: Axis,
    spacing: f32,
    padding: f32,
    children: IndexSet<NodeId>,
}

impl ContainerNode {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            padding: 0.0,
            children: IndexSet::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn set_style(&mut self, props: &StyleProps) {
        self.spacing = props.spacing;
        self.padding = props.padding;
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Node for ContainerNode {
    fn is_container(&self) -> bool {
        true
    }

    fn insert_child(&mut self, child: NodeId) {
        self.children.insert(child);
    }

    fn remove_child(&mut self, child: NodeId) {
        self.children.shift_remove(&child);
    }

    fn children(&self) -> Vec<NodeId> {
        self.children.iter().copied().collect()
    }

    fn debug_label(&self) -> String {
        format!("{:?}Container", self.axis)
    }
}

#[derive(Debug, Clone, Copy)]
struct ScopeRecord {
    axis: Axis,
    parent: NodeId,
    /// Frame counter when the scope was opened.
    first: ControlId,
    container: NodeId,
}

#[derive(Debug, Default)]
pub struct LayoutStack {
    open: Vec<NodeId>,
    records: Vec<Option<ScopeRecord>>,
    cursor: usize,
}

impl LayoutStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open scopes.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Attachment target for new widgets.
    pub fn target(&self, root: NodeId) -> NodeId {
        self.open.last().copied().unwrap_or(root)
    }

    /// Containers of every retained scope, in ordinal order.
    pub fn containers(&self) -> Vec<NodeId> {
        self.records
            .iter()
            .flatten()
            .map(|record| record.container)
            .collect()
    }

    pub(crate) fn reset(&mut self) {
        self.open.clear();
        self.cursor = 0;
    }

    pub(crate) fn next_ordinal(&mut self) -> usize {
        let ordinal = self.cursor;
        self.cursor += 1;
        ordinal
    }

    /// Scopes opened so far this frame.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn candidate(
        &self,
        ordinal: usize,
        axis: Axis,
        parent: NodeId,
        first: ControlId,
    ) -> Option<NodeId> {
        self.records
            .get(ordinal)
            .copied()
            .flatten()
            .filter(|record| record.axis == axis && record.parent == parent && record.first == first)
            .map(|record| record.container)
    }

    pub(crate) fn record(
        &mut self,
        ordinal: usize,
        axis: Axis,
        parent: NodeId,
        first: ControlId,
        container: NodeId,
    ) {
        let record = Some(ScopeRecord {
            axis,
            parent,
            first,
            container,
        });
        if ordinal < self.records.len() {
            self.records[ordinal] = record;
        } else {
            self.records.resize(ordinal, None);
            self.records.push(record);
        }
    }

    /// Drops every record from `from` on and returns their containers.
    pub(crate) fn truncate(&mut self, from: usize) -> Vec<NodeId> {
        if from >= self.records.len() {
            return Vec::new();
        }
        self.records
            .drain(from..)
            .flatten()
            .map(|record| record.container)
            .collect()
    }

    /// Marks records whose container was collapsed out of the tree.
    pub(crate) fn forget(&mut self, containers: &[NodeId]) {
        if containers.is_empty() {
            return;
        }
        for slot in self.records.iter_mut() {
            if slot.is_some_and(|record| containers.contains(&record.container)) {
                *slot = None;
            }
        }
    }

    pub(crate) fn push(&mut self, container: NodeId) -> usize {
        self.open.push(container);
        self.open.len()
    }

    pub(crate) fn pop_to(&mut self, depth: usize) {
        self.open.truncate(depth);
    }

    /// Root plus every open container; collapse never detaches these.
    pub(crate) fn boundary(&self, root: NodeId) -> NodeSet {
        let mut boundary: NodeSet = self.open.iter().copied().collect();
        boundary.insert(root);
        boundary
    }
}

/// An open layout scope. Dropping it closes the scope.
///
/// The guard dereferences to the [`Reconciler`], so widget calls made through
/// it attach inside the scope's container.
pub struct LayoutScope<'r> {
    reconciler: &'r mut Reconciler,
    depth: usize,
    container: NodeId,
}

impl<'r> LayoutScope<'r> {
    pub(crate) fn new(reconciler: &'r mut Reconciler, depth: usize, container: NodeId) -> Self {
        Self {
            reconciler,
            depth,
            container,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Closes the scope explicitly.
    pub fn close(self) {}
}

impl Deref for LayoutScope<'_> {
    type Target = Reconciler;

    fn deref(&self) -> &Reconciler {
        self.reconciler
    }
}

impl DerefMut for LayoutScope<'_> {
    fn deref_mut(&mut self) -> &mut Reconciler {
        self.reconciler
    }
}

impl Drop for LayoutScope<'_> {
    fn drop(&mut self) {
        self.reconciler.layout.pop_to(self.depth - 1);
    }
}
