#![doc = r"Reconciliation core: immediate-mode widget calls backed by a retained tree."]

pub mod collections;
pub mod config;
pub mod error;
pub mod executor;
pub mod factory;
pub mod frame;
pub mod invalidate;
pub mod layout;
pub mod platform;
pub mod reconciler;
pub mod registry;
pub mod style;
pub mod widget;

pub use config::ReconcilerConfig;
pub use error::{ExecutorError, NodeError, ReconcileError};
pub use executor::{ExecutorHandle, InlineExecutor};
pub use factory::{FactoryRegistry, WidgetFactory, WidgetKind};
pub use frame::{FrameController, FramePhase, FrameStats};
pub use layout::{Axis, ContainerNode, LayoutScope, LayoutStack};
pub use platform::{Job, UiExecutor};
pub use reconciler::Reconciler;
pub use registry::ControlRegistry;
pub use style::{Color, DefaultStyle, Style, StyleProps};
pub use widget::{StateKey, StateValue, Widget, WidgetArgs, WidgetResponse};

use std::any::Any;
use std::fmt;

/// Handle of a node inside the toolkit tree.
pub type NodeId = usize;

/// Positional identity of a widget call: "the Nth call issued this frame".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ControlId(usize);

impl ControlId {
    #[inline]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait Node: Any + Send {
    fn is_container(&self) -> bool {
        false
    }
    fn mount(&mut self) {}
    fn unmount(&mut self) {}
    fn insert_child(&mut self, _child: NodeId) {}
    fn remove_child(&mut self, _child: NodeId) {}
    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }
    fn debug_label(&self) -> String {
        short_type_name(std::any::type_name_of_val(self)).to_string()
    }
}

impl dyn Node {
    pub fn as_any(&self) -> &dyn Any {
        self
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    pub fn downcast_ref<N: Node>(&self) -> Option<&N> {
        self.as_any().downcast_ref::<N>()
    }

    pub fn downcast_mut<N: Node>(&mut self) -> Option<&mut N> {
        self.as_any_mut().downcast_mut::<N>()
    }
}

/// Mutation interface of the toolkit tree. Only the UI executor calls it.
pub trait Applier: Send {
    fn create(&mut self, node: Box<dyn Node>) -> NodeId;
    fn get(&self, id: NodeId) -> Result<&dyn Node, NodeError>;
    fn get_mut(&mut self, id: NodeId) -> Result<&mut dyn Node, NodeError>;
    fn contains(&self, id: NodeId) -> bool;
    /// Attaches `child` under `parent`. A child may have at most one parent.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError>;
    /// Detaches `child` from its parent, returning the former parent.
    fn detach(&mut self, child: NodeId) -> Result<Option<NodeId>, NodeError>;
    fn parent(&self, id: NodeId) -> Option<NodeId>;
    /// Detaches `id` and destroys it together with its whole subtree.
    fn remove(&mut self, id: NodeId) -> Result<(), NodeError>;

    fn children(&self, id: NodeId) -> Result<Vec<NodeId>, NodeError> {
        Ok(self.get(id)?.children())
    }
}

impl dyn Applier + '_ {
    pub fn with_node<N: Node, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&N) -> R,
    ) -> Result<R, NodeError> {
        let node = self.get(id)?;
        let typed = node.downcast_ref::<N>().ok_or(NodeError::TypeMismatch {
            id,
            expected: std::any::type_name::<N>(),
        })?;
        Ok(f(typed))
    }

    pub fn with_node_mut<N: Node, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut N) -> R,
    ) -> Result<R, NodeError> {
        let node = self.get_mut(id)?;
        let typed = node.downcast_mut::<N>().ok_or(NodeError::TypeMismatch {
            id,
            expected: std::any::type_name::<N>(),
        })?;
        Ok(f(typed))
    }
}

struct NodeEntry {
    node: Box<dyn Node>,
    parent: Option<NodeId>,
}

#[derive(Default)]
pub struct MemoryApplier {
    nodes: Vec<Option<NodeEntry>>,
}

impl MemoryApplier {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dump_tree(&self, root: Option<NodeId>) -> String {
        match root {
            Some(root_id) => dump_subtree(self, root_id),
            None => "(no root)\n".to_string(),
        }
    }

    fn entry(&self, id: NodeId) -> Result<&NodeEntry, NodeError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(NodeError::Missing { id })
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry, NodeError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(NodeError::Missing { id })
    }
}

impl Applier for MemoryApplier {
    fn create(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(NodeEntry { node, parent: None }));
        id
    }

    fn get(&self, id: NodeId) -> Result<&dyn Node, NodeError> {
        Ok(self.entry(id)?.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut dyn Node, NodeError> {
        Ok(self.entry_mut(id)?.node.as_mut())
    }

    fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(Some(_)))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        if parent == child {
            return Err(NodeError::Cycle { id: child });
        }
        if let Some(existing) = self.entry(child)?.parent {
            return Err(NodeError::AlreadyAttached {
                id: child,
                parent: existing,
            });
        }
        self.entry_mut(parent)?.node.insert_child(child);
        let entry = self.entry_mut(child)?;
        entry.parent = Some(parent);
        entry.node.mount();
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<Option<NodeId>, NodeError> {
        let parent = self.entry_mut(child)?.parent.take();
        if let Some(parent_id) = parent {
            if let Ok(parent_entry) = self.entry_mut(parent_id) {
                parent_entry.node.remove_child(child);
            }
            self.entry_mut(child)?.node.unmount();
        }
        Ok(parent)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).ok().and_then(|entry| entry.parent)
    }

    fn remove(&mut self, id: NodeId) -> Result<(), NodeError> {
        self.detach(id)?;
        let children = self.entry(id)?.node.children();
        for child_id in children {
            // Children that were already destroyed are skipped.
            if self.contains(child_id) {
                self.remove(child_id)?;
            }
        }
        if let Some(slot) = self.nodes.get_mut(id) {
            slot.take();
        }
        Ok(())
    }
}

/// Renders the subtree under `root`, one node per line, indented by depth.
pub fn dump_subtree(tree: &dyn Applier, root: NodeId) -> String {
    let mut output = String::new();
    dump_node(tree, &mut output, root, 0);
    output
}

fn dump_node(tree: &dyn Applier, output: &mut String, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    match tree.get(id) {
        Ok(node) => {
            output.push_str(&format!("{}[{}] {}\n", indent, id, node.debug_label()));
            for child_id in node.children() {
                dump_node(tree, output, child_id, depth + 1);
            }
        }
        Err(_) => output.push_str(&format!("{}[{}] (missing)\n", indent, id)),
    }
}

fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
