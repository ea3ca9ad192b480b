//! Tree-side half of invalidation. Everything here runs on the UI executor.
//!
//! Detaching a node may leave its container empty. An empty container is
//! detached and destroyed as well, and the check repeats on its parent, until
//! a non-empty container or a node of the pruning boundary (the root and the
//! containers of open scopes) is reached.

use crate::collections::NodeSet;
use crate::{Applier, NodeError, NodeId};

/// Result of one pruning job.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// Nodes destroyed because their id or scope was invalidated.
    pub destroyed: usize,
    /// Containers removed because they became empty.
    pub collapsed: Vec<NodeId>,
}

/// Detaches and destroys the widget `handles`, in id order.
pub fn prune_widgets(
    tree: &mut dyn Applier,
    handles: &[NodeId],
    boundary: &NodeSet,
) -> Result<PruneReport, NodeError> {
    let mut report = PruneReport::default();
    for &handle in handles {
        if !tree.contains(handle) {
            continue;
        }
        if let Some(parent) = tree.detach(handle)? {
            collapse_empty(tree, parent, boundary, &mut report.collapsed)?;
        }
        tree.remove(handle)?;
        report.destroyed += 1;
    }
    Ok(report)
}

/// Destroys stale scope containers. `containers` is in opening order, so it is
/// walked backwards to handle nested scopes before their parents.
pub fn destroy_containers(
    tree: &mut dyn Applier,
    containers: &[NodeId],
    boundary: &NodeSet,
) -> Result<PruneReport, NodeError> {
    let mut report = PruneReport::default();
    for &container in containers.iter().rev() {
        if report.collapsed.contains(&container) || !tree.contains(container) {
            continue;
        }
        if let Some(parent) = tree.detach(container)? {
            collapse_empty(tree, parent, boundary, &mut report.collapsed)?;
        }
        tree.remove(container)?;
        report.destroyed += 1;
    }
    Ok(report)
}

/// Walks up from `container` removing containers left without children.
pub fn collapse_empty(
    tree: &mut dyn Applier,
    container: NodeId,
    boundary: &NodeSet,
    collapsed: &mut Vec<NodeId>,
) -> Result<(), NodeError> {
    let mut current = container;
    loop {
        if boundary.contains(&current) {
            return Ok(());
        }
        let node = tree.get(current)?;
        if !node.is_container() || !node.children().is_empty() {
            return Ok(());
        }
        let parent = tree.detach(current)?;
        tree.remove(current)?;
        log::trace!("collapsed empty container {current}");
        collapsed.push(current);
        match parent {
            Some(next) => current = next,
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Axis, ContainerNode, MemoryApplier, Node};

    struct Leaf;

    impl Node for Leaf {}

    fn container(tree: &mut MemoryApplier, parent: Option<NodeId>) -> NodeId {
        let id = tree.create(Box::new(ContainerNode::new(Axis::Vertical)));
        if let Some(parent) = parent {
            tree.attach(parent, id).unwrap();
        }
        id
    }

    fn leaf(tree: &mut MemoryApplier, parent: NodeId) -> NodeId {
        let id = tree.create(Box::new(Leaf));
        tree.attach(parent, id).unwrap();
        id
    }

    fn boundary(nodes: &[NodeId]) -> NodeSet {
        nodes.iter().copied().collect()
    }

    #[test]
    fn removing_last_leaf_collapses_up_to_non_empty_ancestor() {
        let mut tree = MemoryApplier::new();
        let root = container(&mut tree, None);
        let outer = container(&mut tree, Some(root));
        let sibling = leaf(&mut tree, outer);
        let middle = container(&mut tree, Some(outer));
        let inner = container(&mut tree, Some(middle));
        let target = leaf(&mut tree, inner);

        let report = prune_widgets(&mut tree, &[target], &boundary(&[root])).unwrap();

        assert_eq!(report.destroyed, 1);
        assert_eq!(report.collapsed, vec![inner, middle]);
        assert!(!tree.contains(target));
        assert!(!tree.contains(inner));
        assert!(!tree.contains(middle));
        assert_eq!(tree.children(outer).unwrap(), vec![sibling]);
    }

    #[test]
    fn collapse_stops_at_root() {
        let mut tree = MemoryApplier::new();
        let root = container(&mut tree, None);
        let scope = container(&mut tree, Some(root));
        let target = leaf(&mut tree, scope);

        let report = prune_widgets(&mut tree, &[target], &boundary(&[root])).unwrap();

        assert_eq!(report.collapsed, vec![scope]);
        assert!(tree.contains(root));
        assert!(tree.children(root).unwrap().is_empty());
    }

    #[test]
    fn collapse_stops_at_open_scope() {
        let mut tree = MemoryApplier::new();
        let root = container(&mut tree, None);
        let open = container(&mut tree, Some(root));
        let target = leaf(&mut tree, open);

        let report = prune_widgets(&mut tree, &[target], &boundary(&[root, open])).unwrap();

        assert!(report.collapsed.is_empty());
        assert_eq!(tree.parent(open), Some(root));
    }

    #[test]
    fn nested_stale_containers_are_destroyed_innermost_first() {
        let mut tree = MemoryApplier::new();
        let root = container(&mut tree, None);
        let keep = leaf(&mut tree, root);
        let outer = container(&mut tree, Some(root));
        let inner = container(&mut tree, Some(outer));

        let report = destroy_containers(&mut tree, &[outer, inner], &boundary(&[root])).unwrap();

        // Removing `inner` empties `outer`, which collapses before its own turn.
        assert_eq!(report.destroyed, 1);
        assert_eq!(report.collapsed, vec![outer]);
        assert_eq!(tree.children(root).unwrap(), vec![keep]);
        assert_eq!(tree.len(), 2);
    }
}
