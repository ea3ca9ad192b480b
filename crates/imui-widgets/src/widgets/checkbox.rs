use imui_core::{
    Applier, NodeError, NodeId, StateKey, StateValue, Style, Widget, WidgetArgs, WidgetKind,
};

use crate::kinds::CHECKBOX;
use crate::nodes::CheckboxNode;

/// The `checked` argument only seeds the node; afterwards the node is the
/// source of truth so host-side toggles are not overwritten by stale callers.
pub struct CheckboxWidget {
    handle: NodeId,
    seeded: bool,
}

impl CheckboxWidget {
    pub fn construct(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        let handle = tree.create(Box::new(CheckboxNode::default()));
        Ok(Box::new(Self {
            handle,
            seeded: false,
        }))
    }
}

impl Widget for CheckboxWidget {
    fn kind(&self) -> WidgetKind {
        CHECKBOX
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        super::apply_style::<CheckboxNode>(tree, self.handle, CHECKBOX, style)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let WidgetArgs::Checkbox { label, checked } = args else {
            return Err(super::unexpected(CHECKBOX));
        };
        let seed = !self.seeded;
        tree.with_node_mut(self.handle, |node: &mut CheckboxNode| {
            node.label.clone_from(label);
            if seed {
                node.checked = *checked;
            }
        })?;
        self.seeded = true;
        Ok(())
    }

    fn state(&self, key: StateKey, tree: &dyn Applier) -> Option<StateValue> {
        match key {
            StateKey::Checked => tree
                .with_node(self.handle, |node: &CheckboxNode| StateValue::Bool(node.checked))
                .ok(),
            _ => None,
        }
    }

    fn state_keys(&self) -> &'static [StateKey] {
        &[StateKey::Checked]
    }
}
