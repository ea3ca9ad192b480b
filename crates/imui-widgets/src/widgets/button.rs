//! Button widget implementation

use imui_core::{
    Applier, NodeError, NodeId, StateKey, StateValue, Style, Widget, WidgetArgs, WidgetKind,
};

use crate::kinds::BUTTON;
use crate::nodes::ButtonNode;

/// Reports `clicked` for presses the host recorded since the previous call.
pub struct ButtonWidget {
    handle: NodeId,
    clicked: bool,
}

impl ButtonWidget {
    pub fn construct(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        let handle = tree.create(Box::new(ButtonNode::default()));
        Ok(Box::new(Self {
            handle,
            clicked: false,
        }))
    }
}

impl Widget for ButtonWidget {
    fn kind(&self) -> WidgetKind {
        BUTTON
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        super::apply_style::<ButtonNode>(tree, self.handle, BUTTON, style)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let WidgetArgs::Button { label } = args else {
            return Err(super::unexpected(BUTTON));
        };
        let presses = tree.with_node_mut(self.handle, |node: &mut ButtonNode| {
            if node.label != *label {
                node.label.clone_from(label);
            }
            node.take_presses()
        })?;
        self.clicked = presses > 0;
        Ok(())
    }

    fn state(&self, key: StateKey, _tree: &dyn Applier) -> Option<StateValue> {
        match key {
            StateKey::Clicked => Some(StateValue::Bool(self.clicked)),
            _ => None,
        }
    }

    fn state_keys(&self) -> &'static [StateKey] {
        &[StateKey::Clicked]
    }
}
