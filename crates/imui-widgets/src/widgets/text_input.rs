use imui_core::{
    Applier, NodeError, NodeId, StateKey, StateValue, Style, Widget, WidgetArgs, WidgetKind,
};

use crate::kinds::TEXT_INPUT;
use crate::nodes::TextInputNode;

/// The `text` argument seeds the node once; later edits come from the host.
pub struct TextInputWidget {
    handle: NodeId,
    seeded: bool,
}

impl TextInputWidget {
    pub fn construct(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        let handle = tree.create(Box::new(TextInputNode::default()));
        Ok(Box::new(Self {
            handle,
            seeded: false,
        }))
    }
}

impl Widget for TextInputWidget {
    fn kind(&self) -> WidgetKind {
        TEXT_INPUT
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        super::apply_style::<TextInputNode>(tree, self.handle, TEXT_INPUT, style)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let WidgetArgs::TextInput { label, text } = args else {
            return Err(super::unexpected(TEXT_INPUT));
        };
        let seed = !self.seeded;
        tree.with_node_mut(self.handle, |node: &mut TextInputNode| {
            node.label.clone_from(label);
            if seed {
                node.text.clone_from(text);
            }
        })?;
        self.seeded = true;
        Ok(())
    }

    fn state(&self, key: StateKey, tree: &dyn Applier) -> Option<StateValue> {
        match key {
            StateKey::Text => tree
                .with_node(self.handle, |node: &TextInputNode| {
                    StateValue::Text(node.text.clone())
                })
                .ok(),
            _ => None,
        }
    }

    fn state_keys(&self) -> &'static [StateKey] {
        &[StateKey::Text]
    }
}
