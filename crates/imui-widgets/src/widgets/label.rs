use imui_core::{Applier, NodeError, NodeId, Style, Widget, WidgetArgs, WidgetKind};

use crate::kinds::LABEL;
use crate::nodes::LabelNode;

pub struct LabelWidget {
    handle: NodeId,
}

impl LabelWidget {
    pub fn construct(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        let handle = tree.create(Box::new(LabelNode::default()));
        Ok(Box::new(Self { handle }))
    }
}

impl Widget for LabelWidget {
    fn kind(&self) -> WidgetKind {
        LABEL
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        super::apply_style::<LabelNode>(tree, self.handle, LABEL, style)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let WidgetArgs::Label { text } = args else {
            return Err(super::unexpected(LABEL));
        };
        tree.with_node_mut(self.handle, |node: &mut LabelNode| {
            if node.text != *text {
                node.text.clone_from(text);
            }
        })
    }
}
