use imui_core::{Applier, NodeError, NodeId, Style, Widget, WidgetArgs, WidgetKind};

use crate::kinds::IMAGE;
use crate::nodes::ImageNode;

pub struct ImageWidget {
    handle: NodeId,
}

impl ImageWidget {
    pub fn construct(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        let handle = tree.create(Box::new(ImageNode::default()));
        Ok(Box::new(Self { handle }))
    }
}

impl Widget for ImageWidget {
    fn kind(&self) -> WidgetKind {
        IMAGE
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        super::apply_style::<ImageNode>(tree, self.handle, IMAGE, style)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let WidgetArgs::Image {
            source,
            width,
            height,
        } = args
        else {
            return Err(super::unexpected(IMAGE));
        };
        tree.with_node_mut(self.handle, |node: &mut ImageNode| {
            if node.source != *source {
                log::trace!("image source changed to {source}");
                node.source.clone_from(source);
            }
            node.width = width.max(0.0);
            node.height = height.max(0.0);
        })
    }
}
