use imui_core::{
    Applier, NodeError, NodeId, StateKey, StateValue, Style, Widget, WidgetArgs, WidgetKind,
};

use crate::kinds::SLIDER;
use crate::nodes::SliderNode;

/// Seeds the value once; the range is reapplied (and the live value clamped
/// into it) on every call.
pub struct SliderWidget {
    handle: NodeId,
    seeded: bool,
}

impl SliderWidget {
    pub fn construct(tree: &mut dyn Applier) -> Result<Box<dyn Widget>, NodeError> {
        let handle = tree.create(Box::new(SliderNode::default()));
        Ok(Box::new(Self {
            handle,
            seeded: false,
        }))
    }
}

impl Widget for SliderWidget {
    fn kind(&self) -> WidgetKind {
        SLIDER
    }

    fn handle(&self) -> NodeId {
        self.handle
    }

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError> {
        super::apply_style::<SliderNode>(tree, self.handle, SLIDER, style)
    }

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError> {
        let WidgetArgs::Slider {
            label,
            value,
            min,
            max,
        } = args
        else {
            return Err(super::unexpected(SLIDER));
        };
        let seed = !self.seeded;
        let handle = self.handle;
        tree.with_node_mut(handle, |node: &mut SliderNode| {
            node.label.clone_from(label);
            if seed {
                node.value = *value;
            }
            if node.value.is_nan() {
                node.value = node.min;
            }
            let before = node.value;
            node.set_range(*min, *max);
            if node.value != before {
                log::trace!("slider {handle} clamped {before} to {}", node.value);
            }
        })?;
        self.seeded = true;
        Ok(())
    }

    fn state(&self, key: StateKey, tree: &dyn Applier) -> Option<StateValue> {
        match key {
            StateKey::Value => tree
                .with_node(self.handle, |node: &SliderNode| StateValue::Number(node.value))
                .ok(),
            _ => None,
        }
    }

    fn state_keys(&self) -> &'static [StateKey] {
        &[StateKey::Value]
    }
}
