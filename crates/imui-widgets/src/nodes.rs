//! Node types for the default catalog

use imui_core::{Node, NodeId, StyleProps};

/// Nodes that carry resolved style values.
pub trait Styled {
    fn set_style(&mut self, style: StyleProps);
}

macro_rules! styled {
    ($($node:ty),* $(,)?) => {
        $(impl Styled for $node {
            fn set_style(&mut self, style: StyleProps) {
                self.style = style;
            }
        })*
    };
}

styled!(ButtonNode, CheckboxNode, LabelNode, TextInputNode, SliderNode, ImageNode);

#[derive(Debug, Clone, Default)]
pub struct ButtonNode {
    pub label: String,
    pub style: StyleProps,
    presses: u32,
}

impl ButtonNode {
    /// Host-side press; reported as a click on the next widget call.
    pub fn press(&mut self) {
        self.presses += 1;
    }

    /// Returns and clears the presses seen since the last call.
    pub fn take_presses(&mut self) -> u32 {
        std::mem::take(&mut self.presses)
    }
}

impl Node for ButtonNode {
    fn debug_label(&self) -> String {
        format!("Button({:?})", self.label)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckboxNode {
    pub label: String,
    pub checked: bool,
    pub style: StyleProps,
}

impl CheckboxNode {
    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

impl Node for CheckboxNode {
    fn debug_label(&self) -> String {
        let mark = if self.checked { "x" } else { " " };
        format!("Checkbox([{mark}] {:?})", self.label)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelNode {
    pub text: String,
    pub style: StyleProps,
}

impl Node for LabelNode {
    fn debug_label(&self) -> String {
        format!("Label({:?})", self.text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextInputNode {
    pub label: String,
    pub text: String,
    pub style: StyleProps,
}

impl TextInputNode {
    /// Host-side edit replacing the whole content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Node for TextInputNode {
    fn debug_label(&self) -> String {
        format!("TextInput({:?}: {:?})", self.label, self.text)
    }
}

#[derive(Debug, Clone)]
pub struct SliderNode {
    pub label: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub style: StyleProps,
}

impl Default for SliderNode {
    fn default() -> Self {
        Self {
            label: String::new(),
            value: 0.0,
            min: 0.0,
            max: 1.0,
            style: StyleProps::default(),
        }
    }
}

impl SliderNode {
    /// Host-side drag; the value stays inside the current range.
    pub fn drag_to(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.value = value.clamp(self.min, self.max);
    }

    /// Sets the range (bounds in either order) and clamps the value into it.
    /// A NaN bound leaves the range unchanged.
    pub fn set_range(&mut self, a: f64, b: f64) {
        if a.is_nan() || b.is_nan() {
            return;
        }
        self.min = a.min(b);
        self.max = a.max(b);
        self.value = self.value.clamp(self.min, self.max);
    }
}

impl Node for SliderNode {
    fn debug_label(&self) -> String {
        format!(
            "Slider({:?}: {} in {}..={})",
            self.label, self.value, self.min, self.max
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageNode {
    pub source: String,
    pub width: f32,
    pub height: f32,
    pub style: StyleProps,
}

impl Node for ImageNode {
    fn debug_label(&self) -> String {
        format!("Image({:?} {}x{})", self.source, self.width, self.height)
    }
}

/// Top-level host holding a single content node. Not a container, so a
/// reconciler bound to it creates its own root inside.
#[derive(Debug, Clone, Default)]
pub struct WindowNode {
    pub title: String,
    content: Option<NodeId>,
}

impl WindowNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    pub fn content(&self) -> Option<NodeId> {
        self.content
    }
}

impl Node for WindowNode {
    fn insert_child(&mut self, child: NodeId) {
        self.content = Some(child);
    }

    fn remove_child(&mut self, child: NodeId) {
        if self.content == Some(child) {
            self.content = None;
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.content.into_iter().collect()
    }

    fn debug_label(&self) -> String {
        format!("Window({:?})", self.title)
    }
}
