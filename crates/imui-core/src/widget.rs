//! The capability set every retained widget instance exposes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{Applier, ControlId, NodeError, NodeId, Style, WidgetKind};

/// A retained widget backing one positional call.
///
/// Instances are created by a [`WidgetFactory`](crate::WidgetFactory) and then
/// owned by the control registry. Every method that receives the tree runs on
/// the UI executor.
pub trait Widget: Send {
    fn kind(&self) -> WidgetKind;

    /// Toolkit node attached to the current layout container.
    fn handle(&self) -> NodeId;

    fn apply_style(&mut self, style: &dyn Style, tree: &mut dyn Applier) -> Result<(), NodeError>;

    fn update(&mut self, args: &WidgetArgs, tree: &mut dyn Applier) -> Result<(), NodeError>;

    /// Reads externally observable state. `None` when the widget has no such key.
    fn state(&self, _key: StateKey, _tree: &dyn Applier) -> Option<StateValue> {
        None
    }

    /// Keys captured into the [`WidgetResponse`] after each update.
    fn state_keys(&self) -> &'static [StateKey] {
        &[]
    }
}

/// Typed arguments of one widget call.
#[derive(Clone, Default)]
pub enum WidgetArgs {
    #[default]
    None,
    Button {
        label: String,
    },
    Checkbox {
        label: String,
        checked: bool,
    },
    Label {
        text: String,
    },
    TextInput {
        label: String,
        text: String,
    },
    Slider {
        label: String,
        value: f64,
        min: f64,
        max: f64,
    },
    Image {
        source: String,
        width: f32,
        height: f32,
    },
    /// Arguments of a kind registered outside the default catalog.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl WidgetArgs {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        WidgetArgs::Custom(Arc::new(value))
    }

    pub fn downcast_custom<T: Any>(&self) -> Option<&T> {
        match self {
            WidgetArgs::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for WidgetArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetArgs::None => f.write_str("None"),
            WidgetArgs::Button { label } => f.debug_struct("Button").field("label", label).finish(),
            WidgetArgs::Checkbox { label, checked } => f
                .debug_struct("Checkbox")
                .field("label", label)
                .field("checked", checked)
                .finish(),
            WidgetArgs::Label { text } => f.debug_struct("Label").field("text", text).finish(),
            WidgetArgs::TextInput { label, text } => f
                .debug_struct("TextInput")
                .field("label", label)
                .field("text", text)
                .finish(),
            WidgetArgs::Slider {
                label,
                value,
                min,
                max,
            } => f
                .debug_struct("Slider")
                .field("label", label)
                .field("value", value)
                .field("min", min)
                .field("max", max)
                .finish(),
            WidgetArgs::Image {
                source,
                width,
                height,
            } => f
                .debug_struct("Image")
                .field("source", source)
                .field("width", width)
                .field("height", height)
                .finish(),
            WidgetArgs::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Clicked,
    Checked,
    Text,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Bool(bool),
    Text(String),
    Number(f64),
}

impl StateValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StateValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StateValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// Outcome of one resolved widget call, read after the update completed.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetResponse {
    pub id: ControlId,
    pub kind: WidgetKind,
    pub handle: NodeId,
    /// Whether the call created a new instance instead of reusing one.
    pub created: bool,
    states: Vec<(StateKey, StateValue)>,
}

impl WidgetResponse {
    pub(crate) fn new(
        id: ControlId,
        kind: WidgetKind,
        handle: NodeId,
        created: bool,
        states: Vec<(StateKey, StateValue)>,
    ) -> Self {
        Self {
            id,
            kind,
            handle,
            created,
            states,
        }
    }

    pub fn state(&self, key: StateKey) -> Option<&StateValue> {
        self.states
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| value)
    }

    pub fn bool(&self, key: StateKey) -> Option<bool> {
        self.state(key).and_then(StateValue::as_bool)
    }

    pub fn text(&self, key: StateKey) -> Option<&str> {
        self.state(key).and_then(StateValue::as_text)
    }

    pub fn number(&self, key: StateKey) -> Option<f64> {
        self.state(key).and_then(StateValue::as_number)
    }
}

/// Collects every advertised state key of `widget`.
pub(crate) fn snapshot(widget: &dyn Widget, tree: &dyn Applier) -> Vec<(StateKey, StateValue)> {
    widget
        .state_keys()
        .iter()
        .filter_map(|key| widget.state(*key, tree).map(|value| (*key, value)))
        .collect()
}
