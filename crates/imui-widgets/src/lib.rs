//! Default widget catalog for imui.
//!
//! Provides toolkit nodes for six widget kinds, the widget instances that
//! drive them, a prebuilt [`FactoryRegistry`] and the [`WidgetCalls`]
//! extension trait with one method per kind.

pub mod calls;
pub mod nodes;
pub mod widgets;

pub use calls::WidgetCalls;
pub use nodes::*;
pub use widgets::*;

use imui_core::{ExecutorHandle, FactoryRegistry, NodeId, ReconcileError, Reconciler, ReconcilerConfig};

pub mod kinds {
    use imui_core::WidgetKind;

    pub const BUTTON: WidgetKind = WidgetKind::new("button");
    pub const CHECKBOX: WidgetKind = WidgetKind::new("checkbox");
    pub const LABEL: WidgetKind = WidgetKind::new("label");
    pub const TEXT_INPUT: WidgetKind = WidgetKind::new("text_input");
    pub const SLIDER: WidgetKind = WidgetKind::new("slider");
    pub const IMAGE: WidgetKind = WidgetKind::new("image");

    pub const ALL: [WidgetKind; 6] = [BUTTON, CHECKBOX, LABEL, TEXT_INPUT, SLIDER, IMAGE];
}

/// Factory table with every kind of this crate registered.
pub fn default_catalog() -> FactoryRegistry {
    FactoryRegistry::new()
        .with(kinds::BUTTON, ButtonWidget::construct)
        .with(kinds::CHECKBOX, CheckboxWidget::construct)
        .with(kinds::LABEL, LabelWidget::construct)
        .with(kinds::TEXT_INPUT, TextInputWidget::construct)
        .with(kinds::SLIDER, SliderWidget::construct)
        .with(kinds::IMAGE, ImageWidget::construct)
}

/// Reconciler bound to `host` with the default catalog and an
/// environment-derived configuration.
pub fn reconciler(executor: ExecutorHandle, host: NodeId) -> Result<Reconciler, ReconcileError> {
    Reconciler::with_config(executor, host, default_catalog(), ReconcilerConfig::from_env())
}

pub mod prelude {
    pub use crate::calls::WidgetCalls;
    pub use crate::{default_catalog, reconciler};
    pub use imui_core::{
        ExecutorHandle, FrameStats, InlineExecutor, MemoryApplier, ReconcileError, Reconciler,
    };
}

#[cfg(test)]
#[path = "tests/widgets_tests.rs"]
mod tests;
