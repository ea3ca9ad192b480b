//! One method per catalog kind, returning the live post-update state.

use std::ops::RangeInclusive;

use imui_core::{ReconcileError, Reconciler, StateKey, WidgetArgs};

use crate::kinds;

pub trait WidgetCalls {
    /// Returns whether the button was pressed since the previous frame.
    fn button(&mut self, label: &str) -> Result<bool, ReconcileError>;

    /// `checked` seeds a new checkbox; the live value is returned.
    fn checkbox(&mut self, label: &str, checked: bool) -> Result<bool, ReconcileError>;

    fn label(&mut self, text: &str) -> Result<(), ReconcileError>;

    /// `text` seeds a new input; the live content is returned.
    fn text_input(&mut self, label: &str, text: &str) -> Result<String, ReconcileError>;

    /// `value` seeds a new slider; the live value, clamped to `range`, is returned.
    fn slider(
        &mut self,
        label: &str,
        value: f64,
        range: RangeInclusive<f64>,
    ) -> Result<f64, ReconcileError>;

    fn image(&mut self, source: &str, size: (f32, f32)) -> Result<(), ReconcileError>;
}

impl WidgetCalls for Reconciler {
    fn button(&mut self, label: &str) -> Result<bool, ReconcileError> {
        let response = self.request(
            kinds::BUTTON,
            WidgetArgs::Button {
                label: label.to_string(),
            },
        )?;
        Ok(response.bool(StateKey::Clicked).unwrap_or(false))
    }

    fn checkbox(&mut self, label: &str, checked: bool) -> Result<bool, ReconcileError> {
        let response = self.request(
            kinds::CHECKBOX,
            WidgetArgs::Checkbox {
                label: label.to_string(),
                checked,
            },
        )?;
        Ok(response.bool(StateKey::Checked).unwrap_or(checked))
    }

    fn label(&mut self, text: &str) -> Result<(), ReconcileError> {
        self.request(
            kinds::LABEL,
            WidgetArgs::Label {
                text: text.to_string(),
            },
        )?;
        Ok(())
    }

    fn text_input(&mut self, label: &str, text: &str) -> Result<String, ReconcileError> {
        let response = self.request(
            kinds::TEXT_INPUT,
            WidgetArgs::TextInput {
                label: label.to_string(),
                text: text.to_string(),
            },
        )?;
        Ok(response
            .text(StateKey::Text)
            .map_or_else(|| text.to_string(), str::to_string))
    }

    fn slider(
        &mut self,
        label: &str,
        value: f64,
        range: RangeInclusive<f64>,
    ) -> Result<f64, ReconcileError> {
        let (min, max) = range.into_inner();
        let response = self.request(
            kinds::SLIDER,
            WidgetArgs::Slider {
                label: label.to_string(),
                value,
                min,
                max,
            },
        )?;
        Ok(response.number(StateKey::Value).unwrap_or(value))
    }

    fn image(&mut self, source: &str, size: (f32, f32)) -> Result<(), ReconcileError> {
        let (width, height) = size;
        self.request(
            kinds::IMAGE,
            WidgetArgs::Image {
                source: source.to_string(),
                width,
                height,
            },
        )?;
        Ok(())
    }
}
