//! Style object applied to every widget on every resolution step.

use crate::WidgetKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color(0.0, 0.0, 0.0, 0.0);

    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Color(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }
}

/// Resolved presentation values for one widget kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleProps {
    pub foreground: Color,
    pub background: Color,
    pub font_size: f32,
    pub padding: f32,
    /// Gap between children; only meaningful for containers.
    pub spacing: f32,
}

impl Default for StyleProps {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::TRANSPARENT,
            font_size: 14.0,
            padding: 4.0,
            spacing: 6.0,
        }
    }
}

pub trait Style: Send + Sync {
    fn props(&self, kind: WidgetKind) -> StyleProps;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStyle;

impl Style for DefaultStyle {
    fn props(&self, kind: WidgetKind) -> StyleProps {
        let base = StyleProps::default();
        match kind {
            WidgetKind::HORIZONTAL | WidgetKind::VERTICAL => StyleProps { padding: 0.0, ..base },
            _ => base,
        }
    }
}
