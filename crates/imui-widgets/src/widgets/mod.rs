//! Widget implementations of the default catalog

pub mod button;
pub mod checkbox;
pub mod image;
pub mod label;
pub mod slider;
pub mod text_input;

pub use button::*;
pub use checkbox::*;
pub use image::*;
pub use label::*;
pub use slider::*;
pub use text_input::*;

use imui_core::{Applier, Node, NodeError, NodeId, Style, WidgetKind};

use crate::nodes::Styled;

fn apply_style<N: Node + Styled>(
    tree: &mut dyn Applier,
    handle: NodeId,
    kind: WidgetKind,
    style: &dyn Style,
) -> Result<(), NodeError> {
    let props = style.props(kind);
    tree.with_node_mut(handle, |node: &mut N| node.set_style(props))
}

fn unexpected(kind: WidgetKind) -> NodeError {
    NodeError::UnexpectedArgs { kind }
}
