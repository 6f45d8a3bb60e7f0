//! Flex layout for view trees.
//!
//! [`layout_view`] turns a [`crate::widgets::View`] into a tree of frames.
//! Relative children flow along the container's flex direction; absolute
//! children are taken out of the flow and placed by their insets or, without
//! insets, by the container's alignment.

pub mod flex;
pub mod flex_layout;

pub use flex::{Constraints, Rect, Size};
pub use flex_layout::{layout_view, LayoutNode};

/// Direction for flex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    Horizontal,
    /// Default, children stack top to bottom
    #[default]
    Vertical,
}

/// Main axis alignment for flex layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainAxisAlignment {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Cross axis alignment for flex layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossAxisAlignment {
    Start,
    Center,
    End,
    #[default]
    Stretch,
}
