//! Declarative style record for views.
//!
//! Every property is optional. Styles compose with [`Style::merge`]: the
//! properties set on the right-hand style win, the rest are kept, the way a
//! list of style objects is flattened left to right.

use super::Color;
use crate::layout::{Axis, CrossAxisAlignment, MainAxisAlignment};

/// How a view takes part in its parent's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Flows along the parent's main axis.
    #[default]
    Relative,
    /// Taken out of the flow; placed by insets or the parent's alignment.
    Absolute,
}

macro_rules! style_props {
    ($($(#[$doc:meta])* $name:ident: $ty:ty,)*) => {
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct Style {
            $($(#[$doc])* pub $name: Option<$ty>,)*
        }

        impl Style {
            $(
                $(#[$doc])*
                pub fn $name(mut self, value: $ty) -> Self {
                    self.$name = Some(value);
                    self
                }
            )*

            /// Overlay `other` on this style: every property `other` sets wins.
            pub fn merge(mut self, other: &Style) -> Self {
                $(
                    if let Some(value) = &other.$name {
                        self.$name = Some(value.clone());
                    }
                )*
                self
            }

            /// Whether no property is set.
            pub fn is_empty(&self) -> bool {
                true $(&& self.$name.is_none())*
            }
        }
    };
}

style_props! {
    position: Position,
    /// Main axis for relative children. Defaults to vertical.
    flex_direction: Axis,
    /// Main axis alignment. Defaults to start.
    justify_content: MainAxisAlignment,
    /// Cross axis alignment. Defaults to stretch.
    align_items: CrossAxisAlignment,
    /// Grow factor along the parent's main axis.
    flex: f32,
    top: f32,
    bottom: f32,
    left: f32,
    right: f32,
    width: f32,
    height: f32,
    opacity: f32,
    border_radius: f32,
    background: Color,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pinned to the top and bottom of its parent, laying children out in a
    /// centered row.
    pub fn centered() -> Self {
        Self::new()
            .top(0.0)
            .bottom(0.0)
            .flex_direction(Axis::Horizontal)
            .justify_content(MainAxisAlignment::Center)
            .align_items(CrossAxisAlignment::Center)
    }

    /// Centers children on both axes.
    pub fn centered_container() -> Self {
        Self::new()
            .justify_content(MainAxisAlignment::Center)
            .align_items(CrossAxisAlignment::Center)
    }

    /// Absolutely positioned, growing to fill.
    pub fn absolute_fill() -> Self {
        Self::new().position(Position::Absolute).flex(1.0)
    }

    pub fn is_absolute(&self) -> bool {
        self.position == Some(Position::Absolute)
    }
}
