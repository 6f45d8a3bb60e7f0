//! Declarative view values and the pulse-ring widget.
//!
//! [`View`] and [`Style`] describe what to draw as plain data. The
//! [`PulseAnimation`] widget owns the animated cells and produces a fresh
//! [`View`] snapshot on every [`PulseAnimation::render`].

mod color;
pub mod pulse;
mod style;
mod view;

pub use color::{Color, ColorParseError};
pub use pulse::{
    build_pulses, pulse_animation, ConfigChanges, Pulse, PulseAnimation, PulseConfig,
    PulseConfigProps,
};
pub use style::{Position, Style};
pub use view::{view, View};
