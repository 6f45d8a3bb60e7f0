//! Reactive pulse-ring widget.
//!
//! `sonar` draws a set of concentric rings that grow outward from a center
//! point while fading, one after another, forever. It is built from small
//! reusable pieces:
//!
//! - [`reactive`]: signals, effects and owner scopes
//! - [`animation`]: tweens, parallel groups, loops and a frame-driven scheduler
//! - [`widgets`]: colors, styles, view values and the [`PulseAnimation`] widget
//! - [`layout`]: flex layout that turns a view tree into frames
//!
//! The host owns the frame loop: it advances the scheduler by the elapsed
//! time, renders the widget into a [`widgets::View`] and hands that (or its
//! [`layout::LayoutNode`]) to a renderer.
//!
//! ```ignore
//! use sonar::prelude::*;
//!
//! let mut pulse = pulse_animation(PulseConfig::props().color(Color::RED));
//! pulse.start();
//!
//! loop {
//!     advance_animations(frame_time);
//!     let frames = layout_view(&pulse.render(), Constraints::loose(window_size));
//!     draw(&frames);
//! }
//! ```

pub mod animation;
pub mod layout;
pub mod reactive;
pub mod widgets;

pub use sonar_macros::Props;
pub use widgets::PulseAnimation;

pub mod prelude {
    pub use crate::animation::{
        advance_animations, cancel_animation, schedule_animation, Animatable, Animation,
        AnimationHandle, AnimationStatus, Loop, LoopMode, Parallel, Sequence, TimingFunction,
        Transition, Tween,
    };
    pub use crate::layout::{
        layout_view, Axis, Constraints, CrossAxisAlignment, LayoutNode, MainAxisAlignment, Rect,
        Size,
    };
    pub use crate::reactive::{
        batch, create_effect, create_signal, dispose_owner, on_cleanup, take_frame_request,
        with_owner, Effect, Signal,
    };
    pub use crate::widgets::{
        pulse_animation, view, Color, ColorParseError, ConfigChanges, Position, Pulse,
        PulseAnimation, PulseConfig, PulseConfigProps, Style, View,
    };
    pub use crate::Props;
}
