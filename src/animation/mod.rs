//! Tween engine: timing-based interpolation of signal values.
//!
//! Animations are plain values implementing [`Animation`]. They are composed
//! with [`Parallel`], [`Sequence`] and [`Loop`], then handed to the
//! thread-local [`scheduler`] which starts them after a delay and advances
//! them once per frame.

mod animatable;
mod composite;
pub mod scheduler;
mod timing;
mod tween;

pub use animatable::Animatable;
pub use composite::{Loop, LoopMode, Parallel, Sequence};
pub use scheduler::{
    active_animations, advance_animations, cancel_animation, is_scheduled, pending_starts,
    schedule_animation, AnimationHandle, Scheduler,
};
pub use timing::TimingFunction;
pub use tween::Tween;

/// Configuration for how a value moves from its start to its target
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of the animation in milliseconds
    pub duration_ms: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before the value starts moving, in milliseconds
    pub delay_ms: f32,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0.0,
        }
    }

    /// Linear transition over `duration_ms`
    pub fn linear(duration_ms: f32) -> Self {
        Self::new(duration_ms, TimingFunction::Linear)
    }

    /// Set the delay before the animation starts
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the duration of the animation
    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the timing function
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::linear(300.0)
    }
}

/// Result of advancing an animation by one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStatus {
    /// Still running; all of the step's time was consumed
    Running,
    /// Reached its end. `overflow_ms` is the part of the step left unused.
    Finished { overflow_ms: f32 },
}

impl AnimationStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, AnimationStatus::Finished { .. })
    }
}

/// A time-driven change of one or more signals.
pub trait Animation {
    /// Capture starting values. Called before the first step and again by a
    /// [`Loop`] at every repetition.
    fn start(&mut self);

    /// Move forward by `dt_ms` milliseconds and write the new values.
    fn advance(&mut self, dt_ms: f32) -> AnimationStatus;

    /// Put every written signal back to the value it had when this animation
    /// first started, and rewind to the beginning.
    fn reset(&mut self);
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn start(&mut self) {
        (**self).start()
    }

    fn advance(&mut self, dt_ms: f32) -> AnimationStatus {
        (**self).advance(dt_ms)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
