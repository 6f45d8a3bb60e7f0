//! Progress curves for tweens.
//!
//! A curve maps the elapsed fraction of a transition, `t` in `[0, 1]`, to the
//! fraction of the way from the start value to the target. Pulse rings grow
//! and fade at a constant rate, so [`TimingFunction::Linear`] is the default;
//! [`TimingFunction::custom`] accepts any other curve.
//!
//! ```ignore
//! Tween::new(pulse.opacity.clone(), 0.0)
//!     .transition(Transition::new(300.0, TimingFunction::custom(|t| t * t)))
//! ```

use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
pub enum TimingFunction {
    /// Constant rate
    #[default]
    Linear,
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl TimingFunction {
    pub fn custom(curve: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        TimingFunction::Custom(Arc::new(curve))
    }

    /// Progress factor at `t`. Custom curves may leave `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::Custom(curve) => curve(t),
        }
    }
}

impl fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingFunction::Linear => f.write_str("Linear"),
            TimingFunction::Custom(_) => f.write_str("Custom"),
        }
    }
}
