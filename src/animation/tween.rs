use super::{Animatable, Animation, AnimationStatus, Transition};
use crate::reactive::Signal;

/// Moves a signal from its current value to `to` over a [`Transition`].
///
/// The starting value is read from the signal when the tween starts, so a
/// tween restarted without a reset runs from wherever the signal is (its
/// previous end value). [`Animation::reset`] writes back the value the signal
/// had the very first time the tween started.
pub struct Tween<T: Animatable> {
    target: Signal<T>,
    to: T,
    transition: Transition,
    start_value: Option<T>,
    origin: Option<T>,
    elapsed_ms: f32,
    finished: bool,
}

impl<T: Animatable> Tween<T> {
    /// Tween `target` to `to` with the default linear transition.
    pub fn new(target: Signal<T>, to: T) -> Self {
        Self {
            target,
            to,
            transition: Transition::default(),
            start_value: None,
            origin: None,
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Shorthand for replacing only the duration.
    pub fn duration(mut self, duration_ms: f32) -> Self {
        self.transition.duration_ms = duration_ms;
        self
    }

    pub fn target(&self) -> &Signal<T> {
        &self.target
    }

    pub fn to_value(&self) -> &T {
        &self.to
    }

    pub fn duration_ms(&self) -> f32 {
        self.transition.duration_ms
    }
}

impl<T: Animatable> Animation for Tween<T> {
    fn start(&mut self) {
        let begin = self.target.get_untracked();
        if self.origin.is_none() {
            self.origin = Some(begin.clone());
        }
        self.start_value = Some(begin);
        self.elapsed_ms = 0.0;
        self.finished = false;
    }

    fn advance(&mut self, dt_ms: f32) -> AnimationStatus {
        if self.finished {
            return AnimationStatus::Finished { overflow_ms: dt_ms };
        }
        if self.start_value.is_none() {
            self.start();
        }

        self.elapsed_ms += dt_ms;
        let active_ms = self.elapsed_ms - self.transition.delay_ms;
        if active_ms < 0.0 {
            return AnimationStatus::Running;
        }

        // Zero, negative or NaN durations jump straight to the end
        let duration_ms = self.transition.duration_ms;
        let t = if duration_ms > 0.0 {
            (active_ms / duration_ms).min(1.0)
        } else {
            1.0
        };
        let eased_t = self.transition.timing.evaluate(t);

        let value = match &self.start_value {
            Some(start) if eased_t != 1.0 => T::lerp(start, &self.to, eased_t),
            _ => self.to.clone(),
        };
        self.target.set(value);

        if t >= 1.0 {
            self.finished = true;
            AnimationStatus::Finished {
                overflow_ms: (active_ms - duration_ms.max(0.0)).max(0.0),
            }
        } else {
            AnimationStatus::Running
        }
    }

    fn reset(&mut self) {
        if let Some(origin) = &self.origin {
            self.target.set(origin.clone());
        }
        self.start_value = None;
        self.elapsed_ms = 0.0;
        self.finished = false;
    }
}
