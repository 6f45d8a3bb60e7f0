use super::{Animation, AnimationStatus};

/// Runs several animations at the same time.
///
/// All children start together; the group finishes once the last child has
/// finished. Its overflow is the time left after that last child ended.
#[derive(Default)]
pub struct Parallel {
    animations: Vec<Box<dyn Animation>>,
    done: Vec<bool>,
}

impl Parallel {
    pub fn new(animations: Vec<Box<dyn Animation>>) -> Self {
        let done = vec![false; animations.len()];
        Self { animations, done }
    }

    /// Add one more animation to the group.
    pub fn with(mut self, animation: impl Animation + 'static) -> Self {
        self.animations.push(Box::new(animation));
        self.done.push(false);
        self
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl Animation for Parallel {
    fn start(&mut self) {
        for animation in &mut self.animations {
            animation.start();
        }
        self.done.iter_mut().for_each(|done| *done = false);
    }

    fn advance(&mut self, dt_ms: f32) -> AnimationStatus {
        // Children that finished in an earlier step idled through all of this one
        let mut overflow_ms = dt_ms;
        let mut all_done = true;

        for (animation, done) in self.animations.iter_mut().zip(self.done.iter_mut()) {
            if *done {
                continue;
            }
            match animation.advance(dt_ms) {
                AnimationStatus::Finished { overflow_ms: overflow } => {
                    *done = true;
                    overflow_ms = overflow_ms.min(overflow);
                }
                AnimationStatus::Running => all_done = false,
            }
        }

        if all_done {
            AnimationStatus::Finished { overflow_ms }
        } else {
            AnimationStatus::Running
        }
    }

    fn reset(&mut self) {
        for animation in self.animations.iter_mut().rev() {
            animation.reset();
        }
        self.done.iter_mut().for_each(|done| *done = false);
    }
}

/// Runs animations one after another, carrying leftover time forward.
#[derive(Default)]
pub struct Sequence {
    animations: Vec<Box<dyn Animation>>,
    current: usize,
    started: bool,
}

impl Sequence {
    pub fn new(animations: Vec<Box<dyn Animation>>) -> Self {
        Self {
            animations,
            current: 0,
            started: false,
        }
    }

    /// Append an animation to the end of the sequence.
    pub fn then(mut self, animation: impl Animation + 'static) -> Self {
        self.animations.push(Box::new(animation));
        self
    }
}

impl Animation for Sequence {
    fn start(&mut self) {
        self.current = 0;
        self.started = true;
        if let Some(first) = self.animations.first_mut() {
            first.start();
        }
    }

    fn advance(&mut self, dt_ms: f32) -> AnimationStatus {
        if !self.started {
            self.start();
        }

        let mut remaining_ms = dt_ms;
        while let Some(animation) = self.animations.get_mut(self.current) {
            match animation.advance(remaining_ms) {
                AnimationStatus::Running => return AnimationStatus::Running,
                AnimationStatus::Finished { overflow_ms } => {
                    remaining_ms = overflow_ms;
                    self.current += 1;
                    if let Some(next) = self.animations.get_mut(self.current) {
                        next.start();
                    }
                }
            }
        }

        AnimationStatus::Finished {
            overflow_ms: remaining_ms,
        }
    }

    fn reset(&mut self) {
        // Reverse order so the earliest starting value wins for shared signals
        for animation in self.animations.iter_mut().rev() {
            animation.reset();
        }
        self.current = 0;
        self.started = false;
    }
}

/// What a [`Loop`] does between two repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Reset the inner animation before restarting it, so every repetition
    /// replays the same visible change.
    #[default]
    Reset,
    /// Restart from the current values. Tweens then run from their end value
    /// to the same end value, so only the first repetition is visible.
    Continue,
}

/// Repeats an animation, forever or a fixed number of times.
pub struct Loop {
    animation: Box<dyn Animation>,
    iterations: Option<u32>,
    mode: LoopMode,
    completed: u32,
    started: bool,
}

impl Loop {
    pub fn new(animation: impl Animation + 'static) -> Self {
        Self {
            animation: Box::new(animation),
            iterations: None,
            mode: LoopMode::default(),
            completed: 0,
            started: false,
        }
    }

    /// Loop with no iteration limit.
    pub fn forever(animation: impl Animation + 'static) -> Self {
        Self::new(animation)
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn mode(mut self, mode: LoopMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of repetitions completed since the loop started.
    pub fn completed_iterations(&self) -> u32 {
        self.completed
    }

    fn limit_reached(&self) -> bool {
        matches!(self.iterations, Some(limit) if self.completed >= limit)
    }
}

impl Animation for Loop {
    fn start(&mut self) {
        self.animation.start();
        self.completed = 0;
        self.started = true;
    }

    fn advance(&mut self, dt_ms: f32) -> AnimationStatus {
        if !self.started {
            self.start();
        }
        if self.limit_reached() {
            return AnimationStatus::Finished { overflow_ms: dt_ms };
        }

        let mut remaining_ms = dt_ms;
        loop {
            let AnimationStatus::Finished { overflow_ms } = self.animation.advance(remaining_ms)
            else {
                return AnimationStatus::Running;
            };

            self.completed += 1;
            if self.limit_reached() {
                return AnimationStatus::Finished { overflow_ms };
            }

            if self.mode == LoopMode::Reset {
                self.animation.reset();
            }
            self.animation.start();

            // A repetition that consumed no time would spin forever within this step
            if overflow_ms <= 0.0 || overflow_ms >= remaining_ms {
                return AnimationStatus::Running;
            }
            remaining_ms = overflow_ms;
        }
    }

    fn reset(&mut self) {
        self.animation.reset();
        self.completed = 0;
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Tween;
    use crate::reactive::create_signal;

    #[test]
    fn test_parallel_waits_for_slowest() {
        let a = create_signal(0.0f32);
        let b = create_signal(0.0f32);
        let mut group = Parallel::default()
            .with(Tween::new(a.clone(), 100.0).duration(100.0))
            .with(Tween::new(b.clone(), 100.0).duration(200.0));

        group.start();
        assert_eq!(group.advance(150.0), AnimationStatus::Running);
        assert_eq!(a.get(), 100.0);
        assert_eq!(b.get(), 75.0);

        assert_eq!(
            group.advance(60.0),
            AnimationStatus::Finished { overflow_ms: 10.0 }
        );
        assert_eq!(b.get(), 100.0);
    }

    #[test]
    fn test_parallel_children_share_the_clock() {
        let a = create_signal(0.0f32);
        let b = create_signal(1.0f32);
        let mut group = Parallel::default()
            .with(Tween::new(a.clone(), 10.0).duration(100.0))
            .with(Tween::new(b.clone(), 0.0).duration(100.0));

        group.start();
        group.advance(25.0);
        assert_eq!(a.get(), 2.5);
        assert_eq!(b.get(), 0.75);
    }

    #[test]
    fn test_empty_parallel_finishes_immediately() {
        let mut group = Parallel::default();
        assert!(group.is_empty());
        assert_eq!(
            group.advance(5.0),
            AnimationStatus::Finished { overflow_ms: 5.0 }
        );
    }

    #[test]
    fn test_sequence_carries_overflow() {
        let value = create_signal(0.0f32);
        let mut seq = Sequence::default()
            .then(Tween::new(value.clone(), 100.0).duration(100.0))
            .then(Tween::new(value.clone(), 0.0).duration(100.0));

        seq.start();
        assert_eq!(seq.advance(150.0), AnimationStatus::Running);
        assert_eq!(value.get(), 50.0);
        assert_eq!(
            seq.advance(60.0),
            AnimationStatus::Finished { overflow_ms: 10.0 }
        );
        assert_eq!(value.get(), 0.0);
    }

    #[test]
    fn test_loop_reset_replays_cycle() {
        let value = create_signal(0.0f32);
        let mut repeat = Loop::forever(Tween::new(value.clone(), 100.0).duration(100.0));

        repeat.start();
        repeat.advance(100.0);
        // Second repetition starts over from the origin
        repeat.advance(50.0);
        assert_eq!(value.get(), 50.0);
        assert_eq!(repeat.completed_iterations(), 1);
    }

    #[test]
    fn test_loop_continue_freezes_at_target() {
        let value = create_signal(0.0f32);
        let mut repeat = Loop::forever(Tween::new(value.clone(), 100.0).duration(100.0))
            .mode(LoopMode::Continue);

        repeat.start();
        repeat.advance(50.0);
        assert_eq!(value.get(), 50.0);
        repeat.advance(50.0);
        for _ in 0..10 {
            assert_eq!(repeat.advance(30.0), AnimationStatus::Running);
            assert_eq!(value.get(), 100.0);
        }
    }

    #[test]
    fn test_loop_carries_overflow_into_next_iteration() {
        let value = create_signal(0.0f32);
        let mut repeat = Loop::forever(Tween::new(value.clone(), 100.0).duration(100.0));

        repeat.start();
        repeat.advance(125.0);
        assert_eq!(value.get(), 25.0);
    }

    #[test]
    fn test_loop_with_iteration_limit() {
        let value = create_signal(0.0f32);
        let mut repeat = Loop::new(Tween::new(value.clone(), 10.0).duration(10.0)).iterations(2);

        repeat.start();
        assert_eq!(repeat.advance(15.0), AnimationStatus::Running);
        assert_eq!(
            repeat.advance(10.0),
            AnimationStatus::Finished { overflow_ms: 5.0 }
        );
        assert_eq!(value.get(), 10.0);
    }

    #[test]
    fn test_zero_length_loop_does_not_spin() {
        let value = create_signal(0.0f32);
        let mut repeat = Loop::forever(Tween::new(value.clone(), 1.0).duration(0.0));

        repeat.start();
        assert_eq!(repeat.advance(16.0), AnimationStatus::Running);
        assert_eq!(repeat.completed_iterations(), 1);
    }
}
