//! Frame-driven scheduler for delayed and running animations.
//!
//! Each scheduled animation waits for its start time on the scheduler clock,
//! then advances every frame until it finishes or is cancelled. The host
//! drives the clock with [`advance_animations`], passing the time elapsed
//! since the previous frame.
//!
//! Handles use a generational index: a stale handle never refers to an entry
//! that later reused its slot.

use std::cell::RefCell;
use std::time::Duration;

use super::{Animation, AnimationStatus};
use crate::reactive::{batch, request_frame};

/// Identifies one scheduled animation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AnimationHandle {
    index: u32,
    generation: u32,
}

struct Entry {
    start_at_ms: f64,
    started: bool,
    animation: Box<dyn Animation>,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Delayed starts and running animations, keyed by [`AnimationHandle`].
#[derive(Default)]
pub struct Scheduler {
    now_ms: f64,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Start `animation` once `delay_ms` has elapsed on the scheduler clock.
    pub fn schedule(&mut self, delay_ms: f32, animation: Box<dyn Animation>) -> AnimationHandle {
        let entry = Entry {
            start_at_ms: self.now_ms + f64::from(delay_ms.max(0.0)),
            started: false,
            animation,
        };

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.entry = Some(entry);

        log::trace!("scheduled animation {} after {}ms", index, delay_ms);

        AnimationHandle {
            index,
            generation: slot.generation,
        }
    }

    /// Drop a scheduled or running animation. Returns false for stale handles.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        if !self.is_scheduled(handle) {
            return false;
        }
        self.release(handle.index);
        log::trace!("cancelled animation {}", handle.index);
        true
    }

    pub fn is_scheduled(&self, handle: AnimationHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.entry.is_some())
    }

    /// Whether the animation's delay has elapsed and it is running.
    pub fn is_started(&self, handle: AnimationHandle) -> bool {
        self.entry(handle).is_some_and(|entry| entry.started)
    }

    /// Scheduler time at which the animation starts (or started).
    pub fn start_time_ms(&self, handle: AnimationHandle) -> Option<f64> {
        self.entry(handle).map(|entry| entry.start_at_ms)
    }

    /// Number of scheduled animations, started or not.
    pub fn active(&self) -> usize {
        self.entries().count()
    }

    /// Number of animations still waiting for their start time.
    pub fn pending(&self) -> usize {
        self.entries().filter(|entry| !entry.started).count()
    }

    /// Advance the clock by `dt` and step every due animation.
    ///
    /// An animation whose start time falls inside this step is started and
    /// advanced only by the part of the step after its start time. Returns
    /// whether anything is still scheduled.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let now_ms = self.now_ms + dt.as_secs_f64() * 1000.0;
        let mut finished = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            if now_ms < entry.start_at_ms {
                continue;
            }

            let step_ms = if entry.started {
                now_ms - self.now_ms
            } else {
                entry.started = true;
                entry.animation.start();
                now_ms - entry.start_at_ms
            };

            if let AnimationStatus::Finished { .. } = entry.animation.advance(step_ms as f32) {
                finished.push(index as u32);
            }
        }

        for index in finished {
            self.release(index);
        }

        self.now_ms = now_ms;
        self.active() > 0
    }

    fn entry(&self, handle: AnimationHandle) -> Option<&Entry> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.slots.iter().filter_map(|slot| slot.entry.as_ref())
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
    }
}

thread_local! {
    static SCHEDULER: RefCell<Scheduler> = RefCell::new(Scheduler::new());
}

fn with_scheduler<F, R>(f: F) -> R
where
    F: FnOnce(&mut Scheduler) -> R,
{
    SCHEDULER.with(|scheduler| f(&mut scheduler.borrow_mut()))
}

/// Schedule an animation on this thread's scheduler.
pub fn schedule_animation(delay_ms: f32, animation: Box<dyn Animation>) -> AnimationHandle {
    with_scheduler(|scheduler| scheduler.schedule(delay_ms, animation))
}

/// Cancel an animation on this thread's scheduler. Safe during thread teardown.
pub fn cancel_animation(handle: AnimationHandle) -> bool {
    SCHEDULER
        .try_with(|scheduler| {
            scheduler
                .try_borrow_mut()
                .map(|mut scheduler| scheduler.cancel(handle))
                .unwrap_or(false)
        })
        .unwrap_or(false)
}

pub fn is_scheduled(handle: AnimationHandle) -> bool {
    with_scheduler(|scheduler| scheduler.is_scheduled(handle))
}

/// Number of animations scheduled on this thread, started or not.
pub fn active_animations() -> usize {
    with_scheduler(|scheduler| scheduler.active())
}

/// Number of animations on this thread still waiting for their delay.
pub fn pending_starts() -> usize {
    with_scheduler(|scheduler| scheduler.pending())
}

/// Advance this thread's animations by one frame.
///
/// Signal writes made by the animations are batched: effects observing them
/// run once, after the scheduler has been released, so they may freely
/// schedule or cancel animations. Requests another frame while anything is
/// still scheduled.
pub fn advance_animations(dt: Duration) -> bool {
    let active = batch(|| with_scheduler(|scheduler| scheduler.advance(dt)));
    if active {
        request_frame();
    }
    active
}
