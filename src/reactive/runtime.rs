use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

/// Dependency graph between signals and effects for the current thread.
///
/// The runtime is never borrowed while user code runs: effect callbacks are
/// taken out of their slot, executed, and put back. Signal writes performed
/// inside an effect therefore queue further effects instead of panicking.
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: VecDeque<EffectId>,
    effect_callbacks: Vec<Option<Box<dyn FnMut()>>>,
    effect_alive: Vec<bool>,
    effect_dependencies: Vec<HashSet<SignalId>>,
    signal_subscribers: HashMap<SignalId, HashSet<EffectId>>,
    batch_depth: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_effect(&mut self, callback: Box<dyn FnMut()>) -> EffectId {
        let id = self.effect_callbacks.len();
        self.effect_callbacks.push(Some(callback));
        self.effect_alive.push(true);
        self.effect_dependencies.push(HashSet::new());
        id
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        if let Some(effect_id) = self.current_effect {
            self.signal_subscribers
                .entry(signal_id)
                .or_default()
                .insert(effect_id);
            self.effect_dependencies[effect_id].insert(signal_id);
        }
    }

    /// Queue every subscriber of `signal_id`. Returns true when the caller
    /// should flush right away (not batching, not already flushing).
    fn queue_subscribers(&mut self, signal_id: SignalId) -> bool {
        if let Some(subscribers) = self.signal_subscribers.get(&signal_id) {
            for &effect_id in subscribers {
                if !self.pending_effects.contains(&effect_id) {
                    self.pending_effects.push_back(effect_id);
                }
            }
        }
        self.batch_depth == 0 && !self.flushing && !self.pending_effects.is_empty()
    }

    /// Detach the effect from its old dependencies and hand out its callback.
    fn begin_effect(
        &mut self,
        effect_id: EffectId,
    ) -> Option<(Box<dyn FnMut()>, Option<EffectId>)> {
        if !self.effect_alive.get(effect_id).copied().unwrap_or(false) {
            return None;
        }
        // Already running further up the stack (effect writing its own dependency)
        let callback = self.effect_callbacks[effect_id].take()?;

        let old_deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in old_deps {
            if let Some(subscribers) = self.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }

        let prev_effect = self.current_effect.replace(effect_id);
        Some((callback, prev_effect))
    }

    fn end_effect(
        &mut self,
        effect_id: EffectId,
        callback: Box<dyn FnMut()>,
        prev_effect: Option<EffectId>,
    ) {
        self.current_effect = prev_effect;
        if self.effect_alive[effect_id] {
            self.effect_callbacks[effect_id] = Some(callback);
        }
    }

    pub fn dispose_effect(&mut self, effect_id: EffectId) {
        if effect_id >= self.effect_alive.len() {
            return;
        }
        let deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in deps {
            if let Some(subscribers) = self.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }
        self.effect_alive[effect_id] = false;
        self.effect_callbacks[effect_id] = None;
        self.pending_effects.retain(|&id| id != effect_id);
    }

    /// Forget a dropped signal's subscriber set.
    pub fn forget_signal(&mut self, signal_id: SignalId) {
        if let Some(subscribers) = self.signal_subscribers.remove(&signal_id) {
            for effect_id in subscribers {
                self.effect_dependencies[effect_id].remove(&signal_id);
            }
        }
    }

    /// Number of live effects subscribed to a signal.
    pub fn subscriber_count(&self, signal_id: SignalId) -> usize {
        self.signal_subscribers
            .get(&signal_id)
            .map_or(0, |subscribers| subscribers.len())
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Try to access the runtime. Does nothing while the runtime is borrowed or
/// after the thread-local has been torn down.
pub fn try_with_runtime<F>(f: F)
where
    F: FnOnce(&mut Runtime),
{
    let _ = RUNTIME.try_with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            f(&mut runtime);
        }
    });
}

/// Run an effect with dependency tracking.
pub fn run_effect(effect_id: EffectId) {
    let Some((mut callback, prev_effect)) = with_runtime(|rt| rt.begin_effect(effect_id)) else {
        return;
    };

    callback();

    with_runtime(|rt| rt.end_effect(effect_id, callback, prev_effect));
}

/// Queue the subscribers of a written signal and flush them unless batching.
pub fn notify_write(signal_id: SignalId) {
    let mut should_flush = false;
    try_with_runtime(|rt| should_flush = rt.queue_subscribers(signal_id));
    if should_flush {
        flush_effects();
    }
}

pub fn flush_effects() {
    with_runtime(|rt| rt.flushing = true);
    while let Some(effect_id) = with_runtime(|rt| rt.pending_effects.pop_front()) {
        run_effect(effect_id);
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Defer effect execution until `f` returns, then run each queued effect once.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    let should_flush = with_runtime(|rt| {
        rt.batch_depth -= 1;
        rt.batch_depth == 0 && !rt.flushing && !rt.pending_effects.is_empty()
    });

    if should_flush {
        flush_effects();
    }

    result
}

pub fn subscriber_count(signal_id: SignalId) -> usize {
    with_runtime(|rt| rt.subscriber_count(signal_id))
}
