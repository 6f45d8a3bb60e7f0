use super::owner::{effect_has_owner, register_effect};
use super::runtime::{run_effect, with_runtime, EffectId};

/// A side effect that re-runs whenever a signal it read changes.
///
/// Effects created inside an owner scope live until the owner is disposed.
/// Effects created outside any owner are disposed when dropped.
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = with_runtime(|rt| rt.allocate_effect(Box::new(f)));
        register_effect(id);
        run_effect(id);

        Self { id }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Stop the effect now, owned or not.
    pub fn dispose(self) {
        with_runtime(|rt| rt.dispose_effect(self.id));
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if !effect_has_owner(self.id) {
            with_runtime(|rt| rt.dispose_effect(self.id));
        }
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::reactive::{batch, create_signal, dispose_owner, with_owner};

    #[test]
    fn test_effect_runs_immediately() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let _effect = create_effect(move || counter.set(counter.get() + 1));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_effect_reruns_on_change() {
        let signal = create_signal(1.0f32);
        let seen = Rc::new(Cell::new(0.0));
        let sink = seen.clone();
        let reader = signal.clone();
        let _effect = create_effect(move || sink.set(reader.get()));

        signal.set(3.0);
        assert_eq!(seen.get(), 3.0);
    }

    #[test]
    fn test_effect_skips_equal_writes() {
        let signal = create_signal(7);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let reader = signal.clone();
        let _effect = create_effect(move || {
            reader.get();
            counter.set(counter.get() + 1);
        });

        signal.set(7);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_untracked_read_does_not_subscribe() {
        let signal = create_signal(1);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let reader = signal.clone();
        let _effect = create_effect(move || {
            reader.get_untracked();
            counter.set(counter.get() + 1);
        });

        signal.set(2);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_dropped_effect_stops() {
        let signal = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let reader = signal.clone();
        let effect = create_effect(move || {
            reader.get();
            counter.set(counter.get() + 1);
        });
        drop(effect);

        signal.set(1);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_owned_effect_lives_until_owner_disposed() {
        let signal = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let reader = signal.clone();
        let (_, owner) = with_owner(move || {
            let _effect = create_effect(move || {
                reader.get();
                counter.set(counter.get() + 1);
            });
        });

        signal.set(1);
        assert_eq!(runs.get(), 2);

        dispose_owner(owner);
        signal.set(2);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_batch_runs_effect_once() {
        let a = create_signal(0);
        let b = create_signal(0);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let (ra, rb) = (a.clone(), b.clone());
        let _effect = create_effect(move || {
            ra.get();
            rb.get();
            counter.set(counter.get() + 1);
        });

        batch(|| {
            a.set(1);
            b.set(1);
        });
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_effect_writing_other_signal_propagates() {
        let source = create_signal(1);
        let doubled = create_signal(0);
        let (reader, writer) = (source.clone(), doubled.clone());
        let _effect = create_effect(move || writer.set(reader.get() * 2));

        source.set(5);
        assert_eq!(doubled.get_untracked(), 10);
    }
}
