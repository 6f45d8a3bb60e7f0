//! Ownership scopes for automatic resource cleanup.
//!
//! Effects and cleanup callbacks registered while an owner is current belong
//! to it. Disposing the owner disposes its child owners first, then runs its
//! cleanups in reverse order, then disposes its effects. Animation timelines
//! use this to cancel every scheduled start and running loop in one call.
//!
//! # Example
//!
//! ```ignore
//! let (handle, owner) = with_owner(|| {
//!     let handle = schedule_animation(500.0, Box::new(timeline));
//!     on_cleanup(move || {
//!         cancel_animation(handle);
//!     });
//!     handle
//! });
//!
//! // Later: cancels the timeline whether or not it has started
//! dispose_owner(owner);
//! ```

use std::cell::RefCell;

use super::runtime::{try_with_runtime, EffectId};

/// Unique identifier for an owner in the owner arena.
///
/// Slots of disposed owners are reused, so an ID is only meaningful while
/// [`owner_is_alive`] holds for it.
pub type OwnerId = usize;

struct Owner {
    parent: Option<OwnerId>,
    effects: Vec<EffectId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

struct OwnerArena {
    owners: Vec<Option<Owner>>,
    free: Vec<OwnerId>,
}

impl OwnerArena {
    fn new() -> Self {
        Self {
            owners: Vec::new(),
            free: Vec::new(),
        }
    }

    fn allocate(&mut self, parent: Option<OwnerId>) -> OwnerId {
        let owner = Owner {
            parent,
            effects: Vec::new(),
            cleanups: Vec::new(),
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.owners[id] = Some(owner);
                id
            }
            None => {
                self.owners.push(Some(owner));
                self.owners.len() - 1
            }
        };
        if let Some(parent_owner) = parent.and_then(|parent_id| self.get_mut(parent_id)) {
            parent_owner.children.push(id);
        }
        id
    }

    fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.owners.get_mut(id).and_then(|o| o.as_mut())
    }

    /// Remove an owner, unlink it from its parent and free its slot.
    fn take(&mut self, id: OwnerId) -> Option<Owner> {
        let owner = self.owners.get_mut(id).and_then(|o| o.take())?;
        if let Some(parent) = owner.parent.and_then(|parent_id| self.get_mut(parent_id)) {
            parent.children.retain(|&child| child != id);
        }
        self.free.push(id);
        Some(owner)
    }

    fn live_count(&self) -> usize {
        self.owners.iter().flatten().count()
    }
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<OwnerArena> = RefCell::new(OwnerArena::new());
}

fn run_in_owner<T>(parent: Option<OwnerId>, f: impl FnOnce() -> T) -> (T, OwnerId) {
    let owner_id = OWNERS.with(|owners| owners.borrow_mut().allocate(parent));

    let prev_owner = CURRENT_OWNER.with(|current| current.replace(Some(owner_id)));
    let result = f();
    CURRENT_OWNER.with(|current| *current.borrow_mut() = prev_owner);

    (result, owner_id)
}

/// Execute a closure within a new owner scope, nested under the current one.
///
/// Returns the closure's value and the new owner's ID.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    run_in_owner(current_owner(), f)
}

/// Execute a closure within a new top-level owner scope.
///
/// The scope is not attached to the current owner, so only an explicit
/// [`dispose_owner`] on the returned ID tears it down.
pub fn with_root_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    run_in_owner(None, f)
}

/// Number of owners currently alive on this thread.
pub fn live_owners() -> usize {
    OWNERS.with(|owners| owners.borrow().live_count())
}

/// Get the current owner ID, if any.
pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Whether the owner exists and has not been disposed.
pub fn owner_is_alive(id: OwnerId) -> bool {
    OWNERS.with(|owners| matches!(owners.borrow().owners.get(id), Some(Some(_))))
}

/// Dispose an owner and everything it holds.
///
/// 1. Child owners, depth-first
/// 2. Cleanup callbacks, last registered first
/// 3. Effects
///
/// The owner is unlinked from its parent and its slot is freed for reuse.
/// Disposing again before the slot is reused is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let owner = OWNERS
        .try_with(|owners| owners.borrow_mut().take(id))
        .ok()
        .flatten();

    let Some(owner) = owner else {
        return;
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }

    for effect_id in owner.effects {
        try_with_runtime(|rt| rt.dispose_effect(effect_id));
    }
}

/// Register a cleanup callback on the current owner.
///
/// Does nothing outside an owner scope.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.cleanups.push(Box::new(f));
            }
        });
    }
}

pub(crate) fn register_effect(id: EffectId) {
    if let Some(owner_id) = current_owner() {
        OWNERS.with(|owners| {
            if let Some(owner) = owners.borrow_mut().get_mut(owner_id) {
                owner.effects.push(id);
            }
        });
    }
}

pub(crate) fn effect_has_owner(id: EffectId) -> bool {
    OWNERS
        .try_with(|owners| {
            owners
                .borrow()
                .owners
                .iter()
                .flatten()
                .any(|owner| owner.effects.contains(&id))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_with_owner_basic() {
        let (value, owner_id) = with_owner(|| 42);
        assert_eq!(value, 42);
        assert!(owner_is_alive(owner_id));
    }

    #[test]
    fn test_current_owner_restored_after_scope() {
        let before = current_owner();
        let (inside, _) = with_owner(current_owner);
        assert!(inside.is_some());
        assert_ne!(inside, before);
        assert_eq!(current_owner(), before);
    }

    #[test]
    fn test_nested_owners_dispose_children_first() {
        let cleanup_order = Arc::new(Mutex::new(Vec::new()));

        let order = cleanup_order.clone();
        let (_, outer_id) = with_owner(move || {
            let order_outer = order.clone();
            on_cleanup(move || order_outer.lock().unwrap().push("outer"));

            with_owner(move || {
                on_cleanup(move || order.lock().unwrap().push("inner"));
            });
        });

        dispose_owner(outer_id);

        assert_eq!(*cleanup_order.lock().unwrap(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_on_cleanup_reverse_order() {
        let cleanup_order = Arc::new(Mutex::new(Vec::new()));

        let order = cleanup_order.clone();
        let (_, owner_id) = with_owner(move || {
            for name in ["first", "second", "third"] {
                let order = order.clone();
                on_cleanup(move || order.lock().unwrap().push(name));
            }
        });

        dispose_owner(owner_id);

        assert_eq!(
            *cleanup_order.lock().unwrap(),
            vec!["third", "second", "first"]
        );
    }

    #[test]
    fn test_disposed_slots_are_reused() {
        let baseline = live_owners();
        let (_, first) = with_owner(|| {});
        assert_eq!(live_owners(), baseline + 1);

        dispose_owner(first);
        assert_eq!(live_owners(), baseline);

        let (_, second) = with_owner(|| {});
        assert_eq!(second, first);
        assert!(owner_is_alive(second));
        dispose_owner(second);
    }

    #[test]
    fn test_reused_child_slot_survives_old_parent() {
        let (inner, outer) = with_owner(|| with_owner(|| {}).1);
        dispose_owner(inner);

        // The freed slot now belongs to an unrelated scope
        let cleaned = Arc::new(Mutex::new(false));
        let flag = cleaned.clone();
        let (_, unrelated) = with_root_owner(move || {
            on_cleanup(move || *flag.lock().unwrap() = true);
        });
        assert_eq!(unrelated, inner);

        dispose_owner(outer);
        assert!(owner_is_alive(unrelated));
        assert!(!*cleaned.lock().unwrap());
        dispose_owner(unrelated);
    }

    #[test]
    fn test_root_owner_ignores_enclosing_scope() {
        let cleaned = Arc::new(Mutex::new(false));
        let flag = cleaned.clone();
        let (root, outer) = with_owner(move || {
            with_root_owner(move || {
                assert!(current_owner().is_some());
                on_cleanup(move || *flag.lock().unwrap() = true);
            })
            .1
        });

        dispose_owner(outer);
        assert!(owner_is_alive(root));
        assert!(!*cleaned.lock().unwrap());

        dispose_owner(root);
        assert!(*cleaned.lock().unwrap());
    }

    #[test]
    fn test_dispose_owner_twice_is_safe() {
        let (_, owner_id) = with_owner(|| {});

        dispose_owner(owner_id);
        dispose_owner(owner_id);
        assert!(!owner_is_alive(owner_id));
    }
}
