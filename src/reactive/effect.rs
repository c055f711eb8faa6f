//! Tracked callbacks: registration, invocation, disposal.
//!
//! A tracked callback is bound with [`Store::run_tracked`]: it runs once
//! immediately with [`Trigger::Register`] while the store records every cell
//! it reads, and afterwards runs with [`Trigger::Change`] whenever one of
//! those cells is written.
//!
//! ```ignore
//! let store = Store::new();
//! let data = store.create_object([("count", 0)]);
//! let d = data.clone();
//! store.run_tracked(move |trigger| {
//!     println!("count = {} ({trigger:?})", d.get("count"));
//! });
//! data.set("count", 1); // prints "count = 1 (Change)"
//! ```

use std::rc::Rc;

use super::store::{Store, SubscriberId, SubscriberState};

/// Why a tracked callback is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First run, collecting dependencies.
    Register,
    /// A cell the callback depends on was written.
    Change,
}

impl Store {
    /// Bind `callback` as a subscriber and run it once to collect its reads.
    ///
    /// The previously active subscriber (if any) is restored afterwards, so
    /// nested registrations do not leak dependencies into each other.
    pub fn run_tracked(&self, callback: impl Fn(Trigger) + 'static) -> SubscriberId {
        let sid = self.rt.borrow_mut().subscribers.insert(SubscriberState {
            callback: Rc::new(callback),
            dependencies: Vec::new(),
            active: true,
        });
        tracing::trace!(?sid, "subscriber registered");
        invoke(self, sid, Trigger::Register);
        sid
    }

    /// Stop a subscriber: remove it from every cell it depends on.
    ///
    /// Disposing twice is a no-op.
    pub fn dispose(&self, sid: SubscriberId) {
        let mut rt = self.rt.borrow_mut();
        let deps = match rt.subscribers.get_mut(sid) {
            Some(sub) if sub.active => {
                sub.active = false;
                std::mem::take(&mut sub.dependencies)
            }
            _ => return,
        };
        for key in deps {
            if let Some(cell) = rt
                .containers
                .get_mut(key.container)
                .and_then(|state| state.cells.get_mut(&key.property))
            {
                cell.subscribers.retain(|s| *s != sid);
            }
        }
    }

    /// Run `f` with tracking suspended; reads inside register nothing.
    pub fn untracked<R>(&self, f: impl FnOnce() -> R) -> R {
        let prev = self.rt.borrow_mut().tracking.take();
        let result = f();
        self.rt.borrow_mut().tracking = prev;
        result
    }

    /// Whether a subscriber is currently collecting dependencies.
    pub fn is_tracking(&self) -> bool {
        self.rt.borrow().tracking.is_some()
    }

    /// Number of cells a subscriber depends on.
    pub fn dependency_count(&self, sid: SubscriberId) -> usize {
        self.rt
            .borrow()
            .subscribers
            .get(sid)
            .map_or(0, |sub| sub.dependencies.len())
    }
}

/// Run one subscriber with itself installed as the tracking context.
///
/// The callback is cloned out of the runtime before it runs, so it can read
/// and write the store (and even re-enter itself) without a live borrow.
pub(crate) fn invoke(store: &Store, sid: SubscriberId, trigger: Trigger) {
    let (callback, prev) = {
        let mut rt = store.rt.borrow_mut();
        let callback = match rt.subscribers.get(sid) {
            Some(sub) if sub.active => sub.callback.clone(),
            _ => return,
        };
        let prev = rt.tracking.replace(sid);
        (callback, prev)
    };

    callback(trigger);

    store.rt.borrow_mut().tracking = prev;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::store::Value;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_run_tracked_runs_immediately_with_register() {
        let store = Store::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        store.run_tracked(move |trigger| seen_c.borrow_mut().push(trigger));
        assert_eq!(*seen.borrow(), vec![Trigger::Register]);
    }

    #[test]
    fn test_tracking_cleared_after_registration() {
        let store = Store::new();
        let s = store.clone();
        let inside = Rc::new(Cell::new(false));
        let inside_c = inside.clone();
        store.run_tracked(move |_| inside_c.set(s.is_tracking()));
        assert!(inside.get());
        assert!(!store.is_tracking());
    }

    #[test]
    fn test_change_trigger_on_write() {
        let store = Store::new();
        let data = store.create_object([("v", 1)]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        let d = data.clone();
        store.run_tracked(move |trigger| {
            let v = d.get("v");
            seen_c.borrow_mut().push((trigger, v));
        });
        data.set("v", 2);
        assert_eq!(
            *seen.borrow(),
            vec![
                (Trigger::Register, Value::Number(1.0)),
                (Trigger::Change, Value::Number(2.0)),
            ]
        );
    }

    #[test]
    fn test_dependencies_accumulate_on_rerun() {
        let store = Store::new();
        let data = store.create_object([("flag", Value::Bool(false)), ("a", 1.into()), ("b", 2.into())]);
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let d = data.clone();
        let sid = store.run_tracked(move |_| {
            runs_c.set(runs_c.get() + 1);
            let _ = if d.get("flag") == Value::Bool(true) { d.get("b") } else { d.get("a") };
        });
        assert_eq!(store.dependency_count(sid), 2);

        data.set("flag", true);
        assert_eq!(runs.get(), 2);
        assert_eq!(store.dependency_count(sid), 3);

        // Both branches are now dependencies.
        data.set("a", 10);
        data.set("b", 20);
        assert_eq!(runs.get(), 4);
    }

    #[test]
    fn test_dispose_stops_notifications() {
        let store = Store::new();
        let data = store.create_object([("v", 0)]);
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let d = data.clone();
        let sid = store.run_tracked(move |_| {
            let _ = d.get("v");
            runs_c.set(runs_c.get() + 1);
        });
        data.set("v", 1);
        assert_eq!(runs.get(), 2);

        store.dispose(sid);
        data.set("v", 2);
        assert_eq!(runs.get(), 2);
        assert_eq!(store.subscriber_count(data.id(), "v"), 0);
        assert_eq!(store.dependency_count(sid), 0);
    }

    #[test]
    fn test_dispose_idempotent() {
        let store = Store::new();
        let sid = store.run_tracked(|_| {});
        store.dispose(sid);
        store.dispose(sid);
    }

    #[test]
    fn test_dispose_during_notification_skips_later_run() {
        let store = Store::new();
        let data = store.create_object([("v", 0)]);
        let victim: Rc<Cell<Option<SubscriberId>>> = Rc::new(Cell::new(None));
        let second_runs = Rc::new(Cell::new(0));

        let s = store.clone();
        let d = data.clone();
        let victim_c = victim.clone();
        store.run_tracked(move |trigger| {
            let _ = d.get("v");
            if trigger == Trigger::Change {
                if let Some(sid) = victim_c.get() {
                    s.dispose(sid);
                }
            }
        });

        let d = data.clone();
        let second_c = second_runs.clone();
        let sid = store.run_tracked(move |_| {
            let _ = d.get("v");
            second_c.set(second_c.get() + 1);
        });
        victim.set(Some(sid));

        data.set("v", 1);
        assert_eq!(second_runs.get(), 1);
    }

    #[test]
    fn test_untracked_suspends_registration() {
        let store = Store::new();
        let data = store.create_object([("v", 0)]);
        let s = store.clone();
        let d = data.clone();
        let sid = store.run_tracked(move |_| {
            s.untracked(|| d.get("v"));
        });
        assert_eq!(store.dependency_count(sid), 0);
    }

    #[test]
    fn test_nested_registration_restores_outer_context() {
        let store = Store::new();
        let data = store.create_object([("outer", 0), ("inner", 0)]);
        let s = store.clone();
        let d = data.clone();
        let outer = store.run_tracked(move |trigger| {
            if trigger == Trigger::Register {
                let d2 = d.clone();
                s.run_tracked(move |_| {
                    let _ = d2.get("inner");
                });
            }
            let _ = d.get("outer");
        });
        assert_eq!(store.dependency_count(outer), 1);
        assert_eq!(store.subscriber_count(data.id(), "inner"), 1);
        assert_eq!(store.subscriber_count(data.id(), "outer"), 1);
    }
}
