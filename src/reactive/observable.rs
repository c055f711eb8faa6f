//! Observable: explicit accessor wrapper over one store container.
//!
//! Every `get` is a tracked read and every `set` a notifying write. Reading a
//! property that holds a nested object hands back another [`Observable`], so
//! deep access like `data.field("user")?.get("name")` is tracked at each level.

use std::fmt;

use super::store::{ContainerId, Store, Value};

/// Tracked view of one container in a [`Store`].
#[derive(Clone)]
pub struct Observable {
    store: Store,
    id: ContainerId,
}

impl fmt::Debug for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").field("id", &self.id).finish()
    }
}

impl PartialEq for Observable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::rc::Rc::ptr_eq(&self.store.rt, &other.store.rt)
    }
}

impl Observable {
    pub(crate) fn new(store: Store, id: ContainerId) -> Self {
        Self { store, id }
    }

    /// Identity of the wrapped container.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The store this container lives in.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Tracked read of one property.
    pub fn get(&self, property: &str) -> Value {
        self.store.read(self.id, property)
    }

    /// Untracked read of one property.
    pub fn get_untracked(&self, property: &str) -> Value {
        self.store.read_untracked(self.id, property)
    }

    /// Write one property and notify its subscribers.
    pub fn set(&self, property: &str, value: impl Into<Value>) {
        self.store.write(self.id, property, value);
    }

    /// Tracked read of a property holding a nested object.
    ///
    /// Returns `None` if the property is missing or not an object.
    pub fn field(&self, property: &str) -> Option<Observable> {
        self.get(property)
            .as_object()
            .map(|id| Observable::new(self.store.clone(), id))
    }

    /// Tracked read along a dotted path such as `user.address.city`.
    ///
    /// Every segment is a tracked read. Returns `None` when a segment is
    /// missing, null, or an intermediate segment is not an object.
    pub fn path(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.').map(str::trim);
        let mut current = self.clone();
        let mut last = segments.next()?;
        for next in segments {
            current = current.field(last)?;
            last = next;
        }
        match current.get(last) {
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Write along a dotted path. The last segment is created if missing.
    ///
    /// Returns `false` (and writes nothing) if an intermediate segment does not
    /// resolve to an object.
    pub fn set_path(&self, path: &str, value: impl Into<Value>) -> bool {
        let segments: Vec<&str> = path.split('.').map(str::trim).collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let mut current = self.clone();
        for segment in parents {
            let next = current.store.untracked(|| current.field(segment));
            match next {
                Some(next) => current = next,
                None => return false,
            }
        }
        current.set(last, value);
        true
    }

    /// Property names in insertion order. Untracked.
    pub fn keys(&self) -> Vec<String> {
        self.store.keys(self.id)
    }

    /// Deep JSON snapshot of this container. Untracked.
    pub fn to_json(&self) -> serde_json::Value {
        self.store.export_json(&Value::Object(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Trigger;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fixture() -> (Store, Observable) {
        let store = Store::new();
        let root = store.import_root(&json!({
            "title": "hello",
            "user": { "name": "ada", "address": { "city": "london" } },
        }));
        (store, root)
    }

    #[test]
    fn test_get_and_set() {
        let (_store, root) = fixture();
        assert_eq!(root.get("title"), Value::from("hello"));
        root.set("title", "bye");
        assert_eq!(root.get_untracked("title"), Value::from("bye"));
    }

    #[test]
    fn test_field_returns_wrapper_for_objects_only() {
        let (_store, root) = fixture();
        assert!(root.field("user").is_some());
        assert!(root.field("title").is_none());
        assert!(root.field("missing").is_none());
    }

    #[test]
    fn test_path_reads_nested_values() {
        let (_store, root) = fixture();
        assert_eq!(root.path("user.address.city"), Some(Value::from("london")));
        assert_eq!(root.path(" user . name "), Some(Value::from("ada")));
        assert_eq!(root.path("user.missing"), None);
        assert_eq!(root.path("title.length"), None);
    }

    #[test]
    fn test_deep_read_is_tracked() {
        let (store, root) = fixture();
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let r = root.clone();
        store.run_tracked(move |_| {
            let _ = r.path("user.address.city");
            runs_c.set(runs_c.get() + 1);
        });

        let address = root.field("user").and_then(|u| u.field("address")).unwrap();
        address.set("city", "paris");
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_replacing_nested_object_notifies_deep_reader() {
        let (store, root) = fixture();
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        let r = root.clone();
        store.run_tracked(move |trigger| {
            let name = r.path("user.name");
            if trigger == Trigger::Change {
                seen_c.borrow_mut().push(name);
            }
        });

        let replacement = store.import_json(&json!({ "name": "grace" }));
        root.set("user", replacement);
        assert_eq!(*seen.borrow(), vec![Some(Value::from("grace"))]);
    }

    #[test]
    fn test_set_path_writes_nested() {
        let (_store, root) = fixture();
        assert!(root.set_path("user.address.city", "rome"));
        assert_eq!(root.path("user.address.city"), Some(Value::from("rome")));
        assert!(!root.set_path("title.x", 1));
    }

    #[test]
    fn test_keys_and_json() {
        let (_store, root) = fixture();
        assert_eq!(root.keys(), vec!["title", "user"]);
        assert_eq!(root.to_json()["user"]["name"], json!("ada"));
    }

    #[test]
    fn test_equality_is_identity() {
        let (store, root) = fixture();
        let same = Observable::new(store.clone(), root.id());
        assert_eq!(root, same);
        let other = store.create_object([("title", "hello")]);
        assert_ne!(root, other);
    }
}
