//! Reactive store: containers of cells with automatic dependency tracking.
//!
//! A cell is one `(container, property)` pair. Reading a cell while a
//! subscriber is running registers that subscriber on the cell; writing a cell
//! runs every registered subscriber synchronously, in registration order.
//!
//! The runtime is owned by a [`Store`] handle rather than a thread-local, so
//! independent trees never share cells or subscribers.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use super::effect::{invoke, Trigger};
use super::observable::Observable;

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

new_key_type! {
    /// Identity of a container object inside a [`Store`].
    pub struct ContainerId;

    /// Identity of a tracked callback inside a [`Store`].
    pub struct SubscriberId;
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A value held by a reactive cell.
///
/// Nested objects are stored as their own containers and referenced by id, so
/// every level of a nested structure is made of trackable cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Object(ContainerId),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The numeric payload, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The container id, if this value is a nested object.
    pub fn as_object(&self) -> Option<ContainerId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }
}

/// Textual form used when a value is substituted into a prop.
///
/// Integral numbers print without a fraction and lists join with `,`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Text(s) => write!(f, "{s}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object]"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

/// Address of one reactive cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub container: ContainerId,
    pub property: String,
}

pub(crate) struct CellState {
    pub(crate) value: Value,
    /// Registration order is notification order; no duplicates.
    pub(crate) subscribers: Vec<SubscriberId>,
}

impl CellState {
    fn new(value: Value) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }
}

#[derive(Default)]
pub(crate) struct ContainerState {
    pub(crate) cells: HashMap<String, CellState>,
    /// Property names in insertion order, for deterministic iteration.
    pub(crate) order: Vec<String>,
}

pub(crate) struct SubscriberState {
    /// Shared so a subscriber can be re-entered while it is already running.
    pub(crate) callback: Rc<dyn Fn(Trigger)>,
    pub(crate) dependencies: Vec<CellKey>,
    pub(crate) active: bool,
}

pub(crate) struct Runtime {
    pub(crate) containers: SlotMap<ContainerId, ContainerState>,
    pub(crate) subscribers: SlotMap<SubscriberId, SubscriberState>,
    /// The subscriber currently collecting dependencies.
    pub(crate) tracking: Option<SubscriberId>,
}

impl Runtime {
    fn new() -> Self {
        Self {
            containers: SlotMap::with_key(),
            subscribers: SlotMap::with_key(),
            tracking: None,
        }
    }

    /// Register `subscriber` on the cell, creating the cell if needed.
    fn track(&mut self, container: ContainerId, property: &str, subscriber: SubscriberId) {
        let Some(state) = self.containers.get_mut(container) else {
            return;
        };
        if !state.cells.contains_key(property) {
            state.order.push(property.to_owned());
        }
        let cell = state
            .cells
            .entry(property.to_owned())
            .or_insert_with(|| CellState::new(Value::Null));
        if cell.subscribers.contains(&subscriber) {
            return;
        }
        cell.subscribers.push(subscriber);
        if let Some(sub) = self.subscribers.get_mut(subscriber) {
            sub.dependencies.push(CellKey {
                container,
                property: property.to_owned(),
            });
        }
    }

    /// Unregister `readers` from every cell reachable from `value`.
    ///
    /// Called when `value` is overwritten: `readers` are about to re-run and
    /// will track whatever they reach through the new value instead.
    fn release(&mut self, value: &Value, readers: &[SubscriberId]) {
        let mut pending = Vec::new();
        collect_objects(value, &mut pending);
        if pending.is_empty() || readers.is_empty() {
            return;
        }

        let mut released = HashSet::new();
        while let Some(container) = pending.pop() {
            if !released.insert(container) {
                continue;
            }
            let Some(state) = self.containers.get_mut(container) else {
                continue;
            };
            for cell in state.cells.values_mut() {
                cell.subscribers.retain(|sid| !readers.contains(sid));
                collect_objects(&cell.value, &mut pending);
            }
        }
        for &sid in readers {
            if let Some(sub) = self.subscribers.get_mut(sid) {
                sub.dependencies.retain(|key| !released.contains(&key.container));
            }
        }
        tracing::trace!(containers = released.len(), "replaced objects released");
    }
}

fn collect_objects(value: &Value, out: &mut Vec<ContainerId>) {
    match value {
        Value::Object(id) => out.push(*id),
        Value::List(items) => items.iter().for_each(|item| collect_objects(item, out)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Handle to a reactive store. Cloning the handle shares the same cells.
#[derive(Clone)]
pub struct Store {
    pub(crate) rt: Rc<RefCell<Runtime>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rt = self.rt.borrow();
        f.debug_struct("Store")
            .field("containers", &rt.containers.len())
            .field("subscribers", &rt.subscribers.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rt: Rc::new(RefCell::new(Runtime::new())),
        }
    }

    /// Create a new container holding `fields` and return a wrapper for it.
    pub fn create_object<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Observable
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut state = ContainerState::default();
        for (key, value) in fields {
            let key = key.into();
            if !state.cells.contains_key(&key) {
                state.order.push(key.clone());
            }
            state.cells.insert(key, CellState::new(value.into()));
        }
        let id = self.rt.borrow_mut().containers.insert(state);
        Observable::new(self.clone(), id)
    }

    /// Import a JSON document. Objects become containers (recursively).
    pub fn import_json(&self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(|item| self.import_json(item)).collect())
            }
            serde_json::Value::Object(map) => {
                let fields: Vec<(String, Value)> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.import_json(v)))
                    .collect();
                Value::Object(self.create_object(fields).id())
            }
        }
    }

    /// Import a JSON object as a root container.
    ///
    /// Non-object JSON yields an empty container.
    pub fn import_root(&self, json: &serde_json::Value) -> Observable {
        match self.import_json(json) {
            Value::Object(id) => Observable::new(self.clone(), id),
            _ => self.create_object(std::iter::empty::<(String, Value)>()),
        }
    }

    /// Export a value back to JSON, following nested containers. Untracked.
    pub fn export_json(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(|v| self.export_json(v)).collect())
            }
            Value::Object(id) => {
                let entries: Vec<(String, Value)> = {
                    let rt = self.rt.borrow();
                    match rt.containers.get(*id) {
                        Some(state) => state
                            .order
                            .iter()
                            .filter_map(|k| state.cells.get(k).map(|c| (k.clone(), c.value.clone())))
                            .collect(),
                        None => Vec::new(),
                    }
                };
                let mut map = serde_json::Map::new();
                for (k, v) in entries {
                    map.insert(k, self.export_json(&v));
                }
                serde_json::Value::Object(map)
            }
        }
    }

    /// Read a cell, registering the running subscriber (if any) on it.
    ///
    /// Reading a property that was never written yields [`Value::Null`]; the
    /// registration still happens so a later write notifies the reader.
    pub fn read(&self, container: ContainerId, property: &str) -> Value {
        let mut rt = self.rt.borrow_mut();
        if let Some(sid) = rt.tracking {
            rt.track(container, property, sid);
        }
        rt.containers
            .get(container)
            .and_then(|state| state.cells.get(property))
            .map(|cell| cell.value.clone())
            .unwrap_or_default()
    }

    /// Read a cell without registering any subscriber.
    pub fn read_untracked(&self, container: ContainerId, property: &str) -> Value {
        let rt = self.rt.borrow();
        rt.containers
            .get(container)
            .and_then(|state| state.cells.get(property))
            .map(|cell| cell.value.clone())
            .unwrap_or_default()
    }

    /// Overwrite a cell, then run each of its subscribers once, in order.
    ///
    /// Subscribers run synchronously and may write other cells; those writes
    /// run their own subscribers before this call returns. When the old value
    /// held nested objects, the cell's subscribers stop listening to them: a
    /// later write through a retained handle to a replaced object notifies
    /// only readers that reached it some other way.
    pub fn write(&self, container: ContainerId, property: &str, value: impl Into<Value>) {
        let value = value.into();
        let subscribers = {
            let mut rt = self.rt.borrow_mut();
            let Some(state) = rt.containers.get_mut(container) else {
                tracing::warn!(?container, property, "write to unknown container ignored");
                return;
            };
            if !state.cells.contains_key(property) {
                state.order.push(property.to_owned());
            }
            let cell = state
                .cells
                .entry(property.to_owned())
                .or_insert_with(|| CellState::new(Value::Null));
            let previous = std::mem::replace(&mut cell.value, value);
            let subscribers = cell.subscribers.clone();
            rt.release(&previous, &subscribers);
            subscribers
        };
        tracing::trace!(?container, property, subscribers = subscribers.len(), "cell written");
        for sid in subscribers {
            invoke(self, sid, Trigger::Change);
        }
    }

    /// Property names of a container, in insertion order. Untracked.
    pub fn keys(&self, container: ContainerId) -> Vec<String> {
        self.rt
            .borrow()
            .containers
            .get(container)
            .map(|state| state.order.clone())
            .unwrap_or_default()
    }

    /// Number of subscribers registered on a cell.
    pub fn subscriber_count(&self, container: ContainerId, property: &str) -> usize {
        self.rt
            .borrow()
            .containers
            .get(container)
            .and_then(|state| state.cells.get(property))
            .map_or(0, |cell| cell.subscribers.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_read_returns_written_value() {
        let store = Store::new();
        let obj = store.create_object([("count", 0)]);
        store.write(obj.id(), "count", 7);
        assert_eq!(store.read(obj.id(), "count"), Value::Number(7.0));
    }

    #[test]
    fn test_read_missing_property_is_null() {
        let store = Store::new();
        let obj = store.create_object([("a", 1)]);
        assert!(store.read(obj.id(), "missing").is_null());
        assert!(store.read_untracked(obj.id(), "missing").is_null());
    }

    #[test]
    fn test_untracked_read_outside_subscriber_registers_nothing() {
        let store = Store::new();
        let obj = store.create_object([("a", 1)]);
        let _ = store.read(obj.id(), "a");
        assert_eq!(store.subscriber_count(obj.id(), "a"), 0);
    }

    #[test]
    fn test_write_notifies_each_subscriber_once_in_order() {
        let store = Store::new();
        let obj = store.create_object([("x", 0)]);
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let log = log.clone();
            let s = store.clone();
            let id = obj.id();
            store.run_tracked(move |trigger| {
                // Two reads of the same cell still register once.
                let _ = s.read(id, "x");
                let _ = s.read(id, "x");
                if trigger == Trigger::Change {
                    log.borrow_mut().push(tag);
                }
            });
        }

        store.write(obj.id(), "x", 1);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(store.subscriber_count(obj.id(), "x"), 2);
    }

    #[test]
    fn test_write_to_unrelated_cell_does_not_notify() {
        let store = Store::new();
        let obj = store.create_object([("a", 0), ("b", 0)]);
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let s = store.clone();
        let id = obj.id();
        store.run_tracked(move |_| {
            let _ = s.read(id, "a");
            runs_c.set(runs_c.get() + 1);
        });
        store.write(obj.id(), "b", 5);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_reentrant_write_runs_to_completion() {
        let store = Store::new();
        let obj = store.create_object([("a", 0), ("b", 0)]);
        let id = obj.id();

        // a -> b = a * 2
        let s = store.clone();
        store.run_tracked(move |_| {
            let a = s.read(id, "a").as_f64().unwrap_or_default();
            s.write(id, "b", a * 2.0);
        });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        let s = store.clone();
        store.run_tracked(move |_| {
            seen_c.borrow_mut().push(s.read(id, "b"));
        });

        store.write(id, "a", 5);
        assert_eq!(store.read_untracked(id, "b"), Value::Number(10.0));
        assert_eq!(seen.borrow().last(), Some(&Value::Number(10.0)));
    }

    #[test]
    fn test_bounded_self_write_recurses_synchronously() {
        let store = Store::new();
        let obj = store.create_object([("n", 0)]);
        let id = obj.id();
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let s = store.clone();
        store.run_tracked(move |_| {
            runs_c.set(runs_c.get() + 1);
            let n = s.read(id, "n").as_f64().unwrap_or_default();
            if n > 0.0 && n < 3.0 {
                s.write(id, "n", n + 1.0);
            }
        });
        store.write(id, "n", 1);
        // register + writes of 1, 2, 3
        assert_eq!(runs.get(), 4);
        assert_eq!(store.read_untracked(id, "n"), Value::Number(3.0));
    }

    #[test]
    fn test_replaced_object_stops_notifying_old_readers() {
        let store = Store::new();
        let root = store.import_root(&json!({ "user": { "name": "ada" } }));
        let old = root.field("user").unwrap();
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let r = root.clone();
        let sid = store.run_tracked(move |_| {
            let _ = r.path("user.name");
            runs_c.set(runs_c.get() + 1);
        });
        assert_eq!(store.subscriber_count(old.id(), "name"), 1);

        root.set("user", store.import_json(&json!({ "name": "grace" })));
        assert_eq!(runs.get(), 2);
        assert_eq!(store.subscriber_count(old.id(), "name"), 0);
        assert_eq!(store.dependency_count(sid), 2);

        // A write through the retained handle reaches nobody.
        old.set("name", "stale");
        assert_eq!(runs.get(), 2);

        let new = root.get_untracked("user").as_object().unwrap();
        store.write(new, "name", "hopper");
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_replacing_object_keeps_readers_of_other_paths() {
        let store = Store::new();
        let root = store.import_root(&json!({ "a": { "x": 1 } }));
        let shared = root.get_untracked("a");
        root.set("b", shared.clone());

        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        let r = root.clone();
        store.run_tracked(move |_| {
            let _ = r.path("b.x");
            runs_c.set(runs_c.get() + 1);
        });

        root.set("a", Value::Null);
        assert_eq!(runs.get(), 1);

        store.write(shared.as_object().unwrap(), "x", 2);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_import_and_export_json() {
        let store = Store::new();
        let data = json!({ "name": "ada", "user": { "age": 36 }, "tags": ["a", "b"] });
        let root = store.import_root(&data);
        assert_eq!(root.get("name"), Value::from("ada"));
        let user = root.field("user").unwrap();
        assert_eq!(user.get("age"), Value::Number(36.0));
        assert_eq!(store.export_json(&Value::Object(root.id())), data);
    }

    #[test]
    fn test_import_root_non_object_is_empty() {
        let store = Store::new();
        let root = store.import_root(&json!(42));
        assert!(store.keys(root.id()).is_empty());
    }

    #[test]
    fn test_keys_preserve_insertion_order() {
        let store = Store::new();
        let obj = store.create_object([("z", 1), ("a", 2)]);
        store.write(obj.id(), "m", 3);
        assert_eq!(store.keys(obj.id()), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::List(vec![1.into(), "x".into()]).to_string(), "1,x");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(2).as_f64(), Some(2.0));
        assert_eq!(Value::from("s").as_str(), Some("s"));
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert!(Value::Null.as_object().is_none());
    }

    #[test]
    fn test_debug_store() {
        let store = Store::new();
        let _ = store.create_object([("a", 1)]);
        let dbg = format!("{store:?}");
        assert!(dbg.contains("Store"));
        assert!(dbg.contains("containers"));
    }
}
