//! Reactive state: a store of trackable cells, observables, tracked callbacks.
//!
//! Fine-grained reactivity for driving placeholder bindings.
//!
//! - [`Store`]: owns containers of cells; `read` tracks, `write` notifies.
//! - [`Observable`]: `get`/`set` wrapper over one container (deep access).
//! - [`Store::run_tracked`]: bind a callback to whatever it reads.

pub mod store;
pub mod effect;
pub mod observable;

pub use effect::Trigger;
pub use observable::Observable;
pub use store::{CellKey, ContainerId, Store, SubscriberId, Value};
