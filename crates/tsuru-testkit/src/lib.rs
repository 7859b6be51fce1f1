//! Fake foreign environment for the Tsuru bridge
//!
//! `FakeRuntime` implements `ForeignRuntime` over plain in-memory objects:
//! indexable lists, named-field records, foreign strings, and callables.
//! Each instance is an isolated world, so tests never share state through
//! a process-wide registry.

#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use tsuru_core::{
    ForeignHandle, ForeignRuntime, InteropError, InteropResult, Key, ManagedFn, Value,
};

/// What a handle points at inside the fake world
enum Slot {
    /// Indexable, sizable sequence
    List(Vec<Value>),
    /// Named-field object; readable and writable by name, no size
    Record(HashMap<String, Value>),
    /// A foreign string value
    Text(String),
    /// A foreign callable
    Callable(ManagedFn),
}

/// An in-memory foreign environment.
///
/// Handles are allocated from a per-world counter; they mean nothing to any
/// other `FakeRuntime` instance, matching the opacity the bridge assumes.
pub struct FakeRuntime {
    slots: Mutex<HashMap<u64, Slot>>,
    symbols: Mutex<HashMap<String, ForeignHandle>>,
    exports: Mutex<HashMap<String, ManagedFn>>,
    next: AtomicU64,
}

impl FakeRuntime {
    /// Create an empty foreign world
    pub fn new() -> Self {
        FakeRuntime {
            slots: Mutex::new(HashMap::new()),
            symbols: Mutex::new(HashMap::new()),
            exports: Mutex::new(HashMap::new()),
            next: AtomicU64::new(1),
        }
    }

    fn alloc(&self, slot: Slot) -> ForeignHandle {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().insert(raw, slot);
        ForeignHandle::from_raw(raw)
    }

    /// Allocate a sizable, indexable foreign list
    pub fn list(&self, items: Vec<Value>) -> ForeignHandle {
        self.alloc(Slot::List(items))
    }

    /// Allocate a named-field foreign record (readable/writable, not sizable)
    pub fn record(&self, fields: &[(&str, Value)]) -> ForeignHandle {
        let map = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.alloc(Slot::Record(map))
    }

    /// Allocate a foreign string
    pub fn text(&self, contents: &str) -> ForeignHandle {
        self.alloc(Slot::Text(contents.to_string()))
    }

    /// Allocate a foreign callable
    pub fn callable(
        &self,
        body: impl Fn(&[Value]) -> InteropResult<Value> + Send + Sync + 'static,
    ) -> ForeignHandle {
        self.alloc(Slot::Callable(std::sync::Arc::new(body)))
    }

    /// Make `handle` resolvable by name through `resolve_symbol`
    pub fn bind_symbol(&self, name: &str, handle: ForeignHandle) {
        self.symbols.lock().insert(name.to_string(), handle);
    }

    /// Append to a foreign list (models the foreign side mutating a
    /// collection between bridge calls)
    pub fn push(&self, list: ForeignHandle, value: Value) {
        if let Some(Slot::List(items)) = self.slots.lock().get_mut(&list.raw()) {
            items.push(value);
        }
    }

    /// A managed callable previously registered through `export_symbol`
    pub fn exported(&self, name: &str) -> Option<ManagedFn> {
        self.exports.lock().get(name).cloned()
    }

    /// Invoke an exported managed callable the way foreign code would
    pub fn call_exported(&self, name: &str, args: &[Value]) -> InteropResult<Value> {
        let callable = self
            .exported(name)
            .ok_or_else(|| InteropError::UnknownMethod(name.to_string()))?;
        callable(args)
    }

    /// Snapshot of a foreign list's elements, if `handle` is a list
    pub fn list_items(&self, handle: ForeignHandle) -> Option<Vec<Value>> {
        match self.slots.lock().get(&handle.raw()) {
            Some(Slot::List(items)) => Some(items.clone()),
            _ => None,
        }
    }

    /// Current value of a record field, if `handle` is a record
    pub fn record_field(&self, handle: ForeignHandle, name: &str) -> Option<Value> {
        match self.slots.lock().get(&handle.raw()) {
            Some(Slot::Record(fields)) => fields.get(name).cloned(),
            _ => None,
        }
    }
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ForeignRuntime for FakeRuntime {
    fn read(&self, handle: ForeignHandle, key: &Key) -> InteropResult<Value> {
        let slots = self.slots.lock();
        let slot = slots
            .get(&handle.raw())
            .ok_or_else(|| InteropError::protocol("read", handle, "no such object"))?;
        match (slot, key) {
            (Slot::List(items), Key::Index(index)) => items.get(*index).cloned().ok_or_else(|| {
                InteropError::protocol(
                    "read",
                    handle,
                    format!("index [{index}] out of bounds (len {})", items.len()),
                )
            }),
            (Slot::Record(fields), Key::Name(name)) => {
                fields.get(name).cloned().ok_or_else(|| {
                    InteropError::protocol("read", handle, format!("no readable member `{name}`"))
                })
            }
            _ => Err(InteropError::protocol(
                "read",
                handle,
                format!("object is not readable at {key}"),
            )),
        }
    }

    fn write(&self, handle: ForeignHandle, key: &Key, value: Value) -> InteropResult<()> {
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(&handle.raw())
            .ok_or_else(|| InteropError::protocol("write", handle, "no such object"))?;
        match (slot, key) {
            (Slot::List(items), Key::Index(index)) => {
                if *index < items.len() {
                    items[*index] = value;
                    Ok(())
                } else {
                    Err(InteropError::protocol(
                        "write",
                        handle,
                        format!("index [{index}] out of bounds (len {})", items.len()),
                    ))
                }
            }
            (Slot::Record(fields), Key::Name(name)) => {
                fields.insert(name.clone(), value);
                Ok(())
            }
            _ => Err(InteropError::protocol(
                "write",
                handle,
                format!("object is not writable at {key}"),
            )),
        }
    }

    fn invoke(&self, callable: ForeignHandle, args: &[Value]) -> InteropResult<Value> {
        // Clone the callable out so the foreign body runs without the world
        // lock held; it may itself call back into this runtime.
        let body = match self.slots.lock().get(&callable.raw()) {
            Some(Slot::Callable(body)) => body.clone(),
            Some(_) => {
                return Err(InteropError::protocol(
                    "invoke",
                    callable,
                    "object is not callable",
                ))
            }
            None => return Err(InteropError::protocol("invoke", callable, "no such object")),
        };
        body(args)
    }

    fn size(&self, handle: ForeignHandle) -> InteropResult<usize> {
        match self.slots.lock().get(&handle.raw()) {
            Some(Slot::List(items)) => Ok(items.len()),
            _ => Err(InteropError::NotSizable(handle)),
        }
    }

    fn is_foreign_string(&self, value: &Value) -> bool {
        match value {
            Value::Foreign(handle) => {
                matches!(self.slots.lock().get(&handle.raw()), Some(Slot::Text(_)))
            }
            _ => false,
        }
    }

    fn to_managed_string(&self, value: &Value) -> InteropResult<String> {
        if let Value::Foreign(handle) = value {
            if let Some(Slot::Text(contents)) = self.slots.lock().get(&handle.raw()) {
                return Ok(contents.clone());
            }
        }
        // Non-string values coerce through their textual form, like a host
        // environment stringifying the result of a call.
        Ok(value.text())
    }

    fn resolve_symbol(&self, name: &str) -> Option<ForeignHandle> {
        self.symbols.lock().get(name).copied()
    }

    fn export_symbol(&self, name: &str, callable: ManagedFn) -> InteropResult<()> {
        self.exports.lock().insert(name.to_string(), callable);
        Ok(())
    }

    fn create_array(&self, items: &[Value]) -> InteropResult<ForeignHandle> {
        Ok(self.list(items.to_vec()))
    }
}
