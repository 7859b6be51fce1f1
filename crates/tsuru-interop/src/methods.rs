//! Method bridge — importing foreign callables, exporting managed methods
//!
//! Imported methods land in a `MethodTable`; the process-wide table behind
//! `global_methods` makes an import permanent for the process, while tests
//! construct isolated tables instead of sharing global state.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use tsuru_core::{
    ForeignHandle, ForeignRuntime, InteropError, InteropResult, Key, ManagedFn, Value,
};

/// Registry of managed methods by symbolic name.
///
/// Bindings are registered once and not unregistered in normal operation;
/// redefining a name replaces the binding.
pub struct MethodTable {
    methods: Mutex<HashMap<String, ManagedFn>>,
}

impl MethodTable {
    /// Create an empty table
    pub fn new() -> Self {
        MethodTable {
            methods: Mutex::new(HashMap::new()),
        }
    }

    /// Define (or redefine) a method
    pub fn define(&self, name: &str, body: ManagedFn) {
        self.methods.lock().insert(name.to_string(), body);
    }

    /// Get a method by name
    pub fn lookup(&self, name: &str) -> Option<ManagedFn> {
        self.methods.lock().get(name).cloned()
    }

    /// Check if a method is defined
    pub fn contains(&self, name: &str) -> bool {
        self.methods.lock().contains_key(name)
    }

    /// Number of defined methods
    pub fn len(&self) -> usize {
        self.methods.lock().len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.methods.lock().is_empty()
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_METHODS: LazyLock<MethodTable> = LazyLock::new(MethodTable::new);

/// The process-wide method table. Methods imported here are callable for
/// the life of the process, like any native method.
pub fn global_methods() -> &'static MethodTable {
    &GLOBAL_METHODS
}

/// Import a foreign callable as a managed method.
///
/// Resolves `name` on the foreign side and defines a managed method of the
/// same name whose body invokes the callable and string-coerces the result.
/// The coercion is fixed policy: imported results are always managed
/// strings; callers needing other types convert further themselves.
pub fn import_method(
    runtime: Arc<dyn ForeignRuntime>,
    table: &MethodTable,
    name: &str,
) -> InteropResult<()> {
    let callable = runtime
        .resolve_symbol(name)
        .ok_or_else(|| InteropError::UnresolvedForeignSymbol(name.to_string()))?;
    table.define(
        name,
        Arc::new(move |args| {
            let ret = runtime.invoke(callable, args)?;
            Ok(Value::Str(runtime.to_managed_string(&ret)?))
        }),
    );
    Ok(())
}

/// Export a managed method under the same textual name on the foreign side,
/// so foreign code can invoke it.
pub fn export_method(
    runtime: &dyn ForeignRuntime,
    table: &MethodTable,
    name: &str,
) -> InteropResult<()> {
    let method = table
        .lookup(name)
        .ok_or_else(|| InteropError::UnknownMethod(name.to_string()))?;
    runtime.export_symbol(name, method)
}

/// Managed-side symbol lookup, as answered when the foreign environment asks
/// for a managed callable by name.
pub fn lookup_symbol(table: &MethodTable, name: &str) -> Option<ManagedFn> {
    table.lookup(name)
}

/// Narrow duck-typing probe used by generic array coercion: only the
/// `to_a`/`to_ary` names are affirmed, and only when the object reports a
/// size. Every other name is denied regardless of what the object supports.
pub fn responds_to(runtime: &dyn ForeignRuntime, foreign: ForeignHandle, name: &str) -> bool {
    matches!(name, "to_a" | "to_ary") && runtime.has_size(foreign)
}

/// Materialize a foreign value as a fixed-length managed array by reading
/// indices `0..size` in order. Fails with `NotSizable` if the value does not
/// report a size.
pub fn to_array(runtime: &dyn ForeignRuntime, foreign: ForeignHandle) -> InteropResult<Vec<Value>> {
    let len = runtime.size(foreign)?;
    (0..len)
        .map(|index| runtime.read(foreign, &Key::Index(index)))
        .collect()
}

/// Materialize a managed slice as a foreign array
pub fn foreign_array(
    runtime: &dyn ForeignRuntime,
    items: &[Value],
) -> InteropResult<ForeignHandle> {
    runtime.create_array(items)
}
