//! Dynamic object literals with lazily bound accessors
//!
//! An `ObjectLiteral` declares none of its properties in advance. The first
//! read or write of a name binds a getter/setter pair for it, scoped to that
//! one literal; later accesses go straight through the bound pair. Binding
//! never leaks between literals — each instance owns its accessor table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use tsuru_core::{ForeignRuntime, InteropError, InteropResult, Instance, Value};

use crate::keys::{accessor_names, to_foreign_key, SIGIL};

/// Getter/setter closure pair bound for one attribute of one literal
struct Accessor {
    get: Box<dyn Fn() -> Value + Send + Sync>,
    set: Box<dyn Fn(Value) + Send + Sync>,
}

/// Message-style member dispatch with lazy binding.
///
/// `send` is the unknown-member hook: on a selector whose accessor is not
/// yet bound it normalizes the name, binds an accessor pair, and re-dispatches
/// the original access through it. Implementors supply the three primitive
/// operations; the dispatch sequence itself is fixed here.
pub trait Receiver {
    /// Read through the accessor bound for `name`, if one is bound
    fn read_bound(&self, name: &str) -> Option<Value>;

    /// Write through the accessor bound for `name`; `false` if none is bound
    fn write_bound(&self, name: &str, value: Value) -> bool;

    /// Bind an accessor pair for `name`. Idempotent: a name already bound
    /// keeps its existing pair.
    fn bind(&self, name: &str);

    /// Dispatch a member access by selector.
    ///
    /// A trailing `=` marks a write (one argument expected, missing argument
    /// writes null); anything else is a read. The canonical attribute name —
    /// selector with any assignment marker stripped — must be a plain
    /// identifier, else `InvalidAttributeName`. Writes return the written
    /// value, reads of a never-written name return null.
    fn send(&self, selector: &str, args: &[Value]) -> InteropResult<Value> {
        let (name, is_write) = match selector.strip_suffix('=') {
            Some(rest) => (rest, true),
            None => (selector, false),
        };
        ensure_attribute_name(name)?;

        if is_write {
            let value = args.first().cloned().unwrap_or(Value::Null);
            if !self.write_bound(name, value.clone()) {
                self.bind(name);
                self.write_bound(name, value.clone());
            }
            Ok(value)
        } else {
            match self.read_bound(name) {
                Some(value) => Ok(value),
                None => {
                    self.bind(name);
                    Ok(self.read_bound(name).unwrap_or(Value::Null))
                }
            }
        }
    }
}

fn ensure_attribute_name(name: &str) -> InteropResult<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(InteropError::InvalidAttributeName(name.to_string()))
    }
}

/// A managed object whose properties are defined by use.
///
/// Attribute values live in a backing [`Instance`] (sigiled names), so the
/// literal enumerates through `object_keys` like any managed object. The
/// accessor table maps canonical names to their bound closure pairs.
///
/// Concurrent first accesses to the same name on the same literal race on
/// the bind-then-dispatch step; serializing them is the caller's
/// responsibility.
pub struct ObjectLiteral {
    object: Arc<Instance>,
    accessors: Mutex<HashMap<String, Accessor>>,
}

impl ObjectLiteral {
    /// Create a literal with no properties
    pub fn new() -> Self {
        ObjectLiteral {
            object: Arc::new(Instance::new("ObjectLiteral")),
            accessors: Mutex::new(HashMap::new()),
        }
    }

    /// The literal as a managed value. The value shares this literal's
    /// attribute storage, so keys written later are visible through it.
    pub fn as_value(&self) -> Value {
        Value::Instance(self.object.clone())
    }

    /// Indexed read, as driven by foreign read messages: the key is
    /// normalized (foreign strings converted) and forwarded to named
    /// dispatch.
    pub fn get(&self, runtime: &dyn ForeignRuntime, key: &Value) -> InteropResult<Value> {
        let name = to_foreign_key(runtime, key)?;
        self.send(&name, &[])
    }

    /// Indexed write, as driven by foreign write messages
    pub fn set(
        &self,
        runtime: &dyn ForeignRuntime,
        key: &Value,
        value: Value,
    ) -> InteropResult<Value> {
        let name = to_foreign_key(runtime, key)?;
        let (_, setter) = accessor_names(&name);
        self.send(&setter, &[value])
    }

    /// Whether an accessor pair is bound for `name`
    pub fn is_bound(&self, name: &str) -> bool {
        self.accessors.lock().contains_key(name)
    }
}

impl Default for ObjectLiteral {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver for ObjectLiteral {
    fn read_bound(&self, name: &str) -> Option<Value> {
        self.accessors.lock().get(name).map(|accessor| (accessor.get)())
    }

    fn write_bound(&self, name: &str, value: Value) -> bool {
        match self.accessors.lock().get(name) {
            Some(accessor) => {
                (accessor.set)(value);
                true
            }
            None => false,
        }
    }

    fn bind(&self, name: &str) {
        let mut accessors = self.accessors.lock();
        accessors.entry(name.to_string()).or_insert_with(|| {
            let ivar = format!("{SIGIL}{name}");
            let getter = {
                let object = self.object.clone();
                let ivar = ivar.clone();
                move || object.ivar(&ivar).unwrap_or(Value::Null)
            };
            let setter = {
                let object = self.object.clone();
                move |value: Value| object.set_ivar(ivar.clone(), value)
            };
            Accessor {
                get: Box::new(getter),
                set: Box::new(setter),
            }
        });
    }
}

/// Build a literal from field/value pairs.
///
/// Each pair routes through `set`, so seeded fields take exactly the same
/// auto-binding path as fields added later, in the order supplied.
pub fn object_literal(
    runtime: &dyn ForeignRuntime,
    fields: impl IntoIterator<Item = (Value, Value)>,
) -> InteropResult<ObjectLiteral> {
    let literal = ObjectLiteral::new();
    for (key, value) in fields {
        literal.set(runtime, &key, value)?;
    }
    Ok(literal)
}
