//! Managed value model

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::handle::ForeignHandle;

/// A value native to the managed runtime.
///
/// Everything the bridge moves across the boundary is one of these. Foreign
/// values appear as the opaque `Foreign` variant and are only interpreted
/// through a `ForeignRuntime`.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Managed string
    Str(String),
    /// Interned symbolic name
    Symbol(String),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Associative structure (string keys, insertion order preserved)
    Map(Vec<(String, Value)>),
    /// Heap object with named instance attributes
    Instance(Arc<Instance>),
    /// A value owned by the foreign environment
    Foreign(ForeignHandle),
}

impl Value {
    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the string contents if this is a managed string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the handle if this is a foreign value
    pub fn as_foreign(&self) -> Option<ForeignHandle> {
        match self {
            Value::Foreign(handle) => Some(*handle),
            _ => None,
        }
    }

    /// The literal textual form of the value.
    ///
    /// This is a display form, not a round-trippable encoding. It is what
    /// key normalization falls back to for non-string keys.
    pub fn text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Symbol(name) => name.clone(),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::text).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(pairs) => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.text()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Instance(obj) => format!("#<{}>", obj.class_name()),
            Value::Foreign(handle) => format!("#<{handle}>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Instances compare by identity, not structure
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            (Value::Foreign(a), Value::Foreign(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Heap object with named instance attributes.
///
/// Attribute names carry the managed runtime's `@` sigil (`"@x"`); the
/// sigil-less external form is produced by the bridge's key normalizer.
/// Identity is the allocation: clones of the same `Arc` are the same object.
pub struct Instance {
    class_name: String,
    ivars: Mutex<HashMap<String, Value>>,
}

impl Instance {
    /// Create an instance with no attributes
    pub fn new(class_name: impl Into<String>) -> Self {
        Instance {
            class_name: class_name.into(),
            ivars: Mutex::new(HashMap::new()),
        }
    }

    /// Name of the managed class this object belongs to
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Read an attribute by sigiled name
    pub fn ivar(&self, name: &str) -> Option<Value> {
        self.ivars.lock().get(name).cloned()
    }

    /// Set an attribute by sigiled name
    pub fn set_ivar(&self, name: impl Into<String>, value: Value) {
        self.ivars.lock().insert(name.into(), value);
    }

    /// Names of all attributes currently set, sigil included
    pub fn ivar_names(&self) -> Vec<String> {
        self.ivars.lock().keys().cloned().collect()
    }

    /// Number of attributes currently set
    pub fn ivar_count(&self) -> usize {
        self.ivars.lock().len()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class_name", &self.class_name)
            .field("ivars", &*self.ivars.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_ne!(Value::Int(42), Value::Int(43));
        assert_ne!(Value::Int(42), Value::Float(42.0));
        assert_eq!(Value::Str("a".to_string()), Value::Str("a".to_string()));
        assert_ne!(Value::Str("a".to_string()), Value::Symbol("a".to_string()));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_instance_identity_equality() {
        let a = Arc::new(Instance::new("Point"));
        let b = Arc::new(Instance::new("Point"));
        assert_eq!(Value::Instance(a.clone()), Value::Instance(a.clone()));
        assert_ne!(Value::Instance(a), Value::Instance(b));
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(Value::Null.text(), "");
        assert_eq!(Value::Int(7).text(), "7");
        assert_eq!(Value::Symbol("name".to_string()).text(), "name");
        assert_eq!(Value::Str("hi".to_string()).text(), "hi");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::Int(2)]).text(),
            "[1, 2]"
        );
    }

    #[test]
    fn test_instance_ivars() {
        let obj = Instance::new("Widget");
        assert_eq!(obj.ivar("@x"), None);
        obj.set_ivar("@x", Value::Int(10));
        assert_eq!(obj.ivar("@x"), Some(Value::Int(10)));
        obj.set_ivar("@x", Value::Int(20));
        assert_eq!(obj.ivar("@x"), Some(Value::Int(20)));
        assert_eq!(obj.ivar_count(), 1);
        assert_eq!(obj.ivar_names(), vec!["@x".to_string()]);
    }

    #[test]
    fn test_as_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(false).is_null());
        assert_eq!(Value::Str("s".to_string()).as_str(), Some("s"));
        assert_eq!(Value::Int(1).as_str(), None);
        let handle = ForeignHandle::from_raw(5);
        assert_eq!(Value::Foreign(handle).as_foreign(), Some(handle));
        assert_eq!(Value::Null.as_foreign(), None);
    }
}
