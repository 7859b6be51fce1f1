//! Attribute-name normalization and shape extraction

use tsuru_core::{ForeignRuntime, InteropResult, Value};

/// Leading marker on managed instance-attribute names
pub const SIGIL: char = '@';

/// External form of a managed attribute name: remove exactly one leading
/// sigil if present. Applied once per name, never recursively — `"@@count"`
/// strips to `"@count"`.
pub fn strip_sigil(name: &str) -> &str {
    name.strip_prefix(SIGIL).unwrap_or(name)
}

/// The getter/setter selector pair for an attribute name: the getter is the
/// name verbatim, the setter carries the trailing assignment marker.
pub fn accessor_names(name: &str) -> (String, String) {
    (name.to_string(), format!("{name}="))
}

/// Normalize a managed key to the foreign string form: foreign strings are
/// converted through the runtime, anything else uses its literal textual
/// form.
pub fn to_foreign_key(runtime: &dyn ForeignRuntime, key: &Value) -> InteropResult<String> {
    if runtime.is_foreign_string(key) {
        runtime.to_managed_string(key)
    } else {
        Ok(key.text())
    }
}

/// The externally visible property names of a managed value.
///
/// Associative structures contribute their keys; instances contribute their
/// attribute names with the sigil stripped. Everything else has no keys.
/// Shallow — nested values are not visited. The result is used as a set;
/// order carries no meaning.
pub fn object_keys(value: &Value) -> Vec<String> {
    match value {
        Value::Map(pairs) => pairs.iter().map(|(key, _)| key.clone()).collect(),
        Value::Instance(obj) => obj
            .ivar_names()
            .iter()
            .map(|name| strip_sigil(name).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tsuru_core::Instance;
    use tsuru_testkit::FakeRuntime;

    #[test]
    fn test_strip_sigil_once() {
        assert_eq!(strip_sigil("@test"), "test");
        assert_eq!(strip_sigil("test"), "test");
        assert_eq!(strip_sigil("@@count"), "@count");
        assert_eq!(strip_sigil(""), "");
    }

    #[test]
    fn test_accessor_names() {
        let (getter, setter) = accessor_names("width");
        assert_eq!(getter, "width");
        assert_eq!(setter, "width=");
    }

    #[test]
    fn test_to_foreign_key_converts_foreign_strings() {
        let world = FakeRuntime::new();
        let s = world.text("field");
        assert_eq!(
            to_foreign_key(&world, &Value::Foreign(s)).unwrap(),
            "field"
        );
    }

    #[test]
    fn test_to_foreign_key_textual_fallback() {
        let world = FakeRuntime::new();
        assert_eq!(
            to_foreign_key(&world, &Value::Symbol("name".to_string())).unwrap(),
            "name"
        );
        assert_eq!(
            to_foreign_key(&world, &Value::Str("name".to_string())).unwrap(),
            "name"
        );
        assert_eq!(to_foreign_key(&world, &Value::Int(3)).unwrap(), "3");
    }

    #[test]
    fn test_object_keys_of_plain_values_is_empty() {
        assert!(object_keys(&Value::Null).is_empty());
        assert!(object_keys(&Value::Int(42)).is_empty());
        assert!(object_keys(&Value::Str("s".to_string())).is_empty());
        assert!(object_keys(&Value::Array(vec![Value::Int(1)])).is_empty());
    }

    #[test]
    fn test_object_keys_of_map() {
        let map = Value::Map(vec![
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::Int(2)),
        ]);
        assert_eq!(object_keys(&map), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_object_keys_of_instance_strips_sigils() {
        let obj = Arc::new(Instance::new("Widget"));
        assert!(object_keys(&Value::Instance(obj.clone())).is_empty());

        obj.set_ivar("@width", Value::Int(10));
        let mut found = object_keys(&Value::Instance(obj.clone()));
        assert_eq!(found, vec!["width".to_string()]);

        obj.set_ivar("@height", Value::Int(20));
        found = object_keys(&Value::Instance(obj));
        found.sort();
        assert_eq!(found, vec!["height".to_string(), "width".to_string()]);
    }
}
