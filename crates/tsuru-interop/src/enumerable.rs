//! Foreign values as lazy, restartable sequences
//!
//! Anything the foreign side reports a size for can be iterated with nothing
//! but "produce size" + "read at index". The size is read fresh from the
//! foreign side at the start of every pass and on every `size` call — never
//! cached — so a foreign collection that changes length between passes is
//! observed consistently per call, not snapshot.

use tsuru_core::{ForeignHandle, ForeignRuntime, InteropResult, Key, Value};

/// A lazy, restartable view over one foreign value.
///
/// The adapter owns nothing: it is a disposable view pairing a runtime with
/// a handle. Re-iterating yields the same sequence as long as the foreign
/// side has not changed.
pub struct ForeignEnumerable<'a> {
    runtime: &'a dyn ForeignRuntime,
    foreign: ForeignHandle,
}

impl<'a> ForeignEnumerable<'a> {
    /// Wrap a foreign value
    pub fn new(runtime: &'a dyn ForeignRuntime, foreign: ForeignHandle) -> Self {
        ForeignEnumerable { runtime, foreign }
    }

    /// The wrapped handle
    pub fn foreign(&self) -> ForeignHandle {
        self.foreign
    }

    /// Current element count, queried from the foreign side on every call.
    /// `NotSizable` propagates if the value has no size semantics.
    pub fn size(&self) -> InteropResult<usize> {
        self.runtime.size(self.foreign)
    }

    /// Begin a pass over the elements in ascending index order.
    ///
    /// The length of the pass is fixed by one fresh `size` query here; a
    /// failing query fails the whole pass rather than yielding an empty one.
    pub fn iter(&self) -> InteropResult<Elements<'a>> {
        let len = self.size()?;
        Ok(Elements {
            runtime: self.runtime,
            foreign: self.foreign,
            next: 0,
            len,
        })
    }

    /// Collect one full pass
    pub fn to_vec(&self) -> InteropResult<Vec<Value>> {
        self.iter()?.collect()
    }
}

/// Wrap a foreign value as an enumerable view
pub fn enumerable<'a>(
    runtime: &'a dyn ForeignRuntime,
    foreign: ForeignHandle,
) -> ForeignEnumerable<'a> {
    ForeignEnumerable::new(runtime, foreign)
}

/// One pass over a foreign value's elements.
///
/// Yields `read(handle, i)` for `0 <= i < len`; a failing read surfaces as
/// an `Err` element and iteration continues with the next index.
pub struct Elements<'a> {
    runtime: &'a dyn ForeignRuntime,
    foreign: ForeignHandle,
    next: usize,
    len: usize,
}

impl Iterator for Elements<'_> {
    type Item = InteropResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.runtime.read(self.foreign, &Key::Index(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Elements<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use tsuru_core::InteropError;
    use tsuru_testkit::FakeRuntime;

    #[test]
    fn test_elements_in_ascending_order() {
        let world = FakeRuntime::new();
        let list = world.list(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);

        let view = enumerable(&world, list);
        assert_eq!(view.size().unwrap(), 3);
        assert_eq!(
            view.to_vec().unwrap(),
            vec![Value::Int(10), Value::Int(20), Value::Int(30)]
        );
    }

    #[test]
    fn test_empty_sequence_is_not_a_failure() {
        let world = FakeRuntime::new();
        let list = world.list(vec![]);

        let view = enumerable(&world, list);
        assert_eq!(view.size().unwrap(), 0);
        assert_eq!(view.to_vec().unwrap(), vec![]);
    }

    #[test]
    fn test_restartable() {
        let world = FakeRuntime::new();
        let list = world.list(vec![Value::Int(1), Value::Int(2)]);

        let view = enumerable(&world, list);
        let first: Vec<Value> = view.iter().unwrap().map(Result::unwrap).collect();
        let second: Vec<Value> = view.iter().unwrap().map(Result::unwrap).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_not_sizable_propagates() {
        let world = FakeRuntime::new();
        let record = world.record(&[("a", Value::Int(1))]);

        let view = enumerable(&world, record);
        assert!(matches!(view.size(), Err(InteropError::NotSizable(_))));
        assert!(matches!(view.iter(), Err(InteropError::NotSizable(_))));
    }

    #[test]
    fn test_standard_adapters_compose() {
        let world = FakeRuntime::new();
        let list = world.list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let total: i64 = enumerable(&world, list)
            .iter()
            .unwrap()
            .filter_map(|item| match item {
                Ok(Value::Int(n)) if n % 2 == 1 => Some(n),
                _ => None,
            })
            .sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_size_not_cached_between_passes() {
        let world = FakeRuntime::new();
        let list = world.list(vec![Value::Int(1)]);

        let view = enumerable(&world, list);
        assert_eq!(view.to_vec().unwrap().len(), 1);

        world.push(list, Value::Int(2));
        assert_eq!(view.size().unwrap(), 2);
        assert_eq!(view.to_vec().unwrap().len(), 2);
    }
}
