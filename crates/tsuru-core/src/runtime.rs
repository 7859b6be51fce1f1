//! ForeignRuntime trait — the capability seam over the foreign protocol
//!
//! Defines the interface a host environment implements. The bridge programs
//! against this trait and never against host internals, so a fake
//! implementation can stand in for the real host under test.

use std::sync::Arc;

use crate::error::InteropResult;
use crate::handle::{ForeignHandle, Key};
use crate::value::Value;

/// A managed callable as the foreign side sees it.
///
/// This is the unit the method bridge registers, exports, and invokes;
/// `Arc` so one binding can live in a registry and on the foreign side at
/// the same time.
pub type ManagedFn = Arc<dyn Fn(&[Value]) -> InteropResult<Value> + Send + Sync>;

/// Abstract foreign environment for bridge operations.
///
/// Every bridge component routes its primitive operations through this
/// trait, consumed as `&dyn ForeignRuntime` (or `Arc<dyn ForeignRuntime>`
/// where a binding must outlive the call). All operations are synchronous:
/// each either returns or fails; a foreign call that never returns blocks
/// the calling chain, which is the foreign environment's contract to honor.
pub trait ForeignRuntime: Send + Sync {
    // ========================================================================
    // Value transport
    // ========================================================================

    /// Read the current value at `key`. Fails if the key is unreadable.
    fn read(&self, handle: ForeignHandle, key: &Key) -> InteropResult<Value>;

    /// Set the value at `key`.
    fn write(&self, handle: ForeignHandle, key: &Key, value: Value) -> InteropResult<()>;

    /// Call a foreign callable and return the foreign result.
    fn invoke(&self, callable: ForeignHandle, args: &[Value]) -> InteropResult<Value>;

    /// Number of elements of the value, or `NotSizable` if the value has no
    /// size semantics.
    fn size(&self, handle: ForeignHandle) -> InteropResult<usize>;

    /// Whether the value reports a size.
    fn has_size(&self, handle: ForeignHandle) -> bool {
        self.size(handle).is_ok()
    }

    // ========================================================================
    // String coercion
    // ========================================================================

    /// Whether `value` is a foreign string representation.
    fn is_foreign_string(&self, value: &Value) -> bool;

    /// Convert a value to a managed string. For foreign strings this is the
    /// string's contents; for anything else the implementation chooses a
    /// textual form.
    fn to_managed_string(&self, value: &Value) -> InteropResult<String>;

    // ========================================================================
    // Naming
    // ========================================================================

    /// Look up a process-visible foreign callable or constant by name.
    fn resolve_symbol(&self, name: &str) -> Option<ForeignHandle>;

    /// Register a managed callable under a foreign-visible name so foreign
    /// code can invoke it.
    fn export_symbol(&self, name: &str, callable: ManagedFn) -> InteropResult<()>;

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Materialize a managed slice as a foreign array.
    fn create_array(&self, items: &[Value]) -> InteropResult<ForeignHandle>;
}
