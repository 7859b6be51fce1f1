//! Tsuru foreign-object interoperability bridge
//!
//! Lets the managed runtime transparently call into, enumerate, and
//! construct values owned by a foreign environment that only speaks a small
//! uniform message protocol (read, write, invoke, size). The pieces:
//! - Key normalization and shape extraction (`keys`)
//! - Dynamic object literals with lazily bound accessors (`literal`)
//! - Foreign values as lazy, restartable sequences (`enumerable`)
//! - Importing foreign callables and exporting managed methods (`methods`)
//!
//! Everything routes its primitive operations through the
//! [`ForeignRuntime`](tsuru_core::ForeignRuntime) capability seam; the bridge
//! holds no connection to any concrete host.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod enumerable;
pub mod keys;
pub mod literal;
pub mod methods;

pub use enumerable::{enumerable, Elements, ForeignEnumerable};
pub use keys::{accessor_names, object_keys, strip_sigil, to_foreign_key, SIGIL};
pub use literal::{object_literal, ObjectLiteral, Receiver};
pub use methods::{
    export_method, foreign_array, global_methods, import_method, lookup_symbol, responds_to,
    to_array, MethodTable,
};
