//! Tsuru core runtime types
//!
//! This crate provides the pieces shared by every layer of the bridge:
//! - Managed value model (`Value`, `Instance`)
//! - Opaque foreign references (`ForeignHandle`, `Key`)
//! - The capability seam over the foreign message protocol (`ForeignRuntime`)
//! - Error taxonomy (`InteropError`)

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod handle;
pub mod runtime;
pub mod value;

pub use error::{InteropError, InteropResult};
pub use handle::{ForeignHandle, Key};
pub use runtime::{ForeignRuntime, ManagedFn};
pub use value::{Instance, Value};
