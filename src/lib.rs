//! Loads a native shared library at run time and calls its exports through
//! typed bindings.
//!
//! ```no_run
//! use native_invoker::{Bindings, Library, Operation};
//!
//! let library = Library::load("native_lib")?;
//! {
//!     let bindings = unsafe { Bindings::bind(&library)? };
//!     bindings.say_hello();
//!     assert_eq!(bindings.compute_op(3.0, 4.0, Operation::Multiply), 12.0);
//! }
//! library.close()?;
//! # Ok::<(), native_invoker::InvokerError>(())
//! ```
pub mod bindings;
pub mod error;
pub mod kind;
pub mod load;
pub mod signatures;
mod type_utils;

pub use bindings::{Bindings, Operation};
pub use error::InvokerError;
pub use kind::{NativeKind, ValueKind};
pub use load::{Function, Library};
pub use signatures::{SignatureFile, SymbolSignature};
pub use type_utils::Signature;
