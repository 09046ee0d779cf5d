//! Core value model and typed option schemas for the parley command
//! interpreter.
//!
//! This crate defines the pieces of a command's input contract:
//!
//! - [`Value`] / [`ValueKind`] — the runtime value model shared by the
//!   tokenizer, the coercion matrix, and bound argument vectors.
//! - [`coerce`] — the pure string/number/boolean conversion matrix, with
//!   [`Mismatch`] as its non-panicking failure value.
//! - [`ArgumentSpec`] — a positional input with required/default semantics.
//! - [`FlagSpec`] — a named input with an alias, a mandatory default, and a
//!   per-flag case-sensitivity policy.
//! - [`Validation`] — a predicate attached to either spec, self-tested at
//!   construction time.
//!
//! Schema construction is fail-fast: every invariant (non-empty names,
//! defaults matching their declared kind, argument kinds limited to string
//! and number) is checked when the spec is built and reported through
//! [`SchemaError`], never deferred to parse time.
//!
//! # Example
//!
//! ```
//! use parley_core::{ArgumentSpec, FlagSpec, Value, ValueKind};
//!
//! let arg = ArgumentSpec::required("city", "The city to look up", ValueKind::String)?;
//! assert!(arg.is_required());
//!
//! let flag = FlagSpec::new("limit", "Max results", ValueKind::Number, 10.0)?
//!     .with_alias('l')
//!     .with_validation("limit can't be higher than 50", |v| {
//!         !matches!(v, Value::Num(n) if *n > 50.0)
//!     })?;
//! assert_eq!(flag.alias(), Some('l'));
//! # Ok::<(), parley_core::SchemaError>(())
//! ```

mod error;
mod schema;
mod value;

pub use error::SchemaError;
pub use schema::{ArgumentSpec, FlagSpec, Validation};
pub use value::{Mismatch, Value, ValueKind, coerce};
