//! Schema construction errors.
//!
//! Every variant here is a programmer error: a misconfigured spec fails at
//! construction time, before any sentence is parsed. User-facing problems
//! (unknown commands, type mismatches) never surface through this type —
//! they are delivered through the dispatcher's reply sink instead.

use thiserror::Error;

use crate::ValueKind;

/// Errors raised while building argument, flag, or command schemas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The spec was given an empty name.
    #[error("unnamed {0}: a non-empty name is required")]
    UnnamedOption(&'static str),

    /// An argument was declared with the boolean kind, which has no
    /// positional token form.
    #[error("argument \"{0}\": type must be string or number")]
    InvalidArgumentKind(String),

    /// A default value does not match the spec's declared kind.
    #[error("{kind} \"{name}\": default value is {provided}, expected {declared}")]
    DefaultKindMismatch {
        /// `"argument"` or `"flag"`.
        kind: &'static str,
        /// Name of the offending spec.
        name: String,
        /// Kind the spec was declared with.
        declared: ValueKind,
        /// Kind of the supplied default.
        provided: ValueKind,
    },

    /// A validation rule was attached without an error message.
    #[error("{kind} \"{name}\": validation rule is missing its error message")]
    EmptyValidationMessage {
        /// `"argument"` or `"flag"`.
        kind: &'static str,
        /// Name of the owning spec.
        name: String,
    },

    /// A command was registered with an empty name.
    #[error("unnamed command: a non-empty name is required")]
    EmptyCommandName,

    /// A command was registered without a description.
    #[error("command \"{0}\": no description provided")]
    MissingCommandDescription(String),
}
