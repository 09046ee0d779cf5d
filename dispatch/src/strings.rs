//! Localized string table for user-facing replies.
//!
//! A flat key→template table with `%CMD%` and `%PREFIX%` placeholders. The
//! defaults are English; a host can override any subset per app instance.
//! Because every field carries `#[serde(default)]`, a partial JSON document
//! deserializes with the missing keys at their defaults — a shallow merge
//! over the English table.
//!
//! # Examples
//!
//! ```
//! use parley_dispatch::Strings;
//!
//! let custom: Strings =
//!     serde_json::from_str(r#"{ "err": "Fehler: " }"#).unwrap();
//! assert_eq!(custom.err, "Fehler: ");
//! // Unmentioned keys keep their defaults.
//! assert_eq!(custom.err_unknown_command, Strings::default().err_unknown_command);
//! ```

use serde::{Deserialize, Serialize};

/// The reply string table. Field names mirror the table keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    /// Usage-line lead-in.
    pub help_usage: String,
    /// Placeholder shown where a command name goes in the app usage line.
    pub help_command: String,
    /// Heading for the app help command list.
    pub help_cmd_list: String,
    /// Lead-in for the "type --help" pointer in the app help.
    pub help_further_help: String,
    /// Heading for a command's argument table.
    pub help_av_args: String,
    /// Heading for a command's flag table.
    pub help_av_options: String,
    /// Legend explaining the `(required)` / `[optional]` bracketing.
    pub help_args_required_optional: String,
    /// Prefix for every user-error reply.
    pub err: String,
    /// Reply for a failed handler. `%CMD%` is the command name.
    pub err_internal_error: String,
    /// Reply body for an unresolvable command. `%CMD%` is the attempt.
    pub err_unknown_command: String,
    /// Reply body introducing the missing-required-arguments list.
    pub err_unfulfilled_args: String,
    /// Reply body introducing the collected coercion/validation errors.
    pub err_type_mismatch: String,
    /// Help pointer appended to error replies. `%PREFIX%` is the app
    /// prefix (optionally followed by the command name).
    pub err_type_help: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            help_usage: "Usage: ".into(),
            help_command: "(command)".into(),
            help_cmd_list: "Here's a list of commands:".into(),
            help_further_help: "To get further help on a command, type: ".into(),
            help_av_args: "Available arguments".into(),
            help_av_options: "Available options".into(),
            help_args_required_optional: "Arguments in (parenthesis) are required, \
                                          arguments in [brackets] are optional"
                .into(),
            err: "Error: ".into(),
            err_internal_error: "An internal error occurred while trying to execute \
                                 the command %CMD%."
                .into(),
            err_unknown_command: "unknown command %CMD%.".into(),
            err_unfulfilled_args: "not every required argument was fulfilled. \
                                   Missing arguments:"
                .into(),
            err_type_mismatch: "your command couldn't be executed for the following \
                                reasons:"
                .into(),
            err_type_help: "Type %PREFIX% --help for help.".into(),
        }
    }
}
