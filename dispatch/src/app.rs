//! The dispatcher: sentence recognition, command resolution, value
//! binding, and reply routing.
//!
//! An [`App`] owns the command table, the reply sink, and the
//! prefix/separator/case-sensitivity configuration. [`App::parse`] runs the
//! whole pipeline for one sentence and emits at most one reply through the
//! sink (plus, for the legacy callback protocol, at most one callback-driven
//! reply). Nothing is cached between calls; every parse recomputes
//! resolution from the current command table.
//!
//! Error discipline: a sentence that does not belong to this app is a
//! programmer error and comes back as [`DispatchError::NotACliSentence`].
//! Everything a *user* can get wrong — unknown command, missing required
//! arguments, type mismatches, failed validations — is never an `Err`; it
//! is delivered through the reply sink as a formatted message, with all
//! field errors collected before the single reply.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, error, warn};

use parley_core::{ArgumentSpec, FlagSpec, Validation, Value, ValueKind, coerce};

use crate::command::{Argv, Command, Handler, HandlerReply, HandlerResult};
use crate::help;
use crate::strings::Strings;
use crate::tokenize::{ParsedSentence, tokenize};

/// Precondition failures of [`App::parse`]. These indicate a bug in the
/// embedding application, never a user mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The input does not begin with the app prefix. Gate calls with
    /// [`App::is_cli_sentence`].
    #[error(
        "attempted to parse the input {0:?}, but it is not a CLI sentence \
         (it doesn't begin with the app prefix)"
    )]
    NotACliSentence(String),
}

/// A command-line app embedded in a host application.
///
/// The host supplies the reply sink and calls [`App::parse`] for each
/// sentence that [`App::is_cli_sentence`] recognizes.
///
/// # Examples
///
/// ```
/// use parley_dispatch::{App, Command, HandlerResult};
///
/// let mut app: App<()> = App::new(
///     "Test App",
///     "An example app",
///     "/testapp",
///     |msg, _ctx| println!("{msg}"),
/// )
/// .with_version("1.2.0");
///
/// app.add_command(
///     Command::new("foo", "does foo things", |_argv, _ctx| {
///         HandlerResult::message("foo was executed")
///     })
///     .unwrap(),
/// );
///
/// assert!(app.is_cli_sentence("/testapp foo"));
/// assert!(!app.is_cli_sentence("Hello, world!"));
/// ```
pub struct App<C: 'static> {
    name: String,
    description: String,
    prefix: String,
    separator: String,
    case_sensitive: bool,
    version: Option<String>,
    strings: Strings,
    reply: Box<dyn Fn(&str, &C) + Send + Sync>,
    commands: BTreeMap<String, Command<C>>,
}

impl<C: 'static> App<C> {
    /// Creates an app with the default separator (`" "`), case-sensitive
    /// matching, and the English string table.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prefix: impl Into<String>,
        on_reply: impl Fn(&str, &C) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prefix: prefix.into(),
            separator: " ".into(),
            case_sensitive: true,
            version: None,
            strings: Strings::default(),
            reply: Box::new(on_reply),
            commands: BTreeMap::new(),
        }
    }

    /// Sets the version reported by `--version`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the prefix/sentence separator. An empty separator allows
    /// sentences like `/command` where `/` is the prefix.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Makes sentence recognition case-insensitive.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Replaces the reply string table (see [`Strings`] for partial
    /// overrides).
    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.strings = strings;
        self
    }

    /// Registers a command, builder-style.
    pub fn with_command(mut self, command: Command<C>) -> Self {
        self.add_command(command);
        self
    }

    /// Registers a command. Re-registering a name overwrites the earlier
    /// entry; no duplicate error is raised.
    pub fn add_command(&mut self, command: Command<C>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// The app's name, shown in the app help.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The app's description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The recognized sentence prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The prefix/sentence separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The version reported by `--version`, if configured.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The active reply string table.
    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    /// Registered commands, in table order.
    pub fn commands(&self) -> impl Iterator<Item = &Command<C>> {
        self.commands.values()
    }

    /// Whether `input` is a CLI sentence for this app: the prefix alone,
    /// or anything whose leading substring is `prefix + separator`, folded
    /// when the app is case-insensitive.
    ///
    /// A CLI sentence is not necessarily *valid* — it merely belongs to
    /// this app. Callers must gate [`App::parse`] with this check.
    pub fn is_cli_sentence(&self, input: &str) -> bool {
        let boundary_len = self.prefix.len() + self.separator.len();
        self.fold_eq(input, &self.prefix)
            || matches!(
                input.get(..boundary_len),
                Some(head) if self.fold_eq(
                    head,
                    &format!("{}{}", self.prefix, self.separator),
                )
            )
    }

    fn fold_eq(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    /// The sentence with the recognized `prefix + separator` boundary
    /// stripped. A bare-prefix sentence is returned unchanged; resolution
    /// then falls through to the app help.
    fn strip_boundary<'a>(&self, input: &'a str) -> &'a str {
        let boundary_len = self.prefix.len() + self.separator.len();
        match input.get(..boundary_len) {
            Some(head)
                if self.fold_eq(head, &format!("{}{}", self.prefix, self.separator)) =>
            {
                &input[boundary_len..]
            }
            _ => input,
        }
    }

    /// Whether the raw input is exactly the prefix, or the prefix plus
    /// separator, under the app's case policy.
    fn is_bare_prefix(&self, input: &str) -> bool {
        self.fold_eq(input, &self.prefix)
            || self.fold_eq(input, &format!("{}{}", self.prefix, self.separator))
    }

    fn send(&self, message: &str, context: &C) {
        (self.reply)(message, context);
    }

    fn route_reply(&self, reply: HandlerReply<C>, context: &C) {
        match reply {
            HandlerReply::Silent => {}
            HandlerReply::Message(text) => self.send(&text, context),
            HandlerReply::MessageWith(text, new_context) => self.send(&text, &new_context),
        }
    }
}

impl<C: Clone + Send + 'static> App<C> {
    /// Parses one CLI sentence and performs the matching action: executes
    /// the resolved command, replies with help or version text, or replies
    /// with a user-error message. Emits at most one reply through the sink
    /// per call.
    ///
    /// The input is not sanitized; that is the host's responsibility.
    /// Calling this on an input that fails [`App::is_cli_sentence`] is a
    /// programmer error and returns [`DispatchError::NotACliSentence`].
    ///
    /// The only suspension point is awaiting a deferred handler reply;
    /// every other path completes synchronously.
    pub async fn parse(&self, input: &str, context: C) -> Result<(), DispatchError> {
        if !self.is_cli_sentence(input) {
            return Err(DispatchError::NotACliSentence(input.to_string()));
        }

        let parsed = tokenize(self.strip_boundary(input));
        let requested = parsed.command_token();

        // Linear scan in table order; among case-variant collisions the
        // first folded match wins, deterministically.
        let command = self.commands.values().find(|c| c.matches(&requested));

        let Some(command) = command else {
            self.reply_unresolved(input, &requested, &parsed, &context);
            return Ok(());
        };
        debug!(command = command.name(), "resolved command");

        if parsed.wants_help() {
            self.send(&help::command_help(self, command), &context);
            return Ok(());
        }

        let missing: Vec<&str> = command
            .args()
            .iter()
            .enumerate()
            .filter(|(i, arg)| arg.is_required() && parsed.positional.get(i + 1).is_none())
            .map(|(_, arg)| arg.name())
            .collect();
        if !missing.is_empty() {
            self.reply_unfulfilled(command, &missing, &context);
            return Ok(());
        }

        let mut argv = Argv::default();
        let mut errors: Vec<String> = Vec::new();

        // Arguments bind strictly before flags.
        for (i, spec) in command.args().iter().enumerate() {
            let Some(raw) = resolve_argument_value(spec, &parsed, i) else {
                // Required args were checked above; optional args always
                // carry a default.
                continue;
            };
            bind_field(
                "argument",
                spec.name(),
                raw,
                spec.kind(),
                spec.validations(),
                &mut argv.args,
                &mut errors,
            );
        }

        for spec in command.flags() {
            let raw = resolve_flag_value(spec, &parsed.flags);
            bind_field(
                "flag",
                spec.name(),
                raw,
                spec.kind(),
                spec.validations(),
                &mut argv.flags,
                &mut errors,
            );
        }

        if !errors.is_empty() {
            let mut msg = format!("{}{}\n\n", self.strings.err, self.strings.err_type_mismatch);
            for error in &errors {
                msg.push_str(error);
                msg.push('\n');
            }
            self.send(&msg, &context);
            return Ok(());
        }

        self.invoke(command, argv, context).await;
        Ok(())
    }

    async fn invoke(&self, command: &Command<C>, argv: Argv, context: C) {
        match command.handler() {
            Handler::Fn(handler) => match handler(argv, context.clone()) {
                HandlerResult::Ready(reply) => {
                    self.route_reply(reply, &context);
                }
                HandlerResult::Deferred(future) => match future.await {
                    Ok(reply) => self.route_reply(reply, &context),
                    Err(failure) => {
                        error!(
                            command = command.name(),
                            error = %failure,
                            "command handler failed"
                        );
                        self.send(
                            &self
                                .strings
                                .err_internal_error
                                .replace("%CMD%", command.name()),
                            &context,
                        );
                    }
                },
            },
            Handler::Callback(handler) => {
                let mut replied = false;
                {
                    let sink = &self.reply;
                    let original = &context;
                    let mut complete = |message: String, new_context: Option<C>| {
                        if replied {
                            return;
                        }
                        replied = true;
                        match &new_context {
                            Some(ctx) => sink(&message, ctx),
                            None => sink(&message, original),
                        }
                    };
                    handler(argv, context.clone(), &mut complete);
                }
                if command.warns_on_legacy_use() {
                    warn!(
                        command = command.name(),
                        "callback-style command handlers are deprecated; \
                         return a HandlerResult instead"
                    );
                }
            }
        }
    }

    fn reply_unresolved(
        &self,
        input: &str,
        requested: &str,
        parsed: &ParsedSentence,
        context: &C,
    ) {
        if parsed.wants_help() || self.is_bare_prefix(input) {
            self.send(&help::app_help(self), context);
        } else if parsed.wants_version() && self.version.is_some() {
            let version = self.version.as_deref().unwrap_or_default();
            self.send(&format!("v{version}"), context);
        } else {
            let msg = format!(
                "{}{} {}",
                self.strings.err,
                self.strings.err_unknown_command.replace("%CMD%", requested),
                self.strings.err_type_help.replace("%PREFIX%", &self.prefix),
            );
            self.send(&msg, context);
        }
    }

    fn reply_unfulfilled(&self, command: &Command<C>, missing: &[&str], context: &C) {
        let mut msg = format!("{}{}\n", self.strings.err, self.strings.err_unfulfilled_args);
        for name in missing {
            msg.push_str(name);
            msg.push('\n');
        }
        msg.push('\n');
        msg.push_str(&self.strings.err_type_help.replace(
            "%PREFIX%",
            &format!("{} {}", self.prefix, command.name()),
        ));
        self.send(&msg, context);
    }
}

impl<C: 'static> fmt::Debug for App<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("separator", &self.separator)
            .field("case_sensitive", &self.case_sensitive)
            .field("version", &self.version)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// The raw value for an argument: the positional token at its slot
/// (offset by one for the command name), else the declared default for
/// optional arguments. Required arguments never consult their default.
fn resolve_argument_value(
    spec: &ArgumentSpec,
    parsed: &ParsedSentence,
    index: usize,
) -> Option<Value> {
    let supplied = parsed.positional.get(index + 1).cloned();
    if spec.is_required() {
        supplied
    } else {
        supplied.or_else(|| spec.default_value().cloned())
    }
}

/// The raw value for a flag: alias key first (always case-sensitive),
/// then the flag name — exact, or a full scan with folded comparison when
/// the flag is case-insensitive — then the default.
///
/// The folded lookup is a linear scan with first-match-wins semantics.
/// When two supplied keys fold to the same name, which one wins is not a
/// contract; it is merely deterministic for a given map order.
fn resolve_flag_value(spec: &FlagSpec, flags: &BTreeMap<String, Value>) -> Value {
    if let Some(alias) = spec.alias() {
        if let Some(value) = flags.get(&alias.to_string()) {
            return value.clone();
        }
    }

    if spec.is_case_sensitive() {
        if let Some(value) = flags.get(spec.name()) {
            return value.clone();
        }
    } else {
        let folded = spec.name().to_lowercase();
        for (key, value) in flags {
            if key.to_lowercase() == folded {
                return value.clone();
            }
        }
    }

    spec.default_value().clone()
}

/// Coerces and validates one field, accumulating error lines. A coercion
/// failure records a mismatch and skips the field's validations; a
/// coercion success runs every rule, appending each failure independently.
fn bind_field(
    label: &str,
    name: &str,
    raw: Value,
    target: ValueKind,
    validations: &[Validation],
    out: &mut BTreeMap<String, Value>,
    errors: &mut Vec<String>,
) {
    match coerce(raw, target) {
        Err(mismatch) => {
            errors.push(format!(
                "Error on {label} {name}: expected {}, got {} instead.",
                mismatch.expected, mismatch.provided,
            ));
        }
        Ok(value) => {
            for rule in validations {
                if !rule.check(&value) {
                    errors.push(format!("Error on {label} {name}: {}", rule.message()));
                }
            }
            out.insert(name.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App<()> {
        App::new("Test App", "A test app", "/app", |_, _| {})
    }

    #[test]
    fn test_recognizes_prefix_and_boundary() {
        let app = app();
        assert!(app.is_cli_sentence("/app"));
        assert!(app.is_cli_sentence("/app foo"));
        assert!(app.is_cli_sentence("/app anything at all"));
        assert!(!app.is_cli_sentence("/apps foo"));
        assert!(!app.is_cli_sentence("Hello, world!"));
        assert!(!app.is_cli_sentence(""));
    }

    #[test]
    fn test_recognition_respects_case_policy() {
        let strict = app();
        assert!(!strict.is_cli_sentence("/APP foo"));

        let folded = App::<()>::new("Test App", "A test app", "/app", |_, _| {})
            .case_insensitive();
        assert!(folded.is_cli_sentence("/APP foo"));
        assert!(folded.is_cli_sentence("/App"));
    }

    #[test]
    fn test_empty_separator_sentences() {
        let app = App::<()>::new("Test App", "A test app", "/", |_, _| {})
            .with_separator("");
        assert!(app.is_cli_sentence("/command"));
        assert!(app.is_cli_sentence("/"));
        assert!(!app.is_cli_sentence("command"));
        assert_eq!(app.strip_boundary("/command"), "command");
    }

    #[test]
    fn test_strip_boundary_leaves_bare_prefix() {
        let app = app();
        assert_eq!(app.strip_boundary("/app foo bar"), "foo bar");
        assert_eq!(app.strip_boundary("/app"), "/app");
    }

    #[test]
    fn test_fold_collided_flag_lookup_is_deterministic() {
        let spec = FlagSpec::new("limit", "desc", ValueKind::Number, 10.0)
            .unwrap()
            .case_insensitive();

        let mut flags = BTreeMap::new();
        flags.insert("LIMIT".to_string(), Value::Num(1.0));
        flags.insert("Limit".to_string(), Value::Num(2.0));

        // Exactly one of the colliding keys is chosen, and the choice is
        // stable across calls. Which one wins is not part of the contract.
        let first = resolve_flag_value(&spec, &flags);
        let second = resolve_flag_value(&spec, &flags);
        assert_eq!(first, second);
        assert!(first == Value::Num(1.0) || first == Value::Num(2.0));
    }
}
