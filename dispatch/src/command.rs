//! Command registry entries and the two handler protocols.
//!
//! A [`Command`] bundles a name, a description, ordered argument and flag
//! schemas, and a handler. Handlers come in two explicit variants rather
//! than being sniffed at call time:
//!
//! - the preferred protocol ([`Command::new`]) returns a
//!   [`HandlerResult`]: either an immediate [`HandlerReply`] or a deferred
//!   future the dispatcher awaits;
//! - the legacy callback protocol ([`Command::with_callback`]) receives a
//!   completion callback limited to at most one reply, and triggers a
//!   deprecation warning on every invocation unless suppressed.

use std::collections::BTreeMap;
use std::fmt;

use futures::future::BoxFuture;
use serde::Serialize;

use parley_core::{ArgumentSpec, FlagSpec, SchemaError, Value};

/// The bound input vector a handler receives: every declared argument and
/// flag, keyed by name, fully coerced and validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Argv {
    /// Bound positional arguments.
    pub args: BTreeMap<String, Value>,
    /// Bound flags.
    pub flags: BTreeMap<String, Value>,
}

impl Argv {
    /// Looks up a bound argument by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Looks up a bound flag by name.
    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }
}

/// Error type carried by a failed deferred handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler wants sent back through the reply sink.
pub enum HandlerReply<C> {
    /// Send nothing.
    Silent,
    /// Reply with this message and the context the parse was called with.
    Message(String),
    /// Reply with this message and a replacement context.
    MessageWith(String, C),
}

impl<C> fmt::Debug for HandlerReply<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerReply::Silent => f.write_str("Silent"),
            HandlerReply::Message(m) => f.debug_tuple("Message").field(m).finish(),
            HandlerReply::MessageWith(m, _) => {
                f.debug_tuple("MessageWith").field(m).field(&"..").finish()
            }
        }
    }
}

/// The return value of a preferred-protocol handler.
///
/// `Ready` resolves synchronously. `Deferred` is the one suspension point
/// in the dispatch pipeline: the dispatcher awaits the future and routes
/// its reply (or, on failure, an internal-error message) afterwards.
pub enum HandlerResult<C: 'static> {
    /// An immediately available reply.
    Ready(HandlerReply<C>),
    /// A reply that becomes available later.
    Deferred(BoxFuture<'static, Result<HandlerReply<C>, HandlerError>>),
}

impl<C: 'static> HandlerResult<C> {
    /// No reply.
    pub fn silent() -> Self {
        HandlerResult::Ready(HandlerReply::Silent)
    }

    /// An immediate reply with the original context.
    pub fn message(text: impl Into<String>) -> Self {
        HandlerResult::Ready(HandlerReply::Message(text.into()))
    }

    /// An immediate reply with a replacement context.
    pub fn message_with(text: impl Into<String>, context: C) -> Self {
        HandlerResult::Ready(HandlerReply::MessageWith(text.into(), context))
    }

    /// A deferred reply.
    pub fn deferred(
        future: impl Future<Output = Result<HandlerReply<C>, HandlerError>> + Send + 'static,
    ) -> Self {
        HandlerResult::Deferred(Box::pin(future))
    }
}

/// The completion callback handed to a legacy handler. The dispatcher
/// guarantees at most one reply no matter how often it is called; `None`
/// for the context keeps the original.
pub type CompletionFn<'a, C> = &'a mut dyn FnMut(String, Option<C>);

pub(crate) enum Handler<C: 'static> {
    /// Preferred protocol: return a [`HandlerResult`].
    Fn(Box<dyn Fn(Argv, C) -> HandlerResult<C> + Send + Sync>),
    /// Legacy protocol: call the completion callback.
    Callback(Box<dyn for<'a> Fn(Argv, C, CompletionFn<'a, C>) + Send + Sync>),
}

/// A registered command: name, description, typed inputs, and a handler.
///
/// # Examples
///
/// ```
/// use parley_core::{ArgumentSpec, FlagSpec, ValueKind};
/// use parley_dispatch::{Command, HandlerResult};
///
/// let foo: Command<()> = Command::new("foo", "does foo things", |argv, _ctx| {
///     HandlerResult::message(format!("hello, {}", argv.args["name"]))
/// })?
/// .arg(ArgumentSpec::required("name", "Who to greet", ValueKind::String)?)
/// .flag(FlagSpec::new("shout", "Greet loudly", ValueKind::Boolean, false)?);
///
/// assert_eq!(foo.name(), "foo");
/// # Ok::<(), parley_core::SchemaError>(())
/// ```
pub struct Command<C: 'static> {
    name: String,
    description: String,
    handler: Handler<C>,
    args: Vec<ArgumentSpec>,
    flags: Vec<FlagSpec>,
    case_sensitive: bool,
    suppress_deprecation_warnings: bool,
}

impl<C: 'static> Command<C> {
    /// Creates a command with a preferred-protocol handler.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(Argv, C) -> HandlerResult<C> + Send + Sync + 'static,
    ) -> Result<Self, SchemaError> {
        Self::build(name, description, Handler::Fn(Box::new(handler)))
    }

    /// Creates a command with a legacy callback-protocol handler.
    ///
    /// Deprecated path: each invocation emits a `tracing` warning unless
    /// [`suppress_deprecation_warnings`](Command::suppress_deprecation_warnings)
    /// is set.
    pub fn with_callback(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl for<'a> Fn(Argv, C, CompletionFn<'a, C>) + Send + Sync + 'static,
    ) -> Result<Self, SchemaError> {
        Self::build(name, description, Handler::Callback(Box::new(handler)))
    }

    fn build(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Handler<C>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyCommandName);
        }
        let description = description.into();
        if description.is_empty() {
            return Err(SchemaError::MissingCommandDescription(name));
        }
        Ok(Self {
            name,
            description,
            handler,
            args: Vec::new(),
            flags: Vec::new(),
            case_sensitive: true,
            suppress_deprecation_warnings: false,
        })
    }

    /// Adds a positional argument. Re-adding a name replaces the earlier
    /// spec in place, keeping its position.
    pub fn arg(mut self, spec: ArgumentSpec) -> Self {
        match self.args.iter_mut().find(|a| a.name() == spec.name()) {
            Some(slot) => *slot = spec,
            None => self.args.push(spec),
        }
        self
    }

    /// Adds a flag. Re-adding a name replaces the earlier spec in place.
    pub fn flag(mut self, spec: FlagSpec) -> Self {
        match self.flags.iter_mut().find(|f| f.name() == spec.name()) {
            Some(slot) => *slot = spec,
            None => self.flags.push(spec),
        }
        self
    }

    /// Makes the command name match case-insensitively.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Silences the legacy-protocol deprecation warning for this command.
    pub fn suppress_deprecation_warnings(mut self) -> Self {
        self.suppress_deprecation_warnings = true;
        self
    }

    /// The command's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command's description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared arguments, in declaration order.
    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    /// Declared flags, in declaration order.
    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Whether the first positional token resolves to this command.
    pub(crate) fn matches(&self, token: &str) -> bool {
        if self.case_sensitive {
            self.name == token
        } else {
            self.name.to_lowercase() == token.to_lowercase()
        }
    }

    pub(crate) fn handler(&self) -> &Handler<C> {
        &self.handler
    }

    pub(crate) fn warns_on_legacy_use(&self) -> bool {
        !self.suppress_deprecation_warnings
    }
}

impl<C: 'static> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .field("case_sensitive", &self.case_sensitive)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use parley_core::ValueKind;

    use super::*;

    fn noop(name: &str) -> Command<()> {
        Command::new(name, "a test command", |_, _| HandlerResult::silent()).unwrap()
    }

    #[test]
    fn test_rejects_empty_name_and_description() {
        let err = Command::<()>::new("", "desc", |_, _| HandlerResult::silent()).unwrap_err();
        assert_eq!(err, SchemaError::EmptyCommandName);

        let err = Command::<()>::new("foo", "", |_, _| HandlerResult::silent()).unwrap_err();
        assert_eq!(err, SchemaError::MissingCommandDescription("foo".into()));
    }

    #[test]
    fn test_duplicate_arg_name_replaces_in_place() {
        let cmd = noop("foo")
            .arg(ArgumentSpec::required("a", "first", ValueKind::String).unwrap())
            .arg(ArgumentSpec::required("b", "second", ValueKind::String).unwrap())
            .arg(ArgumentSpec::required("a", "replacement", ValueKind::Number).unwrap());

        assert_eq!(cmd.args().len(), 2);
        assert_eq!(cmd.args()[0].name(), "a");
        assert_eq!(cmd.args()[0].kind(), ValueKind::Number);
        assert_eq!(cmd.args()[1].name(), "b");
    }

    #[test]
    fn test_case_insensitive_matching() {
        let cmd = noop("Foo").case_insensitive();
        assert!(cmd.matches("foo"));
        assert!(cmd.matches("FOO"));

        let strict = noop("Foo");
        assert!(!strict.matches("foo"));
        assert!(strict.matches("Foo"));
    }
}
