//! Typed option schemas: positional arguments and named flags.
//!
//! Both spec types embed the same validated set of shared fields (name,
//! description, declared kind, validation rules) and add their own
//! semantics on top: arguments are positional with required/default
//! resolution, flags are named with aliases and a mandatory default. There
//! is no trait object in the middle — the dispatcher knows exactly which of
//! the two it is binding.

use std::fmt;

use crate::error::SchemaError;
use crate::value::{Value, ValueKind};

/// A validation rule: an error message plus a predicate over the coerced
/// value.
///
/// Rules run only after a successful coercion, in attachment order, and
/// never short-circuit: every failing rule contributes its message to the
/// reply independently.
pub struct Validation {
    message: String,
    predicate: Box<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Validation {
    /// Creates a rule from a message and a predicate.
    pub fn new(
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }

    /// The message reported when the rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Runs the predicate against a value.
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// The canonical self-test input for each declared kind.
fn sentinel(kind: ValueKind) -> Value {
    match kind {
        ValueKind::String => Value::from("the interpreter is testing your validation rule"),
        ValueKind::Number => Value::Num(123456.0),
        ValueKind::Boolean => Value::Bool(true),
    }
}

/// Fields shared by [`ArgumentSpec`] and [`FlagSpec`].
#[derive(Debug)]
struct OptionSpec {
    name: String,
    description: String,
    kind: ValueKind,
    validations: Vec<Validation>,
}

impl OptionSpec {
    fn new(
        label: &'static str,
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ValueKind,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::UnnamedOption(label));
        }
        Ok(Self {
            name,
            description: description.into(),
            kind,
            validations: Vec::new(),
        })
    }

    fn attach(
        &mut self,
        label: &'static str,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<(), SchemaError> {
        let rule = Validation::new(message, predicate);
        if rule.message().is_empty() {
            return Err(SchemaError::EmptyValidationMessage {
                kind: label,
                name: self.name.clone(),
            });
        }
        // Exercise the rule once against the kind-appropriate sentinel so a
        // rule that can't handle its declared kind fails at registration,
        // not on the first user sentence.
        let _ = rule.check(&sentinel(self.kind));
        self.validations.push(rule);
        Ok(())
    }

    fn check_default(
        &self,
        label: &'static str,
        default: &Value,
    ) -> Result<(), SchemaError> {
        if default.kind() != self.kind {
            return Err(SchemaError::DefaultKindMismatch {
                kind: label,
                name: self.name.clone(),
                declared: self.kind,
                provided: default.kind(),
            });
        }
        Ok(())
    }
}

/// A positional argument bound to a command by declaration order.
///
/// Arguments are `string` or `number` only — there is no natural positional
/// token form for a boolean. An optional argument always carries a default,
/// enforced by [`optional`](ArgumentSpec::optional) taking the default by
/// signature.
///
/// # Examples
///
/// ```
/// use parley_core::{ArgumentSpec, ValueKind};
///
/// let file = ArgumentSpec::optional(
///     "file",
///     "The file where the data will be saved",
///     ValueKind::String,
///     "defaultfile.dat",
/// )?;
/// assert!(!file.is_required());
/// # Ok::<(), parley_core::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct ArgumentSpec {
    base: OptionSpec,
    required: bool,
    default: Option<Value>,
}

impl ArgumentSpec {
    /// Creates a required argument.
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ValueKind,
    ) -> Result<Self, SchemaError> {
        let base = OptionSpec::new("argument", name, description, kind)?;
        if kind == ValueKind::Boolean {
            return Err(SchemaError::InvalidArgumentKind(base.name));
        }
        Ok(Self {
            base,
            required: true,
            default: None,
        })
    }

    /// Creates an optional argument with a default value of matching kind.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ValueKind,
        default: impl Into<Value>,
    ) -> Result<Self, SchemaError> {
        let mut spec = Self::required(name, description, kind)?;
        let default = default.into();
        spec.base.check_default("argument", &default)?;
        spec.required = false;
        spec.default = Some(default);
        Ok(spec)
    }

    /// Attaches a default to a required argument.
    ///
    /// Required wins: the default is stored but never consulted at binding
    /// time, because a missing required argument stops the parse before
    /// defaults are resolved. Kept for compatibility with schemas that
    /// declare both.
    pub fn with_default(mut self, default: impl Into<Value>) -> Result<Self, SchemaError> {
        let default = default.into();
        self.base.check_default("argument", &default)?;
        self.default = Some(default);
        Ok(self)
    }

    /// Attaches a validation rule, self-testing it immediately.
    pub fn with_validation(
        mut self,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<Self, SchemaError> {
        self.base.attach("argument", message, predicate)?;
        Ok(self)
    }

    /// The argument's name.
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// The argument's description, used for help rendering.
    pub fn description(&self) -> &str {
        &self.base.description
    }

    /// The declared value kind.
    pub fn kind(&self) -> ValueKind {
        self.base.kind
    }

    /// Whether the argument must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The default value, if one was declared.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The attached validation rules, in attachment order.
    pub fn validations(&self) -> &[Validation] {
        &self.base.validations
    }
}

/// A named flag with an optional single-character alias.
///
/// Flags are never required — absence always resolves to the default, which
/// is why the default is taken by [`new`](FlagSpec::new) rather than being
/// optional. The alias is a [`char`], so the one-character invariant holds
/// by construction. Alias matching is always case-sensitive, regardless of
/// the flag's own [`case_insensitive`](FlagSpec::case_insensitive) setting.
///
/// # Examples
///
/// ```
/// use parley_core::{FlagSpec, ValueKind};
///
/// let flag = FlagSpec::new("debug", "Enable debug output", ValueKind::Boolean, false)?
///     .with_alias('d');
/// assert_eq!(flag.alias(), Some('d'));
/// assert!(flag.is_case_sensitive());
/// # Ok::<(), parley_core::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct FlagSpec {
    base: OptionSpec,
    alias: Option<char>,
    default: Value,
    case_sensitive: bool,
}

impl FlagSpec {
    /// Creates a flag with a mandatory default of matching kind.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ValueKind,
        default: impl Into<Value>,
    ) -> Result<Self, SchemaError> {
        let base = OptionSpec::new("flag", name, description, kind)?;
        let default = default.into();
        base.check_default("flag", &default)?;
        Ok(Self {
            base,
            alias: None,
            default,
            case_sensitive: true,
        })
    }

    /// Sets the single-character alias (e.g. `-d` for `--debug`).
    pub fn with_alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Makes name matching case-insensitive. Alias matching is unaffected.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Attaches a validation rule, self-testing it immediately.
    pub fn with_validation(
        mut self,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Result<Self, SchemaError> {
        self.base.attach("flag", message, predicate)?;
        Ok(self)
    }

    /// The flag's name.
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// The flag's description, used for help rendering.
    pub fn description(&self) -> &str {
        &self.base.description
    }

    /// The declared value kind.
    pub fn kind(&self) -> ValueKind {
        self.base.kind
    }

    /// The alias, if one was declared.
    pub fn alias(&self) -> Option<char> {
        self.alias
    }

    /// The default value used when the flag is absent.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Whether name matching is case-sensitive.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// The attached validation rules, in attachment order.
    pub fn validations(&self) -> &[Validation] {
        &self.base.validations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_rejects_empty_name() {
        let err = ArgumentSpec::required("", "desc", ValueKind::String).unwrap_err();
        assert_eq!(err, SchemaError::UnnamedOption("argument"));
    }

    #[test]
    fn test_argument_rejects_boolean_kind() {
        let err = ArgumentSpec::required("toggle", "desc", ValueKind::Boolean).unwrap_err();
        assert_eq!(err, SchemaError::InvalidArgumentKind("toggle".to_string()));
    }

    #[test]
    fn test_optional_argument_checks_default_kind() {
        let err =
            ArgumentSpec::optional("count", "desc", ValueKind::Number, "ten").unwrap_err();
        assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));

        let ok = ArgumentSpec::optional("count", "desc", ValueKind::Number, 10.0).unwrap();
        assert_eq!(ok.default_value(), Some(&Value::Num(10.0)));
    }

    #[test]
    fn test_required_argument_may_carry_an_unused_default() {
        let arg = ArgumentSpec::required("city", "desc", ValueKind::String)
            .unwrap()
            .with_default("nowhere")
            .unwrap();
        assert!(arg.is_required());
        assert_eq!(arg.default_value(), Some(&Value::from("nowhere")));
    }

    #[test]
    fn test_flag_requires_matching_default() {
        let err = FlagSpec::new("limit", "desc", ValueKind::Number, true).unwrap_err();
        assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));

        let flag = FlagSpec::new("limit", "desc", ValueKind::Number, 10.0).unwrap();
        assert_eq!(flag.default_value(), &Value::Num(10.0));
    }

    #[test]
    fn test_validation_rejects_empty_message() {
        let err = FlagSpec::new("limit", "desc", ValueKind::Number, 10.0)
            .unwrap()
            .with_validation("", |_| true)
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyValidationMessage { .. }));
    }

    #[test]
    fn test_validation_runs_in_attachment_order() {
        let flag = FlagSpec::new("limit", "desc", ValueKind::Number, 10.0)
            .unwrap()
            .with_validation("must be positive", |v| {
                matches!(v, Value::Num(n) if *n >= 0.0)
            })
            .unwrap()
            .with_validation("must be at most 50", |v| {
                matches!(v, Value::Num(n) if *n <= 50.0)
            })
            .unwrap();

        let rules = flag.validations();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].message(), "must be positive");
        assert!(!rules[1].check(&Value::Num(99.0)));
    }
}
