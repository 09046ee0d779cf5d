//! Sentence tokenizer: shell-style splitting plus minimist-style argv
//! building.
//!
//! The dispatcher hands this module the sentence with the recognized
//! prefix+separator already stripped. The output is a positional token
//! sequence plus a flag map with values already type-inferred:
//!
//! - bare tokens become positionals; numeric-looking ones become numbers,
//! - `--name` becomes a boolean `true` flag,
//! - `--name=value` and `--name value` carry the inferred value,
//! - `-x` is a short flag; grouped `-abc` sets each letter, with only the
//!   last able to take a value,
//! - `--` ends flag parsing; everything after it is positional,
//! - single and double quotes group whitespace, with `\` escaping the
//!   active quote character.
//!
//! The tokenizer knows nothing about the registered schemas. `help` and
//! `version` are ordinary flags here; the dispatcher reads them as markers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use parley_core::Value;

/// Matches tokens that should be inferred as numbers.
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d*)?(e-?\d+)?$").expect("numeric pattern"));

/// The tokenized form of a sentence: positional tokens plus a flag map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSentence {
    /// Positional tokens in order. Slot 0 is the command name.
    pub positional: Vec<Value>,
    /// Flag name (or alias letter) → inferred value.
    pub flags: BTreeMap<String, Value>,
}

impl ParsedSentence {
    /// Whether the sentence carries a truthy `help` marker.
    pub fn wants_help(&self) -> bool {
        self.flags.get("help").is_some_and(Value::is_truthy)
    }

    /// Whether the sentence carries a truthy `version` marker.
    pub fn wants_version(&self) -> bool {
        self.flags.get("version").is_some_and(Value::is_truthy)
    }

    /// The first positional token rendered as text, or `""` if the
    /// sentence had none. Used for command resolution.
    pub fn command_token(&self) -> String {
        self.positional
            .first()
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

/// Tokenizes a sentence (prefix already stripped) into positionals and
/// flags.
///
/// # Examples
///
/// ```
/// use parley_core::Value;
/// use parley_dispatch::tokenize::tokenize;
///
/// let parsed = tokenize("foo hello -t --limit=15");
/// assert_eq!(parsed.positional, vec![Value::from("foo"), Value::from("hello")]);
/// assert_eq!(parsed.flags.get("t"), Some(&Value::Bool(true)));
/// assert_eq!(parsed.flags.get("limit"), Some(&Value::Num(15.0)));
/// ```
pub fn tokenize(sentence: &str) -> ParsedSentence {
    let tokens = split_tokens(sentence);
    let mut out = ParsedSentence::default();

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();

        if token == "--" {
            for rest in &tokens[i + 1..] {
                out.positional.push(infer(rest));
            }
            break;
        }

        if let Some(body) = token.strip_prefix("--") {
            if let Some((name, value)) = body.split_once('=') {
                out.flags.insert(name.to_string(), infer(value));
            } else if next_is_value(&tokens, i) {
                out.flags.insert(body.to_string(), infer(&tokens[i + 1]));
                i += 1;
            } else {
                out.flags.insert(body.to_string(), Value::Bool(true));
            }
        } else if token.len() > 1 && token.starts_with('-') && !NUMERIC.is_match(token) {
            let body = &token[1..];
            let (letters, inline) = match body.split_once('=') {
                Some((letters, value)) => (letters, Some(value)),
                None => (body, None),
            };
            let chars: Vec<char> = letters.chars().collect();
            for (pos, ch) in chars.iter().enumerate() {
                let last = pos + 1 == chars.len();
                match inline {
                    Some(value) if last => {
                        out.flags.insert(ch.to_string(), infer(value));
                    }
                    None if last && next_is_value(&tokens, i) => {
                        out.flags.insert(ch.to_string(), infer(&tokens[i + 1]));
                        i += 1;
                    }
                    _ => {
                        out.flags.insert(ch.to_string(), Value::Bool(true));
                    }
                }
            }
        } else {
            out.positional.push(infer(token));
        }

        i += 1;
    }

    out
}

/// Whether the token after position `i` can serve as a flag value: any
/// non-flag token, or a negative number.
fn next_is_value(tokens: &[String], i: usize) -> bool {
    tokens
        .get(i + 1)
        .is_some_and(|t| !t.starts_with('-') || NUMERIC.is_match(t))
}

fn infer(token: &str) -> Value {
    if NUMERIC.is_match(token) {
        if let Ok(n) = token.parse::<f64>() {
            return Value::Num(n);
        }
    }
    Value::Str(token.to_string())
}

/// Splits on whitespace, honoring quotes. Quote characters are stripped;
/// an empty quoted token is preserved.
fn split_tokens(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    let mut chars = sentence.chars().peekable();
    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                if ch == '\\' && chars.peek() == Some(&q) {
                    current.push(chars.next().unwrap_or(q));
                } else if ch == q {
                    quote = None;
                } else {
                    current.push(ch);
                }
            }
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_and_boolean_flags() {
        let parsed = tokenize("foo hello -t");
        assert_eq!(
            parsed.positional,
            vec![Value::from("foo"), Value::from("hello")]
        );
        assert_eq!(parsed.flags.get("t"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_numeric_inference() {
        let parsed = tokenize("foo 42 3.5 -7");
        assert_eq!(
            parsed.positional,
            vec![
                Value::from("foo"),
                Value::Num(42.0),
                Value::Num(3.5),
                Value::Num(-7.0),
            ]
        );
    }

    #[test]
    fn test_long_flag_value_forms() {
        let equals = tokenize("foo --limit=15");
        assert_eq!(equals.flags.get("limit"), Some(&Value::Num(15.0)));

        let spaced = tokenize("foo --limit 15");
        assert_eq!(spaced.flags.get("limit"), Some(&Value::Num(15.0)));
        assert_eq!(spaced.positional.len(), 1);

        let bare = tokenize("foo --verbose");
        assert_eq!(bare.flags.get("verbose"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_short_flag_takes_following_value() {
        let parsed = tokenize("foo -l 15");
        assert_eq!(parsed.flags.get("l"), Some(&Value::Num(15.0)));
    }

    #[test]
    fn test_grouped_short_flags() {
        let parsed = tokenize("foo -abc");
        assert_eq!(parsed.flags.get("a"), Some(&Value::Bool(true)));
        assert_eq!(parsed.flags.get("b"), Some(&Value::Bool(true)));
        assert_eq!(parsed.flags.get("c"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_double_dash_ends_flag_parsing() {
        let parsed = tokenize("foo -- --not-a-flag");
        assert!(parsed.flags.is_empty());
        assert_eq!(parsed.positional[1], Value::from("--not-a-flag"));
    }

    #[test]
    fn test_quoted_tokens_keep_whitespace() {
        let parsed = tokenize("say \"hello there\" --tone='very calm'");
        assert_eq!(parsed.positional[1], Value::from("hello there"));
        assert_eq!(parsed.flags.get("tone"), Some(&Value::from("very calm")));
    }

    #[test]
    fn test_flag_value_strings_are_not_booleans_yet() {
        // Coercion, not tokenization, is what turns "true" into a boolean.
        let parsed = tokenize("foo --testflag=notaboolean --other=true");
        assert_eq!(
            parsed.flags.get("testflag"),
            Some(&Value::from("notaboolean"))
        );
        assert_eq!(parsed.flags.get("other"), Some(&Value::from("true")));
    }

    #[test]
    fn test_help_and_version_markers() {
        assert!(tokenize("--help").wants_help());
        assert!(tokenize("foo --help").wants_help());
        assert!(tokenize("--version").wants_version());
        assert!(!tokenize("foo").wants_help());
    }
}
