//! Built-in field rule engine
//!
//! Rules are declared per field as pipe-separated rule strings:
//!
//! ```
//! use replyx_core::validation::{RuleEngine, RuleSet, CustomMessages, Validator, ValidationOutcome};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("name", "required|string|min:2")
//!     .field("age", "integer|min:18");
//!
//! let violations = RuleEngine.check(&json!({"name": "", "age": 12}), &rules, &CustomMessages::new());
//! assert_eq!(
//!     violations.messages(),
//!     vec!["The name field is required.", "The age field must be at least 18."]
//! );
//! ```
//!
//! A missing or empty value is only checked by `required`; every other rule
//! is skipped for it. Unknown rules are ignored.

use serde_json::Value;
use std::collections::HashMap;

use super::{ValidationOutcome, Validator};

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    String,
    Integer,
    Numeric,
    Boolean,
    Array,
    Email,
    Min(f64),
    Max(f64),
    In(Vec<String>),
}

impl Rule {
    /// Parse one rule (`"min:3"`); `None` for unknown or malformed rules
    pub fn parse(definition: &str) -> Option<Self> {
        let (name, param) = match definition.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (definition.trim(), None),
        };
        let rule = match (name, param) {
            ("required", _) => Rule::Required,
            ("string", _) => Rule::String,
            ("integer", _) => Rule::Integer,
            ("numeric", _) => Rule::Numeric,
            ("boolean", _) => Rule::Boolean,
            ("array", _) => Rule::Array,
            ("email", _) => Rule::Email,
            ("min", Some(n)) => Rule::Min(n.parse().ok()?),
            ("max", Some(n)) => Rule::Max(n.parse().ok()?),
            ("in", Some(list)) => Rule::In(list.split(',').map(|v| v.trim().to_string()).collect()),
            _ => return None,
        };
        Some(rule)
    }

    /// Name used for custom message keys
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::String => "string",
            Rule::Integer => "integer",
            Rule::Numeric => "numeric",
            Rule::Boolean => "boolean",
            Rule::Array => "array",
            Rule::Email => "email",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::In(_) => "in",
        }
    }
}

/// Ordered field -> rules declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare rules for a field (`"required|string|max:255"`)
    pub fn field(mut self, name: impl Into<String>, definition: &str) -> Self {
        let rules = definition.split('|').filter_map(Rule::parse).collect();
        self.fields.push((name.into(), rules));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RuleSet::new(), |set, (field, rules)| set.field(field, rules.as_ref()))
    }
}

/// Message overrides keyed `field.rule` or `rule`
///
/// `:attribute`, `:min`, `:max` and `:values` are substituted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomMessages(HashMap<String, String>);

impl CustomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.0.insert(key.into(), message.into());
        self
    }

    fn lookup(&self, field: &str, rule: &str) -> Option<&str> {
        self.0
            .get(&format!("{}.{}", field, rule))
            .or_else(|| self.0.get(rule))
            .map(String::as_str)
    }
}

/// Violations found by an engine, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: String) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl ValidationOutcome for Violations {
    fn failed(&self) -> bool {
        !self.messages.is_empty()
    }

    fn messages(&self) -> Vec<String> {
        self.messages.clone()
    }
}

/// The built-in engine
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl Validator for RuleEngine {
    fn check(&self, input: &Value, rules: &RuleSet, custom: &CustomMessages) -> Violations {
        let mut violations = Violations::default();
        for (field, field_rules) in rules.fields() {
            let value = lookup(input, field);
            let numeric = field_rules
                .iter()
                .any(|r| matches!(r, Rule::Integer | Rule::Numeric));

            for rule in field_rules {
                if is_empty(value) && *rule != Rule::Required {
                    continue;
                }
                if let Some(failure) = evaluate(rule, value, numeric) {
                    violations.push(message(field, rule, failure, custom));
                }
            }
        }
        violations
    }
}

/// Which default phrasing a failed rule uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Plain,
    Numeric,
    Characters,
    Items,
}

/// Dotted paths descend into nested objects
fn lookup<'a>(input: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(input, |value, segment| value.as_object()?.get(segment))
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

fn evaluate(rule: &Rule, value: Option<&Value>, numeric: bool) -> Option<Failure> {
    let passes = match (rule, value) {
        (Rule::Required, v) => !is_empty(v),
        (_, None) => true,
        (Rule::String, Some(v)) => v.is_string(),
        (Rule::Integer, Some(v)) => as_integer(v).is_some(),
        (Rule::Numeric, Some(v)) => as_number(v).is_some(),
        (Rule::Boolean, Some(v)) => is_boolean(v),
        (Rule::Array, Some(v)) => v.is_array() || v.is_object(),
        (Rule::Email, Some(v)) => v.as_str().is_some_and(is_email),
        (Rule::In(allowed), Some(v)) => scalar_text(v).is_some_and(|t| allowed.contains(&t)),
        (Rule::Min(bound), Some(v)) => {
            return size(v, numeric).and_then(|(n, kind)| (n < *bound).then_some(kind));
        }
        (Rule::Max(bound), Some(v)) => {
            return size(v, numeric).and_then(|(n, kind)| (n > *bound).then_some(kind));
        }
    };
    (!passes).then_some(Failure::Plain)
}

/// Size of a value as compared by `min`/`max`
fn size(value: &Value, numeric: bool) -> Option<(f64, Failure)> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| (n, Failure::Numeric)),
        Value::String(s) if numeric => s.trim().parse().ok().map(|n| (n, Failure::Numeric)),
        Value::String(s) => Some((s.chars().count() as f64, Failure::Characters)),
        Value::Array(a) => Some((a.len() as f64, Failure::Items)),
        Value::Object(o) => Some((o.len() as f64, Failure::Items)),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => n.as_i64().is_some_and(|n| n == 0 || n == 1),
        Value::String(s) => matches!(s.as_str(), "0" | "1"),
        _ => false,
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

fn message(field: &str, rule: &Rule, failure: Failure, custom: &CustomMessages) -> String {
    let template = match custom.lookup(field, rule.name()) {
        Some(custom) => custom.to_string(),
        None => default_template(rule, failure).to_string(),
    };
    let attribute = field.replace('_', " ");
    let mut text = template.replace(":attribute", &attribute);
    match rule {
        Rule::Min(n) => text = text.replace(":min", &format_bound(*n)),
        Rule::Max(n) => text = text.replace(":max", &format_bound(*n)),
        Rule::In(values) => text = text.replace(":values", &values.join(", ")),
        _ => {}
    }
    text
}

fn default_template(rule: &Rule, failure: Failure) -> &'static str {
    match (rule, failure) {
        (Rule::Required, _) => "The :attribute field is required.",
        (Rule::String, _) => "The :attribute field must be a string.",
        (Rule::Integer, _) => "The :attribute field must be an integer.",
        (Rule::Numeric, _) => "The :attribute field must be a number.",
        (Rule::Boolean, _) => "The :attribute field must be true or false.",
        (Rule::Array, _) => "The :attribute field must be an array.",
        (Rule::Email, _) => "The :attribute field must be a valid email address.",
        (Rule::In(_), _) => "The selected :attribute is invalid.",
        (Rule::Min(_), Failure::Characters) => {
            "The :attribute field must be at least :min characters."
        }
        (Rule::Min(_), Failure::Items) => "The :attribute field must have at least :min items.",
        (Rule::Min(_), _) => "The :attribute field must be at least :min.",
        (Rule::Max(_), Failure::Characters) => {
            "The :attribute field must not be greater than :max characters."
        }
        (Rule::Max(_), Failure::Items) => "The :attribute field must not have more than :max items.",
        (Rule::Max(_), _) => "The :attribute field must not be greater than :max.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(input: Value, rules: RuleSet) -> Vec<String> {
        RuleEngine
            .check(&input, &rules, &CustomMessages::new())
            .messages()
    }

    #[test]
    fn test_required_on_empty_string() {
        let messages = check(json!({"name": ""}), RuleSet::new().field("name", "required"));
        assert_eq!(messages, vec!["The name field is required."]);
    }

    #[test]
    fn test_required_on_missing_and_whitespace() {
        let rules = RuleSet::new().field("first_name", "required");
        assert_eq!(check(json!({}), rules.clone()), vec!["The first name field is required."]);
        assert_eq!(check(json!({"first_name": "  "}), rules).len(), 1);
    }

    #[test]
    fn test_empty_value_skips_other_rules() {
        let rules = RuleSet::new().field("name", "required|string|min:3");
        assert_eq!(check(json!({"name": ""}), rules), vec!["The name field is required."]);

        let optional = RuleSet::new().field("nickname", "string|min:3");
        assert!(check(json!({}), optional).is_empty());
    }

    #[test]
    fn test_order_follows_fields_then_rules() {
        let rules = RuleSet::new()
            .field("email", "required|email")
            .field("age", "integer|max:120");
        let messages = check(json!({"email": "nope", "age": 130}), rules);
        assert_eq!(
            messages,
            vec![
                "The email field must be a valid email address.",
                "The age field must not be greater than 120."
            ]
        );
    }

    #[test]
    fn test_size_phrasing_by_type() {
        let rules = RuleSet::new()
            .field("title", "string|min:5")
            .field("tags", "array|max:1")
            .field("price", "numeric|min:0.5");
        let messages = check(json!({"title": "abc", "tags": ["a", "b"], "price": "0.1"}), rules);
        assert_eq!(
            messages,
            vec![
                "The title field must be at least 5 characters.",
                "The tags field must not have more than 1 items.",
                "The price field must be at least 0.5."
            ]
        );
    }

    #[test]
    fn test_type_rules() {
        let rules = RuleSet::new()
            .field("a", "integer")
            .field("b", "numeric")
            .field("c", "boolean")
            .field("d", "string");
        assert!(check(json!({"a": "12", "b": 1.5, "c": "1", "d": "x"}), rules.clone()).is_empty());
        assert_eq!(check(json!({"a": 1.5, "b": "x", "c": "yes", "d": 3}), rules).len(), 4);
    }

    #[test]
    fn test_in_rule() {
        let rules = RuleSet::new().field("status", "in:active,blocked");
        assert!(check(json!({"status": "active"}), rules.clone()).is_empty());
        assert_eq!(
            check(json!({"status": "deleted"}), rules),
            vec!["The selected status is invalid."]
        );
    }

    #[test]
    fn test_nested_field_lookup() {
        let rules = RuleSet::new().field("user.email", "required|email");
        assert!(check(json!({"user": {"email": "a@b.io"}}), rules.clone()).is_empty());
        assert_eq!(
            check(json!({"user": {}}), rules),
            vec!["The user.email field is required."]
        );
    }

    #[test]
    fn test_custom_messages() {
        let custom = CustomMessages::new()
            .with("name.required", "Tell us your :attribute")
            .with("min", ":attribute needs :min+");
        let rules = RuleSet::new()
            .field("name", "required")
            .field("bio", "min:10");
        let messages = RuleEngine
            .check(&json!({"bio": "short"}), &rules, &custom)
            .messages();
        assert_eq!(messages, vec!["Tell us your name", "bio needs 10+"]);
    }

    #[test]
    fn test_unknown_and_malformed_rules_ignored() {
        let rules = RuleSet::new().field("x", "required|uuid|min:abc");
        assert!(check(json!({"x": "value"}), rules).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let rules = RuleSet::new().field("a", "required").field("a", "required");
        assert_eq!(check(json!({}), rules).len(), 2);
    }

    #[test]
    fn test_rule_set_from_iterator() {
        let rules: RuleSet = vec![("name", "required"), ("age", "integer")].into_iter().collect();
        assert_eq!(rules.fields().count(), 2);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b.io"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.io"));
        assert!(!is_email("a b@c.io"));
        assert!(!is_email("a@b@c.io"));
    }
}
