//! Validation engine
//!
//! Walks a [`SchemaNode`] tree in parallel with a raw input tree and produces
//! either a fully defaulted output tree or every violation found.
//!
//! # Rules
//! - An absent value takes its node's default and is not re-validated.
//!   Objects without an explicit default build one from their fields, so a
//!   required leaf under an absent object is still reported.
//! - Unknown object keys are carried through verbatim unless
//!   `allow_unknown` is off.
//! - All violations are collected unless `abort_early` is on.
//! - Numeric strings are accepted for number nodes and `"true"`/`"false"`
//!   for boolean nodes; the converted value is what the output holds.

mod error;

pub use error::{Constraint, PathSegment, ValidationError, ValidationErrors};

use crate::schema::{
    ArrayNode, DefaultValue, NumberNode, ObjectNode, SchemaNode, StringNode,
};
use serde_json::{Map, Number, Value};

/// Knobs for a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Stop at the first violation
    pub abort_early: bool,
    /// Keep undeclared object keys instead of reporting them
    pub allow_unknown: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            abort_early: false,
            allow_unknown: true,
        }
    }
}

/// Validate `input` against `schema`, returning the defaulted tree or every violation
pub fn validate(
    schema: &SchemaNode,
    input: &Value,
    options: &ValidationOptions,
) -> Result<Value, ValidationErrors> {
    let mut validator = Validator::new(options);
    let output = validator.visit(schema, Some(input));

    if validator.errors.is_empty() {
        tracing::debug!("Validation passed");
        Ok(output.unwrap_or(Value::Null))
    } else {
        tracing::debug!("Validation found {} error(s)", validator.errors.len());
        Err(ValidationErrors::new(validator.errors))
    }
}

struct Validator<'o> {
    options: &'o ValidationOptions,
    path: Vec<PathSegment>,
    errors: Vec<ValidationError>,
}

impl<'o> Validator<'o> {
    fn new(options: &'o ValidationOptions) -> Self {
        Self {
            options,
            path: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn halted(&self) -> bool {
        self.options.abort_early && !self.errors.is_empty()
    }

    fn label(&self) -> String {
        if self.path.is_empty() {
            "\"value\"".to_string()
        } else {
            format!("\"{}\"", error::join_path(&self.path))
        }
    }

    fn report(
        &mut self,
        node: &SchemaNode,
        constraint: Constraint,
        message: String,
        value: Option<&Value>,
    ) {
        self.errors.push(ValidationError {
            path: self.path.clone(),
            constraint,
            message,
            value: value.cloned(),
            expected: node.expected(),
        });
    }

    fn visit(&mut self, node: &SchemaNode, input: Option<&Value>) -> Option<Value> {
        if self.halted() {
            return None;
        }

        let Some(value) = input else {
            return self.absent(node);
        };

        match node {
            SchemaNode::Object(object) => self.visit_object(node, object, value),
            SchemaNode::Array(array) => self.visit_array(node, array, value),
            SchemaNode::String(string) => self.visit_string(node, string, value),
            SchemaNode::Number(number) => self.visit_number(node, number, value),
            SchemaNode::Boolean(_) => self.visit_boolean(node, value),
        }
    }

    fn absent(&mut self, node: &SchemaNode) -> Option<Value> {
        if node.is_required() {
            let message = format!("{} is required", self.label());
            self.report(node, Constraint::Required, message, None);
            return None;
        }

        match (node.default_value(), node) {
            (DefaultValue::Static(value), _) => Some(value.clone()),
            (DefaultValue::Derived, SchemaNode::Object(object)) => {
                let mut map = Map::new();
                for (name, child) in &object.fields {
                    self.path.push(PathSegment::Key(name.clone()));
                    let resolved = self.visit(child, None);
                    self.path.pop();
                    if let Some(resolved) = resolved {
                        map.insert(name.clone(), resolved);
                    }
                }
                Some(Value::Object(map))
            }
            (DefaultValue::Derived, SchemaNode::Array(_)) => Some(Value::Array(Vec::new())),
            _ => None,
        }
    }

    fn type_error(&mut self, node: &SchemaNode, value: &Value) -> Option<Value> {
        let article = match node.kind().as_str() {
            "object" | "array" => "an",
            _ => "a",
        };
        let message = format!("{} must be {article} {}", self.label(), node.kind());
        self.report(node, Constraint::Type, message, Some(value));
        None
    }

    fn visit_object(
        &mut self,
        node: &SchemaNode,
        object: &ObjectNode,
        value: &Value,
    ) -> Option<Value> {
        let Value::Object(input) = value else {
            return self.type_error(node, value);
        };

        let mut output = Map::new();
        for (name, child) in &object.fields {
            self.path.push(PathSegment::Key(name.clone()));
            let resolved = self.visit(child, input.get(name));
            self.path.pop();
            if let Some(resolved) = resolved {
                output.insert(name.clone(), resolved);
            }
        }

        for (key, extra) in input {
            if object.fields.contains_key(key) {
                continue;
            }
            if self.options.allow_unknown {
                output.insert(key.clone(), extra.clone());
            } else if !self.halted() {
                self.path.push(PathSegment::Key(key.clone()));
                let message = format!("{} is not allowed", self.label());
                self.errors.push(ValidationError {
                    path: self.path.clone(),
                    constraint: Constraint::Unknown,
                    message,
                    value: Some(extra.clone()),
                    expected: "no undeclared fields".to_string(),
                });
                self.path.pop();
            }
        }

        Some(Value::Object(output))
    }

    fn visit_array(&mut self, node: &SchemaNode, array: &ArrayNode, value: &Value) -> Option<Value> {
        let Value::Array(items) = value else {
            return self.type_error(node, value);
        };

        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            let resolved = self.visit(&array.items, Some(item));
            self.path.pop();
            if let Some(resolved) = resolved {
                output.push(resolved);
            }
        }
        Some(Value::Array(output))
    }

    fn visit_string(
        &mut self,
        node: &SchemaNode,
        string: &StringNode,
        value: &Value,
    ) -> Option<Value> {
        let Value::String(raw) = value else {
            return self.type_error(node, value);
        };

        if raw.is_empty() {
            if string.allow_empty {
                return Some(value.clone());
            }
            let message = format!("{} is not allowed to be empty", self.label());
            self.report(node, Constraint::Empty, message, Some(value));
            return None;
        }

        let text = if string.lowercase {
            raw.to_lowercase()
        } else {
            raw.clone()
        };

        if let Some(allowed) = &string.allowed {
            if allowed.iter().any(|candidate| *candidate == text) {
                return Some(Value::String(text));
            }
            let message = format!("{} must be one of [{}]", self.label(), allowed.join(", "));
            self.report(node, Constraint::Allowed, message, Some(value));
            return None;
        }

        let before = self.errors.len();
        let length = text.chars().count();
        if let Some(min) = string.min_len
            && length < min
        {
            let message = format!(
                "{} length must be at least {min} characters long",
                self.label()
            );
            self.report(node, Constraint::MinLength, message, Some(value));
        }
        if let Some(max) = string.max_len
            && length > max
        {
            let message = format!(
                "{} length must be less than or equal to {max} characters long",
                self.label()
            );
            self.report(node, Constraint::MaxLength, message, Some(value));
        }
        if let Some(pattern) = &string.pattern
            && !pattern.regex.is_match(&text)
        {
            let message = format!(
                "{} with value {raw:?} fails to match the {} pattern",
                self.label(),
                pattern.name
            );
            self.report(node, Constraint::Pattern, message, Some(value));
        }

        (self.errors.len() == before).then_some(Value::String(text))
    }

    fn visit_number(
        &mut self,
        node: &SchemaNode,
        number: &NumberNode,
        value: &Value,
    ) -> Option<Value> {
        let (parsed, output) = match value {
            Value::Number(n) => match n.as_f64() {
                Some(parsed) => (parsed, value.clone()),
                None => return self.type_error(node, value),
            },
            Value::String(s) => match parse_numeric(s) {
                Some(converted) => converted,
                None => return self.type_error(node, value),
            },
            _ => return self.type_error(node, value),
        };

        let before = self.errors.len();
        if number.integer && parsed.fract() != 0.0 {
            let message = format!("{} must be an integer", self.label());
            self.report(node, Constraint::Integer, message, Some(value));
        }
        if number.positive && parsed <= 0.0 {
            let message = format!("{} must be a positive number", self.label());
            self.report(node, Constraint::Positive, message, Some(value));
        }
        if let Some(min) = number.min
            && parsed < min
        {
            let message = format!("{} must be greater than or equal to {min}", self.label());
            self.report(node, Constraint::Min, message, Some(value));
        }
        if let Some(max) = number.max
            && parsed > max
        {
            let message = format!("{} must be less than or equal to {max}", self.label());
            self.report(node, Constraint::Max, message, Some(value));
        }

        if self.errors.len() != before {
            return None;
        }
        if number.integer {
            return Some(integral(parsed, output));
        }
        Some(output)
    }

    fn visit_boolean(&mut self, node: &SchemaNode, value: &Value) -> Option<Value> {
        match value {
            Value::Bool(_) => Some(value.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            _ => self.type_error(node, value),
        }
    }
}

/// Parse a numeric string, keeping integers as JSON integers
fn parse_numeric(text: &str) -> Option<(f64, Value)> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some((int as f64, Value::Number(int.into())));
    }
    let float = trimmed.parse::<f64>().ok()?;
    let number = Number::from_f64(float)?;
    Some((float, Value::Number(number)))
}

/// Store a whole-number value as a JSON integer (`1000.0` becomes `1000`)
fn integral(parsed: f64, output: Value) -> Value {
    if output.is_i64() || output.is_u64() {
        return output;
    }
    if parsed >= 0.0 && parsed <= u64::MAX as f64 {
        Value::Number((parsed as u64).into())
    } else if parsed >= i64::MIN as f64 {
        Value::Number((parsed as i64).into())
    } else {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Annotate, array, boolean, number, object, string};
    use serde_json::json;

    fn schema() -> SchemaNode {
        object()
            .field(
                "account",
                object()
                    .field("username", string().min(3).max(16).token().required())
                    .field(
                        "auth",
                        string().one_of(["microsoft", "offline"]).default("microsoft"),
                    ),
            )
            .field(
                "server",
                object().field(
                    "port",
                    number().integer().min(1.0).max(65535.0).default(25565),
                ),
            )
            .field(
                "packets",
                array(string().pattern("^[a-z_]+$", "packet name").lowercase()),
            )
            .field("threshold", number().integer().positive().default(21))
            .field("active", boolean().default(true))
            .into_node()
    }

    fn run(input: Value) -> Result<Value, ValidationErrors> {
        validate(&schema(), &input, &ValidationOptions::default())
    }

    #[test]
    fn test_defaults_fill_absent_fields() {
        let output = run(json!({"account": {"username": "Alice123"}})).unwrap();
        assert_eq!(
            output,
            json!({
                "account": {"username": "Alice123", "auth": "microsoft"},
                "server": {"port": 25565},
                "packets": [],
                "threshold": 21,
                "active": true
            })
        );
    }

    #[test]
    fn test_valid_values_pass_through_unchanged() {
        let output = run(json!({
            "account": {"username": "Bob_42", "auth": "offline"},
            "server": {"port": 1},
            "threshold": 3,
            "active": false
        }))
        .unwrap();
        assert_eq!(output["account"]["auth"], json!("offline"));
        assert_eq!(output["server"]["port"], json!(1));
        assert_eq!(output["threshold"], json!(3));
        assert_eq!(output["active"], json!(false));
    }

    #[test]
    fn test_required_under_absent_object() {
        let errors = run(json!({})).unwrap_err();
        assert_eq!(errors.paths(), vec!["account.username"]);
        let error = errors.iter().next().unwrap();
        assert_eq!(error.constraint, Constraint::Required);
        assert_eq!(error.value, None);
        assert_eq!(error.message, "\"account.username\" is required");
    }

    #[test]
    fn test_collects_errors_across_subtrees() {
        let errors = run(json!({
            "account": {"username": "ab", "auth": "password"},
            "server": {"port": 70000},
            "threshold": -2,
            "active": "maybe"
        }))
        .unwrap_err();

        assert_eq!(
            errors.paths(),
            vec![
                "account.username",
                "account.auth",
                "server.port",
                "threshold",
                "active"
            ]
        );
    }

    #[test]
    fn test_abort_early_stops_at_first_error() {
        let options = ValidationOptions {
            abort_early: true,
            ..ValidationOptions::default()
        };
        let errors = validate(
            &schema(),
            &json!({"account": {"username": "ab"}, "server": {"port": 0}}),
            &options,
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_multiple_refinements_on_one_value() {
        let errors = run(json!({"account": {"username": "this-name-is-way-too-long"}})).unwrap_err();
        let constraints: Vec<Constraint> = errors.iter().map(|e| e.constraint).collect();
        assert_eq!(constraints, vec![Constraint::MaxLength, Constraint::Pattern]);
    }

    #[test]
    fn test_type_mismatch_reports_once() {
        let errors = run(json!({"account": {"username": 42}})).unwrap_err();
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert_eq!(error.constraint, Constraint::Type);
        assert_eq!(error.message, "\"account.username\" must be a string");
        assert_eq!(error.value, Some(json!(42)));
        assert_eq!(
            error.expected,
            "string (length 3..=16, alphanumeric and underscore characters)"
        );
    }

    #[test]
    fn test_empty_string_rejected() {
        let errors = run(json!({"account": {"username": ""}})).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().constraint, Constraint::Empty);
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let output = run(json!({
            "account": {"username": "Alice123", "skin": "steve"},
            "experimental": {"fly": true}
        }))
        .unwrap();
        assert_eq!(output["account"]["skin"], json!("steve"));
        assert_eq!(output["experimental"], json!({"fly": true}));
    }

    #[test]
    fn test_unknown_fields_rejected_when_disallowed() {
        let options = ValidationOptions {
            allow_unknown: false,
            ..ValidationOptions::default()
        };
        let errors = validate(
            &schema(),
            &json!({"account": {"username": "Alice123"}, "extra": 1}),
            &options,
        )
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["extra"]);
        assert_eq!(errors.iter().next().unwrap().constraint, Constraint::Unknown);
    }

    #[test]
    fn test_array_errors_use_index_paths() {
        let errors = run(json!({
            "account": {"username": "Alice123"},
            "packets": ["keep_alive", "chat-message", "map chunk"]
        }))
        .unwrap_err();
        assert_eq!(errors.paths(), vec!["packets.1", "packets.2"]);
    }

    #[test]
    fn test_packet_names_are_lowercased() {
        let output = run(json!({
            "account": {"username": "Alice123"},
            "packets": ["KEEP_ALIVE", "Chat"]
        }))
        .unwrap();
        assert_eq!(output["packets"], json!(["keep_alive", "chat"]));
    }

    #[test]
    fn test_numeric_and_boolean_strings_convert() {
        let output = run(json!({
            "account": {"username": "Alice123"},
            "server": {"port": "25570"},
            "active": "FALSE"
        }))
        .unwrap();
        assert_eq!(output["server"]["port"], json!(25570));
        assert_eq!(output["active"], json!(false));
    }

    #[test]
    fn test_integer_check() {
        let errors = run(json!({"account": {"username": "Alice123"}, "threshold": 2.5})).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().constraint, Constraint::Integer);
    }

    #[test]
    fn test_whole_floats_become_integers() {
        let output = run(json!({
            "account": {"username": "Alice123"},
            "server": {"port": 2.5e4},
            "threshold": "21.0"
        }))
        .unwrap();
        assert_eq!(output["server"]["port"].as_u64(), Some(25000));
        assert_eq!(output["threshold"].as_u64(), Some(21));
    }

    #[test]
    fn test_floats_kept_for_non_integer_nodes() {
        let schema = object().field("interval", number().positive()).into_node();
        let output =
            validate(&schema, &json!({"interval": 1.5}), &ValidationOptions::default()).unwrap();
        assert_eq!(output["interval"], json!(1.5));
    }

    #[test]
    fn test_defaults_are_not_revalidated() {
        let schema = object()
            .field("name", string().min(5).default("ab"))
            .into_node();
        let output = validate(&schema, &json!({}), &ValidationOptions::default()).unwrap();
        assert_eq!(output["name"], json!("ab"));
    }
}
