//! Schema descriptor nodes
//!
//! A schema is a tree of [`SchemaNode`]s. Each variant carries only the
//! constraints that make sense for its kind; the shared bits (description,
//! default, required flag) live in [`Meta`].
//!
//! Nodes are built with the free constructor functions and the chaining
//! methods on each node type:
//!
//! ```
//! use queuekeeper_core::schema::{object, string, number, Annotate};
//!
//! let schema = object()
//!     .field("username", string().min(3).max(16).token().required())
//!     .field("port", number().integer().min(1.0).max(65535.0).default(25565))
//!     .into_node();
//! assert_eq!(schema.kind().as_str(), "object");
//! ```

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Token charset used for usernames and similar identifiers
const TOKEN_PATTERN: &str = r"^[A-Za-z0-9_]+$";

/// The closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    String,
    Number,
    Boolean,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a node's value comes from when the input omits it
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DefaultValue {
    /// No default; an absent value stays absent (or is reported when required)
    #[default]
    None,
    /// A literal value substituted as-is
    Static(Value),
    /// Built from the children's defaults (objects and arrays only)
    Derived,
}

impl DefaultValue {
    /// The literal default, if one is statically known
    pub fn as_static(&self) -> Option<&Value> {
        match self {
            DefaultValue::Static(value) => Some(value),
            _ => None,
        }
    }
}

/// Metadata shared by every node kind
#[derive(Debug, Clone, Default)]
pub struct Meta {
    pub description: Option<String>,
    pub default: DefaultValue,
    pub required: bool,
}

/// Chaining methods available on every node type
pub trait Annotate: Sized {
    fn meta_mut(&mut self) -> &mut Meta;

    /// Attach display text used by the documentation generator
    fn describe(mut self, text: impl Into<String>) -> Self {
        self.meta_mut().description = Some(text.into());
        self
    }

    /// Set a literal default value
    fn default(mut self, value: impl Into<Value>) -> Self {
        self.meta_mut().default = DefaultValue::Static(value.into());
        self
    }

    /// Mark the value as mandatory
    fn required(mut self) -> Self {
        self.meta_mut().required = true;
        self
    }
}

/// A named regular expression constraint
#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub name: String,
}

/// Object node: ordered named fields
#[derive(Debug, Clone)]
pub struct ObjectNode {
    pub meta: Meta,
    pub fields: IndexMap<String, SchemaNode>,
}

/// Array node: one element schema shared by every item
#[derive(Debug, Clone)]
pub struct ArrayNode {
    pub meta: Meta,
    pub items: Box<SchemaNode>,
}

/// String node with length, pattern and enumeration refinements
#[derive(Debug, Clone, Default)]
pub struct StringNode {
    pub meta: Meta,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub pattern: Option<Pattern>,
    pub allowed: Option<Vec<String>>,
    pub allow_empty: bool,
    pub lowercase: bool,
}

/// Number node with integer/sign/range refinements (ranges are inclusive)
#[derive(Debug, Clone, Default)]
pub struct NumberNode {
    pub meta: Meta,
    pub integer: bool,
    pub positive: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Boolean node
#[derive(Debug, Clone, Default)]
pub struct BooleanNode {
    pub meta: Meta,
}

/// One node of the schema tree
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Object(ObjectNode),
    Array(ArrayNode),
    String(StringNode),
    Number(NumberNode),
    Boolean(BooleanNode),
}

/// Start an object node; its default is derived from its fields
pub fn object() -> ObjectNode {
    ObjectNode {
        meta: Meta {
            default: DefaultValue::Derived,
            ..Meta::default()
        },
        fields: IndexMap::new(),
    }
}

/// Start an array node; it defaults to an empty array
pub fn array(items: impl Into<SchemaNode>) -> ArrayNode {
    ArrayNode {
        meta: Meta {
            default: DefaultValue::Static(Value::Array(Vec::new())),
            ..Meta::default()
        },
        items: Box::new(items.into()),
    }
}

pub fn string() -> StringNode {
    Default::default()
}

pub fn number() -> NumberNode {
    Default::default()
}

pub fn boolean() -> BooleanNode {
    Default::default()
}

impl ObjectNode {
    /// Declare a field; declaration order is kept for documentation
    pub fn field(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        self.fields.insert(name.into(), node.into());
        self
    }

    pub fn into_node(self) -> SchemaNode {
        SchemaNode::Object(self)
    }
}

impl StringNode {
    pub fn min(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn max(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Require the value to match `pattern`; `name` is shown in error messages.
    ///
    /// Panics on an invalid expression: schemas are static literals, so a bad
    /// pattern is a programming defect.
    pub fn pattern(mut self, pattern: &str, name: impl Into<String>) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid schema pattern {pattern:?}: {e}"));
        self.pattern = Some(Pattern {
            regex,
            name: name.into(),
        });
        self
    }

    /// Only ASCII letters, digits and underscores
    pub fn token(self) -> Self {
        self.pattern(TOKEN_PATTERN, "alphanumeric and underscore characters")
    }

    /// Restrict the value to a fixed set of tokens
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Accept the empty string
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Normalize accepted values to lowercase before other checks run
    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }
}

impl NumberNode {
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

macro_rules! impl_node {
    ($node:ty, $variant:ident) => {
        impl Annotate for $node {
            fn meta_mut(&mut self) -> &mut Meta {
                &mut self.meta
            }
        }

        impl From<$node> for SchemaNode {
            fn from(node: $node) -> Self {
                SchemaNode::$variant(node)
            }
        }
    };
}

impl_node!(ObjectNode, Object);
impl_node!(ArrayNode, Array);
impl_node!(StringNode, String);
impl_node!(NumberNode, Number);
impl_node!(BooleanNode, Boolean);

impl Annotate for SchemaNode {
    fn meta_mut(&mut self) -> &mut Meta {
        match self {
            SchemaNode::Object(node) => &mut node.meta,
            SchemaNode::Array(node) => &mut node.meta,
            SchemaNode::String(node) => &mut node.meta,
            SchemaNode::Number(node) => &mut node.meta,
            SchemaNode::Boolean(node) => &mut node.meta,
        }
    }
}

impl SchemaNode {
    pub fn kind(&self) -> Kind {
        match self {
            SchemaNode::Object(_) => Kind::Object,
            SchemaNode::Array(_) => Kind::Array,
            SchemaNode::String(_) => Kind::String,
            SchemaNode::Number(_) => Kind::Number,
            SchemaNode::Boolean(_) => Kind::Boolean,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            SchemaNode::Object(node) => &node.meta,
            SchemaNode::Array(node) => &node.meta,
            SchemaNode::String(node) => &node.meta,
            SchemaNode::Number(node) => &node.meta,
            SchemaNode::Boolean(node) => &node.meta,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.meta().description.as_deref()
    }

    pub fn default_value(&self) -> &DefaultValue {
        &self.meta().default
    }

    pub fn is_required(&self) -> bool {
        self.meta().required
    }

    /// Nodes worth a documentation line: they carry a description or a literal default
    pub fn is_annotated(&self) -> bool {
        self.description().is_some() || self.default_value().as_static().is_some()
    }

    /// Look up a direct field of an object node
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object(node) => node.fields.get(name),
            _ => None,
        }
    }

    /// Resolve a dotted path of object fields, e.g. `"server.port"`
    pub fn lookup(&self, dotted: &str) -> Option<&SchemaNode> {
        dotted
            .split('.')
            .try_fold(self, |node, segment| node.field(segment))
    }

    /// Human-readable shape used as the "expected" part of error reports
    pub fn expected(&self) -> String {
        match self {
            SchemaNode::Object(_) => "object".to_string(),
            SchemaNode::Array(node) => format!("array of {}", node.items.expected()),
            SchemaNode::Boolean(_) => "boolean".to_string(),
            SchemaNode::String(node) => {
                let mut parts = Vec::new();
                if let Some(allowed) = &node.allowed {
                    parts.push(format!("one of [{}]", allowed.join(", ")));
                }
                match (node.min_len, node.max_len) {
                    (Some(min), Some(max)) => parts.push(format!("length {min}..={max}")),
                    (Some(min), None) => parts.push(format!("at least {min} chars")),
                    (None, Some(max)) => parts.push(format!("at most {max} chars")),
                    (None, None) => {}
                }
                if let Some(pattern) = &node.pattern {
                    parts.push(pattern.name.clone());
                }
                if node.lowercase {
                    parts.push("lowercased".to_string());
                }
                if node.allow_empty {
                    parts.push("may be empty".to_string());
                }
                with_qualifiers("string", parts)
            }
            SchemaNode::Number(node) => {
                let base = if node.integer { "integer" } else { "number" };
                let mut parts = Vec::new();
                if node.positive {
                    parts.push("positive".to_string());
                }
                match (node.min, node.max) {
                    (Some(min), Some(max)) => parts.push(format!("{min}..={max}")),
                    (Some(min), None) => parts.push(format!(">= {min}")),
                    (None, Some(max)) => parts.push(format!("<= {max}")),
                    (None, None) => {}
                }
                with_qualifiers(base, parts)
            }
        }
    }

    /// Pre-order walk over every descendant, in declaration order.
    ///
    /// The callback receives the path of field names from the root (array
    /// elements appear as the segment `items`) and the node itself. The root
    /// is not visited since it has no name.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&[&'a str], &'a SchemaNode),
    {
        let mut path = Vec::new();
        self.walk_children(&mut path, visit);
    }

    fn walk_children<'a, F>(&'a self, path: &mut Vec<&'a str>, visit: &mut F)
    where
        F: FnMut(&[&'a str], &'a SchemaNode),
    {
        match self {
            SchemaNode::Object(node) => {
                for (name, child) in &node.fields {
                    path.push(name.as_str());
                    visit(path.as_slice(), child);
                    child.walk_children(path, visit);
                    path.pop();
                }
            }
            SchemaNode::Array(node) => {
                path.push("items");
                visit(path.as_slice(), &node.items);
                node.items.walk_children(path, visit);
                path.pop();
            }
            _ => {}
        }
    }

    /// Dotted paths of every node that carries a description or literal default
    pub fn annotated_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.walk(&mut |path, node| {
            if node.is_annotated() {
                paths.push(path.join("."));
            }
        });
        paths
    }

    /// Dotted paths of leaves that have neither a default nor `required`.
    ///
    /// Array element schemas are exempt: elements only exist when supplied.
    pub fn check_defaults(&self) -> Vec<String> {
        let mut missing = Vec::new();
        self.walk(&mut |path, node| {
            let leaf = !matches!(node, SchemaNode::Object(_) | SchemaNode::Array(_));
            let in_array = path.contains(&"items");
            if leaf && !in_array && *node.default_value() == DefaultValue::None && !node.is_required()
            {
                missing.push(path.join("."));
            }
        });
        missing
    }
}

fn with_qualifiers(base: &str, parts: Vec<String>) -> String {
    if parts.is_empty() {
        base.to_string()
    } else {
        format!("{base} ({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SchemaNode {
        object()
            .field(
                "account",
                object().field("username", string().min(3).max(16).token().required()),
            )
            .field(
                "ports",
                array(number().integer()).describe("Ports to listen on"),
            )
            .field("enabled", boolean().default(true))
            .into_node()
    }

    #[test]
    fn test_defaults_per_kind() {
        let schema = sample();
        assert_eq!(
            *schema.field("account").unwrap().default_value(),
            DefaultValue::Derived
        );
        assert_eq!(
            schema.field("ports").unwrap().default_value().as_static(),
            Some(&json!([]))
        );
        assert_eq!(
            schema.field("enabled").unwrap().default_value().as_static(),
            Some(&json!(true))
        );
    }

    #[test]
    fn test_lookup_dotted_path() {
        let schema = sample();
        let username = schema.lookup("account.username").unwrap();
        assert_eq!(username.kind(), Kind::String);
        assert!(username.is_required());
        assert!(schema.lookup("account.missing").is_none());
    }

    #[test]
    fn test_expected_descriptions() {
        let schema = sample();
        assert_eq!(
            schema.lookup("account.username").unwrap().expected(),
            "string (length 3..=16, alphanumeric and underscore characters)"
        );
        assert_eq!(schema.field("ports").unwrap().expected(), "array of integer");

        let port: SchemaNode = number().integer().min(1.0).max(65535.0).into();
        assert_eq!(port.expected(), "integer (1..=65535)");
    }

    #[test]
    fn test_walk_is_preorder_in_declaration_order() {
        let schema = sample();
        let mut seen = Vec::new();
        schema.walk(&mut |path, _| seen.push(path.join(".")));
        assert_eq!(
            seen,
            vec![
                "account",
                "account.username",
                "ports",
                "ports.items",
                "enabled"
            ]
        );
    }

    #[test]
    fn test_annotated_paths() {
        let schema = sample();
        assert_eq!(schema.annotated_paths(), vec!["ports", "enabled"]);
    }

    #[test]
    fn test_check_defaults_flags_bare_leaves() {
        let schema = object()
            .field("a", string())
            .field("b", string().required())
            .field("c", number().default(1))
            .into_node();
        assert_eq!(schema.check_defaults(), vec!["a"]);
    }

    #[test]
    #[should_panic(expected = "invalid schema pattern")]
    fn test_invalid_pattern_panics() {
        let _ = string().pattern("(", "broken");
    }
}
