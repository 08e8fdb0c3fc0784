//! Validation errors and the aggregated report

use serde_json::Value;
use std::fmt;

/// One step of the path from the config root to an offending value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The refinement a value failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Required,
    Type,
    Empty,
    Allowed,
    MinLength,
    MaxLength,
    Pattern,
    Integer,
    Positive,
    Min,
    Max,
    Unknown,
}

impl Constraint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::Type => "type",
            Constraint::Empty => "string.empty",
            Constraint::Allowed => "string.allowed",
            Constraint::MinLength => "string.min",
            Constraint::MaxLength => "string.max",
            Constraint::Pattern => "string.pattern",
            Constraint::Integer => "number.integer",
            Constraint::Positive => "number.positive",
            Constraint::Min => "number.min",
            Constraint::Max => "number.max",
            Constraint::Unknown => "object.unknown",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint violation, self-contained enough to print without the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: Vec<PathSegment>,
    pub constraint: Constraint,
    pub message: String,
    /// The raw input value; `None` when the value was absent
    pub value: Option<Value>,
    pub expected: String,
}

impl ValidationError {
    /// Dotted path from the root, e.g. `proxy.whitelist.0`
    pub fn path_string(&self) -> String {
        join_path(&self.path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub(crate) fn join_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Every violation found in one validation pass, in discovery order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Dotted paths of every error, in order
    pub fn paths(&self) -> Vec<String> {
        self.errors.iter().map(ValidationError::path_string).collect()
    }

    /// Numbered, human-readable block with one entry per error
    pub fn report(&self) -> String {
        let count = self.errors.len();
        let noun = if count == 1 { "error" } else { "errors" };
        let mut out = format!("Config validation failed with {count} {noun}:\n");
        for (index, error) in self.errors.iter().enumerate() {
            let value = error
                .value
                .as_ref()
                .map(|v| serde_json::to_string(v).unwrap_or_else(|_| v.to_string()))
                .unwrap_or_else(|| "<missing>".to_string());
            out.push_str(&format!("  {}. {}\n", index + 1, error.message));
            out.push_str(&format!("     value:    {value}\n"));
            out.push_str(&format!("     expected: {}\n", error.expected));
        }
        out
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
