//! Schema descriptor
//!
//! A declarative, recursive description of the configuration tree: node
//! kinds, constraints, defaults and documentation text. The tree is built
//! once and shared read-only by the validation engine and the documentation
//! generator.

mod definition;
mod node;

pub use definition::config_schema;
pub use node::{
    Annotate, ArrayNode, BooleanNode, DefaultValue, Kind, Meta, NumberNode, ObjectNode, Pattern,
    SchemaNode, StringNode, array, boolean, number, object, string,
};
