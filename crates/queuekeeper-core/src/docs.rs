//! Configuration documentation generator
//!
//! Renders a schema as a nested markdown list. The output depends only on the
//! schema, so it can be produced before any config is loaded.

use crate::error::QueueKeeperError;
use crate::result::Result;
use crate::schema::SchemaNode;
use std::fs;
use std::path::Path;

/// Where the CLI writes the generated page, relative to the working directory
pub const DOCS_PATH: &str = "docs/configuration.md";

const INDENT: &str = "  ";

/// Render every annotated node of `schema` as one markdown list line.
///
/// Nodes without a description or literal default (plain wrappers) get no
/// line of their own, but their children are still rendered at their real
/// depth. Top-level sections are separated by a blank line.
pub fn render(schema: &SchemaNode, include_anchors: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current_section: Option<&str> = None;

    schema.walk(&mut |path, node| {
        if !node.is_annotated() {
            return;
        }

        let section = path[0];
        if current_section.is_some_and(|s| s != section) {
            lines.push(String::new());
        }
        current_section = Some(section);

        lines.push(render_line(path, node, include_anchors));
    });

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Stable anchor id for a node: path segments joined with `-`, lowercased
pub fn anchor(path: &[&str]) -> String {
    path.join("-").to_lowercase()
}

fn render_line(path: &[&str], node: &SchemaNode, include_anchors: bool) -> String {
    let depth = path.len() - 1;
    let name = path[depth];

    let mut line = INDENT.repeat(depth);
    line.push_str("- ");
    if include_anchors {
        line.push_str(&format!("<a id=\"{}\"></a>", anchor(path)));
    }
    line.push_str(&format!("**{name}** (`{}`", node.kind()));
    if let Some(default) = node.default_value().as_static() {
        let json = serde_json::to_string(default).unwrap_or_else(|_| default.to_string());
        line.push_str(&format!(", default: `{json}`"));
    }
    line.push(')');
    if let Some(description) = node.description() {
        line.push_str(": ");
        line.push_str(description);
    }
    line
}

/// Full page: heading, short intro and the anchored option list
pub fn render_page(schema: &SchemaNode) -> String {
    let mut page = String::from(
        "# Configuration\n\n\
         Options read from `config/config.json5` (JSON5: comments and trailing commas are allowed).\n\
         Only `account.username` is required; everything else falls back to the default shown.\n\n",
    );
    page.push_str(&render(schema, true));
    page
}

/// Write the rendered page to `output_path`, creating parent directories
pub fn write(output_path: &Path, schema: &SchemaNode) -> Result<()> {
    tracing::info!("Generating configuration documentation...");

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| QueueKeeperError::io_error(parent, e))?;
    }

    fs::write(output_path, render_page(schema))
        .map_err(|e| QueueKeeperError::io_error(output_path, e))?;

    tracing::info!("Documentation written to {}", output_path.display());
    Ok(())
}
