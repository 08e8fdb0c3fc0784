//! Documentation generator tests against the built-in schema

use queuekeeper_core::config_schema;
use queuekeeper_core::docs;
use queuekeeper_core::schema::Kind;
use std::collections::BTreeSet;

/// Anchor ids found in rendered markdown
fn anchors(markdown: &str) -> BTreeSet<String> {
    markdown
        .lines()
        .filter_map(|line| {
            let start = line.find("<a id=\"")? + "<a id=\"".len();
            let end = line[start..].find('"')? + start;
            Some(line[start..end].to_string())
        })
        .collect()
}

#[test]
fn test_documented_fields_match_annotated_schema_fields() {
    let schema = config_schema();
    let markdown = docs::render(schema, true);

    let expected: BTreeSet<String> = schema
        .annotated_paths()
        .iter()
        .map(|path| path.replace('.', "-").to_lowercase())
        .collect();

    assert_eq!(anchors(&markdown), expected);
}

#[test]
fn test_every_section_has_a_line() {
    let schema = config_schema();
    let ids = anchors(&docs::render(schema, true));

    let mut sections = Vec::new();
    schema.walk(&mut |path, node| {
        if node.kind() == Kind::Object {
            sections.push(docs::anchor(path));
        }
    });

    assert!(!sections.is_empty());
    for section in sections {
        assert!(ids.contains(&section), "no line for section {section}");
    }
}

#[test]
fn test_nested_sections_keep_parent_context() {
    let markdown = docs::render(config_schema(), false);

    assert!(markdown.contains(
        "\n\n- **mineflayer** (`object`): In-game bot that holds the session between controllers\n  - **active** (`boolean`, default: `true`)"
    ));
    assert!(markdown.contains("\n  - **autoEat** (`object`): Automatic eating\n    - **active**"));
    assert!(markdown.contains("\n  - **antiAfk** (`object`): "));
    assert!(markdown.contains("\n  - **webhooks** (`object`): "));
    assert!(markdown.contains("\n\n- **dashboard** (`object`): Terminal status dashboard\n"));
}

#[test]
fn test_top_level_sections_are_separated() {
    let markdown = docs::render(config_schema(), false);

    assert!(markdown.starts_with("- **account** (`object`)"));
    assert!(markdown.contains("\n\n- **server** (`object`)"));
    assert!(markdown.contains("\n\n- **queueThreshold** (`number`, default: `21`)"));
    // server.port stays inside the server block
    assert!(!markdown.contains("\n\n  - **port**"));
}

#[test]
fn test_derived_defaults_are_not_printed() {
    let markdown = docs::render(config_schema(), false);
    let account_line = markdown.lines().next().unwrap();
    assert_eq!(
        account_line,
        "- **account** (`object`): Minecraft account used to join the server"
    );
    assert!(markdown.contains("  - **port** (`number`, default: `25565`): Server port"));
}

#[test]
fn test_page_has_heading() {
    let page = docs::render_page(config_schema());
    assert!(page.starts_with("# Configuration\n"));
    assert!(page.contains("<a id=\"account-username\"></a>"));
}
