//! Serializer for blocks and values.
//!
//! Output is two-space indented, one attribute per line, with tuple
//! elements separated by commas. `terraform fmt` only has to align the
//! `=` signs afterwards.

use crate::block::Block;
use crate::value::{Body, Value};
use std::borrow::Cow;

const INDENT: &str = "  ";

/// Write a block to a string.
#[must_use]
pub fn write_string(block: &Block) -> String {
    let mut output = String::new();
    write_block(&mut output, block, 0);
    output
}

/// Write a block at the given nesting depth, followed by a newline.
pub fn write_block(output: &mut String, block: &Block, depth: usize) {
    indent(output, depth);
    output.push_str(&block.keyword);
    for label in &block.labels {
        output.push(' ');
        output.push_str(&quote(label));
    }

    if block.body.is_empty() && block.blocks.is_empty() {
        output.push_str(" {}\n");
        return;
    }

    output.push_str(" {\n");
    write_attributes(output, &block.body, depth + 1);
    for nested in &block.blocks {
        write_block(output, nested, depth + 1);
    }
    indent(output, depth);
    output.push_str("}\n");
}

/// Write a value. Multi-line values close at `depth`.
pub fn write_value(output: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => output.push_str(&n.to_string()),
        Value::String(s) => output.push_str(&quote(s)),
        Value::Expr(e) => output.push_str(e),
        Value::List(items) if items.is_empty() => output.push_str("[]"),
        Value::List(items) => {
            output.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(output, depth + 1);
                write_value(output, item, depth + 1);
                if i + 1 < items.len() {
                    output.push(',');
                }
                output.push('\n');
            }
            indent(output, depth);
            output.push(']');
        }
        Value::Object(body) if body.is_empty() => output.push_str("{}"),
        Value::Object(body) => {
            output.push_str("{\n");
            write_attributes(output, body, depth + 1);
            indent(output, depth);
            output.push('}');
        }
    }
}

fn write_attributes(output: &mut String, body: &Body, depth: usize) {
    for (key, value) in body.iter() {
        indent(output, depth);
        output.push_str(&attribute_key(key));
        output.push_str(" = ");
        write_value(output, value, depth);
        output.push('\n');
    }
}

/// Quote a string literal. Interpolation sequences are left untouched;
/// template directives are escaped as `%%{`.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '%' if chars.peek() == Some(&'{') => out.push_str("%%"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Attribute or object key, quoted when it is not a bare identifier.
#[must_use]
pub fn attribute_key(key: &str) -> Cow<'_, str> {
    if is_identifier(key) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(quote(key))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn indent(output: &mut String, depth: usize) {
    for _ in 0..depth {
        output.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_empty_block() {
        let block = Block::new("backend", ["gcs"]);
        assert_eq!(write_string(&block), "backend \"gcs\" {}\n");
    }

    #[test]
    fn test_write_scalars() {
        let block = Block::resource("airbyte_source_faker", "faker")
            .attr("name", "Faker")
            .attr("count", 15_i64)
            .attr("enabled", true)
            .attr("cursor", Value::Null)
            .attr("workspace_id", Value::expr("var.WORKSPACE_ID"));

        assert_eq!(
            write_string(&block),
            "resource \"airbyte_source_faker\" \"faker\" {\n  name = \"Faker\"\n  count = 15\n  enabled = true\n  cursor = null\n  workspace_id = var.WORKSPACE_ID\n}\n"
        );
    }

    #[test]
    fn test_write_nested() {
        let streams = Value::List(vec![
            Value::Object(Body::new().with("name", "orders").with(
                "primary_key",
                Value::List(vec![Value::List(vec![Value::from("id")])]),
            )),
            Value::Object(Body::new().with("name", "customers")),
        ]);
        let block = Block::resource("airbyte_connection", "sync").attr(
            "configurations",
            Body::new().with("streams", streams),
        );

        let expected = r#"resource "airbyte_connection" "sync" {
  configurations = {
    streams = [
      {
        name = "orders"
        primary_key = [
          [
            "id"
          ]
        ]
      },
      {
        name = "customers"
      }
    ]
  }
}
"#;
        assert_eq!(write_string(&block), expected);
    }

    #[test]
    fn test_write_empty_collections() {
        let block = Block::resource("t", "l")
            .attr("cursor_field", Value::List(vec![]))
            .attr("options", Body::new());
        assert_eq!(
            write_string(&block),
            "resource \"t\" \"l\" {\n  cursor_field = []\n  options = {}\n}\n"
        );
    }

    #[test]
    fn test_write_nested_blocks() {
        let block = Block::new("terraform", Vec::<String>::new())
            .block(Block::new("backend", ["gcs"]));
        assert_eq!(write_string(&block), "terraform {\n  backend \"gcs\" {}\n}\n");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote("${var.X}"), "\"${var.X}\"");
    }

    #[test]
    fn test_quote_escapes_template_directives() {
        assert_eq!(quote("%{if x}y%{endif}"), "\"%%{if x}y%%{endif}\"");
        assert_eq!(quote("100% {done}"), "\"100% {done}\"");
        assert_eq!(quote("50%"), "\"50%\"");
    }

    #[test]
    fn test_attribute_key() {
        assert_eq!(attribute_key("dataset_id"), "dataset_id");
        assert_eq!(attribute_key("x-api-key"), "x-api-key");
        assert_eq!(attribute_key("Start Date"), "\"Start Date\"");
        assert_eq!(attribute_key("1st"), "\"1st\"");
    }

    #[test]
    fn test_write_is_deterministic() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"b": [1, 2], "a": {"z": "x", "y": null}}"#).unwrap();
        let block = Block::resource("t", "l").attr("configuration", Value::from(&json));

        assert_eq!(write_string(&block), write_string(&block.clone()));
    }
}
