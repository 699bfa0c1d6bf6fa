//! HCL rendering of attribute trees.
//!
//! Rendering rules:
//! - a string holding exactly one `${...}` interpolation prints bare
//! - other strings are quoted, multi-line strings become heredocs
//! - arrays of objects become repeated nested blocks
//! - objects become nested blocks unless the key is a map argument
//! - runs of single-line attributes align on `=` like `terraform fmt`

use serde_json::{Map, Value};

use crate::naming::title_case;
use crate::refs::BlockKind;

const BANNER_WIDTH: usize = 72;

/// Argument names whose object values are maps, not nested blocks.
pub const MAP_ARGUMENTS: &[&str] = &["parameters", "ibm", "random", "providers"];

/// Render a `resource` or `data` block.
pub fn json_to_tf_print(
    kind: BlockKind,
    tf_type: &str,
    name: &str,
    attrs: &Map<String, Value>,
) -> String {
    hcl_block(kind.as_str(), &[tf_type, name], attrs)
}

/// Render any top-level block, e.g. `module "x" { ... }` or `terraform { ... }`.
pub fn hcl_block(keyword: &str, labels: &[&str], attrs: &Map<String, Value>) -> String {
    let mut out = keyword.to_string();
    for label in labels {
        out.push_str(&format!(" \"{}\"", label));
    }
    out.push_str(" {\n");
    // Variable types are type expressions, not strings.
    write_body(&mut out, attrs, 1, keyword == "variable");
    out.push_str("}\n");
    out
}

/// Wrap a body in a banner comment block.
pub fn tf_block(title: &str, body: &str) -> String {
    let banner = "#".repeat(BANNER_WIDTH);
    let header = format!(
        "#{:^width$}#",
        title_case(title),
        width = BANNER_WIDTH - 2
    );
    format!(
        "{banner}\n{header}\n{banner}\n\n{body}\n\n{banner}\n\n",
        banner = banner,
        header = header,
        body = body.trim_end_matches('\n')
    )
}

/// Trim the trailing blank separator left by the last `tf_block`.
pub fn tf_done(text: &str) -> String {
    match text.strip_suffix('\n') {
        Some(trimmed) if trimmed.ends_with('\n') => trimmed.to_string(),
        _ => text.to_string(),
    }
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

fn write_body(out: &mut String, attrs: &Map<String, Value>, level: usize, bare_type: bool) {
    let mut run: Vec<(&str, String)> = Vec::new();

    for (key, value) in attrs {
        match value {
            Value::Object(map) if !MAP_ARGUMENTS.contains(&key.as_str()) => {
                flush_run(out, &mut run, level);
                write_nested_block(out, key, map, level);
            }
            Value::Array(items) if is_block_list(items) => {
                flush_run(out, &mut run, level);
                for item in items {
                    if let Value::Object(map) = item {
                        write_nested_block(out, key, map, level);
                    }
                }
            }
            _ => {
                let rendered = match (bare_type && key == "type", value.as_str()) {
                    (true, Some(type_expr)) => type_expr.to_string(),
                    _ => render_value(value, level),
                };
                let multi_line = rendered.contains('\n');
                run.push((key.as_str(), rendered));
                if multi_line {
                    flush_run(out, &mut run, level);
                }
            }
        }
    }

    flush_run(out, &mut run, level);
}

fn is_block_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

fn write_nested_block(out: &mut String, key: &str, map: &Map<String, Value>, level: usize) {
    out.push_str(&format!("{}{} {{\n", indent(level), key));
    write_body(out, map, level + 1, false);
    out.push_str(&format!("{}}}\n", indent(level)));
}

fn flush_run(out: &mut String, run: &mut Vec<(&str, String)>, level: usize) {
    let width = run.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in run.drain(..) {
        out.push_str(&format!(
            "{}{:<width$} = {}\n",
            indent(level),
            key,
            value,
            width = width
        ));
    }
}

fn render_value(value: &Value, level: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => render_string(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let mut text = "[\n".to_string();
            for (i, item) in items.iter().enumerate() {
                let separator = if i + 1 < items.len() { "," } else { "" };
                text.push_str(&format!(
                    "{}{}{}\n",
                    indent(level + 1),
                    render_value(item, level + 1),
                    separator
                ));
            }
            text.push_str(&format!("{}]", indent(level)));
            text
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let entries: Vec<(String, String)> = map
                .iter()
                .map(|(k, v)| (map_key(k), render_value(v, level + 1)))
                .collect();
            let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            let mut text = "{\n".to_string();
            for (key, rendered) in entries {
                text.push_str(&format!(
                    "{}{:<width$} = {}\n",
                    indent(level + 1),
                    key,
                    rendered,
                    width = width
                ));
            }
            text.push_str(&format!("{}}}", indent(level)));
            text
        }
    }
}

fn render_string(s: &str) -> String {
    if let Some(expr) = interpolation(s) {
        return expr.to_string();
    }
    if s.contains('\n') {
        let newline = if s.ends_with('\n') { "" } else { "\n" };
        return format!("<<EOT\n{}{}EOT", s, newline);
    }
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// The inner expression when `s` is exactly one `${...}` interpolation.
fn interpolation(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("${")?.strip_suffix('}')?;
    if inner.contains("${") {
        return None;
    }
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

fn map_key(key: &str) -> String {
    let identifier = key
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if identifier {
        key.to_string()
    } else {
        format!("\"{}\"", key)
    }
}
