//! Normalization of fields that accept a list, a table, or a single string.
//!
//! ```toml
//! envs = ["TZ=UTC", "LOG=debug"]          # list, kept as-is
//! envs = { TZ = "UTC", log = { level = "debug" } }
//!                                         # table, flattened to
//!                                         # ["TZ=UTC", "log.level=debug"]
//! envs = "TZ=UTC"                         # string, single entry
//! ```

use toml::{Table, Value};

/// Coerce `value` into an ordered list of strings.
///
/// `field` is only used to name the offending key in errors.
pub fn normalize(field: &str, value: &Value) -> crate::Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| scalar_to_string(item).ok_or_else(|| invalid(field)))
            .collect(),
        Value::Table(table) => {
            let mut flat = Vec::new();
            flatten_into(field, "", table, &mut flat)?;
            Ok(flat
                .into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect())
        }
        Value::String(s) => Ok(vec![s.clone()]),
        _ => Err(invalid(field)),
    }
}

/// Look up `field` in a raw entry and normalize it; an absent field is empty.
pub fn normalize_entry(entry: &Table, field: &str) -> crate::Result<Vec<String>> {
    match entry.get(field) {
        Some(value) => normalize(field, value),
        None => Ok(Vec::new()),
    }
}

/// Flatten nested tables into `(dotted.key, value)` pairs in declaration order.
fn flatten_into(
    field: &str,
    prefix: &str,
    table: &Table,
    out: &mut Vec<(String, String)>,
) -> crate::Result<()> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(nested) => flatten_into(field, &path, nested, out)?,
            leaf => {
                let rendered = scalar_to_string(leaf).ok_or_else(|| invalid(field))?;
                out.push((path, rendered));
            }
        }
    }
    Ok(())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(format!("{f:?}")),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

fn invalid(field: &str) -> crate::Error {
    crate::Error::InvalidFieldShape {
        field: field.to_owned(),
    }
}
