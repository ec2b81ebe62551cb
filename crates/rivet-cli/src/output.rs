//! Formatted output helpers for CLI commands.
//!
//! Provides aligned two-column tables and the JSON rendering of coerced
//! values.

use rivet_coerce::{Scalar, Value};

/// Renders rows as a two-column table under `headers`, the first column
/// padded to its widest cell.
#[must_use]
pub fn format_table(headers: (&str, &str), rows: &[(&str, &str)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .chain(std::iter::once(headers.0.chars().count()))
        .max()
        .unwrap_or(0);
    let mut out = format!("  {:<width$}  {}\n", headers.0, headers.1);
    for (left, right) in rows {
        out.push_str(&format!("  {left:<width$}  {right}\n"));
    }
    out
}

fn scalar_to_json(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Int(n) => serde_json::Value::from(*n),
        Scalar::Str(s) => serde_json::Value::String(s.clone()),
    }
}

/// Converts a coerced value to JSON. Sets become sorted arrays and map
/// keys are rendered as strings.
#[must_use]
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Scalar(scalar) => scalar_to_json(scalar),
        Value::Array(items) | Value::List(items) => items.iter().map(scalar_to_json).collect(),
        Value::Set(items) => {
            let mut sorted: Vec<&Scalar> = items.iter().collect();
            sorted.sort();
            sorted.into_iter().map(scalar_to_json).collect()
        }
        Value::Map(entries) => entries
            .iter()
            .map(|(k, v)| (k.to_string(), scalar_to_json(v)))
            .collect::<serde_json::Map<_, _>>()
            .into(),
    }
}
