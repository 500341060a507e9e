//! Conversions between Kùzu values and plain Rust types.

use anyhow::{anyhow, Result};
use kuzu::{LogicalType, Value};

pub(crate) fn string_at(row: &[Value], idx: usize) -> Result<String> {
    match row.get(idx) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(anyhow!("expected STRING at column {}, got {:?}", idx, other)),
    }
}

pub(crate) fn i64_at(row: &[Value], idx: usize) -> Result<i64> {
    match row.get(idx) {
        Some(Value::Int64(n)) => Ok(*n),
        Some(Value::Int32(n)) => Ok(*n as i64),
        Some(Value::UInt64(n)) => Ok(*n as i64),
        other => Err(anyhow!("expected integer at column {}, got {:?}", idx, other)),
    }
}

pub(crate) fn f64_at(row: &[Value], idx: usize) -> Result<f64> {
    row.get(idx)
        .and_then(as_f64)
        .ok_or_else(|| anyhow!("expected floating point at column {}, got {:?}", idx, row.get(idx)))
}

pub(crate) fn strings_at(row: &[Value], idx: usize) -> Result<Vec<String>> {
    match row.get(idx) {
        Some(Value::List(_, items)) | Some(Value::Array(_, items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(anyhow!("expected STRING list element, got {:?}", other)),
            })
            .collect(),
        other => Err(anyhow!("expected STRING list at column {}, got {:?}", idx, other)),
    }
}

/// `None` when the column is NULL (movie never enriched).
pub(crate) fn vector_at(row: &[Value], idx: usize) -> Result<Option<Vec<f32>>> {
    match row.get(idx) {
        Some(Value::Null(_)) => Ok(None),
        Some(Value::List(_, items)) | Some(Value::Array(_, items)) => items
            .iter()
            .map(|v| {
                as_f64(v)
                    .map(|x| x as f32)
                    .ok_or_else(|| anyhow!("expected numeric vector element, got {:?}", v))
            })
            .collect::<Result<Vec<f32>>>()
            .map(Some),
        other => Err(anyhow!("expected vector at column {}, got {:?}", idx, other)),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Double(d) => Some(*d),
        Value::Float(f) => Some(*f as f64),
        _ => None,
    }
}

/// Fixed-size DOUBLE array parameter, matching the `DOUBLE[n]` vector column.
pub(crate) fn vector_param(vector: &[f32]) -> Value {
    Value::Array(
        LogicalType::Double,
        vector.iter().map(|x| Value::Double(*x as f64)).collect(),
    )
}
