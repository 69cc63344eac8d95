//! Generic PostgreSQL row to JSON row mapping.

use crate::executor::Row;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::{PgRow, Postgres};
use sqlx::{Column, Decode, Row as _, Type, TypeInfo};

pub fn row_to_json(row: &PgRow) -> Row {
    let mut map = Row::new();
    for col in row.columns() {
        map.insert(col.name().to_string(), cell_to_value(row, col.ordinal()));
    }
    map
}

/// First column of a row, e.g. the key of an `INSERT ... RETURNING id`.
pub fn first_column(row: &PgRow) -> Option<Value> {
    if row.is_empty() {
        None
    } else {
        Some(cell_to_value(row, 0))
    }
}

fn get<'r, T>(row: &'r PgRow, idx: usize) -> Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(idx)
}

/// Decode one cell by its column type. Types with no JSON form here (arrays,
/// ranges, bytea, ...) become `Null` with a warning.
fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    let column = &row.columns()[idx];
    let ty = column.type_info().name();
    let decoded = match ty {
        "INT2" => get::<i16>(row, idx).map(|v| v.map(Value::from)),
        "INT4" => get::<i32>(row, idx).map(|v| v.map(Value::from)),
        "INT8" => get::<i64>(row, idx).map(|v| v.map(Value::from)),
        "FLOAT4" => get::<f32>(row, idx).map(|v| v.map(Value::from)),
        "FLOAT8" => get::<f64>(row, idx).map(|v| v.map(Value::from)),
        "NUMERIC" => get::<Decimal>(row, idx).map(|v| v.map(decimal_to_value)),
        "BOOL" => get::<bool>(row, idx).map(|v| v.map(Value::Bool)),
        "UUID" => get::<uuid::Uuid>(row, idx).map(|v| v.map(|u| Value::String(u.to_string()))),
        "TIMESTAMPTZ" => get::<chrono::DateTime<chrono::Utc>>(row, idx)
            .map(|v| v.map(|d| Value::String(d.to_rfc3339()))),
        "TIMESTAMP" => get::<chrono::NaiveDateTime>(row, idx)
            .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))),
        "DATE" => get::<chrono::NaiveDate>(row, idx)
            .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))),
        "JSON" | "JSONB" => get::<Value>(row, idx),
        _ => get::<String>(row, idx).map(|v| v.map(Value::String)),
    };
    match decoded {
        Ok(v) => v.unwrap_or(Value::Null),
        Err(e) => {
            tracing::warn!(column = %column.name(), ty, error = %e, "column has no JSON mapping; returning null");
            Value::Null
        }
    }
}

/// Whole numbers that fit i64 become JSON integers (so `SUM(bigint)` still
/// normalizes as a count); anything else keeps its exact decimal text.
fn decimal_to_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(n) = d.to_i64() {
            return Value::from(n);
        }
    }
    Value::String(d.normalize().to_string())
}
