//! Arrow schema inference and record conversion
//!
//! Records are flat mappings of column name to scalar value. Columns keep
//! the order in which they first appear; nested values are carried as JSON
//! text.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, NullArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer an Arrow schema from a set of records
///
/// All fields are nullable. A column seen with both integers and floats
/// becomes `Float64`; any other mix becomes `Utf8`.
pub fn infer_schema(records: &[Record]) -> Schema {
    let mut columns: Vec<(String, DataType)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        for (key, value) in record {
            let inferred = infer_type(value);
            match index.get(key) {
                Some(&i) => columns[i].1 = merge_types(&columns[i].1, &inferred),
                None => {
                    index.insert(key.clone(), columns.len());
                    columns.push((key.clone(), inferred));
                }
            }
        }
    }

    let fields: Vec<Field> = columns
        .into_iter()
        .map(|(name, dtype)| Field::new(name, dtype, true))
        .collect();

    Schema::new(fields)
}

/// Convert records to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the data.
pub fn records_to_batch(records: &[Record], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = match schema {
        Some(schema) => schema.clone(),
        None => infer_schema(records),
    };

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema)));
    }

    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&JsonValue>> =
                records.iter().map(|record| record.get(field.name())).collect();
            build_array(&values, field.data_type())
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    RecordBatch::try_new(Arc::new(schema), columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

fn infer_type(value: &JsonValue) -> DataType {
    match value {
        JsonValue::Null => DataType::Null,
        JsonValue::Bool(_) => DataType::Boolean,
        JsonValue::Number(n) if n.is_i64() => DataType::Int64,
        JsonValue::Number(_) => DataType::Float64,
        JsonValue::String(_) | JsonValue::Array(_) | JsonValue::Object(_) => DataType::Utf8,
    }
}

fn merge_types(existing: &DataType, other: &DataType) -> DataType {
    match (existing, other) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

fn build_array(values: &[Option<&JsonValue>], data_type: &DataType) -> Result<ArrayRef> {
    let array: ArrayRef = match data_type {
        DataType::Null => Arc::new(NullArray::new(values.len())),
        DataType::Boolean => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(JsonValue::as_bool))
                .collect::<BooleanArray>(),
        ),
        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(JsonValue::as_i64))
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(JsonValue::as_f64))
                .collect::<Float64Array>(),
        ),
        DataType::Utf8 => Arc::new(
            values
                .iter()
                .map(|v| {
                    v.and_then(|v| match v {
                        JsonValue::Null => None,
                        JsonValue::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                })
                .collect::<StringArray>(),
        ),
        other => {
            return Err(Error::output(format!("Unsupported column type {other}")));
        }
    };
    Ok(array)
}
