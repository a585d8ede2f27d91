//! JSON records codec.
//!
//! Input is an array of flat objects. The union of keys, in first-seen
//! order, defines the columns; a record without a key contributes a null.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::error::{BoxError, TableError};
use crate::table::model::{Column, Scalar, Table};

/// Convert a JSON leaf into a scalar. Arrays and objects have no scalar
/// form.
fn scalar_from_json(value: Value) -> Option<Scalar> {
    match value {
        Value::Null => Some(Scalar::Null),
        Value::Bool(b) => Some(Scalar::Bool(b)),
        Value::Number(n) => n
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| n.as_u64().map(Scalar::UInt))
            .or_else(|| n.as_f64().map(Scalar::Float)),
        Value::String(s) => Some(Scalar::Str(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_to_json(cell: &Scalar) -> Value {
    match cell {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::Number((*i).into()),
        Scalar::UInt(u) => Value::Number((*u).into()),
        // NaN and infinities have no JSON form.
        Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Scalar::Str(s) => Value::String(s.clone()),
    }
}

pub fn decode(bytes: &[u8]) -> Result<Table, BoxError> {
    let records = match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(records) => records,
        _ => return Err(TableError::NotAnArray.into()),
    };

    let rows = records.len();
    let mut names: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut cells: Vec<Vec<Scalar>> = Vec::new();

    for (row, record) in records.into_iter().enumerate() {
        let Value::Object(fields) = record else {
            return Err(TableError::NotARecord(row).into());
        };

        for (key, value) in fields {
            let position = match positions.get(&key) {
                Some(&position) => position,
                None => {
                    // Late column: earlier records did not have it.
                    positions.insert(key.clone(), names.len());
                    names.push(key);
                    cells.push(vec![Scalar::Null; row]);
                    names.len() - 1
                }
            };

            let scalar = scalar_from_json(value).ok_or_else(|| TableError::NestedValue {
                column: names[position].clone(),
                row,
            })?;
            cells[position].push(scalar);
        }

        for column in cells.iter_mut().filter(|c| c.len() == row) {
            column.push(Scalar::Null);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Ok(Table::with_row_count(columns, rows)?)
}

pub fn encode(table: &Table) -> Result<Vec<u8>, BoxError> {
    let records: Vec<Value> = (0..table.num_rows())
        .map(|row| {
            let record: Map<String, Value> = table
                .columns()
                .iter()
                .map(|column| (column.name().to_string(), scalar_to_json(&column.values()[row])))
                .collect();
            Value::Object(record)
        })
        .collect();

    Ok(serde_json::to_vec(&Value::Array(records))?)
}
