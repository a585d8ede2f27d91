//! Parquet codec via arrow record batches.
//!
//! Decode keeps each field's arrow type and nullability on the column;
//! encode rebuilds arrays of that exact type, so integer and float widths
//! round-trip. Fields with no scalar form (dates, timestamps, decimals,
//! binary, nested) keep their arrow array and are written back untouched;
//! their cells hold the rendered text.

use std::sync::Arc;

use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use ::parquet::arrow::ArrowWriter;
use arrow::array::{
    new_empty_array, Array, ArrayRef, ArrowPrimitiveType, AsArray, BooleanArray, LargeStringArray,
    NullArray, PrimitiveArray, StringArray, StringViewArray,
};
use arrow::compute::concat;
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;

use crate::error::{BoxError, TableError};
use crate::table::model::{Column, Scalar, Table};

pub fn decode(bytes: Vec<u8>) -> Result<Table, BoxError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes))?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut rows = 0;
    let mut chunks: Vec<Vec<ArrayRef>> = vec![Vec::new(); schema.fields().len()];
    for batch in reader {
        let batch = batch?;
        rows += batch.num_rows();
        for (column, array) in chunks.iter_mut().zip(batch.columns()) {
            column.push(array.clone());
        }
    }

    let columns = schema
        .fields()
        .iter()
        .zip(chunks)
        .map(|(field, chunks)| decode_column(field, &chunks))
        .collect::<Result<Vec<Column>, BoxError>>()?;

    Ok(Table::with_row_count(columns, rows)?)
}

fn decode_column(field: &Field, chunks: &[ArrayRef]) -> Result<Column, BoxError> {
    let array = match chunks {
        [] => new_empty_array(field.data_type()),
        [single] => single.clone(),
        _ => {
            let parts: Vec<&dyn Array> = chunks.iter().map(|a| a.as_ref()).collect();
            concat(&parts)?
        }
    };

    let name = field.name().clone();
    let data_type = field.data_type().clone();
    let column = match scalar_cells(array.as_ref()) {
        Some(values) => Column::with_type(name, data_type, values),
        None => {
            let values = render_cells(field.name(), array.as_ref())?;
            Column::with_type(name, data_type, values).with_native(array)
        }
    };

    Ok(column.with_nullable(field.is_nullable()))
}

fn primitive_cells<T: ArrowPrimitiveType>(
    array: &dyn Array,
    to_scalar: impl Fn(T::Native) -> Scalar,
) -> Vec<Scalar> {
    array
        .as_primitive::<T>()
        .iter()
        .map(|value| value.map_or(Scalar::Null, &to_scalar))
        .collect()
}

fn string_cells<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<Scalar> {
    values.map(|value| value.map_or(Scalar::Null, Scalar::from)).collect()
}

/// Cells for types that map onto `Scalar`; `None` for everything else.
fn scalar_cells(array: &dyn Array) -> Option<Vec<Scalar>> {
    let cells = match array.data_type() {
        DataType::Null => vec![Scalar::Null; array.len()],
        DataType::Boolean => array
            .as_boolean()
            .iter()
            .map(|value| value.map_or(Scalar::Null, Scalar::Bool))
            .collect(),
        DataType::Int8 => primitive_cells::<Int8Type>(array, |v| Scalar::Int(v.into())),
        DataType::Int16 => primitive_cells::<Int16Type>(array, |v| Scalar::Int(v.into())),
        DataType::Int32 => primitive_cells::<Int32Type>(array, |v| Scalar::Int(v.into())),
        DataType::Int64 => primitive_cells::<Int64Type>(array, Scalar::Int),
        DataType::UInt8 => primitive_cells::<UInt8Type>(array, |v| Scalar::Int(v.into())),
        DataType::UInt16 => primitive_cells::<UInt16Type>(array, |v| Scalar::Int(v.into())),
        DataType::UInt32 => primitive_cells::<UInt32Type>(array, |v| Scalar::Int(v.into())),
        DataType::UInt64 => primitive_cells::<UInt64Type>(array, |v: u64| Scalar::from(v)),
        DataType::Float32 => primitive_cells::<Float32Type>(array, |v| Scalar::Float(v.into())),
        DataType::Float64 => primitive_cells::<Float64Type>(array, Scalar::Float),
        DataType::Utf8 => string_cells(array.as_string::<i32>().iter()),
        DataType::LargeUtf8 => string_cells(array.as_string::<i64>().iter()),
        DataType::Utf8View => string_cells(array.as_string_view().iter()),
        _ => return None,
    };
    Some(cells)
}

/// Display text of each cell, for columns kept as arrow arrays.
fn render_cells(name: &str, array: &dyn Array) -> Result<Vec<Scalar>, TableError> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options).map_err(|_: ArrowError| {
        TableError::UnsupportedType {
            column: name.to_string(),
            data_type: array.data_type().to_string(),
        }
    })?;
    let nulls = array.logical_nulls();

    Ok((0..array.len())
        .map(|i| {
            if nulls.as_ref().is_some_and(|n| n.is_null(i)) {
                Scalar::Null
            } else {
                Scalar::Str(formatter.value(i).to_string())
            }
        })
        .collect())
}

fn out_of_range(column: &Column, cell: &Scalar) -> TableError {
    TableError::ValueOutOfRange {
        column: column.name().to_string(),
        value: format!("{:?}", cell),
        data_type: column.data_type().to_string(),
    }
}

fn int_array<T>(column: &Column) -> Result<ArrayRef, TableError>
where
    T: ArrowPrimitiveType,
    T::Native: TryFrom<i64> + TryFrom<u64>,
{
    let array = column
        .values()
        .iter()
        .map(|cell| match cell {
            Scalar::Null => Ok(None),
            Scalar::Int(v) => <T::Native as TryFrom<i64>>::try_from(*v)
                .map(Some)
                .map_err(|_| out_of_range(column, cell)),
            Scalar::UInt(v) => <T::Native as TryFrom<u64>>::try_from(*v)
                .map(Some)
                .map_err(|_| out_of_range(column, cell)),
            other => Err(out_of_range(column, other)),
        })
        .collect::<Result<PrimitiveArray<T>, _>>()?;
    Ok(Arc::new(array))
}

fn float_values(column: &Column) -> Result<Vec<Option<f64>>, TableError> {
    column
        .values()
        .iter()
        .map(|cell| match cell {
            Scalar::Null => Ok(None),
            Scalar::Float(v) => Ok(Some(*v)),
            Scalar::Int(v) => Ok(Some(*v as f64)),
            Scalar::UInt(v) => Ok(Some(*v as f64)),
            other => Err(out_of_range(column, other)),
        })
        .collect()
}

/// Text columns accept any cell; non-string cells are rendered.
fn text_values(column: &Column) -> Vec<Option<String>> {
    column
        .values()
        .iter()
        .map(|cell| match cell {
            Scalar::Null => None,
            Scalar::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}

fn build_array(column: &Column) -> Result<ArrayRef, TableError> {
    if let Some(native) = column.native_array() {
        return Ok(native.clone());
    }

    let array: ArrayRef = match column.data_type() {
        DataType::Null => Arc::new(NullArray::new(column.len())),
        DataType::Boolean => {
            let values = column
                .values()
                .iter()
                .map(|cell| match cell {
                    Scalar::Null => Ok(None),
                    Scalar::Bool(b) => Ok(Some(*b)),
                    other => Err(out_of_range(column, other)),
                })
                .collect::<Result<BooleanArray, _>>()?;
            Arc::new(values)
        }
        DataType::Int8 => int_array::<Int8Type>(column)?,
        DataType::Int16 => int_array::<Int16Type>(column)?,
        DataType::Int32 => int_array::<Int32Type>(column)?,
        DataType::Int64 => int_array::<Int64Type>(column)?,
        DataType::UInt8 => int_array::<UInt8Type>(column)?,
        DataType::UInt16 => int_array::<UInt16Type>(column)?,
        DataType::UInt32 => int_array::<UInt32Type>(column)?,
        DataType::UInt64 => int_array::<UInt64Type>(column)?,
        DataType::Float32 => Arc::new(
            float_values(column)?
                .into_iter()
                .map(|v| v.map(|v| v as f32))
                .collect::<PrimitiveArray<Float32Type>>(),
        ),
        DataType::Float64 => Arc::new(
            float_values(column)?
                .into_iter()
                .collect::<PrimitiveArray<Float64Type>>(),
        ),
        DataType::Utf8 => Arc::new(text_values(column).into_iter().collect::<StringArray>()),
        DataType::LargeUtf8 => {
            Arc::new(text_values(column).into_iter().collect::<LargeStringArray>())
        }
        DataType::Utf8View => {
            Arc::new(text_values(column).into_iter().collect::<StringViewArray>())
        }
        other => {
            return Err(TableError::UnsupportedType {
                column: column.name().to_string(),
                data_type: other.to_string(),
            })
        }
    };
    Ok(array)
}

pub fn encode(table: &Table) -> Result<Vec<u8>, BoxError> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|column| Field::new(column.name(), column.data_type().clone(), column.is_nullable()))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays = table
        .columns()
        .iter()
        .map(build_array)
        .collect::<Result<Vec<ArrayRef>, TableError>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));
    let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)?;

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(buffer)
}
