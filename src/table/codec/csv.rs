//! CSV codec.
//!
//! The first record is the header. Cell types are inferred per column in a
//! fixed order: every non-empty cell an integer → `Int64` (or `UInt64` past
//! `i64::MAX`), else every non-empty cell a finite float → `Float64`, else
//! `Utf8`. Empty cells are null. Words such as `NaN` or `inf` stay text.

use std::io;

use ::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::DataType;

use crate::error::{BoxError, TableError};
use crate::table::model::{infer_data_type, Column, Scalar, Table};

/// Largest integer magnitude an `f64` holds exactly.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

pub fn decode(bytes: &[u8]) -> Result<Table, BoxError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(TableError::MissingHeader.into());
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push((!field.is_empty()).then(|| field.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Ok(Table::new(columns)?)
}

fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let present = || raw.iter().flatten();

    if present().next().is_none() {
        let len = raw.len();
        return Column::with_type(name, DataType::Null, vec![Scalar::Null; len]);
    }

    if present().all(|cell| parse_integer(cell).is_some()) {
        let values = parse_cells(&raw, parse_integer);
        let data_type = infer_data_type(&values);
        if data_type != DataType::Utf8 {
            return Column::with_type(name, data_type, values);
        }
    }

    if present().all(|cell| parse_float(cell).is_some()) {
        let values = parse_cells(&raw, parse_float);
        return Column::with_type(name, DataType::Float64, values);
    }

    let values = raw
        .into_iter()
        .map(|cell| cell.map_or(Scalar::Null, Scalar::Str))
        .collect();
    Column::with_type(name, DataType::Utf8, values)
}

fn parse_integer(cell: &str) -> Option<Scalar> {
    cell.parse::<i64>()
        .map(Scalar::Int)
        .or_else(|_| cell.parse::<u64>().map(Scalar::UInt))
        .ok()
}

fn is_integer_literal(cell: &str) -> bool {
    let digits = cell.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(cell);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A float cell must be finite, and an integer written in a float column
/// must convert to `f64` without rounding.
fn parse_float(cell: &str) -> Option<Scalar> {
    if is_integer_literal(cell) {
        return cell
            .parse::<i64>()
            .ok()
            .filter(|v| v.unsigned_abs() <= MAX_EXACT_INTEGER)
            .map(|v| Scalar::Float(v as f64));
    }
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Scalar::Float)
}

fn parse_cells(raw: &[Option<String>], parse: fn(&str) -> Option<Scalar>) -> Vec<Scalar> {
    raw.iter()
        .map(|cell| cell.as_deref().and_then(parse).unwrap_or(Scalar::Null))
        .collect()
}

pub fn encode(table: &Table) -> Result<Vec<u8>, BoxError> {
    if table.num_columns() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.column_names())?;

    for row in 0..table.num_rows() {
        writer.write_record(
            table
                .columns()
                .iter()
                .map(|column| column.values()[row].to_string()),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "id,name,age,email\n1,James,25,hello@x\n2,Hamoud,30,hi@y\n";

    #[test]
    fn test_decode_header_and_types() {
        let table = decode(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["id", "name", "age", "email"]);
        assert_eq!(table.num_rows(), 2);

        let id = table.column("id").unwrap();
        assert_eq!(id.data_type(), &DataType::Int64);
        assert_eq!(id.values(), &[Scalar::Int(1), Scalar::Int(2)]);

        let name = table.column("name").unwrap();
        assert_eq!(name.data_type(), &DataType::Utf8);
        assert_eq!(name.values(), &[Scalar::from("James"), Scalar::from("Hamoud")]);

        let age = table.column("age").unwrap();
        assert_eq!(age.values(), &[Scalar::Int(25), Scalar::Int(30)]);
    }

    #[test]
    fn test_inference_order_is_int_float_string() {
        let table = decode(b"a,b,c,d\n1,1.5,x,\n2,2,3,\n").unwrap();

        assert_eq!(table.column("a").unwrap().data_type(), &DataType::Int64);

        let b = table.column("b").unwrap();
        assert_eq!(b.data_type(), &DataType::Float64);
        assert_eq!(b.values(), &[Scalar::Float(1.5), Scalar::Float(2.0)]);

        // One non-numeric cell makes the whole column text.
        let c = table.column("c").unwrap();
        assert_eq!(c.data_type(), &DataType::Utf8);
        assert_eq!(c.values(), &[Scalar::from("x"), Scalar::from("3")]);

        let d = table.column("d").unwrap();
        assert_eq!(d.data_type(), &DataType::Null);
        assert_eq!(d.values(), &[Scalar::Null, Scalar::Null]);
    }

    #[test]
    fn test_non_finite_words_stay_text() {
        let table = decode(b"a,b,c\nNan,1.5,1e999\nInf,infinity,2\n").unwrap();
        for name in ["a", "b", "c"] {
            assert_eq!(table.column(name).unwrap().data_type(), &DataType::Utf8);
        }
        assert_eq!(
            table.column("a").unwrap().values(),
            &[Scalar::from("Nan"), Scalar::from("Inf")]
        );

        let bytes = encode(&table).unwrap();
        assert_eq!(decode(&bytes).unwrap(), table);
    }

    #[test]
    fn test_wide_integers() {
        let table = decode(b"big,mixed,coarse\n18446744073709551615,18446744073709551615,9007199254740993\n1,-1,0.5\n").unwrap();

        let big = table.column("big").unwrap();
        assert_eq!(big.data_type(), &DataType::UInt64);
        assert_eq!(big.values(), &[Scalar::UInt(u64::MAX), Scalar::Int(1)]);

        // No integer type holds both, and f64 would round them.
        assert_eq!(table.column("mixed").unwrap().data_type(), &DataType::Utf8);
        assert_eq!(table.column("coarse").unwrap().data_type(), &DataType::Utf8);

        let bytes = encode(&table).unwrap();
        assert_eq!(decode(&bytes).unwrap(), table);
    }

    #[test]
    fn test_empty_cells_are_null() {
        let table = decode(b"id,score\n1,\n,2\n").unwrap();
        assert_eq!(
            table.column("id").unwrap().values(),
            &[Scalar::Int(1), Scalar::Null]
        );
        assert_eq!(
            table.column("score").unwrap().values(),
            &[Scalar::Null, Scalar::Int(2)]
        );
    }

    #[test]
    fn test_header_only() {
        let table = decode(b"id,name\n").unwrap();
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode(b"").is_err());
        // Row width must match the header.
        assert!(decode(b"a,b\n1,2,3\n").is_err());
        assert!(decode(b"a,a\n1,2\n").is_err());
    }

    #[test]
    fn test_encode_quotes_and_floats() {
        let table = Table::new(vec![
            Column::new("note", vec![Scalar::from("a, b"), Scalar::from("plain")]),
            Column::new("ratio", vec![Scalar::Float(1.0), Scalar::Null]),
        ])
        .unwrap();

        let bytes = encode(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "note,ratio\n\"a, b\",1.0\nplain,\n"
        );
    }

    #[test]
    fn test_round_trip_sample() {
        let table = decode(SAMPLE.as_bytes()).unwrap();
        let bytes = encode(&table).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), SAMPLE);
        assert_eq!(decode(&bytes).unwrap(), table);
    }

    fn arb_cell() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            any::<i64>().prop_map(|v| v.to_string()),
            any::<u64>().prop_map(|v| v.to_string()),
            any::<f64>().prop_map(|v| v.to_string()),
            "[A-Za-z ,\"]{1,6}",
            prop::sample::select(vec!["nan", "Inf", "-infinity", "1e999", "99999999999999999999999", "+7", ".5"])
                .prop_map(str::to_string),
        ]
    }

    fn arb_csv() -> impl Strategy<Value = Vec<u8>> {
        (2usize..5, 0usize..6).prop_flat_map(|(cols, rows)| {
            prop::collection::vec(prop::collection::vec(arb_cell(), cols), rows).prop_map(
                move |records| {
                    let mut writer = WriterBuilder::new().from_writer(Vec::new());
                    let header: Vec<String> = (0..cols).map(|i| format!("c{}", i)).collect();
                    writer.write_record(&header).unwrap();
                    for record in &records {
                        writer.write_record(record).unwrap();
                    }
                    writer.into_inner().unwrap()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_decoded_tables_round_trip(bytes in arb_csv()) {
            let table = decode(&bytes).unwrap();
            let encoded = encode(&table).unwrap();
            prop_assert_eq!(decode(&encoded).unwrap(), table);
        }
    }
}
