//! Format dispatch for table decoding and encoding.

use std::fmt;

use crate::error::CodecError;

use super::model::Table;

pub mod csv;
pub mod json;
pub mod parquet;

/// The closed set of supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    Csv,
    Json,
    Parquet,
}

impl TableFormat {
    pub const ALL: [TableFormat; 3] = [TableFormat::Csv, TableFormat::Json, TableFormat::Parquet];

    /// Map a resolved format tag onto a supported format, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| CodecError::UnsupportedFormat(tag.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
            TableFormat::Parquet => "parquet",
        }
    }

    pub fn decode(self, bytes: Vec<u8>) -> Result<Table, CodecError> {
        let decoded = match self {
            TableFormat::Csv => csv::decode(&bytes),
            TableFormat::Json => json::decode(&bytes),
            TableFormat::Parquet => parquet::decode(bytes),
        };
        decoded.map_err(|e| CodecError::decode(self, e))
    }

    pub fn encode(self, table: &Table) -> Result<Vec<u8>, CodecError> {
        let encoded = match self {
            TableFormat::Csv => csv::encode(table),
            TableFormat::Json => json::encode(table),
            TableFormat::Parquet => parquet::encode(table),
        };
        encoded.map_err(|e| CodecError::encode(self, e))
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode raw object content according to a format tag.
pub fn decode(bytes: Vec<u8>, tag: &str) -> Result<Table, CodecError> {
    TableFormat::from_tag(tag)?.decode(bytes)
}

/// Encode a table according to a format tag.
pub fn encode(table: &Table, tag: &str) -> Result<Vec<u8>, CodecError> {
    TableFormat::from_tag(tag)?.encode(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::{Column, Scalar};

    #[test]
    fn test_from_tag() {
        assert_eq!(TableFormat::from_tag("csv").unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_tag("JSON").unwrap(), TableFormat::Json);
        assert_eq!(TableFormat::from_tag("Parquet").unwrap(), TableFormat::Parquet);
        assert!(matches!(
            TableFormat::from_tag("gz"),
            Err(CodecError::UnsupportedFormat(tag)) if tag == "gz"
        ));
    }

    #[test]
    fn test_unsupported_format_is_not_a_decode_error() {
        let err = decode(b"a,b\n1,2\n".to_vec(), "xlsx").unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat(_)));

        let table = Table::new(vec![Column::new("a", vec![Scalar::Int(1)])]).unwrap();
        let err = encode(&table, "xml").unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_failures_are_decode_errors() {
        for format in TableFormat::ALL {
            let err = format.decode(b"\xff\x00{not valid".to_vec()).unwrap_err();
            assert!(
                matches!(err, CodecError::Decode { format: f, .. } if f == format),
                "{format}: {err}"
            );
        }
    }

    #[test]
    fn test_round_trip_every_format() {
        let table = Table::new(vec![
            Column::new("id", vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]),
            Column::new(
                "name",
                vec![Scalar::from("James"), Scalar::from("Hamoud"), Scalar::Null],
            ),
            Column::new(
                "score",
                vec![Scalar::Float(1.5), Scalar::Null, Scalar::Float(-2.0)],
            ),
        ])
        .unwrap();

        for format in TableFormat::ALL {
            let bytes = format.encode(&table).unwrap();
            let decoded = format.decode(bytes).unwrap();
            assert_eq!(decoded, table, "round trip through {format}");
        }
    }
}
