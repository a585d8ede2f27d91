//! In-memory table model.
//!
//! A `Table` is an ordered list of uniquely named columns of equal length.
//! Each column keeps the arrow `DataType` and nullability it was read with
//! so Parquet schemas survive a round trip; text formats infer the type
//! from the cells. Parquet columns whose type has no `Scalar` form keep
//! their arrow array and are written back untouched.

use std::collections::HashSet;
use std::fmt;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::DataType;

use crate::error::TableError;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    /// Only for integers above `i64::MAX`; smaller ones are always `Int`.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Render a float so it never reads back as an integer: `1.0`, `0.25`,
/// `1e21`, `NaN`, `inf`.
pub fn render_float(value: f64) -> String {
    format!("{:?}", value)
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            Scalar::Float(v) => f.write_str(&render_float(*v)),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Scalar::UInt(value), Scalar::Int)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// Pick the narrowest common type for a set of cells.
///
/// All nulls → `Null`; integers → `Int64`, or `UInt64` when one exceeds
/// `i64::MAX` and none is negative; integers mixed with floats →
/// `Float64`; booleans → `Boolean`; anything else → `Utf8`.
pub fn infer_data_type(values: &[Scalar]) -> DataType {
    let (mut bools, mut ints, mut negative, mut uints, mut floats, mut strs) =
        (false, false, false, false, false, false);
    for value in values {
        match value {
            Scalar::Null => {}
            Scalar::Bool(_) => bools = true,
            Scalar::Int(i) => {
                ints = true;
                negative |= *i < 0;
            }
            Scalar::UInt(_) => uints = true,
            Scalar::Float(_) => floats = true,
            Scalar::Str(_) => strs = true,
        }
    }

    if strs || (bools && (ints || uints || floats)) {
        return DataType::Utf8;
    }
    if bools {
        return DataType::Boolean;
    }
    if floats {
        return DataType::Float64;
    }
    match (ints, uints) {
        (false, false) => DataType::Null,
        (_, false) => DataType::Int64,
        // No integer type holds both.
        (true, true) if negative => DataType::Utf8,
        (_, true) => DataType::UInt64,
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data_type: DataType,
    nullable: bool,
    values: Vec<Scalar>,
    native: Option<ArrayRef>,
}

impl Column {
    /// Build a column, inferring its type from the cells.
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        let data_type = infer_data_type(&values);
        Self::with_type(name, data_type, values)
    }

    pub fn with_type(name: impl Into<String>, data_type: DataType, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            values,
            native: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Attach the arrow array the cells were rendered from. The codec
    /// writes it back as is; `values` are then display text only.
    pub(crate) fn with_native(mut self, array: ArrayRef) -> Self {
        self.native = Some(array);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn native_array(&self) -> Option<&ArrayRef> {
        self.native.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.data_type == other.data_type
            && self.nullable == other.nullable
            && self.values == other.values
            && self.native.as_ref().map(|a| a.to_data()) == other.native.as_ref().map(|a| a.to_data())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Build a table, checking that names are unique and every column has
    /// the same length. The row count is the first column's length.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map_or(0, Column::len);
        Self::with_row_count(columns, rows)
    }

    /// Build a table with an explicit row count, which a table without
    /// columns needs (`[{}, {}]` has two rows).
    pub fn with_row_count(columns: Vec<Column>, rows: usize) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != rows {
                return Err(TableError::RaggedColumn {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Copy of the table where every column named in `names` holds `value`
    /// in each row, typed `data_type`. Position and nullability are kept;
    /// names the table lacks are ignored. Cannot break the table invariants.
    pub fn with_filled_columns(&self, names: &HashSet<&str>, data_type: &DataType, value: &Scalar) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                if names.contains(column.name()) {
                    Column::with_type(column.name(), data_type.clone(), vec![value.clone(); self.rows])
                        .with_nullable(column.is_nullable())
                } else {
                    column.clone()
                }
            })
            .collect();

        Table {
            columns,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Date32Array;
    use std::sync::Arc;

    #[test]
    fn test_infer_data_type() {
        assert_eq!(infer_data_type(&[]), DataType::Null);
        assert_eq!(infer_data_type(&[Scalar::Null]), DataType::Null);
        assert_eq!(infer_data_type(&[Scalar::Int(1), Scalar::Null]), DataType::Int64);
        assert_eq!(infer_data_type(&[Scalar::Int(1), Scalar::Float(2.5)]), DataType::Float64);
        assert_eq!(infer_data_type(&[Scalar::Bool(true)]), DataType::Boolean);
        assert_eq!(infer_data_type(&[Scalar::from("a"), Scalar::Int(1)]), DataType::Utf8);
        assert_eq!(infer_data_type(&[Scalar::Bool(true), Scalar::Int(1)]), DataType::Utf8);
    }

    #[test]
    fn test_infer_unsigned() {
        let huge = Scalar::from(u64::MAX);
        assert_eq!(huge, Scalar::UInt(u64::MAX));
        assert_eq!(Scalar::from(7u64), Scalar::Int(7));

        assert_eq!(infer_data_type(&[huge.clone(), Scalar::Int(3)]), DataType::UInt64);
        assert_eq!(infer_data_type(&[huge.clone(), Scalar::Int(-3)]), DataType::Utf8);
        assert_eq!(infer_data_type(&[huge.clone(), Scalar::Float(0.5)]), DataType::Float64);
        assert_eq!(huge.to_string(), "18446744073709551615");
    }

    #[test]
    fn test_render_float_keeps_fraction() {
        assert_eq!(render_float(1.0), "1.0");
        assert_eq!(render_float(0.25), "0.25");
        assert_eq!(render_float(-3.5), "-3.5");
        assert!(render_float(1e21).parse::<i64>().is_err());
    }

    #[test]
    fn test_table_rejects_duplicates() {
        let result = Table::new(vec![
            Column::new("id", vec![Scalar::Int(1)]),
            Column::new("id", vec![Scalar::Int(2)]),
        ]);
        assert_eq!(result, Err(TableError::DuplicateColumn("id".to_string())));
    }

    #[test]
    fn test_table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("id", vec![Scalar::Int(1), Scalar::Int(2)]),
            Column::new("name", vec![Scalar::from("a")]),
        ]);
        assert_eq!(
            result,
            Err(TableError::RaggedColumn {
                column: "name".to_string(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_row_count_without_columns() {
        let table = Table::with_row_count(vec![], 2).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_ne!(table, Table::default());

        let ragged = Table::with_row_count(vec![Column::new("id", vec![Scalar::Int(1)])], 2);
        assert!(matches!(ragged, Err(TableError::RaggedColumn { .. })));
    }

    #[test]
    fn test_table_accessors() {
        let table = Table::new(vec![
            Column::new("id", vec![Scalar::Int(1), Scalar::Int(2)]),
            Column::new("name", vec![Scalar::from("a"), Scalar::Null]),
        ])
        .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert!(table.has_column("name"));
        assert!(!table.has_column("email"));
        assert_eq!(table.column("name").unwrap().data_type(), &DataType::Utf8);
        assert!(table.column("name").unwrap().is_nullable());
    }

    #[test]
    fn test_with_filled_columns() {
        let table = Table::new(vec![
            Column::new("id", vec![Scalar::Int(1), Scalar::Int(2)]).with_nullable(false),
            Column::new("name", vec![Scalar::from("a"), Scalar::Null]),
        ])
        .unwrap();

        let names: HashSet<&str> = ["id", "missing"].into_iter().collect();
        let filled = table.with_filled_columns(&names, &DataType::Utf8, &Scalar::from("x"));

        let id = filled.column("id").unwrap();
        assert_eq!(id.data_type(), &DataType::Utf8);
        assert_eq!(id.values(), &[Scalar::from("x"), Scalar::from("x")]);
        assert!(!id.is_nullable());
        assert_eq!(filled.column("name"), table.column("name"));
        assert_eq!(filled.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_native_array_takes_part_in_equality() {
        let dates: ArrayRef = Arc::new(Date32Array::from(vec![19000]));
        let column = Column::with_type("dob", DataType::Date32, vec![Scalar::from("2022-01-08")])
            .with_native(dates.clone());

        assert_eq!(column.native_array().map(|a| a.len()), Some(1));
        assert_eq!(column, column.clone());

        let other: ArrayRef = Arc::new(Date32Array::from(vec![19001]));
        let changed = Column::with_type("dob", DataType::Date32, vec![Scalar::from("2022-01-08")])
            .with_native(other);
        assert_ne!(column, changed);
    }
}
