#![forbid(unsafe_code)]

use crate::types::{ColumnType, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column name `{0}`")]
    DuplicateColumn(String),
    #[error("row has {actual} values, schema has {expected} columns")]
    RowWidth { expected: usize, actual: usize },
    #[error("column `{column}` expects {expected} values, got {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// Physical storage of one column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
    DateTime(Vec<i64>),
}

impl ColumnData {
    pub fn empty(column_type: ColumnType) -> Self {
        Self::with_capacity(column_type, 0)
    }

    pub fn with_capacity(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Integer => ColumnData::Integer(Vec::with_capacity(capacity)),
            ColumnType::Float => ColumnData::Float(Vec::with_capacity(capacity)),
            ColumnType::Text => ColumnData::Text(Vec::with_capacity(capacity)),
            ColumnType::DateTime => ColumnData::DateTime(Vec::with_capacity(capacity)),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::DateTime(_) => ColumnType::DateTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) | ColumnData::DateTime(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Integer(v) => v.get(row).copied().map(Value::Integer),
            ColumnData::Float(v) => v.get(row).copied().map(Value::Float),
            ColumnData::Text(v) => v.get(row).cloned().map(Value::Text),
            ColumnData::DateTime(v) => v.get(row).copied().map(Value::DateTime),
        }
    }

    /// Append one value; the value must match the column type.
    fn push(&mut self, value: Value) -> Result<(), ColumnType> {
        match (self, value) {
            (ColumnData::Integer(v), Value::Integer(x)) => v.push(x),
            (ColumnData::Float(v), Value::Float(x)) => v.push(x),
            (ColumnData::Text(v), Value::Text(x)) => v.push(x),
            (ColumnData::DateTime(v), Value::DateTime(x)) => v.push(x),
            (_, other) => return Err(other.column_type()),
        }
        Ok(())
    }

    fn heap_size_bytes(&self) -> usize {
        match self {
            ColumnData::Integer(v) | ColumnData::DateTime(v) => {
                v.capacity() * std::mem::size_of::<i64>()
            }
            ColumnData::Float(v) => v.capacity() * std::mem::size_of::<f64>(),
            ColumnData::Text(v) => {
                v.capacity() * std::mem::size_of::<String>()
                    + v.iter().map(|s| s.capacity()).sum::<usize>()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn schema(&self) -> ColumnSchema {
        ColumnSchema {
            name: self.name.clone(),
            column_type: self.column_type(),
        }
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub fn into_parts(self) -> (String, ColumnData) {
        (self.name, self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An immutable-shape, column-major table.
///
/// The number of rows and the column names are fixed at construction; values may be rewritten in
/// place through [`Table::columns_mut`] as long as every column keeps its length.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn try_new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_owned()));
            }
            if column.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: column.name().to_owned(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.columns.iter().map(Column::schema).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable access to the column values. Columns cannot be added or removed this way.
    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get(col)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<Value> {
        self.columns.get(col)?.data().get(row)
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Approximate heap footprint of the column buffers.
    pub fn memory_size_bytes(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.name.capacity() + c.data.heap_size_bytes())
            .sum()
    }
}

/// Row-at-a-time table construction for streaming decoders.
pub struct TableBuilder {
    schema: Vec<ColumnSchema>,
    data: Vec<ColumnData>,
    rows: usize,
}

impl TableBuilder {
    pub fn new(schema: Vec<ColumnSchema>) -> Self {
        let data = schema
            .iter()
            .map(|col| ColumnData::empty(col.column_type))
            .collect();
        Self {
            schema,
            data,
            rows: 0,
        }
    }

    pub fn append_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.data.len() {
            return Err(TableError::RowWidth {
                expected: self.data.len(),
                actual: row.len(),
            });
        }

        // Validate first so a bad row never leaves columns with uneven lengths.
        for (schema, value) in self.schema.iter().zip(&row) {
            if schema.column_type != value.column_type() {
                return Err(TableError::TypeMismatch {
                    column: schema.name.clone(),
                    expected: schema.column_type,
                    actual: value.column_type(),
                });
            }
        }
        for (data, value) in self.data.iter_mut().zip(row) {
            // Types were checked above.
            let _ = data.push(value);
        }

        self.rows += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> Result<Table, TableError> {
        let columns = self
            .schema
            .into_iter()
            .zip(self.data)
            .map(|(schema, data)| Column::new(schema.name, data))
            .collect();
        Table::try_new(columns)
    }
}
