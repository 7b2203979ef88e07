use std::fmt;

/// Text layout used for [`ColumnType::DateTime`] values in textual formats.
pub const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Number of microseconds in one calendar day.
pub const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Logical type carried by every column.
///
/// Schema-preserving containers (Parquet) store this natively. Textual containers (CSV) only
/// keep it through the column-name prefix, see [`ColumnType::from_name_prefix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    /// Microseconds since the Unix epoch, no timezone.
    DateTime,
}

impl ColumnType {
    /// Recover the intended type of a column from its name.
    ///
    /// Exactly four prefixes are recognized: `str`, `col`, `date` and `float`. Names matching
    /// none of them return `None`.
    pub fn from_name_prefix(name: &str) -> Option<Self> {
        if name.starts_with("str") {
            Some(ColumnType::Text)
        } else if name.starts_with("col") {
            Some(ColumnType::Integer)
        } else if name.starts_with("date") {
            Some(ColumnType::DateTime)
        } else if name.starts_with("float") {
            Some(ColumnType::Float)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    DateTime(i64),
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Text(_) => ColumnType::Text,
            Value::DateTime(_) => ColumnType::DateTime,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_map_to_types() {
        assert_eq!(ColumnType::from_name_prefix("col_3"), Some(ColumnType::Integer));
        assert_eq!(ColumnType::from_name_prefix("str_col_3"), Some(ColumnType::Text));
        assert_eq!(ColumnType::from_name_prefix("date_col_0"), Some(ColumnType::DateTime));
        assert_eq!(ColumnType::from_name_prefix("float_col_9"), Some(ColumnType::Float));
        assert_eq!(ColumnType::from_name_prefix("id"), None);
        assert_eq!(ColumnType::from_name_prefix("Col_1"), None);
    }
}
