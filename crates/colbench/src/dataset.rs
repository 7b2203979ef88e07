//! Synthetic dataset generation.

use chrono::Utc;
use colbench_columnar::{Column, ColumnData, Table};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }

    /// Always even: half the columns come from each branch of the complexity class.
    pub fn column_count(self) -> usize {
        match self {
            SizeClass::Small => 10,
            SizeClass::Medium => 100,
            SizeClass::Large => 1_000,
        }
    }

    pub fn row_count(self) -> usize {
        match self {
            SizeClass::Small => 10_000,
            SizeClass::Medium => 100_000,
            SizeClass::Large => 1_000_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityClass {
    /// Alternating integer / string columns.
    Simple,
    /// Alternating datetime / float columns.
    Complex,
}

impl ComplexityClass {
    pub const ALL: [ComplexityClass; 2] = [ComplexityClass::Simple, ComplexityClass::Complex];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityClass::Simple => "simple",
            ComplexityClass::Complex => "complex",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownClass {
    kind: &'static str,
    value: String,
}

impl FromStr for SizeClass {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeClass::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownClass {
                kind: "size class",
                value: s.to_owned(),
            })
    }
}

impl FromStr for ComplexityClass {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplexityClass::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownClass {
                kind: "complexity class",
                value: s.to_owned(),
            })
    }
}

/// Build the synthetic table for one (size, complexity) group.
pub fn generate(size: SizeClass, complexity: ComplexityClass) -> Table {
    generate_with_shape(size.column_count(), size.row_count(), complexity)
}

/// Build a synthetic table with an explicit shape.
///
/// `column_count / 2` column pairs are produced; an odd trailing column is not generated.
/// Every value in a column is the same:
/// - simple: `col_{i}` holds `i`, `str_col_{i}` holds `"str_{i}"`
/// - complex: `date_col_{i}` holds the instant the column was built, `float_col_{i}` holds
///   `i * 0.1`
pub fn generate_with_shape(
    column_count: usize,
    row_count: usize,
    complexity: ComplexityClass,
) -> Table {
    let pairs = column_count / 2;
    let mut columns = Vec::with_capacity(pairs * 2);

    for i in 0..pairs {
        match complexity {
            ComplexityClass::Simple => {
                columns.push(Column::new(
                    format!("col_{i}"),
                    ColumnData::Integer(vec![i as i64; row_count]),
                ));
                columns.push(Column::new(
                    format!("str_col_{i}"),
                    ColumnData::Text(vec![format!("str_{i}"); row_count]),
                ));
            }
            ComplexityClass::Complex => {
                let now = Utc::now().timestamp_micros();
                columns.push(Column::new(
                    format!("date_col_{i}"),
                    ColumnData::DateTime(vec![now; row_count]),
                ));
                columns.push(Column::new(
                    format!("float_col_{i}"),
                    ColumnData::Float(vec![i as f64 * 0.1; row_count]),
                ));
            }
        }
    }

    Table::try_new(columns).expect("generated columns have unique names and equal lengths")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_classes_have_even_column_counts() {
        for size in SizeClass::ALL {
            assert_eq!(size.column_count() % 2, 0, "{size}");
        }
    }

    #[test]
    fn classes_parse_case_insensitively() {
        assert_eq!("Medium".parse::<SizeClass>(), Ok(SizeClass::Medium));
        assert_eq!(" complex".parse::<ComplexityClass>(), Ok(ComplexityClass::Complex));
        assert!("huge".parse::<SizeClass>().is_err());
    }

    #[test]
    fn odd_column_count_drops_trailing_column() {
        let table = generate_with_shape(5, 3, ComplexityClass::Simple);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.row_count(), 3);
    }
}
