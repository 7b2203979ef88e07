//! Column-type-specific in-place mutations.
//!
//! | prefix  | type     | coercion          | transform        |
//! |---------|----------|-------------------|------------------|
//! | `str`   | Text     | cast to text      | append `modify`  |
//! | `col`   | Integer  | parse `i64`       | add 1            |
//! | `date`  | DateTime | parse timestamp   | add 1 day        |
//! | `float` | Float    | parse `f64`       | multiply by 0.1  |
//!
//! Columns matching none of the prefixes are left untouched, whatever their source.
//! Coercion is a separate, untimed step ([`coerce`]); only [`apply`] is measured by the runner.

use colbench_columnar::{Column, ColumnData, ColumnType, Table, TableError, MICROS_PER_DAY};
use colbench_io::{declared_types, format_datetime_micros, parse_datetime_micros};
use thiserror::Error;

pub const TEXT_SUFFIX: &str = "modify";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column `{column}` row {row}: cannot parse {value:?} as {expected}")]
    Coerce {
        column: String,
        row: usize,
        value: String,
        expected: ColumnType,
    },
    #[error("column `{column}` holds {actual} values and cannot be coerced to {expected}")]
    Incompatible {
        column: String,
        actual: ColumnType,
        expected: ColumnType,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Which transform each column receives, in declaration order.
///
/// The kind comes from the column-name prefix for every source. `None` marks a column with no
/// recognized prefix; it is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformPlan {
    kinds: Vec<Option<ColumnType>>,
}

impl TransformPlan {
    pub fn for_table(table: &Table) -> Self {
        Self {
            kinds: declared_types(table),
        }
    }

    pub fn kinds(&self) -> &[Option<ColumnType>] {
        &self.kinds
    }

    pub fn skipped_columns(&self) -> usize {
        self.kinds.iter().filter(|k| k.is_none()).count()
    }

    /// Whether every planned column already holds its planned type.
    pub fn matches(&self, table: &Table) -> bool {
        table
            .columns()
            .iter()
            .zip(&self.kinds)
            .all(|(c, kind)| kind.map_or(true, |k| k == c.column_type()))
    }
}

/// Convert columns to the types named by `plan`.
///
/// Text parses to the planned type and any type casts to text. Columns already holding the
/// planned type, and unplanned columns, pass through unchanged.
pub fn coerce(table: Table, plan: &TransformPlan) -> Result<Table, TransformError> {
    let mut columns = Vec::with_capacity(table.column_count());
    for (column, kind) in table.into_columns().into_iter().zip(plan.kinds()) {
        columns.push(match kind {
            Some(kind) if *kind != column.column_type() => coerce_column(column, *kind)?,
            _ => column,
        });
    }
    Ok(Table::try_new(columns)?)
}

fn coerce_column(column: Column, expected: ColumnType) -> Result<Column, TransformError> {
    let (name, data) = column.into_parts();
    if expected == ColumnType::Text {
        let values = cast_to_text(&name, data)?;
        return Ok(Column::new(name, ColumnData::Text(values)));
    }

    let actual = data.column_type();
    let ColumnData::Text(values) = data else {
        return Err(TransformError::Incompatible {
            column: name,
            actual,
            expected,
        });
    };

    let fail = |row: usize, value: &str| TransformError::Coerce {
        column: name.clone(),
        row,
        value: value.to_owned(),
        expected,
    };

    let data = match expected {
        ColumnType::Text => ColumnData::Text(values),
        ColumnType::Integer => ColumnData::Integer(
            values
                .iter()
                .enumerate()
                .map(|(row, v)| v.trim().parse::<i64>().map_err(|_| fail(row, v)))
                .collect::<Result<_, _>>()?,
        ),
        ColumnType::Float => ColumnData::Float(
            values
                .iter()
                .enumerate()
                .map(|(row, v)| v.trim().parse::<f64>().map_err(|_| fail(row, v)))
                .collect::<Result<_, _>>()?,
        ),
        ColumnType::DateTime => ColumnData::DateTime(
            values
                .iter()
                .enumerate()
                .map(|(row, v)| parse_datetime_micros(v).ok_or_else(|| fail(row, v)))
                .collect::<Result<_, _>>()?,
        ),
    };

    Ok(Column::new(name, data))
}

/// Render values the way the CSV writer does.
fn cast_to_text(name: &str, data: ColumnData) -> Result<Vec<String>, TransformError> {
    Ok(match data {
        ColumnData::Text(values) => values,
        ColumnData::Integer(values) => values.iter().map(i64::to_string).collect(),
        ColumnData::Float(values) => values.iter().map(f64::to_string).collect(),
        ColumnData::DateTime(values) => values
            .iter()
            .enumerate()
            .map(|(row, v)| {
                format_datetime_micros(*v).ok_or_else(|| TransformError::Coerce {
                    column: name.to_owned(),
                    row,
                    value: v.to_string(),
                    expected: ColumnType::Text,
                })
            })
            .collect::<Result<_, _>>()?,
    })
}

/// Apply the per-type transform to every row of every planned column.
pub fn apply(table: &mut Table, plan: &TransformPlan) {
    for (column, kind) in table.columns_mut().iter_mut().zip(plan.kinds()) {
        if kind.is_none() {
            continue;
        }
        match column.data_mut() {
            ColumnData::Text(values) => {
                for v in values.iter_mut() {
                    v.push_str(TEXT_SUFFIX);
                }
            }
            ColumnData::Integer(values) => {
                for v in values.iter_mut() {
                    *v = v.wrapping_add(1);
                }
            }
            ColumnData::DateTime(values) => {
                for v in values.iter_mut() {
                    *v = v.saturating_add(MICROS_PER_DAY);
                }
            }
            ColumnData::Float(values) => {
                for v in values.iter_mut() {
                    *v *= 0.1;
                }
            }
        }
    }
}

/// Build the plan for `table` and run the untimed coercion step.
///
/// CSV sources are always coerced. Schema-preserving sources skip coercion unless a column's
/// native type disagrees with its prefix.
pub fn prepare(
    table: Table,
    was_csv_sourced: bool,
) -> Result<(Table, TransformPlan), TransformError> {
    let plan = TransformPlan::for_table(&table);
    if plan.skipped_columns() > 0 {
        log::warn!(
            "{} column(s) have no recognized type prefix and are left untouched",
            plan.skipped_columns()
        );
    }
    let table = if was_csv_sourced || !plan.matches(&table) {
        coerce(table, &plan)?
    } else {
        table
    };
    Ok((table, plan))
}

/// Coerce (for CSV sources) and transform `table` in one call.
pub fn modify(table: Table, was_csv_sourced: bool) -> Result<Table, TransformError> {
    let (mut table, plan) = prepare(table, was_csv_sourced)?;
    apply(&mut table, &plan);
    Ok(table)
}
