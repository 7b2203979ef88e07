use colbench::{generate, generate_with_shape, ComplexityClass, SizeClass};
use colbench_columnar::{ColumnData, ColumnType, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn small_simple_matches_expected_layout() {
    let table = generate(SizeClass::Small, ComplexityClass::Simple);
    assert_eq!(table.column_count(), 10);
    assert_eq!(table.row_count(), 10_000);

    let names: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        vec![
            "col_0", "str_col_0", "col_1", "str_col_1", "col_2", "str_col_2", "col_3",
            "str_col_3", "col_4", "str_col_4",
        ]
    );

    let col_0 = table.column_by_name("col_0").unwrap();
    assert_eq!(col_0.data(), &ColumnData::Integer(vec![0; 10_000]));
    let str_col_0 = table.column_by_name("str_col_0").unwrap();
    assert_eq!(
        str_col_0.data(),
        &ColumnData::Text(vec!["str_0".to_string(); 10_000])
    );
    assert_eq!(
        table.column_by_name("col_3").unwrap().data().get(9_999),
        Some(Value::Integer(3))
    );
}

#[test]
fn small_complex_alternates_datetime_and_float() {
    let table = generate(SizeClass::Small, ComplexityClass::Complex);
    assert_eq!(table.column_count(), 10);
    assert_eq!(table.row_count(), 10_000);

    for (idx, column) in table.columns().iter().enumerate() {
        let i = idx / 2;
        if idx % 2 == 0 {
            assert_eq!(column.name(), format!("date_col_{i}"));
            assert_eq!(column.column_type(), ColumnType::DateTime);
        } else {
            assert_eq!(column.name(), format!("float_col_{i}"));
            assert_eq!(column.column_type(), ColumnType::Float);
            assert_eq!(column.data().get(0), Some(Value::Float(i as f64 * 0.1)));
        }
    }

    // One capture instant per column.
    let ColumnData::DateTime(values) = table.columns()[0].data() else {
        panic!("date_col_0 should hold datetimes");
    };
    assert!(values.iter().all(|v| *v == values[0]));
}

#[test]
fn column_names_carry_their_type_prefix() {
    for complexity in ComplexityClass::ALL {
        let table = generate_with_shape(6, 2, complexity);
        for column in table.columns() {
            assert_eq!(
                ColumnType::from_name_prefix(column.name()),
                Some(column.column_type()),
                "{}",
                column.name()
            );
        }
    }
}

fn complexity() -> impl Strategy<Value = ComplexityClass> {
    prop_oneof![Just(ComplexityClass::Simple), Just(ComplexityClass::Complex)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generated_shape_matches_request(
        columns in 2usize..40,
        rows in 0usize..64,
        complexity in complexity(),
    ) {
        let table = generate_with_shape(columns, rows, complexity);
        prop_assert_eq!(table.column_count(), columns / 2 * 2);
        prop_assert_eq!(table.column_count() % 2, 0);
        prop_assert_eq!(table.row_count(), rows);
        for column in table.columns() {
            prop_assert_eq!(column.len(), rows);
        }
    }
}
