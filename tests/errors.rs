use catalog::Table;
use data::{DataType, Datum};
use proptest::prelude::*;
use runtime::Engine;

fn int_table(values: &[i64]) -> Table {
    let mut table = Table::new(vec![("v".to_string(), DataType::Int)]);
    for v in values {
        table.push_row(vec![Datum::from(*v)]);
    }
    table
}

proptest! {
    /// `summarize s = sum(c)` equals the plain sum
    /// of `c` over every row.
    #[test]
    fn summarize_sum_matches_plain_sum(values in prop::collection::vec(-1000_i64..1000, 1..30)) {
        let mut engine = Engine::new_for_test();
        let total: i64 = values.iter().sum();
        engine.register("T", int_table(&values)).unwrap();
        let result = engine.execute("T | summarize s = sum(v)");
        prop_assert!(result.error.is_none());
        prop_assert_eq!(result.rows, vec![vec![Datum::from(total)]]);
    }
}

/// an empty (whitespace-only) query reports a
/// parse error and zero rows.
#[test]
fn whitespace_only_query_is_a_parse_error() {
    let engine = Engine::new_for_test();
    let result = engine.execute("   \n\t ");
    assert_eq!(result.row_count, 0);
    let error = result.error.expect("expected an error");
    assert!(error.starts_with("ParseError"), "got: {}", error);
}

/// an unknown identifier is rejected before any
/// row is touched, even against an empty table.
#[test]
fn unknown_column_is_rejected_before_touching_rows() {
    let mut engine = Engine::new_for_test();
    engine.register("Empty", Table::new(vec![("a".to_string(), DataType::Int)])).unwrap();
    let result = engine.execute("Empty | where nonexistent_column == 1");
    assert_eq!(result.row_count, 0);
    let error = result.error.expect("expected an error");
    assert!(error.starts_with("SemanticError"), "got: {}", error);
}
