mod common;

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
    /// `T | take N` returns `min(N, |T|)` rows in
    /// registration order.
    #[test]
    fn take_returns_prefix_of_registration_order(
        values in prop::collection::vec(any::<i64>(), 0..30),
        n in 0_i64..40,
    ) {
        let mut engine = Engine::new_for_test();
        engine.register("T", int_table(&values)).unwrap();
        let result = engine.execute(&format!("T | take {}", n));
        prop_assert!(result.error.is_none());
        let expected_len = (n as usize).min(values.len());
        prop_assert_eq!(result.rows.len(), expected_len);
        for (row, expected) in result.rows.iter().zip(values.iter()) {
            prop_assert_eq!(&row[0], &Datum::from(*expected));
        }
    }

    /// `row_count` always matches the returned
    /// row vector's length.
    #[test]
    fn row_count_matches_returned_rows(
        values in prop::collection::vec(any::<i64>(), 0..30),
        n in 0_i64..40,
    ) {
        let mut engine = Engine::new_for_test();
        engine.register("T", int_table(&values)).unwrap();
        let result = engine.execute(&format!("T | take {}", n));
        prop_assert_eq!(result.row_count, result.rows.len());
    }

    /// `T | count` always returns exactly one row
    /// with `Count` equal to `|T|`.
    #[test]
    fn count_reports_exact_row_count(values in prop::collection::vec(any::<i64>(), 0..50)) {
        let mut engine = Engine::new_for_test();
        engine.register("T", int_table(&values)).unwrap();
        let result = engine.execute("T | count");
        prop_assert!(result.error.is_none());
        prop_assert_eq!(result.rows, vec![vec![Datum::from(values.len() as i64)]]);
    }

    /// `distinct` drops duplicate tuples and
    /// preserves first-seen order.
    #[test]
    fn distinct_has_no_duplicates_and_preserves_first_seen_order(
        values in prop::collection::vec(0_i64..5, 0..30),
    ) {
        let mut engine = Engine::new_for_test();
        engine.register("T", int_table(&values)).unwrap();
        let result = engine.execute("T | distinct v");
        prop_assert!(result.error.is_none());

        let mut seen = std::collections::HashSet::new();
        let mut expected_order = Vec::new();
        for v in &values {
            if seen.insert(*v) {
                expected_order.push(Datum::from(*v));
            }
        }
        let actual: Vec<Datum> = result.rows.iter().map(|row| row[0].clone()).collect();
        prop_assert_eq!(actual, expected_order);
    }
}

/// concurrent repeated execution of the same
/// query produces bit-identical `columns`/`rows`.
#[test]
fn concurrent_execution_is_deterministic() {
    use std::sync::Arc;
    use std::thread;

    let mut engine = Engine::new_for_test();
    engine.register("T", int_table(&[3, 1, 4, 1, 5, 9, 2, 6])).unwrap();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.execute("T | where v > 1 | order by v desc | take 3"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = &results[0];
    for result in &results[1..] {
        assert_eq!(result.columns, first.columns);
        assert_eq!(result.rows, first.rows);
    }
}
