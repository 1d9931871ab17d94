mod common;

use chrono::{Duration, Utc};
use common::{fixture_engine, sign_in_logs};
use data::Datum;
use runtime::Engine;

/// Failed sign-ins are counted.
#[test]
fn signin_failures_are_counted() {
    let engine = fixture_engine();
    let result = engine.execute("SignInLogs | where Status == \"Failure\" | count");
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.rows, vec![vec![Datum::from(20_i64)]]);
}

/// Alerts group by severity in descending count order.
#[test]
fn security_alerts_group_by_severity_in_descending_count_order() {
    let engine = fixture_engine();
    let result =
        engine.execute("SecurityAlert | summarize c = count() by AlertSeverity | order by c desc");
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(
        result.rows,
        vec![
            vec![Datum::from("High"), Datum::from(2_i64)],
            vec![Datum::from("Medium"), Datum::from(1_i64)],
            vec![Datum::from("Low"), Datum::from(1_i64)],
        ]
    );
}

/// Process events are projected and capped.
#[test]
fn powershell_process_events_are_projected_and_capped() {
    let engine = fixture_engine();
    let result = engine.execute(
        "DeviceProcessEvents | where FileName == \"powershell.exe\" | project TimeGenerated, DeviceName | take 3",
    );
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(
        result.columns.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        vec!["TimeGenerated", "DeviceName"]
    );
    assert_eq!(result.row_count, 3);
}

/// Top users by operation count.
#[test]
fn office_activity_top_two_users_by_operation_count() {
    let engine = fixture_engine();
    let result = engine.execute("OfficeActivity | summarize ops = count() by UserId | top 2 by ops");
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.row_count, 2);
    assert_eq!(
        result.rows[0],
        vec![Datum::from("alice.johnson@contoso.com"), Datum::from(5_i64)]
    );
    assert_eq!(
        result.rows[1],
        vec![Datum::from("bob.smith@contoso.com"), Datum::from(3_i64)]
    );
}

/// An unknown table is reported before any row is touched.
#[test]
fn unknown_table_reports_unknown_table_error() {
    let engine = fixture_engine();
    let result = engine.execute("NonExistentTable | count");
    assert_eq!(result.row_count, 0);
    let error = result.error.expect("expected an error");
    assert!(error.starts_with("UnknownTable"), "got: {}", error);
}

/// Reproducible because `now()` is pinned via
/// `execute_at` rather than read from the system clock mid-test.
#[test]
fn signin_logs_within_the_last_hour_are_counted_against_a_fixed_now() {
    let mut engine = Engine::new_for_test();
    let now = Utc::now();
    engine.register("SignInLogs", sign_in_logs(now)).unwrap();
    let result = engine.execute_at("SignInLogs | where TimeGenerated > ago(1h) | count", now);
    assert!(result.error.is_none(), "{:?}", result.error);

    let expected = (0..100).filter(|&i| now - (now - Duration::minutes(i)) < Duration::hours(1)).count();
    assert_eq!(result.rows, vec![vec![Datum::from(expected as i64)]]);
}
