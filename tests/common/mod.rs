use catalog::Table;
use chrono::{DateTime, Duration, Utc};
use data::{DataType, Datum};
use runtime::Engine;

/// Column names and table shapes mirror the security-log tables the
/// embedding application's synthetic data generator produces - only the
/// row counts and values are pinned here for deterministic tests.
pub fn fixture_engine() -> Engine {
    let mut engine = Engine::new_for_test();
    engine.register("SignInLogs", sign_in_logs(Utc::now())).unwrap();
    engine.register("SecurityAlert", security_alert()).unwrap();
    engine.register("DeviceProcessEvents", device_process_events()).unwrap();
    engine.register("OfficeActivity", office_activity()).unwrap();
    engine
}

/// 100 rows, 80 `Success` and 20 `Failure`, a clear failure count.
pub fn sign_in_logs(now: DateTime<Utc>) -> Table {
    let mut table = Table::new(vec![
        ("TimeGenerated".to_string(), DataType::DateTime),
        ("UserPrincipalName".to_string(), DataType::String),
        ("Status".to_string(), DataType::String),
    ]);
    let users = [
        "alice.johnson@contoso.com",
        "bob.smith@contoso.com",
        "carol.white@contoso.com",
        "david.brown@contoso.com",
        "eve.davis@contoso.com",
    ];
    for i in 0..100 {
        let status = if i < 80 { "Success" } else { "Failure" };
        let time_generated = now - Duration::minutes(i);
        table.push_row(vec![
            Datum::from(time_generated),
            Datum::from(users[i as usize % users.len()]),
            Datum::from(status),
        ]);
    }
    table
}

/// Severities `["High","High","Medium","Low"]`.
pub fn security_alert() -> Table {
    let mut table = Table::new(vec![
        ("AlertName".to_string(), DataType::String),
        ("AlertSeverity".to_string(), DataType::String),
    ]);
    for (name, severity) in [
        ("Suspicious PowerShell command line", "High"),
        ("Credential dumping via comsvcs.dll", "High"),
        ("Phishing email detected", "Medium"),
        ("Unusual sign-in from unfamiliar location", "Low"),
    ] {
        table.push_row(vec![Datum::from(name), Datum::from(severity)]);
    }
    table
}

/// Includes several `powershell.exe` rows.
pub fn device_process_events() -> Table {
    let mut table = Table::new(vec![
        ("TimeGenerated".to_string(), DataType::DateTime),
        ("DeviceName".to_string(), DataType::String),
        ("FileName".to_string(), DataType::String),
    ]);
    let now = Utc::now();
    let rows = [
        ("DESKTOP-FIN-001", "powershell.exe"),
        ("DESKTOP-IT-042", "cmd.exe"),
        ("LAPTOP-EXEC-001", "powershell.exe"),
        ("SRV-DC-01", "explorer.exe"),
        ("SRV-FILE-02", "powershell.exe"),
        ("DESKTOP-FIN-001", "powershell.exe"),
        ("DESKTOP-IT-042", "chrome.exe"),
    ];
    for (i, (device, file)) in rows.iter().enumerate() {
        table.push_row(vec![
            Datum::from(now - Duration::minutes(i as i64)),
            Datum::from(*device),
            Datum::from(*file),
        ]);
    }
    table
}

/// Per-user operation counts chosen so `top 2 by ops` has a clear,
/// tie-free answer.
pub fn office_activity() -> Table {
    let mut table = Table::new(vec![
        ("UserId".to_string(), DataType::String),
        ("Operation".to_string(), DataType::String),
    ]);
    let rows: &[(&str, usize)] = &[
        ("alice.johnson@contoso.com", 5),
        ("bob.smith@contoso.com", 3),
        ("carol.white@contoso.com", 1),
    ];
    for (user, count) in rows {
        for _ in 0..*count {
            table.push_row(vec![Datum::from(*user), Datum::from("FileDownloaded")]);
        }
    }
    table
}
