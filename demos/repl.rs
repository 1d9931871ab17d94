//! Interactive and single-shot query runner for the pipeline query engine.
//!
//! Registers the same security-log tables the embedding application's
//! synthetic data generator produces (see
//! `original_source/backend/app/simulators/log_data.py`) and either runs
//! one query passed with `-e`/`--execute`, or drops into a line-oriented
//! REPL reading queries from stdin until EOF or `exit`.

use anyhow::Result;
use catalog::Table;
use chrono::{Duration, Utc};
use clap::{App, Arg};
use data::{DataType, Datum};
use runtime::{Engine, EngineConfig, QueryResult};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let matches = App::new("ql-repl")
        .version("0.1.0")
        .about("Runs pipeline queries against a set of demo security-log tables")
        .arg(
            Arg::with_name("execute")
                .short("e")
                .long("execute")
                .value_name("QUERY")
                .help("Run a single query and exit instead of starting the REPL")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("max-rows")
                .long("max-rows")
                .value_name("N")
                .help("Cap the size of any intermediate row set")
                .takes_value(true),
        )
        .get_matches();

    let max_rows = matches
        .value_of("max-rows")
        .map(|s| s.parse::<usize>())
        .transpose()?;

    let engine = build_demo_engine(max_rows)?;

    match matches.value_of("execute") {
        Some(query) => run_one(&engine, query),
        None => run_repl(&engine),
    }
}

fn build_demo_engine(max_rows: Option<usize>) -> Result<Engine> {
    let mut engine = Engine::new(EngineConfig { max_rows });
    let now = Utc::now();
    engine.register("SignInLogs", sign_in_logs(now))?;
    engine.register("SecurityAlert", security_alert())?;
    engine.register("DeviceProcessEvents", device_process_events(now))?;
    engine.register("OfficeActivity", office_activity())?;
    Ok(engine)
}

fn run_one(engine: &Engine, query: &str) -> Result<()> {
    print_result(&engine.execute(query));
    Ok(())
}

fn run_repl(engine: &Engine) -> Result<()> {
    println!("ql-repl - type a query, or `exit` / `quit` to leave. Ctrl-D also exits.");
    let stdin = io::stdin();
    loop {
        print!("ql> ");
        io::stdout().flush()?;
        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line)?;
        if bytes_read == 0 {
            println!();
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "exit" || query == "quit" {
            break;
        }
        print_result(&engine.execute(query));
    }
    Ok(())
}

fn print_result(result: &QueryResult) {
    if let Some(error) = &result.error {
        eprintln!("error: {}", error);
        return;
    }
    let header: Vec<&str> = result.columns.iter().map(|(name, _)| name.as_str()).collect();
    println!("{}", header.join("\t"));
    for row in &result.rows {
        let rendered: Vec<String> = row.iter().map(|datum| format!("{}", datum)).collect();
        println!("{}", rendered.join("\t"));
    }
    println!(
        "({} row{}, {}ms)",
        result.row_count,
        if result.row_count == 1 { "" } else { "s" },
        result.execution_time_ms
    );
}

fn sign_in_logs(now: chrono::DateTime<Utc>) -> Table {
    let mut table = Table::new(vec![
        ("TimeGenerated".to_string(), DataType::DateTime),
        ("UserPrincipalName".to_string(), DataType::String),
        ("Status".to_string(), DataType::String),
        ("IPAddress".to_string(), DataType::String),
    ]);
    let users = [
        "alice.johnson@contoso.com",
        "bob.smith@contoso.com",
        "carol.white@contoso.com",
        "david.brown@contoso.com",
        "eve.davis@contoso.com",
    ];
    let ips = ["203.0.113.5", "198.51.100.23", "192.0.2.77"];
    for i in 0..200_i64 {
        let status = if i % 7 == 0 { "Failure" } else { "Success" };
        table.push_row(vec![
            Datum::from(now - Duration::minutes(i)),
            Datum::from(users[i as usize % users.len()]),
            Datum::from(status),
            Datum::from(ips[i as usize % ips.len()]),
        ]);
    }
    table
}

fn security_alert() -> Table {
    let mut table = Table::new(vec![
        ("AlertName".to_string(), DataType::String),
        ("AlertSeverity".to_string(), DataType::String),
        ("Status".to_string(), DataType::String),
    ]);
    for (name, severity, status) in [
        ("Suspicious PowerShell command line", "High", "New"),
        ("Credential dumping via comsvcs.dll", "High", "New"),
        ("Impossible travel sign-in", "High", "InProgress"),
        ("Phishing email detected", "Medium", "Resolved"),
        ("Unusual sign-in from unfamiliar location", "Low", "Resolved"),
        ("Outdated TLS version in use", "Informational", "Resolved"),
    ] {
        table.push_row(vec![Datum::from(name), Datum::from(severity), Datum::from(status)]);
    }
    table
}

fn device_process_events(now: chrono::DateTime<Utc>) -> Table {
    let mut table = Table::new(vec![
        ("TimeGenerated".to_string(), DataType::DateTime),
        ("DeviceName".to_string(), DataType::String),
        ("FileName".to_string(), DataType::String),
        ("ProcessCommandLine".to_string(), DataType::String),
    ]);
    let rows = [
        ("DESKTOP-FIN-001", "powershell.exe", "powershell -enc SQBFAFgA..."),
        ("DESKTOP-IT-042", "cmd.exe", "cmd /c whoami"),
        ("LAPTOP-EXEC-001", "powershell.exe", "powershell -nop -w hidden"),
        ("SRV-DC-01", "explorer.exe", "explorer.exe"),
        ("SRV-FILE-02", "powershell.exe", "powershell Get-Process"),
        ("DESKTOP-FIN-001", "powershell.exe", "powershell -c IEX(New-Object Net.WebClient)"),
        ("DESKTOP-IT-042", "chrome.exe", "chrome.exe --headless"),
    ];
    for (i, (device, file, cmdline)) in rows.iter().enumerate() {
        table.push_row(vec![
            Datum::from(now - Duration::minutes(i as i64)),
            Datum::from(*device),
            Datum::from(*file),
            Datum::from(*cmdline),
        ]);
    }
    table
}

fn office_activity() -> Table {
    let mut table = Table::new(vec![
        ("UserId".to_string(), DataType::String),
        ("Operation".to_string(), DataType::String),
    ]);
    let rows: &[(&str, &[&str])] = &[
        ("alice.johnson@contoso.com", &["FileDownloaded", "FileDownloaded", "FileAccessed"]),
        ("bob.smith@contoso.com", &["FileUploaded", "FileAccessed"]),
        ("carol.white@contoso.com", &["MailItemsAccessed"]),
    ];
    for (user, operations) in rows {
        for operation in *operations {
            table.push_row(vec![Datum::from(*user), Datum::from(*operation)]);
        }
    }
    table
}
