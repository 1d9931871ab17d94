//! The embedding surface: register tables once, then run QL
//! queries against them through one entry point, `Engine::execute`,
//! which never panics or propagates - every failure collapses into the
//! result envelope's `error` field.

mod error;

pub use error::QueryError;

use catalog::{Catalog, CatalogError, Table};
use chrono::Utc;
use data::{DataType, Datum, Session};
use executor::SourceTable;
use functions::Registry;
use planner::CompiledPlan;
use serde::Deserialize;
use std::time::Instant;

/// Runtime knobs the embedding application can configure; just
/// `max_rows` for now, left unbounded by default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    pub max_rows: Option<usize>,
}

/// One query's outcome, successful or not. `columns`/`rows` are empty on
/// failure; `error` carries the rendered message of whichever stage failed.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<(String, DataType)>,
    pub rows: Vec<Vec<Datum>>,
    pub row_count: usize,
    pub execution_time_ms: u64,
    pub error: Option<String>,
}

/// Owns the table catalog and the function registry, and runs queries
/// against them. Registration happens only during startup; once
/// built, an `Engine` can be shared behind an `Arc` and queried from many
/// threads concurrently, since nothing here mutates after `register`.
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    registry: Registry,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            catalog: Catalog::new(),
            registry: Registry::new(),
            config,
        }
    }

    /// Convenience constructor for tests/demos: default config, no
    /// tables registered yet.
    pub fn new_for_test() -> Self {
        Engine::new(EngineConfig::default())
    }

    pub fn register(&mut self, name: impl Into<String>, table: Table) -> Result<(), CatalogError> {
        self.catalog.register(name, table)
    }

    /// Parses, plans, and executes `query`. `now()` is captured once here
    /// and shared by every `now()`/`ago()` call the query makes.
    pub fn execute(&self, query: &str) -> QueryResult {
        self.execute_at(query, Utc::now())
    }

    /// Same as `execute`, but with `now()` pinned to `now` instead of the
    /// system clock - lets callers (tests, replay tooling) get
    /// reproducible results out of time-aware predicates like `ago(1h)`.
    #[tracing::instrument(skip(self, query), fields(query = %query))]
    pub fn execute_at(&self, query: &str, now: chrono::DateTime<Utc>) -> QueryResult {
        let start = Instant::now();
        let session = Session::new(now);
        match self.run(query, &session) {
            Ok((columns, rows)) => {
                let row_count = rows.len();
                QueryResult {
                    columns,
                    rows,
                    row_count,
                    execution_time_ms: start.elapsed().as_millis() as u64,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "query failed");
                QueryResult {
                    columns: Vec::new(),
                    rows: Vec::new(),
                    row_count: 0,
                    execution_time_ms: start.elapsed().as_millis() as u64,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn run(&self, query: &str, session: &Session) -> Result<(Vec<(String, DataType)>, Vec<Vec<Datum>>), QueryError> {
        let plan = parser::parse(query)?;
        let compiled = planner::validate(plan, &self.catalog, &self.registry)?;
        let sources = self.gather_sources(&compiled)?;
        let (schema, rows) = executor::execute_plan(
            &compiled.plan,
            &compiled.stage_schemas,
            sources,
            session,
            self.config.max_rows,
        )?;
        Ok((schema, rows))
    }

    fn gather_sources(&self, compiled: &CompiledPlan) -> Result<Vec<SourceTable>, QueryError> {
        compiled
            .source_tables
            .iter()
            .map(|name| {
                let table = self.catalog.get(name).unwrap_or_else(|| {
                    panic!("planner resolved source table '{}' that the catalog no longer has", name)
                });
                Ok(SourceTable {
                    schema: table.columns().to_vec(),
                    rows: table.rows().to_vec(),
                })
            })
            .collect()
    }
}
