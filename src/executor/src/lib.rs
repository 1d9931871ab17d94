//! Bulk, in-memory evaluation of a planned query: every operator is
//! bulk, in-memory, and finite - each one a pure
//! `(schema, Vec<Row>) -> (schema, Vec<Row>)` transform applied in
//! sequence. There is no retraction, no incremental state, and no
//! lifetime-juggling buffer reuse: a `summarize` here runs once over a
//! finite row-set rather than maintaining a materialized view.

mod error;
mod expr;
mod operators;

pub use error::ExecutionError;
pub use operators::{execute_plan, Row, Schema, SourceTable};
