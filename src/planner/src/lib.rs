//! Turns a raw, parser-produced `ast::Plan` into a planned one: every
//! column reference resolved to an offset, every operator/function call
//! resolved to a concrete overload, and the source validated against the
//! catalog. Planning never touches a row - any error here is reported
//! before execution begins.

mod error;
mod expr;
mod plan;

pub use error::PlannerError;
pub use expr::Schema;
pub use plan::{compile_plan, CompiledPlan};

use ast::Plan;
use catalog::Catalog;
use functions::Registry;

/// Validates and compiles `plan` against `catalog`'s registered tables and
/// `registry`'s function overloads.
pub fn validate(plan: Plan, catalog: &Catalog, registry: &Registry) -> Result<CompiledPlan, PlannerError> {
    compile_plan(plan, catalog, registry)
}
