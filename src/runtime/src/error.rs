use std::fmt::{Display, Formatter};

/// Collapses the three per-crate error types a query can fail with into
/// one, purely so `Engine::execute` can use `?` across the pipeline
/// stages before rendering the result into `QueryResult::error` - it
/// never escapes this crate.
#[derive(Debug)]
pub enum QueryError {
    Parse(parser::ParseError),
    Plan(planner::PlannerError),
    Execution(executor::ExecutionError),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Parse(err) => Display::fmt(err, f),
            QueryError::Plan(err) => Display::fmt(err, f),
            QueryError::Execution(err) => Display::fmt(err, f),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<parser::ParseError> for QueryError {
    fn from(err: parser::ParseError) -> Self {
        QueryError::Parse(err)
    }
}

impl From<planner::PlannerError> for QueryError {
    fn from(err: planner::PlannerError) -> Self {
        QueryError::Plan(err)
    }
}

impl From<executor::ExecutionError> for QueryError {
    fn from(err: executor::ExecutionError) -> Self {
        QueryError::Execution(err)
    }
}
