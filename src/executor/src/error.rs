use std::fmt::{Display, Formatter};

/// Failures that can only surface once rows are actually being processed -
/// everything else (unknown table/column, bad overload, aggregate misuse)
/// is caught by the planner before a single row is touched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ExecutionError {
    /// An intermediate row-set grew past the configured `max_rows` cap.
    ResourceLimit { limit: usize, actual: usize },
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::ResourceLimit { limit, actual } => write!(
                f,
                "ResourceLimit: intermediate row count {} exceeded the configured cap of {}",
                actual, limit
            ),
        }
    }
}

impl std::error::Error for ExecutionError {}
