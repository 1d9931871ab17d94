use std::fmt::{Display, Formatter};

/// All planning failures - unresolved tables/columns, type mismatches,
/// aggregates used outside `summarize`, malformed literal arguments - are
/// reported before any row is touched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlannerError {
    UnknownTable {
        name: String,
        available: Vec<String>,
    },
    SemanticError(String),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannerError::UnknownTable { name, available } => write!(
                f,
                "UnknownTable: '{}' is not registered (available: {})",
                name,
                available.join(", ")
            ),
            PlannerError::SemanticError(message) => write!(f, "SemanticError: {}", message),
        }
    }
}

impl std::error::Error for PlannerError {}
