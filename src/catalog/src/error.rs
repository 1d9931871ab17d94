use std::fmt::{Display, Formatter};

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum CatalogError {
    /// `register` was called with a name that's already registered -
    /// registration is write-once per name.
    DuplicateTable(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateTable(name) => write!(f, "DuplicateTable: {}", name),
        }
    }
}

impl std::error::Error for CatalogError {}
