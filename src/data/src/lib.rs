// Re-exported as almost every crate using data will also need chrono.
pub use chrono;

mod datatype;
mod datum;
mod session;
mod timespan;

pub use datatype::DataType;
pub use datum::Datum;
pub use session::Session;
pub use timespan::Timespan;

/// General sort order, shared by `order by`/`sort by`/`top`.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_asc(&self) -> bool {
        *self == SortOrder::Asc
    }

    pub fn is_desc(&self) -> bool {
        *self == SortOrder::Desc
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}
