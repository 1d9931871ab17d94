use crate::expr::{Expression, NamedExpression};
use data::SortOrder;

/// The thing a query reads from before any `|` operator runs.
///
/// The grammar (`query := source ("|" operator)*`) is deliberately flat,
/// so `Plan` keeps a single source and a `Vec` of pipeline stages rather
/// than a chain of parent/child nodes.
#[derive(Debug, Clone)]
pub enum Source {
    /// `TableName`
    Table(String),
    /// `union Table1, Table2, ...` - every member must share a
    /// union-compatible schema (same column count, pairwise-assignable
    /// types) once resolved by the planner.
    Union(Vec<String>),
}

/// One stage of a pipeline query, appearing after a `|`.
#[derive(Debug, Clone)]
pub enum Operator {
    Where(Expression),
    Project(Vec<NamedExpression>),
    Extend(Vec<NamedExpression>),
    Summarize {
        aggregates: Vec<NamedExpression>,
        by: Vec<String>,
    },
    OrderBy(Vec<OrderKey>),
    Take(i64),
    /// `top N by col [asc|desc]` - exactly one sort key, unlike
    /// `order by`'s list.
    Top {
        count: i64,
        by: OrderKey,
    },
    Count,
    Distinct(Vec<String>),
}

/// A single sort key, e.g. the `Column desc` part of `order by Column desc`.
#[derive(Debug, Clone)]
pub struct OrderKey {
    pub column: String,
    pub order: SortOrder,
}

/// The whole compiled (or not yet compiled) query: a source plus the
/// pipeline of operators applied to it, left to right.
#[derive(Debug, Clone)]
pub struct Plan {
    pub source: Source,
    pub operators: Vec<Operator>,
}

impl Plan {
    pub fn new(source: Source) -> Self {
        Plan {
            source,
            operators: Vec::new(),
        }
    }
}
