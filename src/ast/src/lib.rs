//! The query AST - expressions (`expr`) and the pipeline plan that ties
//! them together (`plan`). Both come in a raw, parser-produced shape and a
//! compiled, planner-resolved shape; see `expr::Expression` for the split.

mod expr;
mod plan;

pub use expr::{
    AggFunc, AggregateCall, BinOp, BinaryOpExpr, ColumnRef, CompiledAggregateCall,
    CompiledFunctionCall, Expression, FunctionCall, NamedExpression, ResolvedColumnRef, UnOp,
    UnaryOpExpr,
};
pub use plan::{Operator, OrderKey, Plan, Source};
