use data::{DataType, Datum};
use functions::{AggregateFunction, Function, FunctionSignature};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// The expression AST.
///
/// Expressions go through the same raw -> compiled split the planner uses
/// for the rest of the plan: `Column`/`FunctionCall`/`Aggregate` come
/// straight out of the parser with names the planner hasn't looked up yet;
/// `ResolvedColumn`/`CompiledFunctionCall`/`CompiledAggregate` are what the
/// planner rewrites them into once the source schema and function registry
/// have resolved every reference.
#[derive(Debug, Clone)]
pub enum Expression {
    Literal(Datum, DataType),
    Column(ColumnRef),
    ResolvedColumn(ResolvedColumnRef),
    BinaryOp(BinaryOpExpr),
    UnaryOp(UnaryOpExpr),
    FunctionCall(FunctionCall),
    CompiledFunctionCall(CompiledFunctionCall),
    Aggregate(AggregateCall),
    CompiledAggregate(CompiledAggregateCall),
}

/// An as-yet-unresolved reference to a column, straight from the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
}

/// A column reference once resolved to a position in the current schema.
#[derive(Debug, Clone)]
pub struct ResolvedColumnRef {
    pub name: String,
    pub offset: usize,
    pub datatype: DataType,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Contains,
    StartsWith,
    EndsWith,
    Has,
    MatchesRegex,
}

impl BinOp {
    /// The name this operator is registered under in `functions::Registry`.
    /// Operators are resolved through the exact same signature-matching
    /// path as named functions (`+` is just another overloaded function).
    pub fn function_name(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Contains => "contains",
            BinOp::StartsWith => "startswith",
            BinOp::EndsWith => "endswith",
            BinOp::Has => "has",
            BinOp::MatchesRegex => "matches_regex",
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.function_name())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UnOp {
    Not,
    Neg,
}

impl UnOp {
    pub fn function_name(self) -> &'static str {
        match self {
            UnOp::Not => "not",
            UnOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryOpExpr {
    pub op: BinOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct UnaryOpExpr {
    pub op: UnOp,
    pub expr: Box<Expression>,
}

/// A function call straight from the parser - `function_name` hasn't been
/// resolved against the registry yet.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub function_name: String,
    pub args: Vec<Expression>,
}

/// A scalar function call once resolved and type-checked.
#[derive(Clone)]
pub struct CompiledFunctionCall {
    pub function: &'static dyn Function,
    pub args: Box<[Expression]>,
    pub signature: FunctionSignature,
}

impl std::fmt::Debug for CompiledFunctionCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledFunctionCall")
            .field("signature", &self.signature)
            .field("args", &self.args)
            .finish()
    }
}

/// The aggregate functions, legal only as the top-level expression of a
/// `summarize` aggregation item.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AggFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    DCount,
    MakeList,
}

impl AggFunc {
    pub fn name(self) -> &'static str {
        match self {
            AggFunc::Count => "count",
            AggFunc::Sum => "sum",
            AggFunc::Avg => "avg",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::DCount => "dcount",
            AggFunc::MakeList => "make_list",
        }
    }

    pub fn from_name(name: &str) -> Option<AggFunc> {
        match name {
            "count" => Some(AggFunc::Count),
            "sum" => Some(AggFunc::Sum),
            "avg" => Some(AggFunc::Avg),
            "min" => Some(AggFunc::Min),
            "max" => Some(AggFunc::Max),
            "dcount" => Some(AggFunc::DCount),
            "make_list" => Some(AggFunc::MakeList),
            _ => None,
        }
    }

    /// `count()` is the only aggregate with no column argument.
    pub fn takes_argument(self) -> bool {
        self != AggFunc::Count
    }
}

impl Display for AggFunc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw aggregate call straight from the parser.
#[derive(Debug, Clone)]
pub struct AggregateCall {
    pub func: AggFunc,
    pub arg: Option<Box<Expression>>,
}

/// An aggregate call once resolved against the input schema, with its
/// return type computed: count/dcount -> int; sum/avg/min/max ->
/// the input column's numeric type, or real if the input is real; make_list
/// -> string.
#[derive(Clone)]
pub struct CompiledAggregateCall {
    pub function: &'static dyn AggregateFunction,
    pub arg: Option<Box<Expression>>,
    pub name: &'static str,
    pub ret_type: DataType,
}

impl std::fmt::Debug for CompiledAggregateCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledAggregateCall")
            .field("name", &self.name)
            .field("ret_type", &self.ret_type)
            .field("arg", &self.arg)
            .finish()
    }
}

/// A named expression, e.g. a `project`/`extend`/`summarize` item.
#[derive(Debug, Clone)]
pub struct NamedExpression {
    pub name: String,
    pub expression: Expression,
}

impl Expression {
    /// Iterates over the direct child expressions - used by the planner
    /// to walk the tree without needing a dedicated visitor per pass.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::BinaryOp(b) => vec![&b.left, &b.right],
            Expression::UnaryOp(u) => vec![&u.expr],
            Expression::FunctionCall(call) => call.args.iter().collect(),
            Expression::CompiledFunctionCall(call) => call.args.iter().collect(),
            Expression::Aggregate(agg) => agg.arg.iter().map(|b| b.as_ref()).collect(),
            Expression::CompiledAggregate(agg) => agg.arg.iter().map(|b| b.as_ref()).collect(),
            Expression::Literal(..) | Expression::Column(_) | Expression::ResolvedColumn(_) => {
                vec![]
            }
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Expression> {
        match self {
            Expression::BinaryOp(b) => vec![&mut b.left, &mut b.right],
            Expression::UnaryOp(u) => vec![&mut u.expr],
            Expression::FunctionCall(call) => call.args.iter_mut().collect(),
            Expression::CompiledFunctionCall(call) => call.args.iter_mut().collect(),
            Expression::Aggregate(agg) => agg.arg.iter_mut().map(|b| b.as_mut()).collect(),
            Expression::CompiledAggregate(agg) => agg.arg.iter_mut().map(|b| b.as_mut()).collect(),
            Expression::Literal(..) | Expression::Column(_) | Expression::ResolvedColumn(_) => {
                vec![]
            }
        }
    }

    /// True if this expression tree contains an aggregate call anywhere -
    /// used to reject aggregates outside of `summarize`.
    pub fn contains_aggregate(&self) -> bool {
        matches!(self, Expression::Aggregate(_) | Expression::CompiledAggregate(_))
            || self.children().iter().any(|c| c.contains_aggregate())
    }
}

// Convenience `From` constructors, mostly used by tests.
impl From<i64> for Expression {
    fn from(i: i64) -> Self {
        Expression::Literal(Datum::from(i), DataType::Int)
    }
}

impl From<f64> for Expression {
    fn from(r: f64) -> Self {
        Expression::Literal(Datum::from(r), DataType::Real)
    }
}

impl From<bool> for Expression {
    fn from(b: bool) -> Self {
        Expression::Literal(Datum::from(b), DataType::Bool)
    }
}

impl From<&str> for Expression {
    fn from(s: &str) -> Self {
        Expression::Literal(Datum::from(s), DataType::String)
    }
}

lazy_static! {
    /// If an identifier matches this we don't need to quote it when
    /// rendering an expression back to text.
    static ref IDENTIFIER_OK: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

fn write_ident(f: &mut Formatter<'_>, ident: &str) -> std::fmt::Result {
    if IDENTIFIER_OK.is_match(ident) {
        f.write_str(ident)
    } else {
        write!(f, "['{}']", ident)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(d, _) => Display::fmt(d, f),
            Expression::Column(c) => write_ident(f, &c.name),
            Expression::ResolvedColumn(c) => write_ident(f, &c.name),
            Expression::BinaryOp(b) => write!(f, "({} {} {})", b.left, b.op, b.right),
            Expression::UnaryOp(u) => write!(f, "{}({})", u.op.function_name(), u.expr),
            Expression::FunctionCall(call) => {
                let args = call
                    .args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", call.function_name, args)
            }
            Expression::CompiledFunctionCall(call) => {
                let args = call
                    .args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}({})", call.signature.name, args)
            }
            Expression::Aggregate(agg) => match &agg.arg {
                Some(arg) => write!(f, "{}({})", agg.func, arg),
                None => write!(f, "{}()", agg.func),
            },
            Expression::CompiledAggregate(agg) => match &agg.arg {
                Some(arg) => write!(f, "{}({})", agg.name, arg),
                None => write!(f, "{}()", agg.name),
            },
        }
    }
}

impl Display for NamedExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_from_helpers() {
        assert!(matches!(Expression::from(1_i64), Expression::Literal(Datum::Int(1), DataType::Int)));
        assert!(matches!(Expression::from(true), Expression::Literal(Datum::Bool(true), DataType::Bool)));
    }

    #[test]
    fn test_binop_function_names() {
        assert_eq!(BinOp::Add.function_name(), "+");
        assert_eq!(BinOp::Eq.function_name(), "==");
        assert_eq!(BinOp::Has.function_name(), "has");
    }

    #[test]
    fn test_aggfunc_roundtrip() {
        for f in [
            AggFunc::Count,
            AggFunc::Sum,
            AggFunc::Avg,
            AggFunc::Min,
            AggFunc::Max,
            AggFunc::DCount,
            AggFunc::MakeList,
        ] {
            assert_eq!(AggFunc::from_name(f.name()), Some(f));
        }
    }

    #[test]
    fn test_contains_aggregate() {
        let agg = Expression::Aggregate(AggregateCall {
            func: AggFunc::Count,
            arg: None,
        });
        let wrapped = Expression::UnaryOp(UnaryOpExpr {
            op: UnOp::Not,
            expr: Box::new(agg),
        });
        assert!(wrapped.contains_aggregate());
        assert!(!Expression::from(1_i64).contains_aggregate());
    }

    #[test]
    fn test_display_function_call() {
        let call = Expression::FunctionCall(FunctionCall {
            function_name: "ago".to_string(),
            args: vec![Expression::from(1_i64)],
        });
        assert_eq!(call.to_string(), "ago(1)");
    }
}
