mod aggregate;
pub mod registry;
mod scalar;

use data::{DataType, Datum, Session};
use std::fmt::{Debug, Formatter};

pub use registry::Registry;
pub use scalar::case_function;

/// The signature a call site is matched against. `args` is the concrete
/// parameter types this particular overload accepts; `ret` is fixed per
/// overload since `DataType` carries no parameters to resolve against
/// (unlike a decimal's precision/scale) - every concrete return type gets
/// its own registration instead of a resolver callback.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub args: Vec<DataType>,
    pub ret: DataType,
}

/// One registered overload: a signature plus the implementation it
/// dispatches to.
pub struct FunctionDefinition {
    pub signature: FunctionSignature,
    pub function: FunctionType,
}

#[derive(Clone, Debug)]
pub enum FunctionType {
    Scalar(&'static dyn Function),
    Aggregate(&'static dyn AggregateFunction),
}

impl FunctionType {
    /// Helper for tests, unwraps the scalar function inside.
    pub fn as_scalar(&self) -> &'static dyn Function {
        if let FunctionType::Scalar(f) = self {
            *f
        } else {
            panic!("not a scalar function")
        }
    }

    /// Helper for tests, unwraps the aggregate function inside.
    pub fn as_aggregate(&self) -> &'static dyn AggregateFunction {
        if let FunctionType::Aggregate(f) = self {
            *f
        } else {
            panic!("not an aggregate function")
        }
    }
}

impl Debug for FunctionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("FunctionDefinition[")?;
        self.signature.fmt(f)?;
        f.write_str("]")
    }
}

impl FunctionDefinition {
    pub fn new(
        name: &'static str,
        args: Vec<DataType>,
        ret: DataType,
        function: FunctionType,
    ) -> Self {
        FunctionDefinition {
            signature: FunctionSignature { name, args, ret },
            function,
        }
    }
}

/// A scalar function implementation - stateless, called once per row.
pub trait Function: Debug + Sync + 'static {
    fn execute(&self, session: &Session, signature: &FunctionSignature, args: &[Datum]) -> Datum;
}

/// An aggregate function implementation. Unlike the streaming,
/// retractable aggregates of an incremental engine, `summarize` here runs
/// a single bulk pass over a finite row-set, so there is no `apply`/
/// `merge`/`retract` split - just an accumulator per group.
pub trait AggregateFunction: Debug + Sync + 'static {
    fn init_state(&self) -> Box<dyn AggregateState>;
}

/// A single group's in-progress accumulator.
pub trait AggregateState {
    /// `arg` is `None` for `count()`, which takes no column.
    fn update(&mut self, arg: Option<&Datum>);
    fn finalize(&self, signature: &FunctionSignature) -> Datum;
}

fn register_builtins(registry: &mut Registry) {
    aggregate::register_builtins(registry);
    scalar::register_builtins(registry);
}
