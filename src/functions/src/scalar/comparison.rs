use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum, Session};

/// Equality/ordering compare on two datums of any mutually comparable
/// type - `Datum`'s `Ord` impl already cross-promotes Int/Real and sorts
/// `Null` least, so each of these six operators shares one implementation
/// per operand-type pair; only the comparison itself differs.
#[derive(Debug, Clone, Copy)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    fn apply(self, a: &Datum, b: &Datum) -> Datum {
        if a.is_null() || b.is_null() {
            return Datum::Null;
        }
        let ord = a.cmp(b);
        let result = match self {
            Op::Eq => ord == std::cmp::Ordering::Equal,
            Op::Ne => ord != std::cmp::Ordering::Equal,
            Op::Lt => ord == std::cmp::Ordering::Less,
            Op::Le => ord != std::cmp::Ordering::Greater,
            Op::Gt => ord == std::cmp::Ordering::Greater,
            Op::Ge => ord != std::cmp::Ordering::Less,
        };
        Datum::from(result)
    }
}

#[derive(Debug)]
struct Compare {
    op: Op,
}

impl Function for Compare {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        self.op.apply(&args[0], &args[1])
    }
}

static EQ: Compare = Compare { op: Op::Eq };
static NE: Compare = Compare { op: Op::Ne };
static LT: Compare = Compare { op: Op::Lt };
static LE: Compare = Compare { op: Op::Le };
static GT: Compare = Compare { op: Op::Gt };
static GE: Compare = Compare { op: Op::Ge };

const COMPARABLE_TYPES: [DataType; 7] = [
    DataType::Int,
    DataType::Real,
    DataType::Bool,
    DataType::String,
    DataType::DateTime,
    DataType::Timespan,
    DataType::Null,
];

pub fn register_builtins(registry: &mut Registry) {
    for (name, implementation) in [
        ("==", &EQ as &'static dyn Function),
        ("!=", &NE as &'static dyn Function),
        ("<", &LT as &'static dyn Function),
        ("<=", &LE as &'static dyn Function),
        (">", &GT as &'static dyn Function),
        (">=", &GE as &'static dyn Function),
    ] {
        for &left in COMPARABLE_TYPES.iter() {
            for &right in COMPARABLE_TYPES.iter() {
                // Only register same-type pairs plus int/real cross
                // promotion; every other mismatched pair is left
                // unregistered so the planner reports it as a type error.
                let compatible = left == right
                    || (left.is_numeric() && right.is_numeric())
                    || left == DataType::Null
                    || right == DataType::Null;
                if compatible {
                    registry.register_function(FunctionDefinition::new(
                        name,
                        vec![left, right],
                        DataType::Bool,
                        FunctionType::Scalar(implementation),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "==",
        args: vec![],
        ret: DataType::Bool,
    };

    #[test]
    fn test_eq_matches() {
        let session = Session::new_for_test();
        assert_eq!(
            EQ.execute(&session, &DUMMY_SIG, &[Datum::from(1_i64), Datum::from(1_i64)]),
            Datum::from(true)
        );
    }

    #[test]
    fn test_null_comparison_is_null() {
        let session = Session::new_for_test();
        assert_eq!(
            EQ.execute(&session, &DUMMY_SIG, &[Datum::Null, Datum::from(1_i64)]),
            Datum::Null
        );
    }

    #[test]
    fn test_lt_int_real_promotion() {
        let session = Session::new_for_test();
        assert_eq!(
            LT.execute(&session, &DUMMY_SIG, &[Datum::from(1_i64), Datum::from(1.5_f64)]),
            Datum::from(true)
        );
    }

    #[test]
    fn test_registry_rejects_string_vs_int() {
        let registry = Registry::new();
        assert!(registry
            .resolve("==", &[DataType::String, DataType::Int])
            .is_none());
    }
}
