use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum, Session};

/// Three-valued boolean logic: `Null` is neither true nor false, so `and`
/// short-circuits to `false` if either side is definitely `false` even
/// when the other side is `Null`, and symmetrically for `or`/`true`.
#[derive(Debug)]
struct And {}
impl Function for And {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_bool(), args[1].as_maybe_bool()) {
            (Some(false), _) | (_, Some(false)) => Datum::from(false),
            (Some(true), Some(true)) => Datum::from(true),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct Or {}
impl Function for Or {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_bool(), args[1].as_maybe_bool()) {
            (Some(true), _) | (_, Some(true)) => Datum::from(true),
            (Some(false), Some(false)) => Datum::from(false),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct Not {}
impl Function for Not {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_bool() {
            Some(b) => Datum::from(!b),
            None => Datum::Null,
        }
    }
}

pub fn register_builtins(registry: &mut Registry) {
    registry.register_function(FunctionDefinition::new(
        "and",
        vec![DataType::Bool, DataType::Bool],
        DataType::Bool,
        FunctionType::Scalar(&And {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "or",
        vec![DataType::Bool, DataType::Bool],
        DataType::Bool,
        FunctionType::Scalar(&Or {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "not",
        vec![DataType::Bool],
        DataType::Bool,
        FunctionType::Scalar(&Not {}),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const AND_SIG: FunctionSignature = FunctionSignature {
        name: "and",
        args: vec![],
        ret: DataType::Bool,
    };
    const NOT_SIG: FunctionSignature = FunctionSignature {
        name: "not",
        args: vec![],
        ret: DataType::Bool,
    };

    #[test]
    fn test_and_false_short_circuits_null() {
        let session = Session::new_for_test();
        assert_eq!(
            And {}.execute(&session, &AND_SIG, &[Datum::from(false), Datum::Null]),
            Datum::from(false)
        );
    }

    #[test]
    fn test_and_null_propagates_otherwise() {
        let session = Session::new_for_test();
        assert_eq!(
            And {}.execute(&session, &AND_SIG, &[Datum::from(true), Datum::Null]),
            Datum::Null
        );
    }

    #[test]
    fn test_not() {
        let session = Session::new_for_test();
        assert_eq!(Not {}.execute(&session, &NOT_SIG, &[Datum::from(true)]), Datum::from(false));
    }
}
