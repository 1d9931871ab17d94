use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum, Session};

/// `iif(cond, a, b)` / `iff(...)` - since `Datum` is a single owned enum,
/// one implementation handles every `T`; only the registered signature's
/// types vary to get the right static type check and return type.
#[derive(Debug)]
struct Iif {}
impl Function for Iif {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_bool() {
            Some(true) => args[1].clone(),
            Some(false) => args[2].clone(),
            None => Datum::Null,
        }
    }
}

/// `case(c1, v1, c2, v2, ..., default)` - first matching condition wins,
/// falling through to the trailing default. Arity is variable (any odd
/// count >= 3), which doesn't fit `Registry`'s fixed-arity overload
/// matching, so the planner resolves `case` as a special form (checking
/// condition/value shape itself) and reaches for this implementation
/// directly rather than through `Registry::resolve`.
#[derive(Debug)]
pub struct Case {}
impl Function for Case {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        let mut i = 0;
        while i + 1 < args.len() {
            if let Some(true) = args[i].as_maybe_bool() {
                return args[i + 1].clone();
            }
            i += 2;
        }
        args[args.len() - 1].clone()
    }
}

static CASE: Case = Case {};

/// The static `case` implementation, for the planner to reference when
/// compiling the special form.
pub fn case_function() -> &'static dyn Function {
    &CASE
}

const ANY_TYPE: [DataType; 6] = [
    DataType::Int,
    DataType::Real,
    DataType::Bool,
    DataType::String,
    DataType::DateTime,
    DataType::Timespan,
];

pub fn register_builtins(registry: &mut Registry) {
    static IIF: Iif = Iif {};
    for &branch_type in ANY_TYPE.iter() {
        for name in ["iif", "iff"] {
            registry.register_function(FunctionDefinition::new(
                name,
                vec![DataType::Bool, branch_type, branch_type],
                branch_type,
                FunctionType::Scalar(&IIF),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "iif",
        args: vec![],
        ret: DataType::Int,
    };

    #[test]
    fn test_iif_picks_branch() {
        let session = Session::new_for_test();
        assert_eq!(
            Iif {}.execute(&session, &DUMMY_SIG, &[Datum::from(true), Datum::from(1_i64), Datum::from(2_i64)]),
            Datum::from(1_i64)
        );
        assert_eq!(
            Iif {}.execute(&session, &DUMMY_SIG, &[Datum::from(false), Datum::from(1_i64), Datum::from(2_i64)]),
            Datum::from(2_i64)
        );
    }

    #[test]
    fn test_case_first_match_wins() {
        let session = Session::new_for_test();
        let args = [
            Datum::from(false),
            Datum::from("a"),
            Datum::from(true),
            Datum::from("b"),
            Datum::from("default"),
        ];
        assert_eq!(
            Case {}.execute(&session, &DUMMY_SIG, &args),
            Datum::from("b")
        );
    }

    #[test]
    fn test_case_falls_through_to_default() {
        let session = Session::new_for_test();
        let args = [Datum::from(false), Datum::from("a"), Datum::from("default")];
        assert_eq!(
            Case {}.execute(&session, &DUMMY_SIG, &args),
            Datum::from("default")
        );
    }
}
