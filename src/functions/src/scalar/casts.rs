use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum, Session};

/// `tostring(x)`: best-effort textual rendering, never fails (unlike the
/// numeric casts below, there's no representation that can't be turned
/// into a string).
#[derive(Debug)]
struct ToString {}
impl Function for ToString {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        if args[0].is_null() {
            Datum::Null
        } else {
            Datum::from(args[0].to_display_string())
        }
    }
}

#[derive(Debug)]
struct ToInt {}
impl Function for ToInt {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match &args[0] {
            Datum::Int(i) => Datum::from(*i),
            Datum::Real(r) => Datum::from(*r as i64),
            Datum::Bool(b) => Datum::from(if *b { 1 } else { 0 }),
            Datum::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Datum::from)
                .unwrap_or(Datum::Null),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct ToDouble {}
impl Function for ToDouble {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match &args[0] {
            Datum::Int(i) => Datum::from(*i as f64),
            Datum::Real(r) => Datum::from(*r),
            Datum::Bool(b) => Datum::from(if *b { 1.0 } else { 0.0 }),
            Datum::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Datum::from)
                .unwrap_or(Datum::Null),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct ToBool {}
impl Function for ToBool {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match &args[0] {
            Datum::Bool(b) => Datum::from(*b),
            Datum::Int(i) => Datum::from(*i != 0),
            Datum::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Datum::from(true),
                "false" => Datum::from(false),
                _ => Datum::Null,
            },
            _ => Datum::Null,
        }
    }
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
    for &arg_type in ANY_TYPE.iter() {
        registry.register_function(FunctionDefinition::new(
            "tostring",
            vec![arg_type],
            DataType::String,
            FunctionType::Scalar(&ToString {}),
        ));
    }

    for &arg_type in [DataType::Int, DataType::Real, DataType::Bool, DataType::String].iter() {
        registry.register_function(FunctionDefinition::new(
            "toint",
            vec![arg_type],
            DataType::Int,
            FunctionType::Scalar(&ToInt {}),
        ));
        registry.register_function(FunctionDefinition::new(
            "todouble",
            vec![arg_type],
            DataType::Real,
            FunctionType::Scalar(&ToDouble {}),
        ));
    }

    for &arg_type in [DataType::Bool, DataType::Int, DataType::String].iter() {
        registry.register_function(FunctionDefinition::new(
            "tobool",
            vec![arg_type],
            DataType::Bool,
            FunctionType::Scalar(&ToBool {}),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "toint",
        args: vec![],
        ret: DataType::Int,
    };

    #[test]
    fn test_toint_from_string() {
        let session = Session::new_for_test();
        assert_eq!(
            ToInt {}.execute(&session, &DUMMY_SIG, &[Datum::from("42")]),
            Datum::from(42_i64)
        );
    }

    #[test]
    fn test_toint_conversion_failure_is_null() {
        let session = Session::new_for_test();
        assert_eq!(
            ToInt {}.execute(&session, &DUMMY_SIG, &[Datum::from("not a number")]),
            Datum::Null
        );
    }

    #[test]
    fn test_tobool_from_string() {
        let session = Session::new_for_test();
        assert_eq!(
            ToBool {}.execute(&session, &DUMMY_SIG, &[Datum::from("TRUE")]),
            Datum::from(true)
        );
    }

    #[test]
    fn test_tostring_does_not_quote() {
        let session = Session::new_for_test();
        assert_eq!(
            ToString {}.execute(&session, &DUMMY_SIG, &[Datum::from("hi")]),
            Datum::from("hi")
        );
    }
}
