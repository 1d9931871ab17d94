use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum, Session, Timespan};

#[derive(Debug)]
struct AddInt {}
impl Function for AddInt {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_int(), args[1].as_maybe_int()) {
            (Some(a), Some(b)) => Datum::from(a + b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct AddReal {}
impl Function for AddReal {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_real(), args[1].as_maybe_real()) {
            (Some(a), Some(b)) => Datum::from(a + b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct AddDateTimeTimespan {}
impl Function for AddDateTimeTimespan {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_datetime(), args[1].as_maybe_timespan()) {
            (Some(dt), Some(t)) => Datum::from(dt + t.to_chrono()),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct AddTimespanDateTime {}
impl Function for AddTimespanDateTime {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_timespan(), args[1].as_maybe_datetime()) {
            (Some(t), Some(dt)) => Datum::from(dt + t.to_chrono()),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct AddTimespan {}
impl Function for AddTimespan {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_timespan(), args[1].as_maybe_timespan()) {
            (Some(a), Some(b)) => Datum::from(Timespan::from_micros(a.micros() + b.micros())),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct SubInt {}
impl Function for SubInt {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_int(), args[1].as_maybe_int()) {
            (Some(a), Some(b)) => Datum::from(a - b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct SubReal {}
impl Function for SubReal {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_real(), args[1].as_maybe_real()) {
            (Some(a), Some(b)) => Datum::from(a - b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct SubDateTimeDateTime {}
impl Function for SubDateTimeDateTime {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_datetime(), args[1].as_maybe_datetime()) {
            (Some(a), Some(b)) => Datum::from(Timespan::from_chrono(a - b)),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct SubDateTimeTimespan {}
impl Function for SubDateTimeTimespan {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_datetime(), args[1].as_maybe_timespan()) {
            (Some(dt), Some(t)) => Datum::from(dt - t.to_chrono()),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct SubTimespan {}
impl Function for SubTimespan {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_timespan(), args[1].as_maybe_timespan()) {
            (Some(a), Some(b)) => Datum::from(Timespan::from_micros(a.micros() - b.micros())),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct MulInt {}
impl Function for MulInt {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_int(), args[1].as_maybe_int()) {
            (Some(a), Some(b)) => Datum::from(a * b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct MulReal {}
impl Function for MulReal {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_real(), args[1].as_maybe_real()) {
            (Some(a), Some(b)) => Datum::from(a * b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct DivInt {}
impl Function for DivInt {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_int(), args[1].as_maybe_int()) {
            (Some(_), Some(0)) => Datum::Null,
            (Some(a), Some(b)) => Datum::from(a / b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct DivReal {}
impl Function for DivReal {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_real(), args[1].as_maybe_real()) {
            (Some(a), Some(b)) => Datum::from(a / b),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct NegInt {}
impl Function for NegInt {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_int() {
            Some(a) => Datum::from(-a),
            None => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct NegReal {}
impl Function for NegReal {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_real() {
            Some(a) => Datum::from(-a),
            None => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct NegTimespan {}
impl Function for NegTimespan {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_timespan() {
            Some(t) => Datum::from(-t),
            None => Datum::Null,
        }
    }
}

pub fn register_builtins(registry: &mut Registry) {
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::Int, DataType::Int],
        DataType::Int,
        FunctionType::Scalar(&AddInt {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::Real, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&AddReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::Int, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&AddReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::Real, DataType::Int],
        DataType::Real,
        FunctionType::Scalar(&AddReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::DateTime, DataType::Timespan],
        DataType::DateTime,
        FunctionType::Scalar(&AddDateTimeTimespan {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::Timespan, DataType::DateTime],
        DataType::DateTime,
        FunctionType::Scalar(&AddTimespanDateTime {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "+",
        vec![DataType::Timespan, DataType::Timespan],
        DataType::Timespan,
        FunctionType::Scalar(&AddTimespan {}),
    ));

    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Int, DataType::Int],
        DataType::Int,
        FunctionType::Scalar(&SubInt {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Real, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&SubReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Int, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&SubReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Real, DataType::Int],
        DataType::Real,
        FunctionType::Scalar(&SubReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::DateTime, DataType::DateTime],
        DataType::Timespan,
        FunctionType::Scalar(&SubDateTimeDateTime {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::DateTime, DataType::Timespan],
        DataType::DateTime,
        FunctionType::Scalar(&SubDateTimeTimespan {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Timespan, DataType::Timespan],
        DataType::Timespan,
        FunctionType::Scalar(&SubTimespan {}),
    ));
    // Unary minus shares the "-" name with binary subtraction; the
    // planner resolves by arity first, so a single-argument call only
    // ever matches these.
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Int],
        DataType::Int,
        FunctionType::Scalar(&NegInt {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&NegReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "-",
        vec![DataType::Timespan],
        DataType::Timespan,
        FunctionType::Scalar(&NegTimespan {}),
    ));

    registry.register_function(FunctionDefinition::new(
        "*",
        vec![DataType::Int, DataType::Int],
        DataType::Int,
        FunctionType::Scalar(&MulInt {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "*",
        vec![DataType::Real, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&MulReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "*",
        vec![DataType::Int, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&MulReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "*",
        vec![DataType::Real, DataType::Int],
        DataType::Real,
        FunctionType::Scalar(&MulReal {}),
    ));

    registry.register_function(FunctionDefinition::new(
        "/",
        vec![DataType::Int, DataType::Int],
        DataType::Int,
        FunctionType::Scalar(&DivInt {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "/",
        vec![DataType::Real, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&DivReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "/",
        vec![DataType::Int, DataType::Real],
        DataType::Real,
        FunctionType::Scalar(&DivReal {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "/",
        vec![DataType::Real, DataType::Int],
        DataType::Real,
        FunctionType::Scalar(&DivReal {}),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "+",
        args: vec![],
        ret: DataType::Int,
    };

    #[test]
    fn test_add_int() {
        let session = Session::new_for_test();
        assert_eq!(
            AddInt {}.execute(&session, &DUMMY_SIG, &[Datum::from(1_i64), Datum::from(2_i64)]),
            Datum::from(3_i64)
        );
    }

    #[test]
    fn test_add_null_propagates() {
        let session = Session::new_for_test();
        assert_eq!(
            AddInt {}.execute(&session, &DUMMY_SIG, &[Datum::Null, Datum::from(2_i64)]),
            Datum::Null
        );
    }

    #[test]
    fn test_div_int_by_zero_is_null() {
        let session = Session::new_for_test();
        assert_eq!(
            DivInt {}.execute(&session, &DUMMY_SIG, &[Datum::from(4_i64), Datum::from(0_i64)]),
            Datum::Null
        );
    }

    #[test]
    fn test_sub_datetime_datetime_is_timespan() {
        let session = Session::new_for_test();
        let a = session.now;
        let b = a - chrono::Duration::hours(1);
        let result = SubDateTimeDateTime {}.execute(&session, &DUMMY_SIG, &[Datum::from(a), Datum::from(b)]);
        assert_eq!(result, Datum::from(Timespan::from_seconds(3600.0)));
    }

    #[test]
    fn test_neg_int() {
        let session = Session::new_for_test();
        const NEG_SIG: FunctionSignature = FunctionSignature {
            name: "-",
            args: vec![],
            ret: DataType::Int,
        };
        assert_eq!(
            NegInt {}.execute(&session, &NEG_SIG, &[Datum::from(5_i64)]),
            Datum::from(-5_i64)
        );
    }
}
