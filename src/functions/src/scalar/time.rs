use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use chrono::{DateTime, TimeZone, Utc};
use data::{DataType, Datum, Session, Timespan};

/// `now()` - the session's captured instant, not the system clock, so
/// every reference within one query shares it (spec: "captured once per
/// query at evaluation start").
#[derive(Debug)]
struct Now {}
impl Function for Now {
    fn execute(&self, session: &Session, _signature: &FunctionSignature, _args: &[Datum]) -> Datum {
        Datum::from(session.now)
    }
}

/// `ago(T)` - `now() - T`.
#[derive(Debug)]
struct Ago {}
impl Function for Ago {
    fn execute(&self, session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_timespan() {
            Some(t) => Datum::from(session.now - t.to_chrono()),
            None => Datum::Null,
        }
    }
}

/// `datetime('ISO-8601')` - a datetime literal parsed from text.
#[derive(Debug)]
struct ParseDateTime {}
impl Function for ParseDateTime {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match args[0].as_maybe_str() {
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Datum::from(dt.with_timezone(&Utc)))
                .unwrap_or(Datum::Null),
            None => Datum::Null,
        }
    }
}

/// `bin(col, T)` - truncates a datetime toward the epoch by multiples of
/// the timespan `T`.
#[derive(Debug)]
struct Bin {}
impl Function for Bin {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_datetime(), args[1].as_maybe_timespan()) {
            (Some(dt), Some(bucket)) if bucket.micros() > 0 => {
                let micros_since_epoch = dt.timestamp_micros();
                let bucket_micros = bucket.micros();
                let truncated =
                    micros_since_epoch.div_euclid(bucket_micros) * bucket_micros;
                let seconds = truncated.div_euclid(1_000_000);
                let nanos = (truncated.rem_euclid(1_000_000)) * 1_000;
                Datum::from(Utc.timestamp_opt(seconds, nanos as u32).unwrap())
            }
            _ => Datum::Null,
        }
    }
}

pub fn register_builtins(registry: &mut Registry) {
    registry.register_function(FunctionDefinition::new(
        "now",
        vec![],
        DataType::DateTime,
        FunctionType::Scalar(&Now {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "ago",
        vec![DataType::Timespan],
        DataType::DateTime,
        FunctionType::Scalar(&Ago {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "datetime",
        vec![DataType::String],
        DataType::DateTime,
        FunctionType::Scalar(&ParseDateTime {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "bin",
        vec![DataType::DateTime, DataType::Timespan],
        DataType::DateTime,
        FunctionType::Scalar(&Bin {}),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGO_SIG: FunctionSignature = FunctionSignature {
        name: "ago",
        args: vec![],
        ret: DataType::DateTime,
    };
    const BIN_SIG: FunctionSignature = FunctionSignature {
        name: "bin",
        args: vec![],
        ret: DataType::DateTime,
    };
    const PARSE_SIG: FunctionSignature = FunctionSignature {
        name: "datetime",
        args: vec![],
        ret: DataType::DateTime,
    };

    #[test]
    fn test_ago_subtracts_from_session_now() {
        let session = Session::new_for_test();
        let result = Ago {}.execute(&session, &AGO_SIG, &[Datum::from(Timespan::from_seconds(3600.0))]);
        assert_eq!(result, Datum::from(session.now - chrono::Duration::hours(1)));
    }

    #[test]
    fn test_parse_datetime_literal() {
        let session = Session::new_for_test();
        let result = ParseDateTime {}.execute(
            &session,
            &PARSE_SIG,
            &[Datum::from("2024-01-01T00:00:00Z")],
        );
        assert_eq!(
            result,
            Datum::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_datetime_invalid_is_null() {
        let session = Session::new_for_test();
        assert_eq!(
            ParseDateTime {}.execute(&session, &PARSE_SIG, &[Datum::from("not a date")]),
            Datum::Null
        );
    }

    #[test]
    fn test_bin_truncates_to_hour() {
        let session = Session::new_for_test();
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 13, 45, 30).unwrap();
        let result = Bin {}.execute(
            &session,
            &BIN_SIG,
            &[Datum::from(dt), Datum::from(Timespan::from_seconds(3600.0))],
        );
        assert_eq!(
            result,
            Datum::from(Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap())
        );
    }
}
