use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum, Session};
use regex::{Regex, RegexBuilder};

#[derive(Debug)]
struct Contains {}
impl Function for Contains {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_str(), args[1].as_maybe_str()) {
            (Some(haystack), Some(needle)) => {
                Datum::from(haystack.to_lowercase().contains(&needle.to_lowercase()))
            }
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct StartsWith {}
impl Function for StartsWith {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_str(), args[1].as_maybe_str()) {
            (Some(haystack), Some(needle)) => Datum::from(
                haystack
                    .to_lowercase()
                    .starts_with(&needle.to_lowercase()),
            ),
            _ => Datum::Null,
        }
    }
}

#[derive(Debug)]
struct EndsWith {}
impl Function for EndsWith {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_str(), args[1].as_maybe_str()) {
            (Some(haystack), Some(needle)) => {
                Datum::from(haystack.to_lowercase().ends_with(&needle.to_lowercase()))
            }
            _ => Datum::Null,
        }
    }
}

/// `has` matches whole tokens bounded by non-word characters. Uses the
/// regex crate's default Unicode `\b` word boundary, not restricted to
/// ASCII.
#[derive(Debug)]
struct Has {}
impl Function for Has {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_str(), args[1].as_maybe_str()) {
            (Some(haystack), Some(needle)) => {
                let pattern = format!(r"\b{}\b", regex::escape(needle));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => Datum::from(re.is_match(haystack)),
                    Err(_) => Datum::Null,
                }
            }
            _ => Datum::Null,
        }
    }
}

/// `matches regex` - unanchored unless the pattern itself supplies `^`/`$`.
#[derive(Debug)]
struct MatchesRegex {}
impl Function for MatchesRegex {
    fn execute(&self, _session: &Session, _signature: &FunctionSignature, args: &[Datum]) -> Datum {
        match (args[0].as_maybe_str(), args[1].as_maybe_str()) {
            (Some(haystack), Some(pattern)) => match Regex::new(pattern) {
                Ok(re) => Datum::from(re.is_match(haystack)),
                Err(_) => Datum::Null,
            },
            _ => Datum::Null,
        }
    }
}

pub fn register_builtins(registry: &mut Registry) {
    registry.register_function(FunctionDefinition::new(
        "contains",
        vec![DataType::String, DataType::String],
        DataType::Bool,
        FunctionType::Scalar(&Contains {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "startswith",
        vec![DataType::String, DataType::String],
        DataType::Bool,
        FunctionType::Scalar(&StartsWith {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "endswith",
        vec![DataType::String, DataType::String],
        DataType::Bool,
        FunctionType::Scalar(&EndsWith {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "has",
        vec![DataType::String, DataType::String],
        DataType::Bool,
        FunctionType::Scalar(&Has {}),
    ));
    registry.register_function(FunctionDefinition::new(
        "matches_regex",
        vec![DataType::String, DataType::String],
        DataType::Bool,
        FunctionType::Scalar(&MatchesRegex {}),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "contains",
        args: vec![],
        ret: DataType::Bool,
    };

    #[test]
    fn test_contains_case_insensitive() {
        let session = Session::new_for_test();
        assert_eq!(
            Contains {}.execute(&session, &DUMMY_SIG, &[Datum::from("Hello World"), Datum::from("WORLD")]),
            Datum::from(true)
        );
    }

    #[test]
    fn test_has_matches_whole_token_only() {
        let session = Session::new_for_test();
        assert_eq!(
            Has {}.execute(&session, &DUMMY_SIG, &[Datum::from("login failed for user"), Datum::from("login")]),
            Datum::from(true)
        );
        assert_eq!(
            Has {}.execute(&session, &DUMMY_SIG, &[Datum::from("loginfailed"), Datum::from("login")]),
            Datum::from(false)
        );
    }

    #[test]
    fn test_matches_regex_unanchored_by_default() {
        let session = Session::new_for_test();
        assert_eq!(
            MatchesRegex {}.execute(&session, &DUMMY_SIG, &[Datum::from("abc123"), Datum::from(r"\d+")]),
            Datum::from(true)
        );
    }

    #[test]
    fn test_matches_regex_with_anchors() {
        let session = Session::new_for_test();
        assert_eq!(
            MatchesRegex {}.execute(&session, &DUMMY_SIG, &[Datum::from("123abc"), Datum::from(r"^\d+$")]),
            Datum::from(false)
        );
    }
}
