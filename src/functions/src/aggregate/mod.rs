use crate::registry::Registry;
use crate::{AggregateFunction, AggregateState, FunctionDefinition, FunctionSignature, FunctionType};
use data::{DataType, Datum};
use std::collections::HashSet;

/// `count()` - the only aggregate with no column argument; counts rows
/// regardless of whether the (nonexistent) argument is null.
#[derive(Debug)]
struct Count {}
struct CountState {
    count: i64,
}
impl AggregateState for CountState {
    fn update(&mut self, _arg: Option<&Datum>) {
        self.count += 1;
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        Datum::from(self.count)
    }
}
impl AggregateFunction for Count {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(CountState { count: 0 })
    }
}

struct SumIntState {
    sum: i64,
    saw_any: bool,
}
impl AggregateState for SumIntState {
    fn update(&mut self, arg: Option<&Datum>) {
        if let Some(i) = arg.and_then(Datum::as_maybe_int) {
            self.sum += i;
            self.saw_any = true;
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        if self.saw_any {
            Datum::from(self.sum)
        } else {
            Datum::Null
        }
    }
}
struct SumRealState {
    sum: f64,
    saw_any: bool,
}
impl AggregateState for SumRealState {
    fn update(&mut self, arg: Option<&Datum>) {
        if let Some(r) = arg.and_then(Datum::as_maybe_real) {
            self.sum += r;
            self.saw_any = true;
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        if self.saw_any {
            Datum::from(self.sum)
        } else {
            Datum::Null
        }
    }
}
#[derive(Debug)]
struct SumInt {}
impl AggregateFunction for SumInt {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(SumIntState { sum: 0, saw_any: false })
    }
}
#[derive(Debug)]
struct SumReal {}
impl AggregateFunction for SumReal {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(SumRealState { sum: 0.0, saw_any: false })
    }
}

/// `avg()` returns the input column's own numeric type (real columns
/// average to real, int columns average to int via truncating division),
/// not always a real as some query languages do.
struct AvgIntState {
    sum: i64,
    count: i64,
}
impl AggregateState for AvgIntState {
    fn update(&mut self, arg: Option<&Datum>) {
        if let Some(i) = arg.and_then(Datum::as_maybe_int) {
            self.sum += i;
            self.count += 1;
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        if self.count > 0 {
            Datum::from(self.sum / self.count)
        } else {
            Datum::Null
        }
    }
}
struct AvgRealState {
    sum: f64,
    count: i64,
}
impl AggregateState for AvgRealState {
    fn update(&mut self, arg: Option<&Datum>) {
        if let Some(r) = arg.and_then(Datum::as_maybe_real) {
            self.sum += r;
            self.count += 1;
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        if self.count > 0 {
            Datum::from(self.sum / self.count as f64)
        } else {
            Datum::Null
        }
    }
}
#[derive(Debug)]
struct AvgInt {}
impl AggregateFunction for AvgInt {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(AvgIntState { sum: 0, count: 0 })
    }
}
#[derive(Debug)]
struct AvgReal {}
impl AggregateFunction for AvgReal {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(AvgRealState { sum: 0.0, count: 0 })
    }
}

/// `min`/`max` - works across any comparable type via `Datum`'s `Ord`
/// impl, so one state type serves every registered column type.
struct MinMaxState {
    best: Option<Datum>,
    want_min: bool,
}
impl AggregateState for MinMaxState {
    fn update(&mut self, arg: Option<&Datum>) {
        let value = match arg {
            Some(v) if !v.is_null() => v,
            _ => return,
        };
        let replace = match &self.best {
            None => true,
            Some(current) => {
                if self.want_min {
                    value < current
                } else {
                    value > current
                }
            }
        };
        if replace {
            self.best = Some(value.clone());
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        self.best.clone().unwrap_or(Datum::Null)
    }
}
#[derive(Debug)]
struct Min {}
impl AggregateFunction for Min {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(MinMaxState {
            best: None,
            want_min: true,
        })
    }
}
#[derive(Debug)]
struct Max {}
impl AggregateFunction for Max {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(MinMaxState {
            best: None,
            want_min: false,
        })
    }
}

/// `dcount()` - distinct count, via a `HashSet<Datum>` accumulator. Not
/// an approximate (HyperLogLog-style) count - the row-sets this engine
/// evaluates are always small and finite.
struct DCountState {
    seen: HashSet<Datum>,
}
impl AggregateState for DCountState {
    fn update(&mut self, arg: Option<&Datum>) {
        if let Some(v) = arg {
            if !v.is_null() {
                self.seen.insert(v.clone());
            }
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        Datum::from(self.seen.len() as i64)
    }
}
#[derive(Debug)]
struct DCount {}
impl AggregateFunction for DCount {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(DCountState {
            seen: HashSet::new(),
        })
    }
}

/// `make_list()` - joins string representations with `", "`.
struct MakeListState {
    values: Vec<String>,
}
impl AggregateState for MakeListState {
    fn update(&mut self, arg: Option<&Datum>) {
        if let Some(v) = arg {
            if !v.is_null() {
                self.values.push(v.to_display_string());
            }
        }
    }
    fn finalize(&self, _signature: &FunctionSignature) -> Datum {
        Datum::from(self.values.join(", "))
    }
}
#[derive(Debug)]
struct MakeList {}
impl AggregateFunction for MakeList {
    fn init_state(&self) -> Box<dyn AggregateState> {
        Box::new(MakeListState { values: Vec::new() })
    }
}

const COMPARABLE_TYPES: [DataType; 6] = [
    DataType::Int,
    DataType::Real,
    DataType::Bool,
    DataType::String,
    DataType::DateTime,
    DataType::Timespan,
];

pub fn register_builtins(registry: &mut Registry) {
    static COUNT: Count = Count {};
    registry.register_function(FunctionDefinition::new(
        "count",
        vec![],
        DataType::Int,
        FunctionType::Aggregate(&COUNT),
    ));

    static SUM_INT: SumInt = SumInt {};
    static SUM_REAL: SumReal = SumReal {};
    registry.register_function(FunctionDefinition::new(
        "sum",
        vec![DataType::Int],
        DataType::Int,
        FunctionType::Aggregate(&SUM_INT),
    ));
    registry.register_function(FunctionDefinition::new(
        "sum",
        vec![DataType::Real],
        DataType::Real,
        FunctionType::Aggregate(&SUM_REAL),
    ));

    static AVG_INT: AvgInt = AvgInt {};
    static AVG_REAL: AvgReal = AvgReal {};
    registry.register_function(FunctionDefinition::new(
        "avg",
        vec![DataType::Int],
        DataType::Int,
        FunctionType::Aggregate(&AVG_INT),
    ));
    registry.register_function(FunctionDefinition::new(
        "avg",
        vec![DataType::Real],
        DataType::Real,
        FunctionType::Aggregate(&AVG_REAL),
    ));

    static MIN: Min = Min {};
    static MAX: Max = Max {};
    static DCOUNT: DCount = DCount {};
    static MAKE_LIST: MakeList = MakeList {};
    for &column_type in COMPARABLE_TYPES.iter() {
        registry.register_function(FunctionDefinition::new(
            "min",
            vec![column_type],
            column_type,
            FunctionType::Aggregate(&MIN),
        ));
        registry.register_function(FunctionDefinition::new(
            "max",
            vec![column_type],
            column_type,
            FunctionType::Aggregate(&MAX),
        ));
        registry.register_function(FunctionDefinition::new(
            "dcount",
            vec![column_type],
            DataType::Int,
            FunctionType::Aggregate(&DCOUNT),
        ));
        registry.register_function(FunctionDefinition::new(
            "make_list",
            vec![column_type],
            DataType::String,
            FunctionType::Aggregate(&MAKE_LIST),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "sum",
        args: vec![],
        ret: DataType::Int,
    };

    #[test]
    fn test_count_counts_rows() {
        let mut state = Count {}.init_state();
        state.update(None);
        state.update(None);
        assert_eq!(state.finalize(&DUMMY_SIG), Datum::from(2_i64));
    }

    #[test]
    fn test_sum_int() {
        let mut state = SumInt {}.init_state();
        state.update(Some(&Datum::from(1_i64)));
        state.update(Some(&Datum::from(2_i64)));
        assert_eq!(state.finalize(&DUMMY_SIG), Datum::from(3_i64));
    }

    #[test]
    fn test_sum_with_no_rows_is_null() {
        let state = SumInt {}.init_state();
        assert_eq!(state.finalize(&DUMMY_SIG), Datum::Null);
    }

    #[test]
    fn test_min_max() {
        let mut min_state = Min {}.init_state();
        min_state.update(Some(&Datum::from(3_i64)));
        min_state.update(Some(&Datum::from(1_i64)));
        min_state.update(Some(&Datum::from(2_i64)));
        assert_eq!(min_state.finalize(&DUMMY_SIG), Datum::from(1_i64));

        let mut max_state = Max {}.init_state();
        max_state.update(Some(&Datum::from(3_i64)));
        max_state.update(Some(&Datum::from(1_i64)));
        assert_eq!(max_state.finalize(&DUMMY_SIG), Datum::from(3_i64));
    }

    #[test]
    fn test_dcount_deduplicates() {
        let mut state = DCount {}.init_state();
        state.update(Some(&Datum::from("a")));
        state.update(Some(&Datum::from("a")));
        state.update(Some(&Datum::from("b")));
        assert_eq!(state.finalize(&DUMMY_SIG), Datum::from(2_i64));
    }

    #[test]
    fn test_make_list_joins_with_comma_space() {
        let mut state = MakeList {}.init_state();
        state.update(Some(&Datum::from("a")));
        state.update(Some(&Datum::from("b")));
        assert_eq!(state.finalize(&DUMMY_SIG), Datum::from("a, b"));
    }
}
