use crate::Timespan;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Datum - in memory representation of a QL scalar value.
///
/// Unlike a storage-engine value, this never borrows from an external
/// buffer: the engine is bulk and in-memory (no on-disk tuple format to
/// avoid copying out of), so every variant owns its data outright.
#[derive(Debug, Clone)]
pub enum Datum {
    Null,
    Int(i64),
    Real(f64),
    Bool(bool),
    String(String),
    DateTime(DateTime<Utc>),
    Timespan(Timespan),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_maybe_int(&self) -> Option<i64> {
        if let Datum::Int(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_maybe_real(&self) -> Option<f64> {
        match self {
            Datum::Real(r) => Some(*r),
            Datum::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_maybe_bool(&self) -> Option<bool> {
        if let Datum::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_maybe_str(&self) -> Option<&str> {
        if let Datum::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    pub fn as_maybe_datetime(&self) -> Option<DateTime<Utc>> {
        if let Datum::DateTime(dt) = self {
            Some(*dt)
        } else {
            None
        }
    }

    pub fn as_maybe_timespan(&self) -> Option<Timespan> {
        if let Datum::Timespan(t) = self {
            Some(*t)
        } else {
            None
        }
    }

    /// Best-effort textual rendering used by `tostring`/`make_list`/error
    /// messages. Unlike `Display`, this never quotes strings.
    pub fn to_display_string(&self) -> String {
        match self {
            Datum::Null => String::new(),
            Datum::Int(i) => i.to_string(),
            Datum::Real(r) => r.to_string(),
            Datum::Bool(b) => b.to_string(),
            Datum::String(s) => s.clone(),
            Datum::DateTime(dt) => dt.to_rfc3339(),
            Datum::Timespan(t) => t.to_string(),
        }
    }
}

impl Display for Datum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Null => f.write_str("null"),
            Datum::String(s) => write!(f, "{:?}", s),
            other => f.write_str(&other.to_display_string()),
        }
    }
}

impl Default for Datum {
    fn default() -> Self {
        Datum::Null
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Datum::Int(i)
    }
}

impl From<f64> for Datum {
    fn from(r: f64) -> Self {
        Datum::Real(r)
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Bool(b)
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl From<DateTime<Utc>> for Datum {
    fn from(dt: DateTime<Utc>) -> Self {
        Datum::DateTime(dt)
    }
}

impl From<Timespan> for Datum {
    fn from(t: Timespan) -> Self {
        Datum::Timespan(t)
    }
}

/// Bitwise representation of a real used for `Eq`/`Hash`, so that `Datum`
/// can be used as a hash-set/hash-map key (`dcount`, `distinct`). This
/// gives `f64` identity semantics (NaN != NaN is lost, -0.0 == 0.0 is
/// lost) rather than numeric equality - acceptable since log data never
/// meaningfully produces NaN and distinct/dcount only need a consistent
/// notion of "the same value", not IEEE-754 equality.
fn real_key(r: f64) -> u64 {
    r.to_bits()
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Datum::Null, Datum::Null) => true,
            (Datum::Int(a), Datum::Int(b)) => a == b,
            (Datum::Real(a), Datum::Real(b)) => real_key(*a) == real_key(*b),
            (Datum::Int(a), Datum::Real(b)) | (Datum::Real(b), Datum::Int(a)) => *a as f64 == *b,
            (Datum::Bool(a), Datum::Bool(b)) => a == b,
            (Datum::String(a), Datum::String(b)) => a == b,
            (Datum::DateTime(a), Datum::DateTime(b)) => a == b,
            (Datum::Timespan(a), Datum::Timespan(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Datum {}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Datum::Null => state.write_u8(0),
            Datum::Int(i) => i.hash(state),
            Datum::Real(r) => real_key(*r).hash(state),
            Datum::Bool(b) => b.hash(state),
            Datum::String(s) => s.hash(state),
            Datum::DateTime(dt) => dt.hash(state),
            Datum::Timespan(t) => t.hash(state),
        }
    }
}

impl Ord for Datum {
    /// Only meaningful for datums of a comparable type (see
    /// `DataType::is_assignable_to`); the planner never lets an
    /// incomparable pair reach this.  `Null` sorts less than everything -
    /// callers implementing `order by` apply the asc/desc-dependent "nulls
    /// last" rule on top of this rather than relying on it directly.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Datum::Null, Datum::Null) => Ordering::Equal,
            (Datum::Null, _) => Ordering::Less,
            (_, Datum::Null) => Ordering::Greater,
            (Datum::Int(a), Datum::Int(b)) => a.cmp(b),
            (Datum::Real(a), Datum::Real(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Datum::Int(a), Datum::Real(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Datum::Real(a), Datum::Int(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Datum::Bool(a), Datum::Bool(b)) => a.cmp(b),
            (Datum::String(a), Datum::String(b)) => a.cmp(b),
            (Datum::DateTime(a), Datum::DateTime(b)) => a.cmp(b),
            (Datum::Timespan(a), Datum::Timespan(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Datum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
