use chrono::{DateTime, Utc};

/// Per-query session state threaded through function evaluation.
///
/// The only piece of state a query needs beyond the row it's looking at is
/// the single instant `now()` resolved to at the start of evaluation - every
/// `now()`/`ago(...)` call within one query shares this value so a query
/// with multiple time predicates can't race itself (spec: "now() ...
/// captured once per query").
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub now: DateTime<Utc>,
}

impl Session {
    pub fn new(now: DateTime<Utc>) -> Self {
        Session { now }
    }

    pub fn new_for_test() -> Self {
        Session::new(Utc::now())
    }
}
