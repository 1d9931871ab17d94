use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// A signed duration, expressed in the source text as `<number><d|h|m|s>`.
/// Stored as signed microseconds so `datetime +/- timespan` and
/// `datetime - datetime` can be done with plain integer/chrono arithmetic.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default)]
pub struct Timespan {
    micros: i64,
}

impl Timespan {
    pub const fn from_micros(micros: i64) -> Self {
        Timespan { micros }
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Timespan {
            micros: (seconds * 1_000_000.0).round() as i64,
        }
    }

    pub fn micros(self) -> i64 {
        self.micros
    }

    pub fn to_chrono(self) -> chrono::Duration {
        chrono::Duration::microseconds(self.micros)
    }

    pub fn from_chrono(duration: chrono::Duration) -> Self {
        Timespan {
            micros: duration.num_microseconds().unwrap_or(i64::MAX),
        }
    }

    /// Parses a timespan literal body, e.g. "1.5h", "30m", "7d", "10s".
    /// Does not itself handle surrounding whitespace.
    pub fn parse(text: &str) -> Option<Timespan> {
        let text = text.trim();
        let unit = text.chars().last()?;
        let seconds_per_unit = match unit {
            'd' => 86_400.0,
            'h' => 3_600.0,
            'm' => 60.0,
            's' => 1.0,
            _ => return None,
        };
        let number_part = &text[..text.len() - unit.len_utf8()];
        let value: f64 = number_part.parse().ok()?;
        Some(Timespan::from_seconds(value * seconds_per_unit))
    }
}

impl Neg for Timespan {
    type Output = Timespan;
    fn neg(self) -> Timespan {
        Timespan {
            micros: -self.micros,
        }
    }
}

impl Display for Timespan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Render using the largest unit that divides evenly, falling back
        // to fractional seconds. Only used for debug/error messages - the
        // engine never round-trips a timespan back through the parser.
        let micros = self.micros;
        if micros % 86_400_000_000 == 0 {
            write!(f, "{}d", micros / 86_400_000_000)
        } else if micros % 3_600_000_000 == 0 {
            write!(f, "{}h", micros / 3_600_000_000)
        } else if micros % 60_000_000 == 0 {
            write!(f, "{}m", micros / 60_000_000)
        } else {
            write!(f, "{}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timespan() {
        assert_eq!(Timespan::parse("1h"), Some(Timespan::from_seconds(3600.0)));
        assert_eq!(Timespan::parse("30m"), Some(Timespan::from_seconds(1800.0)));
        assert_eq!(Timespan::parse("7d"), Some(Timespan::from_seconds(604_800.0)));
        assert_eq!(Timespan::parse("1.5h"), Some(Timespan::from_seconds(5400.0)));
        assert_eq!(Timespan::parse("10s"), Some(Timespan::from_seconds(10.0)));
        assert_eq!(Timespan::parse("bogus"), None);
    }

    #[test]
    fn test_timespan_display() {
        assert_eq!(Timespan::from_seconds(3600.0).to_string(), "1h");
        assert_eq!(Timespan::from_seconds(1800.0).to_string(), "30m");
        assert_eq!(Timespan::from_seconds(604_800.0).to_string(), "7d");
    }

    #[test]
    fn test_timespan_neg() {
        let t = Timespan::from_seconds(60.0);
        assert_eq!(-t, Timespan::from_seconds(-60.0));
    }
}
