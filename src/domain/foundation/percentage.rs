//! Percentage value object (0-100 scale).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A value between 0 and 100 inclusive.
///
/// Model replies are not trusted to stay in range or even to be numeric, so
/// deserialization accepts integers, floats and numeric strings, rounds, and
/// clamps. Anything unreadable becomes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage from any float, rounding and clamping.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(lenient_f64(&value).map(Self::from_f64).unwrap_or_default())
    }
}

/// Deserializes a non-negative count the same forgiving way as [`Percentage`].
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_f64(&value)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(50).value(), 50);
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn percentage_reads_integers_floats_and_strings() {
        let p: Percentage = serde_json::from_str("85").unwrap();
        assert_eq!(p.value(), 85);

        let p: Percentage = serde_json::from_str("72.6").unwrap();
        assert_eq!(p.value(), 73);

        let p: Percentage = serde_json::from_str("\"40%\"").unwrap();
        assert_eq!(p.value(), 40);
    }

    #[test]
    fn percentage_clamps_out_of_range_values() {
        let p: Percentage = serde_json::from_str("140").unwrap();
        assert_eq!(p, Percentage::HUNDRED);

        let p: Percentage = serde_json::from_str("-3").unwrap();
        assert_eq!(p, Percentage::ZERO);
    }

    #[test]
    fn percentage_falls_back_to_zero_on_garbage() {
        let p: Percentage = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Percentage::ZERO);

        let p: Percentage = serde_json::from_str("null").unwrap();
        assert_eq!(p, Percentage::ZERO);
    }

    #[test]
    fn percentage_serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&Percentage::new(42)).unwrap(), "42");
    }

    #[test]
    fn lenient_count_reads_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Counts {
            #[serde(deserialize_with = "lenient_count")]
            stories: u32,
            #[serde(deserialize_with = "lenient_count")]
            specs: u32,
        }

        let counts: Counts = serde_json::from_str(r#"{"stories":"12","specs":-4}"#).unwrap();
        assert_eq!(counts.stories, 12);
        assert_eq!(counts.specs, 0);
    }
}
