use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A score counted in exact half points.
///
/// Chess results only ever award 0, ½ or 1 point, so keeping the count of
/// halves makes sums exact and lets scores be compared with `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);
    pub const HALF: Points = Points(1);
    pub const ONE: Points = Points(2);

    pub fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    pub fn halves(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Converts a decimal score, rejecting anything that is not a whole or half point.
    pub fn from_f64(value: f64) -> Option<Self> {
        let doubled = value * 2.0;
        if !doubled.is_finite() || doubled < 0.0 || doubled.fract() != 0.0 {
            return None;
        }
        if doubled > f64::from(u32::MAX) {
            return None;
        }
        Some(Self(doubled as u32))
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Self {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Points::from_f64(value).ok_or_else(|| {
            serde::de::Error::custom(format!("{value} is not a multiple of half a point"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_half_points() {
        assert_eq!(Points::ZERO.to_string(), "0");
        assert_eq!(Points::HALF.to_string(), "0.5");
        assert_eq!(Points::from_halves(7).to_string(), "3.5");
    }

    #[test]
    fn test_from_f64_rejects_fractions_other_than_half() {
        assert_eq!(Points::from_f64(1.5), Some(Points::from_halves(3)));
        assert_eq!(Points::from_f64(0.25), None);
        assert_eq!(Points::from_f64(-1.0), None);
        assert_eq!(Points::from_f64(f64::NAN), None);
    }

    #[test]
    fn test_serializes_as_decimal() {
        let json = serde_json::to_string(&Points::from_halves(5)).unwrap();
        assert_eq!(json, "2.5");

        let parsed: Points = serde_json::from_str("2.5").unwrap();
        assert_eq!(parsed, Points::from_halves(5));
        assert!(serde_json::from_str::<Points>("0.3").is_err());
    }

    #[test]
    fn test_sum() {
        let total: Points = [Points::ONE, Points::HALF, Points::HALF].into_iter().sum();
        assert_eq!(total, Points::from_halves(4));
    }
}
