use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------     MinorUnits       --------------------------------------------------------
/// A monetary amount expressed as an integer count of minor currency units (e.g. cents).
///
/// This is the canonical price representation across Bidfair. Decimal-string prices are
/// deliberately not supported; parse them at the edge and convert.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct MinorUnits(i64);

op!(binary MinorUnits, Add, add);
op!(binary MinorUnits, Sub, sub);
op!(inplace MinorUnits, AddAssign, add_assign);

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor currency units: {0}")]
pub struct MinorUnitsConversionError(String);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for MinorUnits {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for MinorUnits {}

impl TryFrom<u64> for MinorUnits {
    type Error = MinorUnitsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MinorUnitsConversionError(format!("{value} is too large")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / 100;
        let frac = (self.0 % 100).abs();
        write!(f, "{whole}.{frac:02}")
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// A bid price must be a strictly positive amount.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::MinorUnits;

    #[test]
    fn display_formats_major_units() {
        assert_eq!(MinorUnits::from(12345).to_string(), "123.45");
        assert_eq!(MinorUnits::from(5).to_string(), "0.05");
    }

    #[test]
    fn positivity() {
        assert!(MinorUnits::from(1).is_positive());
        assert!(!MinorUnits::from(0).is_positive());
        assert!(!MinorUnits::from(-250).is_positive());
    }
}
