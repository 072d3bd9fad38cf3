use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of minor units (cents) in one major unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount must be a positive integer in minor units, got {0}")]
    NonPositive(i64),
}

/// Convert an integer minor-unit amount to an exact major-unit decimal.
///
/// Trailing fractional zeros are dropped so whole amounts render without a
/// decimal point: 1050 -> 10.5, 1000 -> 10, 1 -> 0.01.
pub fn minor_to_major(cents: i64) -> BigDecimal {
    if cents % MINOR_UNITS_PER_MAJOR == 0 {
        BigDecimal::from(cents / MINOR_UNITS_PER_MAJOR)
    } else if cents % 10 == 0 {
        BigDecimal::new((cents / 10).into(), 1)
    } else {
        BigDecimal::new(cents.into(), 2)
    }
}

/// Strictly positive amount held in minor units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub fn new(cents: i64) -> Result<Self, MoneyError> {
        if cents <= 0 {
            return Err(MoneyError::NonPositive(cents));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_major(&self) -> BigDecimal {
        minor_to_major(self.0)
    }
}

impl TryFrom<i64> for MinorUnits {
    type Error = MoneyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MinorUnits> for i64 {
    fn from(value: MinorUnits) -> Self {
        value.0
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_major())
    }
}
