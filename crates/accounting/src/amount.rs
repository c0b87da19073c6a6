//! Ledger amounts: non-negative decimals normalized to two places.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use tallyerp_core::ValueObject;

/// Fractional digits every amount is normalized to.
pub const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("amount total exceeds the representable range")]
    Overflow,
}

/// A non-negative ledger amount.
///
/// Always stored rounded to [`AMOUNT_SCALE`] places (midpoint away from zero),
/// so comparing two amounts is exact decimal equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(
            value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero),
        ))
    }

    /// Whole units (e.g. rupees), convenient in tests and fixtures.
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Strict parse of user input. Thousands separators are ignored.
    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
        let value =
            Decimal::from_str(&cleaned).map_err(|_| AmountError::NotANumber(raw.to_string()))?;
        Self::new(value)
    }

    /// Loose parse: missing, blank or non-numeric input counts as zero.
    pub fn lenient(raw: Option<&str>) -> Self {
        raw.and_then(|s| Self::parse(s).ok()).unwrap_or_default()
    }

    /// Read a form field value. `null` and `""` mean "empty"; numbers and
    /// numeric strings are accepted.
    pub fn from_field(value: &JsonValue) -> Result<Option<Self>, AmountError> {
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::String(s) if s.trim().is_empty() => Ok(None),
            JsonValue::String(s) => Self::parse(s).map(Some),
            JsonValue::Number(n) => Self::parse(&n.to_string()).map(Some),
            other => Err(AmountError::NotANumber(other.to_string())),
        }
    }

    /// Form field representation of this amount.
    pub fn to_field(self) -> JsonValue {
        JsonValue::String(self.to_string())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// `self + other`, or `None` past the `Decimal` range.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// `self - other` when `self > other`.
    pub fn excess_over(self, other: Amount) -> Option<Amount> {
        (self > other).then(|| Amount(self.0 - other.0))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}
