use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use thiserror::Error;

use crate::engine::Rate;

const SCALE: i64 = 10_000;
const DECIMALS: usize = 4;

/// Monetary value held by accounts and carried by ledger records.
/// Stored as an i64 count of ten-thousandths to avoid floating point drift,
/// so the precision is four places past the decimal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    store: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Overflow error while computing Amount")]
    Overflow,

    #[error("Underflow error while computing Amount")]
    Underflow,
}

impl Amount {
    pub const ZERO: Amount = Amount { store: 0 };

    pub fn new() -> Self {
        Self::ZERO
    }

    /// Whole currency units, e.g. `Amount::from_units(50)` is 50.0000.
    /// Any `i32` fits once scaled, so this cannot overflow.
    pub const fn from_units(units: i32) -> Self {
        Amount {
            store: units as i64 * SCALE,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.store > 0
    }

    pub fn is_negative(&self) -> bool {
        self.store < 0
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.store.checked_add(other.store) {
            Some(total) => Ok(Amount { store: total }),
            None if other.store < 0 => Err(AmountError::Underflow),
            None => Err(AmountError::Overflow),
        }
    }

    pub fn sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.store.checked_sub(other.store) {
            Some(total) => Ok(Amount { store: total }),
            None if other.store < 0 => Err(AmountError::Overflow),
            None => Err(AmountError::Underflow),
        }
    }

    pub fn neg(&self) -> Result<Amount, AmountError> {
        self.store
            .checked_neg()
            .map(|store| Amount { store })
            .ok_or(AmountError::Overflow)
    }

    /// `self * rate`, truncated toward zero.
    pub fn apply_rate(&self, rate: Rate) -> Result<Amount, AmountError> {
        let scaled = i128::from(self.store) * i128::from(rate.basis_points()) / 10_000;
        i64::try_from(scaled)
            .map(|store| Amount { store })
            .map_err(|_| {
                if scaled < 0 {
                    AmountError::Underflow
                } else {
                    AmountError::Overflow
                }
            })
    }

    pub(crate) fn raw(&self) -> i64 {
        self.store
    }
}

fn parse_whole(s: &str, input: &str) -> Result<i64, AmountError> {
    let value = s.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => AmountError::Overflow,
        IntErrorKind::NegOverflow => AmountError::Underflow,
        _ => AmountError::Parse(input.into()),
    })?;
    value.checked_mul(SCALE).ok_or(if value < 0 {
        AmountError::Underflow
    } else {
        AmountError::Overflow
    })
}

fn parse_fraction(s: &str, input: &str) -> Result<i64, AmountError> {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::Parse(input.into()));
    }

    // Extra precision is truncated, missing digits are zero filled
    let mut digits: String = s.chars().take(DECIMALS).collect();
    while digits.len() < DECIMALS {
        digits.push('0');
    }
    digits
        .parse::<i64>()
        .map_err(|_| AmountError::Parse(input.into()))
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Parse(s.into()));
        }

        let mut parts = s.split('.');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next();

        if parts.next().is_some() {
            return Err(AmountError::Parse(s.into()));
        }

        let unsigned = whole.strip_prefix(['-', '+']).unwrap_or(whole);
        if unsigned.is_empty() && fraction.is_none_or(str::is_empty) {
            return Err(AmountError::Parse(s.into()));
        }

        // ".05" and "-.05" have an empty whole part
        let negative = whole.starts_with('-');
        let whole_units = if unsigned.is_empty() {
            0
        } else {
            parse_whole(whole, s)?
        };

        let store = match fraction {
            None => whole_units,
            Some(fraction) => {
                let fraction = parse_fraction(fraction, s)?;
                if negative {
                    whole_units
                        .checked_sub(fraction)
                        .ok_or(AmountError::Underflow)?
                } else {
                    whole_units
                        .checked_add(fraction)
                        .ok_or(AmountError::Overflow)?
                }
            }
        };

        Ok(Self { store })
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.store < 0 { "-" } else { "" };
        let abs_val = self.store.unsigned_abs();
        let scale = SCALE.unsigned_abs();

        write!(
            f,
            "{sign}{}.{:0width$}",
            abs_val / scale,
            abs_val % scale,
            width = DECIMALS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_that_valid_string_can_be_parsed() {
        assert_eq!(amount("0").store, 0);
        assert_eq!(amount("0.").store, 0);
        assert_eq!(amount(".0").store, 0);
        assert_eq!(amount("0.005").store, 50);
        assert_eq!(amount("5").store, 50_000);
        assert_eq!(amount("5.1").store, 51_000);
        assert_eq!(amount("5.123456").store, 51_234);
        assert_eq!(amount(".05").store, 500);
        assert_eq!(amount("-.05").store, -500);
        assert_eq!(amount("-0.5").store, -5_000);
        assert_eq!(amount(" 798 ").store, 7_980_000);
        assert_eq!(amount("-12345.1234567").store, -123_451_234);
    }

    #[test]
    fn test_that_invalid_string_parsing_returns_error() {
        for input in [
            "test", "123.12test", "12test.123", "1 .1 2", "", "1.2.3", "1.-2", "-", "+", ".", "-.",
            "+.", "--1", "-+1",
        ] {
            let parsed = Amount::from_str(input);
            assert!(
                matches!(parsed, Err(AmountError::Parse(_))),
                "expected parse error for {input:?}"
            );
        }

        // Max i64, will be * 10_000
        let parsed = Amount::from_str("9223372036854775807");
        assert!(matches!(parsed, Err(AmountError::Overflow)));
    }

    #[test]
    fn test_that_out_of_range_reports_the_same_error_with_or_without_fraction() {
        for input in ["922337203685478", "922337203685478.0", "922337203685477.5808"] {
            assert_eq!(Amount::from_str(input), Err(AmountError::Overflow), "{input}");
        }
        for input in ["-922337203685478", "-922337203685478.5", "-922337203685477.5809"] {
            assert_eq!(Amount::from_str(input), Err(AmountError::Underflow), "{input}");
        }
        for input in ["99999999999999999999", "99999999999999999999.5"] {
            assert_eq!(Amount::from_str(input), Err(AmountError::Overflow), "{input}");
        }
        assert_eq!(
            Amount::from_str("-99999999999999999999.5"),
            Err(AmountError::Underflow)
        );
    }

    #[test]
    fn test_that_whole_units_cover_the_i32_range() {
        assert_eq!(Amount::from_units(i32::MAX).to_string(), "2147483647.0000");
        assert_eq!(Amount::from_units(i32::MIN).to_string(), "-2147483648.0000");
    }

    #[test]
    fn test_that_amount_is_displayed_with_four_decimals() {
        assert_eq!(amount("798").to_string(), "798.0000");
        assert_eq!(amount("-400").to_string(), "-400.0000");
        assert_eq!(amount("-0.05").to_string(), "-0.0500");
        assert_eq!(Amount::from_units(50).to_string(), "50.0000");
    }

    #[test]
    fn test_that_amount_can_be_added_and_substracted() {
        let sum = amount("200.12").add(&amount("100.0023")).unwrap();
        assert_eq!(sum.to_string(), "300.1223");

        let diff = amount("-200.12").sub(&amount("100.0023")).unwrap();
        assert_eq!(diff.to_string(), "-300.1223");
    }

    #[test]
    fn test_that_overflow_and_underflow_return_error() {
        let max = amount("922337203685477.5807");
        assert_eq!(max.add(&amount("123")), Err(AmountError::Overflow));

        let min = amount("-922337203685477.5807");
        assert_eq!(min.sub(&amount("123")), Err(AmountError::Underflow));
        assert_eq!(min.add(&amount("-1")), Err(AmountError::Underflow));
    }

    #[test]
    fn test_that_rate_is_applied_with_truncation() {
        let rate = Rate::from_basis_points(350);
        assert_eq!(amount("1000").apply_rate(rate).unwrap(), amount("35"));
        assert_eq!(amount("0.0003").apply_rate(rate).unwrap(), Amount::ZERO);
    }
}
