use std::fmt;
use std::str::FromStr;

use crate::engine::{Amount, AmountError};

/// Annual interest rate in basis points (1/100 of a percent).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate {
    basis_points: u32,
}

impl Rate {
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Rate { basis_points }
    }

    pub fn basis_points(&self) -> u32 {
        self.basis_points
    }
}

/// Parses a percentage such as `"3.5"` or `"2"`; digits past the second
/// decimal are dropped.
impl FromStr for Rate {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let percent = Amount::from_str(s.trim().trim_end_matches('%'))?;
        if percent.is_negative() {
            return Err(AmountError::Parse(s.into()));
        }

        // Amount keeps four decimals, basis points keep two
        let basis_points = u32::try_from(percent.raw() / 100).map_err(|_| AmountError::Overflow)?;
        Ok(Rate { basis_points })
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.basis_points / 100, self.basis_points % 100)
    }
}
