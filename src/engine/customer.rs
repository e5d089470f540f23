use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::engine::{PolicyConfig, Rate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerError {
    #[error("Customer age must be greater than 0, got {0}")]
    InvalidAge(u32),
}

/// Customer identifier, rendered as `CUS` followed by a zero-padded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(u32);

impl CustomerId {
    pub fn new(sequence: u32) -> Self {
        CustomerId(sequence)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CUS{:03}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("CUS")
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(CustomerId)
            .ok_or_else(|| format!("invalid customer id: {s}"))
    }
}

impl TryFrom<String> for CustomerId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CustomerId> for String {
    fn from(value: CustomerId) -> Self {
        value.to_string()
    }
}

/// Drives fee waivers and interest rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerCategory {
    Regular,
    Premium,
}

impl CustomerCategory {
    pub fn interest_rate(&self, policy: &PolicyConfig) -> Rate {
        match self {
            CustomerCategory::Regular => policy.regular_interest_rate,
            CustomerCategory::Premium => policy.premium_interest_rate,
        }
    }

    pub fn waives_monthly_fee(&self) -> bool {
        matches!(self, CustomerCategory::Premium)
    }
}

impl fmt::Display for CustomerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerCategory::Regular => write!(f, "Regular"),
            CustomerCategory::Premium => write!(f, "Premium"),
        }
    }
}

/// Optional personal details kept alongside a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerProfile {
    pub age: Option<u32>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

/// Account owner. Immutable once registered and shared by every account
/// that references it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    name: String,
    category: CustomerCategory,
    profile: CustomerProfile,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        category: CustomerCategory,
        profile: CustomerProfile,
    ) -> Result<Self, CustomerError> {
        if profile.age == Some(0) {
            return Err(CustomerError::InvalidAge(0));
        }

        Ok(Customer {
            id,
            name: name.into(),
            category,
            profile,
        })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> CustomerCategory {
        self.category
    }

    pub fn age(&self) -> Option<u32> {
        self.profile.age
    }

    pub fn contact(&self) -> Option<&str> {
        self.profile.contact.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.profile.address.as_deref()
    }
}
