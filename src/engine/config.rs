use std::str::FromStr;
use thiserror::Error;

use crate::engine::{Amount, Rate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Fee and limit constants applied to accounts when they are opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    pub savings_minimum_balance: Amount,
    pub savings_withdrawal_fee: Amount,
    pub checking_overdraft_limit: Amount,
    pub checking_monthly_fee: Amount,
    pub regular_interest_rate: Rate,
    pub premium_interest_rate: Rate,
    pub directory_capacity: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            savings_minimum_balance: Amount::from_units(100),
            savings_withdrawal_fee: Amount::from_units(2),
            checking_overdraft_limit: Amount::from_units(500),
            checking_monthly_fee: Amount::from_units(10),
            regular_interest_rate: Rate::from_basis_points(200),
            premium_interest_rate: Rate::from_basis_points(350),
            directory_capacity: 50,
        }
    }
}

fn override_with<T, F>(
    lookup: &F,
    var: &'static str,
    target: &mut T,
    validate: fn(&T) -> Result<(), String>,
) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(());
    };

    let invalid = |reason: String| ConfigError::Invalid {
        var,
        value: value.clone(),
        reason,
    };

    let parsed = value.trim().parse::<T>().map_err(|e| invalid(e.to_string()))?;
    validate(&parsed).map_err(invalid)?;

    log::debug!("Policy override {var}={value}");
    *target = parsed;
    Ok(())
}

fn non_negative(amount: &Amount) -> Result<(), String> {
    if amount.is_negative() {
        Err("must not be negative".into())
    } else {
        Ok(())
    }
}

fn any_rate(_: &Rate) -> Result<(), String> {
    Ok(())
}

fn at_least_one(capacity: &usize) -> Result<(), String> {
    if *capacity == 0 {
        Err("must be at least 1".into())
    } else {
        Ok(())
    }
}

impl PolicyConfig {
    /// Defaults overridden by `BANK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PolicyConfig::default();

        override_with(
            &lookup,
            "BANK_SAVINGS_MINIMUM_BALANCE",
            &mut config.savings_minimum_balance,
            non_negative,
        )?;
        override_with(
            &lookup,
            "BANK_SAVINGS_WITHDRAWAL_FEE",
            &mut config.savings_withdrawal_fee,
            non_negative,
        )?;
        override_with(
            &lookup,
            "BANK_CHECKING_OVERDRAFT_LIMIT",
            &mut config.checking_overdraft_limit,
            non_negative,
        )?;
        override_with(
            &lookup,
            "BANK_CHECKING_MONTHLY_FEE",
            &mut config.checking_monthly_fee,
            non_negative,
        )?;
        override_with(
            &lookup,
            "BANK_REGULAR_INTEREST_RATE",
            &mut config.regular_interest_rate,
            any_rate,
        )?;
        override_with(
            &lookup,
            "BANK_PREMIUM_INTEREST_RATE",
            &mut config.premium_interest_rate,
            any_rate,
        )?;
        override_with(
            &lookup,
            "BANK_DIRECTORY_CAPACITY",
            &mut config.directory_capacity,
            at_least_one,
        )?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_that_missing_variables_keep_defaults() {
        let config = PolicyConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn test_that_variables_override_defaults() {
        let config = PolicyConfig::from_lookup(lookup_from(&[
            ("BANK_SAVINGS_MINIMUM_BALANCE", "50"),
            ("BANK_SAVINGS_WITHDRAWAL_FEE", "0"),
            ("BANK_CHECKING_OVERDRAFT_LIMIT", "1000"),
            ("BANK_PREMIUM_INTEREST_RATE", "4.25"),
            ("BANK_DIRECTORY_CAPACITY", "3"),
        ]))
        .unwrap();

        assert_eq!(config.savings_minimum_balance, Amount::from_units(50));
        assert_eq!(config.savings_withdrawal_fee, Amount::ZERO);
        assert_eq!(config.checking_overdraft_limit, Amount::from_units(1000));
        assert_eq!(config.checking_monthly_fee, Amount::from_units(10));
        assert_eq!(config.premium_interest_rate, Rate::from_basis_points(425));
        assert_eq!(config.directory_capacity, 3);
    }

    #[test]
    fn test_that_invalid_values_name_the_variable() {
        let result = PolicyConfig::from_lookup(lookup_from(&[("BANK_CHECKING_MONTHLY_FEE", "-10")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { var: "BANK_CHECKING_MONTHLY_FEE", .. })
        ));

        let result = PolicyConfig::from_lookup(lookup_from(&[("BANK_DIRECTORY_CAPACITY", "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { var: "BANK_DIRECTORY_CAPACITY", .. })
        ));

        let result = PolicyConfig::from_lookup(lookup_from(&[("BANK_DIRECTORY_CAPACITY", "0")]));
        assert!(result.is_err());
    }
}
