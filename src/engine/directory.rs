use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::engine::{Account, Amount, AmountError};

/// Account identifier, `ACC` followed by a zero-padded sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(sequence: u32) -> Self {
        AccountNumber(format!("ACC{sequence:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountNumber {
    fn from(value: &str) -> Self {
        AccountNumber(value.trim().to_owned())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Account {0} already exists")]
    DuplicateAccount(AccountNumber),

    #[error("Directory is full ({0} accounts)")]
    CapacityExceeded(usize),
}

/// Owns every live account, keyed by number and listed in insertion order.
pub struct AccountDirectory {
    accounts: Vec<Account>,
    index: HashMap<AccountNumber, usize>,
    last_number: u32,
    capacity: usize,
}

impl AccountDirectory {
    pub fn new(capacity: usize) -> Self {
        AccountDirectory {
            accounts: Vec::new(),
            index: HashMap::new(),
            last_number: 0,
            capacity,
        }
    }

    /// Numbers are handed out once, even if the account is never added or
    /// is removed later.
    pub fn generate_account_number(&mut self) -> AccountNumber {
        self.last_number += 1;
        AccountNumber::new(self.last_number)
    }

    pub fn add_account(&mut self, account: Account) -> Result<(), DirectoryError> {
        if self.index.contains_key(account.number()) {
            return Err(DirectoryError::DuplicateAccount(account.number().clone()));
        }
        if self.accounts.len() >= self.capacity {
            return Err(DirectoryError::CapacityExceeded(self.capacity));
        }

        self.index.insert(account.number().clone(), self.accounts.len());
        self.accounts.push(account);
        Ok(())
    }

    pub fn get_account(&self, number: &AccountNumber) -> Option<&Account> {
        self.index.get(number).map(|&i| &self.accounts[i])
    }

    pub(crate) fn get_account_mut(&mut self, number: &AccountNumber) -> Option<&mut Account> {
        self.index.get(number).map(|&i| &mut self.accounts[i])
    }

    pub fn contains(&self, number: &AccountNumber) -> bool {
        self.index.contains_key(number)
    }

    pub fn remove_account(&mut self, number: &AccountNumber) -> Option<Account> {
        let position = self.index.remove(number)?;
        let account = self.accounts.remove(position);

        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(account)
    }

    /// Accounts in directory order. Call again to restart.
    pub fn list_all(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub(crate) fn list_all_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.iter_mut()
    }

    pub fn total_balance(&self) -> Result<Amount, AmountError> {
        self.accounts
            .iter()
            .try_fold(Amount::ZERO, |total, account| total.add(&account.balance()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
