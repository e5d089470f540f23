use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::engine::{AccountNumber, Amount, AmountError, Customer, PolicyConfig, Rate};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountOperationError {
    #[error("Invalid amount {0}: must be greater than 0")]
    InvalidAmount(Amount),

    #[error(
        "Insufficient funds: balance {balance}, requested {requested}, minimum balance {minimum}"
    )]
    InsufficientFunds {
        balance: Amount,
        requested: Amount,
        minimum: Amount,
    },

    #[error("Overdraft limit exceeded: balance {balance}, requested {requested}, limit {limit}")]
    OverdraftExceeded {
        balance: Amount,
        requested: Amount,
        limit: Amount,
    },

    #[error("Amount arithmetic failed: {0}")]
    Amount(#[from] AmountError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Checking,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Savings => write!(f, "Savings"),
            AccountType::Checking => write!(f, "Checking"),
        }
    }
}

/// `Closed` is reserved, nothing transitions an account into it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Closed,
}

/// Withdrawal policy, fixed for the lifetime of the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountKind {
    Savings {
        minimum_balance: Amount,
        withdrawal_fee: Amount,
        interest_rate: Rate,
    },
    Checking {
        overdraft_limit: Amount,
        monthly_fee: Amount,
    },
}

impl AccountKind {
    /// Captures the current policy constants for a new account of `typ`.
    pub fn from_policy(typ: AccountType, owner: &Customer, policy: &PolicyConfig) -> Self {
        match typ {
            AccountType::Savings => AccountKind::Savings {
                minimum_balance: policy.savings_minimum_balance,
                withdrawal_fee: policy.savings_withdrawal_fee,
                interest_rate: owner.category().interest_rate(policy),
            },
            AccountType::Checking => AccountKind::Checking {
                overdraft_limit: policy.checking_overdraft_limit,
                monthly_fee: policy.checking_monthly_fee,
            },
        }
    }

    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::Checking { .. } => AccountType::Checking,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    number: AccountNumber,
    owner: Rc<Customer>,
    balance: Amount,
    status: AccountStatus,
    kind: AccountKind,
}

impl Account {
    pub fn new(number: AccountNumber, owner: Rc<Customer>, kind: AccountKind, balance: Amount) -> Self {
        Account {
            number,
            owner,
            balance,
            status: AccountStatus::Active,
            kind,
        }
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn owner(&self) -> &Rc<Customer> {
        &self.owner
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    pub fn minimum_balance(&self) -> Option<Amount> {
        match self.kind {
            AccountKind::Savings { minimum_balance, .. } => Some(minimum_balance),
            AccountKind::Checking { .. } => None,
        }
    }

    pub fn overdraft_limit(&self) -> Option<Amount> {
        match self.kind {
            AccountKind::Checking { overdraft_limit, .. } => Some(overdraft_limit),
            AccountKind::Savings { .. } => None,
        }
    }

    pub fn interest_rate(&self) -> Option<Rate> {
        match self.kind {
            AccountKind::Savings { interest_rate, .. } => Some(interest_rate),
            AccountKind::Checking { .. } => None,
        }
    }

    pub fn monthly_fee(&self) -> Option<Amount> {
        match self.kind {
            AccountKind::Checking { monthly_fee, .. } => Some(monthly_fee),
            AccountKind::Savings { .. } => None,
        }
    }

    /// Fee charged on top of every withdrawal.
    pub fn withdrawal_fee(&self) -> Amount {
        match self.kind {
            AccountKind::Savings { withdrawal_fee, .. } => withdrawal_fee,
            AccountKind::Checking { .. } => Amount::ZERO,
        }
    }

    /// Largest single withdrawal the policy currently permits. Never negative.
    pub fn max_withdrawal(&self) -> Result<Amount, AmountError> {
        let max = match self.kind {
            AccountKind::Savings {
                minimum_balance,
                withdrawal_fee,
                ..
            } => self.balance.sub(&minimum_balance)?.sub(&withdrawal_fee)?,
            AccountKind::Checking {
                overdraft_limit, ..
            } => self.balance.add(&overdraft_limit)?,
        };

        Ok(max.max(Amount::ZERO))
    }

    /// A year of interest at the current balance. Zero for checking accounts
    /// and for balances that are not positive.
    pub fn projected_interest(&self) -> Result<Amount, AmountError> {
        match self.kind {
            AccountKind::Savings { interest_rate, .. } if self.balance.is_positive() => {
                self.balance.apply_rate(interest_rate)
            }
            _ => Ok(Amount::ZERO),
        }
    }

    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, AccountOperationError> {
        if !amount.is_positive() {
            return Err(AccountOperationError::InvalidAmount(amount));
        }

        self.balance = self.balance.add(&amount)?;
        Ok(self.balance)
    }

    /// Debits `amount` (plus the withdrawal fee for savings) and returns the
    /// total taken from the balance. The balance is untouched on error.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, AccountOperationError> {
        if !amount.is_positive() {
            return Err(AccountOperationError::InvalidAmount(amount));
        }

        let (debit, new_balance) = match self.kind {
            AccountKind::Savings {
                minimum_balance,
                withdrawal_fee,
                ..
            } => {
                let debit = amount.add(&withdrawal_fee)?;
                let new_balance = self.balance.sub(&debit)?;
                if new_balance < minimum_balance {
                    return Err(AccountOperationError::InsufficientFunds {
                        balance: self.balance,
                        requested: debit,
                        minimum: minimum_balance,
                    });
                }
                (debit, new_balance)
            }
            AccountKind::Checking {
                overdraft_limit, ..
            } => {
                let new_balance = self.balance.sub(&amount)?;
                if new_balance < overdraft_limit.neg()? {
                    return Err(AccountOperationError::OverdraftExceeded {
                        balance: self.balance,
                        requested: amount,
                        limit: overdraft_limit,
                    });
                }
                (amount, new_balance)
            }
        };

        self.balance = new_balance;
        Ok(debit)
    }

    /// Charges the monthly fee and returns it, or `None` when nothing was
    /// charged: savings accounts, owners whose category waives the fee, and
    /// balances below the fee are all skipped.
    pub fn apply_monthly_fee(&mut self) -> Result<Option<Amount>, AccountOperationError> {
        let AccountKind::Checking { monthly_fee, .. } = self.kind else {
            return Ok(None);
        };

        if self.owner.category().waives_monthly_fee() {
            return Ok(None);
        }

        if !monthly_fee.is_positive() || self.balance < monthly_fee {
            return Ok(None);
        }

        self.balance = self.balance.sub(&monthly_fee)?;
        Ok(Some(monthly_fee))
    }

    pub(crate) fn restore_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }
}
