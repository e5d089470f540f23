use thiserror::Error;

use crate::engine::{
    AccountNumber, AccountOperationError, AmountError, CustomerError, DirectoryError,
};

/// Every failure the bank reports to its caller. None of them leave balances
/// or the ledger partially updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("Cannot transfer from {0} to itself")]
    SameAccountTransfer(AccountNumber),

    #[error("Account operation failed: {0}")]
    Account(#[from] AccountOperationError),

    #[error("Customer registration failed: {0}")]
    Customer(#[from] CustomerError),

    #[error("Directory operation failed: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Amount arithmetic failed: {0}")]
    Amount(#[from] AmountError),
}

impl BankError {
    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, BankError::Account(AccountOperationError::InvalidAmount(_)))
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(
            self,
            BankError::Account(AccountOperationError::InsufficientFunds { .. })
        )
    }

    pub fn is_overdraft_exceeded(&self) -> bool {
        matches!(
            self,
            BankError::Account(AccountOperationError::OverdraftExceeded { .. })
        )
    }
}
