use std::fmt;

use crate::engine::{AccountNumber, Amount};

/// Kind of a recorded ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    TransferOut,
    TransferIn,
    Fee,
}

impl TransactionKind {
    /// Money coming into the account.
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::TransferIn)
    }

    /// Money leaving the account at the owner's request. Fees are neither.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionKind::Withdrawal | TransactionKind::TransferOut)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::TransferOut => "TRANSFER_OUT",
            TransactionKind::TransferIn => "TRANSFER_IN",
            TransactionKind::Fee => "FEE",
        };
        f.write_str(label)
    }
}

/// A balance-affecting request from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Deposit {
        account: AccountNumber,
        amount: Amount,
    },
    Withdraw {
        account: AccountNumber,
        amount: Amount,
    },
    Transfer {
        from: AccountNumber,
        to: AccountNumber,
        amount: Amount,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Deposit { account, amount } => write!(f, "deposit {amount} into {account}"),
            Operation::Withdraw { account, amount } => write!(f, "withdraw {amount} from {account}"),
            Operation::Transfer { from, to, amount } => {
                write!(f, "transfer {amount} from {from} to {to}")
            }
        }
    }
}
