mod account;
mod account_snapshot;
mod amount;
mod bank;
mod config;
mod customer;
mod directory;
mod error;
mod ledger;
mod processor;
mod rate;
mod record;
mod statement;
mod transaction;

pub use account::{Account, AccountKind, AccountOperationError, AccountStatus, AccountType};
pub use account_snapshot::AccountSnapshot;
pub use amount::{Amount, AmountError};
pub use bank::Bank;
pub use config::{ConfigError, PolicyConfig};
pub use customer::{Customer, CustomerCategory, CustomerError, CustomerId, CustomerProfile};
pub use directory::{AccountDirectory, AccountNumber, DirectoryError};
pub use error::BankError;
pub use ledger::{Ledger, TransactionId, TransactionRecord};
pub use processor::{PendingLeg, Tentative, TransactionProcessor};
pub use rate::Rate;
pub use record::{Command, InputRecord, RecordError, RecordType};
pub use statement::{Statement, StatementReporter};
pub use transaction::{Operation, TransactionKind};
