use crate::engine::{
    AccountDirectory, AccountNumber, AccountSnapshot, Amount, BankError, Ledger, TransactionKind,
    TransactionRecord,
};

/// Account history with its aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub account: AccountSnapshot,
    /// Newest first.
    pub transactions: Vec<TransactionRecord>,
    /// Deposits and incoming transfers.
    pub total_deposits: Amount,
    /// Withdrawals and outgoing transfers, fees excluded.
    pub total_withdrawals: Amount,
    /// Withdrawal fees and monthly fees.
    pub total_fees: Amount,
    /// `total_deposits - total_withdrawals`.
    pub net_change: Amount,
}

/// Read-only view over the directory and ledger.
pub struct StatementReporter<'a> {
    directory: &'a AccountDirectory,
    ledger: &'a Ledger,
}

impl<'a> StatementReporter<'a> {
    pub fn new(directory: &'a AccountDirectory, ledger: &'a Ledger) -> Self {
        StatementReporter { directory, ledger }
    }

    pub fn statement(&self, number: &AccountNumber) -> Result<Statement, BankError> {
        let account = self
            .directory
            .get_account(number)
            .ok_or_else(|| BankError::AccountNotFound(number.clone()))?;

        let mut total_deposits = Amount::ZERO;
        let mut total_withdrawals = Amount::ZERO;
        let mut total_fees = Amount::ZERO;

        for record in self.ledger.for_account(number) {
            total_fees = total_fees.add(&record.fee)?;
            if record.kind.is_credit() {
                total_deposits = total_deposits.add(&record.amount)?;
            } else if record.kind.is_debit() {
                total_withdrawals = total_withdrawals.add(&record.amount)?;
            } else if record.kind == TransactionKind::Fee {
                total_fees = total_fees.add(&record.amount)?;
            }
        }

        Ok(Statement {
            account: AccountSnapshot::try_from(account)?,
            transactions: self.ledger.for_account(number).rev().cloned().collect(),
            total_deposits,
            total_withdrawals,
            total_fees,
            net_change: total_deposits.sub(&total_withdrawals)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Account, AccountKind, AccountType, Customer, CustomerCategory, CustomerId, CustomerProfile, PolicyConfig};
    use std::rc::Rc;

    #[test]
    fn test_that_statement_aggregates_by_kind() {
        let policy = PolicyConfig::default();
        let owner = Rc::new(Customer::new(CustomerId::new(1), "John Smith", CustomerCategory::Regular, CustomerProfile::default()).unwrap());
        let mut directory = AccountDirectory::new(10);
        let number = directory.generate_account_number();
        let kind = AccountKind::from_policy(AccountType::Savings, &owner, &policy);
        directory
            .add_account(Account::new(number.clone(), owner, kind, Amount::from_units(1000)))
            .unwrap();

        let mut ledger = Ledger::new();
        let entries = [
            (TransactionKind::Deposit, 500, 0, 1500),
            (TransactionKind::Withdrawal, 200, 2, 1298),
            (TransactionKind::TransferIn, 100, 0, 1398),
            (TransactionKind::TransferOut, 300, 2, 1096),
        ];
        for (kind, amount, fee, after) in entries {
            ledger.append(
                number.clone(),
                kind,
                Amount::from_units(amount),
                Amount::from_units(fee),
                Amount::from_units(after),
            );
        }
        ledger.append(
            AccountNumber::new(77),
            TransactionKind::Deposit,
            Amount::from_units(9),
            Amount::ZERO,
            Amount::from_units(9),
        );

        let reporter = StatementReporter::new(&directory, &ledger);
        let statement = reporter.statement(&number).unwrap();

        assert_eq!(statement.total_deposits, Amount::from_units(600));
        assert_eq!(statement.total_withdrawals, Amount::from_units(500));
        assert_eq!(statement.total_fees, Amount::from_units(4));
        assert_eq!(statement.net_change, Amount::from_units(100));

        let kinds: Vec<_> = statement.transactions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::TransferOut,
                TransactionKind::TransferIn,
                TransactionKind::Withdrawal,
                TransactionKind::Deposit,
            ]
        );

        // Pure read
        assert_eq!(reporter.statement(&number).unwrap(), statement);
    }

    #[test]
    fn test_that_unknown_account_is_reported() {
        let directory = AccountDirectory::new(10);
        let ledger = Ledger::new();
        let reporter = StatementReporter::new(&directory, &ledger);
        let missing = AccountNumber::from("ACC001");

        assert_eq!(
            reporter.statement(&missing),
            Err(BankError::AccountNotFound(missing))
        );
    }
}
