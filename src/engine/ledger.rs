use chrono::{DateTime, Utc};
use std::fmt;

use crate::engine::{AccountNumber, Amount, TransactionKind};

/// Ledger-assigned identifier, rendered as `TXN` followed by a zero-padded
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TXN{:03}", self.0)
    }
}

/// One balance-affecting event. Records are never changed once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub account: AccountNumber,
    pub kind: TransactionKind,
    pub amount: Amount,
    /// Charged on top of `amount` (savings withdrawal fee), zero otherwise.
    pub fee: Amount,
    pub balance_after: Amount,
    pub timestamp: DateTime<Utc>,
}

/// Append-only record log shared by every account.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<TransactionRecord>,
    last_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn append(
        &mut self,
        account: AccountNumber,
        kind: TransactionKind,
        amount: Amount,
        fee: Amount,
        balance_after: Amount,
    ) -> TransactionId {
        self.last_id += 1;
        let id = TransactionId(self.last_id);

        log::debug!("Ledger append {id}: {kind} {amount} on {account}, balance {balance_after}");
        self.records.push(TransactionRecord {
            id,
            account,
            kind,
            amount,
            fee,
            balance_after,
            timestamp: Utc::now(),
        });
        id
    }

    /// Records in append order.
    pub fn iter(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter()
    }

    pub fn for_account<'a>(
        &'a self,
        account: &'a AccountNumber,
    ) -> impl DoubleEndedIterator<Item = &'a TransactionRecord> {
        self.records.iter().filter(move |r| &r.account == account)
    }

    pub fn get(&self, id: TransactionId) -> Option<&TransactionRecord> {
        // Ids are dense and start at 1
        let position = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_that_ids_are_monotonic_and_formatted() {
        let mut ledger = Ledger::new();
        let acc = AccountNumber::new(1);

        let first = ledger.append(
            acc.clone(),
            TransactionKind::Deposit,
            Amount::from_units(10),
            Amount::ZERO,
            Amount::from_units(10),
        );
        let second = ledger.append(
            acc,
            TransactionKind::Withdrawal,
            Amount::from_units(5),
            Amount::from_units(2),
            Amount::from_units(3),
        );

        assert!(first < second);
        assert_eq!(first.to_string(), "TXN001");
        assert_eq!(second.to_string(), "TXN002");
        assert_eq!(ledger.get(second).unwrap().fee, Amount::from_units(2));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_that_records_are_filtered_by_account() {
        let mut ledger = Ledger::new();
        let a = AccountNumber::new(1);
        let b = AccountNumber::new(2);

        for (account, units) in [(&a, 1), (&b, 2), (&a, 3)] {
            ledger.append(
                account.clone(),
                TransactionKind::Deposit,
                Amount::from_units(units),
                Amount::ZERO,
                Amount::from_units(units),
            );
        }

        let amounts: Vec<_> = ledger.for_account(&a).map(|r| r.amount).collect();
        assert_eq!(amounts, vec![Amount::from_units(1), Amount::from_units(3)]);
        assert_eq!(ledger.for_account(&AccountNumber::new(9)).count(), 0);
        assert!(!ledger.is_empty());
    }
}
