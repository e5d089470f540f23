use serde::{Deserialize, Serialize};

use crate::engine::{
    Account, AccountNumber, AccountStatus, AccountType, Amount, AmountError, CustomerCategory,
    CustomerId,
};

/// A Snapshot of an Account to easily view the content.
/// It decouples callers from the live Account and serialises as one CSV row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccountSnapshot {
    pub account: AccountNumber,
    pub customer: CustomerId,
    pub owner: String,
    pub category: CustomerCategory,
    pub kind: AccountType,
    pub balance: Amount,
    pub status: AccountStatus,
    /// Largest single withdrawal currently permitted.
    pub available: Amount,
}

impl TryFrom<&Account> for AccountSnapshot {
    type Error = AmountError;

    fn try_from(account: &Account) -> Result<Self, Self::Error> {
        let owner = account.owner();
        Ok(AccountSnapshot {
            account: account.number().clone(),
            customer: owner.id(),
            owner: owner.name().to_owned(),
            category: owner.category(),
            kind: account.account_type(),
            balance: account.balance(),
            status: account.status(),
            available: account.max_withdrawal()?,
        })
    }
}
