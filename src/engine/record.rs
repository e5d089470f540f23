use serde::Deserialize;
use thiserror::Error;

use crate::engine::{
    AccountNumber, AccountType, Amount, CustomerCategory, CustomerProfile, Operation,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing `{field}` for {typ:?} record")]
    MissingField {
        typ: RecordType,
        field: &'static str,
    },
}

/// One row of the batch input CSV.
#[derive(Deserialize, Debug, Clone)]
pub struct InputRecord {
    #[serde(rename = "type")]
    pub typ: RecordType,
    pub account: Option<AccountNumber>,
    pub to: Option<AccountNumber>,
    pub amount: Option<Amount>,
    pub owner: Option<String>,
    pub category: Option<CustomerCategory>,
    pub kind: Option<AccountType>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    Fee,
}

/// What a row asks the bank to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open {
        owner: String,
        category: CustomerCategory,
        kind: AccountType,
        initial_deposit: Amount,
        profile: CustomerProfile,
    },
    Execute(Operation),
    /// `None` charges every account.
    MonthlyFee(Option<AccountNumber>),
}

impl InputRecord {
    fn require<T: Clone>(&self, value: &Option<T>, field: &'static str) -> Result<T, RecordError> {
        value.clone().ok_or(RecordError::MissingField {
            typ: self.typ,
            field,
        })
    }

    pub fn to_command(&self) -> Result<Command, RecordError> {
        let command = match self.typ {
            RecordType::Open => Command::Open {
                owner: self.require(&self.owner, "owner")?,
                category: self.require(&self.category, "category")?,
                kind: self.require(&self.kind, "kind")?,
                initial_deposit: self.require(&self.amount, "amount")?,
                profile: CustomerProfile {
                    age: self.age,
                    contact: self.contact.clone(),
                    address: self.address.clone(),
                },
            },
            RecordType::Deposit => Command::Execute(Operation::Deposit {
                account: self.require(&self.account, "account")?,
                amount: self.require(&self.amount, "amount")?,
            }),
            RecordType::Withdraw => Command::Execute(Operation::Withdraw {
                account: self.require(&self.account, "account")?,
                amount: self.require(&self.amount, "amount")?,
            }),
            RecordType::Transfer => Command::Execute(Operation::Transfer {
                from: self.require(&self.account, "account")?,
                to: self.require(&self.to, "to")?,
                amount: self.require(&self.amount, "amount")?,
            }),
            RecordType::Fee => Command::MonthlyFee(self.account.clone()),
        };

        Ok(command)
    }
}
