use std::rc::Rc;

use crate::engine::{
    Account, AccountDirectory, AccountKind, AccountNumber, AccountOperationError, AccountSnapshot,
    AccountType, Amount, BankError, Customer, CustomerCategory, CustomerId, CustomerProfile, Ledger,
    Operation, PolicyConfig, Statement, StatementReporter, Tentative, TransactionId, TransactionProcessor,
};

/// Entry point for callers: owns the directory, the ledger and the policy
/// used for new accounts.
///
/// Single threaded. Sharing a `Bank` across threads would need every
/// mutating call serialised behind one lock.
pub struct Bank {
    policy: PolicyConfig,
    directory: AccountDirectory,
    ledger: Ledger,
    last_customer: u32,
}

impl Default for Bank {
    fn default() -> Self {
        Bank::new(PolicyConfig::default())
    }
}

impl Bank {
    pub fn new(policy: PolicyConfig) -> Self {
        Bank {
            directory: AccountDirectory::new(policy.directory_capacity),
            ledger: Ledger::new(),
            last_customer: 0,
            policy,
        }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Rejected profiles don't consume a customer id.
    pub fn register_customer(
        &mut self,
        name: impl Into<String>,
        category: CustomerCategory,
        profile: CustomerProfile,
    ) -> Result<Rc<Customer>, BankError> {
        let id = CustomerId::new(self.last_customer + 1);
        let customer = Customer::new(id, name, category, profile)?;
        self.last_customer += 1;

        log::debug!("Registered customer {} ({})", customer.id(), customer.category());
        Ok(Rc::new(customer))
    }

    /// Registers a customer together with their first account. If the
    /// account can't be opened the registration is undone.
    pub fn onboard(
        &mut self,
        name: impl Into<String>,
        category: CustomerCategory,
        profile: CustomerProfile,
        typ: AccountType,
        initial_deposit: Amount,
    ) -> Result<(Rc<Customer>, AccountNumber), BankError> {
        let customer = self.register_customer(name, category, profile)?;
        match self.open_account(&customer, typ, initial_deposit) {
            Ok(number) => Ok((customer, number)),
            Err(e) => {
                log::debug!("Withdrawing registration of {}", customer.id());
                self.last_customer -= 1;
                Err(e)
            }
        }
    }

    /// Opens an account with `initial_deposit` as its starting balance.
    /// The opening balance is not a ledger record.
    pub fn open_account(
        &mut self,
        owner: &Rc<Customer>,
        typ: AccountType,
        initial_deposit: Amount,
    ) -> Result<AccountNumber, BankError> {
        if !initial_deposit.is_positive() {
            return Err(AccountOperationError::InvalidAmount(initial_deposit).into());
        }

        let kind = AccountKind::from_policy(typ, owner, &self.policy);
        if let AccountKind::Savings {
            minimum_balance, ..
        } = &kind
        {
            if initial_deposit < *minimum_balance {
                return Err(AccountOperationError::InsufficientFunds {
                    balance: Amount::ZERO,
                    requested: initial_deposit,
                    minimum: *minimum_balance,
                }
                .into());
            }
        }

        let number = self.directory.generate_account_number();
        let account = Account::new(number.clone(), Rc::clone(owner), kind, initial_deposit);
        self.directory.add_account(account)?;

        log::info!(
            "Opened {typ} account {number} for {} with {initial_deposit}",
            owner.id()
        );
        Ok(number)
    }

    pub fn processor(&mut self) -> TransactionProcessor<'_> {
        TransactionProcessor::new(&mut self.directory, &mut self.ledger)
    }

    pub fn reporter(&self) -> StatementReporter<'_> {
        StatementReporter::new(&self.directory, &self.ledger)
    }

    pub fn deposit(&mut self, account: &AccountNumber, amount: Amount) -> Result<(), BankError> {
        self.processor().deposit(account, amount)
    }

    pub fn withdraw(&mut self, account: &AccountNumber, amount: Amount) -> Result<(), BankError> {
        self.processor().withdraw(account, amount)
    }

    pub fn transfer(
        &mut self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Amount,
    ) -> Result<(), BankError> {
        self.processor().transfer(from, to, amount)
    }

    pub fn process(&mut self, operation: &Operation) -> Result<Vec<TransactionId>, BankError> {
        self.processor().process(operation)
    }

    /// Applies `operation` pending confirmation, see [`Tentative`].
    pub fn tentative(&mut self, operation: &Operation) -> Result<Tentative<'_>, BankError> {
        Tentative::apply(&mut self.directory, &mut self.ledger, operation)
    }

    pub fn apply_monthly_fee(
        &mut self,
        account: &AccountNumber,
    ) -> Result<Option<TransactionId>, BankError> {
        self.processor().apply_monthly_fee(account)
    }

    pub fn apply_monthly_fees(&mut self) -> Result<Vec<TransactionId>, BankError> {
        self.processor().apply_monthly_fees()
    }

    pub fn get_account(&self, number: &AccountNumber) -> Result<AccountSnapshot, BankError> {
        let account = self
            .directory
            .get_account(number)
            .ok_or_else(|| BankError::AccountNotFound(number.clone()))?;
        Ok(AccountSnapshot::try_from(account)?)
    }

    /// Snapshots in directory order.
    pub fn list_accounts(&self) -> Result<Vec<AccountSnapshot>, BankError> {
        self.directory
            .list_all()
            .map(|account| AccountSnapshot::try_from(account).map_err(BankError::from))
            .collect()
    }

    pub fn statement(&self, number: &AccountNumber) -> Result<Statement, BankError> {
        self.reporter().statement(number)
    }

    pub fn total_balance(&self) -> Result<Amount, BankError> {
        Ok(self.directory.total_balance()?)
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CustomerError, DirectoryError};

    #[test]
    fn test_that_opening_validates_initial_deposit() {
        let mut bank = Bank::default();
        let owner = bank.register_customer("John Smith", CustomerCategory::Regular, CustomerProfile::default()).unwrap();

        let result = bank.open_account(&owner, AccountType::Checking, Amount::ZERO);
        assert!(result.unwrap_err().is_invalid_amount());

        let result = bank.open_account(&owner, AccountType::Savings, Amount::from_units(99));
        assert!(result.unwrap_err().is_insufficient_funds());

        // Failed openings don't consume numbers
        let number = bank
            .open_account(&owner, AccountType::Savings, Amount::from_units(100))
            .unwrap();
        assert_eq!(number.as_str(), "ACC001");
        assert!(bank.ledger().is_empty());
    }

    #[test]
    fn test_that_capacity_is_reported_at_opening() {
        let mut bank = Bank::new(PolicyConfig {
            directory_capacity: 1,
            ..PolicyConfig::default()
        });
        let owner = bank.register_customer("Jane Doe", CustomerCategory::Premium, CustomerProfile::default()).unwrap();

        bank.open_account(&owner, AccountType::Checking, Amount::from_units(10))
            .unwrap();
        let result = bank.open_account(&owner, AccountType::Checking, Amount::from_units(10));
        assert_eq!(
            result,
            Err(BankError::Directory(DirectoryError::CapacityExceeded(1)))
        );
    }

    #[test]
    fn test_that_customers_are_shared_between_accounts() {
        let mut bank = Bank::default();
        let owner = bank.register_customer("Jane Doe", CustomerCategory::Premium, CustomerProfile::default()).unwrap();
        let other = bank.register_customer("John Smith", CustomerCategory::Regular, CustomerProfile::default()).unwrap();
        assert_eq!(other.id().to_string(), "CUS002");

        let first = bank
            .open_account(&owner, AccountType::Savings, Amount::from_units(500))
            .unwrap();
        let second = bank
            .open_account(&owner, AccountType::Checking, Amount::from_units(50))
            .unwrap();

        let first = bank.get_account(&first).unwrap();
        let second = bank.get_account(&second).unwrap();
        assert_eq!(first.customer, second.customer);
        assert_eq!(first.owner, "Jane Doe");
        assert_eq!(Rc::strong_count(&owner), 3);
    }

    #[test]
    fn test_that_savings_capture_interest_rate_of_owner() {
        let mut bank = Bank::default();
        let premium = bank.register_customer("Jane Doe", CustomerCategory::Premium, CustomerProfile::default()).unwrap();
        let number = bank
            .open_account(&premium, AccountType::Savings, Amount::from_units(1000))
            .unwrap();

        let account = bank.directory().get_account(&number).unwrap();
        assert_eq!(account.projected_interest(), Ok(Amount::from_units(35)));
    }

    #[test]
    fn test_that_failed_onboarding_releases_customer_id() {
        let mut bank = Bank::default();

        let invalid_age = CustomerProfile {
            age: Some(0),
            ..CustomerProfile::default()
        };
        let result = bank.register_customer("Nobody", CustomerCategory::Regular, invalid_age);
        assert_eq!(result, Err(BankError::Customer(CustomerError::InvalidAge(0))));

        let result = bank.onboard(
            "Erin",
            CustomerCategory::Premium,
            CustomerProfile::default(),
            AccountType::Savings,
            Amount::from_units(20),
        );
        assert!(result.unwrap_err().is_insufficient_funds());
        assert!(bank.directory().is_empty());

        let profile = CustomerProfile {
            age: Some(31),
            contact: Some("heidi@example.com".into()),
            address: Some("1 Main St".into()),
        };
        let (customer, number) = bank
            .onboard(
                "Heidi",
                CustomerCategory::Regular,
                profile,
                AccountType::Checking,
                Amount::from_units(50),
            )
            .unwrap();
        assert_eq!(customer.id().to_string(), "CUS001");
        assert_eq!(customer.age(), Some(31));
        assert_eq!(customer.address(), Some("1 Main St"));
        assert_eq!(number.as_str(), "ACC001");
        assert_eq!(bank.get_account(&number).unwrap().customer, customer.id());
    }
}
