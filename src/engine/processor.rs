use crate::engine::{
    AccountDirectory, AccountNumber, AccountOperationError, Amount, BankError, Ledger, Operation,
    TransactionId, TransactionKind,
};

/// Sole writer of balances and the ledger. Every operation either applies in
/// full with its ledger records or leaves no trace.
pub struct TransactionProcessor<'a> {
    directory: &'a mut AccountDirectory,
    ledger: &'a mut Ledger,
}

/// A balance change applied to one account but not yet recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLeg {
    pub account: AccountNumber,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub fee: Amount,
    pub balance_before: Amount,
    pub balance_after: Amount,
}

/// An applied operation awaiting confirmation. Holds the processor
/// exclusively, so nothing else can touch balances until it is settled.
///
/// `commit` writes one ledger record per leg. `compensate` puts every touched
/// balance back and writes nothing. Dropping an unsettled `Tentative`
/// compensates.
#[must_use = "a tentative operation is rolled back unless committed"]
pub struct Tentative<'p> {
    directory: &'p mut AccountDirectory,
    ledger: &'p mut Ledger,
    legs: Vec<PendingLeg>,
    settled: bool,
}

impl<'p> Tentative<'p> {
    fn begin(directory: &'p mut AccountDirectory, ledger: &'p mut Ledger) -> Self {
        Tentative {
            directory,
            ledger,
            legs: Vec::with_capacity(2),
            settled: false,
        }
    }

    /// Transfers check both accounts and the amount before touching either
    /// balance, then debit the source before crediting the destination.
    pub(crate) fn apply(
        directory: &'p mut AccountDirectory,
        ledger: &'p mut Ledger,
        operation: &Operation,
    ) -> Result<Self, BankError> {
        log::debug!("Applying {operation}");
        let mut tentative = Tentative::begin(directory, ledger);

        match operation {
            Operation::Deposit { account, amount } => {
                tentative.credit(account, *amount, TransactionKind::Deposit)?;
            }
            Operation::Withdraw { account, amount } => {
                tentative.debit(account, *amount, TransactionKind::Withdrawal)?;
            }
            Operation::Transfer { from, to, amount } => {
                for number in [from, to] {
                    if !tentative.directory.contains(number) {
                        return Err(BankError::AccountNotFound(number.clone()));
                    }
                }
                if from == to {
                    return Err(BankError::SameAccountTransfer(from.clone()));
                }
                if !amount.is_positive() {
                    return Err(AccountOperationError::InvalidAmount(*amount).into());
                }

                tentative.debit(from, *amount, TransactionKind::TransferOut)?;
                tentative.credit(to, *amount, TransactionKind::TransferIn)?;
            }
        }

        Ok(tentative)
    }

    fn credit(
        &mut self,
        number: &AccountNumber,
        amount: Amount,
        kind: TransactionKind,
    ) -> Result<(), BankError> {
        let account = self
            .directory
            .get_account_mut(number)
            .ok_or_else(|| BankError::AccountNotFound(number.clone()))?;

        let balance_before = account.balance();
        let balance_after = account.deposit(amount)?;

        self.legs.push(PendingLeg {
            account: number.clone(),
            kind,
            amount,
            fee: Amount::ZERO,
            balance_before,
            balance_after,
        });
        Ok(())
    }

    fn debit(
        &mut self,
        number: &AccountNumber,
        amount: Amount,
        kind: TransactionKind,
    ) -> Result<(), BankError> {
        let account = self
            .directory
            .get_account_mut(number)
            .ok_or_else(|| BankError::AccountNotFound(number.clone()))?;

        let balance_before = account.balance();
        let fee = account.withdrawal_fee();
        account.withdraw(amount)?;

        self.legs.push(PendingLeg {
            account: number.clone(),
            kind,
            amount,
            fee,
            balance_before,
            balance_after: account.balance(),
        });
        Ok(())
    }

    pub fn legs(&self) -> &[PendingLeg] {
        &self.legs
    }

    pub fn commit(mut self) -> Vec<TransactionId> {
        self.settled = true;
        let legs = std::mem::take(&mut self.legs);

        legs.into_iter()
            .map(|leg| {
                self.ledger
                    .append(leg.account, leg.kind, leg.amount, leg.fee, leg.balance_after)
            })
            .collect()
    }

    pub fn compensate(mut self) {
        log::debug!("Compensating {} leg(s)", self.legs.len());
        self.rollback();
    }

    fn rollback(&mut self) {
        self.settled = true;
        for leg in self.legs.drain(..).rev() {
            if let Some(account) = self.directory.get_account_mut(&leg.account) {
                log::debug!(
                    "Restoring {} from {} to {}",
                    leg.account,
                    leg.balance_after,
                    leg.balance_before
                );
                account.restore_balance(leg.balance_before);
            }
        }
    }
}

impl Drop for Tentative<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if !self.legs.is_empty() {
            log::warn!("Rolling back {} unsettled leg(s)", self.legs.len());
        }
        self.rollback();
    }
}

impl<'a> TransactionProcessor<'a> {
    pub fn new(directory: &'a mut AccountDirectory, ledger: &'a mut Ledger) -> Self {
        TransactionProcessor { directory, ledger }
    }

    /// Validates and applies `operation` without recording it.
    pub fn tentative(&mut self, operation: &Operation) -> Result<Tentative<'_>, BankError> {
        Tentative::apply(&mut *self.directory, &mut *self.ledger, operation)
    }

    /// Applies and records `operation`, returning one id per ledger record.
    pub fn process(&mut self, operation: &Operation) -> Result<Vec<TransactionId>, BankError> {
        Ok(self.tentative(operation)?.commit())
    }

    pub fn deposit(&mut self, account: &AccountNumber, amount: Amount) -> Result<(), BankError> {
        self.process(&Operation::Deposit {
            account: account.clone(),
            amount,
        })
        .map(|_| ())
    }

    pub fn withdraw(&mut self, account: &AccountNumber, amount: Amount) -> Result<(), BankError> {
        self.process(&Operation::Withdraw {
            account: account.clone(),
            amount,
        })
        .map(|_| ())
    }

    pub fn transfer(
        &mut self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Amount,
    ) -> Result<(), BankError> {
        self.process(&Operation::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        })
        .map(|_| ())
    }

    /// Charges the monthly fee on one account, recording a `Fee` entry when
    /// something was actually charged.
    pub fn apply_monthly_fee(
        &mut self,
        number: &AccountNumber,
    ) -> Result<Option<TransactionId>, BankError> {
        let account = self
            .directory
            .get_account_mut(number)
            .ok_or_else(|| BankError::AccountNotFound(number.clone()))?;

        let Some(fee) = account.apply_monthly_fee()? else {
            log::debug!("No monthly fee charged on {number}");
            return Ok(None);
        };

        let id = self.ledger.append(
            number.clone(),
            TransactionKind::Fee,
            fee,
            Amount::ZERO,
            account.balance(),
        );
        Ok(Some(id))
    }

    /// Runs the monthly fee over every account in directory order.
    pub fn apply_monthly_fees(&mut self) -> Result<Vec<TransactionId>, BankError> {
        let mut ids = Vec::new();

        for account in self.directory.list_all_mut() {
            if let Some(fee) = account.apply_monthly_fee()? {
                ids.push(self.ledger.append(
                    account.number().clone(),
                    TransactionKind::Fee,
                    fee,
                    Amount::ZERO,
                    account.balance(),
                ));
            }
        }

        log::info!("Monthly fees charged on {} account(s)", ids.len());
        Ok(ids)
    }
}
