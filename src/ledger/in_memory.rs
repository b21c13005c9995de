use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{
    Account, Bank, BankId, Ledger, StorageError, TransactionRecord, Transfer, User, UserId,
};

/// HashMap-backed ledger, one map per table of the persisted schema.
/// Serves the binary's fixture-seeded store and every test.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    banks: HashMap<BankId, Bank>,
    users: HashMap<UserId, User>,
    accounts: HashMap<String, Account>,
    transactions: Vec<TransactionRecord>,
}

impl InMemoryLedger {
    pub fn new(
        banks: impl IntoIterator<Item = Bank>,
        users: impl IntoIterator<Item = User>,
        accounts: impl IntoIterator<Item = Account>,
    ) -> Self {
        Self {
            banks: banks.into_iter().map(|b| (b.id, b)).collect(),
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            accounts: accounts.into_iter().map(|a| (a.iban.clone(), a)).collect(),
            transactions: Vec::new(),
        }
    }

    pub fn balance(&self, iban: &str) -> Option<Decimal> {
        self.accounts.get(iban).map(|a| a.balance)
    }

    /// Sum over every account; transfers with a burned fee shrink this.
    pub fn total_balance(&self) -> Decimal {
        self.accounts.values().map(|a| a.balance).sum()
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }
}

impl Ledger for InMemoryLedger {
    fn user_by_credentials(
        &self,
        login_name: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .values()
            .find(|u| u.login == login_name && u.password == password)
            .cloned())
    }

    fn count_accounts(&self, user_id: UserId, bank_id: BankId) -> Result<u64, StorageError> {
        Ok(self
            .accounts
            .values()
            .filter(|a| a.user_id == user_id && a.bank_id == bank_id)
            .count() as u64)
    }

    fn list_banks(&self) -> Result<Vec<Bank>, StorageError> {
        let mut banks: Vec<Bank> = self.banks.values().cloned().collect();
        banks.sort_by_key(|b| b.id);
        Ok(banks)
    }

    fn list_accounts(
        &self,
        user_id: UserId,
        bank_id: BankId,
    ) -> Result<Vec<Account>, StorageError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .values()
            .filter(|a| a.user_id == user_id && a.bank_id == bank_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.iban.cmp(&b.iban));
        Ok(accounts)
    }

    fn account(&self, iban: &str) -> Result<Option<Account>, StorageError> {
        Ok(self.accounts.get(iban).cloned())
    }

    fn account_owned(
        &self,
        iban: &str,
        user_id: UserId,
        bank_id: BankId,
    ) -> Result<Option<Account>, StorageError> {
        Ok(self
            .accounts
            .get(iban)
            .filter(|a| a.user_id == user_id && a.bank_id == bank_id)
            .cloned())
    }

    fn bank(&self, id: BankId) -> Result<Option<Bank>, StorageError> {
        Ok(self.banks.get(&id).cloned())
    }

    fn apply_balance_delta(
        &mut self,
        iban: &str,
        user_id: UserId,
        bank_id: BankId,
        delta: Decimal,
    ) -> Result<(), StorageError> {
        let account = self
            .accounts
            .get_mut(iban)
            .filter(|a| a.user_id == user_id && a.bank_id == bank_id)
            .ok_or_else(|| StorageError(format!("no account row for iban {iban}")))?;
        account.balance += delta;
        Ok(())
    }

    fn insert_transaction(&mut self, record: TransactionRecord) -> Result<(), StorageError> {
        self.transactions.push(record);
        Ok(())
    }

    fn apply_transfer(&mut self, transfer: Transfer) -> Result<(), StorageError> {
        let record = &transfer.record;
        let debit = record.amount + record.fee;

        // validate every row before touching any of them
        let source = self
            .accounts
            .get(&record.source_iban)
            .filter(|a| a.user_id == transfer.source_user && a.bank_id == transfer.source_bank)
            .ok_or_else(|| {
                StorageError(format!("no source row for iban {}", record.source_iban))
            })?;
        if source.balance < debit {
            return Err(StorageError(format!(
                "source {} dropped below the validated balance",
                record.source_iban
            )));
        }
        if !self.accounts.contains_key(&record.dest_iban) {
            return Err(StorageError(format!(
                "no destination row for iban {}",
                record.dest_iban
            )));
        }
        if let Some(fee_iban) = &transfer.fee_credit_iban {
            if !self.accounts.contains_key(fee_iban) {
                return Err(StorageError(format!(
                    "no fee collection row for iban {fee_iban}"
                )));
            }
        }

        // every row checked out; the sequence below cannot fail partway
        if let Some(source) = self.accounts.get_mut(&record.source_iban) {
            source.balance -= debit;
        }
        if let Some(dest) = self.accounts.get_mut(&record.dest_iban) {
            dest.balance += record.amount;
        }
        if let Some(fee_iban) = &transfer.fee_credit_iban {
            if let Some(collector) = self.accounts.get_mut(fee_iban) {
                collector.balance += record.fee;
            }
        }
        self.transactions.push(transfer.record);
        Ok(())
    }
}
