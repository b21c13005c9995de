//! Storage port for the banking ledger.
//!
//! The core depends only on the [`Ledger`] trait; the process wires in a
//! concrete store ([`in_memory::InMemoryLedger`] here). Handlers re-read
//! every row they need per request and never cache ledger state.

use rust_decimal::Decimal;
use thiserror::Error;

pub mod in_memory;

pub type UserId = u32;
pub type BankId = u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub password: String,
    pub citizen: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
    pub fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub iban: String,
    pub user_id: UserId,
    pub bank_id: BankId,
    pub balance: Decimal,
}

/// Append-only audit row, written only once both legs of a transfer have
/// been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub token: String,
    pub source_iban: String,
    pub dest_iban: String,
    pub amount: Decimal,
    pub fee: Decimal,
}

/// The atomic unit of work behind a peer transfer: debit the source by
/// amount + fee, credit the destination by amount, optionally credit the
/// fee to a collection account, and append the audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub record: TransactionRecord,
    /// Owner scope the debit must match, as presented by the client.
    pub source_user: UserId,
    pub source_bank: BankId,
    /// Where the fee goes, if the configured policy routes it anywhere.
    pub fee_credit_iban: Option<String>,
}

/// Generic storage failure. Handlers map every one of these to a
/// SERVER_ERROR status; nothing is retried.
#[derive(Debug, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(pub String);

pub trait Ledger {
    fn user_by_credentials(
        &self,
        login_name: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError>;

    fn count_accounts(&self, user_id: UserId, bank_id: BankId) -> Result<u64, StorageError>;

    fn list_banks(&self) -> Result<Vec<Bank>, StorageError>;

    fn list_accounts(
        &self,
        user_id: UserId,
        bank_id: BankId,
    ) -> Result<Vec<Account>, StorageError>;

    /// Account by IBAN regardless of owner.
    fn account(&self, iban: &str) -> Result<Option<Account>, StorageError>;

    /// Account by IBAN, only if it belongs to `(user_id, bank_id)`.
    fn account_owned(
        &self,
        iban: &str,
        user_id: UserId,
        bank_id: BankId,
    ) -> Result<Option<Account>, StorageError>;

    fn bank(&self, id: BankId) -> Result<Option<Bank>, StorageError>;

    /// `balance += delta` on the owned account row. Always a signed delta,
    /// never an absolute overwrite.
    fn apply_balance_delta(
        &mut self,
        iban: &str,
        user_id: UserId,
        bank_id: BankId,
        delta: Decimal,
    ) -> Result<(), StorageError>;

    fn insert_transaction(&mut self, record: TransactionRecord) -> Result<(), StorageError>;

    /// Apply a whole [`Transfer`] or none of it. Implementations must not
    /// leave a debited source with an uncredited destination, and must not
    /// write the audit row unless both legs applied.
    fn apply_transfer(&mut self, transfer: Transfer) -> Result<(), StorageError>;
}
