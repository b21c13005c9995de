//! CSV seed data for the in-memory ledger: one file per table of the
//! persisted schema (banks, users, accounts).

use std::io::Read;

use anyhow::{Context, Result};
use csv::Trim;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::ledger::in_memory::InMemoryLedger;
use crate::ledger::{Account, Bank, User};

#[derive(Debug, Deserialize)]
struct BankRow {
    id: u16,
    name: String,
    fee: Decimal,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: u32,
    login: String,
    password: String,
    citizen: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    iban: String,
    user: u32,
    bank: u16,
    balance: Decimal,
}

fn read_rows<T: DeserializeOwned>(source: impl Read, table: &str) -> Result<Vec<T>> {
    let reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(source);
    reader
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| format!("Failed to parse {table} fixture"))
}

/// Build a seeded ledger from the three fixture tables.
pub fn load_ledger(
    banks: impl Read,
    users: impl Read,
    accounts: impl Read,
) -> Result<InMemoryLedger> {
    let banks: Vec<BankRow> = read_rows(banks, "banks")?;
    let users: Vec<UserRow> = read_rows(users, "users")?;
    let accounts: Vec<AccountRow> = read_rows(accounts, "accounts")?;

    Ok(InMemoryLedger::new(
        banks.into_iter().map(|row| Bank {
            id: row.id,
            name: row.name,
            fee: row.fee,
        }),
        users.into_iter().map(|row| User {
            id: row.id,
            login: row.login,
            password: row.password,
            citizen: row.citizen,
            name: row.name,
        }),
        accounts.into_iter().map(|row| Account {
            iban: row.iban,
            user_id: row.user,
            bank_id: row.bank,
            balance: row.balance,
        }),
    ))
}
