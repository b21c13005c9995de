use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the flat inter-bank transfer fee goes.
///
/// The protocol never tells the client; the source system debited the fee
/// and credited it nowhere. `Burn` reproduces that. `Credit` routes every
/// fee into a named collection account inside the same atomic transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeePolicy {
    #[default]
    Burn,
    Credit {
        iban: String,
    },
}

impl FeePolicy {
    pub fn fee_credit_iban(&self) -> Option<&str> {
        match self {
            Self::Burn => None,
            Self::Credit { iban } => Some(iban),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected `burn` or `credit:<iban>`, got `{0}`")]
pub struct ParseFeePolicyError(String);

impl FromStr for FeePolicy {
    type Err = ParseFeePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "burn" {
            return Ok(Self::Burn);
        }
        match s.split_once(':') {
            Some(("credit", iban)) if !iban.is_empty() => Ok(Self::Credit {
                iban: iban.to_string(),
            }),
            _ => Err(ParseFeePolicyError(s.to_string())),
        }
    }
}
