use std::convert::TryFrom;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::transaction::Transaction;
use crate::banking::{
  self, AccountNumber, PasswordDigest, Profile, StorageError, ACCOUNT_NUMBER_RANGE,
};

/// A serializable account, using the field names of the accounts file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
  first_name: String,
  last_name: String,
  account_number: AccountNumber,
  phone: String,
  email: String,
  /// Hex encoded digest, never the plain password
  password: String,
  #[serde(with = "rust_decimal::serde::float")]
  balance: Decimal,
  #[serde(default)]
  transactions: Vec<Transaction>,
}

impl From<&banking::Account> for Account {
  fn from(account: &banking::Account) -> Self {
    Account {
      first_name: account.profile.first_name.clone(),
      last_name: account.profile.last_name.clone(),
      account_number: account.account_number,
      phone: account.profile.phone.clone(),
      email: account.profile.email.clone(),
      password: account.password_digest.as_hex().to_string(),
      balance: account.balance,
      transactions: account.transactions.iter().map(Transaction::from).collect(),
    }
  }
}

impl TryFrom<Account> for banking::Account {
  type Error = StorageError;

  /// The balance is rebuilt from the ledger, so both always agree once loaded.
  fn try_from(record: Account) -> Result<Self, Self::Error> {
    if !ACCOUNT_NUMBER_RANGE.contains(&record.account_number) {
      return Err(StorageError::InvalidRecord(format!(
        "account number {} is not 12 digits long",
        record.account_number
      )));
    }

    let profile = Profile {
      first_name: record.first_name,
      last_name: record.last_name,
      phone: record.phone,
      email: record.email,
    };
    let mut account = banking::Account::new(
      record.account_number,
      profile,
      PasswordDigest::from_hex(record.password),
    );
    for transaction in record.transactions {
      if account
        .apply(banking::Transaction::try_from(transaction)?)
        .is_none()
      {
        return Err(StorageError::InvalidRecord(format!(
          "account {} ledger overflows the balance",
          record.account_number
        )));
      }
    }

    if account.balance < Decimal::ZERO {
      return Err(StorageError::InvalidRecord(format!(
        "account {} ledger has a negative balance",
        record.account_number
      )));
    }
    if account.balance != record.balance {
      warn!(
        account_number = record.account_number,
        stored = %record.balance,
        ledger = %account.balance,
        "Stored balance doesn't match the ledger, using the ledger"
      );
    }

    Ok(account)
  }
}
