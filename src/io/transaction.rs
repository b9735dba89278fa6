use std::convert::TryFrom;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::banking::{self, StorageError, TransactionKind};

/// The types of transactions found in the accounts file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
  Deposit,
  Withdraw,
}

/// A serializable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
  #[serde(rename = "type")]
  kind: TransactionType,

  #[serde(with = "rust_decimal::serde::float")]
  amount: Decimal,

  /// RFC 3339 when written by us, older files contain naive local timestamps.
  date: String,
}

impl From<&banking::Transaction> for Transaction {
  fn from(transaction: &banking::Transaction) -> Self {
    Transaction {
      kind: match transaction.kind {
        TransactionKind::Deposit => TransactionType::Deposit,
        TransactionKind::Withdraw => TransactionType::Withdraw,
      },
      amount: transaction.amount,
      date: transaction
        .timestamp
        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
    }
  }
}

impl TryFrom<Transaction> for banking::Transaction {
  type Error = StorageError;

  fn try_from(transaction: Transaction) -> Result<Self, Self::Error> {
    if transaction.amount <= Decimal::ZERO {
      return Err(StorageError::InvalidRecord(format!(
        "non positive transaction amount {}",
        transaction.amount
      )));
    }

    let timestamp = parse_date(&transaction.date)?;
    Ok(match transaction.kind {
      TransactionType::Deposit => banking::Transaction::deposit(transaction.amount, timestamp),
      TransactionType::Withdraw => banking::Transaction::withdraw(transaction.amount, timestamp),
    })
  }
}

fn parse_date(date: &str) -> Result<DateTime<Utc>, StorageError> {
  if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
    return Ok(timestamp.with_timezone(&Utc));
  }

  date
    .parse::<NaiveDateTime>()
    .ok()
    .and_then(|naive| Local.from_local_datetime(&naive).earliest())
    .map(|timestamp| timestamp.with_timezone(&Utc))
    .ok_or_else(|| StorageError::InvalidRecord(format!("invalid transaction date {}", date)))
}

#[cfg(test)]
mod tests {

  use rust_decimal_macros::dec;

  use super::*;

  fn record(kind: TransactionType, amount: Decimal, date: &str) -> Transaction {
    Transaction {
      kind,
      amount,
      date: date.to_string(),
    }
  }

  #[test]
  fn from_banking_transaction() {
    let timestamp = Utc.with_ymd_and_hms(2024, 3, 20, 10, 30, 0).unwrap();

    let transaction = Transaction::from(&banking::Transaction::withdraw(dec!(40), timestamp));

    assert_eq!(
      transaction,
      record(TransactionType::Withdraw, dec!(40), "2024-03-20T10:30:00Z")
    );
  }

  #[test]
  fn banking_transaction_from_rfc3339() {
    let transaction = banking::Transaction::try_from(record(
      TransactionType::Deposit,
      dec!(100),
      "2024-03-20T12:30:00.5+02:00",
    ))
    .unwrap();

    assert_eq!(
      transaction,
      banking::Transaction::deposit(
        dec!(100),
        Utc.with_ymd_and_hms(2024, 3, 20, 10, 30, 0).unwrap() + chrono::Duration::milliseconds(500)
      )
    );
  }

  #[test]
  fn banking_transaction_from_naive_local_date() {
    let transaction = banking::Transaction::try_from(record(
      TransactionType::Withdraw,
      dec!(5.5),
      "2024-03-20T12:30:00.123456",
    ))
    .unwrap();

    let expected = Local
      .with_ymd_and_hms(2024, 3, 20, 12, 30, 0)
      .earliest()
      .unwrap()
      .with_timezone(&Utc)
      + chrono::Duration::microseconds(123456);
    assert_eq!(transaction.kind, TransactionKind::Withdraw);
    assert_eq!(transaction.timestamp, expected);
  }

  #[test]
  fn banking_transaction_invalid_records() {
    let cases = vec![
      record(TransactionType::Deposit, dec!(0), "2024-03-20T10:30:00Z"),
      record(TransactionType::Withdraw, dec!(-1), "2024-03-20T10:30:00Z"),
      record(TransactionType::Deposit, dec!(1), "yesterday"),
      record(TransactionType::Deposit, dec!(1), ""),
    ];

    for case in cases {
      assert!(matches!(
        banking::Transaction::try_from(case),
        Err(StorageError::InvalidRecord(_))
      ));
    }
  }
}
