use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::password::PasswordDigest;

/// Alias for an account number, always 12 digits long
pub type AccountNumber = u64;

/// The kinds of balance-affecting events recorded in an account ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
  Deposit,
  Withdraw,
}

impl fmt::Display for TransactionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransactionKind::Deposit => f.write_str("deposit"),
      TransactionKind::Withdraw => f.write_str("withdraw"),
    }
  }
}

/// An entry of the ledger of an account.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
  pub kind: TransactionKind,
  /// Always positive, the `kind` tells the direction.
  pub amount: Decimal,
  pub timestamp: DateTime<Utc>,
}

impl Transaction {
  pub fn deposit(amount: Decimal, timestamp: DateTime<Utc>) -> Self {
    Self {
      kind: TransactionKind::Deposit,
      amount,
      timestamp,
    }
  }

  pub fn withdraw(amount: Decimal, timestamp: DateTime<Utc>) -> Self {
    Self {
      kind: TransactionKind::Withdraw,
      amount,
      timestamp,
    }
  }

  /// The effect of this transaction on the balance of the account
  pub fn signed_amount(&self) -> Decimal {
    match self.kind {
      TransactionKind::Deposit => self.amount,
      TransactionKind::Withdraw => -self.amount,
    }
  }
}

/// Identity fields of an account holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
  pub first_name: String,
  pub last_name: String,
  pub phone: String,
  pub email: String,
}

/// This represents a registered account with its credentials and ledger.
///
/// The `balance` is kept alongside the `transactions` so it doesn't need to be recomputed on every read,
/// but it must always be equal to [`Account::ledger_total`].
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
  pub account_number: AccountNumber,
  pub profile: Profile,
  pub password_digest: PasswordDigest,
  pub balance: Decimal,
  pub transactions: Vec<Transaction>,
}

impl Account {
  pub fn new(
    account_number: AccountNumber,
    profile: Profile,
    password_digest: PasswordDigest,
  ) -> Self {
    Self {
      account_number,
      profile,
      password_digest,
      balance: Decimal::ZERO,
      transactions: Vec::new(),
    }
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.profile.first_name, self.profile.last_name)
  }

  /// Sum of deposits minus sum of withdrawals, `None` if it doesn't fit in a [`Decimal`]
  pub fn ledger_total(&self) -> Option<Decimal> {
    self
      .transactions
      .iter()
      .try_fold(Decimal::ZERO, |total, transaction| {
        total.checked_add(transaction.signed_amount())
      })
  }

  /// Transactions recorded at or after `since`, in chronological order
  pub fn transactions_since(&self, since: DateTime<Utc>) -> impl Iterator<Item = &Transaction> + '_ {
    self
      .transactions
      .iter()
      .filter(move |transaction| transaction.timestamp >= since)
  }

  /// Record the transaction and return the new balance.
  /// Returns `None`, leaving the account untouched, when the balance would overflow.
  pub(crate) fn apply(&mut self, transaction: Transaction) -> Option<Decimal> {
    self.balance = self.balance.checked_add(transaction.signed_amount())?;
    self.transactions.push(transaction);
    Some(self.balance)
  }

  /// Undo the last [`Account::apply`], when it couldn't be persisted
  pub(crate) fn revert_last(&mut self, previous_balance: Decimal) {
    if self.transactions.pop().is_some() {
      self.balance = previous_balance;
    }
  }
}

#[cfg(test)]
pub(crate) mod tests {

  use chrono::TimeZone;
  use rust_decimal_macros::dec;

  use super::*;

  pub(crate) fn john_doe() -> Profile {
    Profile {
      first_name: "JOHN".to_string(),
      last_name: "DOE".to_string(),
      phone: "9876543210".to_string(),
      email: "john@gmail.com".to_string(),
    }
  }

  fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
  }

  #[test]
  fn new_account_is_empty() {
    let account = Account::new(123456789012, john_doe(), PasswordDigest::of("password1"));

    assert_eq!(account.balance, Decimal::ZERO);
    assert!(account.transactions.is_empty());
    assert_eq!(account.full_name(), "JOHN DOE");
  }

  #[test]
  fn apply_keeps_balance_and_ledger_in_sync() {
    let mut account = Account::new(123456789012, john_doe(), PasswordDigest::of("password1"));

    account.apply(Transaction::deposit(dec!(100), at(1)));
    account.apply(Transaction::withdraw(dec!(40.5), at(2)));
    account.apply(Transaction::deposit(dec!(0.25), at(3)));

    assert_eq!(account.balance, dec!(59.75));
    assert_eq!(account.ledger_total(), Some(account.balance));
    assert_eq!(
      account
        .transactions
        .iter()
        .map(|transaction| transaction.kind)
        .collect::<Vec<_>>(),
      vec![
        TransactionKind::Deposit,
        TransactionKind::Withdraw,
        TransactionKind::Deposit
      ]
    );
  }

  #[test]
  fn revert_last_restores_previous_state() {
    let mut account = Account::new(123456789012, john_doe(), PasswordDigest::of("password1"));
    account.apply(Transaction::deposit(dec!(100), at(1)));
    let before = account.clone();

    account.apply(Transaction::withdraw(dec!(30), at(2)));
    account.revert_last(dec!(100));

    assert_eq!(account, before);
  }

  #[test]
  fn apply_rejects_balance_overflow() {
    let mut account = Account::new(123456789012, john_doe(), PasswordDigest::of("password1"));
    assert_eq!(account.apply(Transaction::deposit(Decimal::MAX, at(1))), Some(Decimal::MAX));
    let before = account.clone();

    assert_eq!(account.apply(Transaction::deposit(Decimal::ONE, at(2))), None);
    assert_eq!(account, before);
  }

  #[test]
  fn ledger_total_overflow() {
    let mut account = Account::new(123456789012, john_doe(), PasswordDigest::of("password1"));
    account.transactions = vec![
      Transaction::deposit(Decimal::MAX, at(1)),
      Transaction::deposit(Decimal::MAX, at(2)),
    ];

    assert_eq!(account.ledger_total(), None);
  }

  #[test]
  fn transactions_since_is_inclusive_and_ordered() {
    let mut account = Account::new(123456789012, john_doe(), PasswordDigest::of("password1"));
    account.apply(Transaction::deposit(dec!(1), at(1)));
    account.apply(Transaction::deposit(dec!(2), at(5)));
    account.apply(Transaction::withdraw(dec!(1), at(9)));

    let amounts: Vec<Decimal> = account
      .transactions_since(at(5))
      .map(|transaction| transaction.amount)
      .collect();

    assert_eq!(amounts, vec![dec!(2), dec!(1)]);
  }
}
