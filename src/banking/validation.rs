use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::store::{BankingError, Result};

pub const DEFAULT_EMAIL_DOMAIN: &str = "@gmail.com";
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

/// Input fields that can be rejected by the validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  FirstName,
  LastName,
  Phone,
  Email,
  Password,
  Amount,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Field::FirstName => "first name",
      Field::LastName => "last name",
      Field::Phone => "phone",
      Field::Email => "email",
      Field::Password => "password",
      Field::Amount => "amount",
    };
    f.write_str(name)
  }
}

/// Rules applied to the data provided when registering or updating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRules {
  /// Every email must end with this suffix, including the `@`.
  pub email_domain: String,
  /// Can raise the password length, values below [`DEFAULT_MIN_PASSWORD_LEN`] are ignored.
  pub min_password_len: usize,
}

impl Default for RegistrationRules {
  fn default() -> Self {
    Self {
      email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
      min_password_len: DEFAULT_MIN_PASSWORD_LEN,
    }
  }
}

impl RegistrationRules {
  /// Names must be non-empty, alphabetic and uppercase.
  pub fn check_name(&self, field: Field, name: &str) -> Result<()> {
    let alphabetic = !name.is_empty() && name.chars().all(char::is_alphabetic);
    let uppercase = name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase);
    ensure(alphabetic && uppercase, field)
  }

  pub fn check_phone(&self, phone: &str) -> Result<()> {
    ensure(
      phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()),
      Field::Phone,
    )
  }

  /// Emails must be lowercase and end with the configured domain.
  pub fn check_email(&self, email: &str) -> Result<()> {
    let valid = email.len() > self.email_domain.len()
      && email.ends_with(&self.email_domain)
      && !email.chars().any(char::is_uppercase);
    ensure(valid, Field::Email)
  }

  /// Minimum number of characters a password must have
  pub fn password_len(&self) -> usize {
    self.min_password_len.max(DEFAULT_MIN_PASSWORD_LEN)
  }

  pub fn check_password(&self, password: &str) -> Result<()> {
    ensure(
      password.chars().count() >= self.password_len(),
      Field::Password,
    )
  }
}

/// Parses an amount typed by a user, it doesn't check its sign.
pub fn parse_amount(text: &str) -> Result<Decimal> {
  let text = text.trim();
  Decimal::from_str(text)
    .or_else(|_| Decimal::from_scientific(text))
    .map_err(|_| BankingError::Validation(Field::Amount))
}

/// Amounts moved by deposits and withdrawals must be strictly positive.
pub fn check_amount(amount: Decimal) -> Result<()> {
  ensure(amount > Decimal::ZERO, Field::Amount)
}

fn ensure(condition: bool, field: Field) -> Result<()> {
  if condition {
    Ok(())
  } else {
    Err(BankingError::Validation(field))
  }
}
