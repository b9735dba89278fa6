use std::path::PathBuf;

use clap::Parser;

use crate::banking::{RegistrationRules, DEFAULT_EMAIL_DOMAIN, DEFAULT_MIN_PASSWORD_LEN};

/// Personal banking console
#[derive(Debug, Parser)]
#[command(name = "bank-ledger", version)]
pub struct Args {
  /// File where the accounts are persisted
  #[arg(long, env = "BANK_DATA_FILE", default_value = "users.json")]
  pub data_file: PathBuf,

  /// Suffix required for every email, including the `@`
  #[arg(long, env = "BANK_EMAIL_DOMAIN", default_value = DEFAULT_EMAIL_DOMAIN, value_parser = parse_email_domain)]
  pub email_domain: String,

  /// Minimum number of characters of a password
  #[arg(long, env = "BANK_MIN_PASSWORD_LEN", default_value_t = DEFAULT_MIN_PASSWORD_LEN, value_parser = parse_min_password_len)]
  pub min_password_len: usize,

  /// Keep the accounts in memory only, nothing is written to disk
  #[arg(long)]
  pub ephemeral: bool,
}

impl Args {
  pub fn registration_rules(&self) -> RegistrationRules {
    RegistrationRules {
      email_domain: self.email_domain.clone(),
      min_password_len: self.min_password_len,
    }
  }
}

/// Emails are required to be lowercase, so the domain must be too.
fn parse_email_domain(value: &str) -> Result<String, String> {
  if value.len() < 2 || !value.starts_with('@') {
    Err("the email domain must start with '@'".to_string())
  } else if value.chars().any(char::is_uppercase) {
    Err("the email domain must be lowercase".to_string())
  } else {
    Ok(value.to_string())
  }
}

/// The length can be raised but never lowered below the default.
fn parse_min_password_len(value: &str) -> Result<usize, String> {
  let len: usize = value
    .parse()
    .map_err(|_| format!("'{}' is not a number", value))?;
  if len < DEFAULT_MIN_PASSWORD_LEN {
    Err(format!(
      "the minimum password length can't be lower than {}",
      DEFAULT_MIN_PASSWORD_LEN
    ))
  } else {
    Ok(len)
  }
}
