//! This module contains the domain logic of the accounts and their ledgers
//!
//! The [`AccountStore`] owns the registered accounts and persists them through an [`AccountsRepository`],
//! which can be implemented for any storage, see the [`crate::io`] module for the available ones.
//

mod account;
mod account_number;
mod clock;
mod password;
mod repository;
mod store;
mod validation;

pub use account::{Account, AccountNumber, Profile, Transaction, TransactionKind};
pub use account_number::{AccountNumberGenerator, RandomAccountNumbers, ACCOUNT_NUMBER_RANGE};
pub use clock::{Clock, SystemClock};
pub use password::PasswordDigest;
pub use repository::{AccountsRepository, StorageError};
pub use store::{AccountStore, BankingError, Result};
pub use validation::{
  check_amount, parse_amount, Field, RegistrationRules, DEFAULT_EMAIL_DOMAIN,
  DEFAULT_MIN_PASSWORD_LEN,
};
