use std::collections::HashMap;

use chrono::Duration;
use rust_decimal::Decimal;
use thiserror::Error;

use super::{
  account::{Account, AccountNumber, Profile, Transaction},
  account_number::{AccountNumberGenerator, RandomAccountNumbers},
  clock::{Clock, SystemClock},
  password::PasswordDigest,
  repository::{AccountsRepository, StorageError},
  validation::{check_amount, Field, RegistrationRules},
};

/// How many candidates are drawn before giving up on finding a free account number
const MAX_ACCOUNT_NUMBER_ATTEMPTS: usize = 32;

pub type Result<T> = core::result::Result<T, BankingError>;

/// Possible errors returned by the [`AccountStore`] operations.
///
/// Authentication failures are intentionally undifferentiated,
/// so callers can't tell whether the email exists or the password was wrong.
#[derive(Debug, Error)]
pub enum BankingError {
  #[error("Invalid {0}")]
  Validation(Field),

  #[error("Email already registered")]
  DuplicateEmail,

  #[error("Invalid email or password")]
  Authentication,

  #[error("Account not found: {0}")]
  AccountNotFound(AccountNumber),

  #[error("Insufficient funds")]
  InsufficientFunds,

  #[error("Balance limit exceeded")]
  BalanceOverflow,

  #[error("No free account number found after {0} attempts")]
  AccountNumberUnavailable(usize),

  #[error(transparent)]
  Storage(#[from] StorageError),
}

/// Owner of the registered accounts and their ledgers.
///
/// The collection is loaded once when the store is opened, and every mutation persists it as a whole
/// through the [`AccountsRepository`]. If persisting fails, the mutation is reverted in memory and the error returned,
/// so the store never diverges from what was last saved.
///
/// All the mutations take `&mut self`, so the load-mutate-save cycles are serialized by construction.
/// Sharing a store between tasks requires wrapping it in a mutex.
pub struct AccountStore<R, C = SystemClock, G = RandomAccountNumbers> {
  repository: R,
  clock: C,
  generator: G,
  rules: RegistrationRules,
  /// In registration order, which is the order used to persist them
  accounts: Vec<Account>,
  by_number: HashMap<AccountNumber, usize>,
  /// Keys are lowercase emails
  by_email: HashMap<String, AccountNumber>,
}

impl<R> AccountStore<R>
where
  R: AccountsRepository,
{
  pub async fn open(repository: R, rules: RegistrationRules) -> Result<Self> {
    Self::open_with(repository, rules, SystemClock, RandomAccountNumbers::new()).await
  }
}

impl<R, C, G> AccountStore<R, C, G>
where
  R: AccountsRepository,
  C: Clock,
  G: AccountNumberGenerator,
{
  pub async fn open_with(
    repository: R,
    rules: RegistrationRules,
    clock: C,
    generator: G,
  ) -> Result<Self> {
    let accounts = repository.load_all().await?;

    let mut store = Self {
      repository,
      clock,
      generator,
      rules,
      accounts: Vec::with_capacity(accounts.len()),
      by_number: HashMap::with_capacity(accounts.len()),
      by_email: HashMap::with_capacity(accounts.len()),
    };

    for account in accounts {
      if store.by_number.contains_key(&account.account_number) {
        return Err(
          StorageError::InvalidRecord(format!(
            "duplicated account number {}",
            account.account_number
          ))
          .into(),
        );
      }
      if store.by_email.contains_key(&email_key(&account.profile.email)) {
        return Err(
          StorageError::InvalidRecord(format!(
            "duplicated email {}",
            account.profile.email
          ))
          .into(),
        );
      }
      store.push(account);
    }

    Ok(store)
  }

  pub fn rules(&self) -> &RegistrationRules {
    &self.rules
  }

  /// Register a new account with a zero balance and an empty ledger.
  pub async fn register(
    &mut self,
    first_name: &str,
    last_name: &str,
    phone: &str,
    email: &str,
    password: &str,
  ) -> Result<Account> {
    let profile = Profile {
      first_name: first_name.to_string(),
      last_name: last_name.to_string(),
      phone: phone.to_string(),
      email: email.to_string(),
    };
    self.check_profile(&profile)?;
    self.rules.check_password(password)?;

    if self.email_registered(email) {
      return Err(BankingError::DuplicateEmail);
    }

    let account_number = self.free_account_number()?;
    let account = Account::new(account_number, profile, PasswordDigest::of(password));
    self.push(account.clone());

    if let Err(err) = self.persist().await {
      self.pop();
      return Err(err);
    }

    Ok(account)
  }

  /// Returns the account number matching the credentials.
  pub fn authenticate(&self, email: &str, password: &str) -> Result<AccountNumber> {
    let digest = PasswordDigest::of(password);
    self
      .by_email
      .get(&email_key(email))
      .and_then(|account_number| self.account(*account_number).ok())
      .filter(|account| account.password_digest == digest)
      .map(|account| account.account_number)
      .ok_or(BankingError::Authentication)
  }

  pub async fn deposit(&mut self, account_number: AccountNumber, amount: Decimal) -> Result<Decimal> {
    check_amount(amount)?;
    let transaction = Transaction::deposit(amount, self.clock.now());
    self.record(account_number, transaction).await
  }

  /// Withdrawing the whole balance is allowed, anything above it is not.
  pub async fn withdraw(
    &mut self,
    account_number: AccountNumber,
    amount: Decimal,
  ) -> Result<Decimal> {
    check_amount(amount)?;
    if amount > self.account(account_number)?.balance {
      return Err(BankingError::InsufficientFunds);
    }
    let transaction = Transaction::withdraw(amount, self.clock.now());
    self.record(account_number, transaction).await
  }

  pub fn get_balance(&self, account_number: AccountNumber) -> Result<Decimal> {
    self.account(account_number).map(|account| account.balance)
  }

  /// Transactions from the last `window_days` days, in chronological order.
  pub fn get_transactions(
    &self,
    account_number: AccountNumber,
    window_days: u32,
  ) -> Result<Vec<Transaction>> {
    let account = self.account(account_number)?;
    let since = self
      .clock
      .now()
      .checked_sub_signed(Duration::days(i64::from(window_days)));
    Ok(match since {
      Some(since) => account.transactions_since(since).cloned().collect(),
      // The window reaches further back than any representable time
      None => account.transactions.clone(),
    })
  }

  pub fn get_account(&self, account_number: AccountNumber) -> Result<&Account> {
    self.account(account_number)
  }

  /// Whether an account already uses this email, ignoring case
  pub fn email_registered(&self, email: &str) -> bool {
    self.by_email.contains_key(&email_key(email))
  }

  /// Replace the identity fields of an account. Credentials and ledger are left untouched.
  pub async fn update_profile(
    &mut self,
    account_number: AccountNumber,
    profile: Profile,
  ) -> Result<()> {
    self.check_profile(&profile)?;
    let index = self.index_of(account_number)?;

    let new_key = email_key(&profile.email);
    match self.by_email.get(&new_key) {
      Some(owner) if *owner != account_number => return Err(BankingError::DuplicateEmail),
      _ => {}
    }

    let previous = std::mem::replace(&mut self.accounts[index].profile, profile);
    let old_key = email_key(&previous.email);
    self.by_email.remove(&old_key);
    self.by_email.insert(new_key.clone(), account_number);

    if let Err(err) = self.persist().await {
      self.by_email.remove(&new_key);
      self.by_email.insert(old_key, account_number);
      self.accounts[index].profile = previous;
      return Err(err);
    }

    Ok(())
  }

  async fn record(
    &mut self,
    account_number: AccountNumber,
    transaction: Transaction,
  ) -> Result<Decimal> {
    let index = self.index_of(account_number)?;
    let previous_balance = self.accounts[index].balance;
    let balance = self.accounts[index]
      .apply(transaction)
      .ok_or(BankingError::BalanceOverflow)?;

    if let Err(err) = self.persist().await {
      self.accounts[index].revert_last(previous_balance);
      return Err(err);
    }

    Ok(balance)
  }

  async fn persist(&mut self) -> Result<()> {
    self
      .repository
      .save_all(&self.accounts)
      .await
      .map_err(BankingError::from)
  }

  fn check_profile(&self, profile: &Profile) -> Result<()> {
    self.rules.check_name(Field::FirstName, &profile.first_name)?;
    self.rules.check_name(Field::LastName, &profile.last_name)?;
    self.rules.check_phone(&profile.phone)?;
    self.rules.check_email(&profile.email)
  }

  fn free_account_number(&mut self) -> Result<AccountNumber> {
    for _ in 0..MAX_ACCOUNT_NUMBER_ATTEMPTS {
      let candidate = self.generator.next_candidate();
      if !self.by_number.contains_key(&candidate) {
        return Ok(candidate);
      }
    }
    Err(BankingError::AccountNumberUnavailable(
      MAX_ACCOUNT_NUMBER_ATTEMPTS,
    ))
  }

  fn index_of(&self, account_number: AccountNumber) -> Result<usize> {
    self
      .by_number
      .get(&account_number)
      .copied()
      .ok_or(BankingError::AccountNotFound(account_number))
  }

  fn account(&self, account_number: AccountNumber) -> Result<&Account> {
    self
      .index_of(account_number)
      .map(|index| &self.accounts[index])
  }

  fn push(&mut self, account: Account) {
    self
      .by_number
      .insert(account.account_number, self.accounts.len());
    self
      .by_email
      .insert(email_key(&account.profile.email), account.account_number);
    self.accounts.push(account);
  }

  fn pop(&mut self) {
    if let Some(account) = self.accounts.pop() {
      self.by_number.remove(&account.account_number);
      self.by_email.remove(&email_key(&account.profile.email));
    }
  }
}

fn email_key(email: &str) -> String {
  email.to_lowercase()
}
