use async_trait::async_trait;

use crate::banking::{Account, AccountsRepository, StorageError};

/// Implementation of the [`AccountsRepository`] that keeps the accounts in memory, nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryAccountsRepository {
  accounts: Vec<Account>,
  saves: usize,
}

impl InMemoryAccountsRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_accounts(accounts: Vec<Account>) -> Self {
    Self { accounts, saves: 0 }
  }

  pub fn accounts(&self) -> &[Account] {
    &self.accounts
  }

  /// How many times the collection was saved
  pub fn saves(&self) -> usize {
    self.saves
  }
}

#[async_trait]
impl AccountsRepository for InMemoryAccountsRepository {
  async fn load_all(&self) -> Result<Vec<Account>, StorageError> {
    Ok(self.accounts.clone())
  }

  async fn save_all(&mut self, accounts: &[Account]) -> Result<(), StorageError> {
    self.accounts = accounts.to_vec();
    self.saves += 1;
    Ok(())
  }
}
