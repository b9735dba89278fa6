use std::ops::RangeInclusive;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::AccountNumber;

/// All the 12 digits account numbers
pub const ACCOUNT_NUMBER_RANGE: RangeInclusive<AccountNumber> = 100_000_000_000..=999_999_999_999;

/// Interface for the sources of new account numbers.
/// Candidates don't need to be unique, the store checks them against the existing accounts.
#[cfg_attr(test, mockall::automock)]
pub trait AccountNumberGenerator {
  fn next_candidate(&mut self) -> AccountNumber;
}

/// Draws account numbers uniformly from [`ACCOUNT_NUMBER_RANGE`].
#[derive(Debug)]
pub struct RandomAccountNumbers {
  rng: StdRng,
}

impl RandomAccountNumbers {
  pub fn new() -> Self {
    Self {
      rng: StdRng::from_entropy(),
    }
  }

  #[cfg(test)]
  pub fn seeded(seed: u64) -> Self {
    Self {
      rng: StdRng::seed_from_u64(seed),
    }
  }
}

impl Default for RandomAccountNumbers {
  fn default() -> Self {
    Self::new()
  }
}

impl AccountNumberGenerator for RandomAccountNumbers {
  fn next_candidate(&mut self) -> AccountNumber {
    self.rng.gen_range(ACCOUNT_NUMBER_RANGE)
  }
}

#[cfg(test)]
mod tests {

  use super::*;

  #[test]
  fn random_numbers_have_12_digits() {
    let mut generator = RandomAccountNumbers::seeded(42);

    for _ in 0..1000 {
      let number = generator.next_candidate();
      assert!(ACCOUNT_NUMBER_RANGE.contains(&number));
      assert_eq!(number.to_string().len(), 12);
    }
  }

  #[test]
  fn seeded_generators_are_deterministic() {
    let mut first = RandomAccountNumbers::seeded(7);
    let mut second = RandomAccountNumbers::seeded(7);

    for _ in 0..10 {
      assert_eq!(first.next_candidate(), second.next_candidate());
    }
  }
}
