use chrono::{DateTime, Utc};

/// Source of the current time, used to stamp transactions and to compute history windows
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
  fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}
