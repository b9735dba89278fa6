//! This module contains the persistence backends of the accounts
//!
//! The [`json_file`] module stores the whole collection of accounts in a JSON file, and [`memory`] keeps it in memory.
//! It would be possible to add new backends by implementing the [`AccountsRepository`](crate::banking::AccountsRepository) trait.
//!
//! The [`account`] and [`transaction`] modules contain structs needed to serialize/deserialize data.
//! They are intentionally duplicated from the domain model to decouple the file format from the domain logic and allow their evolution independently.
//!

mod account;
mod json_file;
mod memory;
mod transaction;

pub use json_file::JsonFileAccountsRepository;
pub use memory::InMemoryAccountsRepository;
