//! Interactive console for the account store
//!
//! The [`menu`] module maps the answers typed by a user into [`AccountStore`](crate::banking::AccountStore) operations
//! and renders their results. The session (which account is logged in) lives here, not in the store.
//

pub mod menu;
