//! Profile query handlers.

mod get_profile;
mod list_transactions;

pub use get_profile::{GetProfileHandler, GetProfileQuery, ProfileView};
pub use list_transactions::{ListTransactionsHandler, ListTransactionsQuery, TransactionRow};
