//! Account management module
//!
//! Single-currency accounts whose balance must stay strictly positive.

pub mod models;
pub mod repository;

pub use models::{Account, NewAccount};
pub use repository::{AccountStore, PgAccountStore};
