//! Payment records
//!
//! One row per committed transfer, written in the transfer's unit of work.

pub mod models;
pub mod repository;

pub use models::{NewPayment, Payment};
pub use repository::{PaymentStore, PgPaymentStore};
