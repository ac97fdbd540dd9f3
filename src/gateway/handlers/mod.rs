pub mod accounts;
pub mod currencies;
pub mod health;
pub mod payments;

pub use accounts::{create_account, get_account, list_account_payments, list_accounts};
pub use currencies::list_currencies;
pub use health::{HealthResponse, health_check};
pub use payments::create_payment;
