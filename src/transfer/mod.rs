//! Atomic multi-currency transfers

pub mod engine;
pub mod types;

pub use engine::TransferEngine;
pub use types::TransferRequest;
