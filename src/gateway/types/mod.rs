//! Gateway types module
//!
//! ## Input Types
//! - [`CreateAccountRequest`], [`CreatePaymentRequest`]: JSON bodies
//! - [`PageQuery`]: listing window
//!
//! ## Output Types
//! - [`AccountResponse`], [`PaymentResponse`], [`CurrencyResponse`]
//! - [`ApiError`] / [`ErrorBody`]: `{error, kind, code}` with kind-mapped status
//!
//! ## Extractors
//! - [`ApiJson`], [`ApiPath`], [`ApiQuery`]: axum extractors whose rejections
//!   render as validation errors

pub mod extract;
pub mod request;
pub mod response;

pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use request::{CreateAccountRequest, CreatePaymentRequest, PageQuery};
pub use response::{
    AccountResponse, ApiError, CreatedResponse, CurrencyResponse, ErrorBody, PaymentResponse,
};
