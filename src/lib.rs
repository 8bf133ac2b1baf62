//! # yiqiying-finance
//!
//! **Signed blocking client for the YiQiYing (17win) open accounting API.**
//!
//! Every request carries an HMAC-SHA256 signature derived from the
//! application credentials, a session timestamp and nonce, and the
//! endpoint's context fields (customer, periods, tax code). Signatures are
//! memoized in an injected cache for 24 hours per application key.
//!
//! ## Features
//!
//! - **Deterministic signing**: fixed canonical field order, query-escaped, base64 HMAC-SHA256
//! - **Credential cache gate**: get-or-compute over any [`SignatureCache`] backend
//! - **Typed endpoints**: customers, close info, financial statements, tax reports
//! - **Three-way outcome**: success, remote domain error, or transport error
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::Arc;
//! use yiqiying_finance::cache::MemoryCache;
//! use yiqiying_finance::service::PeriodRequest;
//! use yiqiying_finance::{YiQiYing, YiQiYingConfig};
//!
//! fn main() -> Result<(), yiqiying_finance::FinanceError> {
//!     let config = YiQiYingConfig::new("your-app-key", "your-app-secret")
//!         .with_cache(Arc::new(MemoryCache::new()));
//!
//!     let client = YiQiYing::new(config)?;
//!     let rows = client
//!         .statements()
//!         .select_income_sheet(&PeriodRequest::new("customer-id", "202401"))?;
//!
//!     for row in rows {
//!         println!("{}: {}", row.account_title_name, row.balance_end);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! All operations return [`FinanceError`]. Use
//! [`FinanceError::is_domain`] to tell a rejected request (the API answered
//! with a non-success head) from [`FinanceError::is_transport`] failures
//! where no head could be read. Nothing is retried.
//!
//! ## Configuration
//!
//! - `app_key` / `app_secret`: issued by the platform
//! - `cache`: signature cache backend (required, or supplied via [`Finance`])
//! - `customer_id`: session customer signed by the POST endpoints
//!
//! See [`YiQiYingConfig`] for full documentation.

#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/yiqiying-finance/0.1.0")]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;
pub mod logging;
pub mod session;

// Credential layer
pub mod credential;

// Cache layer
pub mod cache;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Endpoint layer
pub mod service;

// Main public API
pub mod factory;
pub mod yiqiying;

// Re-exports for public API
pub use cache::{FileCache, MemoryCache, SignatureCache};
pub use clock::{Clock, SystemClock};
pub use config::YiQiYingConfig;
pub use credential::{RequestSigner, SignatureGate, SigningContext, SigningInput};
pub use errors::FinanceError;
pub use factory::Finance;
pub use protocol::envelope::ResponseHead;
pub use yiqiying::YiQiYing;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
