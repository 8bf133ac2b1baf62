//! Typed endpoint wrappers.
//!
//! Each service borrows the [`crate::client::ApiClient`] of its
//! [`crate::YiQiYing`] and only decides which fields are signed, echoed and
//! sent. Schema field names mirror the remote JSON.

pub mod close_info;
pub mod customer;
pub mod statement;
pub mod tax;

pub use close_info::CloseInfoService;
pub use customer::Customers;
pub use statement::{PeriodRequest, PositionRequest, Statements};
pub use tax::{TaxRequest, TaxService};
