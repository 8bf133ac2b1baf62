//! HTTP layer: header contract and request execution.

pub mod headers;
pub mod http;

pub use headers::HeaderBuilder;
pub use http::{ApiClient, QueryParams, API_PREFIX};
