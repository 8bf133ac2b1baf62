//! Wire protocol: response envelope and outcome classification.

pub mod envelope;

pub use envelope::{decode_response, Envelope, ResponseHead, SUCCESS_CODE, SUCCESS_STATUS};
