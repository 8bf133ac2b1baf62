//! Request header contract.
//!
//! Every call carries the session headers below plus the signature. GET
//! endpoints additionally echo their signed context fields back as headers,
//! omitting any that are empty.

use crate::credential::SigningContext;
use crate::session::Session;
use crate::FinanceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

/// Header carrying the protocol version.
pub const VERSION: &str = "version";
/// Header carrying the session timestamp in milliseconds.
pub const TIMESTAMP: &str = "timestamp";
/// Header carrying the application key.
pub const APP_KEY: &str = "appKey";
/// Header carrying the request signature.
pub const SIGNATURE: &str = "signature";
/// Header carrying the session nonce.
pub const NONCE: &str = "xReqNonce";

/// Echo header for the customer identifier.
pub const CUSTOMER_ID: &str = "customerId";
/// Echo header for the accounting period.
pub const ACCOUNT_PERIOD: &str = "accountPeriod";
/// Echo header for the reclassification flag.
pub const RECLASSIFY_FLAG: &str = "reclassifyFlag";
/// Echo header for the tax period.
pub const PERIOD: &str = "period";
/// Echo header for the tax code.
pub const TAX_CODE: &str = "taxCode";

/// Accumulates the headers for one request.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    headers: HeaderMap,
}

impl HeaderBuilder {
    /// Start with the headers every request carries.
    pub fn new(session: &Session, app_key: &str, signature: &str) -> Result<Self, FinanceError> {
        let mut builder = Self {
            headers: HeaderMap::new(),
        };
        builder
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        builder.insert(VERSION, &session.version)?;
        builder.insert(TIMESTAMP, &session.timestamp.to_string())?;
        builder.insert(APP_KEY, app_key)?;
        builder.insert(SIGNATURE, signature)?;
        builder.insert(NONCE, &session.nonce)?;
        Ok(builder)
    }

    /// Add an echo header unless the value is absent or empty.
    pub fn echo(mut self, name: &str, value: Option<&str>) -> Result<Self, FinanceError> {
        match value {
            Some(value) if !value.is_empty() => {
                self.insert(name, value)?;
                Ok(self)
            }
            _ => Ok(self),
        }
    }

    /// Echo every populated field of a signing context.
    pub fn echo_context(self, context: &SigningContext) -> Result<Self, FinanceError> {
        self.echo(CUSTOMER_ID, context.customer_id.as_deref())?
            .echo(ACCOUNT_PERIOD, context.account_period.as_deref())?
            .echo(RECLASSIFY_FLAG, context.reclassify_flag.as_deref())?
            .echo(PERIOD, context.period.as_deref())?
            .echo(TAX_CODE, context.tax_code.as_deref())
    }

    /// Finish and return the header map.
    pub fn build(self) -> HeaderMap {
        self.headers
    }

    fn insert(&mut self, name: &str, value: &str) -> Result<(), FinanceError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FinanceError::ConfigError(format!("Invalid header name {}: {}", name, e)))?;
        // from_bytes keeps non-ASCII UTF-8 (e.g. Chinese customer ids) as opaque octets
        let header_value = HeaderValue::from_bytes(value.as_bytes()).map_err(|e| {
            FinanceError::ConfigError(format!("Invalid value for header {}: {}", name, e))
        })?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }
}
