//! Request signature derivation.
//!
//! The remote verifier recomputes the same concatenation, so field order is
//! part of the wire contract:
//!
//! ```text
//! accountPeriod appKey appSecret customerId period reclassifyFlag taxCode timestamp version xReqNonce
//! ```
//!
//! Fields are joined without separators. Absent optional fields contribute
//! an empty string. The merged string is query-escaped (space becomes `+`),
//! run through HMAC-SHA256 keyed with the application secret, and the raw
//! digest is base64-encoded with padding.

use crate::FinanceError;
use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Optional, endpoint-specific fields that take part in the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningContext {
    /// Accounting period, e.g. `202401`.
    pub account_period: Option<String>,
    /// Subject customer identifier.
    pub customer_id: Option<String>,
    /// Tax reporting period.
    pub period: Option<String>,
    /// Balance-sheet reclassification flag.
    pub reclassify_flag: Option<String>,
    /// Tax code.
    pub tax_code: Option<String>,
}

impl SigningContext {
    /// Context with no optional fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the customer identifier.
    pub fn customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Set the accounting period.
    pub fn account_period(mut self, account_period: impl Into<String>) -> Self {
        self.account_period = Some(account_period.into());
        self
    }

    /// Set the tax period.
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Set the reclassification flag.
    pub fn reclassify_flag(mut self, flag: impl Into<String>) -> Self {
        self.reclassify_flag = Some(flag.into());
        self
    }

    /// Set the tax code.
    pub fn tax_code(mut self, tax_code: impl Into<String>) -> Self {
        self.tax_code = Some(tax_code.into());
        self
    }
}

/// Material consumed to produce one signature.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningInput {
    /// Public application identifier.
    pub app_key: String,
    /// Shared secret. Used as HMAC key and concatenated into the canonical string.
    pub app_secret: String,
    /// Request issuance time, milliseconds since epoch.
    pub timestamp: i64,
    /// Protocol version tag.
    pub version: String,
    /// Per-session random token.
    pub nonce: String,
    /// Endpoint-specific optional fields.
    pub context: SigningContext,
}

impl fmt::Debug for SigningInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningInput")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("timestamp", &self.timestamp)
            .field("version", &self.version)
            .field("nonce", &self.nonce)
            .field("context", &self.context)
            .finish()
    }
}

fn or_empty(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

/// Build the canonical (pre-escape) string for a signing input.
pub fn canonical_string(input: &SigningInput) -> String {
    let ctx = &input.context;
    let timestamp = input.timestamp.to_string();

    let fields: [&str; 10] = [
        or_empty(&ctx.account_period),
        input.app_key.as_str(),
        input.app_secret.as_str(),
        or_empty(&ctx.customer_id),
        or_empty(&ctx.period),
        or_empty(&ctx.reclassify_flag),
        or_empty(&ctx.tax_code),
        timestamp.as_str(),
        input.version.as_str(),
        input.nonce.as_str(),
    ];
    fields.concat()
}

/// Escape a string for use as a URL query component.
///
/// Alphanumerics and `-_.~` pass through, space becomes `+`, every other
/// byte becomes `%XX` with uppercase hex.
pub fn query_escape(s: &str) -> String {
    // urlencoding leaves no literal '+', so every "%20" is a space
    urlencoding::encode(s).replace("%20", "+")
}

/// Inverse of [`query_escape`].
pub fn query_unescape(s: &str) -> Result<String, FinanceError> {
    let spaced = s.replace('+', "%20");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| FinanceError::Decode(format!("Invalid escaped string: {}", e)))
}

/// Compute the request signature for `input`.
///
/// # Errors
/// * `MissingSecret` - the application secret is empty
pub fn compute_signature(input: &SigningInput) -> Result<String, FinanceError> {
    if input.app_secret.is_empty() {
        return Err(FinanceError::MissingSecret);
    }

    let escaped = query_escape(&canonical_string(input));

    let mut mac = HmacSha256::new_from_slice(input.app_secret.as_bytes())
        .map_err(|e| FinanceError::ConfigError(format!("Invalid HMAC key: {}", e)))?;
    mac.update(escaped.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Pluggable signature computation.
pub trait Signer: Send + Sync {
    /// Derive a signature for `input`.
    fn sign(&self, input: &SigningInput) -> Result<String, FinanceError>;
}

/// Default HMAC-SHA256 signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSigner;

impl Signer for HmacSigner {
    fn sign(&self, input: &SigningInput) -> Result<String, FinanceError> {
        compute_signature(input)
    }
}
