//! Request credentials: signature derivation and its memoizing gate.

pub mod gate;
pub mod signer;

use crate::FinanceError;

pub use gate::{cache_key, SignatureGate, DEFAULT_CACHE_NAMESPACE, DEFAULT_SIGNATURE_TTL};
pub use signer::{compute_signature, HmacSigner, Signer, SigningContext, SigningInput};

/// Strategy that yields the `signature` header for a request.
///
/// [`SignatureGate`] is the default. Clients hold an `Arc<dyn RequestSigner>`
/// so the whole strategy can be replaced, e.g. to sign through an external
/// service.
pub trait RequestSigner: Send + Sync {
    /// Signature to send for `input`.
    fn signature(&self, input: &SigningInput) -> Result<String, FinanceError>;
}
