//! Error taxonomy for the core.
//!
//! A small, flat, `Copy` value. Diagnostic detail is logged via `tracing`
//! at the call site that fails, not stuffed into the error value itself.

use std::fmt;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// A requested (N, q, sigma) combination is outside supported ranges.
    InvalidParameter,
    /// A polynomial of the wrong length, an absent key, or a key that fails
    /// the NTRU equation check.
    InvalidInput,
    /// The discrete Gaussian sampler could not be constructed.
    SamplerFailure,
    /// MGS produced a near-zero diagonal, XGCD failed to stabilise within
    /// the prime budget, or the basis reduction loop did not terminate.
    NumericInstability,
    /// The CSPRNG collaborator signaled failure.
    EntropyExhaustion,
    /// A scratch allocation could not be satisfied.
    AllocationFailure,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CoreError::InvalidParameter => "invalid parameter set",
            CoreError::InvalidInput => "invalid input",
            CoreError::SamplerFailure => "sampler construction failure",
            CoreError::NumericInstability => "numeric instability",
            CoreError::EntropyExhaustion => "entropy source exhausted",
            CoreError::AllocationFailure => "allocation failure",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CoreError {}
