//! Interfaces this crate expects an embedding application to supply, but
//! does not implement itself: a domain-separated extendable-output hash
//! (for deriving the syndrome a preimage is sampled against) and an NTT
//! engine (an alternative, faster ring-multiplication backend for
//! production-sized N). Both are out of scope here; these traits exist so
//! call sites can be written against a stable interface ahead of a real
//! implementation landing.

use crate::error::CoreResult;

/// A domain-separated extendable-output function. Implementations are
/// expected to be collision-resistant and to treat `domain` as a prefix
/// that partitions the output space.
pub trait HashXof {
    fn absorb(&mut self, domain: &[u8], data: &[u8]);
    fn squeeze(&mut self, out: &mut [u8]) -> CoreResult<()>;
}

/// Number-theoretic transform over `Z_q`, an alternative ring-multiplication
/// backend to the schoolbook convolution in [`crate::poly::small`] for
/// parameter sets large enough that NTT's asymptotics win.
pub trait NttEngine {
    fn n(&self) -> usize;
    fn q(&self) -> u64;
    fn forward(&self, coeffs: &mut [u64]) -> CoreResult<()>;
    fn inverse(&self, coeffs: &mut [u64]) -> CoreResult<()>;
}
