//! Polynomial arithmetic, layered from cheapest to most general:
//! `small` (machine-word coefficients, the hot path for sampling and
//! preimage extraction), `mpz_poly`/`modp` (arbitrary precision, used by
//! key generation's resultant/XGCD machinery), and `fft` (the Gram-Schmidt
//! norm test's numerical helper).

pub mod fft;
pub mod modp;
pub mod mpz_poly;
pub mod small;

pub use mpz_poly::PolyMpz;
pub use small::PolyZ;
