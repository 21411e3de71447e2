//! GPV trapdoor generation and Gaussian lattice preimage sampling over
//! `Z_q[x]/(x^N+1)`.

mod comb;
mod limb;
mod mpz;

pub mod codec;
pub mod collaborators;
pub mod error;
pub mod gaussian;
pub mod gpv;
pub mod params;
pub mod poly;
pub mod rng;
pub mod scrub;

pub use error::{CoreError, CoreResult};
pub use gpv::{generate, sample_preimage, BasisB, BasisGs, Keypair};
pub use params::Params;
pub use rng::EntropySource;
