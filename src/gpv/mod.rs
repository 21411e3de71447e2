//! GPV trapdoor lattices: basis generation, Gram-Schmidt expansion, and
//! Gaussian preimage sampling over the anticirculant basis
//! `[[rot(g), -rot(f)], [rot(G), -rot(F)]]`.

pub mod basis;
pub mod keygen;
pub mod preimage;

pub use basis::{BasisB, BasisGs};
pub use keygen::{generate, Keypair};
pub use preimage::sample_preimage;
