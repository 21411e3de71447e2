//! A growable comb of primes, plus the per-level inverses needed to
//! recombine residues via CRT as the prime list grows, used by the modular
//! resultant and modular GCD/XGCD machinery.
//!
//! Grounded on the same "precompute once, reuse across many CRT
//! recombinations" shape as a zero-knowledge setup context: an immutable,
//! shareable context built incrementally and consulted many times,
//! generalized here to a growing prime-product tree.

use crate::mpz::Mpz;

/// One level of the comb: the accumulated modulus so far, and the next
/// prime's inverse modulo that accumulated modulus (used by `crt_extend`).
#[derive(Debug, Clone)]
struct CombLevel {
    prime: Mpz,
    modulus_before: Mpz,
    inv_modulus_before_mod_prime: Mpz,
}

/// A growable comb of primes not dividing a caller-supplied "forbidden"
/// value (e.g. `lc(a) * lc(b)` for a resultant). Primes are drawn from
/// `next_prime` starting just above a 32-bit floor, so each one fits in a
/// single machine word for the per-prime worker routines.
#[derive(Debug, Clone)]
pub struct Comb {
    levels: Vec<CombLevel>,
    modulus: Mpz,
    next_candidate: u64,
}

impl Comb {
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            modulus: Mpz::from_i64(1),
            next_candidate: 1 << 30,
        }
    }

    /// Current accumulated modulus (the product of all primes added so far).
    pub fn modulus(&self) -> &Mpz {
        &self.modulus
    }

    pub fn num_primes(&self) -> usize {
        self.levels.len()
    }

    /// Draw the next prime not dividing `forbidden`, add it to the comb, and
    /// return it.
    pub fn add_prime(&mut self, forbidden: &Mpz) -> Mpz {
        loop {
            let candidate = crate::limb::next_prime(self.next_candidate);
            self.next_candidate = candidate;
            let prime = Mpz::from_u64(candidate);
            if forbidden
                .modulo(&prime)
                .map(|r| r.is_zero())
                .unwrap_or(true)
            {
                continue;
            }
            let inv = self
                .modulus
                .invmod(&prime)
                .expect("comb modulus and a freshly drawn prime are coprime by construction");
            self.levels.push(CombLevel {
                prime: prime.clone(),
                modulus_before: self.modulus.clone(),
                inv_modulus_before_mod_prime: inv,
            });
            self.modulus = self.modulus.mul(&prime);
            return prime;
        }
    }

    /// Extend a CRT-recombined value `acc` (valid mod the comb's modulus
    /// *before* the most recently added prime) with one more residue
    /// `residue` (valid mod that most recently added prime), producing the
    /// value valid mod the comb's current (post-extension) modulus.
    ///
    /// This is Garner's formula applied one level at a time, which is what
    /// lets a modular resultant or extended-GCD computation accumulate a
    /// result prime-by-prime instead of re-running CRT from scratch.
    pub fn crt_extend(&self, acc: &Mpz, residue: &Mpz) -> Mpz {
        let level = self.levels.last().expect("comb has at least one prime");
        crate::mpz::crt_combine(
            acc,
            &level.modulus_before,
            residue,
            &level.prime,
            &level.inv_modulus_before_mod_prime,
        )
    }
}

impl Default for Comb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comb_recombines_known_residues() {
        let mut comb = Comb::new();
        let forbidden = Mpz::from_i64(1);

        let value = Mpz::from_i64(123_456_789);

        let p1 = comb.add_prime(&forbidden);
        let mut acc = value.modulo(&p1).unwrap();

        let p2 = comb.add_prime(&forbidden);
        let residue2 = value.modulo(&p2).unwrap();
        acc = comb.crt_extend(&acc, &residue2);

        let p3 = comb.add_prime(&forbidden);
        let residue3 = value.modulo(&p3).unwrap();
        acc = comb.crt_extend(&acc, &residue3);

        assert_eq!(acc, value);
        assert_eq!(comb.num_primes(), 3);
    }

    #[test]
    fn comb_skips_primes_dividing_forbidden() {
        let mut comb = Comb::new();
        let p1 = comb.add_prime(&Mpz::from_i64(1));
        // Force the forbidden value to be that same prime; the comb must
        // not draw it again.
        let p2 = comb.add_prime(&p1);
        assert_ne!(p1, p2);
    }
}
