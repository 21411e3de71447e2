//! Big-endian, fixed-width bit-packing for persisted keys. Coefficient
//! widths come from [`Params::fg_coeff_bits`] (f, g), [`Params::fg_big_coeff_bits`]
//! (F, G), and [`Params::q_bits`] (the public key h, reduced mod q).

use crate::error::{CoreError, CoreResult};
use crate::params::Params;
use crate::poly::small::PolyZ;
use tracing::error;

struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    filled: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self { bytes: Vec::new(), cur: 0, filled: 0 }
    }

    fn push_bit(&mut self, bit: u8) {
        self.cur = (self.cur << 1) | (bit & 1);
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.filled = 0;
        }
    }

    /// Push the low `width` bits of `value`, MSB first.
    fn push_bits(&mut self, value: u64, width: u32) {
        for i in (0..width).rev() {
            self.push_bit(((value >> i) & 1) as u8);
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.cur <<= 8 - self.filled;
            self.bytes.push(self.cur);
        }
        self.bytes
    }
}

struct BitReader<'a> {
    bytes: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, bit_pos: 0 }
    }

    fn pull_bits(&mut self, width: u32) -> CoreResult<u64> {
        let mut out = 0u64;
        for _ in 0..width {
            let byte_idx = self.bit_pos / 8;
            let bit_idx = 7 - (self.bit_pos % 8);
            let byte = *self.bytes.get(byte_idx).ok_or(CoreError::InvalidInput)?;
            let bit = (byte >> bit_idx) & 1;
            out = (out << 1) | bit as u64;
            self.bit_pos += 1;
        }
        Ok(out)
    }
}

/// Two's-complement signed encode of a polynomial whose coefficients fit in
/// `bits` bits (`Params::fg_coeff_bits`/`fg_big_coeff_bits`).
pub fn encode_signed_poly(p: &PolyZ, bits: u32) -> CoreResult<Vec<u8>> {
    let half = 1i64 << (bits - 1);
    let mut w = BitWriter::new();
    for &c in p.coeffs() {
        if c < -half || c >= half {
            error!("coefficient {c} does not fit in {bits} signed bits");
            return Err(CoreError::InvalidInput);
        }
        let unsigned = (c + half) as u64;
        w.push_bits(unsigned, bits);
    }
    Ok(w.finish())
}

pub fn decode_signed_poly(data: &[u8], n: usize, bits: u32) -> CoreResult<PolyZ> {
    let half = 1i64 << (bits - 1);
    let mut r = BitReader::new(data);
    let mut coeffs = Vec::with_capacity(n);
    for _ in 0..n {
        let raw = r.pull_bits(bits)?;
        coeffs.push(raw as i64 - half);
    }
    Ok(PolyZ::from_coeffs(coeffs))
}

/// Unsigned encode of a polynomial already reduced mod q, at `q_bits` per
/// coefficient.
pub fn encode_mod_q_poly(p: &PolyZ, q_bits: u32) -> CoreResult<Vec<u8>> {
    let mut w = BitWriter::new();
    for &c in p.coeffs() {
        if c < 0 {
            error!("mod-q polynomial has a negative coefficient {c}");
            return Err(CoreError::InvalidInput);
        }
        w.push_bits(c as u64, q_bits);
    }
    Ok(w.finish())
}

pub fn decode_mod_q_poly(data: &[u8], n: usize, q_bits: u32) -> CoreResult<PolyZ> {
    let mut r = BitReader::new(data);
    let mut coeffs = Vec::with_capacity(n);
    for _ in 0..n {
        coeffs.push(r.pull_bits(q_bits)? as i64);
    }
    Ok(PolyZ::from_coeffs(coeffs))
}

/// Persisted private key: f, g at `fg_coeff_bits`, F, G at `fg_big_coeff_bits`.
pub fn encode_private_key(params: &Params, f: &PolyZ, g: &PolyZ, big_f: &PolyZ, big_g: &PolyZ) -> CoreResult<Vec<u8>> {
    let mut out = encode_signed_poly(f, params.fg_coeff_bits())?;
    out.extend(encode_signed_poly(g, params.fg_coeff_bits())?);
    out.extend(encode_signed_poly(big_f, params.fg_big_coeff_bits())?);
    out.extend(encode_signed_poly(big_g, params.fg_big_coeff_bits())?);
    Ok(out)
}

pub fn encode_public_key(params: &Params, h: &PolyZ) -> CoreResult<Vec<u8>> {
    encode_mod_q_poly(h, params.q_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_poly_round_trips() {
        let p = PolyZ::from_coeffs(vec![-5, 3, 0, 7, -8]);
        let bits = 5;
        let bytes = encode_signed_poly(&p, bits).unwrap();
        let back = decode_signed_poly(&bytes, p.n(), bits).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn mod_q_poly_round_trips() {
        let p = PolyZ::from_coeffs(vec![0, 1, 8190, 4096]);
        let bits = 13;
        let bytes = encode_mod_q_poly(&p, bits).unwrap();
        let back = decode_mod_q_poly(&bytes, p.n(), bits).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn out_of_range_coefficient_is_rejected() {
        let p = PolyZ::from_coeffs(vec![100]);
        assert!(encode_signed_poly(&p, 4).is_err());
    }
}
