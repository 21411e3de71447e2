//! Huffman sampler: build a Huffman tree over the (truncated, quantized)
//! PMF, then sample by walking the tree one random bit at a time. Unlike
//! the CDT/Knuth-Yao tables, a Huffman tree's expected bit consumption per
//! sample is within one bit of the distribution's entropy.

use super::{half_pmf_table, BaseSampler, BoxedRng, Sampler, SamplerConfig};
use rand::RngCore;

enum Node {
    Leaf(i64),
    Internal(Box<Node>, Box<Node>),
}

pub struct HuffmanSampler {
    root: Node,
    bound: i64,
    sigma: f64,
    blinding: bool,
    rng: BoxedRng,
    bit_buffer: u64,
    bits_left: u32,
    /// Deepest leaf in the tree; when `blinding` is set, every draw walks
    /// exactly this many bits regardless of which leaf it actually lands
    /// on, so a timing observer sees a constant iteration count instead of
    /// one proportional to the sampled symbol's code length.
    max_depth: u32,
}

impl HuffmanSampler {
    pub fn new(cfg: SamplerConfig, rng: BoxedRng) -> Self {
        let half = half_pmf_table(cfg.sigma, cfg.tail);
        let bound = (half.len() - 1) as i64;

        let mut weighted: Vec<(f64, Node)> = Vec::new();
        weighted.push((half[0], Node::Leaf(0)));
        for (i, &p) in half.iter().enumerate().skip(1) {
            weighted.push((p, Node::Leaf(i as i64)));
            weighted.push((p, Node::Leaf(-(i as i64))));
        }

        let root = build_huffman(weighted);
        let max_depth = tree_depth(&root);

        Self {
            root,
            bound,
            sigma: cfg.sigma,
            blinding: cfg.blinding,
            rng,
            bit_buffer: 0,
            bits_left: 0,
            max_depth,
        }
    }

    fn next_bit(&mut self) -> u8 {
        next_bit_raw(&mut self.rng, &mut self.bit_buffer, &mut self.bits_left)
    }
}

fn next_bit_raw(rng: &mut BoxedRng, bit_buffer: &mut u64, bits_left: &mut u32) -> u8 {
    if *bits_left == 0 {
        *bit_buffer = rng.next_u64();
        *bits_left = 64;
    }
    *bits_left -= 1;
    ((*bit_buffer >> *bits_left) & 1) as u8
}

/// Standard bottom-up Huffman construction: repeatedly merge the two
/// lowest-weight nodes until one remains. O(n^2) in the node count, fine
/// for a table built once per sigma.
fn tree_depth(node: &Node) -> u32 {
    match node {
        Node::Leaf(_) => 0,
        Node::Internal(l, r) => 1 + tree_depth(l).max(tree_depth(r)),
    }
}

fn build_huffman(mut nodes: Vec<(f64, Node)>) -> Node {
    assert!(!nodes.is_empty());
    while nodes.len() > 1 {
        let (i, _) = nodes
            .iter()
            .enumerate()
            .min_by(|a, b| a.1 .0.total_cmp(&b.1 .0))
            .unwrap();
        let (w1, n1) = nodes.remove(i);
        let (j, _) = nodes
            .iter()
            .enumerate()
            .min_by(|a, b| a.1 .0.total_cmp(&b.1 .0))
            .unwrap();
        let (w2, n2) = nodes.remove(j);
        nodes.push((w1 + w2, Node::Internal(Box::new(n1), Box::new(n2))));
    }
    nodes.pop().unwrap().1
}

impl BaseSampler for HuffmanSampler {
    fn sample_zero(&mut self) -> i64 {
        if !self.blinding {
            let mut node = &self.root;
            loop {
                match node {
                    Node::Leaf(v) => return *v,
                    Node::Internal(l, r) => {
                        let bit = next_bit_raw(&mut self.rng, &mut self.bit_buffer, &mut self.bits_left);
                        node = if bit == 0 { l } else { r };
                    }
                }
            }
        }

        let mut node = &self.root;
        let mut result = None;
        for _ in 0..self.max_depth {
            let bit = next_bit_raw(&mut self.rng, &mut self.bit_buffer, &mut self.bits_left);
            match node {
                Node::Leaf(v) => {
                    result.get_or_insert(*v);
                }
                Node::Internal(l, r) => {
                    node = if bit == 0 { l } else { r };
                }
            }
        }
        if let Node::Leaf(v) = node {
            result.get_or_insert(*v);
        }
        result.expect("a Huffman tree with at least one leaf always resolves")
    }

    fn sigma(&self) -> f64 {
        self.sigma
    }

    fn blinding(&self) -> bool {
        self.blinding
    }
}

impl Sampler for HuffmanSampler {
    fn rng(&mut self) -> &mut dyn rand::RngCore {
        &mut *self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian::{Precision, SamplerVariant};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn make(sigma: f64) -> HuffmanSampler {
        make_with(sigma, false)
    }

    fn make_with(sigma: f64, blinding: bool) -> HuffmanSampler {
        let cfg = SamplerConfig {
            variant: SamplerVariant::Huffman,
            precision: Precision::P64,
            sigma,
            tail: 8,
            blinding,
            bootstrap: false,
        };
        HuffmanSampler::new(cfg, Box::new(ChaCha20Rng::seed_from_u64(9)))
    }

    #[test]
    fn empirical_mean_is_near_zero() {
        let mut s = make(5.0);
        let n = 20_000;
        let sum: i64 = (0..n).map(|_| s.sample_zero()).sum();
        let mean = sum as f64 / n as f64;
        assert!(mean.abs() < 1.0, "mean={mean}");
    }

    #[test]
    fn samples_stay_within_bound() {
        let mut s = make(3.0);
        for _ in 0..2000 {
            assert!(s.sample_zero().unsigned_abs() as i64 <= s.bound);
        }
    }

    #[test]
    fn blinded_traversal_stays_within_bound_and_near_zero_mean() {
        let mut s = make_with(5.0, true);
        let n = 20_000;
        let mut sum = 0i64;
        for _ in 0..n {
            let v = s.sample_zero();
            assert!(v.unsigned_abs() as i64 <= s.bound);
            sum += v;
        }
        let mean = sum as f64 / n as f64;
        assert!(mean.abs() < 1.0, "mean={mean}");
    }
}
