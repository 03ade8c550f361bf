//! Dictionary matching and rotation helpers.

use crate::dictionary::pack_bits;
use crate::Dictionary;

/// A dictionary match for an observed marker code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Marker id in the dictionary.
    pub id: u32,
    /// Rotation `0..=3` such that `observed_code == rotate(dict_code, rotation)`,
    /// each step being a quarter turn clockwise.
    pub rotation: u8,
    /// Hamming distance between observed and dictionary code (after rotation).
    pub hamming: u8,
}

/// Matcher for a fixed dictionary.
///
/// All four rotations of every code are precomputed once; lookups are a
/// brute-force scan, which is plenty for dictionaries of a few hundred ids.
/// A matcher never changes after construction and can be shared freely
/// between threads.
#[derive(Clone, Debug)]
pub struct Matcher {
    dict: Dictionary,
    max_hamming: u8,
    rotated: Vec<[u64; 4]>,
}

impl Matcher {
    /// Build a matcher for the given dictionary and Hamming threshold.
    ///
    /// `max_hamming = 0` gives exact matching.
    pub fn new(dict: Dictionary, max_hamming: u8) -> Self {
        let bits = dict.bit_count();
        assert!(
            bits <= 64,
            "marker_size {} implies {} bits > 64 (unsupported)",
            dict.marker_size,
            bits
        );

        let size = dict.marker_size;
        let rotated = dict
            .codes
            .iter()
            .map(|&code| [0, 1, 2, 3].map(|r| rotate_code_u64(code, size, r)))
            .collect();

        Self {
            dict,
            max_hamming,
            rotated,
        }
    }

    /// Exact-match matcher.
    pub fn exact(dict: Dictionary) -> Self {
        Self::new(dict, 0)
    }

    /// Dictionary used by this matcher.
    #[inline]
    pub fn dictionary(&self) -> Dictionary {
        self.dict
    }

    /// Maximum Hamming distance allowed for matches.
    #[inline]
    pub fn max_hamming(&self) -> u8 {
        self.max_hamming
    }

    /// Find the closest codeword within `max_hamming`.
    ///
    /// Ties on distance go to the lowest id, then the lowest rotation, so an
    /// exact lookup returns the first `(id, rotation)` in ascending order.
    pub fn match_code(&self, observed: u64) -> Option<Match> {
        let mut best: Option<Match> = None;

        for (id, rots) in self.rotated.iter().enumerate() {
            for (rot, &cand) in rots.iter().enumerate() {
                let h = (observed ^ cand).count_ones() as u8;
                if h > self.max_hamming {
                    continue;
                }
                if h == 0 {
                    return Some(Match {
                        id: id as u32,
                        rotation: rot as u8,
                        hamming: 0,
                    });
                }
                if best.is_none_or(|prev| h < prev.hamming) {
                    best = Some(Match {
                        id: id as u32,
                        rotation: rot as u8,
                        hamming: h,
                    });
                }
            }
        }

        best
    }

    /// Match a row-major boolean sample (`true` = black).
    pub fn match_bits(&self, bits: &[bool]) -> Option<Match> {
        let code = pack_bits(bits, self.dict.marker_size)?;
        self.match_code(code)
    }
}

/// Rotate a code stored in row-major bits (`idx = y * n + x`) by `rot`
/// quarter turns clockwise.
pub fn rotate_code_u64(code: u64, n: usize, rot: u8) -> u64 {
    let rot = rot & 3;
    if rot == 0 {
        return code;
    }

    let mut out = 0u64;
    for y in 0..n {
        for x in 0..n {
            let (sx, sy) = match rot {
                1 => (y, n - 1 - x),
                2 => (n - 1 - x, n - 1 - y),
                _ => (n - 1 - y, x),
            };
            let bit = (code >> (sy * n + sx)) & 1;
            out |= bit << (y * n + x);
        }
    }
    out
}
