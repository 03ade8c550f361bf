//! Dictionary metadata and packed marker codes.

/// A fixed ArUco-style dictionary.
#[derive(Clone, Copy, Debug)]
pub struct Dictionary {
    /// Human-readable name (for debugging/logging).
    pub name: &'static str,
    /// Marker side length (number of inner bits per side).
    pub marker_size: usize,
    /// Maximum error-correcting Hamming distance the code table guarantees.
    pub max_correction_bits: u8,
    /// One `u64` per marker id, encoding the inner `marker_size × marker_size` bits.
    ///
    /// Bits are stored in row-major order (`idx = y * marker_size + x`) with **black = 1**.
    pub codes: &'static [u64],
}

impl Dictionary {
    /// Total number of inner bits per marker.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.marker_size * self.marker_size
    }

    /// Number of codewords.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codeword for `id`, if it exists.
    #[inline]
    pub fn code(&self, id: u32) -> Option<u64> {
        self.codes.get(id as usize).copied()
    }
}

/// Pack a row-major boolean grid (`true` = black) into a code word.
///
/// Returns `None` unless `bits` holds exactly `n * n` entries with `n * n <= 64`.
pub fn pack_bits(bits: &[bool], n: usize) -> Option<u64> {
    if n * n > 64 || bits.len() != n * n {
        return None;
    }
    Some(
        bits.iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | ((b as u64) << i)),
    )
}

/// Unpack a code word into a row-major boolean grid (`true` = black).
pub fn unpack_bits(code: u64, n: usize) -> Vec<bool> {
    (0..n * n).map(|i| (code >> i) & 1 == 1).collect()
}
