//! Memory estimation, checked before any big number is allocated.
//!
//! GMP aborts the process when an allocation fails, so the only way to turn
//! "too many digits" into an error is to refuse up front.

use crate::Algorithm;

/// Estimated footprint of one π computation.
#[derive(Debug, Clone)]
pub struct MemoryEstimate {
    /// The final float.
    pub result_bytes: usize,
    /// Terms, factorials and partial sums alive at the same time.
    pub temp_bytes: usize,
    pub total_bytes: usize,
}

impl MemoryEstimate {
    /// Floats alive inside one term evaluation (sub-terms, the running sum and
    /// the quotient being built).
    const FLOATS_PER_WORKER: usize = 6;

    pub fn estimate(algorithm: Algorithm, prec: u32, terms: u32, threads: usize) -> Self {
        let float_bytes = bytes(prec as f64);
        let threads = threads.max(1);
        let last = terms.saturating_sub(1) as f64;

        let temp_bytes = match algorithm {
            Algorithm::Bbp => threads * Self::FLOATS_PER_WORKER * float_bytes,
            Algorithm::Chudnovsky => {
                // (6k)! dominates: about 6k * log2(6k) bits, and the
                // numerator, denominator and their product share the stage
                let six_k = 6. * last;
                let factorial = bytes(six_k * six_k.max(2.).log2());
                threads * (3 * factorial + Self::FLOATS_PER_WORKER * float_bytes)
            }
            Algorithm::BinarySplitting => {
                // p, q and g each grow by about 3*log2(k) + 60 bits per term,
                // merging briefly holds a second copy
                let per_term = 3. * last.max(2.).log2() + 60.;
                let pqg = bytes(last * per_term);
                2 * 3 * pqg + 3 * float_bytes
            }
        };

        Self {
            result_bytes: float_bytes,
            temp_bytes,
            total_bytes: float_bytes + temp_bytes,
        }
    }

    /// Whether the computation fits in `limit` bytes. `None` means unlimited.
    pub fn fits_in(&self, limit: Option<usize>) -> bool {
        match limit {
            None => true,
            Some(l) => self.total_bytes <= l,
        }
    }
}

fn bytes(bits: f64) -> usize {
    (bits / 8.).ceil() as usize
}

/// Parse a memory size such as `8G`, `512M`, `1024K` or `4096`.
pub fn parse_memory_limit(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let upper = s.to_ascii_uppercase();

    let (num, multiplier) = if let Some(n) = upper.strip_suffix('G') {
        (n, 1 << 30)
    } else if let Some(n) = upper.strip_suffix('M') {
        (n, 1 << 20)
    } else if let Some(n) = upper.strip_suffix('K') {
        (n, 1 << 10)
    } else if let Some(n) = upper.strip_suffix('B') {
        (n, 1)
    } else {
        (upper.as_str(), 1)
    };

    let value: usize = num
        .trim()
        .parse()
        .map_err(|_| format!("invalid memory size \"{s}\""))?;

    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("memory size \"{s}\" is too large"))
}
