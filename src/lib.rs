//! Arbitrary-precision π.
//!
//! ```no_run
//! use pi::{compute_pi, format_fixed, Algorithm};
//!
//! let value = compute_pi(1000, Algorithm::Chudnovsky).unwrap();
//! println!("{}", format_fixed(&value, 1000));
//! ```

use std::fmt;
use std::time::Instant;

use indicatif::ProgressBar;
use rayon::ThreadPool;
use rug::Float;
use tracing::{debug, info, info_span};

pub mod accumulate;
pub mod binary_split;
pub mod error;
pub mod format;
pub mod memory;
pub mod precision;
pub mod series;

pub use error::PiError;
pub use format::format_fixed;
pub use memory::MemoryEstimate;
pub use series::{Bbp, Chudnovsky, Normalization, TermGenerator};

/// Which evaluation of π to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Chudnovsky series, one term at a time from exact factorials.
    Chudnovsky,
    /// Bailey–Borwein–Plouffe series.
    Bbp,
    /// Chudnovsky series folded by binary splitting.
    BinarySplitting,
}

impl Algorithm {
    /// The term generator behind this algorithm, `None` for binary splitting
    /// which never materializes individual terms.
    pub fn generator(self) -> Option<&'static dyn TermGenerator> {
        match self {
            Algorithm::Chudnovsky => Some(&Chudnovsky),
            Algorithm::Bbp => Some(&Bbp),
            Algorithm::BinarySplitting => None,
        }
    }

    /// Terms needed for `digits` decimal digits.
    pub fn iterations(self, digits: u64) -> u32 {
        match self.generator() {
            Some(generator) => generator.iterations(digits),
            None => Chudnovsky.iterations(digits),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Chudnovsky => "chudnovsky",
            Algorithm::Bbp => "bbp",
            Algorithm::BinarySplitting => "binary-splitting",
        })
    }
}

/// π to `digits` decimal digits with default settings (one thread,
/// [`precision::DEFAULT_GUARD_BITS`], no memory limit).
pub fn compute_pi(digits: u64, algorithm: Algorithm) -> Result<Float, PiError> {
    Computation::new(digits, algorithm).run()
}

/// Everything a computation decides before touching a big number.
#[derive(Debug, Clone)]
pub struct Plan {
    pub precision: u32,
    pub terms: u32,
    pub memory: MemoryEstimate,
}

/// One π computation and its settings.
#[derive(Clone)]
pub struct Computation {
    digits: u64,
    algorithm: Algorithm,
    threads: usize,
    guard_bits: u32,
    memory_limit: Option<usize>,
    progress: ProgressBar,
}

impl Computation {
    pub fn new(digits: u64, algorithm: Algorithm) -> Self {
        Self {
            digits,
            algorithm,
            threads: 1,
            guard_bits: precision::DEFAULT_GUARD_BITS,
            memory_limit: None,
            progress: ProgressBar::hidden(),
        }
    }

    /// Worker threads, `0` for one per core.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn guard_bits(mut self, guard_bits: u32) -> Self {
        self.guard_bits = guard_bits;
        self
    }

    pub fn memory_limit(mut self, limit: Option<usize>) -> Self {
        self.memory_limit = limit;
        self
    }

    /// Bar advanced once per series term. Its length is set by [`run`](Self::run).
    pub fn progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn digits(&self) -> u64 {
        self.digits
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Precision, term count and memory estimate, checked against the limit.
    pub fn plan(&self) -> Result<Plan, PiError> {
        let precision = precision::working_precision(self.digits, self.guard_bits)?;
        let terms = self.algorithm.iterations(self.digits);

        let threads = match self.threads {
            0 => rayon::current_num_threads(),
            n => n,
        };
        let memory = MemoryEstimate::estimate(self.algorithm, precision, terms, threads);
        if !memory.fits_in(self.memory_limit) {
            return Err(PiError::MemoryLimit {
                needed: memory.total_bytes,
                limit: self.memory_limit.unwrap_or(usize::MAX),
            });
        }

        debug!(
            digits = self.digits,
            precision,
            terms,
            memory = memory.total_bytes,
            "planned"
        );
        Ok(Plan {
            precision,
            terms,
            memory,
        })
    }

    pub fn run(&self) -> Result<Float, PiError> {
        let plan = self.plan()?;

        let span = info_span!(
            "compute_pi",
            digits = self.digits,
            algorithm = %self.algorithm,
            precision = plan.precision,
            terms = plan.terms,
        );
        let _enter = span.enter();

        info!(threads = self.threads, "computing");
        let start = Instant::now();
        self.progress.set_length(u64::from(plan.terms));

        let pi = match self.algorithm.generator() {
            None => binary_split::binary_splitting(
                plan.terms,
                plan.precision,
                &self.pool()?,
                &self.progress,
            ),
            Some(generator) if self.threads == 1 => accumulate::accumulate_with_progress(
                generator,
                plan.terms,
                plan.precision,
                generator.normalization(),
                &self.progress,
            )?,
            Some(generator) => accumulate::accumulate_parallel(
                generator,
                plan.terms,
                plan.precision,
                generator.normalization(),
                &self.pool()?,
                &self.progress,
            )?,
        };

        info!(elapsed = ?start.elapsed(), "done");
        Ok(pi)
    }

    /// [`run`](Self::run), rendered with exactly `digits` fractional digits.
    pub fn run_to_string(&self) -> Result<String, PiError> {
        let pi = self.run()?;
        let digits = usize::try_from(self.digits).unwrap_or(usize::MAX);
        Ok(format_fixed(&pi, digits))
    }

    fn pool(&self) -> Result<ThreadPool, PiError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("pi-worker-{i}"))
            .build()?;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // http://www.numberworld.org/digits/Pi/
    const PI_100: &str = "3.\
        1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

    fn reference(digits: usize) -> String {
        let prec = precision::working_precision(digits as u64, 64).unwrap();
        format_fixed(&Float::with_val(prec, rug::float::Constant::Pi), digits)
    }

    fn last_10(s: &str) -> &str {
        &s[s.len() - 10..]
    }

    #[test]
    fn verify_100_digits() {
        assert_eq!(reference(100), PI_100);
        for algorithm in [
            Algorithm::Chudnovsky,
            Algorithm::Bbp,
            Algorithm::BinarySplitting,
        ] {
            let pi = Computation::new(100, algorithm).run_to_string().unwrap();
            assert_eq!(pi, PI_100, "{algorithm}");
            assert_eq!(last_10(&pi), "3421170679", "{algorithm}");
        }
    }

    #[test]
    fn thousand_digits_agree() {
        let chudnovsky_terms = 1000u32.div_ceil(14);
        let prec = precision::working_precision(1000, precision::DEFAULT_GUARD_BITS).unwrap();
        let chudnovsky = accumulate::accumulate(
            &Chudnovsky,
            chudnovsky_terms,
            prec,
            Normalization::Reciprocal,
        )
        .unwrap();
        let bbp = accumulate::accumulate(&Bbp, 1000, prec, Normalization::Identity).unwrap();

        let chudnovsky = format_fixed(&chudnovsky, 999);
        let bbp = format_fixed(&bbp, 999);
        assert_eq!(chudnovsky, bbp);
        assert_eq!(chudnovsky, reference(999));
    }

    #[test]
    fn feynman_point_digits_are_not_rounded_up() {
        // decimals 754..=764 of π: a 4 at 761 followed by a run of nines
        for algorithm in [
            Algorithm::Chudnovsky,
            Algorithm::Bbp,
            Algorithm::BinarySplitting,
        ] {
            for (digits, tail) in [(761, "70721134"), (764, "70721134999")] {
                let pi = Computation::new(digits, algorithm).run_to_string().unwrap();
                assert_eq!(pi.len(), "3.".len() + digits as usize, "{algorithm}");
                assert!(pi.ends_with(tail), "{algorithm} at {digits} digits");
            }
        }
    }

    #[test]
    fn one_digit_is_truncated() {
        for algorithm in [
            Algorithm::Chudnovsky,
            Algorithm::Bbp,
            Algorithm::BinarySplitting,
        ] {
            let pi = Computation::new(1, algorithm).run_to_string().unwrap();
            assert_eq!(pi, "3.1", "{algorithm}");
        }
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        for algorithm in [
            Algorithm::Chudnovsky,
            Algorithm::Bbp,
            Algorithm::BinarySplitting,
        ] {
            let a = compute_pi(300, algorithm).unwrap();
            let b = compute_pi(300, algorithm).unwrap();
            assert_eq!(a, b, "{algorithm}");
            assert_eq!(a.prec(), b.prec());
        }
    }

    #[test]
    fn zero_digits_is_rejected() {
        for algorithm in [
            Algorithm::Chudnovsky,
            Algorithm::Bbp,
            Algorithm::BinarySplitting,
        ] {
            assert!(matches!(
                compute_pi(0, algorithm),
                Err(PiError::InvalidDigits(0))
            ));
        }
    }

    #[test]
    fn memory_limit_is_enforced_before_computing() {
        let bar = ProgressBar::hidden();
        let err = Computation::new(10_000, Algorithm::Chudnovsky)
            .memory_limit(Some(1024))
            .progress(bar.clone())
            .run()
            .unwrap_err();
        assert!(matches!(err, PiError::MemoryLimit { limit: 1024, .. }));
        assert_eq!(bar.position(), 0);
    }

    #[test]
    fn threaded_runs_give_the_same_digits() {
        for algorithm in [Algorithm::Chudnovsky, Algorithm::Bbp] {
            let seq = Computation::new(500, algorithm).run_to_string().unwrap();
            let par = Computation::new(500, algorithm)
                .threads(4)
                .run_to_string()
                .unwrap();
            assert_eq!(seq, par, "{algorithm}");
        }
    }

    #[test]
    fn guard_bits_raise_precision() {
        let plain = Computation::new(50, Algorithm::Bbp).guard_bits(0).plan().unwrap();
        let guarded = Computation::new(50, Algorithm::Bbp).guard_bits(16).plan().unwrap();
        assert_eq!(plain.precision, precision::plan(50).unwrap());
        assert_eq!(guarded.precision, plain.precision + 16);
        assert_eq!(plain.terms, 50);
    }
}
