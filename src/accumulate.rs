//! Summing series terms into π.

use indicatif::ProgressBar;
use rayon::ThreadPool;
use rug::Float;
use tracing::{debug, trace};

use crate::error::PiError;
use crate::series::{Normalization, TermGenerator};

/// Sum terms `0..iterations` in increasing order at `prec` bits, then apply
/// `normalization`.
pub fn accumulate(
    generator: &dyn TermGenerator,
    iterations: u32,
    prec: u32,
    normalization: Normalization,
) -> Result<Float, PiError> {
    accumulate_with_progress(
        generator,
        iterations,
        prec,
        normalization,
        &ProgressBar::hidden(),
    )
}

/// [`accumulate`], ticking `progress` once per term.
pub fn accumulate_with_progress(
    generator: &dyn TermGenerator,
    iterations: u32,
    prec: u32,
    normalization: Normalization,
    progress: &ProgressBar,
) -> Result<Float, PiError> {
    let mut sum = Float::new(prec);

    for k in 0..iterations {
        let term = generator.term(k, prec)?;
        sum += term;
        progress.inc(1);
    }

    debug!(series = generator.name(), iterations, "series summed");
    Ok(normalization.apply(sum))
}

/// Same sum as [`accumulate`], with terms evaluated on `pool`.
///
/// Partial sums are combined along a fixed binary tree over the index range
/// (always split at the midpoint), so the result does not depend on how many
/// threads the pool has. It may differ from the sequential sum in the last
/// bits since float addition is not associative.
pub fn accumulate_parallel(
    generator: &dyn TermGenerator,
    iterations: u32,
    prec: u32,
    normalization: Normalization,
    pool: &ThreadPool,
    progress: &ProgressBar,
) -> Result<Float, PiError> {
    let sum = pool.install(|| sum_range(generator, 0, iterations, prec, 0, progress))?;

    debug!(
        series = generator.name(),
        iterations,
        threads = pool.current_num_threads(),
        "series summed"
    );
    Ok(normalization.apply(sum))
}

fn sum_range(
    generator: &dyn TermGenerator,
    a: u32,
    b: u32,
    prec: u32,
    level: usize,
    progress: &ProgressBar,
) -> Result<Float, PiError> {
    match b - a {
        0 => Ok(Float::new(prec)),
        1 => {
            let term = generator.term(a, prec)?;
            progress.inc(1);
            Ok(term)
        }
        n => {
            let mid = a + n / 2;
            let (left, right) = rayon::join(
                || sum_range(generator, a, mid, prec, level + 1, progress),
                || sum_range(generator, mid, b, prec, level + 1, progress),
            );

            let mut sum = left?;
            sum += right?;
            trace!(a, b, level, "partial sum");
            Ok(sum)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Bbp, Chudnovsky};

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    fn digits(x: &Float, n: usize) -> String {
        let mut s = x.to_string_radix(10, Some(n + 8));
        s.truncate("3.".len() + n);
        s
    }

    #[test]
    fn empty_sum_is_zero() {
        let sum = accumulate(&Bbp, 0, 64, Normalization::Identity).unwrap();
        assert!(sum.is_zero());
        assert_eq!(sum.prec(), 64);
    }

    #[test]
    fn single_chudnovsky_term_gives_fourteen_digits() {
        let prec = crate::precision::plan(14).unwrap();
        let pi = accumulate(&Chudnovsky, 1, prec, Normalization::Reciprocal).unwrap();
        // 14 significant digits, k = 0 alone is off from the 14th decimal on
        assert_eq!(digits(&pi, 13), "3.1415926535897");
    }

    #[test]
    fn result_keeps_working_precision() {
        let pi = accumulate(&Chudnovsky, 4, 300, Normalization::Reciprocal).unwrap();
        assert_eq!(pi.prec(), 300);
        let pi = accumulate(&Bbp, 10, 300, Normalization::Identity).unwrap();
        assert_eq!(pi.prec(), 300);
    }

    #[test]
    fn parallel_matches_sequential_digits() {
        let prec = crate::precision::working_precision(200, 32).unwrap();
        let n = Chudnovsky.iterations(200);
        let seq = accumulate(&Chudnovsky, n, prec, Normalization::Reciprocal).unwrap();
        let par = accumulate_parallel(
            &Chudnovsky,
            n,
            prec,
            Normalization::Reciprocal,
            &pool(4),
            &ProgressBar::hidden(),
        )
        .unwrap();
        assert_eq!(digits(&seq, 200), digits(&par, 200));
    }

    #[test]
    fn parallel_is_independent_of_thread_count() {
        let prec = crate::precision::working_precision(300, 32).unwrap();
        let run = |threads| {
            accumulate_parallel(
                &Bbp,
                300,
                prec,
                Normalization::Identity,
                &pool(threads),
                &ProgressBar::hidden(),
            )
            .unwrap()
        };
        let one = run(1);
        assert_eq!(one, run(3));
        assert_eq!(one, run(8));
    }

    #[test]
    fn progress_counts_every_term() {
        let bar = ProgressBar::hidden();
        accumulate_with_progress(&Bbp, 25, 128, Normalization::Identity, &bar).unwrap();
        assert_eq!(bar.position(), 25);

        let bar = ProgressBar::hidden();
        accumulate_parallel(&Bbp, 25, 128, Normalization::Identity, &pool(2), &bar).unwrap();
        assert_eq!(bar.position(), 25);
    }
}
