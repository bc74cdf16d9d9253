//! Chudnovsky by binary splitting.
//!
//! Instead of building every term from its own factorials, the series over
//! `[a, b)` is folded into three integers:
//!
//! ```text
//! p(b-1,b) = b^3 * C^3 / 24
//! g(b-1,b) = (6b-5)(2b-1)(6b-1)
//! q(b-1,b) = (-1)^b * g(b-1,b) * (A + Bb)
//!
//! p(a,b) = p(a,m) * p(m,b)
//! q(a,b) = q(a,m) * p(m,b) + q(m,b) * g(a,m)
//! g(a,b) = g(a,m) * g(m,b)
//! ```
//!
//! and π falls out of a single float division at the end. Each worker splits
//! its own slice of the index range, the slices are then merged pairwise.

use indicatif::ProgressBar;
use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPool,
};
use rug::{
    ops::{CompleteRound, NegAssign, PowAssign},
    Assign, Float, Integer,
};
use tracing::debug;

use crate::series::chudnovsky::{A, B, C, D};

/// The folded series over one index range `[a, b)`.
#[derive(Debug, Default, Clone)]
struct Segment {
    p: Integer,
    q: Integer,
    g: Integer,
}

impl Segment {
    /// Overwrite with the single-term range `[b-1, b)`, reusing the limbs.
    fn set_term(&mut self, b: usize) {
        // b^3 * C^3 / 24
        self.p.assign(b);
        self.p.pow_assign(3);
        self.p *= (C / 24) * (C / 24);
        self.p *= C * 24;

        self.g.assign(2 * b - 1);
        self.g *= 6 * b - 1;
        self.g *= 6 * b - 5;

        self.q.assign(b);
        self.q *= B;
        self.q += A;
        self.q *= &self.g;

        if b % 2 == 1 {
            self.q.neg_assign();
        }
    }

    /// Extend `[a, m)` by the adjacent range `[m, b)`.
    fn absorb(&mut self, right: &Segment) {
        self.p *= &right.p;

        // q uses g(a,m), so g is updated last
        self.q *= &right.p;
        self.q += &right.q * &self.g;

        self.g *= &right.g;
    }
}

/// π from the first `terms` Chudnovsky terms, rounded to `prec` bits.
///
/// `terms` counts the `k = 0` term, so `terms = 1` is the same one-term
/// approximation the plain series gives.
pub fn binary_splitting(
    terms: u32,
    prec: u32,
    pool: &ThreadPool,
    progress: &ProgressBar,
) -> Float {
    // k = 0 is folded in by the final `q + A*p`
    let splits = terms.saturating_sub(1) as usize;
    progress.inc(1);

    let (mut p, mut q) = if splits == 0 {
        (Integer::from(1), Integer::new())
    } else {
        let Segment { p, q, .. } = split_across(splits, pool, progress);
        (p, q)
    };

    /*
            p*(C/D)*sqrt(C)
    pi = -----------------
               (q+A*p)
    */
    q += &p * A;
    p *= C / D;

    let p_float = Float::with_val(prec, p);
    let q_float = Float::with_val(prec, q);
    let mut pi = p_float / q_float;
    pi *= Float::sqrt_u(C).complete(prec);

    debug!(terms, prec, "binary splitting finished");
    pi
}

fn split_across(splits: usize, pool: &ThreadPool, progress: &ProgressBar) -> Segment {
    let threads = pool.current_num_threads().clamp(1, splits);
    let per_thread = splits / threads;

    let mut parts: Vec<Segment> = pool.install(|| {
        (0..threads)
            .into_par_iter()
            .map(|i| {
                let from = i * per_thread;
                let to = if i < threads - 1 {
                    (i + 1) * per_thread
                } else {
                    splits
                };
                Splitter::new(to - from, progress.clone()).split(from, to)
            })
            .collect()
    });
    debug!(parts = parts.len(), "ranges split");

    pool.install(|| reduce(&mut parts))
}

/// Fold adjacent segments pairwise, halves in parallel.
fn reduce(parts: &mut [Segment]) -> Segment {
    if let [only] = parts {
        return std::mem::take(only);
    }

    let mid = parts.len() / 2;
    let (start, end) = parts.split_at_mut(mid);
    let (mut left, right) = rayon::join(|| reduce(start), || reduce(end));
    left.absorb(&right);
    left
}

/// Depth-first splitter with one preallocated [`Segment`] per recursion
/// level, so deep recursion reuses limbs instead of allocating at every node.
struct Splitter {
    levels: Vec<Segment>,
    progress: ProgressBar,
}

impl Splitter {
    fn new(len: usize, progress: ProgressBar) -> Self {
        // only right halves move one level down and they hold at most
        // ceil(len / 2) terms
        let depth = len.max(1).ilog2() as usize + 2;
        Self {
            levels: vec![Segment::default(); depth],
            progress,
        }
    }

    fn split(mut self, from: usize, to: usize) -> Segment {
        self.split_into(from, to, 0);
        self.levels.swap_remove(0)
    }

    fn split_into(&mut self, a: usize, b: usize, level: usize) {
        if b - a == 1 {
            self.levels[level].set_term(b);
            self.progress.inc(1);
            return;
        }

        // slightly left of centre, tuned by hand
        let m = (a + ((b - a) as f64 * 0.5224) as usize).clamp(a + 1, b - 1);
        self.split_into(a, m, level);
        self.split_into(m, b, level + 1);

        let (upper, lower) = self.levels.split_at_mut(level + 1);
        upper[level].absorb(&lower[0]);
    }
}
