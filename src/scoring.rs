//! The scoring function: a precomputed distance-to-energy table for every
//! unordered pair of XS atom types.
//!
//! Storage is a single flat `Vec<f64>` indexed by a packed symmetric
//! triangular pair index, filled once and read many times via `evaluate`.
//! Each table samples a weighted sum of analytic Gaussian/repulsion/
//! hydrophobic/hydrogen-bond components on a uniform grid in squared
//! distance.

use crate::atom_type::{is_hbond_pair, XsType};
use crate::constants::*;
use crate::pool::WorkPool;

/// Returns the flat index of the symmetric pair table entry for `(t0, t1)`.
/// `p(t0,t1) = t1*(t1+1)/2 + t0`, with `t0 <= t1`.
#[inline]
pub fn pair_index(t0: usize, t1: usize) -> usize {
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    hi * (hi + 1) / 2 + lo
}

/// Number of distinct unordered pairs over `n` atom types.
pub fn num_pairs(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Number of buckets in each per-pair table.
fn table_size() -> usize {
    (SCORING_CUTOFF2 / SCORING_DELTA).ceil() as usize
}

/// Narrow Gaussian attraction term, centered at surface contact.
fn gauss1(d: f64) -> f64 {
    (-(d / GAUSS1_WIDTH).powi(2)).exp()
}

/// Broad Gaussian attraction term, centered `GAUSS2_OFFSET` beyond contact.
fn gauss2(d: f64) -> f64 {
    (-((d - GAUSS2_OFFSET) / GAUSS2_WIDTH).powi(2)).exp()
}

/// Short-range repulsion, nonzero only for overlapping vdW spheres (`d < 0`).
fn repulsion(d: f64) -> f64 {
    if d < 0.0 {
        d * d
    } else {
        0.0
    }
}

/// Linear ramp: 1 at/below `good`, 0 at/above `bad`, linear in between.
fn ramp(d: f64, good: f64, bad: f64) -> f64 {
    if d <= good {
        1.0
    } else if d >= bad {
        0.0
    } else {
        (bad - d) / (bad - good)
    }
}

/// Potential energy at surface separation `d`, for a pair with the given
/// hydrophobic/hbond applicability flags.
fn potential(d: f64, both_hydrophobic: bool, hbond_pair: bool) -> f64 {
    let mut e =
        WEIGHT_GAUSS1 * gauss1(d) + WEIGHT_GAUSS2 * gauss2(d) + WEIGHT_REPULSION * repulsion(d);
    if both_hydrophobic {
        e += WEIGHT_HYDROPHOBIC * ramp(d, HYDROPHOBIC_GOOD, HYDROPHOBIC_BAD);
    }
    if hbond_pair {
        e += WEIGHT_HBOND * ramp(d, HBOND_GOOD, HBOND_BAD);
    }
    e
}

/// `d(potential)/d(d)`.
fn potential_ddist(d: f64, both_hydrophobic: bool, hbond_pair: bool) -> f64 {
    let dgauss1 = -2.0 * d / (GAUSS1_WIDTH * GAUSS1_WIDTH) * gauss1(d);
    let dgauss2 = -2.0 * (d - GAUSS2_OFFSET) / (GAUSS2_WIDTH * GAUSS2_WIDTH) * gauss2(d);
    let drepulsion = if d < 0.0 { 2.0 * d } else { 0.0 };
    let mut de =
        WEIGHT_GAUSS1 * dgauss1 + WEIGHT_GAUSS2 * dgauss2 + WEIGHT_REPULSION * drepulsion;
    if both_hydrophobic && d > HYDROPHOBIC_GOOD && d < HYDROPHOBIC_BAD {
        de += WEIGHT_HYDROPHOBIC * (-1.0 / (HYDROPHOBIC_BAD - HYDROPHOBIC_GOOD));
    }
    if hbond_pair && d > HBOND_GOOD && d < HBOND_BAD {
        de += WEIGHT_HBOND * (-1.0 / (HBOND_BAD - HBOND_GOOD));
    }
    de
}

/// Energy and derivative table for a single atom-type pair, indexed by
/// `floor(r^2 / SCORING_DELTA)`.
struct PairTable {
    energy: Vec<f64>,
    denergy_dr2: Vec<f64>,
}

fn compute_pair_table(t0: usize, t1: usize) -> PairTable {
    let xt0 = XsType::from_index(t0);
    let xt1 = XsType::from_index(t1);
    let vdw_sum = xt0.vdw_radius() + xt1.vdw_radius();
    let both_hydrophobic = xt0.is_hydrophobic() && xt1.is_hydrophobic();
    let hbond_pair = is_hbond_pair(xt0, xt1);

    let size = table_size();
    let mut energy = Vec::with_capacity(size);
    let mut denergy_dr2 = Vec::with_capacity(size);
    for i in 0..size {
        let r2 = (i as f64 + 0.5) * SCORING_DELTA;
        let r = r2.sqrt();
        let d = r - vdw_sum;
        let e = potential(d, both_hydrophobic, hbond_pair);
        // chain rule: d(e)/d(r^2) = d(e)/d(d) * d(r)/d(r^2), d(r)/d(r^2) = 1/(2r)
        let de_dr2 = if r > 1e-12 {
            potential_ddist(d, both_hydrophobic, hbond_pair) / (2.0 * r)
        } else {
            0.0
        };
        energy.push(e);
        denergy_dr2.push(de_dr2);
    }
    PairTable {
        energy,
        denergy_dr2,
    }
}

/// The scoring function: `XS_N` atom types, `XS_N*(XS_N+1)/2` pair tables.
pub struct ScoringFunction {
    n: usize,
    tables: Vec<PairTable>,
}

impl ScoringFunction {
    pub fn new() -> Self {
        let n = XS_N;
        let np = num_pairs(n);
        ScoringFunction {
            n,
            tables: (0..np)
                .map(|_| PairTable {
                    energy: Vec::new(),
                    denergy_dr2: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn num_types(&self) -> usize {
        self.n
    }

    /// Populates the pair table for `(t0, t1)` by sampling the potential on a
    /// uniform grid in squared distance.
    pub fn precalculate(&mut self, t0: usize, t1: usize) {
        let table = compute_pair_table(t0, t1);
        self.tables[pair_index(t0, t1)] = table;
    }

    /// Precalculates every pair table in parallel, fanned out to `pool` behind
    /// a counted barrier.
    pub fn precalculate_all(pool: &WorkPool) -> Self {
        use std::sync::{Arc, Mutex};

        let n = XS_N;
        let np = num_pairs(n);
        let sf = Arc::new(Mutex::new(ScoringFunction::new()));
        let counter = pool.counter();
        counter.init(np);
        for t1 in 0..n {
            for t0 in 0..=t1 {
                let sf = Arc::clone(&sf);
                let counter = counter.clone();
                pool.post(move || {
                    // Heavy sampling happens without holding the lock; only
                    // the final install is serialized.
                    let table = compute_pair_table(t0, t1);
                    sf.lock().unwrap().tables[pair_index(t0, t1)] = table;
                    // Drop this task's `Arc` clone before signalling the barrier: the
                    // clone's refcount decrement must happen-before `increment()`'s
                    // release so `try_unwrap` below never observes a stale strong count.
                    drop(sf);
                    counter.increment();
                });
            }
        }
        counter.wait();
        Arc::try_unwrap(sf)
            .ok()
            .expect("scoring function still shared after barrier")
            .into_inner()
            .unwrap()
    }

    /// Returns `(energy, d(energy)/d(r^2))` for the pair `(t0, t1)` at squared
    /// distance `r2`. Returns `(0, 0)` at or beyond the cutoff.
    #[inline]
    pub fn evaluate(&self, t0: usize, t1: usize, r2: f64) -> (f64, f64) {
        let table = &self.tables[pair_index(t0, t1)];
        let i = (r2 / SCORING_DELTA) as usize;
        if i >= table.energy.len() {
            return (0.0, 0.0);
        }
        (table.energy[i], table.denergy_dr2[i])
    }
}

impl Default for ScoringFunction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sf() -> ScoringFunction {
        let mut sf = ScoringFunction::new();
        for t1 in 0..sf.num_types() {
            for t0 in 0..=t1 {
                sf.precalculate(t0, t1);
            }
        }
        sf
    }

    #[test]
    fn symmetric() {
        let sf = make_sf();
        for t0 in 0..sf.num_types() {
            for t1 in 0..sf.num_types() {
                let r2 = 12.3;
                assert_eq!(sf.evaluate(t0, t1, r2), sf.evaluate(t1, t0, r2));
            }
        }
    }

    #[test]
    fn zero_beyond_cutoff() {
        let sf = make_sf();
        let (e, de) = sf.evaluate(0, 0, SCORING_CUTOFF2 + 1.0);
        assert_eq!(e, 0.0);
        assert_eq!(de, 0.0);
    }

    #[test]
    fn zero_at_cutoff_boundary() {
        let sf = make_sf();
        let (e, _) = sf.evaluate(3, 7, SCORING_CUTOFF2);
        assert_eq!(e, 0.0);
    }

    #[test]
    fn pair_index_is_symmetric_and_dense() {
        let n = XS_N;
        let mut seen = vec![false; num_pairs(n)];
        for t1 in 0..n {
            for t0 in 0..=t1 {
                let idx = pair_index(t0, t1);
                assert_eq!(idx, pair_index(t1, t0));
                assert!(idx < num_pairs(n));
                assert!(!seen[idx], "index {} reused", idx);
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn hbond_pair_more_favorable_near_contact() {
        let sf = make_sf();
        let donor = XsType::NDonor.index();
        let acceptor = XsType::OAcceptor.index();
        let nonpolar = XsType::CHydrophobic.index();
        let r2 = (XsType::NDonor.vdw_radius() + XsType::OAcceptor.vdw_radius() - 0.3).powi(2);
        let (e_hb, _) = sf.evaluate(donor, acceptor, r2);
        let (e_plain, _) = sf.evaluate(nonpolar, nonpolar, r2);
        assert!(e_hb < e_plain);
    }
}
