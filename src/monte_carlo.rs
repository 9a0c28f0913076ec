//! The Monte Carlo conformational searcher: one independent Metropolis-guided
//! random walk per task, each anchored by a BFGS local optimization.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::constants::*;
use crate::ligand::{Conformation, Ligand};
use crate::qt::Quaternion;
use crate::receptor::Receptor;
use crate::result::{self, DockResult};
use crate::scoring::ScoringFunction;

/// Draws a uniformly random pose inside the receptor's search box.
fn random_conformation(rng: &mut StdRng, ligand: &Ligand, r: &Receptor) -> Conformation {
    let corner0 = r.corner0;
    let corner1 = r.corner1;
    let position = [
        rng.gen_range(corner0[0]..corner1[0]),
        rng.gen_range(corner0[1]..corner1[1]),
        rng.gen_range(corner0[2]..corner1[2]),
    ];
    let orientation = Quaternion::random(rng);
    let torsions = (0..ligand.num_torsions)
        .map(|_| rng.gen_range(-PI..=PI))
        .collect();
    Conformation { position, orientation, torsions }
}

/// Perturbs `c` by an independent Gaussian step per component:
/// translation sigma `MC_TRANSLATION_SIGMA`, rotation sigma
/// `MC_ROTATION_SIGMA` (applied as a random-axis rotation vector through the
/// quaternion exponential map), torsion sigma `MC_TORSION_SIGMA`.
fn perturb(rng: &mut StdRng, c: &Conformation) -> Conformation {
    let gaussian = |rng: &mut StdRng, sigma: f64| -> f64 {
        let u1: f64 = rng.gen_range(1e-12..1.0);
        let u2: f64 = rng.gen();
        sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    };

    let position = [
        c.position[0] + gaussian(rng, MC_TRANSLATION_SIGMA),
        c.position[1] + gaussian(rng, MC_TRANSLATION_SIGMA),
        c.position[2] + gaussian(rng, MC_TRANSLATION_SIGMA),
    ];
    let w = [
        gaussian(rng, MC_ROTATION_SIGMA),
        gaussian(rng, MC_ROTATION_SIGMA),
        gaussian(rng, MC_ROTATION_SIGMA),
    ];
    let orientation = c.orientation.exp_update(w);
    let torsions = c
        .torsions
        .iter()
        .map(|&t| wrap(t + gaussian(rng, MC_TORSION_SIGMA)))
        .collect();
    Conformation { position, orientation, torsions }
}

fn wrap(theta: f64) -> f64 {
    let mut t = theta;
    while t > PI {
        t -= 2.0 * PI;
    }
    while t <= -PI {
        t += 2.0 * PI;
    }
    t
}

/// Runs one independent Markov chain against `ligand`/`receptor`, seeded
/// from `seed`, pushing accepted local optima into `out_results`.
pub fn monte_carlo(
    out_results: &mut Vec<DockResult>,
    seed: u64,
    sf: &ScoringFunction,
    ligand: &Ligand,
    receptor: &Receptor,
) {
    let mut rng: StdRng = SeedableRng::seed_from_u64(seed);
    let num_residues = receptor.residues.len();
    let rsq = 4.0 * ligand.num_heavy_atoms() as f64;

    let c0 = random_conformation(&mut rng, ligand, receptor);
    let (mut e, mut c) = ligand.bfgs(&c0, sf, receptor);
    if e.is_finite() {
        let (_, f, _) = ligand.evaluate(&c, sf, receptor);
        let coords = ligand.apply(&c);
        result::push(
            out_results,
            DockResult::new(e, f, coords, num_residues),
            rsq,
            MAX_RESULTS_PER_TASK,
        );
    }

    for _ in 0..MC_STEPS {
        let candidate = perturb(&mut rng, &c);
        let (e_new, c_new) = ligand.bfgs(&candidate, sf, receptor);

        let accept = if e_new.is_finite() {
            if e_new <= e {
                true
            } else {
                let p = ((e - e_new) / MC_TEMPERATURE).exp();
                rng.gen::<f64>() < p
            }
        } else {
            false
        };

        if accept {
            e = e_new;
            c = c_new;
            let (_, f, _) = ligand.evaluate(&c, sf, receptor);
            let coords = ligand.apply(&c);
            result::push(
                out_results,
                DockResult::new(e, f, coords, num_residues),
                rsq,
                MAX_RESULTS_PER_TASK,
            );
        }
    }
}

/// Mixes the root `seed` with a task index into a per-task 64-bit seed
/// (collision-safe splitmix-style mixing), so the set of per-task RNG
/// streams is fixed regardless of which worker thread runs which task.
pub fn derive_task_seed(seed: u64, task_index: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15u64.wrapping_mul(task_index.wrapping_add(1)));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
