//! Completed poses and cluster/merge logic.
//!
//! `Result::push`'s sorted-insert-and-evict shape builds the candidate
//! first, decides what to do with it, then mutates the list in one place
//! rather than threading mutation through the comparison loop.

/// A completed docked pose.
#[derive(Debug, Clone)]
pub struct DockResult {
    /// Total energy (intra + inter).
    pub e: f64,
    /// Inter-molecular energy alone.
    pub f: f64,
    /// Normalized free energy, filled in during post-processing.
    pub e_nd: f64,
    /// Global heavy-atom coordinates for this pose.
    pub coords: Vec<[f64; 3]>,
    /// Per-residue energy contribution, indexed like `Receptor::residues`.
    pub e_residues: Vec<f64>,
    /// RF-Score prediction, if requested.
    pub rf: Option<f64>,
    pub from_docking: bool,
}

impl DockResult {
    pub fn new(e: f64, f: f64, coords: Vec<[f64; 3]>, num_residues: usize) -> Self {
        DockResult {
            e,
            f,
            e_nd: 0.0,
            coords,
            e_residues: vec![0.0; num_residues],
            rf: None,
            from_docking: true,
        }
    }

    /// `intra_e = e - f`, the intramolecular baseline used by `e_nd`.
    pub fn intra_e(&self) -> f64 {
        self.e - self.f
    }
}

/// Squared total heavy-atom distance between two poses (not divided by atom
/// count -- callers compare against `required_square_error = 4 * n`, the
/// threshold equivalent to 2 A RMSD summed over atoms).
pub fn squared_distance(a: &[[f64; 3]], b: &[[f64; 3]]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(p, q)| {
            let dx = p[0] - q[0];
            let dy = p[1] - q[1];
            let dz = p[2] - q[2];
            dx * dx + dy * dy + dz * dz
        })
        .sum()
}

/// Heavy-atom RMSD between two poses of the same ligand.
pub fn rmsd(a: &[[f64; 3]], b: &[[f64; 3]]) -> f64 {
    (squared_distance(a, b) / a.len() as f64).sqrt()
}

/// Inserts `r` into `list` (kept sorted ascending by `e`), clustering by
/// squared heavy-atom distance `rsq`, and caps the list at `max_len`.
///
/// - If an existing result with `e <= r.e` is within `rsq` of `r`, `r` is
///   discarded (its cluster already has a representative at least as good).
/// - Otherwise `r` is inserted at its sorted position and every subsequent
///   result within `rsq` of it is evicted (the new one dominates that
///   cluster, since everything after it in the sorted list has `e >= r.e`).
pub fn push(list: &mut Vec<DockResult>, r: DockResult, rsq: f64, max_len: usize) {
    let pos = list.partition_point(|existing| existing.e <= r.e);

    for existing in &list[..pos] {
        if squared_distance(&existing.coords, &r.coords) <= rsq {
            return;
        }
    }

    // Evict subsequent (equal-or-worse energy) cluster members before
    // inserting, so indices below `pos` are unaffected.
    let mut i = pos;
    while i < list.len() {
        if squared_distance(&list[i].coords, &r.coords) <= rsq {
            list.remove(i);
        } else {
            i += 1;
        }
    }

    let pos = list.partition_point(|existing| existing.e <= r.e);
    list.insert(pos, r);
    list.truncate(max_len);
}

/// Merges `src` into `dst` using the same clustering rule as `push`,
/// preserving `dst`'s sort order. Used for the single-threaded per-ligand
/// merge after all Monte Carlo tasks complete.
pub fn merge(dst: &mut Vec<DockResult>, src: Vec<DockResult>, rsq: f64, max_len: usize) {
    for r in src {
        push(dst, r, rsq, max_len);
    }
}

/// Computes the residue-contact mask and per-residue energies, writing
/// `result.e_residues[k]` via `contribution(atom_index, atom_coord)` for
/// every ligand heavy atom's contribution to residue `k`, and flips
/// `mask[k] = true` wherever any non-zero contribution was observed.
///
/// `atom_index` is the heavy atom's position in `result.coords` (same order
/// as `Ligand::atoms`), letting the caller look up that atom's XS type.
pub fn accumulate_residue_energies<F>(
    result: &mut DockResult,
    mask: &mut [bool],
    mut residue_contribution: F,
) where
    F: FnMut(usize, [f64; 3]) -> Vec<(usize, f64)>,
{
    for (atom_index, &coord) in result.coords.iter().enumerate() {
        for (k, e) in residue_contribution(atom_index, coord) {
            result.e_residues[k] += e;
            if e != 0.0 {
                mask[k] = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_at(e: f64, coords: Vec<[f64; 3]>) -> DockResult {
        DockResult::new(e, e, coords, 0)
    }

    #[test]
    fn push_idempotence() {
        let mut list = Vec::new();
        let r1 = result_at(-5.0, vec![[0.0, 0.0, 0.0]]);
        push(&mut list, r1.clone(), 4.0, 20);
        let once = list.len();
        let r2 = result_at(-5.0, vec![[0.0, 0.0, 0.0]]);
        push(&mut list, r2, 4.0, 20);
        assert_eq!(list.len(), once);
    }

    #[test]
    fn better_cluster_member_discards_worse_one() {
        let mut list = Vec::new();
        push(&mut list, result_at(-10.0, vec![[0.0, 0.0, 0.0]]), 4.0, 20);
        push(&mut list, result_at(-5.0, vec![[0.1, 0.0, 0.0]]), 4.0, 20);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].e, -10.0);
    }

    #[test]
    fn new_better_result_evicts_worse_cluster_member() {
        let mut list = Vec::new();
        push(&mut list, result_at(-5.0, vec![[0.1, 0.0, 0.0]]), 4.0, 20);
        push(&mut list, result_at(-10.0, vec![[0.0, 0.0, 0.0]]), 4.0, 20);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].e, -10.0);
    }

    #[test]
    fn distinct_clusters_both_survive() {
        let mut list = Vec::new();
        push(&mut list, result_at(-10.0, vec![[0.0, 0.0, 0.0]]), 4.0, 20);
        push(&mut list, result_at(-9.0, vec![[100.0, 0.0, 0.0]]), 4.0, 20);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn list_stays_sorted_ascending() {
        let mut list = Vec::new();
        push(&mut list, result_at(-3.0, vec![[0.0, 0.0, 0.0]]), 4.0, 20);
        push(&mut list, result_at(-10.0, vec![[50.0, 0.0, 0.0]]), 4.0, 20);
        push(&mut list, result_at(-1.0, vec![[100.0, 0.0, 0.0]]), 4.0, 20);
        let energies: Vec<f64> = list.iter().map(|r| r.e).collect();
        let mut sorted = energies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(energies, sorted);
    }

    #[test]
    fn cap_enforced() {
        let mut list = Vec::new();
        for i in 0..30 {
            push(
                &mut list,
                result_at(-(i as f64), vec![[i as f64 * 100.0, 0.0, 0.0]]),
                4.0,
                20,
            );
        }
        assert_eq!(list.len(), 20);
    }
}
