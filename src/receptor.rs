//! The receptor: parsed atoms/residues plus an optional grid-map cache over
//! the search box.
//!
//! Parsing walks the structure chain-by-chain and residue-by-residue,
//! building parallel index vectors into persistent `Residue` records. The
//! box/grid geometry (`corner0`/`corner1`/`num_probes`/`index`/`coord`)
//! follows the dense-lattice sampling scheme directly.

use std::path::Path;

use log::{info, warn};

use crate::atom::{is_standard_amino_acid, Atom, Residue};
use crate::atom_type::{
    is_donor_hydrogen_code, is_hydrogen_code, promote_to_donor, xs_type_from_code, XsType,
};
use crate::constants::XS_N;
use crate::error::DockError;
use crate::pdbqt::{is_atom_line, is_ter_line, parse_atom_record};
use crate::pool::WorkPool;
use crate::scoring::ScoringFunction;

/// A receptor parsed from a PDBQT file, optionally with grid maps populated
/// over a search box.
pub struct Receptor {
    pub precise_mode: bool,
    pub corner0: [f64; 3],
    pub corner1: [f64; 3],
    pub granularity: f64,
    pub granularity_inverse: f64,
    pub num_probes: [usize; 3],
    pub num_probes_product: usize,
    pub atoms: Vec<Atom>,
    pub residues: Vec<Residue>,
    /// `maps[xs]` is empty until that type is populated, otherwise exactly
    /// `num_probes_product` doubles.
    pub maps: Vec<Vec<f64>>,
    /// Per-atom-type sparse voxel-offset lists built by `precalculate`.
    p_offset: Vec<Vec<Vec<usize>>>,
    center: [f64; 3],
    size: [f64; 3],
}

impl Receptor {
    /// Parses a receptor PDBQT file in precise mode (no grid maps).
    pub fn parse_precise(path: &Path, remove_nonstd: bool) -> Result<Self, DockError> {
        let (atoms, residues) = parse_pdbqt_atoms(path, remove_nonstd)?;
        info!(
            "parsed receptor {:?}: {} atoms, {} residues",
            path,
            atoms.len(),
            residues.len()
        );
        Ok(Receptor {
            precise_mode: true,
            corner0: [0.0; 3],
            corner1: [0.0; 3],
            granularity: 0.0,
            granularity_inverse: 0.0,
            num_probes: [0; 3],
            num_probes_product: 0,
            atoms,
            residues,
            maps: Vec::new(),
            p_offset: vec![Vec::new(); XS_N],
            center: [0.0; 3],
            size: [0.0; 3],
        })
    }

    /// Parses a receptor PDBQT file and establishes box geometry for grid-map
    /// construction.
    pub fn parse_with_box(
        path: &Path,
        center: [f64; 3],
        size: [f64; 3],
        granularity: f64,
        remove_nonstd: bool,
    ) -> Result<Self, DockError> {
        let (atoms, residues) = parse_pdbqt_atoms(path, remove_nonstd)?;
        info!(
            "parsed receptor {:?}: {} atoms, {} residues",
            path,
            atoms.len(),
            residues.len()
        );

        let mut corner0 = [0.0; 3];
        let mut corner1 = [0.0; 3];
        let mut num_probes = [0usize; 3];
        for d in 0..3 {
            corner0[d] = center[d] - size[d] / 2.0;
            corner1[d] = corner0[d] + size[d];
            num_probes[d] = (size[d] / granularity).ceil() as usize + 1;
        }
        let num_probes_product = num_probes[0] * num_probes[1] * num_probes[2];

        Ok(Receptor {
            precise_mode: false,
            corner0,
            corner1,
            granularity,
            granularity_inverse: 1.0 / granularity,
            num_probes,
            num_probes_product,
            atoms,
            residues,
            maps: vec![Vec::new(); XS_N],
            p_offset: vec![Vec::new(); XS_N],
            center,
            size,
        })
    }

    #[inline]
    pub fn within(&self, c: [f64; 3]) -> bool {
        (0..3).all(|d| self.corner0[d] <= c[d] && c[d] < self.corner1[d])
    }

    /// Index of the half-open-half-closed grid voxel containing `c`.
    #[inline]
    pub fn index3(&self, c: [f64; 3]) -> [usize; 3] {
        let mut idx = [0usize; 3];
        for d in 0..3 {
            idx[d] = ((c[d] - self.corner0[d]) * self.granularity_inverse) as usize;
        }
        idx
    }

    /// Flattens a 3D voxel index to 1D, x fastest-varying.
    #[inline]
    pub fn flatten(&self, idx: [usize; 3]) -> usize {
        idx[0] + self.num_probes[0] * (idx[1] + self.num_probes[1] * idx[2])
    }

    /// Un-flattens a 1D voxel index back to 3D.
    #[inline]
    pub fn unflatten(&self, flat: usize) -> [usize; 3] {
        let x = flat % self.num_probes[0];
        let rest = flat / self.num_probes[0];
        let y = rest % self.num_probes[1];
        let z = rest / self.num_probes[1];
        [x, y, z]
    }

    /// Coordinate of a 3D voxel index (its corner0-facing corner).
    #[inline]
    pub fn voxel_coord(&self, idx: [usize; 3]) -> [f64; 3] {
        let mut c = [0.0; 3];
        for d in 0..3 {
            c[d] = self.corner0[d] + idx[d] as f64 / self.granularity_inverse;
        }
        c
    }

    /// Free energy for atom type `xs` at `coord` in precise mode: direct sum
    /// over receptor atoms via `sf`.
    pub fn e_precise(&self, xs: usize, coord: [f64; 3], sf: &ScoringFunction) -> f64 {
        let mut e = 0.0;
        for atom in &self.atoms {
            let r2 = dist2(atom.coord, coord);
            if r2 >= crate::constants::SCORING_CUTOFF2 {
                continue;
            }
            let (term, _) = sf.evaluate(atom.xs.index(), xs, r2);
            e += term;
        }
        e
    }

    /// Free energy for atom type `xs` at voxel index `idx` using grid maps.
    pub fn e_map(&self, xs: usize, idx: [usize; 3]) -> f64 {
        debug_assert!(!self.precise_mode);
        let flat = self.flatten(idx);
        self.maps[xs][flat]
    }

    /// Precalculates, for each requested type, the sparse per-atom voxel
    /// offset lists that `populate` consults to avoid rescanning every
    /// receptor atom per voxel.
    pub fn precalculate(&mut self, xs_set: &[usize]) {
        for &t in xs_set {
            let mut offsets = Vec::with_capacity(self.atoms.len());
            let cutoff = crate::constants::SCORING_CUTOFF + XsType::from_index(t).vdw_radius();
            for atom in &self.atoms {
                let mut voxels = Vec::new();
                let lo = self.index3([
                    atom.coord[0] - cutoff,
                    atom.coord[1] - cutoff,
                    atom.coord[2] - cutoff,
                ]);
                let hi = self.index3([
                    atom.coord[0] + cutoff,
                    atom.coord[1] + cutoff,
                    atom.coord[2] + cutoff,
                ]);
                for z in lo[2]..=hi[2].min(self.num_probes[2].saturating_sub(1)) {
                    for y in lo[1]..=hi[1].min(self.num_probes[1].saturating_sub(1)) {
                        for x in lo[0]..=hi[0].min(self.num_probes[0].saturating_sub(1)) {
                            voxels.push(self.flatten([x, y, z]));
                        }
                    }
                }
                offsets.push(voxels);
            }
            self.p_offset[t] = offsets;
        }
    }

    /// Populates grid maps for `xs_set` at z-slab `z`. For each atom, scatters
    /// its contribution directly into the voxels `precalculate` found it
    /// affects (`p_offset[t][a]`, binary-searched down to this slab's flat
    /// range) instead of rescanning every receptor atom per voxel. Callers
    /// fan this out across `num_probes[2]` slabs via the work pool.
    pub fn populate_slab(&mut self, xs_set: &[usize], z: usize, sf: &ScoringFunction) {
        for &t in xs_set {
            if self.maps[t].is_empty() {
                self.maps[t] = vec![0.0; self.num_probes_product];
            }
        }
        let num_probes = self.num_probes;
        let corner0 = self.corner0;
        let granularity_inverse = self.granularity_inverse;
        let slab_size = num_probes[0] * num_probes[1];
        let slab_lo = z * slab_size;
        let slab_hi = slab_lo + slab_size;

        for &t in xs_set {
            for (a, atom) in self.atoms.iter().enumerate() {
                let offsets = &self.p_offset[t][a];
                let lo = offsets.partition_point(|&f| f < slab_lo);
                let hi = offsets.partition_point(|&f| f < slab_hi);
                for &flat in &offsets[lo..hi] {
                    let local = flat - slab_lo;
                    let x = local % num_probes[0];
                    let y = local / num_probes[0];
                    let coord = [
                        corner0[0] + x as f64 / granularity_inverse,
                        corner0[1] + y as f64 / granularity_inverse,
                        corner0[2] + z as f64 / granularity_inverse,
                    ];
                    let r2 = dist2(atom.coord, coord);
                    let (term, _) = sf.evaluate(atom.xs.index(), t, r2);
                    self.maps[t][flat] += term;
                }
            }
        }
    }

    /// Populates grid maps for `xs_set` across all z-slabs, fanned out to
    /// `pool` behind a counted barrier.
    ///
    /// Each slab task owns its inputs (`Arc`-shared atoms/offsets/`sf`) and
    /// returns its contributions rather than writing `self.maps` directly --
    /// `WorkPool::post` requires `'static` closures, so instead of unsafely
    /// aliasing `&mut self` across threads, slabs compute independently and
    /// a single-threaded merge pass (after the barrier) installs the
    /// results, the same "each task writes its own memory, merge is serial"
    /// discipline used for Monte Carlo results.
    pub fn populate_all(
        &mut self,
        xs_set: &[usize],
        sf: std::sync::Arc<ScoringFunction>,
        pool: &WorkPool,
    ) {
        use std::sync::{Arc, Mutex};

        self.precalculate(xs_set);
        for &t in xs_set {
            if self.maps[t].is_empty() {
                self.maps[t] = vec![0.0; self.num_probes_product];
            }
        }

        let atoms = Arc::new(self.atoms.clone());
        let p_offset = Arc::new(self.p_offset.clone());
        let xs_set = Arc::new(xs_set.to_vec());
        let num_probes = self.num_probes;
        let corner0 = self.corner0;
        let granularity_inverse = self.granularity_inverse;

        let num_z = num_probes[2];
        let results: Arc<Mutex<Vec<Option<Vec<(usize, usize, f64)>>>>> =
            Arc::new(Mutex::new((0..num_z).map(|_| None).collect()));
        let counter = pool.counter();
        counter.init(num_z);
        for z in 0..num_z {
            let atoms = Arc::clone(&atoms);
            let p_offset = Arc::clone(&p_offset);
            let xs_set = Arc::clone(&xs_set);
            let sf = Arc::clone(&sf);
            let results = Arc::clone(&results);
            let counter = counter.clone();
            pool.post(move || {
                use std::collections::HashMap;

                let slab_size = num_probes[0] * num_probes[1];
                let slab_lo = z * slab_size;
                let slab_hi = slab_lo + slab_size;
                let mut acc: HashMap<(usize, usize), f64> = HashMap::new();

                for &t in xs_set.iter() {
                    for (a, atom) in atoms.iter().enumerate() {
                        let offsets = &p_offset[t][a];
                        let lo = offsets.partition_point(|&f| f < slab_lo);
                        let hi = offsets.partition_point(|&f| f < slab_hi);
                        for &flat in &offsets[lo..hi] {
                            let local = flat - slab_lo;
                            let x = local % num_probes[0];
                            let y = local / num_probes[0];
                            let coord = [
                                corner0[0] + x as f64 / granularity_inverse,
                                corner0[1] + y as f64 / granularity_inverse,
                                corner0[2] + z as f64 / granularity_inverse,
                            ];
                            let r2 = dist2(atom.coord, coord);
                            let (term, _) = sf.evaluate(atom.xs.index(), t, r2);
                            *acc.entry((t, flat)).or_insert(0.0) += term;
                        }
                    }
                }

                let contributions: Vec<(usize, usize, f64)> =
                    acc.into_iter().map(|((t, flat), e)| (t, flat, e)).collect();
                results.lock().unwrap()[z] = Some(contributions);
                // Drop this task's `results` clone before the barrier signal, so its
                // refcount decrement happens-before `try_unwrap` below checks it.
                drop(results);
                counter.increment();
            });
        }
        counter.wait();
        let results = Arc::try_unwrap(results)
            .ok()
            .expect("results still shared after barrier")
            .into_inner()
            .unwrap();
        for slab in results.into_iter().flatten() {
            for (t, flat, e) in slab {
                self.maps[t][flat] += e;
            }
        }
    }

    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    pub fn size(&self) -> [f64; 3] {
        self.size
    }
}

#[inline]
fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

fn parse_pdbqt_atoms(path: &Path, remove_nonstd: bool) -> Result<(Vec<Atom>, Vec<Residue>), DockError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DockError::Filesystem {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut atoms: Vec<Atom> = Vec::new();
    let mut residues: Vec<Residue> = Vec::new();

    let mut cur_chain: Option<char> = None;
    let mut cur_seq: Option<i32> = None;
    let mut cur_name = String::new();
    let mut cur_start: usize = 0;

    for (i, line) in contents.lines().enumerate() {
        let line_no = i + 1;
        if is_ter_line(line) {
            close_residue(&mut residues, atoms.len(), cur_chain, cur_seq, &cur_name, cur_start);
            cur_chain = None;
            cur_seq = None;
            continue;
        }
        if !is_atom_line(line) {
            continue;
        }

        let rec = parse_atom_record(line, line_no, path)?;

        if is_hydrogen_code(&rec.type_code) {
            // Merge into the nearest preceding heavy atom in this residue.
            if let Some(last) = atoms.last_mut() {
                if is_donor_hydrogen_code(&rec.type_code) {
                    last.is_donor = true;
                    last.xs = promote_to_donor(last.xs);
                }
            } else {
                warn!("{}:{}: hydrogen with no preceding heavy atom", path.display(), line_no);
            }
            continue;
        }

        let xs = xs_type_from_code(&rec.type_code).ok_or_else(|| DockError::Parse {
            path: path.to_path_buf(),
            line: line_no,
            reason: format!("unrecognized atom type code '{}'", rec.type_code),
        })?;

        if cur_chain != Some(rec.chain) || cur_seq != Some(rec.res_seq) {
            close_residue(&mut residues, atoms.len(), cur_chain, cur_seq, &cur_name, cur_start);
            cur_chain = Some(rec.chain);
            cur_seq = Some(rec.res_seq);
            cur_name = rec.res_name.clone();
            cur_start = atoms.len();
        }

        atoms.push(Atom {
            serial: rec.serial,
            xs,
            coord: rec.coord,
            charge: rec.charge,
            residue: Some(residues.len()),
            is_donor: xs.is_donor(),
            is_acceptor: xs.is_acceptor(),
        });
    }
    close_residue(&mut residues, atoms.len(), cur_chain, cur_seq, &cur_name, cur_start);

    if remove_nonstd {
        // Residue retention: keep only atoms whose residue is standard. We
        // rebuild both vectors to keep atom indices contiguous.
        let keep: Vec<bool> = residues.iter().map(|r| r.is_standard).collect();
        let mut new_atoms = Vec::with_capacity(atoms.len());
        let mut new_residues = Vec::with_capacity(residues.len());
        for (ri, residue) in residues.into_iter().enumerate() {
            if !keep[ri] {
                continue;
            }
            let new_start = new_atoms.len();
            for a in &atoms[residue.start..residue.end] {
                let mut a = a.clone();
                a.residue = Some(new_residues.len());
                new_atoms.push(a);
            }
            let new_end = new_atoms.len();
            new_residues.push(Residue {
                start: new_start,
                end: new_end,
                ..residue
            });
        }
        return Ok((new_atoms, new_residues));
    }

    Ok((atoms, residues))
}

fn close_residue(
    residues: &mut Vec<Residue>,
    end: usize,
    chain: Option<char>,
    seq: Option<i32>,
    name: &str,
    start: usize,
) {
    if chain.is_none() && seq.is_none() {
        return;
    }
    if end == start {
        return;
    }
    residues.push(Residue {
        chain: chain.unwrap_or(' '),
        name: name.to_string(),
        seq: seq.unwrap_or(0),
        start,
        end,
        is_standard: is_standard_amino_acid(name),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_receptor() -> Receptor {
        Receptor::parse_with_box(
            Path::new("/dev/null"),
            [0.0, 0.0, 0.0],
            [4.0, 4.0, 4.0],
            1.0,
            false,
        )
        .unwrap()
    }

    #[test]
    fn box_geometry_matches_grid_formula() {
        let r = sample_receptor();
        for d in 0..3 {
            assert!((r.corner0[d] - (-2.0)).abs() < 1e-9);
            assert!((r.corner1[d] - 2.0).abs() < 1e-9);
        }
        assert_eq!(r.num_probes, [5, 5, 5]);
        assert_eq!(r.num_probes_product, 125);
    }

    #[test]
    fn within_is_half_open() {
        let r = sample_receptor();
        assert!(r.within([-2.0, -2.0, -2.0]));
        assert!(!r.within([2.0, 0.0, 0.0]));
        assert!(r.within([1.999, 0.0, 0.0]));
    }

    #[test]
    fn index_and_coord_round_trip() {
        let r = sample_receptor();
        for flat in 0..r.num_probes_product {
            let idx = r.unflatten(flat);
            assert_eq!(r.flatten(idx), flat);
        }
    }

    #[test]
    fn voxel_coord_bounds_contain_sample_point() {
        let r = sample_receptor();
        let c = [0.3, -1.1, 1.9];
        assert!(r.within(c));
        let idx = r.index3(c);
        let vc = r.voxel_coord(idx);
        for d in 0..3 {
            assert!(vc[d] <= c[d] + 1e-9);
            assert!(c[d] < vc[d] + r.granularity + 1e-9);
        }
    }

    fn toy_receptor_with_atoms() -> Receptor {
        let pdbqt = "ATOM      1  C   ALA A   1       0.500   0.300  -0.200  1.00  0.00     0.000 C\n\
ATOM      2  OA  ALA A   1      -0.700   0.100   0.400  1.00  0.00     0.000 OA\n";
        let path = std::env::temp_dir().join("receptor_test_toy.pdbqt");
        std::fs::write(&path, pdbqt).unwrap();
        Receptor::parse_with_box(&path, [0.0, 0.0, 0.0], [4.0, 4.0, 4.0], 0.5, false).unwrap()
    }

    #[test]
    fn populate_all_matches_precise_mode_at_voxel_centers() {
        use crate::scoring::ScoringFunction;

        let mut r = toy_receptor_with_atoms();
        let pool = crate::pool::WorkPool::new(2);
        let sf = std::sync::Arc::new(ScoringFunction::precalculate_all(&pool));
        let xs_set: Vec<usize> = (0..XS_N).collect();
        r.populate_all(&xs_set, std::sync::Arc::clone(&sf), &pool);

        for flat in (0..r.num_probes_product).step_by(7) {
            let idx = r.unflatten(flat);
            let coord = r.voxel_coord(idx);
            for &t in &xs_set {
                let mapped = r.e_map(t, idx);
                let precise = r.e_precise(t, coord, &sf);
                assert!((mapped - precise).abs() < 1e-6, "xs {} flat {}", t, flat);
            }
        }
    }

    #[test]
    fn populate_slab_agrees_with_populate_all() {
        use crate::scoring::ScoringFunction;

        let pool = crate::pool::WorkPool::new(2);
        let sf = ScoringFunction::precalculate_all(&pool);
        let xs_set: Vec<usize> = (0..XS_N).collect();

        let mut by_slab = toy_receptor_with_atoms();
        by_slab.precalculate(&xs_set);
        for z in 0..by_slab.num_probes[2] {
            by_slab.populate_slab(&xs_set, z, &sf);
        }

        let mut by_pool = toy_receptor_with_atoms();
        by_pool.populate_all(&xs_set, std::sync::Arc::new(sf), &pool);

        for &t in &xs_set {
            assert_eq!(by_slab.maps[t], by_pool.maps[t]);
        }
    }
}
