//! Ligand model: parsed atoms, rotatable-bond frame tree, conformation
//! application, and the energy/gradient evaluator with BFGS local
//! optimization.
//!
//! Conformation application translates the root and composes child-frame
//! rotations down the tree. Orientation is represented throughout as a
//! `Quaternion`, and BFGS updates it via the exponential-map step.

use std::path::Path;

use crate::atom::Atom;
use crate::atom_type::{is_donor_hydrogen_code, is_hydrogen_code, promote_to_donor, xs_type_from_code};
use crate::constants::*;
use crate::error::DockError;
use crate::pdbqt::{
    is_atom_line, is_endbranch_line, is_endroot_line, is_root_line, parse_atom_record,
    parse_branch_header, parse_torsdof,
};
use crate::qt::Quaternion;
use crate::receptor::Receptor;
use crate::scoring::ScoringFunction;

/// One node of the rotatable-bond tree.
#[derive(Debug, Clone)]
pub struct Frame {
    pub parent: Option<usize>,
    /// Global atom index of the axis atom belonging to the parent frame.
    pub parent_rotor: usize,
    /// Global atom index of the axis atom belonging to this frame (its first
    /// owned atom).
    pub child_rotor: usize,
    pub atom_start: usize,
    pub atom_end: usize,
    pub active: bool,
    /// Unit vector from `parent_rotor` to `child_rotor` in input coordinates.
    pub axis: [f64; 3],
    /// Owned atoms' positions relative to `parent_rotor`, in input
    /// coordinates (root frame: relative to its own first atom).
    pub local_positions: Vec<[f64; 3]>,
    pub depth: usize,
}

/// A parsed, immutable ligand.
pub struct Ligand {
    pub atoms: Vec<Atom>,
    pub frames: Vec<Frame>,
    pub num_torsions: usize,
    pub flexibility_penalty_factor: f64,
    pub xs_present: [bool; XS_N],
    /// `frame_of[atom]` = owning frame index.
    frame_of: Vec<usize>,
    /// `subtree_atoms[f]` = every atom owned by frame `f` or a descendant.
    subtree_atoms: Vec<Vec<usize>>,
    /// `excluded[i*n+j]` true if atoms `i`,`j` are excluded from intra-ligand
    /// scoring (approximated via frame-tree distance, see `build_exclusion`).
    excluded: Vec<bool>,
}

/// Position + orientation + torsion vector defining a ligand pose.
#[derive(Debug, Clone)]
pub struct Conformation {
    pub position: [f64; 3],
    pub orientation: Quaternion,
    pub torsions: Vec<f64>,
}

/// Tangent vector of a `Conformation`: 3 translational + 3 rotational + one
/// scalar per torsion.
#[derive(Debug, Clone)]
pub struct Change {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub torsions: Vec<f64>,
}

impl Change {
    fn zeros(num_torsions: usize) -> Self {
        Change {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            torsions: vec![0.0; num_torsions],
        }
    }

    fn dim(&self) -> usize {
        6 + self.torsions.len()
    }

    fn as_vec(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(self.dim());
        v.extend_from_slice(&self.translation);
        v.extend_from_slice(&self.rotation);
        v.extend_from_slice(&self.torsions);
        v
    }

    fn from_vec(v: &[f64]) -> Self {
        Change {
            translation: [v[0], v[1], v[2]],
            rotation: [v[3], v[4], v[5]],
            torsions: v[6..].to_vec(),
        }
    }

    fn dot(&self, other: &Change) -> f64 {
        self.as_vec()
            .iter()
            .zip(other.as_vec().iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    fn infinity_norm(&self) -> f64 {
        self.as_vec().iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    fn scale(&self, s: f64) -> Change {
        Change::from_vec(&self.as_vec().iter().map(|v| v * s).collect::<Vec<_>>())
    }

    fn sub(&self, other: &Change) -> Change {
        let a = self.as_vec();
        let b = other.as_vec();
        Change::from_vec(&a.iter().zip(b.iter()).map(|(x, y)| x - y).collect::<Vec<_>>())
    }
}

fn rotate(q: Quaternion, v: [f64; 3]) -> [f64; 3] {
    let r = q.rotate(vec![v[0], v[1], v[2]]);
    [r[0], r[1], r[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn sub3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn add3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn norm3(a: [f64; 3]) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

fn normalize3(a: [f64; 3]) -> [f64; 3] {
    let n = norm3(a);
    if n < 1e-12 {
        [1.0, 0.0, 0.0]
    } else {
        [a[0] / n, a[1] / n, a[2] / n]
    }
}

impl Ligand {
    pub fn num_heavy_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Parses a ligand PDBQT file, building the rotatable-bond frame tree.
    pub fn parse(path: &Path) -> Result<Self, DockError> {
        let contents = std::fs::read_to_string(path).map_err(|e| DockError::Filesystem {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut atoms: Vec<Atom> = Vec::new();
        let mut input_coords: Vec<[f64; 3]> = Vec::new();
        // (parent_frame_idx, parent_rotor_serial, child_rotor_serial, atom_start)
        let mut frame_stack: Vec<usize> = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut serial_to_atom: std::collections::HashMap<i32, usize> = std::collections::HashMap::new();
        let mut num_torsions = 0u32;

        frames.push(Frame {
            parent: None,
            parent_rotor: 0,
            child_rotor: 0,
            atom_start: 0,
            atom_end: 0,
            active: false,
            axis: [0.0, 0.0, 1.0],
            local_positions: Vec::new(),
            depth: 0,
        });
        frame_stack.push(0);

        for (i, line) in contents.lines().enumerate() {
            let line_no = i + 1;

            if is_root_line(line) || is_endroot_line(line) {
                continue;
            }

            if let Some((parent_serial, child_serial)) = parse_branch_header(line) {
                let parent_frame = *frame_stack.last().unwrap();
                let new_frame_idx = frames.len();
                frames.push(Frame {
                    parent: Some(parent_frame),
                    parent_rotor: serial_to_atom.get(&parent_serial).copied().unwrap_or(0),
                    child_rotor: serial_to_atom.get(&child_serial).copied().unwrap_or(atoms.len()),
                    atom_start: atoms.len(),
                    atom_end: atoms.len(),
                    active: true,
                    axis: [0.0, 0.0, 1.0],
                    local_positions: Vec::new(),
                    depth: frames[parent_frame].depth + 1,
                });
                frame_stack.push(new_frame_idx);
                continue;
            }

            if is_endbranch_line(line) {
                let closed = frame_stack.pop().unwrap();
                frames[closed].atom_end = atoms.len();
                continue;
            }

            if let Some(t) = parse_torsdof(line) {
                num_torsions = t;
                continue;
            }

            if !is_atom_line(line) {
                continue;
            }

            let rec = parse_atom_record(line, line_no, path)?;

            if is_hydrogen_code(&rec.type_code) {
                if let Some(last) = atoms.last_mut() {
                    if is_donor_hydrogen_code(&rec.type_code) {
                        last.is_donor = true;
                        last.xs = promote_to_donor(last.xs);
                    }
                }
                continue;
            }

            let xs = xs_type_from_code(&rec.type_code).ok_or_else(|| DockError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                reason: format!("unrecognized atom type code '{}'", rec.type_code),
            })?;

            serial_to_atom.insert(rec.serial, atoms.len());
            input_coords.push(rec.coord);
            atoms.push(Atom {
                serial: rec.serial,
                xs,
                coord: rec.coord,
                charge: rec.charge,
                residue: None,
                is_donor: xs.is_donor(),
                is_acceptor: xs.is_acceptor(),
            });
        }
        frames[0].atom_end = frames
            .iter()
            .skip(1)
            .map(|f| f.atom_start)
            .min()
            .unwrap_or(atoms.len());
        // root frame owns every atom not claimed by a branch; with no
        // branches at all it owns everything.
        if frames.len() == 1 {
            frames[0].atom_end = atoms.len();
        }

        // Fill in local positions and axes now that all coordinates are known.
        for fi in 0..frames.len() {
            let origin = if frames[fi].parent.is_some() {
                input_coords[frames[fi].parent_rotor]
            } else {
                input_coords.first().copied().unwrap_or([0.0, 0.0, 0.0])
            };
            let local_positions: Vec<[f64; 3]> = (frames[fi].atom_start..frames[fi].atom_end)
                .map(|a| sub3(input_coords[a], origin))
                .collect();
            let axis = if frames[fi].parent.is_some() {
                normalize3(sub3(input_coords[frames[fi].child_rotor], origin))
            } else {
                [0.0, 0.0, 1.0]
            };
            frames[fi].local_positions = local_positions;
            frames[fi].axis = axis;
        }

        let mut frame_of = vec![0usize; atoms.len()];
        for (fi, frame) in frames.iter().enumerate() {
            for a in frame.atom_start..frame.atom_end {
                frame_of[a] = fi;
            }
        }

        let subtree_atoms = build_subtrees(&frames, &frame_of, atoms.len());
        let excluded = build_exclusion(&frames, &frame_of, atoms.len());

        let mut xs_present = [false; XS_N];
        for atom in &atoms {
            xs_present[atom.xs.index()] = true;
        }

        let flexibility_penalty_factor = 1.0 / (1.0 + FLEXIBILITY_PENALTY_C * num_torsions as f64);

        Ok(Ligand {
            atoms,
            frames,
            num_torsions: num_torsions as usize,
            flexibility_penalty_factor,
            xs_present,
            frame_of,
            subtree_atoms,
            excluded,
        })
    }

    /// Applies `c`, returning global heavy-atom coordinates.
    pub fn apply(&self, c: &Conformation) -> Vec<[f64; 3]> {
        let mut global = vec![[0.0; 3]; self.atoms.len()];
        let mut orientations = vec![Quaternion::default(); self.frames.len()];
        let mut torsion_idx = 0usize;

        for (fi, frame) in self.frames.iter().enumerate() {
            let orientation = match frame.parent {
                None => c.orientation,
                Some(p) => {
                    let parent_orientation = orientations[p];
                    if frame.active {
                        let axis_global = rotate(parent_orientation, frame.axis);
                        let theta = c.torsions.get(torsion_idx).copied().unwrap_or(0.0);
                        torsion_idx += 1;
                        let half = theta * 0.5;
                        let tq = Quaternion::new(
                            half.cos(),
                            axis_global[0] * half.sin(),
                            axis_global[1] * half.sin(),
                            axis_global[2] * half.sin(),
                        );
                        parent_orientation * tq
                    } else {
                        parent_orientation
                    }
                }
            };
            orientations[fi] = orientation;

            let origin = match frame.parent {
                None => c.position,
                Some(_) => global[frame.parent_rotor],
            };
            for (local_i, &local_pos) in frame.local_positions.iter().enumerate() {
                let atom_i = frame.atom_start + local_i;
                global[atom_i] = add3(origin, rotate(orientation, local_pos));
            }
        }
        global
    }

    /// Energy and gradient for pose `c` against receptor `r` (grid-map mode)
    /// or in precise mode when `r.precise_mode`. Returns `(e, f, gradient)`.
    pub fn evaluate(&self, c: &Conformation, sf: &ScoringFunction, r: &Receptor) -> (f64, f64, Change) {
        let coords = self.apply(c);
        let n = self.atoms.len();

        // Out-of-box short circuit (map mode only; precise mode has no box).
        if !r.precise_mode {
            for &coord in &coords {
                if !r.within(coord) {
                    return (OUT_OF_BOX_ENERGY, f64::INFINITY, Change::zeros(self.num_torsions));
                }
            }
        }

        let mut atom_force = vec![[0.0; 3]; n];
        let mut intra = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                if self.excluded[i * n + j] {
                    continue;
                }
                let r2 = dist2(coords[i], coords[j]);
                if r2 >= SCORING_CUTOFF2 {
                    continue;
                }
                let (e, de_dr2) = sf.evaluate(self.atoms[i].xs.index(), self.atoms[j].xs.index(), r2);
                intra += e;
                let d = sub3(coords[i], coords[j]);
                let grad = [2.0 * de_dr2 * d[0], 2.0 * de_dr2 * d[1], 2.0 * de_dr2 * d[2]];
                atom_force[i] = sub3(atom_force[i], grad);
                atom_force[j] = add3(atom_force[j], grad);
            }
        }

        let mut inter = 0.0;
        for (i, atom) in self.atoms.iter().enumerate() {
            let xs = atom.xs.index();
            if r.precise_mode {
                inter += r.e_precise(xs, coords[i], sf);
                let grad = central_difference_precise(r, sf, xs, coords[i]);
                atom_force[i] = sub3(atom_force[i], grad);
            } else {
                let idx = r.index3(coords[i]);
                inter += r.e_map(xs, idx);
                let grad = central_difference_map(r, xs, coords[i]);
                atom_force[i] = sub3(atom_force[i], grad);
            }
        }

        let e = intra + inter;
        let g = self.fold_gradient(c, &coords, &atom_force);
        (e, inter, g)
    }

    /// Folds per-atom Cartesian forces up the frame tree into translation,
    /// rotation and per-torsion components.
    fn fold_gradient(&self, c: &Conformation, coords: &[[f64; 3]], force: &[[f64; 3]]) -> Change {
        let mut translation = [0.0; 3];
        let mut rotation = [0.0; 3];
        for (i, &f) in force.iter().enumerate() {
            translation = add3(translation, f);
            rotation = add3(rotation, cross(sub3(coords[i], c.position), f));
        }

        let mut torsions = vec![0.0; self.num_torsions];
        let mut torsion_idx = 0usize;
        for (fi, frame) in self.frames.iter().enumerate() {
            if frame.parent.is_none() || !frame.active {
                continue;
            }
            let origin = coords[frame.parent_rotor];
            let axis_global = normalize3(sub3(coords[frame.child_rotor], origin));
            let mut proj = 0.0;
            for &a in &self.subtree_atoms[fi] {
                let lever = cross(sub3(coords[a], origin), force[a]);
                proj += dot3(lever, axis_global);
            }
            torsions[torsion_idx] = proj;
            torsion_idx += 1;
        }

        Change {
            translation,
            rotation,
            torsions,
        }
    }

    /// Limited-iteration BFGS local optimization, starting from `c0`.
    pub fn bfgs(&self, c0: &Conformation, sf: &ScoringFunction, r: &Receptor) -> (f64, Conformation) {
        let dim = 6 + self.num_torsions;
        let mut h = identity(dim);
        let mut c = c0.clone();
        let (mut e, _f, mut g) = self.evaluate(&c, sf, r);

        for _ in 0..MAX_BFGS_ITERATIONS {
            if g.infinity_norm() < BFGS_GRADIENT_TOLERANCE {
                break;
            }
            let direction = mat_vec(&h, &g.as_vec().iter().map(|v| -v).collect::<Vec<_>>(), dim);
            let p = Change::from_vec(&direction);

            let mut step = BFGS_INITIAL_STEP;
            let mut accepted = false;
            let mut c_new = c.clone();
            let mut e_new = e;
            let mut g_new = g.clone();

            for _ in 0..BFGS_MAX_LINE_SEARCH_STEPS {
                c_new = apply_change(&c, &p, step);
                let (e_try, _f_try, g_try) = self.evaluate(&c_new, sf, r);
                if e_try.is_finite() && e_try <= e {
                    e_new = e_try;
                    g_new = g_try;
                    accepted = true;
                    break;
                }
                step *= BFGS_LINE_SEARCH_SHRINK;
            }

            if !accepted {
                break;
            }

            let s = p.scale(step);
            let y = g_new.sub(&g);
            bfgs_update(&mut h, &s, &y, dim);

            c = c_new;
            e = e_new;
            g = g_new;
        }

        (e, c)
    }
}

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d = sub3(a, b);
    d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
}

const GRID_GRADIENT_STEP: f64 = 1e-3;

fn central_difference_map(r: &Receptor, xs: usize, coord: [f64; 3]) -> [f64; 3] {
    let mut g = [0.0; 3];
    for d in 0..3 {
        let mut plus = coord;
        let mut minus = coord;
        plus[d] += GRID_GRADIENT_STEP;
        minus[d] -= GRID_GRADIENT_STEP;
        if !r.within(plus) || !r.within(minus) {
            continue;
        }
        let ep = r.e_map(xs, r.index3(plus));
        let em = r.e_map(xs, r.index3(minus));
        g[d] = (ep - em) / (2.0 * GRID_GRADIENT_STEP);
    }
    g
}

fn central_difference_precise(r: &Receptor, sf: &ScoringFunction, xs: usize, coord: [f64; 3]) -> [f64; 3] {
    let mut g = [0.0; 3];
    for d in 0..3 {
        let mut plus = coord;
        let mut minus = coord;
        plus[d] += GRID_GRADIENT_STEP;
        minus[d] -= GRID_GRADIENT_STEP;
        let ep = r.e_precise(xs, plus, sf);
        let em = r.e_precise(xs, minus, sf);
        g[d] = (ep - em) / (2.0 * GRID_GRADIENT_STEP);
    }
    g
}

fn apply_change(c: &Conformation, p: &Change, step: f64) -> Conformation {
    let t = [
        p.translation[0] * step,
        p.translation[1] * step,
        p.translation[2] * step,
    ];
    let w = [
        p.rotation[0] * step,
        p.rotation[1] * step,
        p.rotation[2] * step,
    ];
    let mut torsions = c.torsions.clone();
    for (i, dt) in p.torsions.iter().enumerate() {
        if i < torsions.len() {
            torsions[i] = wrap_angle(torsions[i] + dt * step);
        }
    }
    Conformation {
        position: add3(c.position, t),
        orientation: c.orientation.exp_update(w),
        torsions,
    }
}

fn wrap_angle(theta: f64) -> f64 {
    let mut t = theta;
    while t > std::f64::consts::PI {
        t -= 2.0 * std::f64::consts::PI;
    }
    while t <= -std::f64::consts::PI {
        t += 2.0 * std::f64::consts::PI;
    }
    t
}

fn identity(dim: usize) -> Vec<f64> {
    let mut m = vec![0.0; dim * dim];
    for i in 0..dim {
        m[i * dim + i] = 1.0;
    }
    m
}

fn mat_vec(m: &[f64], v: &[f64], dim: usize) -> Vec<f64> {
    let mut out = vec![0.0; dim];
    for i in 0..dim {
        let mut s = 0.0;
        for j in 0..dim {
            s += m[i * dim + j] * v[j];
        }
        out[i] = s;
    }
    out
}

/// BFGS (DFP-style) inverse-Hessian rank-2 update.
fn bfgs_update(h: &mut [f64], s: &Change, y: &Change, dim: usize) {
    let s = s.as_vec();
    let y = y.as_vec();
    let sy: f64 = s.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    if sy.abs() < 1e-10 {
        return;
    }
    let rho = 1.0 / sy;

    let hy = mat_vec(h, &y, dim);
    let yhy: f64 = y.iter().zip(hy.iter()).map(|(a, b)| a * b).sum();

    for i in 0..dim {
        for j in 0..dim {
            let term = (1.0 + rho * yhy) * rho * s[i] * s[j]
                - rho * (s[i] * hy[j] + hy[i] * s[j]);
            h[i * dim + j] += term;
        }
    }
}

fn build_subtrees(frames: &[Frame], frame_of: &[usize], num_atoms: usize) -> Vec<Vec<usize>> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); frames.len()];
    for (fi, frame) in frames.iter().enumerate() {
        if let Some(p) = frame.parent {
            children[p].push(fi);
        }
    }
    let mut subtrees = vec![Vec::new(); frames.len()];
    fn collect(fi: usize, frames: &[Frame], children: &[Vec<usize>], out: &mut Vec<usize>) {
        out.extend(frames[fi].atom_start..frames[fi].atom_end);
        for &c in &children[fi] {
            collect(c, frames, children, out);
        }
    }
    for fi in 0..frames.len() {
        collect(fi, frames, &children, &mut subtrees[fi]);
    }
    let _ = (frame_of, num_atoms);
    subtrees
}

/// Excludes atom pairs whose owning frames are within one frame-tree hop of
/// each other, approximating the `>= 4` covalent-bond separation rule
/// -- PDBQT ligand files carry the rotatable-bond tree but no full covalent
/// graph, so frame adjacency is the closest available proxy.
fn build_exclusion(frames: &[Frame], frame_of: &[usize], n: usize) -> Vec<bool> {
    let mut excluded = vec![false; n * n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                excluded[i * n + j] = true;
                continue;
            }
            let fi = frame_of[i];
            let fj = frame_of[j];
            if frame_tree_distance(frames, fi, fj) < 2 {
                excluded[i * n + j] = true;
            }
        }
    }
    excluded
}

fn frame_tree_distance(frames: &[Frame], a: usize, b: usize) -> usize {
    if a == b {
        return 0;
    }
    let mut depth_a = frames[a].depth;
    let mut depth_b = frames[b].depth;
    let mut x = a;
    let mut y = b;
    let mut dist = 0;
    while depth_a > depth_b {
        x = frames[x].parent.unwrap();
        depth_a -= 1;
        dist += 1;
    }
    while depth_b > depth_a {
        y = frames[y].parent.unwrap();
        depth_b -= 1;
        dist += 1;
    }
    while x != y {
        x = frames[x].parent.unwrap();
        y = frames[y].parent.unwrap();
        dist += 2;
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom_type::XsType;

    fn single_atom_ligand() -> Ligand {
        let atoms = vec![Atom {
            serial: 1,
            xs: XsType::CHydrophobic,
            coord: [0.0, 0.0, 0.0],
            charge: 0.0,
            residue: None,
            is_donor: false,
            is_acceptor: false,
        }];
        let frames = vec![Frame {
            parent: None,
            parent_rotor: 0,
            child_rotor: 0,
            atom_start: 0,
            atom_end: 1,
            active: false,
            axis: [0.0, 0.0, 1.0],
            local_positions: vec![[0.0, 0.0, 0.0]],
            depth: 0,
        }];
        let frame_of = vec![0];
        let subtree_atoms = vec![vec![0]];
        let excluded = vec![true];
        Ligand {
            atoms,
            frames,
            num_torsions: 0,
            flexibility_penalty_factor: 1.0,
            xs_present: [false; XS_N],
            frame_of,
            subtree_atoms,
            excluded,
        }
    }

    #[test]
    fn apply_translates_root_atom_to_position() {
        let ligand = single_atom_ligand();
        let c = Conformation {
            position: [1.0, 2.0, 3.0],
            orientation: Quaternion::default(),
            torsions: vec![],
        };
        let coords = ligand.apply(&c);
        assert_eq!(coords[0], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn flexibility_penalty_decreases_with_more_torsions() {
        let rigid = 1.0 / (1.0 + FLEXIBILITY_PENALTY_C * 0.0);
        let flexible = 1.0 / (1.0 + FLEXIBILITY_PENALTY_C * 5.0);
        assert!(flexible < rigid);
    }

    #[test]
    fn frame_tree_distance_same_frame_is_zero() {
        let frames = vec![Frame {
            parent: None,
            parent_rotor: 0,
            child_rotor: 0,
            atom_start: 0,
            atom_end: 1,
            active: false,
            axis: [0.0, 0.0, 1.0],
            local_positions: vec![],
            depth: 0,
        }];
        assert_eq!(frame_tree_distance(&frames, 0, 0), 0);
    }

    /// A branch whose only atom is a donor hydrogen (e.g. a rotatable
    /// hydroxyl) ends up owning zero heavy atoms -- `atom_start == atom_end`
    /// -- while a later sibling branch's range starts at that same index.
    /// `fold_gradient` must key each frame's subtree lookup off its own loop
    /// index, not a `frame_of[frame.atom_start]` lookup, since that index may
    /// have been claimed by the sibling.
    fn toy_branch_ligand() -> Ligand {
        let pdbqt = "ROOT\n\
ATOM      1  C   LIG A   1       0.000   0.000   0.000  1.00  0.00     0.000 C\n\
ENDROOT\n\
BRANCH   1   2\n\
ATOM      2  HO  LIG A   1       0.000   0.000   1.000  1.00  0.00     0.000 HD\n\
ENDBRANCH   1   2\n\
BRANCH   1   3\n\
ATOM      3  C2  LIG A   1       1.000   0.000   0.000  1.00  0.00     0.000 C\n\
ATOM      4  C3  LIG A   1       1.000   1.000   0.000  1.00  0.00     0.000 C\n\
ENDBRANCH   1   3\n\
TORSDOF 2\n";
        let path = std::env::temp_dir().join("ligand_toy_branch.pdbqt");
        std::fs::write(&path, pdbqt).unwrap();
        Ligand::parse(&path).unwrap()
    }

    #[test]
    fn fold_gradient_gives_zero_torsion_for_a_frame_with_no_subtree_atoms() {
        let ligand = toy_branch_ligand();
        assert_eq!(ligand.num_torsions, 2);

        let c = Conformation {
            position: [0.0, 0.0, 0.0],
            orientation: Quaternion::default(),
            torsions: vec![0.0, 0.0],
        };
        let coords = ligand.apply(&c);
        // A nonzero, off-axis force on the second atom owned by the
        // *sibling* branch: if `fold_gradient` mistakenly borrowed that
        // branch's subtree for the empty branch's torsion, this lever would
        // leak in as a nonzero projection (the first sibling atom sits
        // exactly on the empty branch's axis, so it alone can't tell the
        // two apart).
        let force = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let g = ligand.fold_gradient(&c, &coords, &force);
        assert_eq!(g.torsions[0], 0.0);
    }

    /// Two real, non-degenerate torsions in a parent-child chain, for
    /// exercising `evaluate`'s gradient and `bfgs`'s descent against a
    /// nontrivial multi-torsion pose.
    fn toy_chain_ligand() -> Ligand {
        // Atom type "N" (NPolar) is neither hydrophobic nor a donor/acceptor,
        // so the pairwise potential is the smooth Gaussian/repulsion sum with
        // no hydrophobic/hbond ramp kink to dodge in the finite-difference
        // comparison below.
        let pdbqt = "ROOT\n\
ATOM      1  N   LIG A   1       0.000   0.000   0.000  1.00  0.00     0.000 N\n\
ENDROOT\n\
BRANCH   1   2\n\
ATOM      2  N   LIG A   1       1.000   0.000   0.000  1.00  0.00     0.000 N\n\
BRANCH   2   3\n\
ATOM      3  N   LIG A   1       1.000   1.000   0.000  1.00  0.00     0.000 N\n\
ENDBRANCH   2   3\n\
ENDBRANCH   1   2\n\
TORSDOF 2\n";
        let path = std::env::temp_dir().join("ligand_toy_chain.pdbqt");
        std::fs::write(&path, pdbqt).unwrap();
        Ligand::parse(&path).unwrap()
    }

    /// Empty receptor in precise mode: `evaluate`'s inter-molecular term is
    /// identically zero, isolating the comparison to the analytic
    /// intra-ligand term and the translation/rotation/torsion folding.
    fn empty_precise_receptor() -> Receptor {
        let path = std::env::temp_dir().join("ligand_toy_empty_receptor.pdbqt");
        std::fs::write(&path, "").unwrap();
        Receptor::parse_precise(&path, false).unwrap()
    }

    #[test]
    fn evaluate_gradient_matches_finite_differences() {
        let ligand = toy_chain_ligand();
        let receptor = empty_precise_receptor();
        let pool = crate::pool::WorkPool::new(1);
        let sf = ScoringFunction::precalculate_all(&pool);

        let c0 = Conformation {
            position: [0.2, -0.1, 0.3],
            orientation: Quaternion::default(),
            torsions: vec![0.3, -0.2],
        };
        let (_, _, g) = ligand.evaluate(&c0, &sf, &receptor);
        let analytic = g.as_vec();

        let delta = 1e-4;
        for d in 0..analytic.len() {
            let mut unit = vec![0.0; analytic.len()];
            unit[d] = 1.0;
            let direction = Change::from_vec(&unit);
            let c_plus = apply_change(&c0, &direction, delta);
            let c_minus = apply_change(&c0, &direction, -delta);
            let (e_plus, _, _) = ligand.evaluate(&c_plus, &sf, &receptor);
            let (e_minus, _, _) = ligand.evaluate(&c_minus, &sf, &receptor);
            let numeric = (e_plus - e_minus) / (2.0 * delta);
            assert!(
                (numeric - analytic[d]).abs() < 1e-3,
                "dof {}: numeric {} vs analytic {}",
                d,
                numeric,
                analytic[d]
            );
        }
    }

    #[test]
    fn bfgs_never_increases_energy() {
        let ligand = toy_chain_ligand();
        let receptor = empty_precise_receptor();
        let pool = crate::pool::WorkPool::new(1);
        let sf = ScoringFunction::precalculate_all(&pool);

        let c0 = Conformation {
            position: [0.5, 0.1, -0.2],
            orientation: Quaternion::default(),
            torsions: vec![0.6, 0.4],
        };
        let (e_before, _, _) = ligand.evaluate(&c0, &sf, &receptor);
        let (e_after, _) = ligand.bfgs(&c0, &sf, &receptor);
        assert!(e_after <= e_before);
    }
}
