//! Driver binary: CLI parsing, per-ligand orchestration, PDBQT + CSV output.
//!
//! `main` runs its whole body on a thread with an explicit 8 MiB stack
//! rather than the platform default, since the frame-tree/BFGS call chains
//! here are deep enough on flexible ligands to make that margin worth
//! keeping.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use log::{error, info, warn};

use idock::config::{apply_config_overlay, build_run_config, parse_config_file, Args};
use idock::constants::*;
use idock::csv_report::{write_ligand_csv, write_run_csv, RunSummaryRow};
use idock::error::DockError;
use idock::forest::Forest;
use idock::ligand::{Conformation, Ligand};
use idock::monte_carlo::{derive_task_seed, monte_carlo};
use idock::pdbqt::{
    format_atom_line, format_remark_921, format_remark_927, ligand_csv_path, ligand_out_path,
    read_cached_scores, run_csv_path, same_file,
};
use idock::pool::WorkPool;
use idock::qt::Quaternion;
use idock::receptor::Receptor;
use idock::result::{self, DockResult};
use idock::scoring::ScoringFunction;

const STACK_SIZE: usize = 8 * 1024 * 1024;

fn main() {
    env_logger::init();
    let child = std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(run)
        .expect("failed to spawn worker thread");
    match child.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("{}", e);
            eprintln!("idock: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("idock: worker thread panicked");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), DockError> {
    let mut args = Args::parse();
    if let Some(config_path) = args.config.clone() {
        let pairs = parse_config_file(&config_path)?;
        apply_config_overlay(&mut args, &pairs);
    }
    let config = build_run_config(args)?;

    info!(
        "idock {}: receptor {:?}, {} ligand(s), {} thread(s), seed {}",
        VERSION,
        config.receptor,
        config.ligands.len(),
        config.threads,
        config.seed
    );

    let pool = WorkPool::new(config.threads);

    let mut receptor_arc = Arc::new(if config.precise_mode {
        Receptor::parse_precise(&config.receptor, config.remove_nonstd)?
    } else {
        Receptor::parse_with_box(
            &config.receptor,
            config.center,
            config.size,
            config.granularity,
            config.remove_nonstd,
        )?
    });

    let sf = Arc::new(ScoringFunction::precalculate_all(&pool));
    info!("scoring function tables precalculated");

    let forest = if config.rf_score {
        info!("training random forest ({} trees)", config.trees);
        Some(Arc::new(Forest::train(config.trees, config.seed, &pool)))
    } else {
        None
    };

    let mut ligand_paths = config.ligands.clone();
    ligand_paths.sort();

    let mut summary_rows = Vec::with_capacity(ligand_paths.len());

    for ligand_path in &ligand_paths {
        let out_path = ligand_out_path(&config.out_dir, ligand_path);

        if out_path.exists() && !same_file(ligand_path, &out_path) {
            if let Some((e_nd, rf)) = read_cached_scores(&out_path) {
                info!("{:?}: cached result found in {:?}, skipping", ligand_path, out_path);
                summary_rows.push(RunSummaryRow {
                    ligand_name: ligand_name(ligand_path),
                    num_conformations: 1,
                    best_e_nd: Some(e_nd),
                    best_rf: rf,
                    cached: true,
                });
                continue;
            }
        }

        let ligand = Ligand::parse(ligand_path)?;
        info!(
            "{:?}: {} heavy atoms, {} active torsion(s)",
            ligand_path,
            ligand.num_heavy_atoms(),
            ligand.num_torsions
        );

        if !config.precise_mode {
            let required: Vec<usize> = (0..XS_N).filter(|&t| ligand.xs_present[t]).collect();
            Arc::get_mut(&mut receptor_arc)
                .expect("receptor not shared across ligand iterations")
                .populate_all(&required, Arc::clone(&sf), &pool);
        }

        let ligand = Arc::new(ligand);
        let rsq = 4.0 * ligand.num_heavy_atoms() as f64;
        let mut results: Vec<DockResult> = Vec::new();

        if config.score_only {
            let c0 = original_pose(&ligand);
            let (e, f, _g) = ligand.evaluate(&c0, &sf, &receptor_arc);
            let coords = ligand.apply(&c0);
            let mut r = DockResult::new(e, f, coords, receptor_arc.residues.len());
            r.from_docking = false;
            result::push(&mut results, r, rsq, config.max_conformations);
        } else {
            if config.score_dock {
                let c0 = original_pose(&ligand);
                let (e, f, _g) = ligand.evaluate(&c0, &sf, &receptor_arc);
                let coords = ligand.apply(&c0);
                let mut r = DockResult::new(e, f, coords, receptor_arc.residues.len());
                r.from_docking = false;
                results.push(r);
            }

            let per_task: Arc<Mutex<Vec<Option<Vec<DockResult>>>>> =
                Arc::new(Mutex::new((0..config.tasks).map(|_| None).collect()));
            let counter = pool.counter();
            counter.init(config.tasks);
            for t in 0..config.tasks {
                let sf = Arc::clone(&sf);
                let ligand = Arc::clone(&ligand);
                let receptor_arc = Arc::clone(&receptor_arc);
                let per_task = Arc::clone(&per_task);
                let counter = counter.clone();
                let task_seed = derive_task_seed(config.seed, t as u64);
                pool.post(move || {
                    let mut local = Vec::new();
                    monte_carlo(&mut local, task_seed, &sf, &ligand, &receptor_arc);
                    per_task.lock().unwrap()[t] = Some(local);
                    // Drop this task's `Arc` clones before signalling the barrier: their
                    // refcount decrements must happen-before `increment()`'s release so
                    // the `try_unwrap`/`get_mut` calls after the barrier never observe a
                    // stale strong count.
                    drop(receptor_arc);
                    drop(per_task);
                    counter.increment();
                });
            }
            counter.wait();
            let per_task = Arc::try_unwrap(per_task)
                .ok()
                .expect("per-task results still shared after barrier")
                .into_inner()
                .unwrap();
            for task_list in per_task.into_iter().flatten() {
                result::merge(&mut results, task_list, rsq, config.max_conformations);
            }
        }

        if results.is_empty() {
            warn!("{:?}: no finite-energy pose found, skipping output", ligand_path);
            summary_rows.push(RunSummaryRow {
                ligand_name: ligand_name(ligand_path),
                num_conformations: 0,
                best_e_nd: None,
                best_rf: None,
                cached: false,
            });
            continue;
        }

        let best_intra_e = results[0].intra_e();
        let mut mask = vec![false; receptor_arc.residues.len()];
        for r in &mut results {
            r.e_nd = (r.e - best_intra_e) * ligand.flexibility_penalty_factor;
            result::accumulate_residue_energies(r, &mut mask, |atom_index, coord| {
                residue_contributions(&ligand, &receptor_arc, &sf, atom_index, coord)
            });
            if let Some(forest) = &forest {
                let descriptors = rf_descriptors(&ligand, &receptor_arc, &r.coords);
                r.rf = Some(forest.score(&descriptors));
            }
        }

        write_ligand_out(&out_path, &ligand, &results, config.rf_score)?;
        info!("{:?}: wrote {} pose(s) to {:?}", ligand_path, results.len(), out_path);

        let csv_path = ligand_csv_path(&config.out_dir, ligand_path);
        write_ligand_csv(&csv_path, &results, &receptor_arc.residues, &mask, config.rf_score)?;

        summary_rows.push(RunSummaryRow {
            ligand_name: ligand_name(ligand_path),
            num_conformations: results.len(),
            best_e_nd: Some(results[0].e_nd),
            best_rf: results[0].rf,
            cached: false,
        });
    }

    let run_csv = run_csv_path(&config.out_dir, &config.receptor);
    write_run_csv(&run_csv, &summary_rows, config.rf_score)?;
    info!("wrote run summary to {:?}", run_csv);

    Ok(())
}

fn ligand_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The input pose as a `Conformation`: the root frame's reference atom
/// (always ligand atom 0) at its parsed coordinate, identity orientation,
/// zero torsions -- by construction of `Ligand::parse`'s `local_positions`,
/// this reproduces the exact coordinates the file was parsed from.
fn original_pose(ligand: &Ligand) -> Conformation {
    Conformation {
        position: ligand.atoms[0].coord,
        orientation: Quaternion::default(),
        torsions: vec![0.0; ligand.num_torsions],
    }
}

#[inline]
fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Per-residue inter-molecular energy contribution of ligand heavy atom
/// `atom_index` (at its post-search global `coord`) in precise mode, for
/// every receptor residue.
fn residue_contributions(
    ligand: &Ligand,
    receptor: &Receptor,
    sf: &ScoringFunction,
    atom_index: usize,
    coord: [f64; 3],
) -> Vec<(usize, f64)> {
    let xs = ligand.atoms[atom_index].xs.index();
    let mut contributions = Vec::with_capacity(receptor.residues.len());
    for (k, residue) in receptor.residues.iter().enumerate() {
        let mut e = 0.0;
        for atom in &receptor.atoms[residue.start..residue.end] {
            let r2 = dist2(atom.coord, coord);
            if r2 >= RESIDUE_CONTACT_CUTOFF2 {
                continue;
            }
            let (term, _) = sf.evaluate(atom.xs.index(), xs, r2);
            e += term;
        }
        contributions.push((k, e));
    }
    contributions
}

/// Builds the 36-feature (ligand element x receptor element) contact-count
/// descriptor for a completed pose's global coordinates.
fn rf_descriptors(ligand: &Ligand, receptor: &Receptor, coords: &[[f64; 3]]) -> Vec<f64> {
    let mut counts = vec![0.0; RF_NUM_FEATURES];
    for (i, atom) in ligand.atoms.iter().enumerate() {
        let le = atom.xs.element().index();
        for ratom in &receptor.atoms {
            let r2 = dist2(coords[i], ratom.coord);
            if r2 <= RF_CONTACT_CUTOFF2 {
                let re = ratom.xs.element().index();
                counts[le * 6 + re] += 1.0;
            }
        }
    }
    counts
}

/// Writes the ligand output PDBQT: one `MODEL`/`ENDMDL` block per surviving
/// pose, ordered ascending by `e_nd` (already the list's order), each
/// carrying `REMARK 921` (and `REMARK 927` if RF-Score ran) before its atom
/// records.
fn write_ligand_out(
    path: &Path,
    ligand: &Ligand,
    results: &[DockResult],
    rf_enabled: bool,
) -> io::Result<()> {
    let mut out = File::create(path)?;
    for (i, r) in results.iter().enumerate() {
        writeln!(out, "MODEL {:>8}", i + 1)?;
        writeln!(out, "{}", format_remark_921(r.e_nd))?;
        if rf_enabled {
            writeln!(out, "{}", format_remark_927(r.rf.unwrap_or(0.0)))?;
        }
        for (a, atom) in ligand.atoms.iter().enumerate() {
            let coord = r.coords[a];
            let code = xs_type_code(atom.xs.index());
            // `Atom` does not retain the input file's atom name (only the
            // fields the scoring/search code reads), so the output name is
            // synthesized from the type code and a per-pose atom index.
            let name = format!("{}{}", code, a + 1);
            writeln!(
                out,
                "{}",
                format_atom_line(atom.serial, &name, "LIG", ' ', 1, coord, atom.charge, code)
            )?;
        }
        writeln!(out, "ENDMDL")?;
    }
    Ok(())
}

/// Round-trips an `XsType` back to a representative PDBQT type code for
/// output (the inverse of `atom_type::xs_type_from_code`'s heavy-atom side;
/// several input codes map to the same class, so this picks one canonical
/// code per class rather than the atom's original spelling, which `Atom`
/// does not retain).
fn xs_type_code(xs: usize) -> &'static str {
    use idock::atom_type::XsType;
    match XsType::from_index(xs) {
        XsType::CHydrophobic => "C",
        XsType::CPolar => "C",
        XsType::NPolar => "N",
        XsType::NDonor => "N",
        XsType::NAcceptor => "NA",
        XsType::NDonorAcceptor => "NA",
        XsType::OPolar => "O",
        XsType::ODonor => "O",
        XsType::OAcceptor => "OA",
        XsType::ODonorAcceptor => "OA",
        XsType::SPolar => "S",
        XsType::PPolar => "P",
        XsType::FHydrophobic => "F",
        XsType::ClHydrophobic => "Cl",
        XsType::BrIHydrophobic => "I",
    }
}
