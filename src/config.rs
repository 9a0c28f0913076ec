//! Command-line surface, `--config FILE` overlay, and the validated
//! `RunConfig` the driver operates on.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::constants::*;
use crate::error::DockError;

/// Raw CLI arguments, mirroring the command-line surface one-to-one.
#[derive(Parser, Debug, Clone)]
#[clap(name = "idock", version = VERSION, about = "Protein-ligand molecular docking engine", long_about = None)]
pub struct Args {
    /// Receptor structure in PDBQT format.
    #[clap(long)]
    pub receptor: Option<PathBuf>,

    /// One or more ligand structures in PDBQT format.
    #[clap(long)]
    pub ligand: Vec<PathBuf>,

    /// Output directory (default ".").
    #[clap(long)]
    pub out: Option<PathBuf>,

    /// Binding site box center x, Angstrom.
    #[clap(long)]
    pub center_x: Option<f64>,
    /// Binding site box center y, Angstrom.
    #[clap(long)]
    pub center_y: Option<f64>,
    /// Binding site box center z, Angstrom.
    #[clap(long)]
    pub center_z: Option<f64>,
    /// Binding site box size along x, Angstrom.
    #[clap(long)]
    pub size_x: Option<f64>,
    /// Binding site box size along y, Angstrom.
    #[clap(long)]
    pub size_y: Option<f64>,
    /// Binding site box size along z, Angstrom.
    #[clap(long)]
    pub size_z: Option<f64>,

    /// Random seed (default: wall-clock seconds).
    #[clap(long)]
    pub seed: Option<u64>,
    /// Worker thread count (default: hardware concurrency).
    #[clap(long)]
    pub threads: Option<usize>,
    /// Number of random forest trees.
    #[clap(long)]
    pub trees: Option<usize>,
    /// Number of independent Monte Carlo tasks.
    #[clap(long)]
    pub tasks: Option<usize>,
    /// Maximum surviving conformations reported per ligand.
    #[clap(long)]
    pub conformations: Option<usize>,
    /// Grid map granularity, Angstrom.
    #[clap(long)]
    pub granularity: Option<f64>,

    /// Evaluate the input pose only; do not search.
    #[clap(long)]
    pub score_only: bool,
    /// Dock: search for low-energy conformations.
    #[clap(long)]
    pub score_dock: bool,
    /// Rescore final poses with RF-Score.
    #[clap(long)]
    pub rf_score: bool,
    /// Evaluate the scoring function directly, without grid maps.
    #[clap(long)]
    pub precise_mode: bool,
    /// Drop non-standard-amino-acid residues from the receptor.
    #[clap(long)]
    pub remove_nonstd: bool,

    /// Load additional options from a `key = value` config file.
    #[clap(long)]
    pub config: Option<PathBuf>,
}

/// Validated, fully-resolved run configuration. CLI flags always win over
/// `--config FILE` entries on conflict.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub receptor: PathBuf,
    pub ligands: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub center: [f64; 3],
    pub size: [f64; 3],
    pub seed: u64,
    pub threads: usize,
    pub trees: usize,
    pub tasks: usize,
    pub max_conformations: usize,
    pub granularity: f64,
    pub score_only: bool,
    pub score_dock: bool,
    pub rf_score: bool,
    pub precise_mode: bool,
    pub remove_nonstd: bool,
}

/// Parses a `key = value` config file: blank lines and `#`-prefixed lines
/// are ignored. Returns an overlay of raw string values; the
/// caller merges them under the CLI's already-parsed `Args`, so CLI flags
/// always win on conflict.
pub fn parse_config_file(path: &Path) -> Result<Vec<(String, String)>, DockError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DockError::Filesystem {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut pairs = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| DockError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            reason: "expected 'key = value'".to_string(),
        })?;
        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }
    Ok(pairs)
}

/// Overlays `--config FILE` values onto `args` wherever the CLI did not
/// already set that field (CLI wins on conflict).
pub fn apply_config_overlay(args: &mut Args, pairs: &[(String, String)]) {
    macro_rules! overlay_opt {
        ($field:ident, $key:literal) => {
            if args.$field.is_none() {
                if let Some((_, v)) = pairs.iter().find(|(k, _)| k == $key) {
                    if let Ok(parsed) = v.parse() {
                        args.$field = Some(parsed);
                    }
                }
            }
        };
    }
    macro_rules! overlay_bool {
        ($field:ident, $key:literal) => {
            if !args.$field {
                if let Some((_, v)) = pairs.iter().find(|(k, _)| k == $key) {
                    args.$field = v == "1" || v.eq_ignore_ascii_case("true");
                }
            }
        };
    }

    overlay_opt!(receptor, "receptor");
    overlay_opt!(out, "out");
    overlay_opt!(center_x, "center_x");
    overlay_opt!(center_y, "center_y");
    overlay_opt!(center_z, "center_z");
    overlay_opt!(size_x, "size_x");
    overlay_opt!(size_y, "size_y");
    overlay_opt!(size_z, "size_z");
    overlay_opt!(seed, "seed");
    overlay_opt!(threads, "threads");
    overlay_opt!(trees, "trees");
    overlay_opt!(tasks, "tasks");
    overlay_opt!(conformations, "conformations");
    overlay_opt!(granularity, "granularity");
    overlay_bool!(score_only, "score_only");
    overlay_bool!(score_dock, "score_dock");
    overlay_bool!(rf_score, "rf_score");
    overlay_bool!(precise_mode, "precise_mode");
    overlay_bool!(remove_nonstd, "remove_nonstd");

    if args.ligand.is_empty() {
        for (k, v) in pairs.iter().filter(|(k, _)| k == "ligand") {
            let _ = k;
            args.ligand.push(PathBuf::from(v));
        }
    }
}

/// Validates `args` into a fully-resolved `RunConfig`.
pub fn build_run_config(args: Args) -> Result<RunConfig, DockError> {
    let receptor = args
        .receptor
        .ok_or_else(|| DockError::Argument("missing required option --receptor".to_string()))?;
    if !receptor.is_file() {
        return Err(DockError::Filesystem {
            path: receptor.clone(),
            reason: "receptor path does not exist or is not a regular file".to_string(),
        });
    }

    if args.ligand.is_empty() {
        return Err(DockError::Argument("missing required option --ligand".to_string()));
    }
    for ligand in &args.ligand {
        if !ligand.is_file() {
            return Err(DockError::Filesystem {
                path: ligand.clone(),
                reason: "ligand path does not exist or is not a regular file".to_string(),
            });
        }
    }

    if args.score_only && args.score_dock {
        return Err(DockError::Argument(
            "--score_only and --score_dock are mutually exclusive".to_string(),
        ));
    }
    if !args.score_only && !args.score_dock {
        return Err(DockError::Argument(
            "one of --score_only or --score_dock is required".to_string(),
        ));
    }
    if args.precise_mode && !(args.score_only || args.score_dock) {
        return Err(DockError::Argument(
            "--precise_mode requires --score_only or --score_dock".to_string(),
        ));
    }

    let box_required = !(args.score_only && args.precise_mode);
    let center = [args.center_x, args.center_y, args.center_z];
    let size = [args.size_x, args.size_y, args.size_z];
    if box_required && (center.iter().any(Option::is_none) || size.iter().any(Option::is_none)) {
        return Err(DockError::Argument(
            "--center_{x,y,z} and --size_{x,y,z} are required unless both --score_only and --precise_mode are set"
                .to_string(),
        ));
    }
    let center = [
        center[0].unwrap_or(0.0),
        center[1].unwrap_or(0.0),
        center[2].unwrap_or(0.0),
    ];
    let size = [size[0].unwrap_or(0.0), size[1].unwrap_or(0.0), size[2].unwrap_or(0.0)];
    if box_required {
        for (d, s) in size.iter().enumerate() {
            if *s <= 0.0 {
                return Err(DockError::Argument(format!(
                    "--size_{} must be positive",
                    ["x", "y", "z"][d]
                )));
            }
        }
    }

    let granularity = args.granularity.unwrap_or(DEFAULT_GRANULARITY);
    if granularity <= 0.0 {
        return Err(DockError::Argument("--granularity must be positive".to_string()));
    }

    let out_dir = args.out.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(DockError::Filesystem {
            path: out_dir,
            reason: "output path exists and is not a directory".to_string(),
        });
    }
    if !out_dir.exists() {
        std::fs::create_dir_all(&out_dir).map_err(|e| DockError::Filesystem {
            path: out_dir.clone(),
            reason: format!("cannot create output directory: {}", e),
        })?;
    }

    let threads = args
        .threads
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(DEFAULT_SEED)
    });

    Ok(RunConfig {
        receptor,
        ligands: args.ligand,
        out_dir,
        center,
        size,
        seed,
        threads,
        trees: args.trees.unwrap_or(DEFAULT_NUM_TREES),
        tasks: args.tasks.unwrap_or(DEFAULT_NUM_TASKS),
        max_conformations: args.conformations.unwrap_or(DEFAULT_MAX_CONFORMATIONS),
        granularity,
        score_only: args.score_only,
        score_dock: args.score_dock,
        rf_score: args.rf_score,
        precise_mode: args.precise_mode,
        remove_nonstd: args.remove_nonstd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "").unwrap();
        path
    }

    fn base_args() -> Args {
        Args {
            receptor: None,
            ligand: Vec::new(),
            out: None,
            center_x: None,
            center_y: None,
            center_z: None,
            size_x: None,
            size_y: None,
            size_z: None,
            seed: None,
            threads: None,
            trees: None,
            tasks: None,
            conformations: None,
            granularity: None,
            score_only: false,
            score_dock: false,
            rf_score: false,
            precise_mode: false,
            remove_nonstd: false,
            config: None,
        }
    }

    #[test]
    fn rejects_missing_receptor() {
        let args = base_args();
        let err = build_run_config(args).unwrap_err();
        assert!(matches!(err, DockError::Argument(_)));
    }

    #[test]
    fn rejects_mutually_exclusive_score_flags() {
        let mut args = base_args();
        args.receptor = Some(existing_file("idock_cfg_test_mutex.pdbqt"));
        args.ligand = vec![existing_file("idock_cfg_test_mutex_lig.pdbqt")];
        args.score_only = true;
        args.score_dock = true;
        let err = build_run_config(args).unwrap_err();
        assert!(matches!(err, DockError::Argument(_)));
    }

    #[test]
    fn precise_mode_without_score_mode_is_rejected() {
        let mut args = base_args();
        args.receptor = Some(existing_file("idock_cfg_test_precise.pdbqt"));
        args.ligand = vec![existing_file("idock_cfg_test_precise_lig.pdbqt")];
        args.precise_mode = true;
        let err = build_run_config(args).unwrap_err();
        assert!(matches!(err, DockError::Argument(_)));
    }

    #[test]
    fn box_not_required_for_precise_score_only() {
        let mut args = base_args();
        args.receptor = Some(existing_file("idock_cfg_test_sc_only.pdbqt"));
        args.ligand = vec![existing_file("idock_cfg_test_sc_only_lig.pdbqt")];
        args.score_only = true;
        args.precise_mode = true;
        let config = build_run_config(args).unwrap();
        assert!(config.precise_mode);
    }

    #[test]
    fn box_required_for_map_mode() {
        let mut args = base_args();
        args.receptor = Some(existing_file("idock_cfg_test_box.pdbqt"));
        args.ligand = vec![existing_file("idock_cfg_test_box_lig.pdbqt")];
        args.score_dock = true;
        let err = build_run_config(args).unwrap_err();
        assert!(matches!(err, DockError::Argument(_)));
    }

    #[test]
    fn config_file_overlay_does_not_override_cli() {
        let mut args = base_args();
        args.receptor = Some(PathBuf::from("/cli/receptor.pdbqt"));
        let pairs = vec![("receptor".to_string(), "/config/receptor.pdbqt".to_string())];
        apply_config_overlay(&mut args, &pairs);
        assert_eq!(args.receptor, Some(PathBuf::from("/cli/receptor.pdbqt")));
    }

    #[test]
    fn config_file_overlay_fills_unset_fields() {
        let mut args = base_args();
        let pairs = vec![("seed".to_string(), "99".to_string())];
        apply_config_overlay(&mut args, &pairs);
        assert_eq!(args.seed, Some(99));
    }

    #[test]
    fn config_parser_skips_comments_and_blank_lines() {
        let path = std::env::temp_dir().join("idock_test_config.cfg");
        std::fs::write(&path, "# comment\n\nseed = 7\ntrees = 100\n").unwrap();
        let pairs = parse_config_file(&path).unwrap();
        assert_eq!(pairs, vec![("seed".to_string(), "7".to_string()), ("trees".to_string(), "100".to_string())]);
        std::fs::remove_file(&path).ok();
    }
}
