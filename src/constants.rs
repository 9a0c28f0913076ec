// Docking engine constants, named so each call site reads like a sentence.

// Default random number generator seed (wall-clock seconds are used instead when
// the CLI does not supply --seed; this is only a fallback for library use).
pub const DEFAULT_SEED: u64 = 324_324;

// When a quaternion SLERP is considered linear and not spherical.
pub const LINEAR_THRESHOLD: f64 = 0.9995;

/// Number of XScore-style heavy-atom classes.
pub const XS_N: usize = 15;

/// Scoring function cutoff distance, in Angstrom.
pub const SCORING_CUTOFF: f64 = 8.0;
/// Scoring function cutoff squared.
pub const SCORING_CUTOFF2: f64 = SCORING_CUTOFF * SCORING_CUTOFF;
/// Step in squared distance (A^2) used to tabulate the scoring function.
pub const SCORING_DELTA: f64 = 0.0005;

/// Weight of the narrow Gaussian attraction term.
pub const WEIGHT_GAUSS1: f64 = -0.035579;
/// Weight of the broad Gaussian attraction term.
pub const WEIGHT_GAUSS2: f64 = -0.005156;
/// Weight of the short-range repulsion term.
pub const WEIGHT_REPULSION: f64 = 0.840245;
/// Weight of the hydrophobic contact term.
pub const WEIGHT_HYDROPHOBIC: f64 = -0.035069;
/// Weight of the hydrogen bond term.
pub const WEIGHT_HBOND: f64 = -0.587439;

/// Width of the narrow Gaussian.
pub const GAUSS1_WIDTH: f64 = 0.5;
/// Offset and width of the broad Gaussian.
pub const GAUSS2_OFFSET: f64 = 3.0;
pub const GAUSS2_WIDTH: f64 = 2.0;

/// Hydrophobic ramp: full strength below GOOD, zero above BAD.
pub const HYDROPHOBIC_GOOD: f64 = 0.5;
pub const HYDROPHOBIC_BAD: f64 = 1.5;

/// Hydrogen bond ramp: full strength below GOOD, zero above BAD.
pub const HBOND_GOOD: f64 = -0.7;
pub const HBOND_BAD: f64 = 0.0;

/// Default 1D probe spacing of grid maps, in Angstrom.
pub const DEFAULT_GRANULARITY: f64 = 0.125;

/// Number of bonds of separation below which an intra-ligand atom pair is excluded
/// from the intramolecular scoring sum.
pub const MIN_INTRA_LIGAND_BONDS: u32 = 4;

/// Energy sentinel returned when a pose places an atom outside the search box.
pub const OUT_OF_BOX_ENERGY: f64 = 1e10;

/// Maximum number of BFGS iterations per local optimization.
pub const MAX_BFGS_ITERATIONS: usize = 30;
/// BFGS terminates early once the gradient infinity norm drops below this value.
pub const BFGS_GRADIENT_TOLERANCE: f64 = 1e-5;
/// Initial backtracking line search step.
pub const BFGS_INITIAL_STEP: f64 = 1.0;
/// Backtracking line search shrink factor.
pub const BFGS_LINE_SEARCH_SHRINK: f64 = 0.5;
/// Maximum number of step halvings in the line search.
pub const BFGS_MAX_LINE_SEARCH_STEPS: usize = 10;

/// Number of Monte Carlo steps per task (after the initial BFGS optimization).
pub const MC_STEPS: u32 = 50;
/// Metropolis temperature.
pub const MC_TEMPERATURE: f64 = 1.2;
/// Standard deviation of the Gaussian translation perturbation, in Angstrom.
pub const MC_TRANSLATION_SIGMA: f64 = 2.0;
/// Standard deviation (radians) of the Gaussian rotation perturbation.
pub const MC_ROTATION_SIGMA: f64 = 0.5;
/// Standard deviation (radians) of the Gaussian per-torsion perturbation.
pub const MC_TORSION_SIGMA: f64 = 0.3;

/// Maximum number of results retained by a single Monte Carlo task before merge.
pub const MAX_RESULTS_PER_TASK: usize = 20;
/// RMSD, in Angstrom, below which two poses are considered the same cluster.
pub const CLUSTER_RMSD_CUTOFF: f64 = 2.0;

/// Flexibility penalty constant `c` in `1 / (1 + c*T)`.
pub const FLEXIBILITY_PENALTY_C: f64 = 0.05846;

/// Receptor residues within this distance (Angstrom) of any ligand heavy atom
/// participate in the per-residue energy decomposition.
pub const RESIDUE_CONTACT_CUTOFF: f64 = 8.0;
pub const RESIDUE_CONTACT_CUTOFF2: f64 = RESIDUE_CONTACT_CUTOFF * RESIDUE_CONTACT_CUTOFF;

/// Cutoff used to build RF-Score element-pair contact descriptors.
pub const RF_CONTACT_CUTOFF: f64 = 12.0;
pub const RF_CONTACT_CUTOFF2: f64 = RF_CONTACT_CUTOFF * RF_CONTACT_CUTOFF;
/// Number of (ligand element x receptor element) contact-count features per sample.
pub const RF_NUM_FEATURES: usize = 36;
/// Bootstrap sample size used to train each regression tree.
pub const RF_BOOTSTRAP_SIZE: usize = 8;

/// Default values for CLI options (see `config.rs`).
pub const DEFAULT_OUT_DIR: &str = ".";
pub const DEFAULT_NUM_TREES: usize = 500;
pub const DEFAULT_NUM_TASKS: usize = 64;
pub const DEFAULT_MAX_CONFORMATIONS: usize = 9;

/// Version string reported by `--version`.
pub const VERSION: &str = "1.0.0";
