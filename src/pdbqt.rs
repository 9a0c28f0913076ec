//! Parsing and writing of the PDBQT atom-coordinate text format -- this
//! crate's only I/O format.
//!
//! The fixed-column layout follows the de-facto docking interchange format
//! used by AutoDock-family tools.

use std::path::{Path, PathBuf};

use crate::error::DockError;

/// One parsed `ATOM`/`HETATM` line, before atom-type resolution.
#[derive(Debug, Clone)]
pub struct AtomRecord {
    pub serial: i32,
    pub name: String,
    pub res_name: String,
    pub chain: char,
    pub res_seq: i32,
    pub coord: [f64; 3],
    pub charge: f64,
    pub type_code: String,
}

fn substr(line: &str, start: usize, end: usize) -> &str {
    let len = line.len();
    if start >= len {
        return "";
    }
    &line[start..end.min(len)]
}

pub fn is_atom_line(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

pub fn is_ter_line(line: &str) -> bool {
    line.starts_with("TER")
}

pub fn is_model_line(line: &str) -> bool {
    line.starts_with("MODEL")
}

pub fn is_endmdl_line(line: &str) -> bool {
    line.starts_with("ENDMDL")
}

pub fn is_root_line(line: &str) -> bool {
    line.trim_start() == "ROOT"
}

pub fn is_endroot_line(line: &str) -> bool {
    line.trim_start() == "ENDROOT"
}

pub fn is_endbranch_line(line: &str) -> bool {
    line.trim_start().starts_with("ENDBRANCH")
}

/// Parses a `BRANCH <parent_serial> <child_serial>` header line.
pub fn parse_branch_header(line: &str) -> Option<(i32, i32)> {
    let rest = line.trim_start().strip_prefix("BRANCH")?;
    let mut it = rest.split_whitespace();
    let a: i32 = it.next()?.parse().ok()?;
    let b: i32 = it.next()?.parse().ok()?;
    Some((a, b))
}

/// Parses a `TORSDOF <n>` line.
pub fn parse_torsdof(line: &str) -> Option<u32> {
    let rest = line.trim_start().strip_prefix("TORSDOF")?;
    rest.trim().parse().ok()
}

/// Parses a fixed-column `ATOM`/`HETATM` record.
///
/// Coordinates are read from the documented `8.3f` fields at columns 31-54
/// (0-indexed 30..54); the atom-type code is the last whitespace-separated
/// token on the line, matching "the last two non-space columns" of the
/// format without assuming a rigid total line length.
pub fn parse_atom_record(line: &str, line_no: usize, path: &Path) -> Result<AtomRecord, DockError> {
    let parse_err = |reason: &str| DockError::Parse {
        path: path.to_path_buf(),
        line: line_no,
        reason: reason.to_string(),
    };

    if line.len() < 54 {
        return Err(parse_err("atom record shorter than coordinate fields"));
    }

    let serial: i32 = substr(line, 6, 11)
        .trim()
        .parse()
        .map_err(|_| parse_err("bad serial"))?;
    let name = substr(line, 12, 16).trim().to_string();
    let res_name = substr(line, 17, 20).trim().to_string();
    let chain = substr(line, 21, 22).chars().next().unwrap_or(' ');
    let res_seq: i32 = substr(line, 22, 26).trim().parse().unwrap_or(0);

    let x: f64 = substr(line, 30, 38)
        .trim()
        .parse()
        .map_err(|_| parse_err("bad x coordinate"))?;
    let y: f64 = substr(line, 38, 46)
        .trim()
        .parse()
        .map_err(|_| parse_err("bad y coordinate"))?;
    let z: f64 = substr(line, 46, 54)
        .trim()
        .parse()
        .map_err(|_| parse_err("bad z coordinate"))?;

    let charge: f64 = substr(line, 70, 76).trim().parse().unwrap_or(0.0);

    let type_code = line
        .split_whitespace()
        .last()
        .ok_or_else(|| parse_err("missing atom-type code"))?
        .to_string();

    Ok(AtomRecord {
        serial,
        name,
        res_name,
        chain,
        res_seq,
        coord: [x, y, z],
        charge,
        type_code,
    })
}

/// Reads cached `REMARK 921`/`REMARK 927` scores from the first `MODEL` block
/// of an already-written output file (the cache-skip rule).
pub fn read_cached_scores(path: &Path) -> Option<(f64, Option<f64>)> {
    let contents = std::fs::read_to_string(path).ok()?;
    let mut e_nd = None;
    let mut rf = None;
    for line in contents.lines() {
        if is_endmdl_line(line) {
            break;
        }
        if let Some(v) = parse_remark_field(line, "REMARK 921") {
            e_nd = Some(v);
        } else if let Some(v) = parse_remark_field(line, "REMARK 927") {
            rf = Some(v);
        }
    }
    e_nd.map(|e| (e, rf))
}

fn parse_remark_field(line: &str, prefix: &str) -> Option<f64> {
    if !line.starts_with(prefix) {
        return None;
    }
    // The numeric value occupies an 8-character field starting at column 56
    // (0-indexed 55); re-reading it from that fixed offset is what preserves
    // cache-read compatibility even if surrounding label text changes.
    let field = substr(line, 55, 63);
    field.trim().parse().ok()
}

/// Label text is padded to this width (columns 1-55) so the numeric field of
/// both REMARK kinds starts at the same fixed column offset (0-indexed 55),
/// which is what the cache-skip rule re-reads.
const REMARK_LABEL_WIDTH: usize = 55;

/// Formats the `REMARK 921` line for a normalized free energy value, with the
/// numeric field right-justified in an 8-character field at column 56.
pub fn format_remark_921(e_nd: f64) -> String {
    let label = "REMARK 921 NORMALIZED FREE ENERGY PREDICTED BY IDOCK:";
    format!("{:<width$}{:>8.3} KCAL/MOL", label, e_nd, width = REMARK_LABEL_WIDTH)
}

/// Formats the `REMARK 927` line for an RF-Score prediction.
pub fn format_remark_927(rf: f64) -> String {
    let label = "REMARK 927 BINDING AFFINITY PREDICTED BY RF-SCORE:";
    format!("{:<width$}{:>8.3} PKD", label, rf, width = REMARK_LABEL_WIDTH)
}

/// Formats one `ATOM` record line in the fixed-column layout.
#[allow(clippy::too_many_arguments)]
pub fn format_atom_line(
    serial: i32,
    name: &str,
    res_name: &str,
    chain: char,
    res_seq: i32,
    coord: [f64; 3],
    charge: f64,
    type_code: &str,
) -> String {
    format!(
        "ATOM  {:>5} {:<4} {:<3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  0.00  0.00    {:>6.3} {:<2}",
        serial, name, res_name, chain, res_seq, coord[0], coord[1], coord[2], charge, type_code
    )
}

/// Returns whether `output` is the same file as `input` after canonicalizing
/// both paths; used by the cache-skip rule to avoid treating in-place
/// rewrites as a cache hit.
pub fn same_file(input: &Path, output: &Path) -> bool {
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Derives the per-ligand CSV path (`<stem>.csv`) for a ligand file in
/// `out_dir`.
pub fn ligand_csv_path(out_dir: &Path, ligand_path: &Path) -> PathBuf {
    let stem = ligand_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "ligand".to_string());
    out_dir.join(format!("{}.csv", stem))
}

/// Derives the per-run summary CSV path (`<receptor_stem>.csv`).
pub fn run_csv_path(out_dir: &Path, receptor_path: &Path) -> PathBuf {
    let stem = receptor_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "receptor".to_string());
    out_dir.join(format!("{}.csv", stem))
}

/// Derives the output PDBQT path (`<out_dir>/<ligand_stem>_out.pdbqt`).
pub fn ligand_out_path(out_dir: &Path, ligand_path: &Path) -> PathBuf {
    let stem = ligand_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "ligand".to_string());
    out_dir.join(format!("{}_out.pdbqt", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_atom_line() {
        let line = "ATOM      1  N   ALA A  12      10.500  20.250  -3.125  1.00  0.00    -0.350 N ";
        let rec = parse_atom_record(line, 1, Path::new("test.pdbqt")).unwrap();
        assert_eq!(rec.serial, 1);
        assert_eq!(rec.name, "N");
        assert_eq!(rec.res_name, "ALA");
        assert_eq!(rec.res_seq, 12);
        assert!((rec.coord[0] - 10.500).abs() < 1e-9);
        assert!((rec.coord[1] - 20.250).abs() < 1e-9);
        assert!((rec.coord[2] - (-3.125)).abs() < 1e-9);
        assert_eq!(rec.type_code, "N");
    }

    #[test]
    fn rejects_short_line() {
        let err = parse_atom_record("ATOM  1", 1, Path::new("x.pdbqt"));
        assert!(err.is_err());
    }

    #[test]
    fn branch_header_roundtrip() {
        assert_eq!(parse_branch_header("BRANCH   4   9"), Some((4, 9)));
        assert_eq!(parse_branch_header("ATOM"), None);
    }

    #[test]
    fn torsdof_parses() {
        assert_eq!(parse_torsdof("TORSDOF 3"), Some(3));
        assert_eq!(parse_torsdof("REMARK x"), None);
    }

    #[test]
    fn remark_921_field_reads_back_what_was_written() {
        let line = format_remark_921(-7.5);
        assert_eq!(parse_remark_field(&line, "REMARK 921"), Some(-7.5));
    }

    #[test]
    fn remark_927_field_reads_back_what_was_written() {
        let line = format_remark_927(6.25);
        assert_eq!(parse_remark_field(&line, "REMARK 927"), Some(6.25));
    }
}
