//! Per-ligand and per-run CSV reporting.
//!
//! Builds the report with `File::create` plus `writeln!`/`write!` row by row.
//! The legacy layout (blank line before summary rows, optional cached-score
//! suffix) is easier to pin down with direct `write!` calls than to coerce
//! out of a generic CSV-writer crate.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::atom::Residue;
use crate::result::DockResult;

/// Writes the per-ligand CSV (`<stem>.csv`): one row per contacted residue
/// (`mask[k] == true`, i.e. any non-zero contribution across all surviving
/// poses), columns per conformation, then a blank line, then the
/// summary rows (`Binding Affinity` if RF-Score is enabled, `Intra-Ligand
/// Free`, `Inter-Ligand Free`, `Total Free Energy`, `Normalized Total Free
/// Energy`), one value per conformation.
///
/// A conformation's header is suffixed `(Input)` when it is the unsearched
/// input pose (`!result.from_docking`), as produced by `--score_only`/
/// `--score_dock`.
pub fn write_ligand_csv(
    path: &Path,
    results: &[DockResult],
    residues: &[Residue],
    mask: &[bool],
    rf_enabled: bool,
) -> io::Result<()> {
    let mut out = File::create(path)?;

    write!(out, "Chain ID,Residue name,Residue sequence")?;
    for (i, r) in results.iter().enumerate() {
        write!(out, ",Conf {}", i + 1)?;
        if !r.from_docking {
            write!(out, "(Input)")?;
        }
    }
    writeln!(out)?;

    for k in 0..residues.len() {
        if !mask[k] {
            continue;
        }
        let res = &residues[k];
        write!(out, "{},{},{}", res.chain, res.name, res.seq)?;
        for r in results {
            write!(out, ",")?;
            if r.e_residues[k] != 0.0 {
                write!(out, "{:.3}", r.e_residues[k])?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out)?;

    if rf_enabled {
        write!(out, "Binding Affinity,,")?;
        for r in results {
            write!(out, ",{:.3}", r.rf.unwrap_or(0.0))?;
        }
        writeln!(out)?;
    }

    write!(out, "Intra-Ligand Free,,")?;
    for r in results {
        write!(out, ",{:.3}", r.intra_e())?;
    }
    writeln!(out)?;

    write!(out, "Inter-Ligand Free,,")?;
    for r in results {
        write!(out, ",{:.3}", r.f)?;
    }
    writeln!(out)?;

    write!(out, "Total Free Energy,,")?;
    for r in results {
        write!(out, ",{:.3}", r.e)?;
    }
    writeln!(out)?;

    write!(out, "Normalized Total Free Energy,,")?;
    for r in results {
        write!(out, ",{:.3}", r.e_nd)?;
    }
    writeln!(out)?;

    Ok(())
}

/// One row of the per-run summary CSV: a ligand's headline result.
pub struct RunSummaryRow {
    pub ligand_name: String,
    pub num_conformations: usize,
    pub best_e_nd: Option<f64>,
    pub best_rf: Option<f64>,
    pub cached: bool,
}

/// Writes the per-run CSV (`<receptor_stem>.csv`): one row per docked
/// ligand, followed by a trailing blank line before nothing further -- this
/// run CSV *is* the summary, so the blank line is emitted once at the end to
/// match the historical file's terminator.
pub fn write_run_csv(path: &Path, rows: &[RunSummaryRow], rf_enabled: bool) -> io::Result<()> {
    let mut out = File::create(path)?;

    write!(out, "ligand,nConfs,e_nd")?;
    if rf_enabled {
        write!(out, ",rf")?;
    }
    writeln!(out, ",cached")?;

    for row in rows {
        write!(out, "{},{}", row.ligand_name, row.num_conformations)?;
        match row.best_e_nd {
            Some(e) => write!(out, ",{:.8}", e)?,
            None => write!(out, ",")?,
        }
        if rf_enabled {
            match row.best_rf {
                Some(rf) => write!(out, ",{:.3}", rf)?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out, ",{}", if row.cached { "1" } else { "0" })?;
    }
    writeln!(out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residue(name: &str, seq: i32) -> Residue {
        Residue { chain: 'A', name: name.to_string(), seq, start: 0, end: 1, is_standard: true }
    }

    #[test]
    fn ligand_csv_includes_only_contacted_residues() {
        let residues = vec![residue("ALA", 1), residue("GLY", 2)];
        let mask = [true, false];
        let mut result = DockResult::new(-5.0, -5.0, vec![[0.0, 0.0, 0.0]], 2);
        result.e_residues[0] = -1.5;
        result.e_nd = -4.2;

        let path = std::env::temp_dir().join("csv_report_test_ligand.csv");
        write_ligand_csv(&path, &[result], &residues, &mask, false).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("ALA"));
        assert!(!contents.contains("GLY"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn ligand_csv_has_residue_rows_then_summary_rows() {
        let residues = vec![residue("ALA", 1)];
        let mask = [true];
        let mut docked = DockResult::new(-5.0, -3.0, vec![[0.0, 0.0, 0.0]], 1);
        docked.e_residues[0] = -1.5;
        docked.e_nd = -4.2;
        let mut input = DockResult::new(-2.0, -1.0, vec![[0.0, 0.0, 0.0]], 1);
        input.from_docking = false;
        input.e_residues[0] = -0.5;
        input.e_nd = -1.8;

        let path = std::env::temp_dir().join("csv_report_test_layout.csv");
        write_ligand_csv(&path, &[input, docked], &residues, &mask, false).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "Chain ID,Residue name,Residue sequence,Conf 1(Input),Conf 2");
        assert_eq!(lines[1], "A,ALA,1,-0.500,-1.500");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Intra-Ligand Free,,,-1.000,-2.000");
        assert_eq!(lines[4], "Inter-Ligand Free,,,-1.000,-3.000");
        assert_eq!(lines[5], "Total Free Energy,,,-2.000,-5.000");
        assert_eq!(lines[6], "Normalized Total Free Energy,,,-1.800,-4.200");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn run_csv_has_trailing_blank_line() {
        let rows = vec![RunSummaryRow {
            ligand_name: "lig1".to_string(),
            num_conformations: 3,
            best_e_nd: Some(-6.5),
            best_rf: None,
            cached: false,
        }];
        let path = std::env::temp_dir().join("csv_report_test_run.csv");
        write_run_csv(&path, &rows, false).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("\n\n"));
        std::fs::remove_file(&path).ok();
    }
}
