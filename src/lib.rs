//! Protein-ligand molecular docking engine: scoring function, receptor grid
//! maps, the ligand evaluator/BFGS optimizer, the Monte Carlo searcher,
//! result clustering, and an optional random-forest rescorer.

#[macro_use]
extern crate lazy_static;
extern crate rand;

pub mod atom;
pub mod atom_type;
pub mod config;
pub mod constants;
pub mod csv_report;
pub mod error;
pub mod forest;
pub mod ligand;
pub mod monte_carlo;
pub mod pdbqt;
pub mod pool;
pub mod qt;
pub mod receptor;
pub mod result;
pub mod scoring;
