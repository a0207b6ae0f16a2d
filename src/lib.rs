//! msmhc: candidate peptide generation for mass-spectrometry immunopeptidomics.

pub mod error;

pub mod alt_orf;
pub mod cli;
pub mod codon;
pub mod config;
pub mod decoys;
pub mod fasta;
pub mod generation;
pub mod kozak;
pub mod mass;
pub mod peptide_code;
pub mod peptides;
pub mod proteins;
pub mod sequence;
pub mod transcript;
