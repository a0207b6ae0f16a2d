use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::alt_orf::{
    DEFAULT_DOWNSTREAM_WINDOW, DEFAULT_KOZAK_AFTER, DEFAULT_KOZAK_BEFORE,
    DEFAULT_MIN_PEPTIDE_LENGTH, DEFAULT_UPSTREAM_WINDOW_END, ScanOptions,
};
use crate::decoys::{DEFAULT_MAX_SCRAMBLE_ATTEMPTS, DEFAULT_RANDOM_SEED, DecoyOptions};
use crate::fasta::DEFAULT_LINE_WIDTH;
use crate::peptides::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub min_peptide_length: usize,
    pub max_peptide_length: usize,
    pub upstream_orfs: bool,
    pub downstream_orfs: bool,
    pub upstream_window_end: isize,
    pub downstream_window: isize,
    pub alt_orf_min_length: usize,
    pub kozak_before: usize,
    pub kozak_after: usize,
    pub decoys: bool,
    /// Defaults to one decoy per distinct peptide.
    pub n_decoys: Option<usize>,
    pub max_scramble_attempts: usize,
    pub random_seed: u64,
    pub line_width: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_peptide_length: DEFAULT_MIN_LENGTH,
            max_peptide_length: DEFAULT_MAX_LENGTH,
            upstream_orfs: false,
            downstream_orfs: false,
            upstream_window_end: DEFAULT_UPSTREAM_WINDOW_END,
            downstream_window: DEFAULT_DOWNSTREAM_WINDOW,
            alt_orf_min_length: DEFAULT_MIN_PEPTIDE_LENGTH,
            kozak_before: DEFAULT_KOZAK_BEFORE,
            kozak_after: DEFAULT_KOZAK_AFTER,
            decoys: false,
            n_decoys: None,
            max_scramble_attempts: DEFAULT_MAX_SCRAMBLE_ATTEMPTS,
            random_seed: DEFAULT_RANDOM_SEED,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_peptide_length == 0 || self.alt_orf_min_length == 0 {
            bail!("peptide lengths must be at least 1");
        }
        if self.min_peptide_length > self.max_peptide_length {
            bail!(
                "minimum peptide length {} exceeds maximum {}",
                self.min_peptide_length,
                self.max_peptide_length
            );
        }
        if self.line_width == 0 {
            bail!("FASTA line width must be at least 1");
        }
        if self.kozak_before > DEFAULT_KOZAK_BEFORE || self.kozak_after > DEFAULT_KOZAK_AFTER {
            bail!(
                "Kozak flanks are limited to {DEFAULT_KOZAK_BEFORE} bases before and \
                 {DEFAULT_KOZAK_AFTER} after the start codon, got {} and {}",
                self.kozak_before,
                self.kozak_after
            );
        }
        if self.max_scramble_attempts == 0 {
            bail!("max scramble attempts must be at least 1");
        }
        Ok(())
    }

    fn scan_options(&self, base: ScanOptions) -> ScanOptions {
        ScanOptions {
            min_peptide_length: self.alt_orf_min_length,
            kozak_before: self.kozak_before,
            kozak_after: self.kozak_after,
            ..base
        }
    }

    #[must_use]
    pub fn upstream_scan_options(&self) -> ScanOptions {
        self.scan_options(ScanOptions::upstream(self.upstream_window_end))
    }

    #[must_use]
    pub fn downstream_scan_options(&self) -> ScanOptions {
        self.scan_options(ScanOptions::downstream(self.downstream_window))
    }

    /// `None` unless decoys are enabled.
    #[must_use]
    pub fn decoy_options(&self) -> Option<DecoyOptions> {
        self.decoys.then(|| DecoyOptions {
            n_decoys: self.n_decoys,
            max_scramble_attempts_per_decoy: self.max_scramble_attempts,
            random_seed: self.random_seed,
        })
    }
}
