//! Scrambled decoy peptides for false-discovery-rate estimation.

use std::collections::HashSet;

use indicatif::ProgressBar;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::Error;
use crate::sequence::{Attributes, SOURCE_KEY, SequenceKind, SequenceRecord};

pub const DEFAULT_MAX_SCRAMBLE_ATTEMPTS: usize = 3;
pub const DEFAULT_RANDOM_SEED: u64 = 0;

/// Passes allowed per expected pass before giving up.
const PASS_BUDGET_FACTOR: usize = 100;
/// Consecutive passes without a new decoy before giving up.
const MAX_STALLED_PASSES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoyOptions {
    /// Decoys to produce. `None` means one per distinct hit peptide.
    pub n_decoys: Option<usize>,
    pub max_scramble_attempts_per_decoy: usize,
    pub random_seed: u64,
}

impl Default for DecoyOptions {
    fn default() -> Self {
        Self {
            n_decoys: None,
            max_scramble_attempts_per_decoy: DEFAULT_MAX_SCRAMBLE_ATTEMPTS,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

/// Generate scrambled decoys from the amino-acid strings of `hits`.
pub fn generate_decoys(
    hits: &[SequenceRecord],
    options: &DecoyOptions,
) -> Result<Vec<SequenceRecord>, Error> {
    generate_decoys_with_progress(hits, options, &ProgressBar::hidden())
}

/// As [`generate_decoys`], advancing `progress` once per accepted decoy.
///
/// Every decoy is a permutation of one hit peptide and never equals any hit
/// peptide. Output is fully determined by `options.random_seed`. When the pass
/// budget runs out first, a warning is logged and the decoys found so far are
/// returned.
pub fn generate_decoys_with_progress(
    hits: &[SequenceRecord],
    options: &DecoyOptions,
    progress: &ProgressBar,
) -> Result<Vec<SequenceRecord>, Error> {
    let mut seen = HashSet::new();
    let mut real_peptides: Vec<&str> = hits
        .iter()
        .map(SequenceRecord::amino_acids)
        .filter(|aa| seen.insert(*aa))
        .collect();

    let n_decoys = options.n_decoys.unwrap_or(real_peptides.len());
    if n_decoys == 0 || real_peptides.is_empty() {
        return Ok(Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(options.random_seed);
    real_peptides.shuffle(&mut rng);

    let expected_passes = n_decoys.div_ceil(real_peptides.len());
    let max_passes = PASS_BUDGET_FACTOR.saturating_mul(expected_passes);

    progress.set_length(n_decoys as u64);
    let mut decoys = Vec::with_capacity(n_decoys);
    let mut passes = 0;
    let mut stalled_passes = 0;

    while decoys.len() < n_decoys {
        if passes >= max_passes || stalled_passes >= MAX_STALLED_PASSES {
            warn!(
                requested = n_decoys,
                generated = decoys.len(),
                passes,
                "failed to generate sufficient decoys"
            );
            break;
        }
        passes += 1;

        let before = decoys.len();
        for peptide in &real_peptides {
            if decoys.len() >= n_decoys {
                break;
            }
            let mut residues = peptide.as_bytes().to_vec();
            for _ in 0..options.max_scramble_attempts_per_decoy {
                residues.shuffle(&mut rng);
                // Permuting ASCII residues keeps the buffer valid UTF-8.
                let scrambled = String::from_utf8_lossy(&residues);
                if !seen.contains(&*scrambled) {
                    let name = format!("Decoy-{}", decoys.len() + 1);
                    decoys.push(decoy_record(name, &scrambled)?);
                    progress.inc(1);
                    break;
                }
            }
        }
        if decoys.len() == before {
            stalled_passes += 1;
        } else {
            stalled_passes = 0;
        }
    }
    progress.finish_and_clear();

    debug!(
        hits = real_peptides.len(),
        decoys = decoys.len(),
        passes,
        "generated decoys"
    );
    Ok(decoys)
}

fn decoy_record(name: String, amino_acids: &str) -> Result<SequenceRecord, Error> {
    let kind = SequenceKind::Decoy;
    let mut attributes = Attributes::new();
    if let Some(tag) = kind.source_tag() {
        attributes.insert(SOURCE_KEY.to_string(), tag.into());
    }
    SequenceRecord::new(kind, name, amino_acids, attributes)
}
