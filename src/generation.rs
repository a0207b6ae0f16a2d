//! Full-length sequence generation from an annotation.
//!
//! Malformed transcripts and variant effects are logged and skipped so a
//! single bad record never aborts a genome-wide run.

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::alt_orf::{self, ScanOptions};
use crate::codon::CodonTable;
use crate::config::PipelineConfig;
use crate::proteins::{mutant_sequence, reference_sequence};
use crate::sequence::SequenceRecord;
use crate::transcript::{Annotation, Transcript, VariantEffect};

/// Generated sequences grouped by source.
#[derive(Debug, Default)]
pub struct GeneratedSequences {
    pub reference: Vec<SequenceRecord>,
    pub mutant: Vec<SequenceRecord>,
    pub upstream: Vec<SequenceRecord>,
    pub downstream: Vec<SequenceRecord>,
}

impl GeneratedSequences {
    #[must_use]
    pub fn len(&self) -> usize {
        self.reference.len() + self.mutant.len() + self.upstream.len() + self.downstream.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate in reference, mutant, upstream, downstream order.
    #[must_use]
    pub fn into_combined(self) -> Vec<SequenceRecord> {
        let mut combined = self.reference;
        combined.extend(self.mutant);
        combined.extend(self.upstream);
        combined.extend(self.downstream);
        combined
    }
}

/// One reference protein per complete protein-coding transcript.
#[must_use]
pub fn reference_sequences(transcripts: &[Transcript]) -> Vec<SequenceRecord> {
    transcripts
        .iter()
        .filter(|t| t.has_reference_protein())
        .filter_map(|t| match reference_sequence(t) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(transcript = %t.transcript_id, "skipping reference sequence: {e}");
                None
            }
        })
        .collect()
}

/// One mutant protein per variant effect that carries a mutant sequence.
#[must_use]
pub fn mutant_sequences(effects: &[VariantEffect]) -> Vec<SequenceRecord> {
    effects
        .iter()
        .filter(|e| e.mutant_protein_sequence.is_some())
        .filter_map(|e| match mutant_sequence(e) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("skipping mutant sequence: {e}");
                None
            }
        })
        .collect()
}

/// Scan every fully annotated transcript with `options`.
pub fn alt_orf_sequences(
    transcripts: &[Transcript],
    options: &ScanOptions,
    table: &CodonTable,
    progress: &ProgressBar,
) -> Vec<SequenceRecord> {
    progress.set_length(transcripts.len() as u64);
    let mut records = Vec::new();
    for transcript in transcripts {
        progress.inc(1);
        let orfs = match alt_orf::scan_transcript(transcript, options, table) {
            Ok(orfs) => orfs,
            Err(e) => {
                warn!(transcript = %transcript.transcript_id, "skipping Alt-ORF scan: {e}");
                continue;
            }
        };
        for orf in orfs {
            match orf.to_record() {
                Ok(record) => records.push(record),
                Err(e) => warn!(orf = %orf.name(), "skipping Alt-ORF: {e}"),
            }
        }
    }
    progress.finish_and_clear();
    records
}

/// Generate every enabled sequence kind from `annotation`.
pub fn generate_sequences(
    annotation: &Annotation,
    config: &PipelineConfig,
    progress: &ProgressBar,
) -> GeneratedSequences {
    let table = CodonTable::standard();
    let mut generated = GeneratedSequences {
        reference: reference_sequences(&annotation.transcripts),
        mutant: mutant_sequences(&annotation.variant_effects),
        ..Default::default()
    };
    if config.upstream_orfs {
        generated.upstream = alt_orf_sequences(
            &annotation.transcripts,
            &config.upstream_scan_options(),
            &table,
            progress,
        );
    }
    if config.downstream_orfs {
        progress.reset();
        generated.downstream = alt_orf_sequences(
            &annotation.transcripts,
            &config.downstream_scan_options(),
            &table,
            progress,
        );
    }
    info!(
        reference = generated.reference.len(),
        mutant = generated.mutant.len(),
        upstream = generated.upstream.len(),
        downstream = generated.downstream.len(),
        "generated sequences"
    );
    generated
}
