//! Alternative open reading frames around annotated start codons.
//!
//! Every `ATG` inside the search window other than the annotated start
//! codon itself opens a candidate ORF, which is translated to the first
//! in-frame stop. Candidates start upstream (5' UTR) or downstream (inside
//! the canonical ORF) of the annotated start and carry a Kozak initiation
//! score computed from their flanking bases.

use std::fmt;

use tracing::{debug, warn};

use crate::codon::CodonTable;
use crate::error::Error;
use crate::kozak;
use crate::sequence::{AttributeValue, Attributes, SOURCE_KEY, SequenceKind, SequenceRecord};
use crate::transcript::Transcript;

pub const DEFAULT_MIN_PEPTIDE_LENGTH: usize = 7;
pub const DEFAULT_KOZAK_BEFORE: usize = kozak::CONSENSUS_BEFORE_START.len();
pub const DEFAULT_KOZAK_AFTER: usize = kozak::CONSENSUS_AFTER_START.len();

/// Downstream starts have been observed hundreds of bases into the canonical ORF.
pub const DEFAULT_DOWNSTREAM_WINDOW: isize = 500;

/// Upstream scanning stops short of the annotated start codon.
pub const DEFAULT_UPSTREAM_WINDOW_END: isize = -3;

const START_CODON: &[u8; 3] = b"ATG";

/// Position of an alternative start relative to the annotated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AltOrfDirection {
    Upstream,
    Downstream,
}

impl AltOrfDirection {
    #[must_use]
    pub fn from_relative_start(relative_start: isize) -> Self {
        if relative_start < 0 {
            Self::Upstream
        } else {
            Self::Downstream
        }
    }

    #[must_use]
    pub fn kind(self) -> SequenceKind {
        match self {
            Self::Upstream => SequenceKind::UpstreamOrf,
            Self::Downstream => SequenceKind::DownstreamOrf,
        }
    }
}

impl fmt::Display for AltOrfDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => write!(f, "Upstream"),
            Self::Downstream => write!(f, "Downstream"),
        }
    }
}

/// Scan window and filters.
///
/// Window offsets are relative to the annotated start codon. The start bound
/// is inclusive and the end bound exclusive; both are clipped to the cDNA.
/// Without overrides the window runs from the 5' end of the cDNA to the end
/// of the coding sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub search_start_offset: Option<isize>,
    pub search_end_offset: Option<isize>,
    pub min_peptide_length: usize,
    pub kozak_before: usize,
    pub kozak_after: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            search_start_offset: None,
            search_end_offset: None,
            min_peptide_length: DEFAULT_MIN_PEPTIDE_LENGTH,
            kozak_before: DEFAULT_KOZAK_BEFORE,
            kozak_after: DEFAULT_KOZAK_AFTER,
        }
    }
}

impl ScanOptions {
    /// 5' end of the cDNA up to `window_end` bases relative to the annotated start.
    #[must_use]
    pub fn upstream(window_end: isize) -> Self {
        Self {
            search_end_offset: Some(window_end),
            ..Self::default()
        }
    }

    /// Annotated start codon up to `window` bases past it.
    #[must_use]
    pub fn downstream(window: isize) -> Self {
        Self {
            search_start_offset: Some(0),
            search_end_offset: Some(window),
            ..Self::default()
        }
    }
}

/// One accepted start site and its translation, before transcript metadata is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct OrfHit {
    /// Offset of the first base of the start codon from the annotated start codon.
    pub relative_start: isize,
    pub sequence_before_start: String,
    pub start_codon: String,
    pub sequence_after_start: String,
    pub amino_acids: String,
    pub ends_with_stop_codon: bool,
    pub translation_initiation_score: f64,
}

impl OrfHit {
    #[must_use]
    pub fn direction(&self) -> AltOrfDirection {
        AltOrfDirection::from_relative_start(self.relative_start)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.relative_start == 0 {
            return Err(Error::Validation(
                "alternative ORF cannot start at the annotated start codon".to_string(),
            ));
        }
        if self.start_codon.len() != 3 {
            return Err(Error::Validation(format!(
                "start codon must be 3 bases, got '{}'",
                self.start_codon
            )));
        }
        if self.sequence_before_start.len() > kozak::CONSENSUS_BEFORE_START.len() {
            return Err(Error::Validation(format!(
                "at most {} bases of context before the start codon, got {}",
                kozak::CONSENSUS_BEFORE_START.len(),
                self.sequence_before_start.len()
            )));
        }
        if self.sequence_after_start.len() > kozak::CONSENSUS_AFTER_START.len() {
            return Err(Error::Validation(format!(
                "at most {} bases of context after the start codon, got {}",
                kozak::CONSENSUS_AFTER_START.len(),
                self.sequence_after_start.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.translation_initiation_score) {
            return Err(Error::Validation(format!(
                "translation initiation score {} outside [0, 1]",
                self.translation_initiation_score
            )));
        }
        Ok(())
    }
}

/// Scan a cDNA for alternative `ATG` starts.
///
/// `coding_length` is the length of the annotated coding sequence starting
/// at `start_codon_offset`; it bounds the default end of the window. Kozak
/// flanks are capped at the consensus lengths.
#[must_use]
pub fn scan_cdna(
    cdna: &[u8],
    start_codon_offset: usize,
    coding_length: usize,
    options: &ScanOptions,
    table: &CodonTable,
) -> Vec<OrfHit> {
    let anchor = start_codon_offset as isize;
    let len = cdna.len() as isize;
    let window_start = options
        .search_start_offset
        .map_or(0, |offset| anchor + offset)
        .max(0);
    let window_end = options
        .search_end_offset
        .map_or(anchor + coding_length as isize, |offset| anchor + offset)
        .min(len - 2);

    let kozak_before = options.kozak_before.min(kozak::CONSENSUS_BEFORE_START.len());
    let kozak_after = options.kozak_after.min(kozak::CONSENSUS_AFTER_START.len());

    let mut hits = Vec::new();
    for pos in window_start..window_end.max(window_start) {
        let relative_start = pos - anchor;
        if relative_start == 0 {
            continue;
        }
        let i = pos as usize;
        let codon = &cdna[i..i + 3];
        if !codon.eq_ignore_ascii_case(START_CODON) {
            continue;
        }

        let translation = table.translate_orf(&cdna[i..]);
        if translation.amino_acids.len() < options.min_peptide_length {
            continue;
        }

        let before = &cdna[i.saturating_sub(kozak_before)..i];
        let after = &cdna[i + 3..(i + 3 + kozak_after).min(cdna.len())];
        let score = kozak::translation_initiation_score(before, codon, after);

        hits.push(OrfHit {
            relative_start,
            sequence_before_start: upper(before),
            start_codon: upper(codon),
            sequence_after_start: upper(after),
            amino_acids: String::from_utf8_lossy(&translation.amino_acids).into_owned(),
            ends_with_stop_codon: translation.ends_with_stop_codon,
            translation_initiation_score: score,
        });
    }
    hits
}

fn upper(bases: &[u8]) -> String {
    String::from_utf8_lossy(bases).to_ascii_uppercase()
}

/// An alternative ORF of one transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct AltOrf {
    transcript_id: String,
    transcript_name: String,
    gene_id: String,
    gene_name: String,
    hit: OrfHit,
}

impl AltOrf {
    pub fn new(transcript: &Transcript, hit: OrfHit) -> Result<Self, Error> {
        hit.validate()
            .map_err(|e| Error::Validation(format!("{}: {e}", transcript.transcript_id)))?;
        Ok(Self {
            transcript_id: transcript.transcript_id.clone(),
            transcript_name: transcript.transcript_name.clone(),
            gene_id: transcript.gene_id.clone(),
            gene_name: transcript.gene_name.clone(),
            hit,
        })
    }

    #[must_use]
    pub fn direction(&self) -> AltOrfDirection {
        self.hit.direction()
    }

    #[must_use]
    pub fn hit(&self) -> &OrfHit {
        &self.hit
    }

    #[must_use]
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    #[must_use]
    pub fn gene_name(&self) -> &str {
        &self.gene_name
    }

    /// `Upstream-<transcript>-<distance>nt` or `Downstream-<transcript>-<distance>nt`.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{}-{}-{}nt",
            self.direction(),
            self.transcript_id,
            self.hit.relative_start.unsigned_abs()
        )
    }

    pub fn to_record(&self) -> Result<SequenceRecord, Error> {
        let kind = self.direction().kind();
        let hit = &self.hit;
        let mut attributes = Attributes::new();
        if let Some(tag) = kind.source_tag() {
            attributes.insert(SOURCE_KEY.to_string(), tag.into());
        }
        let fields: [(&str, AttributeValue); 11] = [
            ("transcript_id", self.transcript_id.as_str().into()),
            ("transcript_name", self.transcript_name.as_str().into()),
            ("gene_id", self.gene_id.as_str().into()),
            ("gene_name", self.gene_name.as_str().into()),
            ("relative_start", (hit.relative_start as i64).into()),
            ("start_codon", hit.start_codon.as_str().into()),
            ("sequence_before_start", hit.sequence_before_start.as_str().into()),
            ("sequence_after_start", hit.sequence_after_start.as_str().into()),
            ("ends_with_stop_codon", hit.ends_with_stop_codon.into()),
            (
                "translation_initiation_score",
                hit.translation_initiation_score.into(),
            ),
            ("orf_length", (hit.amino_acids.len() as i64).into()),
        ];
        for (key, value) in fields {
            attributes.insert(key.to_string(), value);
        }
        SequenceRecord::new(kind, self.name(), hit.amino_acids.as_str(), attributes)
    }
}

/// Scan one transcript. Transcripts without a complete annotation yield nothing.
pub fn scan_transcript(
    transcript: &Transcript,
    options: &ScanOptions,
    table: &CodonTable,
) -> Result<Vec<AltOrf>, Error> {
    if !transcript.is_fully_annotated() {
        debug!(
            transcript = %transcript.transcript_id,
            "skipping Alt-ORF scan of incompletely annotated transcript"
        );
        return Ok(Vec::new());
    }
    let (Some(cdna), Some(start), Some(coding)) = (
        transcript.cdna_sequence.as_deref(),
        transcript.start_codon_offset(),
        transcript.coding_sequence(),
    ) else {
        return Ok(Vec::new());
    };

    let orfs = scan_cdna(cdna.as_bytes(), start, coding.len(), options, table)
        .into_iter()
        .filter_map(|hit| match AltOrf::new(transcript, hit) {
            Ok(orf) => Some(orf),
            Err(e) => {
                warn!("skipping Alt-ORF: {e}");
                None
            }
        })
        .collect();
    Ok(orfs)
}
