//! Transcript and variant effect records supplied by the annotation provider.

use serde::Deserialize;

/// A transcript with its spliced cDNA and translated protein.
///
/// Offsets are 0-based positions within `cdna_sequence`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub transcript_id: String,
    #[serde(default)]
    pub transcript_name: String,
    #[serde(default)]
    pub gene_id: String,
    #[serde(default)]
    pub gene_name: String,
    #[serde(default)]
    pub protein_coding: bool,
    /// Whether the annotation has both start and stop codons.
    #[serde(default)]
    pub complete: bool,
    pub protein_sequence: Option<String>,
    pub cdna_sequence: Option<String>,
    #[serde(default)]
    pub start_codon_offsets: Vec<usize>,
    #[serde(default)]
    pub stop_codon_offsets: Vec<usize>,
}

impl Transcript {
    /// Protein-coding, complete, and carrying a protein product.
    #[must_use]
    pub fn has_reference_protein(&self) -> bool {
        self.protein_coding && self.complete && self.protein_sequence.is_some()
    }

    /// Everything the Alt-ORF scanner needs: a reference protein, a cDNA and
    /// an annotated start codon inside it.
    #[must_use]
    pub fn is_fully_annotated(&self) -> bool {
        self.has_reference_protein() && self.coding_sequence().is_some()
    }

    /// First base of the annotated start codon.
    #[must_use]
    pub fn start_codon_offset(&self) -> Option<usize> {
        self.start_codon_offsets.iter().copied().min()
    }

    /// cDNA from the start codon through the end of the last stop codon.
    ///
    /// Runs to the end of the cDNA when no stop codon is annotated.
    #[must_use]
    pub fn coding_sequence(&self) -> Option<&str> {
        let cdna = self.cdna_sequence.as_deref()?;
        let start = self.start_codon_offset()?;
        if start + 3 > cdna.len() {
            return None;
        }
        let end = self
            .stop_codon_offsets
            .iter()
            .copied()
            .max()
            .map_or(cdna.len(), |stop| (stop + 3).min(cdna.len()));
        if end <= start {
            return None;
        }
        cdna.get(start..end)
    }
}

/// The top-priority protein-coding effect of one genomic variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantEffect {
    /// Short description of the genomic variant, e.g. `chr17 g.7675088C>T`.
    pub variant: String,
    /// Short description of the protein change, e.g. `p.R175H`.
    pub short_description: String,
    pub transcript_id: String,
    #[serde(default)]
    pub transcript_name: String,
    #[serde(default)]
    pub gene_id: String,
    #[serde(default)]
    pub gene_name: String,
    pub mutant_protein_sequence: Option<String>,
}
