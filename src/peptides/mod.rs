//! Peptide enumeration: k-mer extraction with provenance, then collapsing by
//! source priority.

pub mod collapse;
pub mod extract;

pub use collapse::{CollapsedPeptide, collapse_peptide_sources};
pub use extract::{PeptideIndex, extract_peptides, extract_peptides_with_progress};

/// Shortest peptide length extracted unless configured otherwise.
pub const DEFAULT_MIN_LENGTH: usize = 7;

/// Longest peptide length extracted unless configured otherwise.
pub const DEFAULT_MAX_LENGTH: usize = 20;
