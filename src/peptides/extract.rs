//! Sliding-window k-mer extraction.

use std::fmt;
use std::hash::BuildHasher;

use hashbrown::{DefaultHashBuilder, HashTable};
use indicatif::ProgressBar;
use tracing::debug;

use crate::error::Error;
use crate::sequence::SequenceRecord;

/// Peptides in first-seen order, each with the records that contain it.
///
/// A record is listed at most once per peptide even when the peptide occurs
/// at several positions within it. Each peptide string is stored once; the
/// hash table holds indices into `entries`.
#[derive(Default)]
pub struct PeptideIndex<'a> {
    hasher: DefaultHashBuilder,
    positions: HashTable<usize>,
    entries: Vec<(Box<str>, Vec<&'a SequenceRecord>)>,
}

impl fmt::Debug for PeptideIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeptideIndex")
            .field("peptides", &self.entries.len())
            .finish()
    }
}

impl<'a> PeptideIndex<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, peptide: &str) -> Option<usize> {
        let hash = self.hasher.hash_one(peptide);
        self.positions
            .find(hash, |&i| &*self.entries[i].0 == peptide)
            .copied()
    }

    fn push_new(&mut self, peptide: Box<str>, sources: Vec<&'a SequenceRecord>) {
        let hash = self.hasher.hash_one(&*peptide);
        let index = self.entries.len();
        self.entries.push((peptide, sources));
        let (entries, hasher) = (&self.entries, &self.hasher);
        self.positions
            .insert_unique(hash, index, |&i| hasher.hash_one(&*entries[i].0));
    }

    /// Record that `source` contains `peptide`. All windows of one source are
    /// added consecutively, so comparing against the last contributor suffices.
    fn add(&mut self, peptide: &[u8], source: &'a SequenceRecord) {
        // Residues were validated as ASCII when the record was built.
        let peptide = std::str::from_utf8(peptide).unwrap_or_default();
        match self.position(peptide) {
            Some(i) => {
                let sources = &mut self.entries[i].1;
                if !sources.last().is_some_and(|last| std::ptr::eq(*last, source)) {
                    sources.push(source);
                }
            }
            None => self.push_new(Box::from(peptide), vec![source]),
        }
    }

    /// Insert a peptide with an explicit contributor list.
    ///
    /// Extraction never produces an empty list; this is the seam for
    /// assembling indexes by hand.
    pub fn insert(&mut self, peptide: impl Into<String>, sources: Vec<&'a SequenceRecord>) {
        let peptide = peptide.into();
        match self.position(&peptide) {
            Some(i) => self.entries[i].1 = sources,
            None => self.push_new(peptide.into_boxed_str(), sources),
        }
    }

    #[must_use]
    pub fn get(&self, peptide: &str) -> Option<&[&'a SequenceRecord]> {
        self.position(peptide)
            .map(|i| self.entries[i].1.as_slice())
    }

    #[must_use]
    pub fn contains(&self, peptide: &str) -> bool {
        self.position(peptide).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(peptide, sources)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a SequenceRecord])> {
        self.entries
            .iter()
            .map(|(peptide, sources)| (&**peptide, sources.as_slice()))
    }
}

/// Extract every peptide of length `min_length..=max_length` from `sequences`.
pub fn extract_peptides(
    sequences: &[SequenceRecord],
    min_length: usize,
    max_length: usize,
) -> Result<PeptideIndex<'_>, Error> {
    extract_peptides_with_progress(sequences, min_length, max_length, &ProgressBar::hidden())
}

/// As [`extract_peptides`], advancing `progress` once per scanned sequence.
pub fn extract_peptides_with_progress<'a>(
    sequences: &'a [SequenceRecord],
    min_length: usize,
    max_length: usize,
    progress: &ProgressBar,
) -> Result<PeptideIndex<'a>, Error> {
    if min_length == 0 {
        return Err(Error::Validation(
            "minimum peptide length must be at least 1".to_string(),
        ));
    }
    if min_length > max_length {
        return Err(Error::Validation(format!(
            "minimum peptide length {min_length} exceeds maximum {max_length}"
        )));
    }

    progress.set_length(sequences.len() as u64);
    let mut index = PeptideIndex::new();
    for record in sequences {
        let residues = record.amino_acids().as_bytes();
        for k in min_length..=max_length.min(residues.len()) {
            for window in residues.windows(k) {
                index.add(window, record);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    debug!(
        sequences = sequences.len(),
        peptides = index.len(),
        "extracted peptides"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{Attributes, SequenceKind};

    fn record(name: &str, aa: &str) -> SequenceRecord {
        SequenceRecord::new(SequenceKind::Aggregate, name, aa, Attributes::new()).unwrap()
    }

    #[test]
    fn siinfekl_peptides() {
        let seqs = vec![record("test-seq", "SIINFEKL")];
        let index = extract_peptides(&seqs, 7, 8).unwrap();
        let mut peptides: Vec<&str> = index.iter().map(|(p, _)| p).collect();
        peptides.sort_unstable();
        assert_eq!(peptides, vec!["IINFEKL", "SIINFEK", "SIINFEKL"]);
    }

    #[test]
    fn window_counts_and_slices() {
        // No k-mer of length 3 or more repeats within this sequence.
        let s = "MEEPQSDPSVEPPLSQETFS";
        let seqs = vec![record("p", s)];
        let index = extract_peptides(&seqs, 3, 6).unwrap();
        for k in 3..=6 {
            for i in 0..=s.len() - k {
                assert!(index.contains(&s[i..i + k]));
            }
            let n = index.iter().filter(|(p, _)| p.len() == k).count();
            assert_eq!(n, s.len() - k + 1);
        }
        assert!(index.iter().all(|(p, _)| s.contains(p)));
    }

    #[test]
    fn first_seen_order() {
        let seqs = vec![record("p", "MAKLV")];
        let index = extract_peptides(&seqs, 2, 3).unwrap();
        let peptides: Vec<&str> = index.iter().map(|(p, _)| p).collect();
        assert_eq!(peptides, vec!["MA", "AK", "KL", "LV", "MAK", "AKL", "KLV"]);
    }

    #[test]
    fn short_sequences_contribute_nothing() {
        let seqs = vec![record("short", "MAK")];
        let index = extract_peptides(&seqs, 7, 11).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn source_recorded_once_per_peptide() {
        let seqs = vec![record("repeat", "MAKMAKMAK"), record("other", "GGMAKGG")];
        let index = extract_peptides(&seqs, 3, 3).unwrap();
        let sources = index.get("MAK").unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["repeat", "other"]);
    }

    #[test]
    fn shared_peptides_list_every_source() {
        let seqs = vec![record("a", "SIINFEKL"), record("b", "SIINFEKLG")];
        let index = extract_peptides(&seqs, 8, 8).unwrap();
        assert_eq!(index.get("SIINFEKL").unwrap().len(), 2);
        assert_eq!(index.get("IINFEKLG").unwrap().len(), 1);
    }

    #[test]
    fn lookups_survive_table_growth() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let residues = b"ACDEFGHIKLMNPQRSTVWY";
        let mut rng = StdRng::seed_from_u64(3);
        let proteome: String = (0..2000)
            .map(|_| residues[rng.gen_range(0..residues.len())] as char)
            .collect();
        let seqs = vec![record("p", &proteome)];
        let index = extract_peptides(&seqs, 4, 6).unwrap();
        assert!(index.len() > 1000);
        for (peptide, sources) in index.iter() {
            assert_eq!(index.get(peptide), Some(sources));
        }
        assert!(!index.contains("SIINFEKL"));
    }

    #[test]
    fn insert_replaces_existing_sources() {
        let a = record("a", "SIINFEKL");
        let b = record("b", "SIINFEKL");
        let mut index = PeptideIndex::new();
        index.insert("SIINFEKL", vec![&a]);
        index.insert("GILGFVFTL", vec![&a]);
        index.insert(String::from("SIINFEKL"), vec![&b]);
        assert_eq!(index.len(), 2);
        let names: Vec<&str> = index.get("SIINFEKL").unwrap().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["b"]);
        let order: Vec<&str> = index.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec!["SIINFEKL", "GILGFVFTL"]);
    }

    #[test]
    fn invalid_length_range() {
        let seqs = vec![record("p", "SIINFEKL")];
        assert!(extract_peptides(&seqs, 9, 8).is_err());
        assert!(extract_peptides(&seqs, 0, 8).is_err());
    }
}
