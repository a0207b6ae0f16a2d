//! Collapse each peptide's contributors into one aggregate record.
//!
//! Only contributors of the highest-priority kind survive; their attributes
//! are merged into sets so a peptide shared by several genes of the same
//! kind keeps every gene.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::Error;
use crate::sequence::{AttributeValue, LENGTH_KEY, MASS_KEY, SequenceKind, SequenceRecord};

use super::extract::PeptideIndex;

const GENE_NAME_KEY: &str = "gene_name";

/// A unique peptide and the kind of source it was attributed to.
#[derive(Debug, Clone)]
pub struct CollapsedPeptide {
    retained_kind: SequenceKind,
    record: SequenceRecord,
}

impl CollapsedPeptide {
    #[must_use]
    pub fn retained_kind(&self) -> SequenceKind {
        self.retained_kind
    }

    #[must_use]
    pub fn record(&self) -> &SequenceRecord {
        &self.record
    }

    #[must_use]
    pub fn into_record(self) -> SequenceRecord {
        self.record
    }
}

/// Collapse every peptide of `index`, in index order.
///
/// Names are `<Kind>-<sorted gene names>-<n>` (or `<Kind>-<n>` without gene
/// names), where `n` counts peptides sharing the same prefix.
pub fn collapse_peptide_sources(index: &PeptideIndex<'_>) -> Result<Vec<CollapsedPeptide>, Error> {
    let mut name_group_counts: HashMap<String, usize> = HashMap::new();
    let mut collapsed = Vec::with_capacity(index.len());

    for (peptide, sources) in index.iter() {
        let (retained_kind, retained) = keep_max_priority_sources(peptide, sources)?;
        let merged = merge_attributes(&retained);

        let gene_names: Vec<&str> = merged
            .get(GENE_NAME_KEY)
            .map(|genes| {
                genes
                    .iter()
                    .map(String::as_str)
                    .filter(|g| !g.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let name_group = if gene_names.is_empty() {
            retained_kind.type_name().to_string()
        } else {
            format!("{}-{}", retained_kind.type_name(), gene_names.join("-"))
        };
        let count = name_group_counts.entry(name_group.clone()).or_insert(0);
        *count += 1;
        let name = format!("{name_group}-{count}");

        let attributes = merged
            .into_iter()
            .map(|(key, values)| (key, AttributeValue::Set(values)))
            .collect();
        let record = SequenceRecord::new(SequenceKind::Aggregate, name, peptide, attributes)?;
        collapsed.push(CollapsedPeptide {
            retained_kind,
            record,
        });
    }

    debug!(
        peptides = collapsed.len(),
        name_groups = name_group_counts.len(),
        "collapsed peptide sources"
    );
    Ok(collapsed)
}

/// Keep the contributors whose kind ranks highest, preserving their order.
fn keep_max_priority_sources<'a>(
    peptide: &str,
    sources: &[&'a SequenceRecord],
) -> Result<(SequenceKind, Vec<&'a SequenceRecord>), Error> {
    let mut best: Option<(usize, SequenceKind)> = None;
    for source in sources {
        let kind = source.kind();
        let priority = kind.priority().ok_or_else(|| {
            Error::Invariant(format!(
                "{} of kind {kind} cannot contribute to peptide {peptide}",
                source.name()
            ))
        })?;
        if best.is_none_or(|(best_priority, _)| priority < best_priority) {
            best = Some((priority, kind));
        }
    }
    let Some((_, kind)) = best else {
        return Err(Error::Invariant(format!(
            "peptide {peptide} has no source sequences"
        )));
    };
    let retained = sources
        .iter()
        .copied()
        .filter(|s| s.kind() == kind)
        .collect();
    Ok((kind, retained))
}

/// Union attribute values across records. Derived attributes are skipped
/// since they describe the full-length sources, not the peptide.
fn merge_attributes(sources: &[&SequenceRecord]) -> BTreeMap<String, BTreeSet<String>> {
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for source in sources {
        for (key, value) in source.attributes() {
            if key == LENGTH_KEY || key == MASS_KEY {
                continue;
            }
            let values = merged.entry(key.clone()).or_default();
            match value {
                AttributeValue::Set(set) => values.extend(set.iter().cloned()),
                other => {
                    values.insert(other.to_string());
                }
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peptides::extract_peptides;
    use crate::sequence::{Attributes, SOURCE_KEY};

    fn record(kind: SequenceKind, name: &str, aa: &str, gene: Option<&str>) -> SequenceRecord {
        let mut attributes = Attributes::new();
        if let Some(tag) = kind.source_tag() {
            attributes.insert(SOURCE_KEY.to_string(), tag.into());
        }
        if let Some(gene) = gene {
            attributes.insert("gene_name".to_string(), gene.into());
            attributes.insert("transcript_id".to_string(), format!("{name}-tx").into());
        }
        SequenceRecord::new(kind, name, aa, attributes).unwrap()
    }

    fn set(values: &[&str]) -> AttributeValue {
        AttributeValue::Set(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn reference_outranks_upstream_orf() {
        let seqs = vec![
            record(SequenceKind::UpstreamOrf, "Upstream-T9-30nt", "SIINFEKL", Some("MYC")),
            record(SequenceKind::Reference, "ref-T1", "SIINFEKL", Some("TP53")),
        ];
        let index = extract_peptides(&seqs, 8, 8).unwrap();
        let collapsed = collapse_peptide_sources(&index).unwrap();
        assert_eq!(collapsed.len(), 1);

        let peptide = &collapsed[0];
        assert_eq!(peptide.retained_kind(), SequenceKind::Reference);
        let rec = peptide.record();
        assert_eq!(rec.kind(), SequenceKind::Aggregate);
        assert_eq!(rec.name(), "Reference-TP53-1");
        assert_eq!(rec.attribute("gene_name"), Some(&set(&["TP53"])));
        assert_eq!(rec.attribute("source"), Some(&set(&["reference"])));
        assert_eq!(rec.attribute("transcript_id"), Some(&set(&["ref-T1-tx"])));
    }

    #[test]
    fn same_kind_sources_are_merged() {
        let seqs = vec![
            record(SequenceKind::Reference, "ref-T1", "SIINFEKL", Some("TP53")),
            record(SequenceKind::Reference, "ref-T2", "SIINFEKL", Some("MDM2")),
            record(SequenceKind::Mutant, "mut-x-T3", "SIINFEKL", Some("KRAS")),
        ];
        let index = extract_peptides(&seqs, 8, 8).unwrap();
        let collapsed = collapse_peptide_sources(&index).unwrap();
        let rec = collapsed[0].record();
        assert_eq!(rec.name(), "Reference-MDM2-TP53-1");
        assert_eq!(rec.attribute("gene_name"), Some(&set(&["MDM2", "TP53"])));
        assert_eq!(
            rec.attribute("transcript_id"),
            Some(&set(&["ref-T1-tx", "ref-T2-tx"]))
        );
    }

    #[test]
    fn derived_attributes_describe_the_peptide() {
        let seqs = vec![record(SequenceKind::Reference, "ref-T1", "MSIINFEKLG", Some("TP53"))];
        let index = extract_peptides(&seqs, 8, 8).unwrap();
        let collapsed = collapse_peptide_sources(&index).unwrap();
        for peptide in &collapsed {
            assert_eq!(
                peptide.record().attribute(LENGTH_KEY),
                Some(&AttributeValue::Integer(8))
            );
        }
    }

    #[test]
    fn names_are_unique_within_a_gene() {
        let seqs = vec![record(SequenceKind::Reference, "ref-T1", "MSIINFEKLG", Some("TP53"))];
        let index = extract_peptides(&seqs, 8, 9).unwrap();
        let collapsed = collapse_peptide_sources(&index).unwrap();
        let names: Vec<&str> = collapsed.iter().map(|c| c.record().name()).collect();
        assert_eq!(
            names,
            vec![
                "Reference-TP53-1",
                "Reference-TP53-2",
                "Reference-TP53-3",
                "Reference-TP53-4",
                "Reference-TP53-5",
            ]
        );
    }

    #[test]
    fn names_unique_across_groups() {
        let seqs = vec![
            record(SequenceKind::Reference, "ref-T1", "MSIINFEKLG", Some("TP53")),
            record(SequenceKind::DownstreamOrf, "Downstream-T1-9nt", "KKKKRRRRW", Some("TP53")),
            record(SequenceKind::Aggregate, "extra", "WWWWPPPPG", None),
        ];
        let index = extract_peptides(&seqs, 7, 9).unwrap();
        let collapsed = collapse_peptide_sources(&index).unwrap();
        let mut names: Vec<&str> = collapsed.iter().map(|c| c.record().name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(names.contains(&"DownstreamORF-TP53-1"));
        assert!(names.contains(&"Sequence-1"));
    }

    #[test]
    fn empty_contributor_list_is_an_invariant_violation() {
        let mut index = PeptideIndex::new();
        index.insert("SIINFEKL", Vec::new());
        let err = collapse_peptide_sources(&index).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[test]
    fn decoy_contributor_is_an_invariant_violation() {
        let decoy = record(SequenceKind::Decoy, "Decoy-1", "LKEFNIIS", None);
        let mut index = PeptideIndex::new();
        index.insert("LKEFNIIS", vec![&decoy]);
        let err = collapse_peptide_sources(&index).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }
}
