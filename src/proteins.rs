//! Reference and mutant protein records built from annotation.

use crate::error::Error;
use crate::sequence::{AttributeValue, Attributes, SOURCE_KEY, SequenceKind, SequenceRecord};
use crate::transcript::{Transcript, VariantEffect};

fn identity_attributes(
    kind: SequenceKind,
    transcript_id: &str,
    transcript_name: &str,
    gene_id: &str,
    gene_name: &str,
) -> Attributes {
    let mut attributes = Attributes::new();
    if let Some(tag) = kind.source_tag() {
        attributes.insert(SOURCE_KEY.to_string(), tag.into());
    }
    for (key, value) in [
        ("transcript_id", transcript_id),
        ("transcript_name", transcript_name),
        ("gene_id", gene_id),
        ("gene_name", gene_name),
    ] {
        attributes.insert(key.to_string(), AttributeValue::from(value));
    }
    attributes
}

fn strip_terminal_stop(protein: &str) -> &str {
    protein.strip_suffix('*').unwrap_or(protein)
}

/// Build the reference protein record of a coding transcript.
///
/// Fails for transcripts that are non-coding, incomplete, or lack a protein.
pub fn reference_sequence(transcript: &Transcript) -> Result<SequenceRecord, Error> {
    if !transcript.has_reference_protein() {
        return Err(Error::Validation(format!(
            "{}: not a complete protein-coding transcript",
            transcript.transcript_id
        )));
    }
    let protein = transcript.protein_sequence.as_deref().unwrap_or_default();
    let kind = SequenceKind::Reference;
    SequenceRecord::new(
        kind,
        format!("ref-{}", transcript.transcript_id),
        strip_terminal_stop(protein),
        identity_attributes(
            kind,
            &transcript.transcript_id,
            &transcript.transcript_name,
            &transcript.gene_id,
            &transcript.gene_name,
        ),
    )
}

/// Build the mutant protein record of a variant effect.
pub fn mutant_sequence(effect: &VariantEffect) -> Result<SequenceRecord, Error> {
    let Some(protein) = effect.mutant_protein_sequence.as_deref() else {
        return Err(Error::Validation(format!(
            "{} ({}): no mutant protein sequence",
            effect.variant, effect.transcript_id
        )));
    };
    let protein_effect = effect.short_description.replace(' ', "-");
    let kind = SequenceKind::Mutant;
    let mut attributes = identity_attributes(
        kind,
        &effect.transcript_id,
        &effect.transcript_name,
        &effect.gene_id,
        &effect.gene_name,
    );
    attributes.insert(
        "genomic_variant".to_string(),
        AttributeValue::from(effect.variant.replace(' ', "-")),
    );
    attributes.insert(
        "protein_effect".to_string(),
        AttributeValue::from(protein_effect.as_str()),
    );
    SequenceRecord::new(
        kind,
        format!("mut-{protein_effect}-{}", effect.transcript_id),
        strip_terminal_stop(protein),
        attributes,
    )
}
