//! JSON annotation loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;

use crate::error::Error;

use super::types::{Transcript, VariantEffect};

/// Transcripts and variant effects for one run.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub transcripts: Vec<Transcript>,
    #[serde(default)]
    pub variant_effects: Vec<VariantEffect>,
}

impl Annotation {
    /// Load from a JSON file, decompressing it when the path ends in `.gz`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        if path.extension().is_some_and(|ext| ext == "gz") {
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(BufReader::new(reader))
            .map_err(|e| Error::Parse(format!("invalid annotation JSON: {e}")))
    }

    /// Number of transcripts with a reference protein.
    #[must_use]
    pub fn num_coding_transcripts(&self) -> usize {
        self.transcripts
            .iter()
            .filter(|t| t.has_reference_protein())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    const ANNOTATION_JSON: &str = r#"{
        "transcripts": [
            {
                "transcriptId": "ENST00000269305",
                "transcriptName": "TP53-201",
                "geneId": "ENSG00000141510",
                "geneName": "TP53",
                "proteinCoding": true,
                "complete": true,
                "proteinSequence": "MEEPQSDPSV",
                "cdnaSequence": "GCCACCATGGAGGAG",
                "startCodonOffsets": [6],
                "stopCodonOffsets": []
            },
            { "transcriptId": "ENST00000000001" }
        ],
        "variantEffects": [
            {
                "variant": "chr17 g.7675088C>T",
                "shortDescription": "p.R175H",
                "transcriptId": "ENST00000269305",
                "geneName": "TP53",
                "mutantProteinSequence": "MEEPQSDPSH"
            }
        ]
    }"#;

    #[test]
    fn parse_annotation() {
        let annotation = Annotation::from_reader(Cursor::new(ANNOTATION_JSON)).unwrap();
        assert_eq!(annotation.transcripts.len(), 2);
        assert_eq!(annotation.num_coding_transcripts(), 1);
        assert_eq!(annotation.transcripts[0].start_codon_offset(), Some(6));
        assert!(!annotation.transcripts[1].protein_coding);
        assert_eq!(annotation.variant_effects[0].short_description, "p.R175H");
        assert_eq!(annotation.variant_effects[0].transcript_name, "");
    }

    #[test]
    fn parse_gz_annotation_from_path() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(ANNOTATION_JSON.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotation.json.gz");
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let annotation = Annotation::from_path(&path).unwrap();
        assert_eq!(annotation.variant_effects.len(), 1);
    }

    #[test]
    fn invalid_json() {
        let err = Annotation::from_reader(Cursor::new("{ not json")).unwrap_err();
        assert!(err.to_string().contains("invalid annotation JSON"));
    }

    #[test]
    fn empty_document() {
        let annotation = Annotation::from_reader(Cursor::new("{}")).unwrap();
        assert!(annotation.transcripts.is_empty());
        assert!(annotation.variant_effects.is_empty());
    }
}
