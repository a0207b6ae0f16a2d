//! Uniform record for every generated protein or peptide sequence.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Write;

use crate::error::Error;
use crate::fasta;
use crate::mass;

pub const LENGTH_KEY: &str = "length";
pub const MASS_KEY: &str = "mass";
pub const SOURCE_KEY: &str = "source";

/// Attribute mapping, kept sorted by key so FASTA headers are stable.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Where a sequence came from.
///
/// The declaration order of the first six kinds is also their collapsing
/// priority: a peptide seen in a reference protein is reported as reference
/// even if an Alt-ORF produced it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SequenceKind {
    Reference,
    Mutant,
    UpstreamOrf,
    DownstreamOrf,
    GenericAltOrf,
    /// Plain sequence with no biological kind, also the kind of collapsed peptides.
    Aggregate,
    Decoy,
}

impl SequenceKind {
    /// Kinds that may be collapsed, highest priority first.
    pub const PRIORITY_ORDER: [SequenceKind; 6] = [
        Self::Reference,
        Self::Mutant,
        Self::UpstreamOrf,
        Self::DownstreamOrf,
        Self::GenericAltOrf,
        Self::Aggregate,
    ];

    /// Position in `PRIORITY_ORDER` (0 is highest), `None` for decoys.
    #[must_use]
    pub fn priority(self) -> Option<usize> {
        Self::PRIORITY_ORDER.iter().position(|&k| k == self)
    }

    /// Name used as the prefix of collapsed peptide names.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Reference => "Reference",
            Self::Mutant => "Mutant",
            Self::UpstreamOrf => "UpstreamORF",
            Self::DownstreamOrf => "DownstreamORF",
            Self::GenericAltOrf => "AltORF",
            Self::Aggregate => "Sequence",
            Self::Decoy => "Decoy",
        }
    }

    /// Value of the `source` attribute carried by records of this kind.
    #[must_use]
    pub fn source_tag(self) -> Option<&'static str> {
        match self {
            Self::Reference => Some("reference"),
            Self::Mutant => Some("mutation"),
            Self::UpstreamOrf => Some("upstream_orf"),
            Self::DownstreamOrf => Some("downstream_orf"),
            Self::GenericAltOrf => Some("alt_orf"),
            Self::Aggregate => None,
            Self::Decoy => Some("decoy"),
        }
    }

    #[must_use]
    pub fn from_source_tag(tag: &str) -> Option<Self> {
        [
            Self::Reference,
            Self::Mutant,
            Self::UpstreamOrf,
            Self::DownstreamOrf,
            Self::GenericAltOrf,
            Self::Decoy,
        ]
        .into_iter()
        .find(|k| k.source_tag() == Some(tag))
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Value of one record attribute.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    /// Values merged from several source records.
    Set(BTreeSet<String>),
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Flag(a), Self::Flag(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttributeValue {}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:.4}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Set(values) => {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// An immutable named amino acid sequence with metadata.
///
/// `length` and `mass` attributes are always derived from the residues and
/// override any caller-supplied values.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    kind: SequenceKind,
    name: String,
    amino_acids: String,
    mass: f64,
    attributes: Attributes,
}

impl SequenceRecord {
    pub fn new(
        kind: SequenceKind,
        name: impl Into<String>,
        amino_acids: impl Into<String>,
        mut attributes: Attributes,
    ) -> Result<Self, Error> {
        let name = name.into();
        let mut amino_acids = amino_acids.into();
        amino_acids.make_ascii_uppercase();

        if name.is_empty() {
            return Err(Error::Validation("sequence record has an empty name".to_string()));
        }
        if amino_acids.is_empty() {
            return Err(Error::Validation(format!("{name}: empty amino acid sequence")));
        }
        let mass = mass::average_mass(amino_acids.as_bytes()).ok_or_else(|| {
            let bad = amino_acids
                .chars()
                .find(|&c| !c.is_ascii() || mass::residue_for(c as u8).is_none())
                .unwrap_or('?');
            Error::Validation(format!("{name}: unknown amino acid '{bad}'"))
        })?;

        attributes.insert(
            LENGTH_KEY.to_string(),
            AttributeValue::Integer(amino_acids.len() as i64),
        );
        attributes.insert(MASS_KEY.to_string(), AttributeValue::Float(mass));

        Ok(Self {
            kind,
            name,
            amino_acids,
            mass,
            attributes,
        })
    }

    /// Rebuild a record from a FASTA entry whose description holds `key=value` pairs.
    ///
    /// The kind is recovered from the `source` tag; entries without a known tag
    /// become plain sequences. Attribute values come back as text.
    pub fn from_fasta_entry(name: &str, description: &str, sequence: &str) -> Result<Self, Error> {
        let mut attributes = Attributes::new();
        for token in description.split_whitespace() {
            if let Some((key, value)) = token.split_once('=') {
                if key == LENGTH_KEY || key == MASS_KEY || key.is_empty() {
                    continue;
                }
                attributes.insert(key.to_string(), AttributeValue::from(value));
            }
        }
        let kind = match attributes.get(SOURCE_KEY) {
            Some(AttributeValue::Text(tag)) => {
                SequenceKind::from_source_tag(tag).unwrap_or(SequenceKind::Aggregate)
            }
            _ => SequenceKind::Aggregate,
        };
        Self::new(kind, name, sequence, attributes)
    }

    #[must_use]
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn amino_acids(&self) -> &str {
        &self.amino_acids
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.amino_acids.len()
    }

    /// Sum of average residue masses in daltons.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Space-joined `key=value` pairs in key order.
    #[must_use]
    pub fn attribute_string(&self) -> String {
        self.attributes
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Header line content without the leading `>`.
    #[must_use]
    pub fn fasta_header(&self) -> String {
        format!("{} {}", self.name, self.attribute_string())
    }

    /// Write this record as one FASTA entry.
    pub fn write_fasta<W: Write>(&self, writer: &mut W, line_width: usize) -> Result<(), Error> {
        fasta::write_entry(
            writer,
            &self.name,
            &self.attribute_string(),
            self.amino_acids.as_bytes(),
            line_width,
        )
    }
}

impl PartialEq for SequenceRecord {
    /// Same name and residues, and no attribute key present on both sides disagrees.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.amino_acids == other.amino_acids
            && self
                .attributes
                .iter()
                .all(|(k, v)| other.attributes.get(k).is_none_or(|o| o == v))
    }
}

// No `Eq`: matching on shared keys only is not transitive, since a record
// without an attribute equals two records that disagree on it.

/// Hashes name and residues only, so records equal under `PartialEq` hash alike.
impl Hash for SequenceRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.amino_acids.hash(state);
    }
}
