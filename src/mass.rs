//! Amino acid residue masses.

/// One amino acid residue with its masses in daltons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residue {
    pub code: u8,
    pub monoisotopic_mass: f64,
    pub average_mass: f64,
    pub three_letter: &'static str,
}

const fn residue(
    code: u8,
    monoisotopic_mass: f64,
    average_mass: f64,
    three_letter: &'static str,
) -> Residue {
    Residue {
        code,
        monoisotopic_mass,
        average_mass,
        three_letter,
    }
}

const RESIDUE_TABLE: [Residue; 21] = [
    residue(b'A', 71.037114, 71.0779, "Ala"),
    residue(b'R', 156.101111, 156.1857, "Arg"),
    residue(b'N', 114.042927, 114.1026, "Asn"),
    residue(b'D', 115.026943, 115.0874, "Asp"),
    residue(b'C', 103.009185, 103.1429, "Cys"),
    residue(b'E', 129.042593, 129.114, "Glu"),
    residue(b'Q', 128.058578, 128.1292, "Gln"),
    residue(b'G', 57.021464, 57.0513, "Gly"),
    residue(b'H', 137.058912, 137.1393, "His"),
    residue(b'I', 113.084064, 113.1576, "Ile"),
    residue(b'L', 113.084064, 113.1576, "Leu"),
    residue(b'K', 128.094963, 128.1723, "Lys"),
    residue(b'M', 131.040485, 131.1961, "Met"),
    residue(b'F', 147.068414, 147.1739, "Phe"),
    residue(b'P', 97.052764, 97.1152, "Pro"),
    residue(b'S', 87.032028, 87.0773, "Ser"),
    residue(b'T', 101.047679, 101.1039, "Thr"),
    residue(b'U', 150.95363, 150.0379, "Sec"),
    residue(b'W', 186.079313, 186.2099, "Trp"),
    residue(b'Y', 163.06332, 163.1733, "Tyr"),
    residue(b'V', 99.068414, 99.1311, "Val"),
];

/// The 20 standard residues plus selenocysteine.
pub static RESIDUES: [Residue; 21] = RESIDUE_TABLE;

const NO_RESIDUE: u8 = u8::MAX;

/// Byte-indexed position of each residue in `RESIDUES`.
static RESIDUE_INDEX: [u8; 256] = build_residue_index();

const fn build_residue_index() -> [u8; 256] {
    let mut index = [NO_RESIDUE; 256];
    let mut i = 0;
    while i < RESIDUE_TABLE.len() {
        index[RESIDUE_TABLE[i].code as usize] = i as u8;
        i += 1;
    }
    index
}

/// Look up a residue by its one-letter code (upper case).
#[must_use]
pub fn residue_for(code: u8) -> Option<&'static Residue> {
    match RESIDUE_INDEX[code as usize] {
        NO_RESIDUE => None,
        i => Some(&RESIDUES[i as usize]),
    }
}

fn sum_masses(peptide: &[u8], mass: fn(&Residue) -> f64) -> Option<f64> {
    peptide
        .iter()
        .map(|&aa| residue_for(aa).map(mass))
        .sum()
}

/// Sum of average residue masses, or `None` if any residue is unknown.
#[must_use]
pub fn average_mass(peptide: &[u8]) -> Option<f64> {
    sum_masses(peptide, |r| r.average_mass)
}

/// Sum of monoisotopic residue masses, or `None` if any residue is unknown.
#[must_use]
pub fn monoisotopic_mass(peptide: &[u8]) -> Option<f64> {
    sum_masses(peptide, |r| r.monoisotopic_mass)
}
