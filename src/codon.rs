//! Standard genetic code and open reading frame translation.

/// Amino acid emitted for a stop codon.
pub const STOP: u8 = b'*';

/// Amino acid emitted for a codon containing an ambiguous base.
pub const UNKNOWN: u8 = b'X';

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding: A=0, C=1, G=2, T/U=3.
/// Index = first*16 + second*4 + third.
pub struct CodonTable {
    table: [u8; 64],
}

fn base_to_index(b: u8) -> Option<usize> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

/// Result of translating from a start codon up to the first in-frame stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrfTranslation {
    /// Translated residues, excluding the stop.
    pub amino_acids: Vec<u8>,
    /// False when translation ran off the end of the sequence instead.
    pub ends_with_stop_codon: bool,
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        #[rustfmt::skip]
        let table: [u8; 64] = [
            b'K', b'N', b'K', b'N',  // AA*
            b'T', b'T', b'T', b'T',  // AC*
            b'R', b'S', b'R', b'S',  // AG*
            b'I', b'I', b'M', b'I',  // AT*
            b'Q', b'H', b'Q', b'H',  // CA*
            b'P', b'P', b'P', b'P',  // CC*
            b'R', b'R', b'R', b'R',  // CG*
            b'L', b'L', b'L', b'L',  // CT*
            b'E', b'D', b'E', b'D',  // GA*
            b'A', b'A', b'A', b'A',  // GC*
            b'G', b'G', b'G', b'G',  // GG*
            b'V', b'V', b'V', b'V',  // GT*
            b'*', b'Y', b'*', b'Y',  // TA*
            b'S', b'S', b'S', b'S',  // TC*
            b'*', b'C', b'W', b'C',  // TG*
            b'L', b'F', b'L', b'F',  // TT*
        ];
        Self { table }
    }

    /// Translate a single codon. Short or ambiguous codons yield `X`.
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        if codon.len() < 3 {
            return UNKNOWN;
        }
        match (
            base_to_index(codon[0]),
            base_to_index(codon[1]),
            base_to_index(codon[2]),
        ) {
            (Some(a), Some(b), Some(c)) => self.table[a * 16 + b * 4 + c],
            _ => UNKNOWN,
        }
    }

    /// Translate in frame from the first base of `seq` until a stop codon.
    ///
    /// A trailing partial codon is ignored.
    #[must_use]
    pub fn translate_orf(&self, seq: &[u8]) -> OrfTranslation {
        let mut amino_acids = Vec::with_capacity(seq.len() / 3);
        for codon in seq.chunks_exact(3) {
            let aa = self.translate_codon(codon);
            if aa == STOP {
                return OrfTranslation {
                    amino_acids,
                    ends_with_stop_codon: true,
                };
            }
            amino_acids.push(aa);
        }
        OrfTranslation {
            amino_acids,
            ends_with_stop_codon: false,
        }
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_start_and_stops() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATG"), b'M');
        assert_eq!(table.translate_codon(b"TAA"), STOP);
        assert_eq!(table.translate_codon(b"TAG"), STOP);
        assert_eq!(table.translate_codon(b"TGA"), STOP);
        assert_eq!(table.translate_codon(b"uga"), STOP);
    }

    #[test]
    fn ambiguous_and_short_codons() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"NNN"), UNKNOWN);
        assert_eq!(table.translate_codon(b"AT"), UNKNOWN);
    }

    #[test]
    fn orf_stops_at_first_stop() {
        let table = CodonTable::standard();
        // ATG GCA TGC TAA GGG = M A C * G
        let orf = table.translate_orf(b"ATGGCATGCTAAGGG");
        assert_eq!(orf.amino_acids, b"MAC");
        assert!(orf.ends_with_stop_codon);
    }

    #[test]
    fn orf_runs_off_end() {
        let table = CodonTable::standard();
        // ATG GCA TG (partial)
        let orf = table.translate_orf(b"ATGGCATG");
        assert_eq!(orf.amino_acids, b"MA");
        assert!(!orf.ends_with_stop_codon);
    }

    #[test]
    fn orf_empty_input() {
        let orf = CodonTable::default().translate_orf(b"");
        assert!(orf.amino_acids.is_empty());
        assert!(!orf.ends_with_stop_codon);
    }
}
