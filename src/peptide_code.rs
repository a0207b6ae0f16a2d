//! Compact integer codes for short peptides.
//!
//! Each residue is a base-22 digit (zero marks the end of the peptide), with
//! the first residue in the least significant position. Dropping the first
//! residue is then a division and dropping the last a remainder.

use crate::error::Error;

const ALPHABET: &[u8; 21] = b"RHKDESTNQCGPAVILMFYWU";
const BASE: u128 = ALPHABET.len() as u128 + 1;

/// Longest peptide whose code fits in a `u128`.
pub const MAX_ENCODED_LENGTH: usize = 28;

const fn build_digits() -> [u8; 256] {
    let mut digits = [0u8; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        digits[ALPHABET[i] as usize] = i as u8 + 1;
        digits[ALPHABET[i].to_ascii_lowercase() as usize] = i as u8 + 1;
        i += 1;
    }
    digits
}

static DIGITS: [u8; 256] = build_digits();

/// A peptide packed into a `u128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeptideCode(u128);

impl PeptideCode {
    pub fn encode(peptide: &str) -> Result<Self, Error> {
        if peptide.len() > MAX_ENCODED_LENGTH {
            return Err(Error::Validation(format!(
                "peptide of length {} exceeds the encodable maximum of {MAX_ENCODED_LENGTH}",
                peptide.len()
            )));
        }
        let mut code = 0u128;
        for &residue in peptide.as_bytes().iter().rev() {
            let digit = DIGITS[residue as usize];
            if digit == 0 {
                return Err(Error::Validation(format!(
                    "cannot encode amino acid '{}'",
                    residue as char
                )));
            }
            code = code * BASE + u128::from(digit);
        }
        Ok(Self(code))
    }

    #[must_use]
    pub fn decode(self) -> String {
        let mut peptide = String::with_capacity(self.len());
        let mut code = self.0;
        while code > 0 {
            let digit = (code % BASE) as usize;
            peptide.push(ALPHABET[digit - 1] as char);
            code /= BASE;
        }
        peptide
    }

    #[must_use]
    pub fn len(self) -> usize {
        let mut n = 0;
        let mut code = self.0;
        while code > 0 {
            n += 1;
            code /= BASE;
        }
        n
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn drop_first(self) -> Self {
        Self(self.0 / BASE)
    }

    #[must_use]
    pub fn drop_last(self) -> Self {
        match self.len() {
            0 => self,
            n => Self(self.0 % BASE.pow(n as u32 - 1)),
        }
    }

    #[must_use]
    pub fn value(self) -> u128 {
        self.0
    }
}
