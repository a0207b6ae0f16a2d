//! Kozak-context translation initiation scoring.
//!
//! Consensus positions in upper case are strong (10 points on a match), lower
//! case positions are weak (1 point). `R` matches either purine.

/// Consensus for the six bases immediately 5' of the start codon.
pub const CONSENSUS_BEFORE_START: &[u8; 6] = b"gccRcc";

/// Consensus for the three bases immediately 3' of the start codon.
pub const CONSENSUS_AFTER_START: &[u8; 3] = b"Gcg";

/// Near-cognate start codons that still initiate at a reduced rate.
pub const ALT_START_CODONS: [&[u8; 3]; 3] = [b"CTG", b"GTG", b"TTG"];

const CANONICAL_START_POINTS: u32 = 100;
const ALT_START_POINTS: u32 = 10;
const STRONG_MATCH_POINTS: u32 = 10;
const WEAK_MATCH_POINTS: u32 = 1;

/// Highest attainable raw score: ATG plus every consensus position matched.
pub const MAX_SCORE: u32 = max_score();

const fn max_score() -> u32 {
    let mut total = CANONICAL_START_POINTS;
    let mut i = 0;
    while i < CONSENSUS_BEFORE_START.len() {
        total += position_points(CONSENSUS_BEFORE_START[i]);
        i += 1;
    }
    let mut i = 0;
    while i < CONSENSUS_AFTER_START.len() {
        total += position_points(CONSENSUS_AFTER_START[i]);
        i += 1;
    }
    total
}

const fn position_points(consensus: u8) -> u32 {
    if consensus.is_ascii_uppercase() {
        STRONG_MATCH_POINTS
    } else {
        WEAK_MATCH_POINTS
    }
}

fn matches_consensus(consensus: u8, observed: u8) -> bool {
    match (consensus.to_ascii_uppercase(), observed.to_ascii_uppercase()) {
        (b'R', b'A' | b'G') => true,
        (c, o) => c == o,
    }
}

fn start_codon_points(start_codon: &[u8]) -> u32 {
    if start_codon.eq_ignore_ascii_case(b"ATG") {
        CANONICAL_START_POINTS
    } else if ALT_START_CODONS
        .iter()
        .any(|alt| start_codon.eq_ignore_ascii_case(*alt))
    {
        ALT_START_POINTS
    } else {
        0
    }
}

/// Score how favourable the context around a start codon is for initiation.
///
/// `sequence_before_start` is aligned against the 3' end of the upstream
/// consensus and `sequence_after_start` against the 5' end of the downstream
/// consensus. Missing context (near a sequence end) is not penalized, it just
/// cannot earn points. Returns a value in `[0, 1]`.
#[must_use]
pub fn translation_initiation_score(
    sequence_before_start: &[u8],
    start_codon: &[u8],
    sequence_after_start: &[u8],
) -> f64 {
    let mut score = start_codon_points(start_codon);

    let before = &sequence_before_start
        [sequence_before_start.len().saturating_sub(CONSENSUS_BEFORE_START.len())..];
    let before_consensus = &CONSENSUS_BEFORE_START[CONSENSUS_BEFORE_START.len() - before.len()..];

    let pairs = before_consensus
        .iter()
        .zip(before)
        .chain(CONSENSUS_AFTER_START.iter().zip(sequence_after_start));
    for (&consensus, &observed) in pairs {
        if matches_consensus(consensus, observed) {
            score += position_points(consensus);
        }
    }

    f64::from(score) / f64::from(MAX_SCORE)
}
