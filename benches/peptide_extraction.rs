use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use msmhc::decoys::{DecoyOptions, generate_decoys};
use msmhc::peptides::{collapse_peptide_sources, extract_peptides};
use msmhc::sequence::{Attributes, SequenceKind, SequenceRecord};

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
const NUM_PROTEINS: usize = 200;
const PROTEIN_LENGTH: usize = 400;

fn synthetic_proteome() -> Vec<SequenceRecord> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..NUM_PROTEINS)
        .map(|i| {
            let residues: String = (0..PROTEIN_LENGTH)
                .map(|_| AMINO_ACIDS[rng.gen_range(0..AMINO_ACIDS.len())] as char)
                .collect();
            let kind = [SequenceKind::Reference, SequenceKind::Mutant, SequenceKind::UpstreamOrf]
                .choose(&mut rng)
                .copied()
                .unwrap();
            let mut attributes = Attributes::new();
            attributes.insert("gene_name".to_string(), format!("GENE{}", i % 50).into());
            SequenceRecord::new(kind, format!("protein-{i}"), residues, attributes).unwrap()
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let proteome = synthetic_proteome();
    c.bench_function("extract 8-11mers (200 x 400 aa)", |b| {
        b.iter(|| {
            let index = extract_peptides(&proteome, 8, 11).unwrap();
            assert!(index.len() > 250_000);
        });
    });
}

fn bench_collapse(c: &mut Criterion) {
    let proteome = synthetic_proteome();
    let index = extract_peptides(&proteome, 8, 11).unwrap();
    c.bench_function("collapse 8-11mers", |b| {
        b.iter(|| collapse_peptide_sources(&index).unwrap());
    });
}

fn bench_decoys(c: &mut Criterion) {
    let proteome = synthetic_proteome();
    let index = extract_peptides(&proteome, 9, 9).unwrap();
    let peptides: Vec<SequenceRecord> = collapse_peptide_sources(&index)
        .unwrap()
        .into_iter()
        .map(|p| p.into_record())
        .collect();
    let options = DecoyOptions {
        n_decoys: Some(10_000),
        ..Default::default()
    };
    c.bench_function("10k decoys from 9mers", |b| {
        b.iter(|| generate_decoys(&peptides, &options).unwrap());
    });
}

criterion_group!(benches, bench_extract, bench_collapse, bench_decoys);
criterion_main!(benches);
