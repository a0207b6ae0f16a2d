use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use msmhc::cli;
use msmhc::config::PipelineConfig;
use msmhc::decoys::generate_decoys_with_progress;
use msmhc::fasta::read_fasta_path;
use msmhc::generation::generate_sequences;
use msmhc::peptides::{collapse_peptide_sources, extract_peptides_with_progress};
use msmhc::sequence::{SequenceKind, SequenceRecord};
use msmhc::transcript::Annotation;

#[derive(Parser)]
#[command(
    name = "msmhc",
    version,
    about = "Generate candidate peptides for MHC ligand discovery"
)]
struct Cli {
    /// Annotation JSON with transcripts and variant effects (optionally .gz)
    #[arg(short = 'a', long = "annotation")]
    annotation: PathBuf,

    /// Output FASTA file
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Path to a JSON pipeline configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Additional protein FASTA files to include (optionally .gz)
    #[arg(long = "fasta")]
    fasta: Vec<PathBuf>,

    /// Include upstream reading frames from 5' UTR start codons
    #[arg(long)]
    upstream_reading_frames: bool,

    /// Include downstream reading frames from alternative start codons
    #[arg(long)]
    downstream_reading_frames: bool,

    /// Shortest peptide to extract
    #[arg(long)]
    min_length: Option<usize>,

    /// Longest peptide to extract
    #[arg(long)]
    max_length: Option<usize>,

    /// Append scrambled decoy peptides
    #[arg(long)]
    decoys: bool,

    /// Number of decoys (defaults to one per peptide); also applies when the
    /// config file enables decoys
    #[arg(long)]
    n_decoys: Option<usize>,

    /// Random seed for decoy scrambling
    #[arg(long)]
    seed: Option<u64>,

    /// Write full-length sequences instead of peptides
    #[arg(long)]
    full_length: bool,

    /// Hide progress bars
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        config.upstream_orfs |= self.upstream_reading_frames;
        config.downstream_orfs |= self.downstream_reading_frames;
        config.decoys |= self.decoys;
        if let Some(min) = self.min_length {
            config.min_peptide_length = min;
        }
        if let Some(max) = self.max_length {
            config.max_peptide_length = max;
        }
        if self.n_decoys.is_some() {
            config.n_decoys = self.n_decoys;
        }
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner(env!("CARGO_PKG_VERSION"));

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = cli_args.pipeline_config()?;

    if let Some(ref path) = cli_args.config {
        cli::kv("Config", &path.display().to_string());
    }
    cli::kv("Annotation", &cli_args.annotation.display().to_string());
    cli::kv("Output", &cli_args.out.display().to_string());
    cli::kv(
        "Peptide lengths",
        &format!("{}-{}", config.min_peptide_length, config.max_peptide_length),
    );
    cli::kv("Upstream ORFs", on_off(config.upstream_orfs));
    cli::kv("Downstream ORFs", on_off(config.downstream_orfs));
    cli::kv("Decoys", on_off(config.decoys));
    if cli_args.full_length {
        cli::kv("Mode", "full-length sequences");
    }

    eprintln!();

    // ── Annotation ───────────────────────────────────────
    cli::section("Annotation");

    let annotation = Annotation::from_path(&cli_args.annotation).with_context(|| {
        format!(
            "failed to load annotation: {}",
            cli_args.annotation.display()
        )
    })?;

    cli::kv("Transcripts", &annotation.transcripts.len().to_string());
    cli::kv("Coding", &annotation.num_coding_transcripts().to_string());
    cli::kv("Variant effects", &annotation.variant_effects.len().to_string());

    eprintln!();

    // ── Sequence Generation ──────────────────────────────
    cli::section("Sequence Generation");

    let progress = cli::progress_bar("transcripts", cli_args.quiet);
    let generated = generate_sequences(&annotation, &config, &progress);

    cli::kv("Reference", &generated.reference.len().to_string());
    cli::kv("Mutant", &generated.mutant.len().to_string());
    if config.upstream_orfs {
        cli::kv("Upstream ORFs", &generated.upstream.len().to_string());
    }
    if config.downstream_orfs {
        cli::kv("Downstream ORFs", &generated.downstream.len().to_string());
    }

    let mut sequences = generated.into_combined();

    for path in &cli_args.fasta {
        let entries = read_fasta_path(path)
            .with_context(|| format!("failed to read FASTA: {}", path.display()))?;
        let num_entries = entries.len();
        let mut skipped = 0usize;
        for entry in entries {
            match SequenceRecord::from_fasta_entry(&entry.name, &entry.description, &entry.sequence)
            {
                Ok(record) if record.kind() == SequenceKind::Decoy => {
                    cli::warning(&format!("skipping decoy {}", entry.name));
                    skipped += 1;
                }
                Ok(record) => sequences.push(record),
                Err(e) => {
                    cli::warning(&format!("skipping {}: {e}", entry.name));
                    skipped += 1;
                }
            }
        }
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        cli::kv(&filename, &format!("{} sequences", num_entries - skipped));
    }

    eprintln!();

    // ── Peptides ─────────────────────────────────────────
    let output_records: Vec<SequenceRecord> = if cli_args.full_length {
        sequences
    } else {
        cli::section("Peptides");

        let progress = cli::progress_bar("sequences", cli_args.quiet);
        let index = extract_peptides_with_progress(
            &sequences,
            config.min_peptide_length,
            config.max_peptide_length,
            &progress,
        )?;
        cli::kv("Unique peptides", &index.len().to_string());

        let collapsed = collapse_peptide_sources(&index)?;
        for kind in SequenceKind::PRIORITY_ORDER {
            let count = collapsed
                .iter()
                .filter(|p| p.retained_kind() == kind)
                .count();
            if count > 0 {
                cli::kv(kind.type_name(), &count.to_string());
            }
        }
        let mut peptides: Vec<SequenceRecord> = collapsed
            .into_iter()
            .map(|p| p.into_record())
            .collect();

        if let Some(decoy_options) = config.decoy_options() {
            let progress = cli::progress_bar("decoys", cli_args.quiet);
            let decoys = generate_decoys_with_progress(&peptides, &decoy_options, &progress)?;
            let requested = decoy_options.n_decoys.unwrap_or(peptides.len());
            if decoys.len() < requested {
                cli::warning(&format!(
                    "generated {} of {requested} requested decoys",
                    decoys.len()
                ));
            }
            cli::kv("Decoys", &decoys.len().to_string());
            peptides.extend(decoys);
        }

        eprintln!();
        peptides
    };

    // ── Output ───────────────────────────────────────────
    cli::section("Output");

    let out_file = File::create(&cli_args.out)
        .with_context(|| format!("failed to create output: {}", cli_args.out.display()))?;
    let mut writer = BufWriter::new(out_file);
    for record in &output_records {
        record.write_fasta(&mut writer, config.line_width)?;
    }
    writer.flush()?;

    cli::success(&format!(
        "wrote {} records to {}",
        output_records.len(),
        cli_args.out.display()
    ));

    cli::print_summary(start);
    Ok(())
}
