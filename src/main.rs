use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use sw_aligner::config::DEFAULT_MIN_PARALLEL_CELLS;
use sw_aligner::{
    batch, write_report, Aligner, AlignerParameters, FillStrategy, LinearScoring, Sequence,
    DEFAULT_GAP, DEFAULT_MATCH, DEFAULT_MISMATCH,
};

#[derive(Parser)]
#[command(name = "sw_aligner")]
#[command(version)]
#[command(about = "Smith-Waterman local alignment of two sequences, reported in MSF format")]
#[command(long_about = "
Aligns the first record of two FASTA files with the Smith-Waterman algorithm
(linear gap penalty) and prints the local alignment as a two-sequence MSF
(PileUp) block with GCG checksums.

Sequence names come from the FASTA header, or the file name when the header
has none; a leading `PREFIX_` is removed.

With --batch, every subdirectory of DIR is a group of FASTA files; each
unordered pair in a group is written to OUTDIR/<group>/<group>_<a>__<b>.msf.

Examples:
  sw_aligner BB11001_1aab_.fa BB11001_1j46_A.fa
  sw_aligner a.fa b.fa --strategy sequential -o a_b.msf
  sw_aligner a.fa b.fa --threads 8 --match 5 --mismatch -4 --gap -3
  sw_aligner --batch pairwise_fasta -o msf_out
")]
struct Cli {
    /// First sequence (FASTA, optionally gzipped)
    #[arg(required_unless_present = "batch")]
    seq1: Option<PathBuf>,

    /// Second sequence (FASTA, optionally gzipped)
    #[arg(required_unless_present = "batch")]
    seq2: Option<PathBuf>,

    /// Align all FASTA pairs of each subdirectory of DIR; -o names the output directory
    #[arg(long, value_name = "DIR", conflicts_with_all = ["seq1", "seq2"])]
    batch: Option<PathBuf>,

    /// Matrix fill order: sequential or wavefront
    #[arg(short, long, default_value_t = FillStrategy::Wavefront)]
    strategy: FillStrategy,

    /// Worker threads for the wavefront fill [default: all CPUs]
    #[arg(short, long)]
    threads: Option<usize>,

    /// Anti-diagonals shorter than this are filled on one thread
    #[arg(long, default_value_t = DEFAULT_MIN_PARALLEL_CELLS)]
    min_parallel_cells: usize,

    /// Score for identical residues
    #[arg(long = "match", default_value_t = DEFAULT_MATCH, allow_hyphen_values = true)]
    match_score: i32,

    /// Score for different residues
    #[arg(long, default_value_t = DEFAULT_MISMATCH, allow_hyphen_values = true)]
    mismatch: i32,

    /// Score for each gap column
    #[arg(long, default_value_t = DEFAULT_GAP, allow_hyphen_values = true)]
    gap: i32,

    /// Output filename. [stdout] for screen. Output directory with --batch
    #[arg(short, long, default_value = "stdout")]
    outfile: String,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn writer(output: &str) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("Failed to create output file {}", output))?;
        Box::new(BufWriter::new(file))
    };
    Ok(writer)
}

/// Timing line on stderr: microseconds below 10 ms, milliseconds above.
fn report_execution_time(label: &str, elapsed: Duration) {
    let micros = elapsed.as_micros();
    if micros < 10_000 {
        eprintln!(
            "{} Execution time: {} μs ({} ns)",
            label,
            micros,
            elapsed.as_nanos()
        );
    } else {
        eprintln!(
            "{} Execution time: {:.3} ms",
            label,
            micros as f64 / 1000.0
        );
    }
}

fn build_aligner(cli: &Cli) -> Result<Aligner> {
    let scoring = LinearScoring::new(cli.match_score, cli.mismatch, cli.gap)?;
    let mut params = AlignerParameters::new()
        .with_strategy(cli.strategy)
        .with_min_parallel_cells(cli.min_parallel_cells);
    if let Some(threads) = cli.threads {
        params = params.with_threads(threads)?;
    }

    let aligner = Aligner::with_scoring(params, scoring).context("Failed to set up aligner")?;
    debug!("{} fill with {:?}", aligner.strategy(), aligner.scoring());
    Ok(aligner)
}

fn align_pair(cli: &Cli, aligner: &Aligner, path1: &Path, path2: &Path) -> Result<()> {
    let start_time = Instant::now();

    let seq1 = Sequence::from_file(path1)
        .with_context(|| format!("Failed to load {}", path1.display()))?;
    let seq2 = Sequence::from_file(path2)
        .with_context(|| format!("Failed to load {}", path2.display()))?;

    let result = aligner.align(&seq1, &seq2)?;
    info!(
        "{} [{}..{}] vs {} [{}..{}]",
        seq1.name(),
        result.start_position.i,
        result.end_position.i,
        seq2.name(),
        result.start_position.j,
        result.end_position.j
    );

    report_execution_time(cli.strategy.label(), start_time.elapsed());

    let mut writer = writer(&cli.outfile)?;
    write_report(&mut writer, seq1.name(), seq2.name(), &result)?;
    writer.flush()?;

    Ok(())
}

fn align_batch(cli: &Cli, aligner: &Aligner, input_root: &Path) -> Result<()> {
    if cli.outfile == "stdout" {
        bail!("--batch writes one file per pair; give an output directory with -o");
    }
    let start_time = Instant::now();

    let output_root = PathBuf::from(&cli.outfile);
    let jobs = batch::plan_pairs(input_root, &output_root)
        .with_context(|| format!("Failed to scan {}", input_root.display()))?;
    let written = batch::run_batch(aligner, &jobs);

    report_execution_time(cli.strategy.label(), start_time.elapsed());
    println!(
        "Processed {} of {} alignments into {}",
        written,
        jobs.len(),
        output_root.display()
    );

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let aligner = build_aligner(&cli)?;

    match (&cli.batch, &cli.seq1, &cli.seq2) {
        (Some(input_root), _, _) => align_batch(&cli, &aligner, input_root),
        (None, Some(path1), Some(path2)) => align_pair(&cli, &aligner, path1, path2),
        _ => bail!("two sequence files or --batch DIR are required"),
    }
}
