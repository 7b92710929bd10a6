//! # Oligobind CLI - Oligo Hybridization Screening
//!
//! A command-line interface for the oligobind binding scanner.
//!
//! ## Usage
//!
//! ```bash
//! # Enumerate every ordered pair of 6-mers into binding.bin
//! oligobind relations -l 6 -o binding.bin
//!
//! # Check a single pair
//! oligobind bind AGCTTC TCGTAG
//!
//! # Reverse complement
//! oligobind complement AGCTTC
//!
//! # Screen a primer panel for cross-binding
//! oligobind screen -i primers.fasta -o hits.tsv
//!
//! # Time full scans of the 5-mer space
//! oligobind bench -l 5 -n 10
//! ```
//!
//! ## Global Options
//!
//! - `-q, --quiet`: Only report errors
//! - `-v, --verbose`: Raise log verbosity (repeatable)
//!
//! ## Scan Options
//!
//! - `--threshold <N>`: Minimum binding counter for a bound pair (default: 3)
//! - `--skip <N>`: Smallest shift offsets to ignore (default: 4)
//! - `-j, --threads <N>`: Worker threads (default: all cores)

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::LevelFilter;
use oligobind_core::config::BindingConfig;
use oligobind_core::constants::{
    DEFAULT_BENCHMARK_REPETITIONS, DEFAULT_OUTPUT_PATH, DEFAULT_OVERLAP_SKIP,
    DEFAULT_OVERLAP_THRESHOLD, DEFAULT_STRAND_LENGTH,
};
use oligobind_core::sequence::complement;
use oligobind_core::types::Strand;
use oligobind_core::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn scan_args() -> [Arg; 3] {
    [
        Arg::new("threshold")
            .long("threshold")
            .value_name("N")
            .value_parser(value_parser!(i32))
            .help("Minimum binding counter for a bound pair (default: 3)"),
        Arg::new("skip")
            .long("skip")
            .value_name("N")
            .value_parser(value_parser!(usize))
            .help("Smallest shift offsets to ignore (default: 4)"),
        Arg::new("threads")
            .short('j')
            .long("threads")
            .value_name("N")
            .value_parser(value_parser!(usize))
            .help("Worker threads (default: all cores)"),
    ]
}

fn length_arg() -> Arg {
    Arg::new("length")
        .short('l')
        .long("length")
        .value_name("LEN")
        .value_parser(value_parser!(usize))
        .help("Bases per strand, 1-21 (default: 6)")
}

fn build_cli() -> Command {
    Command::new("oligobind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Oligonucleotide hybridization screening")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Only report errors"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("relations")
                .about("Write the binding relation of a whole strand space")
                .arg(length_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .default_value(DEFAULT_OUTPUT_PATH)
                        .help("Relation file"),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .action(ArgAction::SetTrue)
                        .help("Omit the file header"),
                )
                .args(scan_args()),
        )
        .subcommand(
            Command::new("bind")
                .about("Check whether two strands bind")
                .arg(Arg::new("strand1").value_name("STRAND1").required(true))
                .arg(Arg::new("strand2").value_name("STRAND2").required(true))
                .args(scan_args()),
        )
        .subcommand(
            Command::new("complement")
                .about("Print the reverse complement of a strand")
                .arg(Arg::new("strand").value_name("STRAND").required(true)),
        )
        .subcommand(
            Command::new("screen")
                .about("Report bound ordered pairs of a FASTA oligo panel")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .required(true)
                        .help("Input FASTA file"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output TSV file (default: stdout)"),
                )
                .args(scan_args()),
        )
        .subcommand(
            Command::new("bench")
                .about("Time repeated scans of a whole strand space")
                .arg(length_arg())
                .arg(
                    Arg::new("runs")
                        .short('n')
                        .long("runs")
                        .value_name("RUNS")
                        .value_parser(value_parser!(usize))
                        .help("Number of timed scans (default: 100)"),
                )
                .args(scan_args()),
        )
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("quiet") {
        LevelFilter::Error
    } else {
        match matches.get_count("verbose") {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Scan options shared by every subcommand that runs the scanner
fn scan_config(matches: &ArgMatches) -> BindingConfig {
    BindingConfig {
        overlap_threshold: matches
            .get_one::<i32>("threshold")
            .copied()
            .unwrap_or(DEFAULT_OVERLAP_THRESHOLD),
        overlap_skip: matches
            .get_one::<usize>("skip")
            .copied()
            .unwrap_or(DEFAULT_OVERLAP_SKIP),
        num_threads: matches.get_one::<usize>("threads").copied(),
        ..Default::default()
    }
}

fn parse_strand_arg(matches: &ArgMatches, id: &str) -> Result<Strand, Box<dyn std::error::Error>> {
    let text = matches
        .get_one::<String>(id)
        .ok_or_else(|| format!("Missing {id}"))?;
    Ok(text.parse()?)
}

fn open_output(path: Option<&PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Main entry point for the oligobind CLI application.
///
/// Parses command-line arguments, configures logging, and dispatches to the
/// selected subcommand.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_cli().get_matches();
    init_logging(&matches);
    let quiet = matches.get_flag("quiet");

    match matches.subcommand() {
        Some(("relations", sub)) => {
            let config = BindingConfig {
                strand_length: sub
                    .get_one::<usize>("length")
                    .copied()
                    .unwrap_or(DEFAULT_STRAND_LENGTH),
                output_path: sub
                    .get_one::<PathBuf>("output")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
                write_header: !sub.get_flag("raw"),
                ..scan_config(sub)
            };

            let engine = BindingEngine::new(config)?;
            let summary = engine.generate_relations()?;

            if !quiet {
                eprintln!(
                    "Enumeration complete! {} of {} pairs bound, {} bytes written to {}.",
                    summary.bound_pairs,
                    summary.comparisons,
                    summary.bytes_written,
                    summary.output_path.display()
                );
            }
        }
        Some(("bind", sub)) => {
            let first = parse_strand_arg(sub, "strand1")?;
            let second = parse_strand_arg(sub, "strand2")?;

            let engine = BindingEngine::new(scan_config(sub))?;
            let score = engine.binding_score(&first, &second)?;
            let verdict = if score >= engine.config.overlap_threshold {
                "bound"
            } else {
                "unbound"
            };
            println!("{verdict}\t{score}");
        }
        Some(("complement", sub)) => {
            let strand = parse_strand_arg(sub, "strand")?;
            println!("{}", complement(&strand));
        }
        Some(("screen", sub)) => {
            let input = sub
                .get_one::<PathBuf>("input")
                .ok_or("Missing input FASTA file")?;

            let engine = BindingEngine::new(scan_config(sub))?;
            let hits = engine.screen_fasta(input)?;

            let mut writer = open_output(sub.get_one::<PathBuf>("output"))?;
            for hit in &hits {
                writeln!(writer, "{}\t{}\t{}", hit.first, hit.second, hit.score)?;
            }
            writer.flush()?;

            if !quiet {
                eprintln!("Screening complete! Found {} bound pairs.", hits.len());
            }
        }
        Some(("bench", sub)) => {
            let config = BindingConfig {
                strand_length: sub
                    .get_one::<usize>("length")
                    .copied()
                    .unwrap_or(DEFAULT_STRAND_LENGTH),
                benchmark_repetitions: sub
                    .get_one::<usize>("runs")
                    .copied()
                    .unwrap_or(DEFAULT_BENCHMARK_REPETITIONS),
                ..scan_config(sub)
            };

            let engine = BindingEngine::new(config)?;
            let report = engine.benchmark()?;

            let mut writer = open_output(None)?;
            for (run, elapsed) in report.runs.iter().enumerate() {
                writeln!(writer, "run {run}\t{:.6}s", elapsed.as_secs_f64())?;
            }
            writeln!(writer, "mean\t{:.6}s", report.mean().as_secs_f64())?;
            writer.flush()?;
        }
        _ => return Err("Unknown subcommand".into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_scan_config_defaults() {
        let matches = build_cli().get_matches_from(["oligobind", "bind", "AT", "TA"]);
        let (_, sub) = matches.subcommand().unwrap();
        let config = scan_config(sub);
        assert_eq!(config.overlap_threshold, 3);
        assert_eq!(config.overlap_skip, 4);
        assert_eq!(config.num_threads, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches =
            build_cli().get_matches_from(["oligobind", "complement", "ATGC", "-q", "-vv"]);
        assert!(matches.get_flag("quiet"));
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
