//! # Oligobind - Oligonucleotide Hybridization Screening
//!
//! Decides whether two short DNA strands would bind, and enumerates the
//! binding relation over every strand of a given length.
//!
//! ## Overview
//!
//! Strands are packed three bits per base into a single `u64` register. A
//! precomputed score table rates every base pairing, and an alignment
//! scanner slides one register over the other, summing the positive
//! subtotals of the head-on alignment and each frameshifted partial overlap.
//! A pair is bound when that counter reaches a threshold.
//!
//! ## Features
//!
//! - **Packed strands**: up to 21 bases in one register, validated at construction
//! - **Table scoring**: one lookup per base pair, or per two base pairs
//! - **Full enumeration**: every ordered pair of a strand space, streamed to a binary file
//! - **Parallel Processing**: Multi-threaded scanning using Rayon with deterministic output
//! - **Panel screening**: pairwise binding checks over oligos read from FASTA
//!
//! ## Quick Start
//!
//! ```rust
//! use oligobind_core::{BindingEngine, config::BindingConfig};
//!
//! let engine = BindingEngine::new(BindingConfig::default())?;
//!
//! let first = "AGCTTC".parse()?;
//! let second = "TCGTAG".parse()?;
//!
//! assert!(engine.bind_strand(&first, &second)?);
//! # Ok::<(), oligobind_core::types::OligoError>(())
//! ```
//!
//! ## Enumerating a Strand Space
//!
//! ```rust,no_run
//! use oligobind_core::{BindingEngine, config::BindingConfig};
//! use oligobind_core::relations::read_relation_file;
//!
//! let engine = BindingEngine::new(BindingConfig {
//!     strand_length: 4,
//!     output_path: "tetramers.bin".into(),
//!     ..Default::default()
//! })?;
//!
//! let summary = engine.generate_relations()?;
//! println!("{} of {} pairs bound", summary.bound_pairs, summary.comparisons);
//!
//! let bound = read_relation_file("tetramers.bin")?
//!     .into_iter()
//!     .filter(|relation| relation.bound)
//!     .count();
//! assert_eq!(bound as u64, summary.bound_pairs);
//! # Ok::<(), oligobind_core::types::OligoError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Configuration options for scanning and enumeration
//! - [`engine`]: Main entry point owning the score table
//! - [`types`]: Bases, strands and the error type
//! - [`sequence`]: Encoding, complement, strand spaces and FASTA panels
//! - [`scoring`]: Precomputed pair-score table
//! - [`alignment`]: Shift scanner producing the binding verdict
//! - [`relations`]: Relation file writer, reader and enumerator
//! - [`benchmark`]: Timed full-space scans
//! - [`results`]: Summaries returned by the engine
//! - [`register`]: Bit-level access to packed registers
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, OligoError>`](types::OligoError),
//! covering:
//!
//! - Strands that are empty, too long or contain invalid symbols
//! - Raw codes outside the base alphabet
//! - Malformed relation files and FASTA input
//! - I/O errors during file operations
//! - Configuration errors

pub mod alignment;
pub mod benchmark;
pub mod config;
pub mod constants;
pub mod engine;
pub mod register;
pub mod relations;
pub mod results;
pub mod scoring;
pub mod sequence;
pub mod types;

pub use engine::BindingEngine;
