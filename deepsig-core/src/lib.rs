//! # DeepSig - Signal Peptide Prediction
//!
//! A Rust implementation of the DeepSig predictor of secretory signal
//! peptides and their cleavage sites in protein sequences.
//!
//! ## Overview
//!
//! Every input protein is assigned one of three classes from its N-terminal
//! region: a cleavable **signal peptide**, an N-terminal **transmembrane**
//! anchor, or **other**. For signal peptides the residue after which the
//! signal is cleaved from the mature protein is predicted as well.
//!
//! ## Features
//!
//! - **Organism-specific models**: eukaryotes, Gram-positive and Gram-negative bacteria
//! - **Calibrated reliabilities**: per-class monotone calibration of network scores
//! - **Constrained decoding**: Viterbi segmentation of the N-terminus into signal and mature parts
//! - **Parallel Processing**: Multi-threaded batch prediction using Rayon
//! - **Output Formats**: GFF3 and JSON, plus processed and signal-free FASTA
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepsig_core::{Predictor, config::{DeepSigConfig, Organism}};
//!
//! let config = DeepSigConfig {
//!     organism: Organism::Eukaryote,
//!     model_dir: "/opt/deepsig/models".into(),
//!     ..Default::default()
//! };
//! let predictor = Predictor::new(config)?;
//! let results = predictor.predict_fasta_file("proteins.fasta")?;
//!
//! for result in &results {
//!     println!("{}\t{}\t{}", result.identifier, result.class, result.reliability);
//! }
//! # Ok::<(), deepsig_core::types::DeepSigError>(())
//! ```
//!
//! ## Architecture
//!
//! Data flows strictly through four stages, each usable on its own:
//!
//! ```text
//! SequenceRecord ─► EncodedWindow ─► ClassifierEnsemble ─► ScoreNormalizer ─┬─► PredictionResult
//!                                                                          └─► CleavageDecoder (SP only)
//! ```
//!
//! All parameters live in an [`OrganismModel`](model::OrganismModel) loaded
//! once from a model directory and shared read-only by the workers of a
//! [`Predictor`].
//!
//! ## Module Organization
//!
//! - [`config`]: Configuration options for prediction runs
//! - [`engine`]: Batch prediction coordinator
//! - [`types`]: Core data types and errors
//! - [`results`]: Per-sequence prediction results
//! - [`sequence`]: Sequence encoding and FASTA input
//! - [`classifier`]: Convolutional ensemble classifier
//! - [`calibration`]: Score-to-reliability calibration
//! - [`decoder`]: Cleavage-site decoder
//! - [`model`]: Model artifacts and loading
//! - [`output`]: Output formatting
//! - [`workenv`]: Scratch workspace for staged output files
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, DeepSigError>`](types::DeepSigError),
//! providing detailed error information for:
//!
//! - Missing or malformed model directories and artifacts
//! - I/O and FASTA parsing errors
//! - Configuration errors
//! - Decoder contract violations

pub mod calibration;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod engine;
pub mod model;
pub mod output;
pub mod results;
pub mod sequence;
pub mod types;
pub mod workenv;

pub use engine::Predictor;
pub use types::DeepSigError;
