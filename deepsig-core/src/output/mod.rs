//! Output formatting for prediction results.
//!
//! ## Supported Formats
//!
//! - **GFF3**: one feature line per predicted region, plus a Chain line for
//!   the mature protein of cleaved signal peptides
//! - **JSON**: an indented array with one object per sequence and
//!   UniProt-style feature lists
//!
//! Derived sequences are written as FASTA by [`write_processed_sequences`]
//! (signal peptides removed) and [`write_noss_sequences`] (sequences without
//! a signal peptide).
//!
//! ## Examples
//!
//! ```rust,no_run
//! use deepsig_core::{Predictor, config::{DeepSigConfig, OutputFormat}};
//! use deepsig_core::output::write_results;
//! use std::fs::File;
//!
//! let predictor = Predictor::new(DeepSigConfig::default())?;
//! let results = predictor.predict_fasta_file("proteins.fasta")?;
//!
//! let mut gff = File::create("proteins.gff3")?;
//! write_results(&mut gff, &results, OutputFormat::Gff3)?;
//!
//! write_results(&mut std::io::stdout(), &results, OutputFormat::Json)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Write;

use crate::{DeepSigError, config::OutputFormat, results::PredictionResult};

mod fasta;
mod formats {
    pub mod gff;
    pub mod json;
}

pub use fasta::{write_noss_sequences, write_processed_sequences};
use formats::{gff::write_gff_format, json::write_json_format};

/// Writes prediction results in the specified format.
///
/// # Errors
///
/// Returns [`DeepSigError`] if writing or serialization fails.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &[PredictionResult],
    format: OutputFormat,
) -> Result<(), DeepSigError> {
    match format {
        OutputFormat::Gff3 => write_gff_format(writer, results),
        OutputFormat::Json => write_json_format(writer, results),
    }?;
    writer.flush()?;
    Ok(())
}
