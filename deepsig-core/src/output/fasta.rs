use std::io::Write;

use bio::io::fasta;

use crate::{DeepSigError, results::PredictionResult};

/// Description marker added to sequences whose signal peptide was removed
const MATURE_TAG: &str = "mature";

/// Writes every sequence, with predicted signal peptides removed.
///
/// Returns the number of sequences that were trimmed.
pub fn write_processed_sequences<W: Write>(
    writer: W,
    results: &[PredictionResult],
) -> Result<usize, DeepSigError> {
    let mut writer = fasta::Writer::new(writer);
    let mut trimmed = 0;
    for result in results {
        if result.is_signal_peptide() && result.cleavage_site.is_some() {
            let description = match &result.description {
                Some(description) => format!("{} {}", description, MATURE_TAG),
                None => MATURE_TAG.to_string(),
            };
            writer.write(
                &result.identifier,
                Some(description.as_str()),
                result.mature_sequence(),
            )?;
            trimmed += 1;
        } else {
            writer.write(
                &result.identifier,
                result.description.as_deref(),
                &result.sequence,
            )?;
        }
    }
    writer.flush()?;
    Ok(trimmed)
}

/// Writes only the sequences not predicted to carry a signal peptide.
///
/// Returns the number of sequences written.
pub fn write_noss_sequences<W: Write>(
    writer: W,
    results: &[PredictionResult],
) -> Result<usize, DeepSigError> {
    let mut writer = fasta::Writer::new(writer);
    let mut written = 0;
    for result in results.iter().filter(|r| !r.is_signal_peptide()) {
        writer.write(
            &result.identifier,
            result.description.as_deref(),
            &result.sequence,
        )?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
