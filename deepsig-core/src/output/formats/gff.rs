use std::io::Write;

use crate::{
    DeepSigError,
    constants::{EVIDENCE_CODE, SOURCE_NAME},
    results::PredictionResult,
    types::SequenceClass,
};

/// Write results in GFF3 format
pub fn write_gff_format<W: Write>(
    writer: &mut W,
    results: &[PredictionResult],
) -> Result<(), DeepSigError> {
    writeln!(writer, "##gff-version 3")?;
    for result in results {
        write_gff_record(writer, result)?;
    }
    Ok(())
}

/// Feature lines of one sequence
fn write_gff_record<W: Write>(writer: &mut W, result: &PredictionResult) -> Result<(), DeepSigError> {
    let length = result.length();
    match (result.class, result.cleavage_site) {
        (SequenceClass::SignalPeptide, Some(site)) => {
            writeln!(
                writer,
                "{}\t{}\t{}\t1\t{}\t{}\t.\t.\t.",
                result.identifier,
                SOURCE_NAME,
                result.class.label(),
                site,
                result.reliability
            )?;
            writeln!(
                writer,
                "{}\t{}\tChain\t{}\t{}\t.\t.\t.\tevidence={}",
                result.identifier,
                SOURCE_NAME,
                site.get() + 1,
                length,
                EVIDENCE_CODE
            )?;
        }
        (class, _) => {
            writeln!(
                writer,
                "{}\t{}\t{}\t1\t{}\t{}\t.\t.\t.",
                result.identifier,
                SOURCE_NAME,
                class.label(),
                length,
                result.reliability
            )?;
        }
    }
    Ok(())
}
