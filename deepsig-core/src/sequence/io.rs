use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bio::io::fasta;

use crate::types::{DeepSigError, SequenceRecord};

/// Reads every record of a multi-FASTA file.
///
/// Identifiers are the first header word, descriptions the remainder.
/// Residues are kept as read; encoding deals with case and unknown symbols.
pub fn read_fasta_records<P: AsRef<Path>>(path: P) -> Result<Vec<SequenceRecord>, DeepSigError> {
    let file = File::open(path.as_ref())?;
    read_fasta_from(BufReader::new(file))
}

/// Reads every record from any FASTA stream
pub fn read_fasta_from<R: Read>(reader: R) -> Result<Vec<SequenceRecord>, DeepSigError> {
    let reader = fasta::Reader::new(reader);
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| DeepSigError::ParseError(e.to_string()))?;
        records.push(SequenceRecord {
            identifier: record.id().to_string(),
            description: record.desc().map(String::from),
            residues: record.seq().to_vec(),
        });
    }

    Ok(records)
}
