use std::borrow::Cow;
use std::io::Write;

use serde::Serialize;

use crate::{
    DeepSigError,
    constants::{EVIDENCE_CODE, SOURCE_NAME, SOURCE_URL},
    results::PredictionResult,
    types::SequenceClass,
};

/// Indentation of the JSON array, one level per five spaces
const JSON_INDENT: &[u8] = b"     ";

#[derive(Debug, Serialize)]
struct ProteinEntry<'a> {
    accession: &'a str,
    sequence: SequenceEntry<'a>,
    prediction: &'static str,
    reliability: f64,
    cleavage_site: Option<usize>,
    features: Vec<FeatureEntry>,
}

#[derive(Debug, Serialize)]
struct SequenceEntry<'a> {
    length: usize,
    sequence: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
struct FeatureEntry {
    #[serde(rename = "type")]
    kind: &'static str,
    description: &'static str,
    begin: usize,
    end: usize,
    score: Option<f64>,
    evidences: [Evidence; 1],
}

#[derive(Debug, Serialize)]
struct Evidence {
    code: &'static str,
    source: EvidenceSource,
}

#[derive(Debug, Serialize)]
struct EvidenceSource {
    name: &'static str,
    url: &'static str,
}

fn evidences() -> [Evidence; 1] {
    [Evidence {
        code: EVIDENCE_CODE,
        source: EvidenceSource {
            name: SOURCE_NAME,
            url: SOURCE_URL,
        },
    }]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn feature(kind: &'static str, description: &'static str, begin: usize, end: usize, score: Option<f64>) -> FeatureEntry {
    FeatureEntry {
        kind,
        description,
        begin,
        end,
        score,
        evidences: evidences(),
    }
}

fn features(result: &PredictionResult, reliability: f64) -> Vec<FeatureEntry> {
    let length = result.length();
    match (result.class, result.cleavage_site) {
        (SequenceClass::SignalPeptide, Some(site)) => vec![
            feature("SIGNAL", "Signal peptide", 1, site.get(), Some(reliability)),
            feature("CHAIN", "Mature protein", site.get() + 1, length, None),
        ],
        (SequenceClass::SignalPeptide, None) => {
            vec![feature("SIGNAL", "Signal peptide", 1, length, Some(reliability))]
        }
        (SequenceClass::Transmembrane, _) => {
            vec![feature("TRANSMEM", "Transmembrane anchor", 1, length, Some(reliability))]
        }
        (SequenceClass::Other, _) => Vec::new(),
    }
}

fn entry(result: &PredictionResult) -> ProteinEntry<'_> {
    let reliability = round2(result.reliability.value());
    ProteinEntry {
        accession: &result.identifier,
        sequence: SequenceEntry {
            length: result.length(),
            sequence: String::from_utf8_lossy(&result.sequence),
        },
        prediction: result.class.label(),
        reliability,
        cleavage_site: result.cleavage_site.map(|site| site.get()),
        features: features(result, reliability),
    }
}

/// Write results as one indented JSON array
pub fn write_json_format<W: Write>(
    writer: &mut W,
    results: &[PredictionResult],
) -> Result<(), DeepSigError> {
    let entries: Vec<_> = results.iter().map(entry).collect();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
    entries.serialize(&mut serializer)?;
    writeln!(writer)?;
    Ok(())
}
