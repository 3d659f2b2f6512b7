use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::constants::NUM_CLASSES;

/// Raw per-class scores in class-index order: Other, Transmembrane, SignalPeptide.
pub type ScoreVector = [f64; NUM_CLASSES];

/// One input protein.
///
/// Records are produced by the FASTA reader and never modified by the
/// prediction pipeline.
///
/// # Examples
///
/// ```rust
/// use deepsig_core::types::SequenceRecord;
///
/// let record = SequenceRecord::new("P12345", "MKKLLPTAAAGLLLLAAQPAMA");
/// assert_eq!(record.len(), 22);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// First word of the FASTA header
    pub identifier: String,
    /// Remainder of the FASTA header, if any
    pub description: Option<String>,
    /// Residues exactly as read from input
    pub residues: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(identifier: impl Into<String>, residues: impl AsRef<[u8]>) -> Self {
        Self {
            identifier: identifier.into(),
            description: None,
            residues: residues.as_ref().to_vec(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Secretory-signal class assigned to a sequence.
///
/// The discriminants are the class indices used by [`ClassScores`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SequenceClass {
    /// No secretory signal
    Other = 0,
    /// N-terminal transmembrane anchor
    Transmembrane = 1,
    /// Cleavable N-terminal signal peptide
    SignalPeptide = 2,
}

impl SequenceClass {
    /// All classes in index order
    pub const ALL: [Self; NUM_CLASSES] = [Self::Other, Self::Transmembrane, Self::SignalPeptide];

    /// Classes from highest to lowest priority, used to break exact score ties
    pub const PRIORITY: [Self; NUM_CLASSES] =
        [Self::SignalPeptide, Self::Transmembrane, Self::Other];

    #[must_use]
    pub const fn to_index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Transmembrane => "Transmembrane",
            Self::SignalPeptide => "SignalPeptide",
        }
    }

    /// Human-readable label used in GFF and JSON output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Transmembrane => "Transmembrane",
            Self::SignalPeptide => "Signal peptide",
        }
    }
}

impl fmt::Display for SequenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw classifier output for one sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScores(pub ScoreVector);

impl ClassScores {
    #[must_use]
    pub const fn get(&self, class: SequenceClass) -> f64 {
        self.0[class.to_index()]
    }

    #[must_use]
    pub const fn signal_peptide(&self) -> f64 {
        self.get(SequenceClass::SignalPeptide)
    }

    #[must_use]
    pub const fn transmembrane(&self) -> f64 {
        self.get(SequenceClass::Transmembrane)
    }

    #[must_use]
    pub const fn other(&self) -> f64 {
        self.get(SequenceClass::Other)
    }

    /// Arg-max over the three scores.
    ///
    /// Exact ties go to the class listed first in [`SequenceClass::PRIORITY`].
    #[must_use]
    pub fn predicted_class(&self) -> SequenceClass {
        let mut best = SequenceClass::PRIORITY[0];
        for class in &SequenceClass::PRIORITY[1..] {
            if self.get(*class) > self.get(best) {
                best = *class;
            }
        }
        best
    }
}

/// Calibrated confidence of the predicted class, always finite and in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Reliability(f64);

impl Reliability {
    /// Clamps `value` into `[0, 1]`; NaN becomes 0.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// 1-based position of the last residue of a signal peptide
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CleavageSite(usize);

impl CleavageSite {
    /// Builds a site for a sequence of `sequence_length` residues.
    ///
    /// Returns `None` unless `1 <= position < sequence_length`.
    #[must_use]
    pub const fn new(position: usize, sequence_length: usize) -> Option<Self> {
        if position >= 1 && position < sequence_length {
            Some(Self(position))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for CleavageSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error types that can occur while loading models or predicting
#[derive(Error, Debug)]
pub enum DeepSigError {
    /// Model root or one of its subdirectories is missing
    #[error("Invalid model directory: {}", .0.display())]
    InvalidModelDirectory(PathBuf),
    /// A model artifact exists but cannot be used
    #[error("Malformed model {}: {reason}", .path.display())]
    MalformedModel { path: PathBuf, reason: String },
    /// In-memory artifacts that cannot be assembled into a model
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Unknown organism tag
    #[error("Unknown organism '{0}' (expected one of euk, gramp, gramn)")]
    UnknownOrganism(String),
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Worker pool could not be created
    #[error("Failed to configure thread pool: {0}")]
    ThreadPool(String),
    /// Cleavage decoding requested for a sequence not classified as signal peptide
    #[error("Cleavage-site decoder invoked on a sequence classified as {0}")]
    DecoderPrecondition(SequenceClass),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_indices_match_score_order() {
        assert_eq!(SequenceClass::Other.to_index(), 0);
        assert_eq!(SequenceClass::Transmembrane.to_index(), 1);
        assert_eq!(SequenceClass::SignalPeptide.to_index(), 2);
        for (index, class) in SequenceClass::ALL.iter().enumerate() {
            assert_eq!(class.to_index(), index);
        }
    }

    #[test]
    fn test_predicted_class_argmax() {
        assert_eq!(
            ClassScores([0.7, 0.2, 0.1]).predicted_class(),
            SequenceClass::Other
        );
        assert_eq!(
            ClassScores([0.1, 0.6, 0.3]).predicted_class(),
            SequenceClass::Transmembrane
        );
        assert_eq!(
            ClassScores([0.1, 0.2, 0.7]).predicted_class(),
            SequenceClass::SignalPeptide
        );
    }

    #[test]
    fn test_predicted_class_tie_break() {
        assert_eq!(
            ClassScores([0.4, 0.2, 0.4]).predicted_class(),
            SequenceClass::SignalPeptide
        );
        assert_eq!(
            ClassScores([0.4, 0.4, 0.2]).predicted_class(),
            SequenceClass::Transmembrane
        );
        assert_eq!(
            ClassScores([0.3, 0.35, 0.35]).predicted_class(),
            SequenceClass::SignalPeptide
        );
        let even = 1.0 / 3.0;
        assert_eq!(
            ClassScores([even, even, even]).predicted_class(),
            SequenceClass::SignalPeptide
        );
    }

    #[test]
    fn test_reliability_clamps() {
        assert_eq!(Reliability::new(1.5).value(), 1.0);
        assert_eq!(Reliability::new(-0.5).value(), 0.0);
        assert_eq!(Reliability::new(f64::NAN).value(), 0.0);
        assert_eq!(Reliability::new(f64::INFINITY).value(), 1.0);
        assert_eq!(Reliability::new(0.25).value(), 0.25);
        assert_eq!(Reliability::new(0.876).to_string(), "0.88");
    }

    #[test]
    fn test_cleavage_site_bounds() {
        assert!(CleavageSite::new(0, 10).is_none());
        assert!(CleavageSite::new(10, 10).is_none());
        assert!(CleavageSite::new(1, 1).is_none());
        assert_eq!(CleavageSite::new(1, 2).map(CleavageSite::get), Some(1));
        assert_eq!(CleavageSite::new(9, 10).map(CleavageSite::get), Some(9));
    }

    #[test]
    fn test_sequence_record_builders() {
        let record = SequenceRecord::new("sp1", "MKV").with_description("test protein");
        assert_eq!(record.identifier, "sp1");
        assert_eq!(record.description.as_deref(), Some("test protein"));
        assert_eq!(record.len(), 3);
        assert!(!record.is_empty());
        assert!(SequenceRecord::new("empty", "").is_empty());
    }

    #[test]
    fn test_error_messages() {
        let err = DeepSigError::DecoderPrecondition(SequenceClass::Other);
        assert!(err.to_string().contains("Other"));
        let err = DeepSigError::UnknownOrganism("plant".to_string());
        assert!(err.to_string().contains("plant"));
    }
}
