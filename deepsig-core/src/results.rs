use crate::{
    sequence::mature_chain,
    types::{ClassScores, CleavageSite, Reliability, SequenceClass},
};

/// Prediction for one input sequence.
///
/// Plain data assembled by the [`Predictor`](crate::engine::Predictor); the
/// output writers read nothing else.
///
/// # Fields
///
/// - `identifier`, `description`, `sequence`: copied from the input record
/// - `class`: the predicted class
/// - `scores`: raw ensemble scores of all three classes
/// - `reliability`: calibrated confidence of `class`
/// - `cleavage_site`: only for signal peptides long enough to be cleaved
///
/// # Examples
///
/// ```rust,no_run
/// use deepsig_core::{Predictor, config::DeepSigConfig};
///
/// let predictor = Predictor::new(DeepSigConfig::default())?;
/// let results = predictor.predict_fasta_file("proteins.fasta")?;
///
/// for result in &results {
///     match result.cleavage_site {
///         Some(site) => println!("{}: signal peptide 1-{}", result.identifier, site),
///         None => println!("{}: {} ({})", result.identifier, result.class, result.reliability),
///     }
/// }
/// # Ok::<(), deepsig_core::types::DeepSigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Sequence identifier from the FASTA header.
    pub identifier: String,

    /// Remainder of the FASTA header line.
    pub description: Option<String>,

    /// Residues as read from input.
    pub sequence: Vec<u8>,

    /// Predicted class.
    pub class: SequenceClass,

    /// Raw classifier scores in class-index order.
    pub scores: ClassScores,

    /// Calibrated confidence of the predicted class.
    pub reliability: Reliability,

    /// Last residue of the signal peptide (1-based).
    ///
    /// `None` for every class but [`SequenceClass::SignalPeptide`], and for
    /// signal peptides shorter than two residues.
    pub cleavage_site: Option<CleavageSite>,
}

impl PredictionResult {
    /// Length of the full input sequence
    pub fn length(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_signal_peptide(&self) -> bool {
        self.class == SequenceClass::SignalPeptide
    }

    /// Residues left after removing the signal peptide
    pub fn mature_sequence(&self) -> &[u8] {
        match self.cleavage_site {
            Some(site) => mature_chain(&self.sequence, site.get()),
            None => &self.sequence,
        }
    }
}

/// Class counts over a batch of predictions.
///
/// # Examples
///
/// ```rust
/// # use deepsig_core::results::PredictionSummary;
/// let summary = PredictionSummary::default();
/// assert_eq!(summary.total(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionSummary {
    pub signal_peptides: usize,
    pub transmembrane: usize,
    pub other: usize,
    /// Signal peptides for which a cleavage site was predicted
    pub cleaved: usize,
}

impl PredictionSummary {
    pub fn from_results(results: &[PredictionResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            match result.class {
                SequenceClass::SignalPeptide => summary.signal_peptides += 1,
                SequenceClass::Transmembrane => summary.transmembrane += 1,
                SequenceClass::Other => summary.other += 1,
            }
            if result.cleavage_site.is_some() {
                summary.cleaved += 1;
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.signal_peptides + self.transmembrane + self.other
    }
}
