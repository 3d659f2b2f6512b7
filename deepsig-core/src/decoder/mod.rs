//! Cleavage-site decoding for signal-peptide sequences.
//!
//! The N-terminal window is segmented into a Signal prefix followed by a
//! Mature suffix. Each position carries a linear emission score per state,
//! computed from the residues in a symmetric context around it; the best
//! segmentation is found with [`viterbi::best_path`]. The length of the
//! Signal prefix is the cleavage site.

use std::ops::RangeInclusive;

use ndarray::Array2;

use crate::{
    classifier::network::matrix,
    constants::{MIN_CLEAVABLE_LENGTH, SYMBOL_COUNT},
    model::artifact::{DecoderArtifact, EmissionParameters, TransitionParameters},
    sequence::encoded::EncodedWindow,
    types::{CleavageSite, DeepSigError, SequenceClass},
};

pub mod viterbi;

use viterbi::{MATURE, SIGNAL};

/// Linear emission model of one state
#[derive(Debug, Clone)]
struct Emission {
    bias: f64,
    /// `[offset, symbol]`
    weights: Array2<f64>,
}

impl Emission {
    fn from_parameters(parameters: &EmissionParameters, span: usize, state: &str) -> Result<Self, String> {
        if parameters.weights.len() != span {
            return Err(format!(
                "{} emission has {} context offsets, expected {}",
                state,
                parameters.weights.len(),
                span
            ));
        }
        if !parameters.bias.is_finite() {
            return Err(format!("{} emission bias is not finite", state));
        }
        let weights = matrix(&parameters.weights, (span, SYMBOL_COUNT), &format!("{} emission", state))?;
        Ok(Self {
            bias: parameters.bias,
            weights,
        })
    }

    #[inline]
    fn weight(&self, offset: usize, symbol: u8) -> f64 {
        self.weights[[offset, symbol as usize]]
    }
}

/// Constrained two-state decoder trained for one organism
#[derive(Debug, Clone)]
pub struct CleavageDecoder {
    window_length: usize,
    context: isize,
    signal: Emission,
    mature: Emission,
    transitions: TransitionParameters,
    min_signal_length: Option<usize>,
    max_signal_length: Option<usize>,
}

impl CleavageDecoder {
    pub fn from_artifact(artifact: &DecoderArtifact) -> Result<Self, String> {
        if artifact.window_length == 0 {
            return Err("window length must be positive".to_string());
        }
        let context = isize::try_from(artifact.context)
            .ok()
            .filter(|_| artifact.context < artifact.window_length)
            .ok_or_else(|| {
                format!(
                    "context {} must be smaller than the window length {}",
                    artifact.context, artifact.window_length
                )
            })?;
        let span = artifact
            .context
            .checked_mul(2)
            .and_then(|v| v.checked_add(1))
            .ok_or_else(|| format!("context {} is too large", artifact.context))?;
        let transitions = artifact.transitions;
        if [
            transitions.signal_to_signal,
            transitions.signal_to_mature,
            transitions.mature_to_mature,
        ]
        .iter()
        .any(|t| !t.is_finite())
        {
            return Err("transition scores must be finite".to_string());
        }
        if let (Some(min), Some(max)) = (artifact.min_signal_length, artifact.max_signal_length) {
            if min > max {
                return Err(format!(
                    "min_signal_length {} exceeds max_signal_length {}",
                    min, max
                ));
            }
        }

        Ok(Self {
            window_length: artifact.window_length,
            context,
            signal: Emission::from_parameters(&artifact.signal, span, "signal")?,
            mature: Emission::from_parameters(&artifact.mature, span, "mature")?,
            transitions,
            min_signal_length: artifact.min_signal_length,
            max_signal_length: artifact.max_signal_length,
        })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Signal and Mature emission scores for the first `n` window positions
    pub fn emission_scores(&self, window: &EncodedWindow, n: usize) -> Vec<[f64; 2]> {
        let context = self.context;
        (0..n)
            .map(|t| {
                let mut scores = [self.signal.bias, self.mature.bias];
                for (o, delta) in (-context..=context).enumerate() {
                    let symbol = window.code_at_offset(t as isize + delta);
                    scores[SIGNAL] += self.signal.weight(o, symbol);
                    scores[MATURE] += self.mature.weight(o, symbol);
                }
                scores
            })
            .collect()
    }

    /// Legal Signal lengths for `n` decoded positions.
    ///
    /// Artifact bounds are relaxed to `1..=n-1` when they leave nothing.
    pub fn signal_bounds(&self, n: usize) -> RangeInclusive<usize> {
        let last = n.saturating_sub(1);
        let lo = self.min_signal_length.unwrap_or(1).max(1);
        let hi = self.max_signal_length.unwrap_or(last).min(last);
        if lo > hi { 1..=last } else { lo..=hi }
    }

    /// Predicts the cleavage site of a sequence classified as `class`.
    ///
    /// Returns `Ok(None)` when the sequence is too short to hold both a
    /// signal residue and a mature residue.
    ///
    /// # Errors
    ///
    /// [`DeepSigError::DecoderPrecondition`] unless `class` is
    /// [`SequenceClass::SignalPeptide`].
    pub fn decode(
        &self,
        window: &EncodedWindow,
        class: SequenceClass,
    ) -> Result<Option<CleavageSite>, DeepSigError> {
        if class != SequenceClass::SignalPeptide {
            return Err(DeepSigError::DecoderPrecondition(class));
        }
        let n = window.residue_count();
        if n < MIN_CLEAVABLE_LENGTH {
            return Ok(None);
        }

        let emissions = self.emission_scores(window, n);
        let path = viterbi::best_path(&emissions, &self.transitions, self.signal_bounds(n));
        Ok(path.and_then(|p| CleavageSite::new(p.boundary, window.sequence_length())))
    }
}
