//! On-disk layout of trained model artifacts.
//!
//! Artifacts are plain JSON documents. Shapes are checked when the runtime
//! models are built from them, never here.

use serde::{Deserialize, Serialize};

/// Classifier artifact: `<root>/dnn/<organism>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Organism tag the ensemble was trained on
    pub organism: String,
    /// Number of N-terminal residues the networks read
    pub window_length: usize,
    /// Ensemble members, averaged in this order
    pub members: Vec<NetworkParameters>,
    /// Per-class reliability curves
    #[serde(default)]
    pub calibration: CalibrationParameters,
}

/// Parameters of one convolutional network.
///
/// Weight matrices are row-major: `conv_kernels[filter][offset][feature]`,
/// `hidden_weights[unit][filter]`, `output_weights[class][unit]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub conv_kernels: Vec<Vec<Vec<f64>>>,
    pub conv_bias: Vec<f64>,
    pub hidden_weights: Vec<Vec<f64>>,
    pub hidden_bias: Vec<f64>,
    pub output_weights: Vec<Vec<f64>>,
    pub output_bias: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibrationParameters {
    #[serde(default)]
    pub other: Option<CurveParameters>,
    #[serde(default)]
    pub transmembrane: Option<CurveParameters>,
    #[serde(default)]
    pub signal_peptide: Option<CurveParameters>,
}

/// Knots of a monotone piecewise-linear curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveParameters {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Cleavage-site decoder artifact: `<root>/crf/<organism>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderArtifact {
    pub organism: String,
    pub window_length: usize,
    /// Residues read on each side of a position when scoring emissions
    pub context: usize,
    pub signal: EmissionParameters,
    pub mature: EmissionParameters,
    pub transitions: TransitionParameters,
    #[serde(default)]
    pub min_signal_length: Option<usize>,
    #[serde(default)]
    pub max_signal_length: Option<usize>,
}

/// Emission weights of one state: `weights[offset][symbol]`, offsets
/// `-context..=context`, symbols including unknown and padding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionParameters {
    #[serde(default)]
    pub bias: f64,
    pub weights: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TransitionParameters {
    pub signal_to_signal: f64,
    pub signal_to_mature: f64,
    pub mature_to_mature: f64,
}
