//! Small hand-built models with predictable behaviour.
//!
//! The classifier has three width-1 filters: leucine drives SignalPeptide,
//! tryptophan drives Transmembrane, aspartate and glutamate drive Other.
//! Every class has a calibration curve that differs from the identity.
//! The decoder puts hydrophobic residues in the Signal state.
//!
//! Compiled for unit tests and, through the `test-utils` feature, for the
//! integration tests and benchmarks of dependent crates.

use std::fs;
use std::path::Path;

use crate::{
    config::Organism,
    constants::{CRF_MODEL_DIR, DNN_MODEL_DIR, FEATURE_WIDTH, NTERM, PADDING_CODE, SYMBOL_COUNT},
    model::artifact::{
        CalibrationParameters, ClassifierArtifact, CurveParameters, DecoderArtifact,
        EmissionParameters, NetworkParameters, TransitionParameters,
    },
    sequence::residue_code,
    types::DeepSigError,
};

const HYDROPHOBIC: &[u8] = b"ACFGILMVW";

/// 50 residues: a 22-residue hydrophobic signal, then a polar mature chain
pub const SIGNAL_PEPTIDE_SEQUENCE: &str = "MKLVFALLIVAFLLAVLIAFLVDEKRNQSTDEKRNQSTDEKRNQSTDEKR";
pub const TRANSMEMBRANE_SEQUENCE: &str = "MKWWWWWWWWWWWWWWWWWWWWKRNQSTKRNQSTKRNQST";
pub const OTHER_SEQUENCE: &str = "MDEKRNQSTKRNQSTKRNQSTKRNQST";

fn filter(residues: &[u8], weight: f64) -> Vec<Vec<f64>> {
    let mut column = vec![0.0; FEATURE_WIDTH];
    for &residue in residues {
        column[residue_code(residue) as usize] = weight;
    }
    vec![column]
}

/// Leucine votes SignalPeptide, tryptophan Transmembrane, D/E Other
pub fn classifier_artifact(organism: Organism) -> ClassifierArtifact {
    let member = NetworkParameters {
        conv_kernels: vec![filter(b"L", 2.0), filter(b"W", 3.0), filter(b"DE", 1.0)],
        conv_bias: vec![0.0; 3],
        hidden_weights: vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        hidden_bias: vec![0.0; 3],
        output_weights: vec![
            vec![0.0, 0.0, 4.0],
            vec![0.0, 4.0, 0.0],
            vec![4.0, 0.0, 0.0],
        ],
        output_bias: vec![0.5, 0.0, 0.0],
    };
    ClassifierArtifact {
        organism: organism.tag().to_string(),
        window_length: NTERM,
        members: vec![member],
        calibration: CalibrationParameters {
            other: Some(CurveParameters {
                x: vec![0.0, 1.0],
                y: vec![0.1, 0.9],
            }),
            transmembrane: Some(CurveParameters {
                x: vec![0.0, 0.5, 1.0],
                y: vec![0.0, 0.2, 1.0],
            }),
            signal_peptide: Some(CurveParameters {
                x: vec![0.0, 0.5, 1.0],
                y: vec![0.0, 0.3, 1.0],
            }),
        },
    }
}

/// Hydrophobic residues favour the Signal state
pub fn decoder_artifact(organism: Organism) -> DecoderArtifact {
    let mut signal = vec![-1.0; SYMBOL_COUNT];
    signal[PADDING_CODE as usize] = 0.0;
    for &residue in HYDROPHOBIC {
        signal[residue_code(residue) as usize] = 1.0;
    }
    let mature = signal.iter().map(|w| -w).collect();
    DecoderArtifact {
        organism: organism.tag().to_string(),
        window_length: NTERM,
        context: 0,
        signal: EmissionParameters {
            bias: 0.0,
            weights: vec![signal],
        },
        mature: EmissionParameters {
            bias: 0.0,
            weights: vec![mature],
        },
        transitions: TransitionParameters::default(),
        min_signal_length: None,
        max_signal_length: None,
    }
}

/// Writes artifacts for every organism under `root`
pub fn write_model_dir(root: &Path) -> Result<(), DeepSigError> {
    let dnn = root.join(DNN_MODEL_DIR);
    let crf = root.join(CRF_MODEL_DIR);
    fs::create_dir_all(&dnn)?;
    fs::create_dir_all(&crf)?;
    for organism in Organism::ALL {
        let name = format!("{}.json", organism.tag());
        fs::write(dnn.join(&name), serde_json::to_string(&classifier_artifact(organism))?)?;
        fs::write(crf.join(&name), serde_json::to_string(&decoder_artifact(organism))?)?;
    }
    Ok(())
}
