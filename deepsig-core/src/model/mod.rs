//! Trained model loading.
//!
//! A model root holds one classifier artifact and one decoder artifact per
//! organism:
//!
//! ```text
//! <root>/
//! ├── dnn/{euk,gramp,gramn}.json   classifier ensemble + calibration
//! └── crf/{euk,gramp,gramn}.json   cleavage-site decoder
//! ```
//!
//! Everything is checked while loading, so a loaded [`OrganismModel`] never
//! fails at prediction time because of its parameters.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    calibration::ScoreNormalizer,
    classifier::ClassifierEnsemble,
    config::Organism,
    constants::{CRF_MODEL_DIR, DNN_MODEL_DIR, MODEL_EXTENSION},
    decoder::CleavageDecoder,
    types::DeepSigError,
};

pub mod artifact;
#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;

use artifact::{ClassifierArtifact, DecoderArtifact};

/// Validated model root directory
#[derive(Debug, Clone)]
pub struct ModelDirectory {
    root: PathBuf,
}

impl ModelDirectory {
    /// Opens `root`, which must contain the `dnn` and `crf` subdirectories.
    ///
    /// # Errors
    ///
    /// [`DeepSigError::InvalidModelDirectory`] naming the first missing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DeepSigError> {
        let root = root.into();
        for dir in [root.clone(), root.join(DNN_MODEL_DIR), root.join(CRF_MODEL_DIR)] {
            if !dir.is_dir() {
                return Err(DeepSigError::InvalidModelDirectory(dir));
            }
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classifier_path(&self, organism: Organism) -> PathBuf {
        self.root
            .join(DNN_MODEL_DIR)
            .join(organism.tag())
            .with_extension(MODEL_EXTENSION)
    }

    pub fn decoder_path(&self, organism: Organism) -> PathBuf {
        self.root
            .join(CRF_MODEL_DIR)
            .join(organism.tag())
            .with_extension(MODEL_EXTENSION)
    }

    /// Reads and validates both artifacts of `organism`.
    ///
    /// # Errors
    ///
    /// [`DeepSigError::MalformedModel`] naming the offending file when it is
    /// missing, unreadable, not valid JSON, or inconsistent.
    pub fn load(&self, organism: Organism) -> Result<OrganismModel, DeepSigError> {
        let classifier_path = self.classifier_path(organism);
        let decoder_path = self.decoder_path(organism);
        debug!("Loading classifier from {}", classifier_path.display());
        let classifier: ClassifierArtifact = read_artifact(&classifier_path)?;
        debug!("Loading decoder from {}", decoder_path.display());
        let decoder: DecoderArtifact = read_artifact(&decoder_path)?;

        OrganismModel::assemble(organism, &classifier, &decoder).map_err(|(kind, reason)| {
            let path = match kind {
                ArtifactKind::Classifier => classifier_path,
                ArtifactKind::Decoder => decoder_path,
            };
            DeepSigError::MalformedModel { path, reason }
        })
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, DeepSigError> {
    let malformed = |reason: String| DeepSigError::MalformedModel {
        path: path.to_path_buf(),
        reason,
    };
    let text = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))
}

/// Which artifact an assembly error comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Classifier,
    Decoder,
}

/// Everything needed to predict for one organism.
///
/// Immutable once built; share it between workers behind an `Arc`.
#[derive(Debug)]
pub struct OrganismModel {
    organism: Organism,
    window_length: usize,
    classifier: ClassifierEnsemble,
    normalizer: ScoreNormalizer,
    decoder: CleavageDecoder,
}

impl OrganismModel {
    /// Builds a model from artifacts already in memory.
    ///
    /// # Errors
    ///
    /// [`DeepSigError::InvalidArtifact`] describing the first inconsistency.
    pub fn from_artifacts(
        organism: Organism,
        classifier: &ClassifierArtifact,
        decoder: &DecoderArtifact,
    ) -> Result<Self, DeepSigError> {
        Self::assemble(organism, classifier, decoder)
            .map_err(|(kind, reason)| DeepSigError::InvalidArtifact(format!("{:?}: {}", kind, reason)))
    }

    fn assemble(
        organism: Organism,
        classifier: &ClassifierArtifact,
        decoder: &DecoderArtifact,
    ) -> Result<Self, (ArtifactKind, String)> {
        use ArtifactKind::{Classifier, Decoder};

        check_organism(organism, &classifier.organism).map_err(|r| (Classifier, r))?;
        check_organism(organism, &decoder.organism).map_err(|r| (Decoder, r))?;
        if classifier.window_length != decoder.window_length {
            return Err((
                Decoder,
                format!(
                    "window length {} differs from the classifier's {}",
                    decoder.window_length, classifier.window_length
                ),
            ));
        }

        let ensemble = ClassifierEnsemble::from_artifact(classifier).map_err(|r| (Classifier, r))?;
        let normalizer =
            ScoreNormalizer::from_artifact(&classifier.calibration).map_err(|r| (Classifier, r))?;
        let decoder = CleavageDecoder::from_artifact(decoder).map_err(|r| (Decoder, r))?;

        debug!(
            "Loaded {} model: {} ensemble members, window of {} residues",
            organism,
            ensemble.num_members(),
            ensemble.window_length()
        );
        Ok(Self {
            organism,
            window_length: classifier.window_length,
            classifier: ensemble,
            normalizer,
            decoder,
        })
    }

    pub fn organism(&self) -> Organism {
        self.organism
    }

    /// Number of N-terminal residues read by every stage
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn classifier(&self) -> &ClassifierEnsemble {
        &self.classifier
    }

    pub fn normalizer(&self) -> &ScoreNormalizer {
        &self.normalizer
    }

    pub fn decoder(&self) -> &CleavageDecoder {
        &self.decoder
    }
}

fn check_organism(expected: Organism, found: &str) -> Result<(), String> {
    if found == expected.tag() {
        Ok(())
    } else {
        Err(format!(
            "trained for organism '{}', expected '{}'",
            found, expected
        ))
    }
}
