use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::types::DeepSigError;

/// Organism group selecting which trained models are used.
///
/// Signal peptides differ in length and composition between eukaryotes and
/// the two bacterial envelope types, so each group has its own classifier
/// and cleavage-site decoder.
///
/// # Examples
///
/// ```rust
/// use deepsig_core::config::Organism;
///
/// let organism: Organism = "gramn".parse()?;
/// assert_eq!(organism, Organism::GramNegative);
/// assert_eq!(organism.tag(), "gramn");
/// # Ok::<(), deepsig_core::types::DeepSigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Organism {
    /// Eukaryotes (`euk`)
    #[default]
    Eukaryote,
    /// Gram-positive bacteria (`gramp`)
    GramPositive,
    /// Gram-negative bacteria (`gramn`)
    GramNegative,
}

impl Organism {
    pub const ALL: [Self; 3] = [Self::Eukaryote, Self::GramPositive, Self::GramNegative];

    /// Tag used on the command line and as the model file stem
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Eukaryote => "euk",
            Self::GramPositive => "gramp",
            Self::GramNegative => "gramn",
        }
    }
}

impl fmt::Display for Organism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Organism {
    type Err = DeepSigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euk" => Ok(Self::Eukaryote),
            "gramp" => Ok(Self::GramPositive),
            "gramn" => Ok(Self::GramNegative),
            other => Err(DeepSigError::UnknownOrganism(other.to_string())),
        }
    }
}

/// Output format options for prediction results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One GFF3-style feature line per predicted region.
    #[default]
    Gff3,

    /// Indented JSON array with one object per sequence.
    Json,
}

impl FromStr for OutputFormat {
    type Err = DeepSigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gff3" | "gff" => Ok(Self::Gff3),
            "json" => Ok(Self::Json),
            other => Err(DeepSigError::InvalidConfig(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

/// Configuration settings for a DeepSig prediction run.
///
/// The configuration is validated once when a
/// [`Predictor`](crate::engine::Predictor) is built; nothing in the library
/// reads process environment afterwards.
///
/// # Examples
///
/// ```rust
/// use deepsig_core::config::{DeepSigConfig, Organism, OutputFormat};
///
/// let config = DeepSigConfig {
///     organism: Organism::GramPositive,
///     model_dir: "/opt/deepsig/models".into(),
///     num_threads: Some(4),
///     output_format: OutputFormat::Json,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DeepSigConfig {
    /// Organism group of the input sequences.
    ///
    /// **Default**: [`Organism::Eukaryote`]
    pub organism: Organism,

    /// Root directory holding the `dnn/` and `crf/` model subdirectories.
    ///
    /// **Default**: `models`
    pub model_dir: PathBuf,

    /// Number of worker threads used for prediction.
    ///
    /// Set to `None` to use every available core. Results never depend on
    /// this value.
    ///
    /// **Default**: `None`
    pub num_threads: Option<usize>,

    /// Format written by [`write_results`](crate::output::write_results).
    ///
    /// **Default**: [`OutputFormat::Gff3`]
    pub output_format: OutputFormat,
}

impl Default for DeepSigConfig {
    fn default() -> Self {
        Self {
            organism: Organism::default(),
            model_dir: PathBuf::from("models"),
            num_threads: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl DeepSigConfig {
    /// Checks values that cannot be expressed in the types.
    ///
    /// # Errors
    ///
    /// Returns [`DeepSigError::InvalidConfig`] for a zero thread count.
    pub fn validate(&self) -> Result<(), DeepSigError> {
        if self.num_threads == Some(0) {
            return Err(DeepSigError::InvalidConfig(
                "thread count must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Worker count after resolving the default
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
