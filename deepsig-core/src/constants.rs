// =============================================================================
// =============================================================================

/// Version string for DeepSig
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source column written in GFF output and JSON evidences
pub const SOURCE_NAME: &str = "DeepSig";

/// Evidence code attached to every predicted feature (automatic assertion)
pub const EVIDENCE_CODE: &str = "ECO:0000256";

/// Home page of the predictor, written in JSON evidences
pub const SOURCE_URL: &str = "https://deepsig.biocomp.unibo.it";

// =============================================================================
// =============================================================================

/// Default number of N-terminal residues inspected by the models
pub const NTERM: usize = 96;

/// The 20 standard amino acids, in one-hot column order
pub const AMINO_ACIDS: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

/// Code assigned to any residue outside [`AMINO_ACIDS`]
pub const UNKNOWN_CODE: u8 = 20;

/// Code assigned to window positions past the end of the sequence
pub const PADDING_CODE: u8 = 21;

/// Width of the per-residue feature vector (standard residues + unknown)
pub const FEATURE_WIDTH: usize = 21;

/// Number of distinct residue codes, padding included
pub const SYMBOL_COUNT: usize = 22;

/// Number of predicted classes
pub const NUM_CLASSES: usize = 3;

// =============================================================================
// =============================================================================

/// Subdirectory of the model root holding classifier artifacts
pub const DNN_MODEL_DIR: &str = "dnn";

/// Subdirectory of the model root holding cleavage-site decoder artifacts
pub const CRF_MODEL_DIR: &str = "crf";

/// Extension of model artifact files
pub const MODEL_EXTENSION: &str = "json";

/// Shortest sequence for which a cleavage site can exist
pub const MIN_CLEAVABLE_LENGTH: usize = 2;

/// Prefix of the scratch workspace directory
pub const WORKSPACE_PREFIX: &str = "deepsig-";
