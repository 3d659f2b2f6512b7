use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    classifier::Classification,
    config::DeepSigConfig,
    model::{ModelDirectory, OrganismModel},
    results::{PredictionResult, PredictionSummary},
    sequence::{encoded::EncodedWindow, read_fasta_records},
    types::{DeepSigError, SequenceClass, SequenceRecord},
};

/// Batch prediction coordinator.
///
/// Owns the organism model and a dedicated worker pool. Each record is one
/// task running encode → classify → normalize → decode; results come back
/// in input order whatever the pool size, and the first failing record
/// fails the whole batch.
///
/// # Examples
///
/// ```rust,no_run
/// use deepsig_core::{Predictor, config::{DeepSigConfig, Organism}};
/// use deepsig_core::types::SequenceRecord;
///
/// let config = DeepSigConfig {
///     organism: Organism::GramNegative,
///     model_dir: "/opt/deepsig/models".into(),
///     num_threads: Some(4),
///     ..Default::default()
/// };
/// let predictor = Predictor::new(config)?;
///
/// let records = vec![SequenceRecord::new("P0AEX9", "MKIKTGARILALSALTTMMFSASALA")];
/// for result in predictor.predict(&records)? {
///     println!("{}\t{}\t{}", result.identifier, result.class, result.reliability);
/// }
/// # Ok::<(), deepsig_core::types::DeepSigError>(())
/// ```
#[derive(Debug)]
pub struct Predictor {
    config: DeepSigConfig,
    model: Arc<OrganismModel>,
    pool: rayon::ThreadPool,
}

impl Predictor {
    /// Validates `config` and loads the configured organism's models.
    ///
    /// # Errors
    ///
    /// Returns [`DeepSigError`] if:
    /// - The configuration is invalid
    /// - The model directory or one of its subdirectories is missing
    /// - An artifact is missing, unparsable or inconsistent
    /// - The worker pool cannot be created
    pub fn new(config: DeepSigConfig) -> Result<Self, DeepSigError> {
        config.validate()?;
        info!("Loading {} models from {}", config.organism, config.model_dir.display());
        let model = ModelDirectory::open(&config.model_dir)?.load(config.organism)?;
        Self::with_model(config, Arc::new(model))
    }

    /// Builds a predictor around an already loaded model.
    ///
    /// The model is shared, so several predictors (for instance with
    /// different pool sizes) can reuse one load.
    ///
    /// # Errors
    ///
    /// Returns [`DeepSigError::InvalidConfig`] if the configuration is invalid
    /// or names another organism than the model, and
    /// [`DeepSigError::ThreadPool`] if the pool cannot be created.
    pub fn with_model(config: DeepSigConfig, model: Arc<OrganismModel>) -> Result<Self, DeepSigError> {
        config.validate()?;
        if model.organism() != config.organism {
            return Err(DeepSigError::InvalidConfig(format!(
                "model was trained for {}, configuration asks for {}",
                model.organism(),
                config.organism
            )));
        }

        let num_threads = config.effective_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("deepsig-worker-{}", i))
            .build()
            .map_err(|e| DeepSigError::ThreadPool(e.to_string()))?;
        debug!("Prediction pool ready with {} threads", num_threads);

        Ok(Self {
            config,
            model,
            pool,
        })
    }

    pub fn config(&self) -> &DeepSigConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<OrganismModel> {
        &self.model
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Predicts every record, returning results in input order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any record; no partial results are
    /// returned.
    pub fn predict(&self, records: &[SequenceRecord]) -> Result<Vec<PredictionResult>, DeepSigError> {
        info!("Detecting signal peptides and cleavage sites");
        let model = self.model.as_ref();
        let results = self.pool.install(|| {
            records
                .par_iter()
                .map(|record| predict_record(model, record))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let summary = PredictionSummary::from_results(&results);
        info!("Detected {} signal peptides", summary.signal_peptides);
        info!("Predicted {} cleavage sites", summary.cleaved);
        Ok(results)
    }

    /// Predicts a single record on the calling thread
    pub fn predict_record(&self, record: &SequenceRecord) -> Result<PredictionResult, DeepSigError> {
        predict_record(&self.model, record)
    }

    /// Reads a multi-FASTA file and predicts every record in it.
    ///
    /// # Errors
    ///
    /// Returns [`DeepSigError`] if the file cannot be read or parsed, or if
    /// prediction fails.
    pub fn predict_fasta_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PredictionResult>, DeepSigError> {
        info!("Reading input data");
        let records = read_fasta_records(path)?;
        info!("Read {} protein sequences", records.len());
        self.predict(&records)
    }
}

/// Runs the full pipeline for one record.
///
/// Pure in `model` and `record`; holds no state between calls.
pub fn predict_record(model: &OrganismModel, record: &SequenceRecord) -> Result<PredictionResult, DeepSigError> {
    let window = EncodedWindow::from_residues(&record.residues, model.window_length());
    let Classification { scores, class } = model.classifier().classify(&window);
    let reliability = model.normalizer().reliability(&scores, class);

    let cleavage_site = if class == SequenceClass::SignalPeptide {
        let site = model.decoder().decode(&window, class)?;
        if site.is_none() {
            warn!(
                "{}: signal peptide predicted on a {}-residue sequence, no cleavage site",
                record.identifier,
                record.len()
            );
        }
        site
    } else {
        None
    };

    Ok(PredictionResult {
        identifier: record.identifier.clone(),
        description: record.description.clone(),
        sequence: record.residues.clone(),
        class,
        scores,
        reliability,
        cleavage_site,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationCurve;
    use crate::config::Organism;
    use crate::model::fixtures::{
        self, OTHER_SEQUENCE, SIGNAL_PEPTIDE_SEQUENCE, TRANSMEMBRANE_SEQUENCE,
    };
    use std::fs;
    use tempfile::TempDir;

    fn shared_model() -> Arc<OrganismModel> {
        Arc::new(
            OrganismModel::from_artifacts(
                Organism::Eukaryote,
                &fixtures::classifier_artifact(Organism::Eukaryote),
                &fixtures::decoder_artifact(Organism::Eukaryote),
            )
            .unwrap(),
        )
    }

    fn model_reliability(class: SequenceClass, raw: f64) -> crate::types::Reliability {
        shared_model().normalizer().normalize(class, raw)
    }

    fn predictor(threads: usize) -> Predictor {
        let config = DeepSigConfig {
            num_threads: Some(threads),
            ..Default::default()
        };
        Predictor::with_model(config, shared_model()).unwrap()
    }

    fn three_records() -> Vec<SequenceRecord> {
        vec![
            SequenceRecord::new("sp", SIGNAL_PEPTIDE_SEQUENCE),
            SequenceRecord::new("tm", TRANSMEMBRANE_SEQUENCE),
            SequenceRecord::new("other", OTHER_SEQUENCE),
        ]
    }

    #[test]
    fn test_signal_peptide_scenario() {
        let predictor = predictor(1);
        let result = predictor
            .predict_record(&SequenceRecord::new("sp", SIGNAL_PEPTIDE_SEQUENCE))
            .unwrap();
        assert_eq!(result.class, SequenceClass::SignalPeptide);
        assert_eq!(result.cleavage_site.map(|s| s.get()), Some(22));
        let curve = CalibrationCurve::new(vec![0.0, 0.5, 1.0], vec![0.0, 0.3, 1.0]).unwrap();
        let raw = result.scores.signal_peptide();
        assert_eq!(result.reliability.value(), curve.evaluate(raw));
        assert!((result.reliability.value() - raw).abs() > 0.005);
        // The other classes' curves would give different values.
        assert_ne!(
            result.reliability,
            model_reliability(SequenceClass::Transmembrane, raw)
        );
        assert_ne!(result.reliability, model_reliability(SequenceClass::Other, raw));
        assert_eq!(result.length(), 50);
    }

    #[test]
    fn test_one_record_per_class() {
        let results = predictor(2).predict(&three_records()).unwrap();
        let classes: Vec<_> = results.iter().map(|r| r.class).collect();
        assert_eq!(
            classes,
            [
                SequenceClass::SignalPeptide,
                SequenceClass::Transmembrane,
                SequenceClass::Other
            ]
        );
        assert!(results[1].cleavage_site.is_none());
        assert!(results[2].cleavage_site.is_none());
    }

    #[test]
    fn test_pool_size_does_not_change_results() {
        let records: Vec<_> = three_records().into_iter().cycle().take(60).collect();
        let single = predictor(1).predict(&records).unwrap();
        let parallel = predictor(4).predict(&records).unwrap();
        assert_eq!(single, parallel);
        for (record, result) in records.iter().zip(&single) {
            assert_eq!(record.identifier, result.identifier);
        }
    }

    #[test]
    fn test_prediction_is_idempotent() {
        let predictor = predictor(3);
        let records = three_records();
        assert_eq!(predictor.predict(&records).unwrap(), predictor.predict(&records).unwrap());
    }

    #[test]
    fn test_all_unknown_sequence() {
        let predictor = predictor(1);
        let record = SequenceRecord::new("unknown", "X".repeat(120));
        let first = predictor.predict_record(&record).unwrap();
        assert_eq!(first.class, SequenceClass::Other);
        assert!(first.cleavage_site.is_none());
        assert_eq!(predictor.predict_record(&record).unwrap(), first);
    }

    #[test]
    fn test_result_invariants() {
        let predictor = predictor(2);
        let mut records = three_records();
        records.push(SequenceRecord::new("empty", ""));
        records.push(SequenceRecord::new("one", "L"));
        records.push(SequenceRecord::new("two", "LD"));
        records.push(SequenceRecord::new("lower", SIGNAL_PEPTIDE_SEQUENCE.to_lowercase()));
        for result in predictor.predict(&records).unwrap() {
            let reliability = result.reliability.value();
            assert!(reliability.is_finite() && (0.0..=1.0).contains(&reliability));
            match result.cleavage_site {
                Some(site) => {
                    assert!(result.is_signal_peptide());
                    assert!(site.get() >= 1 && site.get() < result.length());
                }
                None => assert!(!result.is_signal_peptide() || result.length() < 2),
            }
        }
    }

    #[test]
    fn test_single_residue_signal_peptide_has_no_site() {
        let result = predictor(1)
            .predict_record(&SequenceRecord::new("one", "L"))
            .unwrap();
        assert_eq!(result.class, SequenceClass::SignalPeptide);
        assert!(result.cleavage_site.is_none());
    }

    #[test]
    fn test_empty_batch() {
        assert!(predictor(2).predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_zero_threads() {
        let config = DeepSigConfig {
            num_threads: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Predictor::with_model(config, shared_model()),
            Err(DeepSigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_model_of_other_organism() {
        let config = DeepSigConfig {
            organism: Organism::GramPositive,
            num_threads: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            Predictor::with_model(config, shared_model()),
            Err(DeepSigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_loads_from_directory() {
        let root = TempDir::new().unwrap();
        fixtures::write_model_dir(root.path()).unwrap();
        let config = DeepSigConfig {
            organism: Organism::GramNegative,
            model_dir: root.path().to_path_buf(),
            num_threads: Some(2),
            ..Default::default()
        };
        let predictor = Predictor::new(config).unwrap();
        assert_eq!(predictor.model().organism(), Organism::GramNegative);
        assert_eq!(predictor.num_threads(), 2);
    }

    #[test]
    fn test_new_fails_without_models() {
        let root = TempDir::new().unwrap();
        let config = DeepSigConfig {
            model_dir: root.path().join("missing"),
            num_threads: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            Predictor::new(config),
            Err(DeepSigError::InvalidModelDirectory(_))
        ));
    }

    #[test]
    fn test_predict_fasta_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.fasta");
        fs::write(
            &path,
            format!(
                ">sp secreted\n{}\n>tm\n{}\n>other\n{}\n",
                SIGNAL_PEPTIDE_SEQUENCE, TRANSMEMBRANE_SEQUENCE, OTHER_SEQUENCE
            ),
        )
        .unwrap();
        let results = predictor(2).predict_fasta_file(&path).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].description.as_deref(), Some("secreted"));
        assert_eq!(results[0].cleavage_site.map(|s| s.get()), Some(22));
    }
}
