//! Organism-specific window classification.
//!
//! A [`ClassifierEnsemble`] averages the class probabilities of its member
//! networks and picks the predicted class by arg-max, breaking exact ties in
//! favour of SignalPeptide, then Transmembrane, then Other.
//!
//! ## Scoring backends
//!
//! Members are any [`WindowScorer`]. Scorers are shared by every worker, so
//! they must be `Sync`. A backend that keeps mutable inference state
//! implements [`ExclusiveScorer`] instead and is wrapped in [`Serialized`],
//! which funnels its calls through a mutex while encoding, calibration and
//! decoding keep running in parallel.
//!
//! ```text
//! window ──► member 1 ─┐
//!        ──► member 2 ─┼─► mean ──► ClassScores ──► arg-max ──► SequenceClass
//!        ──► member n ─┘
//! ```

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::{
    constants::NUM_CLASSES,
    model::artifact::ClassifierArtifact,
    sequence::encoded::EncodedWindow,
    types::{ClassScores, SequenceClass},
};

pub mod network;

pub use network::ConvNet;

/// Deterministic scoring function over encoded windows.
///
/// Implementations must return the same scores for the same window no matter
/// how many other windows are scored around it.
pub trait WindowScorer: Send + Sync + fmt::Debug {
    /// Class probabilities for one window
    fn score(&self, window: &EncodedWindow) -> ClassScores;

    /// Scores many windows; must equal scoring them one at a time
    fn score_batch(&self, windows: &[EncodedWindow]) -> Vec<ClassScores> {
        windows.iter().map(|window| self.score(window)).collect()
    }
}

/// Scoring backend that needs exclusive access while it runs
pub trait ExclusiveScorer: Send + fmt::Debug {
    fn score_exclusive(&mut self, window: &EncodedWindow) -> ClassScores;
}

/// Adapts an [`ExclusiveScorer`] to [`WindowScorer`] by serializing calls.
#[derive(Debug)]
pub struct Serialized<S> {
    inner: Mutex<S>,
}

impl<S: ExclusiveScorer> Serialized<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            inner: Mutex::new(scorer),
        }
    }
}

impl<S: ExclusiveScorer> WindowScorer for Serialized<S> {
    fn score(&self, window: &EncodedWindow) -> ClassScores {
        // A panic in another worker already fails the batch; the scorer
        // itself holds no invariant a partial call could break.
        let mut scorer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        scorer.score_exclusive(window)
    }
}

/// Scores and decision for one sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub scores: ClassScores,
    pub class: SequenceClass,
}

impl From<ClassScores> for Classification {
    fn from(scores: ClassScores) -> Self {
        Self {
            class: scores.predicted_class(),
            scores,
        }
    }
}

/// Ensemble of window scorers trained for one organism
#[derive(Debug)]
pub struct ClassifierEnsemble {
    window_length: usize,
    members: Vec<Box<dyn WindowScorer>>,
}

impl ClassifierEnsemble {
    /// Creates an ensemble; `members` must not be empty.
    pub fn new(window_length: usize, members: Vec<Box<dyn WindowScorer>>) -> Result<Self, String> {
        if window_length == 0 {
            return Err("window length must be positive".to_string());
        }
        if members.is_empty() {
            return Err("ensemble has no members".to_string());
        }
        Ok(Self {
            window_length,
            members,
        })
    }

    /// Builds the convolutional members described by an artifact
    pub fn from_artifact(artifact: &ClassifierArtifact) -> Result<Self, String> {
        let members = artifact
            .members
            .iter()
            .enumerate()
            .map(|(i, parameters)| {
                ConvNet::from_parameters(parameters, artifact.window_length)
                    .map(|net| Box::new(net) as Box<dyn WindowScorer>)
                    .map_err(|reason| format!("member {}: {}", i, reason))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(artifact.window_length, members)
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    /// Mean of the member scores, summed in member order
    pub fn score(&self, window: &EncodedWindow) -> ClassScores {
        let mut total = [0.0; NUM_CLASSES];
        for member in &self.members {
            let scores = member.score(window);
            for (sum, value) in total.iter_mut().zip(scores.0) {
                *sum += value;
            }
        }
        let count = self.members.len() as f64;
        ClassScores(total.map(|sum| sum / count))
    }

    pub fn classify(&self, window: &EncodedWindow) -> Classification {
        self.score(window).into()
    }

    /// Classifies many windows; identical to calling [`Self::classify`] on each
    pub fn classify_batch(&self, windows: &[EncodedWindow]) -> Vec<Classification> {
        let mut totals = vec![[0.0; NUM_CLASSES]; windows.len()];
        for member in &self.members {
            for (total, scores) in totals.iter_mut().zip(member.score_batch(windows)) {
                for (sum, value) in total.iter_mut().zip(scores.0) {
                    *sum += value;
                }
            }
        }
        let count = self.members.len() as f64;
        totals
            .into_iter()
            .map(|total| ClassScores(total.map(|sum| sum / count)).into())
            .collect()
    }
}
