//! Reliability calibration of classifier scores.
//!
//! Each class owns a monotone piecewise-linear curve mapping its raw score
//! to a reliability. Only the curve of the predicted class is ever read.

use crate::{
    constants::NUM_CLASSES,
    model::artifact::{CalibrationParameters, CurveParameters},
    types::{ClassScores, Reliability, SequenceClass},
};

/// Monotone piecewise-linear curve.
///
/// Knot abscissae are strictly increasing, ordinates non-decreasing and
/// inside `[0, 1]`. Outside the knot range the end values are held.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationCurve {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl CalibrationCurve {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, String> {
        if x.is_empty() {
            return Err("calibration curve has no knots".to_string());
        }
        if x.len() != y.len() {
            return Err(format!(
                "calibration curve has {} x knots but {} y knots",
                x.len(),
                y.len()
            ));
        }
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err("calibration curve contains a non-finite knot".to_string());
        }
        if x.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("calibration knots must be strictly increasing in x".to_string());
        }
        if y.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err("calibration curve must be non-decreasing".to_string());
        }
        if y.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err("calibration values must lie in [0, 1]".to_string());
        }
        Ok(Self { x, y })
    }

    pub fn from_parameters(parameters: &CurveParameters) -> Result<Self, String> {
        Self::new(parameters.x.clone(), parameters.y.clone())
    }

    /// Evaluates the curve at a finite `value`
    pub fn evaluate(&self, value: f64) -> f64 {
        let last = self.x.len() - 1;
        if value <= self.x[0] {
            return self.y[0];
        }
        if value >= self.x[last] {
            return self.y[last];
        }
        // First knot strictly right of value; 1..=last here.
        let upper = self.x.partition_point(|&knot| knot <= value);
        let (x0, x1) = (self.x[upper - 1], self.x[upper]);
        let (y0, y1) = (self.y[upper - 1], self.y[upper]);
        y0 + (y1 - y0) * (value - x0) / (x1 - x0)
    }
}

/// Per-class calibration; classes without a curve use the identity
#[derive(Debug, Clone, Default)]
pub struct ScoreNormalizer {
    curves: [Option<CalibrationCurve>; NUM_CLASSES],
}

impl ScoreNormalizer {
    pub fn from_artifact(parameters: &CalibrationParameters) -> Result<Self, String> {
        let build = |curve: &Option<CurveParameters>, class: SequenceClass| {
            curve
                .as_ref()
                .map(CalibrationCurve::from_parameters)
                .transpose()
                .map_err(|reason| format!("{} calibration: {}", class, reason))
        };
        Ok(Self {
            curves: [
                build(&parameters.other, SequenceClass::Other)?,
                build(&parameters.transmembrane, SequenceClass::Transmembrane)?,
                build(&parameters.signal_peptide, SequenceClass::SignalPeptide)?,
            ],
        })
    }

    #[must_use]
    pub fn with_curve(mut self, class: SequenceClass, curve: CalibrationCurve) -> Self {
        self.curves[class.to_index()] = Some(curve);
        self
    }

    pub fn curve(&self, class: SequenceClass) -> Option<&CalibrationCurve> {
        self.curves[class.to_index()].as_ref()
    }

    /// Calibrated confidence of `class` given its raw score
    pub fn normalize(&self, class: SequenceClass, raw: f64) -> Reliability {
        if !raw.is_finite() {
            return Reliability::new(0.0);
        }
        match self.curve(class) {
            Some(curve) => Reliability::new(curve.evaluate(raw)),
            None => Reliability::new(raw),
        }
    }

    /// Reliability of `class` read from a full score vector
    pub fn reliability(&self, scores: &ClassScores, class: SequenceClass) -> Reliability {
        self.normalize(class, scores.get(class))
    }
}
