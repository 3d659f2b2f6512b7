use ndarray::{Array1, Array2, Array3, Axis, s};

use crate::{
    classifier::WindowScorer,
    constants::{FEATURE_WIDTH, NUM_CLASSES},
    model::artifact::NetworkParameters,
    sequence::encoded::EncodedWindow,
    types::{ClassScores, ScoreVector},
};

/// Convolutional window classifier.
///
/// Layers: 1-D convolution over the one-hot window (valid positions only),
/// ReLU, global max-pool, dense hidden layer with ReLU, dense output layer,
/// softmax.
#[derive(Debug, Clone)]
pub struct ConvNet {
    /// `[filter, offset, feature]`
    conv_kernels: Array3<f64>,
    conv_bias: Array1<f64>,
    /// `[unit, filter]`
    hidden_weights: Array2<f64>,
    hidden_bias: Array1<f64>,
    /// `[class, unit]`
    output_weights: Array2<f64>,
    output_bias: Array1<f64>,
}

impl ConvNet {
    /// Builds a network, checking every shape and value.
    ///
    /// Returns the reason on failure.
    pub fn from_parameters(parameters: &NetworkParameters, window_length: usize) -> Result<Self, String> {
        let num_filters = parameters.conv_kernels.len();
        if num_filters == 0 {
            return Err("convolution layer has no filters".to_string());
        }
        let kernel_width = parameters.conv_kernels[0].len();
        if kernel_width == 0 || kernel_width > window_length {
            return Err(format!(
                "kernel width {} must be between 1 and the window length {}",
                kernel_width, window_length
            ));
        }

        let mut flat = Vec::with_capacity(num_filters * kernel_width * FEATURE_WIDTH);
        for (f, kernel) in parameters.conv_kernels.iter().enumerate() {
            let kernel = matrix(kernel, (kernel_width, FEATURE_WIDTH), &format!("conv_kernels[{}]", f))?;
            flat.extend(kernel.iter());
        }
        let conv_kernels = Array3::from_shape_vec((num_filters, kernel_width, FEATURE_WIDTH), flat)
            .map_err(|e| format!("conv_kernels: {}", e))?;
        let conv_bias = vector(&parameters.conv_bias, num_filters, "conv_bias")?;

        let hidden_units = parameters.hidden_weights.len();
        if hidden_units == 0 {
            return Err("hidden layer has no units".to_string());
        }
        let hidden_weights = matrix(&parameters.hidden_weights, (hidden_units, num_filters), "hidden_weights")?;
        let hidden_bias = vector(&parameters.hidden_bias, hidden_units, "hidden_bias")?;

        let output_weights = matrix(&parameters.output_weights, (NUM_CLASSES, hidden_units), "output_weights")?;
        let output_bias = vector(&parameters.output_bias, NUM_CLASSES, "output_bias")?;

        Ok(Self {
            conv_kernels,
            conv_bias,
            hidden_weights,
            hidden_bias,
            output_weights,
            output_bias,
        })
    }

    pub fn kernel_width(&self) -> usize {
        self.conv_kernels.len_of(Axis(1))
    }

    /// Max-pooled, rectified convolution responses, one per filter
    fn pooled_filters(&self, window: &EncodedWindow) -> Array1<f64> {
        let num_filters = self.conv_kernels.len_of(Axis(0));
        let kernel_width = self.kernel_width();
        let features = window.features();
        let positions = (features.nrows() + 1).saturating_sub(kernel_width);
        if positions == 0 {
            return Array1::zeros(num_filters);
        }

        // [position, filter], accumulated one kernel offset at a time
        let mut responses = Array2::<f64>::zeros((positions, num_filters));
        for offset in 0..kernel_width {
            let rows = features.slice(s![offset..offset + positions, ..]);
            let taps = self.conv_kernels.slice(s![.., offset, ..]);
            responses += &rows.dot(&taps.t());
        }
        responses += &self.conv_bias;

        responses.fold_axis(Axis(0), 0.0, |&best, &x| best.max(x))
    }

    /// Output-layer logits before softmax
    pub fn logits(&self, window: &EncodedWindow) -> ScoreVector {
        let pooled = self.pooled_filters(window);
        let hidden = (self.hidden_weights.dot(&pooled) + &self.hidden_bias).mapv_into(relu);
        let output = self.output_weights.dot(&hidden) + &self.output_bias;

        let mut logits = [0.0; NUM_CLASSES];
        for (logit, value) in logits.iter_mut().zip(output.iter()) {
            *logit = *value;
        }
        logits
    }
}

impl WindowScorer for ConvNet {
    fn score(&self, window: &EncodedWindow) -> ClassScores {
        ClassScores(softmax(self.logits(window)))
    }
}

#[inline]
fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Numerically stable softmax
pub fn softmax(logits: ScoreVector) -> ScoreVector {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut exps = logits.map(|l| (l - max).exp());
    let total: f64 = exps.iter().sum();
    for e in exps.iter_mut() {
        *e /= total;
    }
    exps
}

fn check_finite<'a>(values: impl IntoIterator<Item = &'a f64>, name: &str) -> Result<(), String> {
    match values.into_iter().position(|v| !v.is_finite()) {
        Some(i) => Err(format!("{} contains a non-finite value at index {}", name, i)),
        None => Ok(()),
    }
}

fn vector(values: &[f64], len: usize, name: &str) -> Result<Array1<f64>, String> {
    if values.len() != len {
        return Err(format!("{} has {} values, expected {}", name, values.len(), len));
    }
    check_finite(values, name)?;
    Ok(Array1::from(values.to_vec()))
}

/// Row-major matrix from nested rows; ragged rows are rejected before the
/// flat buffer is reshaped.
pub(crate) fn matrix(rows: &[Vec<f64>], shape: (usize, usize), name: &str) -> Result<Array2<f64>, String> {
    let (nrows, ncols) = shape;
    if rows.len() != nrows {
        return Err(format!("{} has {} rows, expected {}", name, rows.len(), nrows));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
        return Err(format!(
            "{} row {} has {} columns, expected {}",
            name,
            i,
            row.len(),
            ncols
        ));
    }
    let matrix = Array2::from_shape_vec(shape, rows.concat()).map_err(|e| format!("{}: {}", name, e))?;
    check_finite(&matrix, name)?;
    Ok(matrix)
}
