use ndarray::{Array2, ArrayView2};

use crate::{
    constants::{FEATURE_WIDTH, PADDING_CODE},
    sequence::residue_code,
};

/// Fixed-length numeric view of a sequence's N-terminal region.
///
/// Holds the residue codes of the first `window_length` residues (right
/// padded with [`PADDING_CODE`]) and their one-hot features, a
/// `window_length` x [`FEATURE_WIDTH`] matrix. Padding rows are all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedWindow {
    codes: Vec<u8>,
    features: Array2<f64>,
    sequence_length: usize,
}

impl EncodedWindow {
    /// Encodes the first `window_length` residues of `residues`.
    ///
    /// Never fails: unknown symbols get the unknown code and residues past
    /// the window are ignored.
    pub fn from_residues(residues: &[u8], window_length: usize) -> Self {
        let mut codes = vec![PADDING_CODE; window_length];
        for (slot, &residue) in codes.iter_mut().zip(residues) {
            *slot = residue_code(residue);
        }

        let features = Array2::from_shape_fn((window_length, FEATURE_WIDTH), |(position, feature)| {
            if codes[position] as usize == feature { 1.0 } else { 0.0 }
        });

        Self {
            codes,
            features,
            sequence_length: residues.len(),
        }
    }

    /// Number of positions in the window, padding included
    pub fn window_length(&self) -> usize {
        self.codes.len()
    }

    /// Length of the original sequence
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Number of real (non-padding) residues in the window
    pub fn residue_count(&self) -> usize {
        self.sequence_length.min(self.codes.len())
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Code at `position`, padding outside the window
    #[inline]
    pub fn code(&self, position: usize) -> u8 {
        self.codes.get(position).copied().unwrap_or(PADDING_CODE)
    }

    /// Code at a signed offset, padding outside the window
    #[inline]
    pub fn code_at_offset(&self, position: isize) -> u8 {
        usize::try_from(position)
            .map(|p| self.code(p))
            .unwrap_or(PADDING_CODE)
    }

    /// One-hot matrix, one row per window position
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }
}
