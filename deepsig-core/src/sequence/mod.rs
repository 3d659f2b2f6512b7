//! Protein sequence encoding.
//!
//! Residues are mapped to small integer codes:
//! - `0..20`: the standard amino acids in [`AMINO_ACIDS`] order
//! - [`UNKNOWN_CODE`]: any other symbol (B, Z, J, U, O, X, `*`, non-ASCII, ...)
//! - [`PADDING_CODE`](crate::constants::PADDING_CODE): window positions beyond the end of the sequence
//!
//! Each code expands to a [`FEATURE_WIDTH`](crate::constants::FEATURE_WIDTH)-wide one-hot vector; padding
//! expands to the all-zero vector.
//!
//! ## Modules
//!
//! - [`encoded`]: Fixed-length N-terminal windows fed to the models
//! - [`io`]: FASTA file reading
//!
//! ## Examples
//!
//! ```rust
//! use deepsig_core::sequence::encoded::EncodedWindow;
//! use deepsig_core::constants::PADDING_CODE;
//!
//! let window = EncodedWindow::from_residues(b"MKVLA", 8);
//!
//! assert_eq!(window.window_length(), 8);
//! assert_eq!(window.residue_count(), 5);
//! assert_eq!(window.code(7), PADDING_CODE);
//! ```

use crate::constants::{AMINO_ACIDS, UNKNOWN_CODE};

pub mod encoded;
pub mod io;

pub use io::*;

const fn build_code_table() -> [u8; 256] {
    let mut table = [UNKNOWN_CODE; 256];
    let mut i = 0;
    while i < AMINO_ACIDS.len() {
        let upper = AMINO_ACIDS[i];
        table[upper as usize] = i as u8;
        table[upper.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    table
}

static CODE_TABLE: [u8; 256] = build_code_table();

/// Converts a residue character to its integer code.
///
/// Lookup is case-insensitive and total: every byte maps to a standard
/// residue or to [`UNKNOWN_CODE`].
///
/// # Examples
///
/// ```rust
/// use deepsig_core::sequence::residue_code;
/// use deepsig_core::constants::UNKNOWN_CODE;
///
/// assert_eq!(residue_code(b'A'), 0);
/// assert_eq!(residue_code(b'y'), 19);
/// assert_eq!(residue_code(b'X'), UNKNOWN_CODE);
/// assert_eq!(residue_code(0xFF), UNKNOWN_CODE);
/// ```
#[must_use]
pub fn residue_code(c: u8) -> u8 {
    CODE_TABLE[c as usize]
}

/// Removes the leading `cleavage_site` residues, returning the mature chain
#[must_use]
pub fn mature_chain(residues: &[u8], cleavage_site: usize) -> &[u8] {
    &residues[cleavage_site.min(residues.len())..]
}
