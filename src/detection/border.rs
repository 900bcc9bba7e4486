//! Border noise suppression.
//!
//! Persistent low-frequency hum shows up as detections touching the bottom
//! rows of the mask. Each time column is flood-filled from the border: any
//! detection contiguous with the noise band is erased, detections higher in
//! the same column are untouched.

use crate::detection::Mask;
use crate::error::{Error, Result};

/// Remove detections contiguous with the bottom border.
///
/// Rows below `threshold_row` are treated as an artificial all-1 prefix;
/// scanning upward, every cell below the first 0 is cleared. A column with
/// no 0 at or above `threshold_row` is left unchanged. The result is always
/// a subset of the input, and the operation is idempotent.
pub fn suppress_border_noise(mask: &Mask, threshold_row: usize) -> Result<Mask> {
    if threshold_row > mask.rows() {
        return Err(Error::invalid_input(format!(
            "border threshold row {threshold_row} exceeds mask row count {}",
            mask.rows()
        )));
    }

    let mut out = mask.clone();
    for col in 0..out.cols() {
        // First non-detection at or above the forced prefix
        let first_zero = (threshold_row..out.rows()).find(|&row| out.get(row, col) == 0);
        if let Some(boundary) = first_zero {
            for v in &mut out.col_mut(col)[..boundary] {
                *v = 0;
            }
        }
    }
    Ok(out)
}
