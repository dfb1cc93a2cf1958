//! Summary length resolution

use crate::errors::{Result, SummarizeError};

/// Turn a requested length into a sentence count
///
/// A value in `(0, 1)` is a fraction of `num_sentences`, rounded to the
/// nearest count and never below one sentence. Larger values are absolute
/// counts (fractional parts dropped). The result never exceeds
/// `num_sentences`.
pub fn resolve_length(length: f64, num_sentences: usize) -> Result<usize> {
    if !length.is_finite() || length <= 0.0 {
        return Err(SummarizeError::invalid_config(format!(
            "length must be a positive number, got {length}"
        )));
    }
    if num_sentences == 0 {
        return Ok(0);
    }

    let count = if length < 1.0 {
        ((length * num_sentences as f64).round() as usize).max(1)
    } else {
        length.floor() as usize
    };

    Ok(count.min(num_sentences))
}
