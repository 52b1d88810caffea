use crate::error::{Error, Result};

/// Fewest samples the trimmed mean can work with: one is dropped from each end.
pub const MIN_SAMPLE_COUNT: u8 = 3;

/// Sorts `samples` ascending and averages everything except the single
/// smallest and single largest value.
///
/// The slice is left sorted on return.
pub fn trimmed_mean(samples: &mut [f32]) -> Result<f32> {
    let count = samples.len();
    if count < usize::from(MIN_SAMPLE_COUNT) {
        return Err(Error::InsufficientSamples(count));
    }

    samples.sort_unstable_by(f32::total_cmp);

    let sum: f32 = samples[1..count - 1].iter().sum();
    Ok(sum / (count - 2) as f32)
}
