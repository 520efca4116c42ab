//! Sample-rate conversion (rubato)

use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

const CHUNK_FRAMES: usize = 1024;
const SUB_CHUNKS: usize = 2;

#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("invalid sample rate")]
    InvalidRate,

    #[error("failed to construct resampler: {0}")]
    Construction(#[from] rubato::ResamplerConstructionError),

    #[error("resampling failed: {0}")]
    Process(#[from] rubato::ResampleError),
}

/// Convert a mono signal from `from_rate` to `to_rate`.
///
/// Feeds fixed-size chunks through an FFT resampler, flushes the remainder
/// as a partial chunk, then drains the internal delay line.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, ResampleError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(ResampleError::InvalidRate);
    }
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_FRAMES,
        SUB_CHUNKS,
        1,
    )?;

    let expected = (samples.len() as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;
    let mut out = Vec::with_capacity(expected);

    let mut chunks = samples.chunks_exact(CHUNK_FRAMES);
    for chunk in chunks.by_ref() {
        let produced = resampler.process(&[chunk], None)?;
        out.extend_from_slice(&produced[0]);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let produced = resampler.process_partial(Some(&[tail]), None)?;
        out.extend_from_slice(&produced[0]);
    }

    let drained = resampler.process_partial(None::<&[&[f32]]>, None)?;
    out.extend_from_slice(&drained[0]);

    Ok(out)
}
