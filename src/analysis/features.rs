//! Frame-wise acoustic statistics
//!
//! All spectral measures share one STFT pass (2048-sample Hann frames,
//! 512-sample hop) so a single extraction call is internally consistent.

use rustfft::{num_complex::Complex, FftPlanner};

use super::pitch;
use crate::audio::AudioClip;

pub const FRAME_LEN: usize = 2048;
pub const HOP_LEN: usize = 512;

const POWER_FLOOR: f64 = 1e-10;

/// The four scalars the authenticity heuristic scores against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Mean over frames of geometric/arithmetic power-spectrum mean ratio.
    /// Near 0 for tonal signals, near 1 for noise.
    pub spectral_flatness_mean: f32,
    /// Variance of frame RMS energy
    pub energy_variance: f32,
    /// Variance of voiced-frame fundamental frequency (50-300 Hz band);
    /// 0.0 when nothing voiced was found
    pub pitch_variance: f32,
    /// Variance of the onset-strength envelope (log-spectral flux)
    pub onset_variance: f32,
}

/// Compute the [`FeatureVector`] of a decoded clip.
pub fn extract(clip: &AudioClip) -> FeatureVector {
    let power_frames = stft_power(&clip.samples);

    let flatness: Vec<f32> = power_frames.iter().map(|f| spectral_flatness(f)).collect();
    let onsets = onset_envelope(&power_frames);
    let energies = rms_frames(&clip.samples);
    let pitches = pitch::track(&clip.samples, clip.sample_rate, FRAME_LEN, HOP_LEN);

    FeatureVector {
        spectral_flatness_mean: mean(&flatness),
        energy_variance: variance(&energies),
        pitch_variance: variance(&pitches),
        onset_variance: variance(&onsets),
    }
}

/// Hann-windowed power spectra, one Vec per frame (bins 0..=FRAME_LEN/2).
fn stft_power(samples: &[f32]) -> Vec<Vec<f64>> {
    let mut padded;
    let samples = if samples.len() < FRAME_LEN {
        padded = samples.to_vec();
        padded.resize(FRAME_LEN, 0.0);
        &padded[..]
    } else {
        samples
    };

    let window: Vec<f32> = (0..FRAME_LEN)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / FRAME_LEN as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FRAME_LEN);

    let mut frames = Vec::with_capacity(samples.len() / HOP_LEN + 1);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); FRAME_LEN];

    let mut start = 0;
    while start + FRAME_LEN <= samples.len() {
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(samples[start + i] * window[i], 0.0);
        }
        fft.process(&mut buffer);

        let power: Vec<f64> = buffer[..FRAME_LEN / 2 + 1]
            .iter()
            .map(|c| c.norm_sqr() as f64)
            .collect();
        frames.push(power);

        start += HOP_LEN;
    }

    frames
}

/// Geometric over arithmetic mean of one power spectrum.
fn spectral_flatness(power: &[f64]) -> f32 {
    if power.is_empty() {
        return 0.0;
    }
    let n = power.len() as f64;
    let log_mean = power.iter().map(|&p| (p + POWER_FLOOR).ln()).sum::<f64>() / n;
    let arith_mean = power.iter().sum::<f64>() / n + POWER_FLOOR;
    (log_mean.exp() / arith_mean) as f32
}

/// Half-wave-rectified log-spectral flux, averaged over bins. The first
/// frame has no predecessor and contributes 0.
fn onset_envelope(power_frames: &[Vec<f64>]) -> Vec<f32> {
    let mut envelope = Vec::with_capacity(power_frames.len());
    for (t, frame) in power_frames.iter().enumerate() {
        if t == 0 {
            envelope.push(0.0);
            continue;
        }
        let prev = &power_frames[t - 1];
        let flux = frame
            .iter()
            .zip(prev.iter())
            .map(|(&cur, &old)| ((1.0 + cur).ln() - (1.0 + old).ln()).max(0.0))
            .sum::<f64>()
            / frame.len() as f64;
        envelope.push(flux as f32);
    }
    envelope
}

/// Frame-wise RMS energy over the same framing as the spectral measures.
fn rms_frames(samples: &[f32]) -> Vec<f32> {
    let mut frames = Vec::new();
    let mut start = 0;
    while start < samples.len() {
        let end = (start + FRAME_LEN).min(samples.len());
        let frame = &samples[start..end];
        let mean_sq =
            frame.iter().map(|&s| s as f64 * s as f64).sum::<f64>() / frame.len() as f64;
        frames.push(mean_sq.sqrt() as f32);
        start += HOP_LEN;
    }
    frames
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Population variance, matching the source statistics.
fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let sum_sq = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>();
    (sum_sq / n) as f32
}
