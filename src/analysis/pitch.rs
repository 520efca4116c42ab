//! YIN fundamental-frequency estimation
//!
//! Difference function → cumulative mean normalized difference → absolute
//! threshold → parabolic refinement, per frame. Only the plausible human
//! pitch band (50-300 Hz) is searched; frames with no trough under the
//! threshold count as unvoiced and produce no estimate.

pub const FMIN: f32 = 50.0;
pub const FMAX: f32 = 300.0;

/// Standard YIN absolute threshold on the normalized difference.
const TROUGH_THRESHOLD: f64 = 0.1;

/// Per-frame f0 estimates for the voiced frames of `samples`.
///
/// Returns an empty Vec when the sample rate leaves no usable correlation
/// window inside `frame_len` (the caller treats that as "no pitch found").
pub fn track(samples: &[f32], sample_rate: u32, frame_len: usize, hop_len: usize) -> Vec<f32> {
    let tau_min = ((sample_rate as f32 / FMAX).floor() as usize).max(2);
    let tau_max = (sample_rate as f32 / FMIN).ceil() as usize;

    // Correlation window: every lag must stay inside the frame
    let window = frame_len.saturating_sub(tau_max);
    if window < 2 * tau_min {
        return Vec::new();
    }

    let mut estimates = Vec::new();
    let mut start = 0;
    while start + frame_len <= samples.len() {
        let frame = &samples[start..start + frame_len];
        if let Some(f0) = estimate_frame(frame, sample_rate, tau_min, tau_max, window) {
            estimates.push(f0);
        }
        start += hop_len;
    }
    estimates
}

fn estimate_frame(
    frame: &[f32],
    sample_rate: u32,
    tau_min: usize,
    tau_max: usize,
    window: usize,
) -> Option<f32> {
    // Difference function d(tau)
    let mut diff = vec![0.0f64; tau_max + 1];
    for tau in 1..=tau_max {
        let mut acc = 0.0f64;
        for j in 0..window {
            let delta = (frame[j] - frame[j + tau]) as f64;
            acc += delta * delta;
        }
        diff[tau] = acc;
    }

    // Cumulative mean normalized difference
    let mut cmndf = vec![1.0f64; tau_max + 1];
    let mut running_sum = 0.0f64;
    for tau in 1..=tau_max {
        running_sum += diff[tau];
        cmndf[tau] = if running_sum > f64::EPSILON {
            diff[tau] * tau as f64 / running_sum
        } else {
            1.0
        };
    }

    // First trough under the threshold, walked down to its local minimum
    let mut tau = tau_min;
    let best = loop {
        if tau > tau_max {
            return None; // unvoiced
        }
        if cmndf[tau] < TROUGH_THRESHOLD {
            while tau + 1 <= tau_max && cmndf[tau + 1] < cmndf[tau] {
                tau += 1;
            }
            break tau;
        }
        tau += 1;
    };

    let refined = parabolic_interpolation(&cmndf, best);
    Some(sample_rate as f32 / refined as f32)
}

/// Refine an integer lag to sub-sample precision using its neighbors.
fn parabolic_interpolation(cmndf: &[f64], tau: usize) -> f64 {
    if tau == 0 || tau + 1 >= cmndf.len() {
        return tau as f64;
    }
    let (left, mid, right) = (cmndf[tau - 1], cmndf[tau], cmndf[tau + 1]);
    let denom = 2.0 * (left - 2.0 * mid + right);
    if denom.abs() < f64::EPSILON {
        return tau as f64;
    }
    tau as f64 + (left - right) / denom
}
