//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Shared secret expected in the `x-api-key` header
    pub api_key: String,

    /// Path to the whisper.cpp model file (ggml format)
    pub model_path: String,

    /// Threads handed to the speech model for mel + language detection
    pub inference_threads: usize,

    /// Clips shorter than this are answered with the low-confidence default
    pub min_clip_secs: f32,

    /// Clips longer than this are rejected outright
    pub max_clip_secs: f32,

    /// Heuristic scoring thresholds and weights
    pub scoring: ScoringConfig,
}

/// Thresholds and weights of the authenticity heuristic.
///
/// The defaults are empirical constants carried over from the original
/// tuning; they are configuration, not principled values.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub flatness_threshold: f32,
    pub flatness_weight: f32,
    pub energy_threshold: f32,
    pub energy_weight: f32,
    pub pitch_threshold: f32,
    pub pitch_weight: f32,
    pub onset_threshold: f32,
    pub onset_weight: f32,

    /// Scores at or above this classify the clip as AI-generated
    pub ai_decision_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            flatness_threshold: 0.018,
            flatness_weight: 0.35,
            energy_threshold: 0.0015,
            energy_weight: 0.25,
            pitch_threshold: 12.0,
            pitch_weight: 0.25,
            onset_threshold: 0.02,
            onset_weight: 0.15,
            ai_decision_threshold: 0.8,
        }
    }
}

impl ScoringConfig {
    fn from_env() -> Self {
        let d = Self::default();
        Self {
            flatness_threshold: env_f32("VOXGUARD_FLATNESS_THRESHOLD", d.flatness_threshold),
            flatness_weight: env_f32("VOXGUARD_FLATNESS_WEIGHT", d.flatness_weight),
            energy_threshold: env_f32("VOXGUARD_ENERGY_THRESHOLD", d.energy_threshold),
            energy_weight: env_f32("VOXGUARD_ENERGY_WEIGHT", d.energy_weight),
            pitch_threshold: env_f32("VOXGUARD_PITCH_THRESHOLD", d.pitch_threshold),
            pitch_weight: env_f32("VOXGUARD_PITCH_WEIGHT", d.pitch_weight),
            onset_threshold: env_f32("VOXGUARD_ONSET_THRESHOLD", d.onset_threshold),
            onset_weight: env_f32("VOXGUARD_ONSET_WEIGHT", d.onset_weight),
            ai_decision_threshold: env_f32("VOXGUARD_AI_THRESHOLD", d.ai_decision_threshold),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            api_key: env::var("VOXGUARD_API_KEY")
                .unwrap_or_else(|_| "my_secret_key_123".to_string()),

            model_path: env::var("VOXGUARD_MODEL_PATH")
                .unwrap_or_else(|_| "models/ggml-tiny.bin".to_string()),

            inference_threads: env::var("VOXGUARD_INFERENCE_THREADS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(1),

            min_clip_secs: env_f32("VOXGUARD_MIN_CLIP_SECS", 1.0),
            max_clip_secs: env_f32("VOXGUARD_MAX_CLIP_SECS", 15.0),

            scoring: ScoringConfig::from_env(),
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
