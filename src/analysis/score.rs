//! Authenticity scoring and classification
//!
//! An additive fixed-weight rule: each statistic falling below its threshold
//! adds that feature's weight to the AI-likelihood. This is an unsupervised
//! heuristic with hand-tuned constants, not a trained classifier.

use super::FeatureVector;
use crate::config::ScoringConfig;

/// AI-likelihood in [0, 1]. The weights sum to 1.0; the cap is defensive.
pub fn ai_likelihood(features: &FeatureVector, cfg: &ScoringConfig) -> f32 {
    let mut score = 0.0;

    if features.spectral_flatness_mean < cfg.flatness_threshold {
        score += cfg.flatness_weight;
    }
    if features.energy_variance < cfg.energy_threshold {
        score += cfg.energy_weight;
    }
    if features.pitch_variance < cfg.pitch_threshold {
        score += cfg.pitch_weight;
    }
    if features.onset_variance < cfg.onset_threshold {
        score += cfg.onset_weight;
    }

    score.min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    HumanVoice,
    AiGenerated,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::HumanVoice => "Human Voice",
            Classification::AiGenerated => "AI-Generated Voice",
        }
    }
}

/// Final classification with its reported confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub classification: Classification,
    pub confidence: f32,
}

/// Threshold the AI-likelihood into a verdict.
///
/// The score is rounded to 2 decimals before comparison, so the reported
/// confidence always reconstructs: human → round(1 - score), AI → score.
pub fn decide(score: f32, cfg: &ScoringConfig) -> Verdict {
    let score = round2(score);
    if score >= cfg.ai_decision_threshold {
        Verdict {
            classification: Classification::AiGenerated,
            confidence: score,
        }
    } else {
        Verdict {
            classification: Classification::HumanVoice,
            confidence: round2(1.0 - score),
        }
    }
}

/// Verdict for clips too short to carry any usable signal.
pub fn short_clip_verdict() -> Verdict {
    Verdict {
        classification: Classification::HumanVoice,
        confidence: 0.5,
    }
}

pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
