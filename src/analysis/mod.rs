//! Acoustic feature extraction and heuristic authenticity scoring

mod features;
mod pitch;
pub mod score;

pub use features::{extract, FeatureVector};
pub use score::{decide, Classification, Verdict};
