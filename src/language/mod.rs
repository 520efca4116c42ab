//! Spoken-language identification
//!
//! Best-effort: every failure on this path degrades to [`LanguageLabel::Unknown`]
//! instead of failing the request. The speech model is loaded lazily, at most
//! once per process, and shared by all requests.

mod whisper;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::audio::{resample, AudioClip};

pub use whisper::WhisperModel;

/// Sample rate the speech model expects.
pub const MODEL_SAMPLE_RATE: u32 = 16_000;

/// The model consumes a fixed 30-second window; shorter input is zero-padded,
/// longer input truncated.
pub const MODEL_CLIP_SAMPLES: usize = 30 * MODEL_SAMPLE_RATE as usize;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model load failed: {0}")]
    Load(String),

    #[error("language inference failed: {0}")]
    Inference(String),
}

/// Opaque language-identification capability.
///
/// The production backend is whisper.cpp; tests inject counting or failing
/// fakes to pin down the lazy-init and fallback behavior.
pub trait SpeechModel: Send + Sync {
    /// Probability per language code for a 16 kHz mono clip.
    fn language_probs(&self, samples: &[f32]) -> Result<Vec<(String, f32)>, ModelError>;
}

/// Display labels for the language codes the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageLabel {
    English,
    Tamil,
    Hindi,
    Telugu,
    Malayalam,
    Unknown,
}

impl LanguageLabel {
    pub fn from_code(code: &str) -> Self {
        match code {
            "en" => LanguageLabel::English,
            "ta" => LanguageLabel::Tamil,
            "hi" => LanguageLabel::Hindi,
            "te" => LanguageLabel::Telugu,
            "ml" => LanguageLabel::Malayalam,
            _ => LanguageLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLabel::English => "English",
            LanguageLabel::Tamil => "Tamil",
            LanguageLabel::Hindi => "Hindi",
            LanguageLabel::Telugu => "Telugu",
            LanguageLabel::Malayalam => "Malayalam",
            LanguageLabel::Unknown => "Unknown",
        }
    }
}

type ModelLoader = Box<dyn Fn() -> Result<Box<dyn SpeechModel>, ModelError> + Send + Sync>;

/// Process-wide language identifier.
///
/// Holds the model behind a [`OnceCell`]: concurrent first callers block on a
/// single load, later callers reuse the handle for the life of the process.
pub struct LanguageIdentifier {
    model: OnceCell<Box<dyn SpeechModel>>,
    loader: ModelLoader,
}

impl LanguageIdentifier {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            model: OnceCell::new(),
            loader,
        }
    }

    /// Identifier backed by a whisper.cpp model file.
    pub fn whisper(model_path: String, threads: usize) -> Self {
        Self::new(Box::new(move || {
            tracing::info!("loading speech model from {}", model_path);
            let model = WhisperModel::load(&model_path, threads)?;
            Ok(Box::new(model) as Box<dyn SpeechModel>)
        }))
    }

    /// Best-effort label for a clip; never fails the request.
    pub fn identify(&self, clip: &AudioClip) -> LanguageLabel {
        match self.try_identify(clip) {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!("language identification failed, reporting Unknown: {}", e);
                LanguageLabel::Unknown
            }
        }
    }

    fn try_identify(&self, clip: &AudioClip) -> Result<LanguageLabel, ModelError> {
        let samples = if clip.sample_rate == MODEL_SAMPLE_RATE {
            clip.samples.clone()
        } else {
            resample(&clip.samples, clip.sample_rate, MODEL_SAMPLE_RATE)
                .map_err(|e| ModelError::Inference(e.to_string()))?
        };
        let samples = pad_or_trim(samples, MODEL_CLIP_SAMPLES);

        let model = self.model.get_or_try_init(|| (self.loader)())?;

        let probs = model.language_probs(&samples)?;
        let top = probs
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| ModelError::Inference("empty probability distribution".into()))?;

        Ok(LanguageLabel::from_code(&top.0))
    }
}

fn pad_or_trim(mut samples: Vec<f32>, len: usize) -> Vec<f32> {
    samples.resize(len, 0.0);
    samples
}
