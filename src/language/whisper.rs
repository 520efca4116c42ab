//! whisper.cpp backend
//!
//! Uses the fast language-detect path only: mel spectrogram plus
//! `lang_detect`, never a `full()` transcription run. The deployment is
//! latency- and CPU-constrained, so the thread count defaults to 1.

use whisper_rs::{WhisperContext, WhisperContextParameters};

use super::{ModelError, SpeechModel};

pub struct WhisperModel {
    ctx: WhisperContext,
    threads: usize,
}

impl WhisperModel {
    pub fn load(model_path: &str, threads: usize) -> Result<Self, ModelError> {
        let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
            .map_err(|e| ModelError::Load(e.to_string()))?;
        Ok(Self {
            ctx,
            threads: threads.max(1),
        })
    }
}

impl SpeechModel for WhisperModel {
    fn language_probs(&self, samples: &[f32]) -> Result<Vec<(String, f32)>, ModelError> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        state
            .pcm_to_mel(samples, self.threads)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let (_, probs) = state
            .lang_detect(0, self.threads)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        Ok(probs
            .into_iter()
            .enumerate()
            .filter_map(|(id, p)| {
                whisper_rs::get_lang_str(id as i32).map(|code| (code.to_string(), p))
            })
            .collect())
    }
}
