//! POST /detect-voice

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::analysis::{self, score};
use crate::audio::{self, AudioFormat};
use crate::{AppError, AppResult, AppState};

/// Terminal artifact of one detection request. Stateless, never persisted.
#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub classification: &'static str,
    /// Two-decimal value; widened to f64 so it serializes exactly
    pub confidence: f64,
    pub detected_language: &'static str,
}

/// Classify an uploaded clip as human or AI-generated.
///
/// Auth has already run in middleware. The extension gate rejects anything
/// but wav/mp3 before a single byte is decoded; everything CPU-bound runs on
/// a blocking worker so the runtime stays responsive.
pub async fn detect_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DetectionResponse>> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    let format = AudioFormat::from_filename(&filename)
        .ok_or_else(|| AppError::InvalidInput("Upload WAV or MP3 only".to_string()))?;

    let result = tokio::task::spawn_blocking(move || analyze(state, format, data))
        .await
        .map_err(|e| AppError::Processing(format!("analysis task panicked: {e}")))??;

    Ok(Json(result))
}

async fn read_file_field(multipart: &mut Multipart) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {e}")))?;
            return Ok((filename, data.to_vec()));
        }
    }

    Err(AppError::InvalidInput("Missing multipart field 'file'".to_string()))
}

fn analyze(state: AppState, format: AudioFormat, bytes: Vec<u8>) -> AppResult<DetectionResponse> {
    let clip = audio::decode(bytes, format)?;
    let duration = clip.duration_secs();

    if duration > state.config.max_clip_secs {
        return Err(AppError::InvalidInput(format!(
            "Audio too long. Max {} seconds allowed.",
            state.config.max_clip_secs as u32
        )));
    }

    // Best-effort, attached to the response whichever scoring path runs
    let language = state.language.identify(&clip);

    let verdict = if duration < state.config.min_clip_secs {
        // Too little signal to score anything
        score::short_clip_verdict()
    } else {
        let features = analysis::extract(&clip);
        let likelihood = score::ai_likelihood(&features, &state.config.scoring);
        tracing::debug!(
            flatness = features.spectral_flatness_mean,
            energy_var = features.energy_variance,
            pitch_var = features.pitch_variance,
            onset_var = features.onset_variance,
            likelihood,
            "scored clip"
        );
        score::decide(likelihood, &state.config.scoring)
    };

    Ok(DetectionResponse {
        classification: verdict.classification.as_str(),
        confidence: (verdict.confidence as f64 * 100.0).round() / 100.0,
        detected_language: language.as_str(),
    })
}
