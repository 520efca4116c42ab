//! Endpoint tests: the full router driven through tower, with synthesized
//! WAV uploads and an injected speech model.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use crate::config::{Config, ScoringConfig};
use crate::language::{LanguageIdentifier, ModelError, SpeechModel};
use crate::{create_router, AppState};

const TEST_KEY: &str = "test-key";
const BOUNDARY: &str = "voxguard-test-boundary";

struct FixedModel {
    code: &'static str,
}

impl SpeechModel for FixedModel {
    fn language_probs(&self, _samples: &[f32]) -> Result<Vec<(String, f32)>, ModelError> {
        Ok(vec![(self.code.to_string(), 1.0)])
    }
}

fn test_config() -> Config {
    Config {
        port: 0,
        api_key: TEST_KEY.to_string(),
        model_path: "unused".to_string(),
        inference_threads: 1,
        min_clip_secs: 1.0,
        max_clip_secs: 15.0,
        scoring: ScoringConfig::default(),
    }
}

fn state_with_identifier(identifier: LanguageIdentifier) -> AppState {
    AppState {
        config: test_config(),
        language: Arc::new(identifier),
    }
}

fn english_state() -> AppState {
    state_with_identifier(LanguageIdentifier::new(Box::new(|| {
        Ok(Box::new(FixedModel { code: "en" }) as Box<dyn SpeechModel>)
    })))
}

fn wav_bytes(secs: f32, sample_rate: u32, freq: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let n = (secs * sample_rate as f32) as usize;
        for i in 0..n {
            let t = i as f32 / sample_rate as f32;
            let sample = (2.0 * std::f32::consts::PI * freq * t).sin() * 16000.0;
            writer.write_sample(sample as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn multipart_body(filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn detect_request(api_key: Option<&str>, filename: &str, file_bytes: &[u8]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/detect-voice")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder
        .body(Body::from(multipart_body(filename, file_bytes)))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_api_key_is_401() {
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(None, "clip.wav", &wav_bytes(2.0, 16000, 200.0)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["detail"], "Invalid API Key");
}

#[tokio::test]
async fn wrong_api_key_is_401_before_file_validation() {
    // Bad key plus a bad extension: auth must win
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(Some("nope"), "clip.txt", b"not audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["detail"], "Invalid API Key");
}

#[tokio::test]
async fn txt_extension_is_400_without_decoding() {
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(Some(TEST_KEY), "clip.txt", b"not audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["detail"], "Upload WAV or MP3 only");
}

#[tokio::test]
async fn missing_file_field_is_400() {
    let app = create_router(english_state());
    let body = format!("--{BOUNDARY}--\r\n");
    let request = Request::builder()
        .method("POST")
        .uri("/detect-voice")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-api-key", TEST_KEY)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn corrupt_wav_is_500_with_generic_detail() {
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(Some(TEST_KEY), "clip.wav", &[0u8; 64]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["detail"], "Audio processing failed.");
}

#[tokio::test]
async fn overlong_clip_is_400_audio_too_long() {
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(
            Some(TEST_KEY),
            "clip.wav",
            &wav_bytes(20.0, 16000, 200.0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["detail"], "Audio too long. Max 15 seconds allowed.");
}

#[tokio::test]
async fn sub_second_clip_gets_the_low_confidence_default() {
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(
            Some(TEST_KEY),
            "clip.wav",
            &wav_bytes(0.5, 16000, 200.0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["classification"], "Human Voice");
    assert_eq!(body["confidence"], 0.5);
    assert_eq!(body["detected_language"], "English");
}

#[tokio::test]
async fn steady_tone_scores_as_ai_generated() {
    // A pure tone trips all four low-variance conditions: flat-spectrum
    // mean near zero, constant energy, constant pitch, no onsets.
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(
            Some(TEST_KEY),
            "clip.wav",
            &wav_bytes(2.0, 16000, 200.0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["classification"], "AI-Generated Voice");
    assert_eq!(body["confidence"], 1.0);
    assert_eq!(body["detected_language"], "English");
}

#[tokio::test]
async fn language_failure_degrades_to_unknown_not_an_error() {
    let state = state_with_identifier(LanguageIdentifier::new(Box::new(|| {
        Err(ModelError::Load("no model file".into()))
    })));
    let app = create_router(state);

    let response = app
        .oneshot(detect_request(
            Some(TEST_KEY),
            "clip.wav",
            &wav_bytes(2.0, 16000, 200.0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["detected_language"], "Unknown");
}

#[tokio::test]
async fn model_initializes_once_across_requests() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let state = state_with_identifier(LanguageIdentifier::new(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixedModel { code: "ta" }) as Box<dyn SpeechModel>)
    })));
    let app = create_router(state);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(detect_request(
                Some(TEST_KEY),
                "clip.wav",
                &wav_bytes(1.5, 16000, 200.0),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["detected_language"], "Tamil");
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mp3_extension_is_accepted_for_validation() {
    // Garbage mp3 bytes pass the extension gate and fail in the decoder,
    // which is the 500 path, not the 400 one.
    let app = create_router(english_state());
    let response = app
        .oneshot(detect_request(Some(TEST_KEY), "voice.MP3", &[0u8; 64]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn root_redirects_to_ui() {
    let app = create_router(english_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/ui");
}

#[tokio::test]
async fn ui_page_embeds_the_configured_key() {
    let app = create_router(english_state());
    let response = app
        .oneshot(Request::builder().uri("/ui").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains(TEST_KEY));
    assert!(!page.contains("__API_KEY__"));
}

#[tokio::test]
async fn health_is_public() {
    let app = create_router(english_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
}
