//! Upload page
//!
//! Minimal single-page UI posting to /detect-voice. The page script carries
//! the configured API key, which means the "secret" ships to every client;
//! a known flaw of this design, kept for contract compatibility and rendered
//! from config so at least it cannot drift from the server-side value.

use axum::{
    extract::State,
    response::{Html, Redirect},
};

use crate::AppState;

const UI_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>VoxGuard - Voice Authenticity Detector</title>
    <style>
        body {
            margin: 0;
            font-family: Arial, sans-serif;
            height: 100vh;
            background: #10151c;
            color: white;
            display: flex;
            justify-content: center;
            align-items: center;
        }
        .card {
            background: rgba(255, 255, 255, 0.08);
            padding: 40px;
            border-radius: 18px;
            width: 420px;
            text-align: center;
        }
        input[type="file"] { display: none; }
        .button {
            padding: 14px 34px;
            font-size: 16px;
            border: none;
            border-radius: 30px;
            background: linear-gradient(135deg, #00c6ff, #0072ff);
            color: white;
            cursor: pointer;
        }
        .result {
            margin-top: 25px;
            padding: 18px;
            border-radius: 12px;
            background: rgba(255,255,255,0.15);
            font-weight: bold;
        }
    </style>
</head>
<body>
<div class="card">
    <h1>VoxGuard - Voice Authenticity Detector</h1>
    <p>Verify whether a voice is Human or AI-Generated</p>

    <input type="file" id="audioInput" accept=".mp3,.wav">
    <button class="button" onclick="document.getElementById('audioInput').click()">Detect Voice</button>

    <div class="result" id="output"></div>
</div>

<script>
document.getElementById("audioInput").addEventListener("change", async function () {
    const file = this.files[0];
    const output = document.getElementById("output");

    if (!file) return;

    output.innerHTML = "Analyzing the voice sample...";

    const formData = new FormData();
    formData.append("file", file);

    try {
        const response = await fetch("/detect-voice", {
            method: "POST",
            headers: { "x-api-key": "__API_KEY__" },
            body: formData
        });

        const data = await response.json();

        if (response.ok) {
            output.innerHTML =
                "Voice Type: " + data.classification +
                "<br>Confidence: " + data.confidence +
                "<br>Language: " + data.detected_language;
        } else {
            output.innerHTML = data.detail;
        }
    } catch {
        output.innerHTML = "Unable to reach the server.";
    }
});
</script>
</body>
</html>
"#;

pub async fn home() -> Redirect {
    Redirect::to("/ui")
}

pub async fn page(State(state): State<AppState>) -> Html<String> {
    Html(UI_PAGE.replace("__API_KEY__", &state.config.api_key))
}
