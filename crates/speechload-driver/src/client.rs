// HTTP call wrapper for the speech-synthesis endpoint.

use serde::Serialize;
use thiserror::Error;

use speechload_core::Voice;

/// Path suffix every target URL is normalized to end with.
pub const SPEECH_PATH: &str = "/v1/audio/speech";

/// Fixed model identifier sent with every request.
const MODEL: &str = "tts-1";

/// Fixed speed multiplier sent with every request.
const SPEED: f64 = 1.0;

/// Static placeholder credential; the target server does not validate it.
const API_KEY: &str = "dummy-api-key";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, timeout, or malformed-response failure; anything
    /// that prevented observing an HTTP status at all.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    input: &'a str,
    model: &'a str,
    voice: Voice,
    speed: f64,
}

/// Raw observation of one HTTP exchange, before classification.
///
/// The body is treated as an opaque binary blob; it is never decoded.
#[derive(Debug)]
pub struct SpeechResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for the speech-synthesis endpoint.
///
/// Holds a pooled `reqwest::Client` and the fully-normalized endpoint
/// URL; one instance is shared across every request of a run.
pub struct SpeechClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SpeechClient {
    /// Build a client for `base_url`, appending the speech path
    /// unless the URL already ends with it.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: normalize_url(base_url),
        }
    }

    /// The fully-qualified endpoint URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one synthesis request and read the full body.
    ///
    /// Non-200 statuses come back as observations, not errors; only
    /// transport-level failures surface as `ClientError`.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
    ) -> Result<SpeechResponse, ClientError> {
        let request = SpeechRequest {
            input: text,
            model: MODEL,
            voice,
            speed: SPEED,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", API_KEY))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response.bytes().await?.to_vec();

        Ok(SpeechResponse {
            status,
            content_type,
            body,
        })
    }
}

fn normalize_url(base_url: &str) -> String {
    if base_url.ends_with(SPEECH_PATH) {
        base_url.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), SPEECH_PATH)
    }
}
