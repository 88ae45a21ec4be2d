//! Speech-synthesis boundary.
//!
//! The engine only ever talks to a proxy that holds the real API key, so this
//! module is interfaces: the wire DTOs for `POST /synthesize`, the error
//! taxonomy the proxy answers with, and the client trait playback
//! implementations program against. Any error text that crosses this boundary
//! goes through credential redaction first.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::WeatherReport;

pub const DEFAULT_LANGUAGE_CODE: &str = "en-GB";
pub const DEFAULT_VOICE: &str = "en-GB-Wavenet-B";
pub const DEFAULT_ENCODING: &str = "LINEAR16";
pub const DEFAULT_SAMPLE_RATE_HERTZ: u32 = 24_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisInput {
    pub ssml: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
    pub sample_rate_hertz: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelection,
    pub audio_config: AudioConfig,
}

impl SynthesizeRequest {
    /// Request for one report's SSML with the broadcast voice defaults.
    pub fn for_report(report: &WeatherReport) -> Self {
        Self {
            input: SynthesisInput {
                ssml: report.ssml.clone(),
            },
            voice: VoiceSelection {
                language_code: DEFAULT_LANGUAGE_CODE.to_string(),
                name: DEFAULT_VOICE.to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: DEFAULT_ENCODING.to_string(),
                sample_rate_hertz: DEFAULT_SAMPLE_RATE_HERTZ,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    /// Base64-encoded audio.
    pub audio_content: String,
    pub audio_config: AudioConfig,
}

/// Error body the proxy answers with alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TtsError {
    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("origin not allowed")]
    OriginDenied,

    #[error("invalid synthesis request: {0}")]
    InvalidRequest(String),

    #[error("upstream synthesis failed ({code}): {message}")]
    Upstream { code: u16, message: String },
}

impl TtsError {
    /// Map a proxy error body to the typed taxonomy, redacting the message.
    pub fn from_error_body(body: &ErrorBody) -> Self {
        match body.code {
            429 => Self::RateLimited {
                retry_after_secs: body.retry_after.unwrap_or(60),
            },
            403 => Self::OriginDenied,
            400 => Self::InvalidRequest(redact_credentials(&body.error)),
            code => Self::Upstream {
                code,
                message: redact_credentials(&body.error),
            },
        }
    }
}

#[async_trait]
pub trait TtsClient: Send + Sync {
    async fn synthesize(&self, request: &SynthesizeRequest)
        -> Result<SynthesizeResponse, TtsError>;
}

/// Strip anything that looks like a credential before a message is surfaced.
/// Covers `key=` query fragments, Google-style `AIza…` tokens, and bearer
/// tokens; anything else passes through untouched.
pub fn redact_credentials(message: &str) -> String {
    let mut redacted: Vec<String> = Vec::new();
    let mut previous_was_bearer = false;

    for word in message.split_whitespace() {
        let lowered = word.to_ascii_lowercase();
        let replacement = if previous_was_bearer || word.starts_with("AIza") {
            "[redacted]".to_string()
        } else if let Some(pos) = lowered.find("key=") {
            format!("{}key=[redacted]", &word[..pos])
        } else {
            word.to_string()
        };
        previous_was_bearer = lowered == "bearer";
        redacted.push(replacement);
    }

    redacted.join(" ")
}
