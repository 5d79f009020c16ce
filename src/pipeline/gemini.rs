//! The analysis exchange: request types, response types, one API call.
//!
//! This module speaks the `models/{model}:generateContent` wire format of
//! the generative-language API. It is intentionally thin — the review
//! prompt lives in [`crate::prompts`] and response interpretation lives in
//! [`crate::pipeline::extract`], so wire-format changes stay contained
//! here.
//!
//! Every response field is optional. The shape of a model answer is not
//! under our control, and a structurally surprising but successful response
//! must degrade to a fallback report rather than abort the run, so
//! deserialization is as lenient as serde allows.

use crate::config::AnalysisConfig;
use crate::error::{truncate_body, PapercheckError};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

// ── Request types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// One content segment: either text or an inline binary payload.
#[derive(Debug, Serialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

// ── Response types ───────────────────────────────────────────────────────

/// Response envelope. All fields optional by design — see the module docs.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// One segment of a candidate's content; non-textual segments carry no
/// `text` and are skipped during extraction.
#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

// ── Request build + exchange ─────────────────────────────────────────────

/// Build the request payload: one user turn carrying the review
/// instructions followed by the inline document.
pub fn build_request(prompt: &str, document: Part, config: &AnalysisConfig) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part::text(prompt), document],
        }],
        generation_config: Some(GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }),
    }
}

/// Drive the single analysis exchange.
///
/// One request, one response, no retries and no local cancellation — the
/// configured reqwest timeout is the only ceiling. Returns the lenient
/// response envelope together with the HTTP status and elapsed time.
pub async fn generate_content(
    api_key: &str,
    request: &GenerateContentRequest,
    config: &AnalysisConfig,
) -> Result<(GenerateContentResponse, u16, u64), PapercheckError> {
    let url = format!("{}/{}:generateContent", config.api_base_url, config.model);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.api_timeout_secs))
        .build()
        .map_err(|e| PapercheckError::RequestFailed {
            reason: e.to_string(),
        })?;

    let start = Instant::now();
    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(request)
        .send()
        .await
        .map_err(|e| PapercheckError::RequestFailed {
            reason: e.to_string(),
        })?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let status = response.status();
    info!("Analysis exchange finished: HTTP {} in {}ms", status, elapsed_ms);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Service error body (truncated): {}", truncate_body(&body));
        return Err(PapercheckError::ServiceFailure {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    let envelope: GenerateContentResponse =
        response
            .json()
            .await
            .map_err(|e| PapercheckError::Internal(format!("Malformed response body: {e}")))?;

    debug!("Response carries {} candidate(s)", envelope.candidates.len());
    Ok((envelope, status.as_u16(), elapsed_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_pdf;

    #[test]
    fn request_serialises_prompt_then_document() {
        let config = AnalysisConfig::default();
        let req = build_request("check this paper", encode_pdf(b"%PDF-1.4"), &config);
        let json = serde_json::to_value(&req).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(parts[0]["text"], "check this paper");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "application/pdf");
        // Text part must not carry an inline_data key and vice versa.
        assert!(parts[0].get("inline_data").is_none());
        assert!(parts[1].get("text").is_none());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());

        let bare: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert!(bare.candidates[0].content.is_none());

        let partial: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hi"},{"inlineData":{}}]}}]}"#,
        )
        .unwrap();
        let parts = &partial.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("hi"));
        assert!(parts[1].text.is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_failure() {
        let config = AnalysisConfig::builder()
            .api_base_url("http://192.0.2.1/models")
            .api_timeout_secs(1)
            .build()
            .unwrap();
        let req = build_request("p", encode_pdf(b"%PDF"), &config);
        let err = generate_content("key", &req, &config).await;
        assert!(matches!(err, Err(PapercheckError::RequestFailed { .. })));
    }
}
