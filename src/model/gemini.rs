use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ModelError, TextModel, CLIENT};
use crate::config::ModelConfig;

/// Google's Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct Gemini {
    api_base: String,
    model: String,
}

impl Gemini {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(&config.api_base, &config.name)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl TextModel for Gemini {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, ModelError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, "requesting completion");
        let res = CLIENT
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        parse_response(&body)
    }
}

fn api_error(status: u16, body: &str) -> ModelError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(res) => res.error.message,
        Err(_) => body.trim().to_string(),
    };
    ModelError::Api { status, message }
}

/// Concatenate the text parts of the first candidate.
fn parse_response(body: &str) -> Result<String, ModelError> {
    let res: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;

    let text = res
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ModelError::Empty);
    }
    Ok(text)
}
