//! Going from a form submission to a model reply.

use tracing::{error, info};

use crate::{config::Config, model::TextModel, prompt::build_prompt};

/// What the visitor sent us.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Only consulted when the config doesn't already have a key.
    pub api_key: Option<String>,
    pub description: String,
}

/// A submission that's ready to be sent to the model.
#[derive(Debug)]
pub struct PreparedRequest {
    api_key: String,
    prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    MissingApiKey,
    MissingDescription,
    /// The model call failed. Holds the error text for the visitor.
    Failed(String),
    /// The raw reply, which gets parsed while rendering.
    Reply(String),
}

/// The key that would be used for a submission: the configured one if there is
/// one, otherwise whatever the visitor typed.
pub fn effective_api_key<'a>(config: &'a Config, submission: &'a Submission) -> Option<&'a str> {
    config.model.api_key.as_deref().or_else(|| {
        submission
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    })
}

/// Check a submission and build its prompt. Nothing is sent anywhere.
pub fn prepare(config: &Config, submission: &Submission) -> Result<PreparedRequest, Outcome> {
    let Some(api_key) = effective_api_key(config, submission) else {
        info!("submission without an api key");
        return Err(Outcome::MissingApiKey);
    };

    let description = submission.description.trim();
    if description.is_empty() {
        info!("submission without a description");
        return Err(Outcome::MissingDescription);
    }

    Ok(PreparedRequest {
        api_key: api_key.to_string(),
        prompt: build_prompt(description),
    })
}

/// Make the one model call for a prepared request.
pub async fn fetch<M: TextModel>(model: &M, request: &PreparedRequest) -> Outcome {
    match model.generate(&request.api_key, &request.prompt).await {
        Ok(text) => {
            info!(reply_len = text.len(), "model replied");
            Outcome::Reply(text)
        }
        Err(err) => {
            error!("model call failed: {err}");
            Outcome::Failed(err.to_string())
        }
    }
}

pub async fn recommend<M: TextModel>(model: &M, config: &Config, submission: &Submission) -> Outcome {
    match prepare(config, submission) {
        Ok(request) => fetch(model, &request).await,
        Err(outcome) => outcome,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;
    use crate::{model::ModelError, parse::parse_reply};

    /// Returns a canned reply and remembers what it was asked.
    #[derive(Clone, Default)]
    pub(crate) struct FakeModel {
        pub reply: Option<String>,
        pub calls: Arc<AtomicUsize>,
        pub last: Arc<Mutex<Option<(String, String)>>>,
    }

    impl FakeModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TextModel for FakeModel {
        async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((api_key.to_string(), prompt.to_string()));
            self.reply.clone().ok_or(ModelError::Api {
                status: 429,
                message: "quota exceeded".to_string(),
            })
        }
    }

    pub(crate) fn config(api_key: Option<&str>) -> Config {
        let mut config = Config::from_toml("[affiliate]\ntag = \"mytag-20\"").unwrap();
        config.model.api_key = api_key.map(str::to_string);
        config
    }

    fn submission(api_key: Option<&str>, description: &str) -> Submission {
        Submission {
            api_key: api_key.map(str::to_string),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_call() {
        let model = FakeModel::replying("A || B");
        let outcome = recommend(&model, &config(None), &submission(Some("  "), "podcaster")).await;
        assert_eq!(outcome, Outcome::MissingApiKey);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_description_makes_no_call() {
        let model = FakeModel::replying("A || B");
        let outcome = recommend(&model, &config(Some("key")), &submission(None, " \n ")).await;
        assert_eq!(outcome, Outcome::MissingDescription);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_wins_over_missing_description() {
        let model = FakeModel::replying("A || B");
        let outcome = recommend(&model, &config(None), &submission(None, "")).await;
        assert_eq!(outcome, Outcome::MissingApiKey);
    }

    #[tokio::test]
    async fn test_reply_is_passed_through() {
        let model = FakeModel::replying("Studio Microphone || Clear audio | Boom Arm || Reduces vibration");
        let outcome = recommend(&model, &config(Some("key")), &submission(None, "podcaster")).await;
        assert_eq!(model.calls(), 1);

        let Outcome::Reply(text) = &outcome else {
            panic!("expected a reply, got {outcome:?}");
        };
        assert_eq!(parse_reply(text).count(), 2);

        let (api_key, prompt) = model.last.lock().unwrap().clone().unwrap();
        assert_eq!(api_key, "key");
        assert_eq!(prompt, build_prompt("podcaster"));
    }

    #[tokio::test]
    async fn test_visitor_key_used_when_none_configured() {
        let model = FakeModel::replying("A || B");
        recommend(&model, &config(None), &submission(Some(" typed-key "), "vlogger")).await;
        let (api_key, _) = model.last.lock().unwrap().clone().unwrap();
        assert_eq!(api_key, "typed-key");
    }

    #[tokio::test]
    async fn test_configured_key_takes_precedence() {
        let model = FakeModel::replying("A || B");
        recommend(&model, &config(Some("configured")), &submission(Some("typed"), "vlogger")).await;
        let (api_key, _) = model.last.lock().unwrap().clone().unwrap();
        assert_eq!(api_key, "configured");
    }

    #[tokio::test]
    async fn test_failure_is_reported_once() {
        let model = FakeModel::failing();
        let outcome = recommend(&model, &config(Some("key")), &submission(None, "gamer")).await;
        assert_eq!(
            outcome,
            Outcome::Failed("API returned error: 429 - quota exceeded".to_string())
        );
        assert_eq!(model.calls(), 1);
    }
}
