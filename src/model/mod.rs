//! The text-generation model we ask for gift ideas.

use std::{future::Future, sync::LazyLock};

use thiserror::Error;

pub mod gemini;

pub use gemini::Gemini;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("the model returned no text")]
    Empty,
}

/// Something that turns a prompt into a completion.
///
/// One call per submission. Implementations don't retry; whatever goes wrong
/// is reported back as a [`ModelError`].
pub trait TextModel: Send + Sync {
    fn generate(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ModelError>> + Send;
}

pub static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::ClientBuilder::new()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
});
