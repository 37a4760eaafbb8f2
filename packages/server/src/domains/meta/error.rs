use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("Content is required to generate meta tags.")]
    EmptyContent,

    #[error("Meta tag generation is not configured (OPENAI_API_KEY missing)")]
    NotConfigured,

    #[error("Invalid or missing OpenAI API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Failed to generate meta tags: {0}")]
    Generation(String),
}

impl MetaError {
    /// Classify an AI failure, looking through to the OpenAI client error.
    pub fn from_ai(err: anyhow::Error) -> Self {
        match err.downcast_ref::<openai_client::OpenAIError>() {
            Some(e) if e.is_auth() => Self::InvalidApiKey,
            Some(e) if e.is_rate_limited() => Self::RateLimited,
            _ => Self::Generation(format!("{:#}", err)),
        }
    }
}
