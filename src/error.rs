use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse listing row ({reason}): {fragment}")]
pub struct ParseFailure {
    pub fragment: String,
    pub reason: String,
}

impl ParseFailure {
    pub fn new(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }
}

/// A metadata query that failed in transit. Treated as "not found" for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metadata API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode metadata response: {0}")]
    Decode(#[from] serde_json::Error),
}
