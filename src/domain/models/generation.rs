//! Generation outcome and question classification models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message shown when no API key is configured
pub const NO_CREDENTIALS_MESSAGE: &str = "No API keys available. Please check your configuration.";

/// Message shown when every configured key failed
pub const ALL_CREDENTIALS_EXHAUSTED_MESSAGE: &str =
    "All API keys have failed. Please try again later.";

/// Message shown when the backend did not answer in time
pub const TIMEOUT_MESSAGE: &str = "Sorry, the response took too long. Please try again later.";

/// Result of a call through the key-rotating client
///
/// Failures are ordinary values here: the assistant shows them to the user
/// instead of crashing the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// Backend answered; text is already trimmed
    Success(String),

    /// The credential pool is empty
    NoCredentialsConfigured,

    /// Every attempt failed with a backend error
    AllCredentialsExhausted,

    /// The final attempt exceeded the per-call deadline
    Timeout,
}

impl GenerationOutcome {
    /// Returns true for [`GenerationOutcome::Success`]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Text to show the user
    pub fn message(&self) -> &str {
        match self {
            Self::Success(text) => text,
            Self::NoCredentialsConfigured => NO_CREDENTIALS_MESSAGE,
            Self::AllCredentialsExhausted => ALL_CREDENTIALS_EXHAUSTED_MESSAGE,
            Self::Timeout => TIMEOUT_MESSAGE,
        }
    }

    /// Consume the outcome, returning the display text
    pub fn into_message(self) -> String {
        match self {
            Self::Success(text) => text,
            other => other.message().to_string(),
        }
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How the answer composer routes a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Greetings and thanks, answered without document context
    SmallTalk,

    /// Questions answered from the retrieved context
    Content,
}
