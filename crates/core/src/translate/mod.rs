mod fallback;
mod google;
mod mock;
mod mymemory;
mod validate;

use crate::deadline::Deadline;
use crate::http::FetchError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

pub use fallback::{
    FallbackTranslator, MOCK_CANCELLED_SOURCE, MOCK_SOURCE, MOCK_TIMEOUT_SOURCE,
};
pub use google::{GoogleProvider, GOOGLE_SOURCE};
pub use mock::{generate_mock_translation, MockTranslator};
pub use mymemory::{MyMemoryProvider, LOW_QUALITY_MARKER, MIN_CONFIDENCE, MYMEMORY_SOURCE};
pub use validate::{is_valid_translation, FAILURE_MARKERS};

/// Text plus opaque language codes. Codes are never checked against a
/// registry; that mapping belongs to the caller.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_code: String,
    pub target_code: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_code: impl Into<String>,
        target_code: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_code: source_code.into(),
            target_code: target_code.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationResult {
    pub translated_text: String,
    /// Provenance label shown to users, e.g. `"MyMemory API"`.
    pub source: String,
    pub is_real: bool,
    pub timestamp: SystemTime,
}

impl TranslationResult {
    pub(crate) fn real(translated_text: String, source: &str) -> Self {
        Self {
            translated_text,
            source: source.to_owned(),
            is_real: true,
            timestamp: SystemTime::now(),
        }
    }

    pub(crate) fn mock(translated_text: String, source: &str) -> Self {
        Self {
            translated_text,
            source: source.to_owned(),
            is_real: false,
            timestamp: SystemTime::now(),
        }
    }
}

/// Why a provider produced nothing usable. Never surfaced to callers; it
/// only advances the chain.
#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(String),

    #[error("http status {0}")]
    NonOkStatus(u16),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("low confidence result (match {confidence})")]
    LowConfidence { confidence: f64 },

    #[error("provider returned an empty translation")]
    EmptyTranslation,

    #[error("timed out")]
    Timeout,
}

impl From<FetchError> for TranslateError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NonOkStatus(code) => TranslateError::NonOkStatus(code),
            FetchError::Timeout => TranslateError::Timeout,
            FetchError::Network(e) | FetchError::ClientInit(e) => {
                TranslateError::Network(e.to_string())
            }
        }
    }
}

#[derive(Debug)]
pub enum ProviderOutcome {
    Translated(String),
    Unavailable(TranslateError),
}

impl From<Result<String, TranslateError>> for ProviderOutcome {
    fn from(result: Result<String, TranslateError>) -> Self {
        match result {
            Ok(text) => ProviderOutcome::Translated(text),
            Err(reason) => ProviderOutcome::Unavailable(reason),
        }
    }
}

/// One external translation endpoint. Implementations are total: every
/// failure comes back as [`ProviderOutcome::Unavailable`].
pub trait Provider: Send + Sync {
    /// Provenance label stored in [`TranslationResult::source`].
    fn label(&self) -> &str;

    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest,
        deadline: Deadline,
    ) -> BoxFuture<'a, ProviderOutcome>;
}
