use crate::config::TranslatorConfig;
use crate::deadline::Deadline;
use crate::http::{FetchError, HttpFetcher};
use crate::translate::{
    GoogleProvider, MockTranslator, MyMemoryProvider, Provider, ProviderOutcome, TranslateError,
    TranslationRequest, TranslationResult,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const MOCK_SOURCE: &str = "Mock Translation";
pub const MOCK_TIMEOUT_SOURCE: &str = "Mock Translation (Timeout)";
pub const MOCK_CANCELLED_SOURCE: &str = "Mock Translation (Cancelled)";

const LOG_TARGET: &str = "translate::fallback";

enum ChainOutcome {
    Real { text: String, label: String },
    Exhausted,
    DeadlineExceeded,
}

/// Runs providers in priority order under one overall deadline and falls
/// back to [`MockTranslator`] when none of them produce text.
///
/// Providers run one after another, never concurrently; the first non-blank
/// translation wins and later providers are not called.
#[derive(Clone)]
pub struct FallbackTranslator {
    providers: Vec<Arc<dyn Provider>>,
    mock: MockTranslator,
    overall: Duration,
}

impl FallbackTranslator {
    pub fn new(providers: Vec<Arc<dyn Provider>>, overall: Duration) -> Self {
        Self {
            providers,
            mock: MockTranslator::new(),
            overall,
        }
    }

    /// MyMemory first, Google second, sharing one HTTP client.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.timeouts, config.user_agent.clone())?;
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(MyMemoryProvider::new(
                fetcher.clone(),
                config.endpoints.mymemory.clone(),
            )),
            Arc::new(GoogleProvider::new(fetcher, config.endpoints.google.clone())),
        ];
        Ok(Self::new(providers, config.timeouts.overall()))
    }

    pub fn provider_labels(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.label())
    }

    pub fn overall_timeout(&self) -> Duration {
        self.overall
    }

    /// Translate under the configured overall deadline. Always resolves.
    pub async fn translate(&self, request: &TranslationRequest) -> TranslationResult {
        self.translate_until(
            request,
            Deadline::after(self.overall),
            &CancellationToken::new(),
        )
        .await
    }

    /// Run the translation as its own task so the calling thread stays free.
    pub fn spawn(&self, request: TranslationRequest) -> tokio::task::JoinHandle<TranslationResult> {
        let this = self.clone();
        tokio::spawn(async move { this.translate(&request).await })
    }

    pub async fn translate_until(
        &self,
        request: &TranslationRequest,
        deadline: Deadline,
        cancel: &CancellationToken,
    ) -> TranslationResult {
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            res = tokio::time::timeout_at(deadline.instant(), self.run_chain(request, deadline)) => {
                Some(res.unwrap_or(ChainOutcome::DeadlineExceeded))
            }
        };

        let elapsed = started.elapsed();
        match outcome {
            Some(ChainOutcome::Real { text, label }) => {
                tracing::info!(target: LOG_TARGET, provider = %label, ?elapsed, "translation completed");
                TranslationResult::real(text, &label)
            }
            Some(ChainOutcome::Exhausted) => {
                tracing::warn!(target: LOG_TARGET, ?elapsed, "all providers unavailable, using mock translation");
                self.mock_result(request, MOCK_SOURCE)
            }
            Some(ChainOutcome::DeadlineExceeded) => {
                tracing::warn!(target: LOG_TARGET, ?elapsed, "overall deadline exceeded, using mock translation");
                self.mock_result(request, MOCK_TIMEOUT_SOURCE)
            }
            None => {
                tracing::info!(target: LOG_TARGET, ?elapsed, "translation cancelled");
                self.mock_result(request, MOCK_CANCELLED_SOURCE)
            }
        }
    }

    async fn run_chain(&self, request: &TranslationRequest, deadline: Deadline) -> ChainOutcome {
        for provider in &self.providers {
            if deadline.is_expired() {
                return ChainOutcome::DeadlineExceeded;
            }

            let reason = match provider.translate(request, deadline).await {
                ProviderOutcome::Translated(text) if !text.trim().is_empty() => {
                    return ChainOutcome::Real {
                        text,
                        label: provider.label().to_owned(),
                    };
                }
                ProviderOutcome::Translated(_) => TranslateError::EmptyTranslation,
                ProviderOutcome::Unavailable(reason) => reason,
            };

            tracing::warn!(
                target: LOG_TARGET,
                provider = provider.label(),
                reason = %reason,
                "provider unavailable"
            );
        }

        // A per-call timeout that fired at the overall deadline still counts
        // as the deadline.
        if deadline.is_expired() {
            ChainOutcome::DeadlineExceeded
        } else {
            ChainOutcome::Exhausted
        }
    }

    fn mock_result(&self, request: &TranslationRequest, source: &str) -> TranslationResult {
        let text = self
            .mock
            .generate(&request.text, &request.source_code, &request.target_code);
        TranslationResult::mock(text, source)
    }
}
