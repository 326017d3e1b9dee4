use crate::deadline::Deadline;
use crate::http::HttpFetcher;
use crate::translate::{Provider, ProviderOutcome, TranslateError, TranslationRequest};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

pub const MYMEMORY_SOURCE: &str = "MyMemory API";
/// Results scoring above this are accepted regardless of content.
pub const MIN_CONFIDENCE: f64 = 0.3;
/// Disclaimer MyMemory returns in place of a translation when it has no data.
pub const LOW_QUALITY_MARKER: &str = "translated by";

#[derive(Clone)]
pub struct MyMemoryProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl MyMemoryProvider {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, request: &TranslationRequest) -> String {
        format!(
            "{}/get?q={}&langpair={}|{}",
            self.base_url,
            urlencoding::encode(&request.text),
            urlencoding::encode(&request.source_code),
            urlencoding::encode(&request.target_code),
        )
    }

    async fn fetch_translation(
        &self,
        request: &TranslationRequest,
        deadline: Deadline,
    ) -> Result<String, TranslateError> {
        let body = self.fetcher.fetch(&self.build_url(request), deadline).await?;
        parse_response(&body)
    }
}

fn parse_response(body: &[u8]) -> Result<String, TranslateError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| TranslateError::Parse(format!("invalid json: {e}")))?;

    let data = &envelope["responseData"];
    let translation = data["translatedText"]
        .as_str()
        .ok_or_else(|| TranslateError::Parse("missing responseData.translatedText".into()))?;

    let confidence = match &data["match"] {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };

    // Rejected only when both signals agree: low score and the disclaimer text.
    if confidence > MIN_CONFIDENCE || !translation.to_lowercase().contains(LOW_QUALITY_MARKER) {
        Ok(translation.to_owned())
    } else {
        Err(TranslateError::LowConfidence { confidence })
    }
}

impl Provider for MyMemoryProvider {
    fn label(&self) -> &str {
        MYMEMORY_SOURCE
    }

    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest,
        deadline: Deadline,
    ) -> BoxFuture<'a, ProviderOutcome> {
        async move { ProviderOutcome::from(self.fetch_translation(request, deadline).await) }.boxed()
    }
}
