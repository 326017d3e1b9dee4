use crate::deadline::Deadline;
use crate::http::HttpFetcher;
use crate::translate::{Provider, ProviderOutcome, TranslateError, TranslationRequest};
use futures::future::BoxFuture;
use futures::FutureExt;
use url::Url;

pub const GOOGLE_SOURCE: &str = "Google Translate";

/// Unofficial `translate_a/single` endpoint. The body is a nested array
/// serialized as text; only the first translated segment is used.
#[derive(Clone)]
pub struct GoogleProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, request: &TranslationRequest) -> Result<Url, TranslateError> {
        Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", request.source_code.as_str()),
                ("tl", request.target_code.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| TranslateError::Parse(format!("bad request url: {e}")))
    }

    async fn fetch_translation(
        &self,
        request: &TranslationRequest,
        deadline: Deadline,
    ) -> Result<String, TranslateError> {
        let url = self.build_url(request)?;
        let body = self.fetcher.fetch(url.as_str(), deadline).await?;
        let body = std::str::from_utf8(&body)
            .map_err(|e| TranslateError::Parse(format!("body is not utf-8: {e}")))?;
        first_segment(body)
            .map(str::to_owned)
            .ok_or_else(|| TranslateError::Parse("no bracketed segment in response".into()))
    }
}

/// Text between the first two double quotes after a leading `[[`.
fn first_segment(body: &str) -> Option<&str> {
    let rest = body.strip_prefix("[[")?;
    let open = rest.find('"')?;
    let after_open = &rest[open + 1..];
    let close = after_open.find('"')?;
    Some(&after_open[..close])
}

impl Provider for GoogleProvider {
    fn label(&self) -> &str {
        GOOGLE_SOURCE
    }

    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest,
        deadline: Deadline,
    ) -> BoxFuture<'a, ProviderOutcome> {
        async move { ProviderOutcome::from(self.fetch_translation(request, deadline).await) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeoutBudget;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn provider(base_url: String) -> GoogleProvider {
        let fetcher = HttpFetcher::new(&TimeoutBudget::default(), "test-agent").unwrap();
        GoogleProvider::new(fetcher, base_url)
    }

    #[test]
    fn extracts_first_segment() {
        let body = r#"[[["Hallo Welt","hello world",null,null,10]],null,"en"]"#;
        assert_eq!(first_segment(body), Some("Hallo Welt"));
    }

    #[test]
    fn empty_segment_is_still_a_segment() {
        assert_eq!(first_segment(r#"[["","x"]]"#), Some(""));
    }

    #[test]
    fn malformed_bodies_yield_none() {
        assert_eq!(first_segment(r#"{"error":"nope"}"#), None);
        assert_eq!(first_segment("[[no quotes here]]"), None);
        assert_eq!(first_segment(r#"[["unterminated"#), None);
        assert_eq!(first_segment(""), None);
    }

    #[tokio::test]
    async fn sends_language_pair_and_text_as_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client".into(), "gtx".into()),
                Matcher::UrlEncoded("sl".into(), "en".into()),
                Matcher::UrlEncoded("tl".into(), "fr".into()),
                Matcher::UrlEncoded("dt".into(), "t".into()),
                Matcher::UrlEncoded("q".into(), "good morning".into()),
            ]))
            .with_status(200)
            .with_body(r#"[[["bonjour","good morning",null,null,1]],null,"en"]"#)
            .create_async()
            .await;

        let request = TranslationRequest::new("good morning", "en", "fr");
        let outcome = provider(server.url())
            .translate(&request, Deadline::after(Duration::from_secs(5)))
            .await;

        assert!(matches!(outcome, ProviderOutcome::Translated(ref t) if t == "bonjour"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_becomes_unavailable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/translate_a/single")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>captcha</html>")
            .create_async()
            .await;

        let request = TranslationRequest::new("hi", "en", "fr");
        let outcome = provider(server.url())
            .translate(&request, Deadline::after(Duration::from_secs(5)))
            .await;

        assert!(matches!(
            outcome,
            ProviderOutcome::Unavailable(TranslateError::Parse(_))
        ));
    }
}
