//! Single-shot HTTP GET used by the provider adapters.
//!
//! The fetcher never retries. Connect and read limits come from
//! [`TimeoutBudget`]; the caller's [`Deadline`] caps the whole request on top
//! of those.

use crate::config::TimeoutBudget;
use crate::deadline::Deadline;
use bytes::Bytes;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};

const LOG_TARGET: &str = "http";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    ClientInit(#[source] reqwest::Error),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("http status {0}")]
    NonOkStatus(u16),

    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(timeouts: &TimeoutBudget, user_agent: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect())
            .read_timeout(timeouts.read())
            .build()
            .map_err(FetchError::ClientInit)?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }

    /// GET `url` and return the body of a 200 response.
    pub async fn fetch(&self, url: &str, deadline: Deadline) -> Result<Bytes, FetchError> {
        if deadline.is_expired() {
            return Err(FetchError::Timeout);
        }

        tokio::time::timeout_at(deadline.instant(), self.get(url))
            .await
            .map_err(|_| FetchError::Timeout)?
    }

    async fn get(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(target: LOG_TARGET, %status, "non-ok response");
            return Err(FetchError::NonOkStatus(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&TimeoutBudget::default(), "test-agent/1.0").unwrap()
    }

    /// Accepts one connection and holds it open without ever responding.
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn returns_body_and_sends_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ok")
            .match_header("user-agent", "test-agent/1.0")
            .with_status(200)
            .with_body("payload")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/ok", server.url()), Deadline::after(Duration::from_secs(5)))
            .await
            .unwrap();

        assert_eq!(&body[..], b"payload");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_ok_status_is_typed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/down", server.url()), Deadline::after(Duration::from_secs(5)))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NonOkStatus(503)));
    }

    #[tokio::test]
    async fn expired_deadline_short_circuits() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", "/ok").expect(0).create_async().await;

        let expired = Deadline::at(tokio::time::Instant::now());
        let err = fetcher()
            .fetch(&format!("{}/ok", server.url()), expired)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let err = fetcher()
            .fetch("http://127.0.0.1:9/", Deadline::after(Duration::from_secs(5)))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn deadline_cuts_off_request_in_flight() {
        let url = silent_server().await;
        let started = tokio::time::Instant::now();

        let err = fetcher()
            .fetch(&url, Deadline::after(Duration::from_millis(300)))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn read_timeout_is_reported_as_timeout() {
        let url = silent_server().await;
        let budget = TimeoutBudget::new(5_000, 100, 10_000).unwrap();
        let fetcher = HttpFetcher::new(&budget, "test-agent/1.0").unwrap();
        let started = tokio::time::Instant::now();

        let err = fetcher
            .fetch(&url, Deadline::after(Duration::from_secs(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
