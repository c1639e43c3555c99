//! HTTP client for the spatial data query API.
//!
//! Wraps `reqwest` with a single-attempt GET, turns non-2xx statuses into
//! [`QueryError::UnexpectedStatus`], and hands the body to
//! [`parse_feed`]. The account key travels in the query string, so every URL
//! that reaches a log line or an error has its query removed first.

use std::time::Duration;

use reqwest::{header, Client, Url};
use sds_core::{AppConfig, FindByPropertyRequest};

use crate::error::{QueryError, QueryFailure};
use crate::executor::parse_feed;
use crate::request_url::{build_request_url, redacted};
use crate::types::{QueryResponse, QueryResult};

const ACCEPT_ATOM: &str = "application/atom+xml, application/xml;q=0.9";

/// Client for the find-by-property query endpoint.
///
/// Holds no per-query state; one client can serve any number of concurrent
/// [`QueryClient::execute`] calls.
pub struct QueryClient {
    client: Client,
    base_url: Url,
    maps_key: Option<String>,
}

impl QueryClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`QueryError::InvalidBaseUrl`] if
    /// `SDS_BASE_URL` does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Self::with_client(client, &config.base_url, config.maps_key.as_deref())
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`QueryError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        maps_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sds-query/0.1")
            .build()?;
        Self::with_client(client, base_url, maps_key)
    }

    fn with_client(
        client: Client,
        base_url: &str,
        maps_key: Option<&str>,
    ) -> Result<Self, QueryError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| QueryError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(QueryError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            maps_key: maps_key.map(str::to_owned),
        })
    }

    /// Runs a query and always returns a response envelope.
    ///
    /// Any failure (request validation, transport, XML, or entry mapping)
    /// ends up in [`QueryResponse::error_message`], with the entries mapped
    /// before it kept in `results`.
    pub async fn execute(&self, request: &FindByPropertyRequest) -> QueryResponse {
        QueryResponse::from(self.try_execute(request).await)
    }

    /// Runs a query, reporting failure as an explicit [`QueryFailure`].
    ///
    /// # Errors
    ///
    /// Returns a [`QueryFailure`] whose `error` is one of:
    /// - [`QueryError::InvalidRequest`] / [`QueryError::InvalidBaseUrl`]
    ///   before any I/O.
    /// - [`QueryError::Http`] on network failure or timeout.
    /// - [`QueryError::UnexpectedStatus`] for a non-2xx response.
    /// - [`QueryError::Xml`] / [`QueryError::Document`] for an unusable body.
    /// - [`QueryError::Mapping`] when an entry cannot be mapped; earlier
    ///   entries are kept in `partial_results`.
    pub async fn try_execute(
        &self,
        request: &FindByPropertyRequest,
    ) -> Result<Vec<QueryResult>, QueryFailure> {
        let outcome = self.run(request).await;
        match &outcome {
            Ok(results) => tracing::info!(
                data_source = %request.data_source_name,
                entity_type = %request.entity_type_name,
                results = results.len(),
                "query complete"
            ),
            Err(failure) => tracing::warn!(
                data_source = %request.data_source_name,
                entity_type = %request.entity_type_name,
                partial_results = failure.partial_results.len(),
                error = %failure.error,
                "query failed"
            ),
        }
        outcome
    }

    async fn run(
        &self,
        request: &FindByPropertyRequest,
    ) -> Result<Vec<QueryResult>, QueryFailure> {
        let url = build_request_url(&self.base_url, request, self.maps_key.as_deref())?;
        let body = self.fetch_feed(&url).await?;
        parse_feed(&body, request.distance_units)
    }

    /// Sends a GET and reads the whole body. The response is released when
    /// this returns, on success and on every error path.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Http`] on network failure and
    /// [`QueryError::UnexpectedStatus`] on a non-2xx status.
    async fn fetch_feed(&self, url: &Url) -> Result<Vec<u8>, QueryError> {
        let shown = redacted(url);
        tracing::debug!(url = %shown, "fetching feed");

        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, ACCEPT_ATOM)
            .send()
            .await
            .map_err(|e| QueryError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::UnexpectedStatus {
                status: status.as_u16(),
                url: shown,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| QueryError::Http(e.without_url()))?;
        Ok(body.to_vec())
    }
}
