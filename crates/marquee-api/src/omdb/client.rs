//! `OmdbClient` - OMDb API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::OmdbApi;
use super::types::{
    DetailRecord, OmdbErrorResponse, OmdbSearchEnvelope, PlotLength, SearchParams, SummaryRecord,
};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (config or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request with the API key and query params.
    ///
    /// Single attempt: there is no retry on failure.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        // `query` never carries the API key.
        tracing::debug!(?query, "OMDb API request");

        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .build()
            .context("failed to build request")?;

        // Request URLs carry the API key; keep them out of error chains.
        let result = self.http_client.execute(request).await;
        let response = result
            .map_err(reqwest::Error::without_url)
            .context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<OmdbErrorResponse>(&body)
                && let Some(message) = error_response.error
            {
                bail!("OMDb API error (HTTP {status}): {message}");
            }
            bail!("OMDb API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to read response body")?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result.context("failed to decode JSON response")?;
        Ok(parsed)
    }
}

impl OmdbApi for OmdbClient {
    #[instrument(skip_all, fields(term = %params.term))]
    async fn search_titles(&self, params: &SearchParams) -> Result<Vec<SummaryRecord>> {
        let mut query: Vec<(&str, String)> = vec![("s", params.term.clone())];
        if let Some(ref category) = params.category {
            query.push(("type", String::from(category.as_str())));
        }
        if let Some(year) = params.year {
            query.push(("y", year.to_string()));
        }

        let envelope: OmdbSearchEnvelope = self.get_json(&query).await?;
        if let Some(results) = envelope.search {
            tracing::debug!(
                count = results.len(),
                total = envelope.total_results.as_deref().unwrap_or("-"),
                "OMDb search returned results"
            );
            return Ok(results);
        }

        tracing::debug!(
            error = envelope.error.as_deref().unwrap_or("-"),
            "OMDb search returned no results"
        );
        Ok(Vec::new())
    }

    #[instrument(skip_all, fields(imdb_id = %imdb_id))]
    async fn title_details(
        &self,
        imdb_id: &str,
        plot: PlotLength,
    ) -> Result<Option<DetailRecord>> {
        let query = [
            ("i", String::from(imdb_id)),
            ("plot", String::from(plot.as_str())),
        ];

        let value: serde_json::Value = self.get_json(&query).await?;
        if value.get("Title").is_none() {
            let error = value
                .get("Error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("-");
            tracing::debug!(error, "OMDb lookup returned no entry");
            return Ok(None);
        }

        let detail: DetailRecord =
            serde_json::from_value(value).context("failed to decode title details")?;
        Ok(Some(detail))
    }
}
