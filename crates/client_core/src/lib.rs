use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use shared::{
    domain::{OptionRecord, SelectionValue},
    error::LookupError,
    protocol::LookupPayload,
};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_LOOKUP_PATH: &str = "/ajax/get-division-admins/";
pub const DEFAULT_QUERY_PARAM: &str = "division_id";

/// Resolves a source value to the records offered by the dependent control.
#[async_trait]
pub trait LookupCapability: Send + Sync {
    async fn lookup(&self, source: &SelectionValue) -> Result<Vec<OptionRecord>, LookupError>;
}

/// Stand-in used when no lookup endpoint is configured.
pub struct MissingLookup;

#[async_trait]
impl LookupCapability for MissingLookup {
    async fn lookup(&self, source: &SelectionValue) -> Result<Vec<OptionRecord>, LookupError> {
        Err(LookupError::failed(format!(
            "lookup backend unavailable for source {source}"
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEndpoint {
    pub server_url: String,
    pub path: String,
    pub query_param: String,
}

impl Default for LookupEndpoint {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            path: DEFAULT_LOOKUP_PATH.into(),
            query_param: DEFAULT_QUERY_PARAM.into(),
        }
    }
}

impl LookupEndpoint {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    pub fn url(&self) -> Result<Url> {
        let base = Url::parse(self.server_url.trim_end_matches('/'))
            .with_context(|| format!("invalid lookup server url '{}'", self.server_url))?;
        base.join(&self.path)
            .with_context(|| format!("invalid lookup path '{}'", self.path))
    }
}

pub struct HttpLookupClient {
    http: Client,
    url: Url,
    query_param: String,
}

impl HttpLookupClient {
    pub fn new(endpoint: &LookupEndpoint) -> Result<Self> {
        Self::with_http(endpoint, Client::new())
    }

    pub fn with_timeout(endpoint: &LookupEndpoint, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build lookup http client")?;
        Self::with_http(endpoint, http)
    }

    fn with_http(endpoint: &LookupEndpoint, http: Client) -> Result<Self> {
        Ok(Self {
            http,
            url: endpoint.url()?,
            query_param: endpoint.query_param.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl LookupCapability for HttpLookupClient {
    async fn lookup(&self, source: &SelectionValue) -> Result<Vec<OptionRecord>, LookupError> {
        debug!(source = source.as_str(), url = %self.url, "lookup: request");
        let response = self
            .http
            .get(self.url.clone())
            .query(&[(self.query_param.as_str(), source.as_str())])
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| LookupError::failed(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| LookupError::failed(err.to_string()))?;

        let payload: LookupPayload = serde_json::from_slice(&body).map_err(|err| {
            warn!(source = source.as_str(), %status, "lookup: unreadable payload: {err}");
            LookupError::failed(format!("malformed lookup payload (status {status}): {err}"))
        })?;

        if payload.error.as_deref().is_some_and(|message| !message.is_empty()) {
            return payload.into_records();
        }
        if !status.is_success() {
            return Err(LookupError::failed(format!(
                "unexpected lookup status {status}"
            )));
        }
        let records = payload.into_records()?;
        debug!(
            source = source.as_str(),
            count = records.len(),
            "lookup: records received"
        );
        Ok(records)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
