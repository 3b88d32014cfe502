//! Load-from-URL document fetching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// Source of remote document text.
#[async_trait]
pub trait Fetcher: Send + Sync {
	/// Fetches the body of `url` as text.
	async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetcher`] over HTTP(S).
///
/// Only `http` and `https` URLs are accepted. Any non-success status is an
/// error; the body of such a response is never used as document text.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
	client: Client,
}

impl HttpFetcher {
	/// Builds a fetcher using the timeout and user agent from `config`.
	pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
		let client = Client::builder()
			.timeout(Duration::from_secs(config.timeout_secs))
			.user_agent(config.user_agent.clone())
			.build()
			.map_err(FetchError::Client)?;
		Ok(Self { client })
	}
}

/// Parses `raw` and rejects schemes other than http and https.
pub fn parse_source_url(raw: &str) -> Result<Url, FetchError> {
	let url = Url::parse(raw.trim()).map_err(|source| FetchError::InvalidUrl {
		url: raw.to_string(),
		source,
	})?;
	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme => Err(FetchError::UnsupportedScheme {
			scheme: scheme.to_string(),
		}),
	}
}

#[async_trait]
impl Fetcher for HttpFetcher {
	async fn fetch_text(&self, raw: &str) -> Result<String, FetchError> {
		let url = parse_source_url(raw)?;
		debug!(url = %url, "fetching document");

		let transport = |source| FetchError::Transport {
			url: url.to_string(),
			source,
		};
		let response = self.client.get(url.clone()).send().await.map_err(transport)?;

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				url: url.to_string(),
				status: status.as_u16(),
			});
		}

		let text = response.text().await.map_err(transport)?;
		debug!(url = %url, bytes = text.len(), "document fetched");
		Ok(text)
	}
}
