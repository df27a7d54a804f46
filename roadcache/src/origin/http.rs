use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;

/// Public OSM services answer with these while they are busy.
fn is_retryable_status(status: StatusCode) -> bool {
	matches!(
		status,
		StatusCode::TOO_MANY_REQUESTS
			| StatusCode::BAD_GATEWAY
			| StatusCode::SERVICE_UNAVAILABLE
			| StatusCode::GATEWAY_TIMEOUT
	)
}

/// HTTP client shared by the geocoder and the Overpass client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
	client: Client,
	retry_delay: Duration,
}

impl HttpFetcher {
	pub fn new(user_agent: &str, timeout: Duration) -> Result<HttpFetcher> {
		let client = Client::builder()
			.user_agent(user_agent)
			.timeout(timeout)
			.use_rustls_tls()
			.build()
			.context("failed to build HTTP client")?;
		Ok(HttpFetcher {
			client,
			retry_delay: Duration::from_secs(1),
		})
	}

	pub fn with_retry_delay(mut self, delay: Duration) -> Self {
		self.retry_delay = delay;
		self
	}

	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Sends `request` and returns the body of a successful answer.
	pub async fn fetch_text(&self, request: RequestBuilder) -> Result<String> {
		for attempt in 0..=MAX_RETRIES {
			if attempt > 0 {
				let backoff = self.retry_delay * (1 << (attempt - 1));
				log::warn!("retry attempt {attempt}/{MAX_RETRIES}, waiting {backoff:?}");
				sleep(backoff).await;
			}

			let request = request
				.try_clone()
				.ok_or_else(|| anyhow!("request body can not be replayed"))?;
			let response = request.send().await?;
			let status = response.status();
			let url = response.url().clone();

			if is_retryable_status(status) && attempt < MAX_RETRIES {
				log::warn!("'{url}' is busy ({status})");
				continue;
			}
			if !status.is_success() {
				let body = response.text().await.unwrap_or_default();
				let excerpt: String = body.chars().take(200).collect();
				bail!("request to '{url}' failed with status {status}: {}", excerpt.trim());
			}
			return Ok(response.text().await?);
		}

		bail!("request failed after {MAX_RETRIES} retries")
	}
}
