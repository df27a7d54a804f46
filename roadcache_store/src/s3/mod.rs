//! An [`ObjectStore`] for S3 and S3 compatible services (LocalStack, MinIO).
//!
//! # Overview
//!
//! Objects are addressed path-style as `<endpoint>/<bucket>/<key>`, which every S3 compatible service
//! understands. Requests are signed with AWS Signature Version 4 when credentials are configured and sent
//! anonymously otherwise (public buckets, emulators without authentication).
//!
//! Connection errors, timeouts and `5xx` answers are retried up to three times with exponential backoff.
//!
//! # Examples
//!
//! ```rust,no_run
//! use roadcache_core::ObjectStore;
//! use roadcache_store::{RemoteConfig, s3::S3Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roadcache_core::StoreError> {
//!     let store = S3Store::new(&RemoteConfig::default().with_env())?;
//!     let found = store.exists("my-bucket", "graphs/Berlin_drive.graphml").await?;
//!     println!("found: {found}");
//!     Ok(())
//! }
//! ```

mod list;
mod signer;

pub use list::ListPage;
pub use signer::{Credentials, Signer};

use crate::RemoteConfig;
use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode, Url};
use roadcache_core::{ObjectStore, StoreError};
use signer::{CanonicalRequest, EMPTY_PAYLOAD_SHA256, amz_date, canonical_query, sha256_hex, uri_encode_path};
use std::{collections::BTreeMap, error::Error, path::Path, time::Duration};
use time::OffsetDateTime;
use tokio::{fs, io::AsyncWriteExt, time::sleep};

const MAX_RETRIES: u32 = 3;

fn is_retryable_error(err: &reqwest::Error) -> bool {
	err.is_connect() || err.is_timeout() || err.is_body()
}

fn is_retryable_status(status: StatusCode) -> bool {
	status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Error message of a `reqwest` error including its causes.
fn describe(err: &reqwest::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

#[derive(Debug)]
pub struct S3Store {
	client: Client,
	endpoint: String,
	region: String,
	signer: Option<Signer>,
	retry_delay: Duration,
	name: String,
}

impl S3Store {
	/// Creates a client for the endpoint, region and credentials in `config`.
	pub fn new(config: &RemoteConfig) -> Result<S3Store, StoreError> {
		let endpoint = config.endpoint();
		match Url::parse(&endpoint) {
			Ok(url) if matches!(url.scheme(), "http" | "https") => (),
			Ok(url) => {
				return Err(StoreError::InvalidConfig(format!(
					"unsupported endpoint scheme '{}' in '{endpoint}', expected 'http' or 'https'",
					url.scheme()
				)));
			}
			Err(err) => return Err(StoreError::InvalidConfig(format!("invalid endpoint '{endpoint}': {err}"))),
		}

		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.timeout(Duration::from_secs(config.timeout_seconds()))
			.use_rustls_tls()
			.build()
			.map_err(|err| StoreError::InvalidConfig(format!("failed to build HTTP client: {}", describe(&err))))?;

		let region = config.region().to_string();
		let signer = config.credentials().map(|credentials| Signer::new(credentials, &region));
		if signer.is_none() {
			log::debug!("no S3 credentials configured, sending unsigned requests to '{endpoint}'");
		}

		Ok(S3Store {
			client,
			name: format!("s3 ({endpoint})"),
			endpoint,
			region,
			signer,
			retry_delay: Duration::from_secs(1),
		})
	}

	/// Sets the delay before the first retry. Later retries double it.
	pub fn with_retry_delay(mut self, delay: Duration) -> Self {
		self.retry_delay = delay;
		self
	}

	pub fn region(&self) -> &str {
		&self.region
	}

	fn url(&self, bucket: &str, key: Option<&str>, query: &str) -> Result<Url, StoreError> {
		let mut text = format!("{}/{}", self.endpoint, uri_encode_path(bucket));
		if let Some(key) = key {
			text.push('/');
			text.push_str(&uri_encode_path(key));
		}
		if !query.is_empty() {
			text.push('?');
			text.push_str(query);
		}
		Url::parse(&text).map_err(|err| StoreError::InvalidConfig(format!("invalid object URL '{text}': {err}")))
	}

	/// Sends one request, retrying transient failures.
	async fn send(&self, method: Method, url: &Url, body: Option<Vec<u8>>) -> Result<Response, StoreError> {
		let payload_sha256 = match &body {
			Some(body) => sha256_hex(body),
			None => EMPTY_PAYLOAD_SHA256.to_string(),
		};

		for attempt in 0..=MAX_RETRIES {
			if attempt > 0 {
				let backoff = self.retry_delay * (1 << (attempt - 1));
				log::warn!("retry attempt {attempt}/{MAX_RETRIES} for {method} '{url}', waiting {backoff:?}");
				sleep(backoff).await;
			}

			let mut request = self.client.request(method.clone(), url.clone());
			for (name, value) in self.sign(&method, url, &payload_sha256) {
				request = request.header(name, value);
			}
			if let Some(body) = &body {
				request = request.body(body.clone());
			}

			let response = match request.send().await {
				Ok(response) => response,
				Err(err) if is_retryable_error(&err) && attempt < MAX_RETRIES => {
					log::warn!("retryable error: {}", describe(&err));
					continue;
				}
				Err(err) => return Err(StoreError::Transport(describe(&err))),
			};

			if is_retryable_status(response.status()) && attempt < MAX_RETRIES {
				log::warn!("retryable status {} for {method} '{url}'", response.status());
				continue;
			}
			return Ok(response);
		}

		Err(StoreError::Transport(format!(
			"{method} '{url}' failed after {MAX_RETRIES} retries"
		)))
	}

	/// Headers that authenticate a request. Empty without credentials.
	fn sign(&self, method: &Method, url: &Url, payload_sha256: &str) -> Vec<(String, String)> {
		let Some(signer) = &self.signer else {
			return Vec::new();
		};

		let host = match (url.host_str(), url.port()) {
			(Some(host), Some(port)) => format!("{host}:{port}"),
			(Some(host), None) => host.to_string(),
			(None, _) => String::new(),
		};
		let date = amz_date(OffsetDateTime::now_utc());

		let mut headers = BTreeMap::new();
		headers.insert("host".to_string(), host);
		headers.insert("x-amz-content-sha256".to_string(), payload_sha256.to_string());
		headers.insert("x-amz-date".to_string(), date.clone());
		if let Some(token) = signer.session_token() {
			headers.insert("x-amz-security-token".to_string(), token.to_string());
		}

		let authorization = signer.authorization(
			&CanonicalRequest {
				method: method.as_str(),
				path: url.path(),
				query: url.query().unwrap_or(""),
				headers: &headers,
				payload_sha256,
			},
			&date,
		);

		headers.remove("host");
		let mut result: Vec<(String, String)> = headers.into_iter().collect();
		result.push(("authorization".to_string(), authorization));
		result
	}

	/// Converts an unexpected answer into a [`StoreError`].
	async fn status_error(response: Response, key: &str) -> StoreError {
		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return StoreError::NotFound { key: key.to_string() };
		}
		let body = response.text().await.unwrap_or_default();
		let message = list::error_message(&body)
			.or_else(|| status.canonical_reason().map(str::to_string))
			.unwrap_or_default();
		StoreError::Status {
			status: status.as_u16(),
			message,
		}
	}

	async fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage, StoreError> {
		let mut params = vec![("list-type", "2"), ("prefix", prefix)];
		if let Some(token) = token {
			params.push(("continuation-token", token));
		}
		let url = self.url(bucket, None, &canonical_query(&params))?;
		let response = self.send(Method::GET, &url, None).await?;
		if !response.status().is_success() {
			return Err(Self::status_error(response, bucket).await);
		}
		let body = response
			.text()
			.await
			.map_err(|err| StoreError::Transport(describe(&err)))?;
		Ok(ListPage::parse(&body))
	}
}

#[async_trait]
impl ObjectStore for S3Store {
	async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
		let url = self.url(bucket, Some(key), "")?;
		let response = self.send(Method::HEAD, &url, None).await?;
		match response.status() {
			status if status.is_success() => Ok(true),
			StatusCode::NOT_FOUND => Ok(false),
			status => Err(StoreError::Status {
				status: status.as_u16(),
				message: status.canonical_reason().unwrap_or_default().to_string(),
			}),
		}
	}

	async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError> {
		let body = fs::read(local_path).await?;
		let url = self.url(bucket, Some(key), "")?;
		log::debug!("uploading {} bytes to '{url}'", body.len());
		let response = self.send(Method::PUT, &url, Some(body)).await?;
		if !response.status().is_success() {
			return Err(Self::status_error(response, key).await);
		}
		Ok(())
	}

	async fn download(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), StoreError> {
		let url = self.url(bucket, Some(key), "")?;
		let mut response = self.send(Method::GET, &url, None).await?;
		if !response.status().is_success() {
			return Err(Self::status_error(response, key).await);
		}

		let mut file = fs::File::create(local_path).await?;
		let mut size = 0usize;
		while let Some(chunk) = response
			.chunk()
			.await
			.map_err(|err| StoreError::Transport(describe(&err)))?
		{
			size += chunk.len();
			file.write_all(&chunk).await?;
		}
		file.flush().await?;
		file.sync_all().await?;
		log::debug!("downloaded {size} bytes from '{url}'");
		Ok(())
	}

	async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
		let mut keys = Vec::new();
		let mut token: Option<String> = None;
		loop {
			let page = self.list_page(bucket, prefix, token.as_deref()).await?;
			keys.extend(page.keys);
			match page.next_token {
				Some(next) => token = Some(next),
				None => break,
			}
		}
		Ok(keys)
	}

	fn name(&self) -> &str {
		&self.name
	}
}
