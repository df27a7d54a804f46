//! The tiered resolver.
//!
//! A resolve asks the tiers in ascending cost and stops at the first one that has the graph:
//!
//! 1. **local cache**: the file `<cache_dir>/<key>` is read and returned.
//! 2. **remote store**: if the object `<prefix>/<key>` exists, it is downloaded into the local cache first.
//! 3. **origin**: the graph is generated, written to the local cache and uploaded to the remote store.
//!
//! Every deeper hit leaves the faster tiers populated, so the next resolve of the same key is a local hit.
//!
//! Failures are isolated per tier:
//! - a remote existence check that cannot be completed is reported as a warning and treated as a miss,
//! - a failed upload after generation is reported as [`crate::Event::WriteBackFailed`] and does not fail
//!   the call,
//! - a failed local write, a failed download of an existing object and a failed generation end the call.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use roadcache_core::{Blob, EventBus, LocalTier, OriginGenerator, ResourceRequest, Tier, TieredResolver};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Fixed;
//!
//! #[async_trait]
//! impl OriginGenerator for Fixed {
//!     async fn generate(&self, _location: &str, _resource_type: &str) -> anyhow::Result<Blob> {
//!         Ok(Blob::from("<graphml/>"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dir = tempfile::tempdir()?;
//!     let local = LocalTier::open(dir.path())?;
//!     let resolver = TieredResolver::new(local, None, Arc::new(Fixed), EventBus::new());
//!
//!     let request = ResourceRequest::new("Piedmont, California", "drive");
//!     assert_eq!(resolver.resolve(&request).await?.tier, Tier::Origin);
//!     assert_eq!(resolver.resolve(&request).await?.tier, Tier::Local);
//!     Ok(())
//! }
//! ```


use crate::{
	Blob, CacheKey, EventBus, LocalTier, OriginGenerator, Probe, RemoteTier, ResolveError, ResourceRequest,
	StoreError, Tier,
};
use std::{fmt::Debug, io, path::PathBuf, sync::Arc};

/// Behaviour switches of the resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverOptions {
	/// Generate the graph from the origin when the remote store reported it but the download failed.
	/// Off by default: such a download failure ends the call.
	pub origin_on_download_failure: bool,
}

/// A successfully resolved graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
	pub key: CacheKey,
	/// The tier that served the graph.
	pub tier: Tier,
	/// The file of the graph in the local cache.
	pub path: PathBuf,
	pub blob: Blob,
}

pub struct TieredResolver {
	local: LocalTier,
	remote: Option<RemoteTier>,
	origin: Arc<dyn OriginGenerator>,
	events: EventBus,
	options: ResolverOptions,
}

impl TieredResolver {
	/// Creates a resolver. Without a `remote` tier, misses go straight to the origin.
	pub fn new(
		local: LocalTier,
		remote: Option<RemoteTier>,
		origin: Arc<dyn OriginGenerator>,
		events: EventBus,
	) -> Self {
		Self {
			local,
			remote,
			origin,
			events,
			options: ResolverOptions::default(),
		}
	}

	pub fn with_options(mut self, options: ResolverOptions) -> Self {
		self.options = options;
		self
	}

	pub fn local(&self) -> &LocalTier {
		&self.local
	}

	pub fn remote(&self) -> Option<&RemoteTier> {
		self.remote.as_ref()
	}

	pub fn events(&self) -> &EventBus {
		&self.events
	}

	/// Resolves `request` through the local cache, the remote store and the origin, in this order.
	///
	/// A failed call is also reported as [`crate::Event::Error`].
	pub async fn resolve(&self, request: &ResourceRequest) -> Result<Resolved, ResolveError> {
		let result = self.resolve_tiers(request).await;
		if let Err(err) = &result {
			match source_message(err) {
				source if source.is_empty() => self.events.error(err.to_string()),
				source => self.events.error(format!("{err}: {source}")),
			}
		}
		result
	}

	async fn resolve_tiers(&self, request: &ResourceRequest) -> Result<Resolved, ResolveError> {
		if request.location.trim().is_empty() {
			return Err(ResolveError::InvalidRequest("location must not be empty".to_string()));
		}
		if request.resource_type.trim().is_empty() {
			return Err(ResolveError::InvalidRequest("resource type must not be empty".to_string()));
		}

		let key = request.cache_key();

		self.events.step(format!("checking local cache for '{key}'"));
		match self.local.probe(&key) {
			Probe::Found(path) => return self.read_local(key, path, Tier::Local),
			Probe::NotFound => {}
			Probe::Failed(err) => {
				return Err(ResolveError::LocalRead {
					path: self.local.path_for(&key),
					source: into_io_error(err),
				});
			}
		}

		if let Some(remote) = &self.remote {
			let remote_key = remote.remote_key(&key);
			self
				.events
				.step(format!("checking remote store for '{}'", remote.describe(&remote_key)));
			match remote.probe(&remote_key).await {
				Probe::Found(()) => match self.fetch_remote(remote, &key, &remote_key).await {
					Ok(resolved) => return Ok(resolved),
					Err(err @ ResolveError::Download { .. }) if self.options.origin_on_download_failure => {
						self.events.warn(format!("{err}: {}, falling back to origin", source_message(&err)));
					}
					Err(err) => return Err(err),
				},
				Probe::NotFound => {
					self
						.events
						.step(format!("'{}' not found in remote store", remote.describe(&remote_key)));
				}
				Probe::Failed(err) => {
					self.events.warn(format!(
						"could not check remote store for '{}': {err}, treating it as missing",
						remote.describe(&remote_key)
					));
				}
			}
		}

		self.generate(request, key).await
	}

	fn read_local(&self, key: CacheKey, path: PathBuf, tier: Tier) -> Result<Resolved, ResolveError> {
		let blob = self
			.local
			.read(&path)
			.map_err(|source| ResolveError::LocalRead {
				path: path.clone(),
				source,
			})?;
		self.events.hit(tier, key.as_str());
		Ok(Resolved { key, tier, path, blob })
	}

	async fn fetch_remote(
		&self,
		remote: &RemoteTier,
		key: &CacheKey,
		remote_key: &str,
	) -> Result<Resolved, ResolveError> {
		let part = self.local.part_path(key);
		if let Err(err) = remote.download(remote_key, &part).await {
			self.local.discard(&part);
			return Err(match err {
				StoreError::Io(source) => ResolveError::Persistence {
					path: self.local.path_for(key),
					source,
				},
				source => ResolveError::Download {
					key: remote_key.to_string(),
					source,
				},
			});
		}

		let path = self
			.local
			.commit(&part, key)
			.map_err(|source| ResolveError::Persistence {
				path: self.local.path_for(key),
				source,
			})?;
		self.read_local(key.clone(), path, Tier::Remote)
	}

	async fn generate(&self, request: &ResourceRequest, key: CacheKey) -> Result<Resolved, ResolveError> {
		self.events.step(format!("generating {request} from origin"));
		let blob = self
			.origin
			.generate(&request.location, &request.resource_type)
			.await
			.map_err(|source| ResolveError::Origin {
				request: request.clone(),
				source,
			})?;

		let path = self
			.local
			.persist(&key, &blob)
			.map_err(|source| ResolveError::Persistence {
				path: self.local.path_for(&key),
				source,
			})?;

		if let Some(remote) = &self.remote {
			let remote_key = remote.remote_key(&key);
			match remote.upload(&path, &remote_key).await {
				Ok(()) => {
					self
						.events
						.step(format!("uploaded '{}' to remote store", remote.describe(&remote_key)));
				}
				Err(err) => self.events.write_back_failed(&remote_key, err.to_string()),
			}
		}

		self.events.hit(Tier::Origin, key.as_str());
		Ok(Resolved {
			key,
			tier: Tier::Origin,
			path,
			blob,
		})
	}
}

impl Debug for TieredResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TieredResolver")
			.field("local", &self.local)
			.field("remote", &self.remote)
			.field("origin", &self.origin)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

fn into_io_error(err: StoreError) -> io::Error {
	match err {
		StoreError::Io(err) => err,
		other => io::Error::other(other.to_string()),
	}
}

fn source_message(err: &ResolveError) -> String {
	std::error::Error::source(err).map_or_else(String::new, |source| source.to_string())
}
