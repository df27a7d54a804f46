//! Wiring of a [`Config`] into a ready-to-use resolver.
//!
//! All tiers are opened when the loader is created, so configuration errors surface before the first
//! request.

use crate::{GraphSummary, config::Config, origin::OsmOrigin};
use anyhow::{Context, Result};
use roadcache_core::{EventBus, LocalTier, OriginGenerator, ResolveError, Resolved, Tier, TieredResolver};
use roadcache_store::open_remote_tier;
use std::sync::Arc;

/// A resolved graph together with its size.
#[derive(Clone, Debug)]
pub struct LoadedGraph {
	pub resolved: Resolved,
	pub summary: GraphSummary,
}

/// The cache keys present in each cache tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
	pub local: Vec<String>,
	/// `None` if no remote store is configured.
	pub remote: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct GraphLoader {
	config: Config,
	resolver: TieredResolver,
}

impl GraphLoader {
	/// Creates a loader that generates missing graphs from OpenStreetMap.
	pub fn new(config: Config, events: EventBus) -> Result<GraphLoader> {
		let origin = OsmOrigin::new(&config.origin)?;
		Self::with_origin(config, events, Arc::new(origin))
	}

	pub fn with_origin(config: Config, events: EventBus, origin: Arc<dyn OriginGenerator>) -> Result<GraphLoader> {
		config.validate()?;

		let local = LocalTier::open(&config.cache_dir)
			.with_context(|| format!("failed to open cache directory {:?}", config.cache_dir))?;

		let remote = match config.namespace()? {
			Some(namespace) => Some(
				open_remote_tier(&namespace, &config.remote.with_env())
					.with_context(|| format!("failed to open remote store {namespace}"))?,
			),
			None => {
				log::debug!("no remote namespace configured, the remote store is disabled");
				None
			}
		};

		let resolver = TieredResolver::new(local, remote, origin, events).with_options(config.resolver.options());
		Ok(GraphLoader { config, resolver })
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn resolver(&self) -> &TieredResolver {
		&self.resolver
	}

	/// Resolves the configured graph.
	///
	/// A failed resolve keeps its [`ResolveError`], see [`describe_failure`].
	pub async fn load(&self) -> Result<LoadedGraph> {
		let request = self.config.request()?;
		let resolved = self.resolver.resolve(&request).await?;
		let summary = GraphSummary::from_blob(&resolved.blob)
			.with_context(|| format!("failed to read graph {:?}", resolved.path))?;
		Ok(LoadedGraph { resolved, summary })
	}

	pub async fn list(&self) -> Result<Listing> {
		let local = self.resolver.local().list().with_context(|| {
			format!(
				"failed to list cache directory {:?}",
				self.resolver.local().root()
			)
		})?;
		let remote = match self.resolver.remote() {
			Some(remote) => Some(
				remote
					.list()
					.await
					.with_context(|| format!("failed to list {}", remote.namespace()))?,
			),
			None => None,
		};
		Ok(Listing { local, remote })
	}
}

fn stage_name(stage: Option<Tier>) -> &'static str {
	match stage {
		None => "config",
		Some(Tier::Local) => "local",
		Some(Tier::Remote) => "remote",
		Some(Tier::Origin) => "origin",
	}
}

/// One line naming the stage of a failed load and whether the graph could be obtained at all.
pub fn describe_failure(err: &anyhow::Error) -> String {
	match err.downcast_ref::<ResolveError>() {
		Some(resolve) => {
			let outcome = if resolve.is_unavailable() {
				"graph unavailable"
			} else if resolve.is_not_durable() {
				"graph obtained but not cached"
			} else {
				"failed"
			};
			format!("{} stage: {outcome}", stage_name(resolve.stage()))
		}
		None => "load failed".to_string(),
	}
}
