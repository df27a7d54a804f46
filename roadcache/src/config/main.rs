use super::{OriginConfig, RemoteConfig, ResolverConfig};
use crate::origin::NetworkType;
use anyhow::{Context, Result, bail};
use roadcache_core::{NamespaceScheme, RemoteNamespace, ResourceRequest};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

fn default_resource_type() -> String {
	NetworkType::default().to_string()
}

fn default_cache_dir() -> PathBuf {
	PathBuf::from("map_cache")
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Place name of the road network, e.g. "Piedmont, California, USA".
	pub location: String,

	/// Network type: drive, drive_service, walk, bike, all or all_private.
	#[serde(default = "default_resource_type", alias = "network_type")]
	pub resource_type: String,

	/// Directory of the local cache.
	#[serde(default = "default_cache_dir")]
	pub cache_dir: PathBuf,

	/// Where shared copies live: `bucket`, `s3://bucket/prefix` or `file://directory`.
	/// Without it the remote store is not used.
	#[serde(default, alias = "s3_bucket")]
	pub remote_namespace: Option<String>,

	/// Connection settings of the remote store.
	#[serde(default)]
	pub remote: RemoteConfig,

	/// OpenStreetMap services.
	#[serde(default)]
	pub origin: OriginConfig,

	/// Behaviour of the tiered lookup.
	#[serde(default)]
	pub resolver: ResolverConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_reader(reader)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Parses the file at `path`. Relative directories are resolved against the directory of the file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("failed to open config file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("invalid config file {path:?}"))?;
		config.resolve_paths(path.parent().unwrap_or(Path::new(".")))?;
		Ok(config)
	}

	/// Checks everything that can be checked before any tier is touched.
	pub fn validate(&self) -> Result<()> {
		if self.location.trim().is_empty() {
			bail!("'location' must not be empty");
		}
		self.network_type()?;
		self.namespace()?;
		if self.cache_dir.as_os_str().is_empty() {
			bail!("'cache_dir' must not be empty");
		}
		Ok(())
	}

	pub fn network_type(&self) -> Result<NetworkType> {
		self.resource_type.parse()
	}

	/// The parsed remote namespace, `None` if the remote store is disabled.
	pub fn namespace(&self) -> Result<Option<RemoteNamespace>> {
		match self.remote_namespace.as_deref().map(str::trim) {
			None | Some("") => Ok(None),
			Some(text) => Ok(Some(
				text
					.parse()
					.with_context(|| format!("invalid remote namespace '{text}'"))?,
			)),
		}
	}

	pub fn request(&self) -> Result<ResourceRequest> {
		Ok(ResourceRequest::new(self.location.trim(), self.network_type()?.as_str()))
	}

	/// Makes the cache directory and a `file://` namespace absolute, relative to `base`.
	pub fn resolve_paths(&mut self, base: &Path) -> Result<()> {
		if self.cache_dir.is_relative() {
			self.cache_dir = base.join(&self.cache_dir);
		}
		if let Some(namespace) = self.namespace()?
			&& namespace.scheme == NamespaceScheme::File
			&& Path::new(&namespace.bucket).is_relative()
		{
			let directory = base.join(&namespace.bucket);
			self.remote_namespace = Some(format!("file://{}", directory.to_string_lossy()));
		}
		Ok(())
	}
}
