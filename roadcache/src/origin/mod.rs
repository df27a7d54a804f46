//! The origin: road network graphs generated from OpenStreetMap.
//!
//! A graph is produced in three steps:
//! 1. the place name is geocoded with Nominatim,
//! 2. the ways of the network are downloaded from an Overpass server,
//! 3. the ways are converted into a GraphML document.

mod graphml;
mod http;
mod network_type;
mod nominatim;
mod overpass;

pub use graphml::build_graphml;
pub use http::HttpFetcher;
pub use network_type::NetworkType;
pub use nominatim::{Nominatim, Place};
pub use overpass::{OsmData, OsmNode, OsmWay, Overpass};

use crate::config::OriginConfig;
use anyhow::Result;
use async_trait::async_trait;
use roadcache_core::{Blob, OriginGenerator};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct OsmOrigin {
	nominatim: Nominatim,
	overpass: Overpass,
}

impl OsmOrigin {
	pub fn new(config: &OriginConfig) -> Result<OsmOrigin> {
		let http = HttpFetcher::new(&config.user_agent(), Duration::from_secs(config.timeout_seconds()))?;
		Ok(Self::from_fetcher(http, config))
	}

	pub fn from_fetcher(http: HttpFetcher, config: &OriginConfig) -> OsmOrigin {
		OsmOrigin {
			nominatim: Nominatim::new(http.clone(), config.nominatim_url()),
			overpass: Overpass::new(http, config.overpass_url(), config.timeout_seconds()),
		}
	}
}

#[async_trait]
impl OriginGenerator for OsmOrigin {
	async fn generate(&self, location: &str, resource_type: &str) -> Result<Blob> {
		let network_type: NetworkType = resource_type.parse()?;
		let place = self.nominatim.geocode(location).await?;
		log::info!("downloading {network_type} network of '{}' from OpenStreetMap", place.display_name);
		let data = self.overpass.fetch(place.area_id()?, network_type).await?;
		let xml = build_graphml(&data, network_type, location)?;
		Ok(Blob::from(xml))
	}
}
