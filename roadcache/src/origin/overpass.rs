//! Download of OSM ways and nodes from an Overpass API server.

use super::{NetworkType, http::HttpFetcher};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct OsmNode {
	pub id: u64,
	pub lat: f64,
	pub lon: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OsmWay {
	pub id: u64,
	pub nodes: Vec<u64>,
	pub tags: BTreeMap<String, String>,
}

impl OsmWay {
	pub fn tag(&self, key: &str) -> Option<&str> {
		self.tags.get(key).map(String::as_str)
	}
}

/// Ways of a network together with the nodes they reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OsmData {
	pub nodes: BTreeMap<u64, OsmNode>,
	pub ways: Vec<OsmWay>,
}

#[derive(Deserialize)]
struct Response {
	elements: Vec<Element>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
	Node {
		id: u64,
		lat: f64,
		lon: f64,
	},
	Way {
		id: u64,
		#[serde(default)]
		nodes: Vec<u64>,
		#[serde(default)]
		tags: BTreeMap<String, String>,
	},
	#[serde(other)]
	Other,
}

impl OsmData {
	pub fn from_json(text: &str) -> Result<OsmData> {
		let response: Response = serde_json::from_str(text).context("parsing Overpass answer")?;
		let mut data = OsmData::default();
		for element in response.elements {
			match element {
				Element::Node { id, lat, lon } => {
					data.nodes.insert(id, OsmNode { id, lat, lon });
				}
				Element::Way { id, nodes, tags } => data.ways.push(OsmWay { id, nodes, tags }),
				Element::Other => {}
			}
		}
		Ok(data)
	}
}

#[derive(Clone, Debug)]
pub struct Overpass {
	http: HttpFetcher,
	url: String,
	timeout_seconds: u64,
}

impl Overpass {
	pub fn new(http: HttpFetcher, url: &str, timeout_seconds: u64) -> Overpass {
		Overpass {
			http,
			url: url.to_string(),
			timeout_seconds,
		}
	}

	/// The query for all ways of `network_type` inside the area, plus their nodes.
	pub fn query(&self, area_id: u64, network_type: NetworkType) -> String {
		format!(
			"[out:json][timeout:{}];area({area_id})->.searchArea;(way{}(area.searchArea););(._;>;);out;",
			self.timeout_seconds,
			network_type.overpass_filter()
		)
	}

	pub async fn fetch(&self, area_id: u64, network_type: NetworkType) -> Result<OsmData> {
		let query = self.query(area_id, network_type);
		log::debug!("querying Overpass: {query}");
		let request = self.http.client().post(&self.url).form(&[("data", query.as_str())]);
		let body = self
			.http
			.fetch_text(request)
			.await
			.with_context(|| format!("downloading {network_type} network of area {area_id}"))?;
		let data = OsmData::from_json(&body)?;
		log::debug!("received {} ways and {} nodes", data.ways.len(), data.nodes.len());
		Ok(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::time::Duration;
	use wiremock::{
		Mock, MockServer, ResponseTemplate,
		matchers::{body_string_contains, method},
	};

	const ANSWER: &str = r#"{
		"version": 0.6,
		"elements": [
			{"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "residential", "name": "Main St"}},
			{"type": "node", "id": 1, "lat": 52.5, "lon": 13.4},
			{"type": "node", "id": 2, "lat": 52.6, "lon": 13.5, "tags": {"highway": "traffic_signals"}},
			{"type": "relation", "id": 99, "members": []}
		]
	}"#;

	#[test]
	fn parses_elements() {
		let data = OsmData::from_json(ANSWER).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert!((data.nodes[&2].lon - 13.5).abs() < 1e-9);
		assert_eq!(data.ways.len(), 1);
		assert_eq!(data.ways[0].nodes, vec![1, 2]);
		assert_eq!(data.ways[0].tag("name"), Some("Main St"));
	}

	#[test]
	fn rejects_garbage() {
		assert!(OsmData::from_json("<html>busy</html>").is_err());
	}

	#[tokio::test]
	async fn posts_the_query() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(body_string_contains("area%283600000001%29"))
			.respond_with(ResponseTemplate::new(200).set_body_string(ANSWER))
			.expect(1)
			.mount(&server)
			.await;

		let http = HttpFetcher::new("test", Duration::from_secs(5)).unwrap();
		let overpass = Overpass::new(http, &server.uri(), 25);
		assert!(overpass.query(3_600_000_001, NetworkType::Walk).starts_with(
			r#"[out:json][timeout:25];area(3600000001)->.searchArea;(way["highway"]["area"!~"yes"]"#
		));

		let data = overpass.fetch(3_600_000_001, NetworkType::Walk).await.unwrap();
		assert_eq!(data.ways.len(), 1);
	}
}
