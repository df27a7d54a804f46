//! Geocoding of place names with Nominatim.

use super::http::HttpFetcher;
use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Overpass derives area ids from OSM ids by adding these offsets.
const RELATION_AREA_OFFSET: u64 = 3_600_000_000;
const WAY_AREA_OFFSET: u64 = 2_400_000_000;

/// The best match of a place search.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Place {
	pub osm_type: String,
	pub osm_id: u64,
	#[serde(default)]
	pub display_name: String,
}

impl Place {
	/// The Overpass area covering this place.
	pub fn area_id(&self) -> Result<u64> {
		match self.osm_type.as_str() {
			"relation" => Ok(RELATION_AREA_OFFSET + self.osm_id),
			"way" => Ok(WAY_AREA_OFFSET + self.osm_id),
			other => bail!(
				"'{}' is a {other}, not an area; use a more specific place name",
				self.display_name
			),
		}
	}
}

#[derive(Clone, Debug)]
pub struct Nominatim {
	http: HttpFetcher,
	base_url: String,
}

impl Nominatim {
	pub fn new(http: HttpFetcher, base_url: &str) -> Nominatim {
		Nominatim {
			http,
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Looks up `query` and returns the best match that has an area.
	pub async fn geocode(&self, query: &str) -> Result<Place> {
		let request = self
			.http
			.client()
			.get(format!("{}/search", self.base_url))
			.query(&[("q", query), ("format", "json"), ("limit", "5")]);
		let body = self
			.http
			.fetch_text(request)
			.await
			.with_context(|| format!("geocoding '{query}'"))?;
		let places: Vec<Place> =
			serde_json::from_str(&body).with_context(|| format!("parsing geocoder answer for '{query}'"))?;

		// prefer the first match with an area, e.g. a city boundary over a city center node
		let Some(place) = places
			.iter()
			.find(|place| place.area_id().is_ok())
			.or(places.first())
		else {
			bail!("no place found for '{query}'");
		};
		place.area_id()?;
		log::debug!("geocoded '{query}' to {} {} ({})", place.osm_type, place.osm_id, place.display_name);
		Ok(place.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::time::Duration;
	use wiremock::{
		Mock, MockServer, ResponseTemplate,
		matchers::{method, path, query_param},
	};

	async fn geocoder(answer: &str) -> (MockServer, Nominatim) {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/search"))
			.and(query_param("format", "json"))
			.and(query_param("q", "Piedmont, California"))
			.respond_with(ResponseTemplate::new(200).set_body_string(answer))
			.mount(&server)
			.await;
		let http = HttpFetcher::new("test", Duration::from_secs(5)).unwrap();
		let nominatim = Nominatim::new(http, &format!("{}/", server.uri()));
		(server, nominatim)
	}

	#[tokio::test]
	async fn prefers_places_with_an_area() {
		let (_server, nominatim) = geocoder(
			r#"[
				{"osm_type": "node", "osm_id": 1, "display_name": "Piedmont center", "class": "place"},
				{"osm_type": "relation", "osm_id": 2999176, "display_name": "Piedmont, Alameda County", "importance": 0.6}
			]"#,
		)
		.await;

		let place = nominatim.geocode("Piedmont, California").await.unwrap();
		assert_eq!(place.osm_id, 2_999_176);
		assert_eq!(place.area_id().unwrap(), 3_602_999_176);
	}

	#[tokio::test]
	async fn fails_without_results() {
		let (_server, nominatim) = geocoder("[]").await;
		let err = nominatim.geocode("Piedmont, California").await.unwrap_err();
		assert_eq!(err.to_string(), "no place found for 'Piedmont, California'");
	}

	#[tokio::test]
	async fn fails_for_points() {
		let (_server, nominatim) =
			geocoder(r#"[{"osm_type": "node", "osm_id": 1, "display_name": "Piedmont center"}]"#).await;
		let err = nominatim.geocode("Piedmont, California").await.unwrap_err();
		assert!(err.to_string().contains("is a node, not an area"), "{err}");
	}

	#[test]
	fn way_areas() {
		let place = Place {
			osm_type: "way".to_string(),
			osm_id: 10,
			display_name: String::new(),
		};
		assert_eq!(place.area_id().unwrap(), 2_400_000_010);
	}
}
