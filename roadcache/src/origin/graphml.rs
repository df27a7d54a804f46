//! Conversion of OSM ways into a directed GraphML graph.
//!
//! Every OSM node used by a way becomes a graph node with its coordinates (`x` = longitude,
//! `y` = latitude). Every pair of consecutive way nodes becomes an edge in each allowed direction.

use super::{NetworkType, OsmData, OsmWay};
use anyhow::{Result, bail};
use std::{collections::BTreeSet, fmt::Write};

const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Allowed directions of travel along a way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
	Both,
	Forward,
	Backward,
}

fn direction(way: &OsmWay, network_type: NetworkType) -> Direction {
	if !network_type.respects_oneway() {
		return Direction::Both;
	}
	match way.tag("oneway") {
		Some("yes" | "true" | "1") => Direction::Forward,
		Some("-1" | "reverse") => Direction::Backward,
		Some(_) => Direction::Both,
		None if way.tag("junction") == Some("roundabout") => Direction::Forward,
		None => Direction::Both,
	}
}

/// Great circle distance in meters.
fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
	let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
	let d_phi = phi2 - phi1;
	let d_lambda = (lon2 - lon1).to_radians();
	let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
	2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

fn escape(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&apos;"),
			c => result.push(c),
		}
	}
	result
}

struct Edge<'a> {
	source: u64,
	target: u64,
	way: &'a OsmWay,
	oneway: bool,
	length: f64,
}

/// Builds the GraphML document of `data`. Fails if the data contains no usable way.
pub fn build_graphml(data: &OsmData, network_type: NetworkType, place: &str) -> Result<String> {
	let mut used_nodes = BTreeSet::new();
	let mut edges = Vec::new();

	for way in &data.ways {
		let allowed = direction(way, network_type);
		for pair in way.nodes.windows(2) {
			let (Some(a), Some(b)) = (data.nodes.get(&pair[0]), data.nodes.get(&pair[1])) else {
				continue;
			};
			if a.id == b.id {
				continue;
			}
			let length = haversine(a.lat, a.lon, b.lat, b.lon);
			let oneway = allowed != Direction::Both;
			if allowed != Direction::Backward {
				edges.push(Edge {
					source: a.id,
					target: b.id,
					way,
					oneway,
					length,
				});
			}
			if allowed != Direction::Forward {
				edges.push(Edge {
					source: b.id,
					target: a.id,
					way,
					oneway,
					length,
				});
			}
			used_nodes.insert(a.id);
			used_nodes.insert(b.id);
		}
	}

	if edges.is_empty() {
		bail!("no {network_type} network found for '{place}'");
	}

	let mut xml = String::new();
	xml.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
	xml.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd\">\n");
	for (id, target, name, kind) in [
		("d0", "graph", "created_with", "string"),
		("d1", "graph", "network_type", "string"),
		("d2", "graph", "place", "string"),
		("d3", "node", "y", "double"),
		("d4", "node", "x", "double"),
		("d5", "edge", "osmid", "long"),
		("d6", "edge", "highway", "string"),
		("d7", "edge", "name", "string"),
		("d8", "edge", "oneway", "boolean"),
		("d9", "edge", "length", "double"),
	] {
		writeln!(
			xml,
			"  <key id=\"{id}\" for=\"{target}\" attr.name=\"{name}\" attr.type=\"{kind}\" />"
		)?;
	}

	xml.push_str("  <graph edgedefault=\"directed\">\n");
	writeln!(xml, "    <data key=\"d0\">roadcache {}</data>", env!("CARGO_PKG_VERSION"))?;
	writeln!(xml, "    <data key=\"d1\">{network_type}</data>")?;
	writeln!(xml, "    <data key=\"d2\">{}</data>", escape(place))?;

	for id in &used_nodes {
		let node = &data.nodes[id];
		writeln!(
			xml,
			"    <node id=\"{id}\"><data key=\"d3\">{}</data><data key=\"d4\">{}</data></node>",
			node.lat, node.lon
		)?;
	}

	for edge in &edges {
		write!(
			xml,
			"    <edge source=\"{}\" target=\"{}\"><data key=\"d5\">{}</data>",
			edge.source, edge.target, edge.way.id
		)?;
		if let Some(highway) = edge.way.tag("highway") {
			write!(xml, "<data key=\"d6\">{}</data>", escape(highway))?;
		}
		if let Some(name) = edge.way.tag("name") {
			write!(xml, "<data key=\"d7\">{}</data>", escape(name))?;
		}
		writeln!(
			xml,
			"<data key=\"d8\">{}</data><data key=\"d9\">{:.3}</data></edge>",
			if edge.oneway { "True" } else { "False" },
			edge.length
		)?;
	}

	xml.push_str("  </graph>\n</graphml>\n");
	log::debug!("built graph with {} nodes and {} edges", used_nodes.len(), edges.len());
	Ok(xml)
}
