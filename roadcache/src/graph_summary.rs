use anyhow::{Result, bail};
use roadcache_core::Blob;
use std::fmt::Display;

/// Size of a GraphML graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphSummary {
	pub nodes: usize,
	pub edges: usize,
}

impl GraphSummary {
	/// Counts the `<node>` and `<edge>` elements of a GraphML document.
	pub fn from_blob(blob: &Blob) -> Result<GraphSummary> {
		let Some(text) = blob.as_str() else {
			bail!("graph is not valid UTF-8");
		};
		if !text.contains("<graphml") {
			bail!("graph is not a GraphML document");
		}
		Ok(GraphSummary {
			nodes: count_elements(text, "node"),
			edges: count_elements(text, "edge"),
		})
	}
}

fn count_elements(text: &str, name: &str) -> usize {
	let tag = format!("<{name}");
	text
		.match_indices(&tag)
		.filter(|(index, _)| {
			matches!(
				text.as_bytes().get(index + tag.len()),
				Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')
			)
		})
		.count()
}

impl Display for GraphSummary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} nodes, {} edges", self.nodes, self.edges)
	}
}
