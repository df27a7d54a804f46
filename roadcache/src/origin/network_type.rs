//! The kinds of road network that can be requested.
//!
//! Each type selects OpenStreetMap ways with an Overpass tag filter. The filters follow the conventions of
//! the common OSM graph tools, so a `drive` network contains public roads usable by cars and a `walk`
//! network contains everything a pedestrian may use.

use anyhow::{Result, bail};
use std::{fmt::Display, str::FromStr};

const ACCESS_NOT_PRIVATE: &str = r#"["access"!~"private"]"#;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NetworkType {
	#[default]
	Drive,
	#[cfg_attr(feature = "cli", value(name = "drive_service"))]
	DriveService,
	Walk,
	Bike,
	All,
	#[cfg_attr(feature = "cli", value(name = "all_private"))]
	AllPrivate,
}

impl NetworkType {
	pub const ALL: [NetworkType; 6] = [
		NetworkType::Drive,
		NetworkType::DriveService,
		NetworkType::Walk,
		NetworkType::Bike,
		NetworkType::All,
		NetworkType::AllPrivate,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			NetworkType::Drive => "drive",
			NetworkType::DriveService => "drive_service",
			NetworkType::Walk => "walk",
			NetworkType::Bike => "bike",
			NetworkType::All => "all",
			NetworkType::AllPrivate => "all_private",
		}
	}

	/// Overpass tag filter for the ways of this network.
	pub fn overpass_filter(&self) -> String {
		let (highway, extra, access) = match self {
			NetworkType::Drive => (
				"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|elevator|escalator|footway|no|path|pedestrian|planned|platform|proposed|raceway|razed|service|steps|track",
				r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]["service"!~"alley|driveway|emergency_access|parking|parking_aisle|private"]"#,
				true,
			),
			NetworkType::DriveService => (
				"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|elevator|escalator|footway|no|path|pedestrian|planned|platform|proposed|raceway|razed|steps|track",
				r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]["service"!~"emergency_access|parking|parking_aisle|private"]"#,
				true,
			),
			NetworkType::Walk => (
				"abandoned|bus_guideway|construction|cycleway|motor|no|planned|platform|proposed|raceway|razed",
				r#"["foot"!~"no"]["service"!~"private"]"#,
				true,
			),
			NetworkType::Bike => (
				"abandoned|bus_guideway|construction|corridor|elevator|escalator|footway|motor|no|planned|platform|proposed|raceway|razed|steps",
				r#"["bicycle"!~"no"]["service"!~"private"]"#,
				true,
			),
			NetworkType::All => (
				"abandoned|construction|no|planned|platform|proposed|raceway|razed",
				r#"["service"!~"private"]"#,
				true,
			),
			NetworkType::AllPrivate => ("abandoned|construction|no|planned|platform|proposed|raceway|razed", "", false),
		};
		format!(
			r#"["highway"]["area"!~"yes"]["highway"!~"{highway}"]{extra}{}"#,
			if access { ACCESS_NOT_PRIVATE } else { "" }
		)
	}

	/// Whether `oneway` tags restrict the direction of travel.
	pub fn respects_oneway(&self) -> bool {
		matches!(self, NetworkType::Drive | NetworkType::DriveService)
	}
}

impl FromStr for NetworkType {
	type Err = anyhow::Error;

	fn from_str(text: &str) -> Result<Self> {
		let text = text.trim().to_ascii_lowercase();
		for network_type in NetworkType::ALL {
			if network_type.as_str() == text {
				return Ok(network_type);
			}
		}
		let known = NetworkType::ALL.map(|t| t.as_str()).join(", ");
		bail!("unknown network type '{text}', expected one of: {known}")
	}
}

impl Display for NetworkType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	#[case("drive", NetworkType::Drive)]
	#[case("drive_service", NetworkType::DriveService)]
	#[case(" Walk ", NetworkType::Walk)]
	#[case("bike", NetworkType::Bike)]
	#[case("all", NetworkType::All)]
	#[case("all_private", NetworkType::AllPrivate)]
	fn parse(#[case] text: &str, #[case] expected: NetworkType) {
		assert_eq!(text.parse::<NetworkType>().unwrap(), expected);
	}

	#[test]
	fn parse_unknown() {
		let err = "boat".parse::<NetworkType>().unwrap_err().to_string();
		assert_eq!(
			err,
			"unknown network type 'boat', expected one of: drive, drive_service, walk, bike, all, all_private"
		);
	}

	#[test]
	fn display_roundtrip() {
		for network_type in NetworkType::ALL {
			assert_eq!(network_type.to_string().parse::<NetworkType>().unwrap(), network_type);
		}
	}

	#[test]
	fn filters() {
		let drive = NetworkType::Drive.overpass_filter();
		assert!(drive.starts_with(r#"["highway"]["area"!~"yes"]["highway"!~"abandoned|"#));
		assert!(drive.contains(r#"["motorcar"!~"no"]"#));
		assert!(drive.ends_with(r#"["access"!~"private"]"#));

		let private = NetworkType::AllPrivate.overpass_filter();
		assert!(!private.contains("access"));
		assert!(NetworkType::Drive.respects_oneway());
		assert!(!NetworkType::Walk.respects_oneway());
	}
}
