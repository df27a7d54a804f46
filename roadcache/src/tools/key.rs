use anyhow::Result;
use clap::Args;
use roadcache::{
	core::{CacheKey, ResourceRequest},
	origin::NetworkType,
};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// place name, e.g. "Piedmont, California, USA"
	#[arg(required = true)]
	location: String,

	/// network type
	#[arg(long = "type", short = 't', value_enum, default_value_t = NetworkType::Drive)]
	network_type: NetworkType,
}

impl Subcommand {
	/// The key `load` uses for the same location and type.
	fn cache_key(&self) -> CacheKey {
		ResourceRequest::new(self.location.trim(), self.network_type.as_str()).cache_key()
	}
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	println!("{}", arguments.cache_key());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::run_command;
	use roadcache::config::Config;

	fn subcommand(location: &str, network_type: NetworkType) -> Subcommand {
		Subcommand {
			location: location.to_string(),
			network_type,
		}
	}

	#[test]
	fn prints_key() {
		let msg = run_command(vec!["roadcache", "key", "New York, NY", "--type", "all_private"]).unwrap();
		assert!(msg.contains("network_type: AllPrivate"), "{msg}");
		assert_eq!(
			subcommand("New York, NY", NetworkType::AllPrivate).cache_key().as_str(),
			"New_York__NY_all_private.graphml"
		);
	}

	#[test]
	fn matches_the_key_of_load() {
		let config = Config::from_string("location: ' Berlin '").unwrap();
		let key = subcommand(" Berlin ", NetworkType::Drive).cache_key();
		assert_eq!(key.as_str(), "Berlin_drive.graphml");
		assert_eq!(key, config.request().unwrap().cache_key());
	}
}
