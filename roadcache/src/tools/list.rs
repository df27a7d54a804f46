use anyhow::Result;
use clap::Args;
use roadcache::{config::Config, core::EventBus, loader::GraphLoader};
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// config file (YAML or JSON)
	#[arg(required = true)]
	config: PathBuf,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_path(&arguments.config)?;
	let events = EventBus::new();
	events.forward_to_log();
	let loader = GraphLoader::new(config, events)?;
	let listing = loader.list().await?;

	println!("local cache {:?}:", loader.resolver().local().root());
	print_keys(&listing.local);

	match (loader.resolver().remote(), listing.remote) {
		(Some(remote), Some(keys)) => {
			println!("remote store {}:", remote.namespace());
			print_keys(&keys);
		}
		_ => println!("remote store: disabled"),
	}
	Ok(())
}

fn print_keys(keys: &[String]) {
	if keys.is_empty() {
		println!("  (empty)");
	}
	for key in keys {
		println!("  {key}");
	}
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use assert_fs::{TempDir, prelude::*};

	#[test]
	fn lists_an_empty_cache() {
		let dir = TempDir::new().unwrap();
		let config = dir.child("config.json");
		config.write_str(r#"{"location": "Berlin", "s3_bucket": null}"#).unwrap();
		run_command(vec!["roadcache", "list", config.path().to_str().unwrap()]).unwrap();
		dir.child("map_cache").assert(predicates::path::is_dir());
	}
}
