use anyhow::{Context, Result};
use clap::Args;
use roadcache::{
	config::Config,
	core::EventBus,
	loader::{GraphLoader, describe_failure},
	origin::NetworkType,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// config file (YAML or JSON)
	#[arg(required = true)]
	config: PathBuf,

	/// load this network type instead of the configured one
	#[arg(long = "type", short = 't', value_enum)]
	network_type: Option<NetworkType>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = Config::from_path(&arguments.config).context("config stage: invalid configuration")?;
	if let Some(network_type) = arguments.network_type {
		config.resource_type = network_type.to_string();
	}

	let events = EventBus::new();
	events.forward_to_log();
	let loader = GraphLoader::new(config, events).context("config stage: failed to open the cache tiers")?;

	match loader.load().await {
		Ok(graph) => {
			println!(
				"Loaded graph for '{}' from {}: {} nodes, {} edges",
				loader.config().location,
				graph.resolved.tier,
				graph.summary.nodes,
				graph.summary.edges
			);
			Ok(())
		}
		Err(err) => {
			let description = describe_failure(&err);
			Err(err.context(description))
		}
	}
}
