mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Load the graph of a config file through the cache tiers
	Load(tools::load::Subcommand),

	/// List the graphs in the local cache and the remote store
	#[clap(alias = "ls")]
	List(tools::list::Subcommand),

	/// Print the cache key of a location
	Key(tools::key::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Load(arguments) => tools::load::run(arguments),
		Commands::List(arguments) => tools::list::run(arguments),
		Commands::Key(arguments) => tools::key::run(arguments),
	}
}
