pub mod server;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use memos_service::MemosService;

#[derive(Debug, Parser)]
#[command(
	version = memos_cli::VERSION,
	rename_all = "kebab",
	styles = memos_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> Result<()> {
	let config = memos_config::load(&args.config)?;

	init_tracing(&config.service.log_level);

	let service = Arc::new(MemosService::new(&config)?);

	tracing::info!(
		transport = config.service.transport.as_str(),
		memos_url = config.memos.url.as_str(),
		"Starting memos MCP server."
	);

	server::serve_mcp(&config.service, service).await
}

// Stdout carries the stdio transport, so logs go to stderr.
fn init_tracing(log_level: &str) {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use crate::Args;

	#[test]
	fn parses_short_and_long_config_flags() {
		let args = Args::try_parse_from(["memos-mcp", "-c", "memos.toml"]).expect("parse");

		assert_eq!(args.config.to_str(), Some("memos.toml"));

		let args =
			Args::try_parse_from(["memos-mcp", "--config", "/etc/memos.toml"]).expect("parse");

		assert_eq!(args.config.to_str(), Some("/etc/memos.toml"));
	}

	#[test]
	fn config_flag_is_required() {
		assert!(Args::try_parse_from(["memos-mcp"]).is_err());
	}
}
