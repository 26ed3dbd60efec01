#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod config;
mod context;
mod domains;
mod util;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zl_api::RequestConfig;

use crate::{
	config::CliConfig,
	context::{Context, OutputFormat},
	domains::{config::ConfigCmd, image::ImageCmd, preset::PresetCmd, project::ProjectCmd},
};

#[derive(Parser, Debug)]
#[command(name = "zine", about = "Zine layout client", version)]
struct Cli {
	/// Base url of the layout backend API
	#[arg(long, env = "ZINE_API_URL", global = true)]
	api_url: Option<String>,

	/// Request timeout in seconds
	#[arg(long, global = true)]
	timeout_secs: Option<u64>,

	/// Directory holding config.json
	#[arg(long, global = true)]
	config_dir: Option<PathBuf>,

	/// Output format
	#[arg(long, value_enum, default_value = "human", global = true)]
	format: OutputFormat,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Check that the backend is reachable
	Health,
	/// CLI configuration
	#[command(subcommand)]
	Config(ConfigCmd),
	/// Project operations
	#[command(subcommand)]
	Project(ProjectCmd),
	/// Image tray operations
	#[command(subcommand)]
	Image(ImageCmd),
	/// Layout presets
	#[command(subcommand)]
	Preset(PresetCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zine=info,zl=info")),
		)
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();

	let config_dir = match cli.config_dir {
		Some(dir) => dir,
		None => CliConfig::default_dir()?,
	};
	let config = CliConfig::load(&config_dir)?;

	let api_url = config.resolve_api_url(cli.api_url);
	let timeout = Duration::from_secs(config.resolve_timeout(cli.timeout_secs));
	debug!(%api_url, ?timeout, "resolved client settings");

	let ctx = Context::new(
		RequestConfig::with_timeout(api_url, timeout)?,
		cli.format,
		config_dir,
	);

	match cli.command {
		Commands::Health => {
			if zl_api::health::check(&ctx.api).await? {
				println!("Backend at {} is healthy", ctx.api.api_url);
			} else {
				anyhow::bail!("Backend at {} reported a problem", ctx.api.api_url);
			}
		}
		Commands::Config(cmd) => domains::config::run(&ctx, cmd).await?,
		Commands::Project(cmd) => domains::project::run(&ctx, cmd).await?,
		Commands::Image(cmd) => domains::image::run(&ctx, cmd).await?,
		Commands::Preset(cmd) => domains::preset::run(&ctx, cmd).await?,
	}

	Ok(())
}
