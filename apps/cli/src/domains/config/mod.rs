use anyhow::{bail, Result};
use clap::Subcommand;

use crate::config::CliConfig;
use crate::util::prelude::*;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
	/// Show the stored configuration
	Show,
	/// Store the API url used when neither --api-url nor ZINE_API_URL is set
	SetUrl { url: String },
	/// Store the request timeout in seconds
	SetTimeout { secs: u64 },
	/// Forget all stored settings
	Reset,
}

pub async fn run(ctx: &Context, cmd: ConfigCmd) -> Result<()> {
	match cmd {
		ConfigCmd::Show => {
			let config = CliConfig::load(&ctx.config_dir)?;
			print_output!(ctx, &config, |c: &CliConfig| {
				println!(
					"Config file: {}",
					CliConfig::config_path(&ctx.config_dir).display()
				);
				println!(
					"API url: {}",
					c.api_url.as_deref().unwrap_or(zl_api::DEFAULT_API_URL)
				);
				println!("Timeout: {}s", c.resolve_timeout(None));
				println!("In use: {}", ctx.api.api_url);
			});
		}
		ConfigCmd::SetUrl { url } => {
			if is_invalid_url(&url) {
				bail!("Not a valid url: {url}");
			}

			let mut config = CliConfig::load(&ctx.config_dir)?;
			config.api_url = Some(url);
			config.save(&ctx.config_dir)?;
			println!("API url saved");
		}
		ConfigCmd::SetTimeout { secs } => {
			if secs == 0 {
				bail!("Timeout must be at least one second");
			}

			let mut config = CliConfig::load(&ctx.config_dir)?;
			config.timeout_secs = Some(secs);
			config.save(&ctx.config_dir)?;
			println!("Timeout saved");
		}
		ConfigCmd::Reset => {
			CliConfig::default().save(&ctx.config_dir)?;
			println!("Configuration reset");
		}
	}

	Ok(())
}

fn is_invalid_url(url: &str) -> bool {
	zl_api::RequestConfig::new(url).url(&[]).is_err()
}
