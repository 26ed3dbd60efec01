//! CLI configuration stored in the platform config directory

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
	/// Base url of the layout backend API
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_url: Option<String>,
	/// Request timeout in seconds
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_secs: Option<u64>,
}

impl CliConfig {
	pub fn default_dir() -> Result<PathBuf> {
		ProjectDirs::from("", "", "zine-layout")
			.map(|dirs| dirs.config_dir().to_path_buf())
			.ok_or_else(|| anyhow!("Could not determine config directory"))
	}

	pub fn config_path(config_dir: &Path) -> PathBuf {
		config_dir.join("config.json")
	}

	/// Load the config, falling back to defaults when no file exists yet
	pub fn load(config_dir: &Path) -> Result<Self> {
		let config_path = Self::config_path(config_dir);

		if !config_path.exists() {
			return Ok(Self::default());
		}

		let json = std::fs::read_to_string(&config_path)?;
		Ok(serde_json::from_str(&json)?)
	}

	pub fn save(&self, config_dir: &Path) -> Result<()> {
		std::fs::create_dir_all(config_dir)?;

		let json = serde_json::to_string_pretty(self)?;
		std::fs::write(Self::config_path(config_dir), json)?;
		Ok(())
	}

	/// Resolve the API url: explicit flag or env first, then the config file, then the default
	pub fn resolve_api_url(&self, flag: Option<String>) -> String {
		flag.or_else(|| self.api_url.clone())
			.unwrap_or_else(|| zl_api::DEFAULT_API_URL.to_string())
	}

	pub fn resolve_timeout(&self, flag: Option<u64>) -> u64 {
		flag.or(self.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use pretty_assertions::assert_eq;
	use tempfile::tempdir;

	#[test]
	fn missing_file_loads_defaults() {
		let dir = tempdir().unwrap();

		let config = CliConfig::load(dir.path()).unwrap();

		assert_eq!(config, CliConfig::default());
		assert_eq!(config.resolve_api_url(None), zl_api::DEFAULT_API_URL);
		assert_eq!(config.resolve_timeout(None), DEFAULT_TIMEOUT_SECS);
	}

	#[test]
	fn saved_config_is_loaded_back() {
		let dir = tempdir().unwrap();
		let nested = dir.path().join("zine-layout");

		let config = CliConfig {
			api_url: Some("http://zines.local/api".to_string()),
			timeout_secs: Some(5),
		};
		config.save(&nested).unwrap();

		assert_eq!(CliConfig::load(&nested).unwrap(), config);
	}

	#[test]
	fn flag_overrides_file() {
		let config = CliConfig {
			api_url: Some("http://from-file/api".to_string()),
			timeout_secs: Some(5),
		};

		assert_eq!(
			config.resolve_api_url(Some("http://from-flag/api".to_string())),
			"http://from-flag/api"
		);
		assert_eq!(config.resolve_api_url(None), "http://from-file/api");
		assert_eq!(config.resolve_timeout(Some(60)), 60);
	}
}
