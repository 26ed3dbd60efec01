use std::{path::PathBuf, sync::Arc};

use zl_api::{ProjectId, RequestConfig};
use zl_tray::ImageTray;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
	Human,
	Json,
}

#[derive(Clone)]
pub struct Context {
	pub api: RequestConfig,
	pub format: OutputFormat,
	pub config_dir: PathBuf,
}

impl Context {
	pub fn new(api: RequestConfig, format: OutputFormat, config_dir: PathBuf) -> Self {
		Self {
			api,
			format,
			config_dir,
		}
	}

	/// Image tray for `project`, sharing this context's HTTP client
	pub fn tray(&self, project: ProjectId) -> ImageTray<RequestConfig> {
		ImageTray::new(Arc::new(self.api.clone()), project)
	}
}
