use std::path::PathBuf;

use clap::Args;
use zl_api::{ProjectId, RenderOptions};

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
	/// Project ID
	pub project: String,
}

impl ProjectArgs {
	pub fn project_id(&self) -> ProjectId {
		self.project.as_str().into()
	}
}

#[derive(Args, Debug, Clone)]
pub struct ProjectCreateArgs {
	/// Project name, the server picks one when omitted
	pub name: Option<String>,
	/// Preset to seed the layout spec from
	#[arg(long)]
	pub preset: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectRenameArgs {
	/// Project ID
	pub project: String,
	/// New name
	pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct YamlPutArgs {
	/// Project ID
	pub project: String,
	/// File holding the layout spec, or "-" to read stdin
	pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct RenderTriggerArgs {
	/// Project ID
	pub project: String,
	/// Render a test sheet instead of the final output
	#[arg(long, default_value_t = false)]
	pub test: bool,
	/// Render the test sheet in black and white
	#[arg(long, default_value_t = false)]
	pub test_bw: bool,
	/// Test sheet dimensions as "<width>,<height>"
	#[arg(long)]
	pub test_dimensions: Option<String>,
}

impl RenderTriggerArgs {
	pub fn to_options(&self) -> RenderOptions {
		let defaults = RenderOptions::default();
		RenderOptions {
			test: self.test,
			test_bw: self.test_bw,
			test_dimensions: self
				.test_dimensions
				.clone()
				.unwrap_or(defaults.test_dimensions),
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct RenderUrlArgs {
	/// Project ID
	pub project: String,
	/// Render ID
	pub render_id: String,
}
