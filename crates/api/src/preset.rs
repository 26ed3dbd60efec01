use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{send_json, send_ok, send_text, Error, PresetInfo, ProjectId, RequestConfig};

#[derive(Deserialize)]
struct ListResponse {
	#[serde(default)]
	presets: Vec<PresetInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyRequest<'a> {
	preset_id: &'a str,
}

pub async fn list(config: &RequestConfig) -> Result<Vec<PresetInfo>, Error> {
	let ListResponse { presets } = send_json(config.client.get(config.url(&["presets"])?)).await?;

	Ok(presets)
}

pub async fn get_yaml(config: &RequestConfig, preset_id: &str) -> Result<String, Error> {
	send_text(config.client.get(config.url(&["presets", preset_id])?)).await
}

/// Replaces the project's layout spec with the preset's.
#[instrument(skip_all, fields(project_id = %project))]
pub async fn apply(
	config: &RequestConfig,
	project: &ProjectId,
	preset_id: &str,
) -> Result<(), Error> {
	send_ok(
		config
			.client
			.post(config.url(&["projects", project.as_str(), "preset"])?)
			.json(&ApplyRequest { preset_id }),
	)
	.await
}
