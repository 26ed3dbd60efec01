use serde::Deserialize;
use tracing::instrument;

use crate::{send_json, send_ok, Error, ProjectId, RenderInfo, RenderOptions, RequestConfig};

#[derive(Deserialize)]
struct ListResponse {
	#[serde(default)]
	renders: Vec<RenderInfo>,
}

pub async fn list(config: &RequestConfig, project: &ProjectId) -> Result<Vec<RenderInfo>, Error> {
	let ListResponse { renders } = send_json(
		config
			.client
			.get(config.url(&["projects", project.as_str(), "renders"])?),
	)
	.await?;

	Ok(renders)
}

#[instrument(skip_all, fields(project_id = %project))]
pub async fn trigger(
	config: &RequestConfig,
	project: &ProjectId,
	options: &RenderOptions,
) -> Result<(), Error> {
	send_ok(
		config
			.client
			.post(config.url(&["projects", project.as_str(), "render"])?)
			.json(options),
	)
	.await
}

pub fn download_url(
	config: &RequestConfig,
	project: &ProjectId,
	render_id: &str,
) -> Result<reqwest::Url, Error> {
	config.url(&[
		"projects",
		project.as_str(),
		"renders",
		render_id,
		"download.zip",
	])
}
