use reqwest::header::CONTENT_TYPE;
use tracing::instrument;

use crate::{send_ok, send_text, Error, ProjectId, RequestConfig};

/// Fetches the raw layout spec of a project.
pub async fn get(config: &RequestConfig, project: &ProjectId) -> Result<String, Error> {
	send_text(
		config
			.client
			.get(config.url(&["projects", project.as_str(), "yaml"])?),
	)
	.await
}

#[instrument(skip_all, fields(project_id = %project, len = yaml.len()))]
pub async fn put(config: &RequestConfig, project: &ProjectId, yaml: String) -> Result<(), Error> {
	send_ok(
		config
			.client
			.put(config.url(&["projects", project.as_str(), "yaml"])?)
			.header(CONTENT_TYPE, "text/plain")
			.body(yaml),
	)
	.await
}
