use serde_json::json;
use tracing::{debug, instrument};

use crate::{send_json, Error, ProjectId, RequestConfig, ValidationReport};

/// Asks the backend to check the project's layout against its images.
#[instrument(skip_all, fields(project_id = %project))]
pub async fn run(config: &RequestConfig, project: &ProjectId) -> Result<ValidationReport, Error> {
	let report: ValidationReport = send_json(
		config
			.client
			.post(config.url(&["projects", project.as_str(), "validate"])?)
			.json(&json!({})),
	)
	.await?;

	debug!(ok = report.ok, issues = report.issues.len(), "validation finished");

	Ok(report)
}
