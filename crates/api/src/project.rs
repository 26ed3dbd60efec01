use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{send_json, send_ok, Error, Project, ProjectId, RequestConfig};

#[derive(Deserialize)]
struct ListResponse {
	projects: Vec<Project>,
}

#[derive(Deserialize)]
struct ProjectResponse {
	project: Project,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	name: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	preset_id: Option<&'a str>,
}

pub async fn list(config: &RequestConfig) -> Result<Vec<Project>, Error> {
	let ListResponse { projects } =
		send_json(config.client.get(config.url(&["projects"])?)).await?;

	Ok(projects)
}

pub async fn get(config: &RequestConfig, id: &ProjectId) -> Result<Project, Error> {
	let ProjectResponse { project } =
		send_json(config.client.get(config.url(&["projects", id.as_str()])?)).await?;

	Ok(project)
}

#[instrument(skip(config))]
pub async fn create(
	config: &RequestConfig,
	name: Option<&str>,
	preset_id: Option<&str>,
) -> Result<Project, Error> {
	let ProjectResponse { project } = send_json(
		config
			.client
			.post(config.url(&["projects"])?)
			.json(&CreateRequest { name, preset_id }),
	)
	.await?;

	Ok(project)
}

#[instrument(skip_all, fields(project_id = %id))]
pub async fn rename(config: &RequestConfig, id: &ProjectId, name: &str) -> Result<Project, Error> {
	let ProjectResponse { project } = send_json(
		config
			.client
			.put(config.url(&["projects", id.as_str()])?)
			.json(&CreateRequest {
				name: Some(name),
				..Default::default()
			}),
	)
	.await?;

	Ok(project)
}

#[instrument(skip_all, fields(project_id = %id))]
pub async fn delete(config: &RequestConfig, id: &ProjectId) -> Result<(), Error> {
	send_ok(config.client.delete(config.url(&["projects", id.as_str()])?)).await
}
