use reqwest::{
	multipart::{Form, Part},
	Url,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
	send_json, send_ok, Error, ImageCollection, ImageItem, ImageUpload, ItemId, ProjectId,
	RequestConfig,
};

#[derive(Deserialize)]
struct UploadResponse {
	#[serde(default)]
	images: Vec<ImageItem>,
}

#[derive(Serialize)]
struct ReorderRequest<'a> {
	order: &'a [ItemId],
}

/// Fetches every image of a project along with the server's canonical order.
#[instrument(skip_all, fields(project_id = %project))]
pub async fn list(config: &RequestConfig, project: &ProjectId) -> Result<ImageCollection, Error> {
	send_json(
		config
			.client
			.get(config.url(&["projects", project.as_str(), "images"])?),
	)
	.await
}

/// Uploads files as `images[]` multipart parts. The returned items carry the server assigned
/// ids; their position in the canonical order is only known after a new [`list`].
#[instrument(skip_all, fields(project_id = %project, count = files.len()))]
pub async fn upload(
	config: &RequestConfig,
	project: &ProjectId,
	files: Vec<ImageUpload>,
) -> Result<Vec<ImageItem>, Error> {
	let mut form = Form::new();

	for file in files {
		let mut part = Part::bytes(file.bytes).file_name(file.file_name);
		if let Some(content_type) = file.content_type.as_deref() {
			part = part.mime_str(content_type)?;
		}
		form = form.part("images[]", part);
	}

	let UploadResponse { images } = send_json(
		config
			.client
			.post(config.url(&["projects", project.as_str(), "images"])?)
			.multipart(form),
	)
	.await?;

	debug!(uploaded = images.len(), "upload accepted");

	Ok(images)
}

#[instrument(skip_all, fields(project_id = %project, image_id = %image))]
pub async fn delete(
	config: &RequestConfig,
	project: &ProjectId,
	image: &ItemId,
) -> Result<(), Error> {
	send_ok(config.client.delete(config.url(&[
		"projects",
		project.as_str(),
		"images",
		image.as_str(),
	])?))
	.await
}

/// Submits a full replacement ordering. The server may reject ids it doesn't know.
#[instrument(skip_all, fields(project_id = %project, len = order.len()))]
pub async fn reorder(
	config: &RequestConfig,
	project: &ProjectId,
	order: &[ItemId],
) -> Result<(), Error> {
	send_ok(
		config
			.client
			.post(config.url(&["projects", project.as_str(), "images", "reorder"])?)
			.json(&ReorderRequest { order }),
	)
	.await
}

/// Address of an image's content, for display.
pub fn url(config: &RequestConfig, project: &ProjectId, image: &ItemId) -> Result<Url, Error> {
	config.url(&["projects", project.as_str(), "images", image.as_str()])
}
