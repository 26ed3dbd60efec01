use async_trait::async_trait;

use zl_api::{ImageCollection, ImageItem, ImageUpload, ItemId, ProjectId, RequestConfig};

/// The backend operations a tray depends on.
///
/// Every call captures its arguments by value or borrow for the duration of the request only;
/// implementations must not keep references into tray state.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
	async fn fetch_collection(&self, project: &ProjectId) -> Result<ImageCollection, zl_api::Error>;

	async fn upload(
		&self,
		project: &ProjectId,
		files: Vec<ImageUpload>,
	) -> Result<Vec<ImageItem>, zl_api::Error>;

	async fn delete(&self, project: &ProjectId, item: &ItemId) -> Result<(), zl_api::Error>;

	async fn reorder(&self, project: &ProjectId, order: &[ItemId]) -> Result<(), zl_api::Error>;
}

#[async_trait]
impl Transport for RequestConfig {
	async fn fetch_collection(&self, project: &ProjectId) -> Result<ImageCollection, zl_api::Error> {
		zl_api::image::list(self, project).await
	}

	async fn upload(
		&self,
		project: &ProjectId,
		files: Vec<ImageUpload>,
	) -> Result<Vec<ImageItem>, zl_api::Error> {
		zl_api::image::upload(self, project, files).await
	}

	async fn delete(&self, project: &ProjectId, item: &ItemId) -> Result<(), zl_api::Error> {
		zl_api::image::delete(self, project, item).await
	}

	async fn reorder(&self, project: &ProjectId, order: &[ItemId]) -> Result<(), zl_api::Error> {
		zl_api::image::reorder(self, project, order).await
	}
}
