//! # Remote Collection Cache
//!
//! Last fetched server view of one project's image collection. Snapshots are replaced
//! wholesale, never merged. Mutations go through the cache so it can mark the collection
//! stale and broadcast the invalidated [`Tag`]s to anyone watching.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};
use zl_api::{ImageCollection, ImageItem, ImageUpload, ItemId, ProjectId};

use crate::Transport;

const INVALIDATION_CHANNEL_CAPACITY: usize = 16;

/// Backend resource kinds a cached query depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
	Project,
	Image,
	Preset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
	Upload,
	Delete,
	Reorder,
}

impl Mutation {
	/// Tags to mark stale once the mutation resolves.
	///
	/// Uploads and deletes may have partially applied on the server even when they fail, so
	/// they invalidate on any outcome. A failed reorder leaves the canonical order as it was.
	#[must_use]
	pub const fn invalidates(self, succeeded: bool) -> &'static [Tag] {
		match (self, succeeded) {
			(Self::Upload | Self::Delete, _) | (Self::Reorder, true) => &[Tag::Image],
			(Self::Reorder, false) => &[],
		}
	}
}

impl fmt::Display for Mutation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Upload => "upload",
			Self::Delete => "delete",
			Self::Reorder => "reorder",
		})
	}
}

/// Which mutation kinds currently have a request in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingRequests {
	pub upload: bool,
	pub delete: bool,
	pub reorder: bool,
}

#[derive(Debug, Default)]
struct Inner {
	snapshot: Arc<ImageCollection>,
	loaded: bool,
	stale: bool,
	last_error: Option<String>,
	in_flight: [u32; 3],
	fetches_started: u64,
	fetch_applied: u64,
}

impl Inner {
	fn pending(&self) -> PendingRequests {
		PendingRequests {
			upload: self.in_flight[Mutation::Upload as usize] > 0,
			delete: self.in_flight[Mutation::Delete as usize] > 0,
			reorder: self.in_flight[Mutation::Reorder as usize] > 0,
		}
	}
}

/// Keeps a mutation's pending flag raised until dropped, so a request future abandoned
/// mid-flight still lowers it.
struct PendingGuard {
	inner: Arc<Mutex<Inner>>,
	mutation: Mutation,
}

impl PendingGuard {
	fn new(inner: &Arc<Mutex<Inner>>, mutation: Mutation) -> Self {
		inner.lock().in_flight[mutation as usize] += 1;

		Self {
			inner: Arc::clone(inner),
			mutation,
		}
	}
}

impl Drop for PendingGuard {
	fn drop(&mut self) {
		let mut inner = self.inner.lock();
		let slot = &mut inner.in_flight[self.mutation as usize];
		*slot = slot.saturating_sub(1);
	}
}

pub struct CollectionCache<T> {
	transport: Arc<T>,
	project: ProjectId,
	inner: Arc<Mutex<Inner>>,
	invalidations: broadcast::Sender<Tag>,
}

impl<T> Clone for CollectionCache<T> {
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			project: self.project.clone(),
			inner: Arc::clone(&self.inner),
			invalidations: self.invalidations.clone(),
		}
	}
}

impl<T: Transport> CollectionCache<T> {
	pub fn new(transport: Arc<T>, project: ProjectId) -> Self {
		let (invalidations, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);

		Self {
			transport,
			project,
			inner: Arc::new(Mutex::new(Inner {
				stale: true,
				..Default::default()
			})),
			invalidations,
		}
	}

	pub fn project(&self) -> &ProjectId {
		&self.project
	}

	/// Last fetched collection, empty until the first successful fetch.
	pub fn snapshot(&self) -> Arc<ImageCollection> {
		Arc::clone(&self.inner.lock().snapshot)
	}

	pub fn is_loaded(&self) -> bool {
		self.inner.lock().loaded
	}

	/// Whether the snapshot may no longer match the server.
	pub fn is_stale(&self) -> bool {
		self.inner.lock().stale
	}

	/// Message of the last failed fetch, cleared once the latest fetch succeeds.
	pub fn last_error(&self) -> Option<String> {
		self.inner.lock().last_error.clone()
	}

	pub fn pending(&self) -> PendingRequests {
		self.inner.lock().pending()
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Tag> {
		self.invalidations.subscribe()
	}

	pub fn invalidate(&self, tag: Tag) {
		if tag == Tag::Image {
			self.inner.lock().stale = true;
		}

		debug!(?tag, project_id = %self.project, "cache tag invalidated");

		// Nobody listening is fine
		let _ = self.invalidations.send(tag);
	}

	/// Replaces the snapshot with the server's current collection.
	///
	/// On failure the previous snapshot stays in place, flagged stale, and the error is
	/// recorded for display. Nothing is retried.
	#[instrument(skip_all, fields(project_id = %self.project), err)]
	pub async fn fetch(&self) -> Result<Arc<ImageCollection>, zl_api::Error> {
		let ticket = {
			let mut inner = self.inner.lock();
			inner.fetches_started += 1;
			inner.fetches_started
		};

		let res = self.transport.fetch_collection(&self.project).await;

		let mut inner = self.inner.lock();

		match res {
			Ok(collection) => {
				// An older fetch resolving late must not clobber a newer one
				if ticket > inner.fetch_applied {
					inner.fetch_applied = ticket;
					inner.snapshot = Arc::new(collection);
					inner.loaded = true;

					// Leave the flags to a newer fetch, it may have failed
					if ticket == inner.fetches_started {
						inner.stale = false;
						inner.last_error = None;
					}

					debug!(
						images = inner.snapshot.images.len(),
						order = inner.snapshot.order.len(),
						"collection replaced"
					);
				} else {
					debug!(ticket, applied = inner.fetch_applied, "discarding outdated fetch");
				}

				Ok(Arc::clone(&inner.snapshot))
			}

			Err(e) => {
				warn!(?e, "failed to fetch collection, keeping stale snapshot");
				inner.stale = true;
				inner.last_error = Some(e.to_string());

				Err(e)
			}
		}
	}

	/// Fetches only when the snapshot is stale or was never loaded.
	pub async fn ensure_fresh(&self) -> Result<Arc<ImageCollection>, zl_api::Error> {
		let fresh = {
			let inner = self.inner.lock();
			(inner.loaded && !inner.stale).then(|| Arc::clone(&inner.snapshot))
		};

		match fresh {
			Some(snapshot) => Ok(snapshot),
			None => self.fetch().await,
		}
	}

	#[instrument(skip_all, fields(project_id = %self.project, count = files.len()))]
	pub async fn upload(&self, files: Vec<ImageUpload>) -> Result<Vec<ImageItem>, zl_api::Error> {
		let res = {
			let _guard = PendingGuard::new(&self.inner, Mutation::Upload);
			self.transport.upload(&self.project, files).await
		};

		self.settle(Mutation::Upload, res)
	}

	#[instrument(skip_all, fields(project_id = %self.project, image_id = %item))]
	pub async fn delete(&self, item: &ItemId) -> Result<(), zl_api::Error> {
		let res = {
			let _guard = PendingGuard::new(&self.inner, Mutation::Delete);
			self.transport.delete(&self.project, item).await
		};

		self.settle(Mutation::Delete, res)
	}

	/// Submits a full replacement ordering. The submitted order is never treated as the new
	/// canonical order, callers must refetch.
	#[instrument(skip_all, fields(project_id = %self.project, len = order.len()))]
	pub async fn reorder(&self, order: &[ItemId]) -> Result<(), zl_api::Error> {
		let res = {
			let _guard = PendingGuard::new(&self.inner, Mutation::Reorder);
			self.transport.reorder(&self.project, order).await
		};

		self.settle(Mutation::Reorder, res)
	}

	fn settle<O>(
		&self,
		mutation: Mutation,
		res: Result<O, zl_api::Error>,
	) -> Result<O, zl_api::Error> {
		if let Err(e) = &res {
			warn!(%mutation, ?e, "mutation failed");
		}

		for tag in mutation.invalidates(res.is_ok()) {
			self.invalidate(*tag);
		}

		res
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use async_trait::async_trait;
	use pretty_assertions::assert_eq;
	use tokio::sync::Notify;

	#[derive(Default)]
	struct Fixed {
		fail: bool,
		hold: Option<Arc<Notify>>,
	}

	#[async_trait]
	impl Transport for Fixed {
		async fn fetch_collection(
			&self,
			_project: &ProjectId,
		) -> Result<ImageCollection, zl_api::Error> {
			if self.fail {
				return Err(zl_api::Error::Status {
					status: 500,
					body: "boom".to_string(),
				});
			}

			Ok(ImageCollection {
				images: vec![ImageItem {
					id: ItemId::from("a"),
					name: "a.png".to_string(),
					width: 1,
					height: 1,
				}],
				order: vec![ItemId::from("a")],
			})
		}

		async fn upload(
			&self,
			_project: &ProjectId,
			_files: Vec<ImageUpload>,
		) -> Result<Vec<ImageItem>, zl_api::Error> {
			if let Some(hold) = &self.hold {
				hold.notified().await;
			}

			if self.fail {
				Err(zl_api::Error::Rejected)
			} else {
				Ok(vec![])
			}
		}

		async fn delete(&self, _project: &ProjectId, _item: &ItemId) -> Result<(), zl_api::Error> {
			Err(zl_api::Error::Rejected)
		}

		async fn reorder(
			&self,
			_project: &ProjectId,
			_order: &[ItemId],
		) -> Result<(), zl_api::Error> {
			if self.fail {
				Err(zl_api::Error::Rejected)
			} else {
				Ok(())
			}
		}
	}

	/// First fetch waits for `release` and succeeds, every later one fails.
	struct Staggered {
		fetches: std::sync::atomic::AtomicUsize,
		release: Arc<Notify>,
	}

	#[async_trait]
	impl Transport for Staggered {
		async fn fetch_collection(
			&self,
			project: &ProjectId,
		) -> Result<ImageCollection, zl_api::Error> {
			use std::sync::atomic::Ordering;

			if self.fetches.fetch_add(1, Ordering::SeqCst) > 0 {
				return Err(zl_api::Error::Status {
					status: 503,
					body: "unavailable".to_string(),
				});
			}

			self.release.notified().await;
			Fixed::default().fetch_collection(project).await
		}

		async fn upload(
			&self,
			_project: &ProjectId,
			_files: Vec<ImageUpload>,
		) -> Result<Vec<ImageItem>, zl_api::Error> {
			Err(zl_api::Error::Rejected)
		}

		async fn delete(&self, _project: &ProjectId, _item: &ItemId) -> Result<(), zl_api::Error> {
			Err(zl_api::Error::Rejected)
		}

		async fn reorder(
			&self,
			_project: &ProjectId,
			_order: &[ItemId],
		) -> Result<(), zl_api::Error> {
			Err(zl_api::Error::Rejected)
		}
	}

	fn cache(transport: Fixed) -> CollectionCache<Fixed> {
		CollectionCache::new(Arc::new(transport), ProjectId::from("p1"))
	}

	#[tokio::test]
	async fn fetch_replaces_snapshot() {
		let cache = cache(Fixed::default());
		assert!(cache.is_stale());
		assert!(!cache.is_loaded());

		let snapshot = cache.fetch().await.unwrap();

		assert_eq!(snapshot.order, vec![ItemId::from("a")]);
		assert!(!cache.is_stale());
		assert!(cache.is_loaded());
		assert_eq!(cache.last_error(), None);
	}

	#[tokio::test]
	async fn failed_fetch_keeps_previous_snapshot() {
		let cache = cache(Fixed {
			fail: true,
			..Default::default()
		});

		assert!(cache.fetch().await.is_err());

		assert!(cache.snapshot().images.is_empty());
		assert!(cache.is_stale());
		assert!(cache
			.last_error()
			.is_some_and(|message| message.contains("500")));
	}

	#[tokio::test]
	async fn ensure_fresh_only_fetches_when_stale() {
		let cache = cache(Fixed::default());

		let first = cache.ensure_fresh().await.unwrap();
		let second = cache.ensure_fresh().await.unwrap();
		assert!(Arc::ptr_eq(&first, &second));

		cache.invalidate(Tag::Image);
		let third = cache.ensure_fresh().await.unwrap();
		assert!(!Arc::ptr_eq(&second, &third));
	}

	#[tokio::test]
	async fn failed_delete_still_invalidates() {
		let cache = cache(Fixed::default());
		cache.fetch().await.unwrap();
		let mut rx = cache.subscribe();

		assert!(cache.delete(&ItemId::from("a")).await.is_err());

		assert!(cache.is_stale());
		assert_eq!(rx.try_recv().unwrap(), Tag::Image);
	}

	#[tokio::test]
	async fn failed_reorder_keeps_cache_fresh() {
		let cache = cache(Fixed {
			fail: true,
			..Default::default()
		});
		cache.inner.lock().stale = false;
		let mut rx = cache.subscribe();

		assert!(cache.reorder(&[ItemId::from("a")]).await.is_err());

		assert!(!cache.is_stale());
		assert!(rx.try_recv().is_err());
	}

	#[tokio::test]
	async fn pending_flag_tracks_in_flight_upload() {
		let hold = Arc::new(Notify::new());
		let cache = cache(Fixed {
			hold: Some(Arc::clone(&hold)),
			..Default::default()
		});

		let upload = tokio::spawn({
			let cache = cache.clone();
			async move { cache.upload(vec![ImageUpload::png("a.png", vec![1])]).await }
		});

		tokio::task::yield_now().await;
		while !cache.pending().upload {
			tokio::task::yield_now().await;
		}
		assert!(!cache.pending().reorder);

		hold.notify_one();
		upload.await.unwrap().unwrap();

		assert_eq!(cache.pending(), PendingRequests::default());
	}

	#[tokio::test]
	async fn abandoned_request_lowers_its_flag() {
		let hold = Arc::new(Notify::new());
		let cache = cache(Fixed {
			hold: Some(hold),
			..Default::default()
		});

		let upload = tokio::spawn({
			let cache = cache.clone();
			async move { cache.upload(vec![]).await }
		});

		while !cache.pending().upload {
			tokio::task::yield_now().await;
		}

		upload.abort();
		assert!(upload.await.unwrap_err().is_cancelled());

		assert!(!cache.pending().upload);
	}

	#[tokio::test]
	async fn late_success_does_not_hide_a_newer_failure() {
		let release = Arc::new(Notify::new());
		let cache = CollectionCache::new(
			Arc::new(Staggered {
				fetches: std::sync::atomic::AtomicUsize::new(0),
				release: Arc::clone(&release),
			}),
			ProjectId::from("p1"),
		);

		let older = tokio::spawn({
			let cache = cache.clone();
			async move { cache.fetch().await }
		});

		while cache.transport.fetches.load(std::sync::atomic::Ordering::SeqCst) == 0 {
			tokio::task::yield_now().await;
		}

		assert!(cache.fetch().await.is_err());

		release.notify_one();
		older.await.unwrap().unwrap();

		assert!(cache.is_loaded());
		assert_eq!(cache.snapshot().order, vec![ItemId::from("a")]);
		assert!(cache.is_stale());
		assert!(cache
			.last_error()
			.is_some_and(|message| message.contains("503")));
	}
}
