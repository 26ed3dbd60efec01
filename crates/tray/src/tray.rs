use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};
use zl_api::{ImageCollection, ImageItem, ImageUpload, ItemId, ProjectId};

use crate::{
	cache::{CollectionCache, PendingRequests},
	engine::{Action, Phase, Transition, TrayState},
	order::Direction,
	Error, Transport,
};

/// One project's image tray: the collection cache plus the draft order laid over it.
///
/// Clones share the same state, so a view can keep issuing moves while one of them awaits a
/// request. State locks are never held across an `.await`; requests only ever see value
/// snapshots.
pub struct ImageTray<T> {
	cache: CollectionCache<T>,
	state: Arc<Mutex<TrayState>>,
}

impl<T> Clone for ImageTray<T> {
	fn clone(&self) -> Self {
		Self {
			cache: self.cache.clone(),
			state: Arc::clone(&self.state),
		}
	}
}

impl<T: Transport> ImageTray<T> {
	pub fn new(transport: Arc<T>, project: ProjectId) -> Self {
		Self {
			cache: CollectionCache::new(transport, project),
			state: Arc::new(Mutex::new(TrayState::new())),
		}
	}

	pub fn cache(&self) -> &CollectionCache<T> {
		&self.cache
	}

	pub fn project(&self) -> &ProjectId {
		self.cache.project()
	}

	fn dispatch(&self, action: Action) -> Result<Transition, Error> {
		let collection = self.cache.snapshot();
		self.state.lock().reduce(&collection, action)
	}

	/// Items in the order they should be shown right now.
	pub fn display_order(&self) -> Vec<ImageItem> {
		let collection = self.cache.snapshot();
		self.state
			.lock()
			.display_order(&collection)
			.into_iter()
			.cloned()
			.collect()
	}

	pub fn display_ids(&self) -> Vec<ItemId> {
		self.display_order().into_iter().map(|item| item.id).collect()
	}

	pub fn collection(&self) -> Arc<ImageCollection> {
		self.cache.snapshot()
	}

	pub fn phase(&self) -> Phase {
		self.state.lock().phase()
	}

	pub fn draft(&self) -> Option<Vec<ItemId>> {
		self.state.lock().draft().map(<[ItemId]>::to_vec)
	}

	pub fn drag_index(&self) -> Option<usize> {
		self.state.lock().drag_index()
	}

	pub fn has_pending_draft(&self) -> bool {
		self.state.lock().has_pending_draft()
	}

	pub fn is_committing(&self) -> bool {
		self.state.lock().is_committing()
	}

	/// Whether a reorder is still awaiting its outcome, including one whose draft was
	/// discarded by an invalidation in the meantime.
	pub fn has_request_in_flight(&self) -> bool {
		self.state.lock().has_request_in_flight() || self.cache.pending().reorder
	}

	pub fn pending(&self) -> PendingRequests {
		self.cache.pending()
	}

	pub fn is_stale(&self) -> bool {
		self.cache.is_stale()
	}

	pub fn last_error(&self) -> Option<String> {
		self.cache.last_error()
	}

	pub fn move_by_offset(&self, index: usize, direction: Direction) -> Result<Transition, Error> {
		self.dispatch(Action::MoveByOffset { index, direction })
	}

	pub fn move_by_drag(
		&self,
		from: Option<usize>,
		to: Option<usize>,
	) -> Result<Transition, Error> {
		self.dispatch(Action::MoveByDrag { from, to })
	}

	pub fn drag_start(&self, index: usize) -> Result<Transition, Error> {
		self.dispatch(Action::DragStart { index })
	}

	pub fn drag_end(&self) -> Result<Transition, Error> {
		self.dispatch(Action::DragEnd)
	}

	pub fn drop_on(&self, target: usize) -> Result<Transition, Error> {
		self.dispatch(Action::Drop { target })
	}

	/// Discards any draft, falling back to the canonical order.
	pub fn invalidate(&self) {
		// Invalidate never fails
		let _ = self.dispatch(Action::Invalidate);
	}

	/// Fetches the collection, keeping any draft (minus vanished items).
	#[instrument(skip_all, fields(project_id = %self.project()), err)]
	pub async fn load(&self) -> Result<(), Error> {
		self.cache.fetch().await?;
		self.dispatch(Action::Prune)?;

		Ok(())
	}

	/// Explicit refresh: drops the draft and refetches.
	pub async fn refresh(&self) -> Result<(), Error> {
		self.invalidate();
		self.load().await
	}

	/// Submits the draft as the new order.
	///
	/// Returns `Ok(false)` when there was nothing to submit or a reorder request is still
	/// outstanding, whether or not its draft survived.
	/// On success the collection is refetched before returning; the submitted order is never
	/// assumed to be what the server kept. On failure the draft stays in place for a retry.
	#[instrument(skip_all, fields(project_id = %self.project()), err)]
	pub async fn commit(&self) -> Result<bool, Error> {
		if !self.has_pending_draft() || self.has_request_in_flight() {
			return Ok(false);
		}

		// Never submit against a canonical view that's known to be outdated
		if self.cache.is_stale() {
			self.load().await?;
		}

		let Transition::Submit(ticket) = self.dispatch(Action::BeginCommit)? else {
			return Ok(false);
		};

		match self.cache.reorder(ticket.order()).await {
			Ok(()) => {
				self.dispatch(Action::CommitSucceeded(ticket))?;
				self.load().await?;

				debug!("draft order committed");

				Ok(true)
			}

			Err(e) => {
				warn!(?e, "failed to commit draft order, keeping it for a retry");
				self.dispatch(Action::CommitFailed(ticket))?;

				Err(e.into())
			}
		}
	}

	/// Uploads the PNG files among `files`; anything else is skipped.
	///
	/// The draft is discarded whatever the outcome, since the set of items may have changed.
	#[instrument(skip_all, fields(project_id = %self.project(), count = files.len()), err)]
	pub async fn upload(&self, files: Vec<ImageUpload>) -> Result<Vec<ImageItem>, Error> {
		let files = files
			.into_iter()
			.filter(ImageUpload::is_png)
			.collect::<Vec<_>>();

		if files.is_empty() {
			debug!("no png files to upload");
			return Ok(Vec::new());
		}

		let res = self.cache.upload(files).await;
		self.invalidate();

		let uploaded = res?;
		self.load().await?;

		Ok(uploaded)
	}

	/// Deletes one item. The draft is discarded whatever the outcome.
	#[instrument(skip_all, fields(project_id = %self.project(), image_id = %item), err)]
	pub async fn delete(&self, item: &ItemId) -> Result<(), Error> {
		let res = self.cache.delete(item).await;
		self.invalidate();

		res?;
		self.load().await
	}
}
