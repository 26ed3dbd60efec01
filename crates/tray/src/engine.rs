//! Draft order reconciliation for a single tray.
//!
//! [`TrayState`] holds the only mutable pieces of a tray view: the optional draft ordering laid
//! over the cache's canonical order, and the index of the item being dragged. Every change goes
//! through [`TrayState::reduce`], which reads the current [`ImageCollection`] but never mutates
//! it.
//!
//! ```text
//!   Clean ──move/drag──▶ Editing ──BeginCommit──▶ Committing
//!     ▲                    ▲  │                     │    │
//!     │                    │  └────Invalidate───┐   │    │
//!     │                    └───CommitFailed─────┼───┘    │
//!     └──────────CommitSucceeded / Invalidate───┴────────┘
//! ```

use std::collections::HashSet;

use tracing::debug;
use zl_api::{ImageCollection, ImageItem, ItemId};

use crate::{
	order::{self, Direction},
	Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// No draft, the canonical order is displayed.
	Clean,
	/// A local reordering exists and hasn't been submitted.
	Editing,
	/// A reorder request is in flight. The draft is still what gets displayed.
	Committing,
}

/// Value snapshot of a draft handed to the transport by a commit. It is given back to
/// [`TrayState::reduce`] with the request's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTicket {
	order: Vec<ItemId>,
	revision: u64,
	epoch: u64,
}

impl CommitTicket {
	#[must_use]
	pub fn order(&self) -> &[ItemId] {
		&self.order
	}
}

#[derive(Debug)]
pub enum Action {
	MoveByOffset { index: usize, direction: Direction },
	MoveByDrag { from: Option<usize>, to: Option<usize> },
	DragStart { index: usize },
	/// The dragged item was released over `target`.
	Drop { target: usize },
	/// The gesture ended without a drop.
	DragEnd,
	BeginCommit,
	CommitSucceeded(CommitTicket),
	CommitFailed(CommitTicket),
	/// Discards the draft unconditionally.
	Invalidate,
	/// The collection was replaced by a fetch; drops draft entries that no longer exist.
	Prune,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
	Unchanged,
	DraftUpdated,
	/// The caller must send the ticket's order to the backend and report back.
	Submit(CommitTicket),
	/// The reorder was accepted, the collection must be refetched.
	Committed,
	/// The reorder failed, the draft is kept for a retry.
	Retained,
	Invalidated,
}

#[derive(Debug, Default)]
pub struct TrayState {
	draft: Option<Vec<ItemId>>,
	drag: Option<usize>,
	/// `(epoch, revision)` of the in-flight commit, forgotten on invalidation.
	committing: Option<(u64, u64)>,
	/// A reorder request is outstanding. Only its outcome lowers this, invalidation doesn't.
	submitted: bool,
	/// Bumped on every move that changes the draft.
	revision: u64,
	/// Bumped on every invalidation, outcomes from older epochs can't touch the draft.
	epoch: u64,
}

impl TrayState {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub const fn phase(&self) -> Phase {
		if self.committing.is_some() {
			Phase::Committing
		} else if self.draft.is_some() {
			Phase::Editing
		} else {
			Phase::Clean
		}
	}

	#[must_use]
	pub fn draft(&self) -> Option<&[ItemId]> {
		self.draft.as_deref()
	}

	#[must_use]
	pub const fn drag_index(&self) -> Option<usize> {
		self.drag
	}

	#[must_use]
	pub const fn has_pending_draft(&self) -> bool {
		self.draft.is_some()
	}

	#[must_use]
	pub const fn is_committing(&self) -> bool {
		self.committing.is_some()
	}

	/// Whether a reorder request is still awaiting its outcome, even one whose draft was
	/// since discarded.
	#[must_use]
	pub const fn has_request_in_flight(&self) -> bool {
		self.submitted
	}

	#[must_use]
	pub fn display_order<'a>(&self, collection: &'a ImageCollection) -> Vec<&'a ImageItem> {
		order::display_order(&collection.images, &collection.order, self.draft())
	}

	fn displayed_ids(&self, collection: &ImageCollection) -> Vec<ItemId> {
		self.display_order(collection)
			.into_iter()
			.map(|item| item.id.clone())
			.collect()
	}

	pub fn reduce(
		&mut self,
		collection: &ImageCollection,
		action: Action,
	) -> Result<Transition, Error> {
		let transition = match action {
			Action::MoveByOffset { index, direction } => {
				let current = self.displayed_ids(collection);
				let next = order::move_by_offset(&current, index, direction);
				self.replace_draft(&current, next)
			}

			Action::MoveByDrag { from, to } => {
				let current = self.displayed_ids(collection);
				let next = order::move_by_drag(&current, from, to);
				self.replace_draft(&current, next)
			}

			Action::DragStart { index } => {
				self.drag = Some(index);
				Transition::Unchanged
			}

			Action::Drop { target } => {
				let from = self.drag.take();
				let current = self.displayed_ids(collection);
				let next = order::move_by_drag(&current, from, Some(target));
				self.replace_draft(&current, next)
			}

			Action::DragEnd => {
				self.drag = None;
				Transition::Unchanged
			}

			Action::BeginCommit => return self.begin_commit(collection),

			Action::CommitSucceeded(ticket) => {
				self.submitted = false;
				if self.owns(&ticket) {
					self.committing = None;
					if self.revision == ticket.revision {
						self.draft = None;
					} else {
						debug!("draft changed while committing, keeping newer edits");
					}
				}
				Transition::Committed
			}

			Action::CommitFailed(ticket) => {
				self.submitted = false;
				if self.owns(&ticket) {
					self.committing = None;
					Transition::Retained
				} else {
					Transition::Unchanged
				}
			}

			Action::Invalidate => {
				self.draft = None;
				self.drag = None;
				self.committing = None;
				self.epoch += 1;
				Transition::Invalidated
			}

			Action::Prune => self.prune(collection),
		};

		debug!(?transition, phase = ?self.phase(), "tray state reduced");

		Ok(transition)
	}

	fn replace_draft(&mut self, current: &[ItemId], next: Vec<ItemId>) -> Transition {
		if next == current {
			return Transition::Unchanged;
		}

		self.draft = Some(next);
		self.revision += 1;

		Transition::DraftUpdated
	}

	fn begin_commit(&mut self, collection: &ImageCollection) -> Result<Transition, Error> {
		if self.committing.is_some() || self.submitted {
			debug!("commit already in flight");
			return Ok(Transition::Unchanged);
		}

		let Some(draft) = self.draft.as_ref().filter(|draft| !draft.is_empty()) else {
			return Ok(Transition::Unchanged);
		};

		let known = collection
			.images
			.iter()
			.map(|item| &item.id)
			.collect::<HashSet<_>>();

		let missing = draft
			.iter()
			.filter(|id| !known.contains(id))
			.cloned()
			.collect::<Vec<_>>();

		if !missing.is_empty() {
			return Err(Error::Consistency { missing });
		}

		let ticket = CommitTicket {
			order: draft.clone(),
			revision: self.revision,
			epoch: self.epoch,
		};

		self.committing = Some((ticket.epoch, ticket.revision));
		self.submitted = true;

		debug!(len = ticket.order.len(), "submitting draft order");

		Ok(Transition::Submit(ticket))
	}

	fn owns(&self, ticket: &CommitTicket) -> bool {
		self.committing == Some((ticket.epoch, ticket.revision))
	}

	fn prune(&mut self, collection: &ImageCollection) -> Transition {
		let known = collection
			.images
			.iter()
			.map(|item| &item.id)
			.collect::<HashSet<_>>();

		let mut transition = Transition::Unchanged;

		if let Some(draft) = self.draft.as_mut() {
			let before = draft.len();
			draft.retain(|id| known.contains(id));

			if draft.len() != before {
				transition = Transition::DraftUpdated;
			}
			if draft.is_empty() {
				self.draft = None;
			}
		}

		// Drag indices point into the displayed order, not the raw item set
		let shown = self.display_order(collection).len();
		if self.drag.is_some_and(|index| index >= shown) {
			self.drag = None;
		}

		transition
	}
}
