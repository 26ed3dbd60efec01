//! Pure index algebra over orderings of item identifiers.
//!
//! Nothing here owns state: every function takes an ordering and hands back a new one, leaving
//! the input untouched. Out of range or degenerate requests return the input unchanged, they're
//! never errors.

use std::collections::{HashMap, HashSet};

use zl_api::{ImageItem, ItemId};

/// Direction of a single-step move, as issued by the up/down buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Up,
	Down,
}

impl Direction {
	#[must_use]
	pub const fn offset(self) -> isize {
		match self {
			Self::Up => -1,
			Self::Down => 1,
		}
	}
}

/// Resolves the ordering that should be shown: `draft` when present, `canonical` otherwise.
///
/// Identifiers missing from `items` are dropped, as are repeated identifiers (first occurrence
/// wins), so the result is always a duplicate free subset of `items`.
#[must_use]
pub fn display_order<'a>(
	items: &'a [ImageItem],
	canonical: &[ItemId],
	draft: Option<&[ItemId]>,
) -> Vec<&'a ImageItem> {
	if items.is_empty() {
		return Vec::new();
	}

	let by_id = items
		.iter()
		.map(|item| (&item.id, item))
		.collect::<HashMap<_, _>>();

	let order = draft.unwrap_or(canonical);
	let mut seen = HashSet::with_capacity(order.len());

	order
		.iter()
		.filter(|id| seen.insert(*id))
		.filter_map(|id| by_id.get(id).copied())
		.collect()
}

/// Swaps the element at `index` with its neighbour in `direction`.
#[must_use]
pub fn move_by_offset<T: Clone>(order: &[T], index: usize, direction: Direction) -> Vec<T> {
	let mut next = order.to_vec();

	if let Some(target) = index.checked_add_signed(direction.offset()) {
		if index < next.len() && target < next.len() {
			next.swap(index, target);
		}
	}

	next
}

/// Removes the element at `from` and reinserts it at `to`, shifting everything in between by
/// one. A `to` past the end of the shortened list appends.
#[must_use]
pub fn move_by_drag<T: Clone>(order: &[T], from: Option<usize>, to: Option<usize>) -> Vec<T> {
	let mut next = order.to_vec();

	let (Some(from), Some(to)) = (from, to) else {
		return next;
	};

	if from == to || from >= next.len() {
		return next;
	}

	let moved = next.remove(from);
	let to = to.min(next.len());
	next.insert(to, moved);

	next
}
