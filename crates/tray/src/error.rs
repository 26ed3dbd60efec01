use thiserror::Error;

use zl_api::ItemId;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Transport(#[from] zl_api::Error),
	#[error("draft order references {} image(s) that no longer exist", .missing.len())]
	Consistency { missing: Vec<ItemId> },
}
