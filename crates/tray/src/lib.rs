//!
//! # Image Tray
//!
//! Client side synchronization of a project's ordered image collection with the layout backend.
//!
//! The server owns the canonical order of a project's images. A tray lets the user reorder them
//! locally, by buttons or drag and drop, without touching the server until the new order is
//! committed. Two pieces cooperate:
//! - [`CollectionCache`] holds the last fetched `(images, order)` pair and performs uploads,
//!   deletes and reorders, marking itself stale after each one;
//! - [`TrayState`] owns the optional draft order laid over the canonical one and is only ever
//!   changed through its reducer, [`TrayState::reduce`].
//!
//! [`ImageTray`] ties both together for one project view. Any upload or delete, successful or
//! not, discards the draft, so a reorder can never be submitted for items that may be gone.
//!
//! ## Basic example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use zl_api::{ProjectId, RequestConfig};
//! use zl_tray::{Direction, ImageTray};
//!
//! # async fn run() -> Result<(), zl_tray::Error> {
//! let tray = ImageTray::new(Arc::new(RequestConfig::default()), ProjectId::from("zine"));
//! tray.load().await?;
//!
//! tray.move_by_offset(0, Direction::Down)?;
//! tray.drag_start(3)?;
//! tray.drop_on(1)?;
//!
//! assert!(tray.has_pending_draft());
//! tray.commit().await?;
//! # Ok(())
//! # }
//! ```

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod cache;
pub mod engine;
mod error;
pub mod order;
mod transport;
mod tray;

pub use cache::{CollectionCache, Mutation, PendingRequests, Tag};
pub use engine::{Action, CommitTicket, Phase, Transition, TrayState};
pub use error::Error;
pub use order::{display_order, move_by_drag, move_by_offset, Direction};
pub use transport::Transport;
pub use tray::ImageTray;
