use std::path::PathBuf;

use clap::{Args, ValueEnum};
use zl_tray::Direction;

#[derive(Args, Debug, Clone)]
pub struct ImageListArgs {
	/// Project ID
	pub project: String,
	/// Also print each image's address
	#[arg(long, default_value_t = false)]
	pub urls: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ImageUploadArgs {
	/// Project ID
	pub project: String,
	/// PNG files to upload, anything else is skipped
	#[arg(required = true)]
	pub files: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ImageDeleteArgs {
	/// Project ID
	pub project: String,
	/// Image ID
	pub image: String,
}

#[derive(Args, Debug, Clone)]
pub struct ImageMoveArgs {
	/// Project ID
	pub project: String,
	/// Position of the image, starting at 1
	pub position: usize,
	/// Which way to move it
	#[arg(value_enum)]
	pub direction: MoveDirection,
}

#[derive(Args, Debug, Clone)]
pub struct ImageDragArgs {
	/// Project ID
	pub project: String,
	/// Current position of the image, starting at 1
	pub from: usize,
	/// Position to drop it at, starting at 1
	pub to: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ImageReorderArgs {
	/// Project ID
	pub project: String,
	/// Image IDs in their new order; images left out keep their relative order after these
	#[arg(required = true)]
	pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoveDirection {
	Up,
	Down,
}

impl From<MoveDirection> for Direction {
	fn from(value: MoveDirection) -> Self {
		match value {
			MoveDirection::Up => Self::Up,
			MoveDirection::Down => Self::Down,
		}
	}
}
