mod args;

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use serde::Serialize;
use tracing::warn;
use zl_api::{ImageItem, ImageUpload, ItemId, ProjectId, RequestConfig};
use zl_tray::{move_by_drag, ImageTray, Transition};

use crate::util::prelude::*;

use self::args::*;

#[derive(Subcommand, Debug)]
pub enum ImageCmd {
	/// List a project's images in display order
	List(ImageListArgs),
	/// Upload PNG images
	Upload(ImageUploadArgs),
	/// Delete an image
	Delete(ImageDeleteArgs),
	/// Move an image one position up or down
	Move(ImageMoveArgs),
	/// Move an image to another position
	Drag(ImageDragArgs),
	/// Put images in the given order
	Reorder(ImageReorderArgs),
}

pub async fn run(ctx: &Context, cmd: ImageCmd) -> Result<()> {
	match cmd {
		ImageCmd::List(args) => {
			let tray = loaded_tray(ctx, &args.project).await?;
			let out = tray.display_order();

			if args.urls && matches!(ctx.format, OutputFormat::Human) {
				for image in &out {
					let url = zl_api::image::url(&ctx.api, tray.project(), &image.id)?;
					println!("{} {url}", image.id);
				}
			} else {
				print_output!(ctx, &out, |images: &Vec<ImageItem>| print_images(images));
			}
		}
		ImageCmd::Upload(args) => {
			let files = read_pngs(&args.files).await?;
			if files.is_empty() {
				bail!("Nothing to upload, only PNG files are accepted");
			}

			let tray = loaded_tray(ctx, &args.project).await?;
			let uploaded = tray.upload(files).await?;

			print_output!(ctx, &uploaded, |images: &Vec<ImageItem>| {
				println!("Uploaded {} image(s)", images.len());
				println!();
				print_images(&tray.display_order());
			});
		}
		ImageCmd::Delete(args) => {
			let tray = loaded_tray(ctx, &args.project).await?;
			let deleted = ItemId::from(args.image.as_str());
			tray.delete(&deleted).await?;

			let out = ImageDeleteOutput {
				deleted,
				images: tray.display_order(),
			};
			print_output!(ctx, &out, |o: &ImageDeleteOutput| {
				println!("Deleted image {}", o.deleted);
				println!();
				print_images(&o.images);
			});
		}
		ImageCmd::Move(args) => {
			let tray = loaded_tray(ctx, &args.project).await?;
			let index = to_index(&tray, args.position)?;

			if let Transition::Unchanged = tray.move_by_offset(index, args.direction.into())? {
				println!("Image is already at the edge, nothing to move");
				return Ok(());
			}

			commit_and_print(ctx, &tray).await?;
		}
		ImageCmd::Drag(args) => {
			let tray = loaded_tray(ctx, &args.project).await?;
			let from = to_index(&tray, args.from)?;
			let to = to_index(&tray, args.to)?;

			tray.drag_start(from)?;
			tray.drop_on(to)?;

			commit_and_print(ctx, &tray).await?;
		}
		ImageCmd::Reorder(args) => {
			let tray = loaded_tray(ctx, &args.project).await?;
			let wanted = args
				.images
				.iter()
				.map(|id| ItemId::from(id.as_str()))
				.collect::<Vec<_>>();

			for (from, to) in drags_towards(&tray.display_ids(), &wanted)? {
				tray.move_by_drag(Some(from), Some(to))?;
			}

			commit_and_print(ctx, &tray).await?;
		}
	}

	Ok(())
}

#[derive(Debug, Serialize)]
struct ImageDeleteOutput {
	deleted: ItemId,
	/// Remaining images, in display order
	images: Vec<ImageItem>,
}

async fn loaded_tray(ctx: &Context, project: &str) -> Result<ImageTray<RequestConfig>> {
	let tray = ctx.tray(ProjectId::from(project));
	tray.load().await?;
	Ok(tray)
}

async fn commit_and_print(ctx: &Context, tray: &ImageTray<RequestConfig>) -> Result<()> {
	let committed = tray.commit().await?;
	let out = tray.display_order();

	print_output!(ctx, &out, |images: &Vec<ImageItem>| {
		if !committed {
			println!("Order unchanged");
		}
		print_images(images);
	});

	Ok(())
}

/// Converts a 1-based position from the command line into an index of the displayed order
fn to_index(tray: &ImageTray<RequestConfig>, position: usize) -> Result<usize> {
	let len = tray.display_order().len();

	match position.checked_sub(1) {
		Some(index) if index < len => Ok(index),
		_ => bail!("Position {position} is out of range, the project has {len} image(s)"),
	}
}

async fn read_pngs(paths: &[PathBuf]) -> Result<Vec<ImageUpload>> {
	let mut files = Vec::with_capacity(paths.len());

	for path in paths {
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.with_context(|| format!("Not a file: {}", path.display()))?;

		let mut upload = ImageUpload {
			file_name,
			content_type: None,
			bytes: Vec::new(),
		};

		if !upload.is_png() {
			warn!(path = %path.display(), "skipping non-png file");
			continue;
		}

		upload.bytes = tokio::fs::read(path)
			.await
			.with_context(|| format!("Failed to read {}", path.display()))?;
		upload.content_type = Some("image/png".to_string());

		files.push(upload);
	}

	Ok(files)
}

/// Plans the drags that bring `wanted` to the front of `current`, in order.
///
/// Ids missing from `current`, or listed twice, are an error.
fn drags_towards(current: &[ItemId], wanted: &[ItemId]) -> Result<Vec<(usize, usize)>> {
	let mut order = current.to_vec();
	let mut drags = Vec::new();

	for (to, id) in wanted.iter().enumerate() {
		let Some(from) = order.iter().position(|candidate| candidate == id) else {
			bail!("Image {id} is not in this project");
		};

		if from < to {
			bail!("Image {id} is listed more than once");
		}

		if from != to {
			order = move_by_drag(&order, Some(from), Some(to));
			drags.push((from, to));
		}
	}

	Ok(drags)
}

#[cfg(test)]
mod tests {
	use super::*;

	use pretty_assertions::assert_eq;

	fn ids(raw: &[&str]) -> Vec<ItemId> {
		raw.iter().copied().map(ItemId::from).collect()
	}

	fn apply(current: &[ItemId], drags: &[(usize, usize)]) -> Vec<ItemId> {
		drags.iter().fold(current.to_vec(), |order, &(from, to)| {
			move_by_drag(&order, Some(from), Some(to))
		})
	}

	#[test]
	fn drags_produce_the_wanted_prefix() {
		let current = ids(&["a", "b", "c", "d"]);
		let wanted = ids(&["d", "b"]);

		let drags = drags_towards(&current, &wanted).unwrap();

		assert_eq!(apply(&current, &drags), ids(&["d", "b", "a", "c"]));
	}

	#[test]
	fn already_ordered_needs_no_drags() {
		let current = ids(&["a", "b", "c"]);

		assert_eq!(drags_towards(&current, &current).unwrap(), vec![]);
	}

	#[test]
	fn unknown_and_repeated_ids_are_rejected() {
		let current = ids(&["a", "b"]);

		assert!(drags_towards(&current, &ids(&["z"])).is_err());
		assert!(drags_towards(&current, &ids(&["b", "b"])).is_err());
	}

	#[test]
	fn delete_output_serializes_for_json_format() {
		let out = ImageDeleteOutput {
			deleted: ItemId::from("b"),
			images: vec![ImageItem {
				id: ItemId::from("a"),
				name: "a.png".to_string(),
				width: 600,
				height: 800,
			}],
		};

		let json = serde_json::to_value(&out).unwrap();

		assert_eq!(
			json,
			serde_json::json!({
				"deleted": "b",
				"images": [{ "id": "a", "name": "a.png", "width": 600, "height": 800 }],
			})
		);
	}
}
