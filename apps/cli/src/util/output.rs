use anyhow::Result;
use serde::Serialize;
use zl_api::ImageItem;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

/// One numbered line per image, the way the tray lists them
pub fn print_images(images: &[ImageItem]) {
	if images.is_empty() {
		println!("No images");
		return;
	}

	for (i, image) in images.iter().enumerate() {
		println!(
			"{:02}  {}  {}x{}  {}",
			i + 1,
			image.id,
			image.width,
			image.height,
			image.name
		);
	}
}
