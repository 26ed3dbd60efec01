use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

/// Identifier of a project, assigned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProjectId(pub String);

/// Identifier of an image inside a project. Stable and unique within the project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub String);

macro_rules! impl_id {
	($($ty:ident),+) => {
		$(
			impl $ty {
				pub fn as_str(&self) -> &str {
					&self.0
				}
			}

			impl fmt::Display for $ty {
				fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
					f.write_str(&self.0)
				}
			}

			impl From<&str> for $ty {
				fn from(s: &str) -> Self {
					Self(s.to_string())
				}
			}

			impl From<String> for $ty {
				fn from(s: String) -> Self {
					Self(s)
				}
			}
		)+
	};
}

impl_id!(ProjectId, ItemId);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	pub id: ProjectId,
	pub name: String,
	pub created_at: String,
	pub updated_at: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub preset_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
	pub id: ItemId,
	pub name: String,
	pub width: u32,
	pub height: u32,
}

/// Full state of a project's image collection. `order` may transiently mention ids missing
/// from `images` when a delete races the fetch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCollection {
	#[serde(default)]
	pub images: Vec<ImageItem>,
	#[serde(default)]
	pub order: Vec<ItemId>,
}

/// A file to be sent as one `images[]` part of an upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
	pub file_name: String,
	pub content_type: Option<String>,
	pub bytes: Vec<u8>,
}

impl ImageUpload {
	pub fn png(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self {
			file_name: file_name.into(),
			content_type: Some("image/png".to_string()),
			bytes,
		}
	}

	pub fn is_png(&self) -> bool {
		self.content_type.as_deref() == Some("image/png")
			|| Path::new(&self.file_name)
				.extension()
				.is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
	}
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PresetInfo {
	pub id: String,
	pub name: String,
	pub filename: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
	pub count: u32,
	pub width: u32,
	pub height: u32,
	pub rows: u32,
	pub columns: u32,
	pub pages: u32,
	pub multiple: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
	pub ok: bool,
	#[serde(default)]
	pub issues: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<ValidationDetails>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderInfo {
	pub id: String,
	#[serde(default)]
	pub files: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
	pub test: bool,
	pub test_bw: bool,
	pub test_dimensions: String,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			test: false,
			test_bw: false,
			test_dimensions: "600px,800px".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use pretty_assertions::assert_eq;

	#[test]
	fn collection_decodes_backend_payload() {
		let json = r#"{
			"images": [{"id": "a.png", "name": "a.png", "width": 600, "height": 800}],
			"order": ["a.png", "gone.png"]
		}"#;

		let collection: ImageCollection = serde_json::from_str(json).unwrap();

		assert_eq!(collection.images[0].id, ItemId::from("a.png"));
		assert_eq!(collection.order.len(), 2);
	}

	#[test]
	fn project_uses_camel_case() {
		let json = r#"{"id":"p1","name":"Zine","createdAt":"t0","updatedAt":"t1"}"#;

		let project: Project = serde_json::from_str(json).unwrap();

		assert_eq!(project.preset_id, None);
		assert_eq!(project.updated_at, "t1");
	}

	#[test]
	fn png_detection_accepts_extension_or_mime() {
		assert!(ImageUpload::png("cover", vec![]).is_png());
		assert!(ImageUpload {
			file_name: "PAGE.PNG".to_string(),
			content_type: None,
			bytes: vec![],
		}
		.is_png());
		assert!(!ImageUpload {
			file_name: "page.jpg".to_string(),
			content_type: Some("image/jpeg".to_string()),
			bytes: vec![],
		}
		.is_png());
	}
}
