#![allow(dead_code)]

use std::{
	collections::HashSet,
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use zl_api::{ImageCollection, ImageItem, ImageUpload, ItemId, ProjectId};
use zl_tray::{ImageTray, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
	Fetch,
	Upload,
	Delete,
	Reorder,
}

#[derive(Default)]
struct Server {
	images: Vec<ImageItem>,
	order: Vec<ItemId>,
	uploaded: usize,
}

/// In-memory stand-in for the layout backend, with the same validation rules for reorders.
#[derive(Default)]
pub struct Backend {
	server: Mutex<Server>,
	fail_next: Mutex<HashSet<Op>>,
	hold_reorder: Mutex<Option<Arc<Notify>>>,
	/// Order the server keeps after an accepted reorder, instead of the submitted one.
	arbitrated_order: Mutex<Option<Vec<ItemId>>>,
	pub reorders: Mutex<Vec<Vec<ItemId>>>,
	pub uploads: AtomicUsize,
	pub fetches: AtomicUsize,
}

pub fn item(id: &str) -> ImageItem {
	ImageItem {
		id: ItemId::from(id),
		name: format!("{id}.png"),
		width: 600,
		height: 800,
	}
}

pub fn ids(ids: &[&str]) -> Vec<ItemId> {
	ids.iter().copied().map(ItemId::from).collect()
}

fn status(status: u16, body: &str) -> zl_api::Error {
	zl_api::Error::Status {
		status,
		body: body.to_string(),
	}
}

impl Backend {
	pub fn with(images: &[&str], order: &[&str]) -> Arc<Self> {
		let backend = Self::default();
		{
			let mut server = backend.server.lock();
			server.images = images.iter().copied().map(item).collect();
			server.order = ids(order);
		}
		Arc::new(backend)
	}

	pub fn fail_next(&self, op: Op) {
		self.fail_next.lock().insert(op);
	}

	/// Makes reorders wait until the returned gate is notified.
	pub fn hold_reorders(&self) -> Arc<Notify> {
		let gate = Arc::new(Notify::new());
		*self.hold_reorder.lock() = Some(Arc::clone(&gate));
		gate
	}

	pub fn arbitrate_order(&self, order: &[&str]) {
		*self.arbitrated_order.lock() = Some(ids(order));
	}

	pub fn set_order(&self, order: &[&str]) {
		self.server.lock().order = ids(order);
	}

	pub fn remove_behind_the_clients_back(&self, id: &str) {
		let mut server = self.server.lock();
		server.images.retain(|item| item.id.as_str() != id);
		server.order.retain(|other| other.as_str() != id);
	}

	pub fn order(&self) -> Vec<ItemId> {
		self.server.lock().order.clone()
	}

	fn should_fail(&self, op: Op) -> bool {
		self.fail_next.lock().remove(&op)
	}
}

#[async_trait]
impl Transport for Backend {
	async fn fetch_collection(&self, _project: &ProjectId) -> Result<ImageCollection, zl_api::Error> {
		self.fetches.fetch_add(1, Ordering::SeqCst);

		if self.should_fail(Op::Fetch) {
			return Err(status(503, "backend unavailable"));
		}

		let server = self.server.lock();
		Ok(ImageCollection {
			images: server.images.clone(),
			order: server.order.clone(),
		})
	}

	async fn upload(
		&self,
		_project: &ProjectId,
		files: Vec<ImageUpload>,
	) -> Result<Vec<ImageItem>, zl_api::Error> {
		self.uploads.fetch_add(1, Ordering::SeqCst);

		if self.should_fail(Op::Upload) {
			return Err(status(400, "invalid multipart form"));
		}

		let mut server = self.server.lock();
		let mut saved = Vec::with_capacity(files.len());

		for _ in files {
			server.uploaded += 1;
			let new = item(&format!("new-{}", server.uploaded));
			server.order.push(new.id.clone());
			server.images.push(new.clone());
			saved.push(new);
		}

		Ok(saved)
	}

	async fn delete(&self, _project: &ProjectId, id: &ItemId) -> Result<(), zl_api::Error> {
		if self.should_fail(Op::Delete) {
			return Err(status(500, "disk full"));
		}

		let mut server = self.server.lock();
		let before = server.images.len();
		server.images.retain(|item| &item.id != id);
		server.order.retain(|other| other != id);

		if server.images.len() == before {
			return Err(status(404, "no such image"));
		}

		Ok(())
	}

	async fn reorder(&self, _project: &ProjectId, order: &[ItemId]) -> Result<(), zl_api::Error> {
		self.reorders.lock().push(order.to_vec());

		let gate = self.hold_reorder.lock().clone();
		if let Some(gate) = gate {
			gate.notified().await;
		}

		if self.should_fail(Op::Reorder) {
			return Err(status(502, "bad gateway"));
		}

		let mut server = self.server.lock();

		if order.len() != server.images.len() {
			return Err(status(400, "order length mismatch"));
		}

		if let Some(unknown) = order
			.iter()
			.find(|id| !server.images.iter().any(|item| &item.id == *id))
		{
			return Err(status(400, &format!("unknown image in order: {unknown}")));
		}

		server.order = self
			.arbitrated_order
			.lock()
			.take()
			.unwrap_or_else(|| order.to_vec());

		Ok(())
	}
}

pub async fn loaded_tray(backend: &Arc<Backend>) -> ImageTray<Backend> {
	let tray = ImageTray::new(Arc::clone(backend), ProjectId::from("zine"));
	tray.load().await.unwrap();
	tray
}

/// Yields to other tasks until `cond` holds.
pub async fn until(cond: impl Fn() -> bool) {
	tokio::time::timeout(Duration::from_secs(5), async {
		while !cond() {
			tokio::task::yield_now().await;
		}
	})
	.await
	.expect("condition never became true");
}
