use serde::Deserialize;

use crate::{send_json, Error, RequestConfig};

#[derive(Deserialize)]
struct Response {
	#[serde(default)]
	ok: bool,
}

/// Returns whether the backend reports itself healthy.
pub async fn check(config: &RequestConfig) -> Result<bool, Error> {
	let Response { ok } = send_json(config.client.get(config.url(&["health"])?)).await?;

	Ok(ok)
}
