//! Typed client for the zine layout backend REST API.
//!
//! Every request function takes a [`RequestConfig`] holding the shared `reqwest` client and the
//! base API url. Responses are decoded into the wire types in [`types`]; any transport, status or
//! decoding failure surfaces as an [`Error`].

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

pub mod health;
pub mod image;
pub mod preset;
pub mod project;
pub mod render;
pub mod types;
pub mod validate;
pub mod yaml;

use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::trace;

pub use types::*;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid api url <url='{0}'>")]
	InvalidUrl(String),
	#[error("request failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("server responded with status {status}: {body}")]
	Status { status: u16, body: String },
	#[error("failed to decode response: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("server rejected the request")]
	Rejected,
}

#[derive(Debug, Clone)]
pub struct RequestConfig {
	pub client: reqwest::Client,
	pub api_url: String,
}

impl RequestConfig {
	pub fn new(api_url: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			api_url: api_url.into(),
		}
	}

	pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
		Ok(Self {
			client: reqwest::Client::builder().timeout(timeout).build()?,
			api_url: api_url.into(),
		})
	}

	/// Joins `segments` onto the api url, percent-encoding each one so ids can't escape their
	/// path segment.
	pub fn url(&self, segments: &[&str]) -> Result<Url, Error> {
		let mut url =
			Url::parse(&self.api_url).map_err(|_| Error::InvalidUrl(self.api_url.clone()))?;

		url.path_segments_mut()
			.map_err(|()| Error::InvalidUrl(self.api_url.clone()))?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}

impl Default for RequestConfig {
	fn default() -> Self {
		Self::new(DEFAULT_API_URL)
	}
}

#[derive(Deserialize)]
struct OkResponse {
	ok: bool,
}

async fn checked(req: RequestBuilder) -> Result<Response, Error> {
	let resp = req.send().await?;
	let status = resp.status();

	if !status.is_success() {
		let body = resp.text().await.unwrap_or_default();
		return Err(Error::Status {
			status: status.as_u16(),
			body: body.trim().to_string(),
		});
	}

	Ok(resp)
}

pub(crate) async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, Error> {
	let text = checked(req).await?.text().await?;
	trace!(len = text.len(), "decoding json response");
	serde_json::from_str(&text).map_err(Into::into)
}

pub(crate) async fn send_text(req: RequestBuilder) -> Result<String, Error> {
	Ok(checked(req).await?.text().await?)
}

/// Sends a request whose response is the backend's `{ "ok": bool }` acknowledgement.
pub(crate) async fn send_ok(req: RequestBuilder) -> Result<(), Error> {
	let OkResponse { ok } = send_json(req).await?;

	if ok {
		Ok(())
	} else {
		Err(Error::Rejected)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use pretty_assertions::assert_eq;

	#[test]
	fn url_joins_segments_onto_base_path() {
		let config = RequestConfig::new("http://localhost:8080/api");

		let url = config.url(&["projects", "p1", "images"]).unwrap();

		assert_eq!(url.as_str(), "http://localhost:8080/api/projects/p1/images");
	}

	#[test]
	fn url_tolerates_trailing_slash() {
		let config = RequestConfig::new("http://localhost:8080/api/");

		let url = config.url(&["presets"]).unwrap();

		assert_eq!(url.as_str(), "http://localhost:8080/api/presets");
	}

	#[test]
	fn url_encodes_ids() {
		let config = RequestConfig::default();

		let url = config.url(&["projects", "p1", "images", "a b/c.png"]).unwrap();

		assert_eq!(
			url.as_str(),
			"http://localhost:8080/api/projects/p1/images/a%20b%2Fc.png"
		);
	}

	#[test]
	fn invalid_base_is_reported() {
		let config = RequestConfig::new("not a url");

		assert!(matches!(config.url(&["health"]), Err(Error::InvalidUrl(_))));
	}
}
