//! Network boundary: one JSON POST per submission attempt.
//!
//! The binder talks to the network through the [`Transport`] trait.
//! [`ReqwestTransport`] is the production implementation; reqwest uses the
//! browser fetch API on WASM and hyper on native targets, so the same code
//! path serves both. Tests substitute
//! [`MockTransport`](crate::testing::MockTransport).

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::platform::MaybeSendSync;

/// Media type used for both the request body and the accepted response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Errors raised while resolving, issuing or decoding a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
	/// Neither a submit URL nor a relay key is configured.
	#[error("No submission endpoint configured: set a submit URL or a relay key")]
	MissingEndpoint,

	/// The payload could not be encoded as JSON.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The request could not be sent or the response body could not be read.
	#[error("Network error: {0}")]
	Network(String),

	/// A response body did not match the requested type.
	#[error("Deserialization error: {0}")]
	Deserialization(String),

	/// No async runtime was available to run the attempt.
	#[error("Runtime error: {0}")]
	Runtime(String),
}

impl SubmitError {
	/// Create a network error
	pub fn network(msg: impl Into<String>) -> Self {
		Self::Network(msg.into())
	}

	/// Create a serialization error
	pub fn serialization(msg: impl Into<String>) -> Self {
		Self::Serialization(msg.into())
	}

	/// Create a deserialization error
	pub fn deserialization(msg: impl Into<String>) -> Self {
		Self::Deserialization(msg.into())
	}
}

/// A fully prepared submission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
	/// Target endpoint.
	pub url: String,
	/// Request headers, in insertion order.
	pub headers: Vec<(String, String)>,
	/// JSON-encoded body.
	pub body: String,
}

impl SubmitRequest {
	/// Builds a POST request carrying the JSON encoding of `data`.
	///
	/// Sets `Content-Type` and `Accept` to `application/json`.
	pub fn json<T: Serialize + ?Sized>(
		url: impl Into<String>,
		data: &T,
	) -> Result<Self, SubmitError> {
		let body =
			serde_json::to_string(data).map_err(|e| SubmitError::serialization(e.to_string()))?;

		Ok(Self {
			url: url.into(),
			headers: vec![
				("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
				("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
			],
			body,
		})
	}

	/// HTTP method of every submission.
	pub fn method(&self) -> &'static str {
		"POST"
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// The response handed to `on_success` / `on_error`.
///
/// The body is read eagerly so the response can be cloned into callbacks
/// and inspected more than once. The status alone decides which hook runs;
/// a body that could not be read completely is kept as far as it was read
/// and the read error is recorded in `body_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
	/// HTTP status code.
	pub status: u16,
	/// Final URL after redirects.
	pub url: String,
	/// Response headers.
	pub headers: Vec<(String, String)>,
	/// Response body as text.
	pub body: String,
	/// Why the body could not be read, if it could not.
	#[serde(default)]
	pub body_error: Option<String>,
}

impl SubmitResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			url: String::new(),
			headers: Vec::new(),
			body: body.into(),
			body_error: None,
		}
	}

	/// Sets the response URL.
	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = url.into();
		self
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Records a failed body read.
	pub fn with_body_error(mut self, error: impl Into<String>) -> Self {
		self.body_error = Some(error.into());
		self
	}

	/// Whether the body was read to the end.
	pub fn body_complete(&self) -> bool {
		self.body_error.is_none()
	}

	/// Whether the status is in the 2xx success range.
	pub fn ok(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Case-insensitive header lookup.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Decodes the body as JSON.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T, SubmitError> {
		serde_json::from_str(&self.body).map_err(|e| SubmitError::deserialization(e.to_string()))
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(key, _)| key.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}

/// Sends submission requests.
///
/// Implementations must not retry, time out or de-duplicate: each call maps
/// to exactly one request that runs until the network layer resolves it.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: MaybeSendSync {
	/// Sends `request` and returns the response, whatever its status.
	///
	/// Only transport-level failures are errors; a 4xx or 5xx response is
	/// `Ok`.
	async fn post_json(&self, request: SubmitRequest) -> Result<SubmitResponse, SubmitError>;
}

/// Shared handle to a transport.
pub type SharedTransport = Arc<dyn Transport>;

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	/// Creates a transport with a default client.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a transport reusing an existing client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for ReqwestTransport {
	async fn post_json(&self, request: SubmitRequest) -> Result<SubmitResponse, SubmitError> {
		let mut builder = self.client.post(&request.url);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let response = builder
			.body(request.body)
			.send()
			.await
			.map_err(|e| SubmitError::network(e.to_string()))?;

		let status = response.status().as_u16();
		let url = response.url().to_string();
		let headers = response
			.headers()
			.iter()
			.map(|(name, value)| {
				(
					name.as_str().to_string(),
					String::from_utf8_lossy(value.as_bytes()).into_owned(),
				)
			})
			.collect();
		// The status is already known; a broken body must not turn it into an error
		let (body, body_error) = match response.text().await {
			Ok(body) => (body, None),
			Err(e) => (String::new(), Some(e.to_string())),
		};

		Ok(SubmitResponse {
			status,
			url,
			headers,
			body,
			body_error,
		})
	}
}
