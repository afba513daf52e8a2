//! Test doubles for the network and diagnostic boundaries.
//!
//! Available on both WASM and native targets.
//!
//! ```ignore
//! use formrelay_pages::testing::{MockTransport, RecordingDiagnostics};
//!
//! let transport = MockTransport::new();
//! transport.push_response(SubmitResponse::new(500, "boom"));
//! let diagnostics = RecordingDiagnostics::new();
//!
//! let submitter = FormSubmitter::new(document)
//!     .with_transport(transport.clone())
//!     .with_diagnostics(diagnostics.clone());
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::transport::{SubmitError, SubmitRequest, SubmitResponse, Transport};

#[derive(Debug)]
struct MockState {
	scripted: VecDeque<Result<SubmitResponse, SubmitError>>,
	fallback: Result<SubmitResponse, SubmitError>,
	requests: Vec<SubmitRequest>,
}

/// Scripted [`Transport`] recording every request.
///
/// Results pushed with [`push_response`](Self::push_response) and
/// [`push_error`](Self::push_error) are returned in order; once they run
/// out the fallback (`200 {}` by default) is returned. Clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
	state: Arc<Mutex<MockState>>,
}

impl Default for MockTransport {
	fn default() -> Self {
		Self::new()
	}
}

impl MockTransport {
	/// Creates a transport answering `200 {}`.
	pub fn new() -> Self {
		Self::with_fallback(Ok(SubmitResponse::new(200, "{}")))
	}

	/// Creates a transport answering `fallback` once scripted results run out.
	pub fn with_fallback(fallback: Result<SubmitResponse, SubmitError>) -> Self {
		Self {
			state: Arc::new(Mutex::new(MockState {
				scripted: VecDeque::new(),
				fallback,
				requests: Vec::new(),
			})),
		}
	}

	/// Queues a response.
	pub fn push_response(&self, response: SubmitResponse) {
		self.state.lock().scripted.push_back(Ok(response));
	}

	/// Queues a transport error.
	pub fn push_error(&self, error: SubmitError) {
		self.state.lock().scripted.push_back(Err(error));
	}

	/// Every request received so far.
	pub fn requests(&self) -> Vec<SubmitRequest> {
		self.state.lock().requests.clone()
	}

	/// Number of requests received.
	pub fn call_count(&self) -> usize {
		self.state.lock().requests.len()
	}

	/// The most recent request.
	pub fn last_request(&self) -> Option<SubmitRequest> {
		self.state.lock().requests.last().cloned()
	}
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for MockTransport {
	async fn post_json(&self, request: SubmitRequest) -> Result<SubmitResponse, SubmitError> {
		let url = request.url.clone();
		let result = {
			let mut state = self.state.lock();
			state.requests.push(request);
			match state.scripted.pop_front() {
				Some(result) => result,
				None => state.fallback.clone(),
			}
		};

		result.map(|response| {
			if response.url.is_empty() {
				response.with_url(url)
			} else {
				response
			}
		})
	}
}

/// [`Diagnostics`] sink keeping every diagnostic in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
	recorded: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingDiagnostics {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Diagnostics in report order.
	pub fn diagnostics(&self) -> Vec<Diagnostic> {
		self.recorded.lock().clone()
	}

	/// Rendered messages in report order.
	pub fn messages(&self) -> Vec<String> {
		self.recorded.lock().iter().map(ToString::to_string).collect()
	}

	/// Number of recorded diagnostics matching `predicate`.
	pub fn count(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
		self.recorded.lock().iter().filter(|d| predicate(d)).count()
	}

	/// Forgets everything recorded so far.
	pub fn clear(&self) {
		self.recorded.lock().clear();
	}
}

impl Diagnostics for RecordingDiagnostics {
	fn report(&self, diagnostic: &Diagnostic) {
		self.recorded.lock().push(diagnostic.clone());
	}
}
