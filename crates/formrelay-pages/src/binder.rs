//! Form submission binder.
//!
//! [`FormSubmitter::bind`] looks a form up by ID and attaches one submit
//! listener to it. Every triggering event then runs one attempt:
//!
//! 1. suppress the native submission,
//! 2. run the validation gate, if any,
//! 3. resolve the endpoint,
//! 4. POST the payload as JSON,
//! 5. dispatch the response to `on_success` or `on_error`.
//!
//! Steps 1-3 run synchronously inside the listener. Steps 4-5 run on a
//! spawned task, so the listener returns immediately and overlapping
//! attempts proceed independently. There is no retry, timeout,
//! cancellation or de-duplication.
//!
//! ## Example
//!
//! ```ignore
//! use formrelay_pages::{Callback, FormSubmitter, SubmissionConfig};
//! use serde_json::json;
//!
//! let submitter = FormSubmitter::global().expect("no document");
//! submitter.bind(
//!     "contact",
//!     SubmissionConfig::new()
//!         .with_key("abc123")
//!         .with_field("email", json!("a@b.com"))
//!         .with_validate(Callback::new(|form: FormHandle| {
//!             form.field_value("email").is_some_and(|v| !v.is_empty())
//!         })),
//! )?;
//! ```

use std::sync::Arc;

use crate::config::{ConfigError, SubmissionConfig, SubmissionSettings};
use crate::{debug_log, error_log};
use crate::diagnostics::{ConsoleDiagnostics, Diagnostic, Diagnostics, SharedDiagnostics};
use crate::dom::{Document, FormHandle, FormRef, SubmitEvent, SubmitListener};
use crate::endpoint::resolve_endpoint;
use crate::outcome::{AttemptState, Failure, Outcome, Rejection};
use crate::spawn::spawn_task;
use crate::transport::{
	ReqwestTransport, SharedTransport, SubmitError, SubmitRequest, SubmitResponse, Transport,
};

/// Attribute holding JSON [`SubmissionSettings`] for declarative binding.
pub const SETTINGS_ATTRIBUTE: &str = "data-formrelay";

/// Errors returned by `bind`.
///
/// `FormNotFound` is also reported to the diagnostics sink and the other
/// variants are logged, so fire-and-forget callers may ignore the result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
	/// No form with the requested ID exists.
	#[error("Form with ID \"{form_id}\" not found")]
	FormNotFound {
		/// Requested form ID.
		form_id: String,
	},

	/// The platform refused the listener.
	#[error("Failed to attach submit listener to form \"{form_id}\": {reason}")]
	Listener {
		/// Form ID.
		form_id: String,
		/// Platform error.
		reason: String,
	},

	/// The declared settings of a form are invalid.
	#[error("Form \"{form_id}\" has invalid settings: {source}")]
	Config {
		/// Form ID.
		form_id: String,
		/// Parse error.
		#[source]
		source: ConfigError,
	},

	/// There is no document to look forms up in.
	#[error("No document available")]
	NoDocument,
}

/// Binds forms of one document to submission endpoints.
#[derive(Clone)]
pub struct FormSubmitter {
	document: Document,
	transport: SharedTransport,
	diagnostics: SharedDiagnostics,
}

impl std::fmt::Debug for FormSubmitter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormSubmitter")
			.field("document", &self.document)
			.finish_non_exhaustive()
	}
}

impl FormSubmitter {
	/// Creates a binder for `document` with the reqwest transport and
	/// console diagnostics.
	pub fn new(document: Document) -> Self {
		Self {
			document,
			transport: Arc::new(ReqwestTransport::new()),
			diagnostics: Arc::new(ConsoleDiagnostics),
		}
	}

	/// Creates a binder for the current window's document.
	#[cfg(target_arch = "wasm32")]
	pub fn global() -> Option<Self> {
		Document::global().map(Self::new)
	}

	/// Replaces the transport.
	pub fn with_transport(self, transport: impl Transport + 'static) -> Self {
		self.with_shared_transport(Arc::new(transport))
	}

	/// Replaces the transport with a shared one.
	pub fn with_shared_transport(mut self, transport: SharedTransport) -> Self {
		self.transport = transport;
		self
	}

	/// Replaces the diagnostics sink.
	pub fn with_diagnostics(self, diagnostics: impl Diagnostics + 'static) -> Self {
		self.with_shared_diagnostics(Arc::new(diagnostics))
	}

	/// Replaces the diagnostics sink with a shared one.
	pub fn with_shared_diagnostics(mut self, diagnostics: SharedDiagnostics) -> Self {
		self.diagnostics = diagnostics;
		self
	}

	/// The document forms are looked up in.
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Binds the form `form_id` with `config`.
	///
	/// On success exactly one submit listener is attached; it stays attached
	/// for the lifetime of the form. When the form does not exist nothing is
	/// attached, `FormNotFound` is reported and returned.
	pub fn bind(&self, form_id: &str, config: SubmissionConfig) -> Result<(), BindError> {
		let form = self.lookup(form_id)?;
		self.attach(form, config)
	}

	/// Binds the form `form_id` using the JSON settings in its
	/// `data-formrelay` attribute.
	///
	/// `hooks` supplies the callbacks; its endpoint and payload are replaced
	/// by the declared settings. A form without the attribute binds with
	/// `hooks` unchanged.
	pub fn bind_declared(&self, form_id: &str, hooks: SubmissionConfig) -> Result<(), BindError> {
		let form = self.lookup(form_id)?;

		let config = match form.attribute(SETTINGS_ATTRIBUTE) {
			Some(text) => {
				let settings = SubmissionSettings::from_json(&text).map_err(|source| {
					let err = BindError::Config {
						form_id: form_id.to_string(),
						source,
					};
					error_log!("{}", err);
					err
				})?;
				merge_hooks(SubmissionConfig::from_settings(settings), hooks)
			}
			None => hooks,
		};

		self.attach(form, config)
	}

	fn lookup(&self, form_id: &str) -> Result<FormHandle, BindError> {
		self.document.form_by_id(form_id).ok_or_else(|| {
			self.diagnostics.report(&Diagnostic::FormNotFound {
				form_id: form_id.to_string(),
			});
			BindError::FormNotFound {
				form_id: form_id.to_string(),
			}
		})
	}

	fn attach(&self, form: FormHandle, config: SubmissionConfig) -> Result<(), BindError> {
		let interceptor = SubmissionInterceptor::new(
			form.clone(),
			config,
			self.transport.clone(),
			self.diagnostics.clone(),
		);
		form.add_submit_listener(interceptor.into_listener())
			.inspect_err(|err| error_log!("{}", err))
	}
}

fn merge_hooks(mut declared: SubmissionConfig, hooks: SubmissionConfig) -> SubmissionConfig {
	declared.validate = hooks.validate;
	declared.on_success = hooks.on_success;
	declared.on_error = hooks.on_error;
	declared
}

/// Binds `form_id` in the current window's document with default
/// transport and diagnostics.
#[cfg(target_arch = "wasm32")]
pub fn bind(form_id: &str, config: SubmissionConfig) -> Result<(), BindError> {
	match FormSubmitter::global() {
		Some(submitter) => submitter.bind(form_id, config),
		None => {
			error_log!("No document available; form \"{}\" was not bound.", form_id);
			Err(BindError::NoDocument)
		}
	}
}

/// Runs submission attempts for one bound form.
///
/// Usually created by [`FormSubmitter::bind`]; also usable directly to
/// drive the protocol without a submit event.
///
/// The interceptor does not keep its form alive. Once the form is gone a
/// configured validation gate cannot run and attempts are rejected.
#[derive(Clone)]
pub struct SubmissionInterceptor {
	form: FormRef,
	form_id: String,
	config: Arc<SubmissionConfig>,
	transport: SharedTransport,
	diagnostics: SharedDiagnostics,
}

impl std::fmt::Debug for SubmissionInterceptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SubmissionInterceptor")
			.field("form_id", &self.form_id)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

impl SubmissionInterceptor {
	/// Creates an interceptor for `form`.
	pub fn new(
		form: FormHandle,
		config: SubmissionConfig,
		transport: SharedTransport,
		diagnostics: SharedDiagnostics,
	) -> Self {
		Self {
			form: form.downgrade(),
			form_id: form.id(),
			config: Arc::new(config),
			transport,
			diagnostics,
		}
	}

	/// ID of the bound form.
	pub fn form_id(&self) -> &str {
		&self.form_id
	}

	/// Handles one triggering event.
	///
	/// Suppresses the native submission first, runs the synchronous
	/// preflight, then spawns the network round trip.
	pub fn handle(&self, event: &SubmitEvent) {
		event.prevent_default();

		let Ok(endpoint) = self.preflight() else {
			return;
		};

		self.spawn_attempt(event, endpoint);
	}

	#[cfg(target_arch = "wasm32")]
	fn spawn_attempt(&self, _event: &SubmitEvent, endpoint: String) {
		let interceptor = self.clone();
		spawn_task(async move {
			interceptor.submit(endpoint).await;
		});
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn spawn_attempt(&self, event: &SubmitEvent, endpoint: String) {
		let interceptor = self.clone();
		let attempt = async move {
			interceptor.submit(endpoint).await;
		};

		match spawn_task(attempt) {
			Ok(handle) => event.track(handle),
			Err(_) => {
				self.dispatch(Err(SubmitError::Runtime(
					"no tokio runtime is running".to_string(),
				)));
			}
		}
	}

	/// Runs a whole attempt to completion and returns its outcome.
	pub async fn run(&self) -> Outcome {
		match self.preflight() {
			Ok(endpoint) => self.submit(endpoint).await,
			Err(rejection) => Outcome::Rejected(rejection),
		}
	}

	/// Validates the form and resolves the endpoint.
	///
	/// Rejections are reported to diagnostics; `on_error` is not called.
	pub fn preflight(&self) -> Result<String, Rejection> {
		self.transition(AttemptState::Idle, AttemptState::Validating);

		if let Some(validate) = &self.config.validate
			&& !self.form.upgrade().is_some_and(|form| validate.call(form))
		{
			self.diagnostics.report(&Diagnostic::ValidationFailed {
				form_id: self.form_id.clone(),
			});
			self.transition(AttemptState::Validating, AttemptState::Rejected);
			return Err(Rejection::Validation);
		}

		match resolve_endpoint(&self.config) {
			Ok(endpoint) => {
				self.transition(AttemptState::Validating, AttemptState::Submitting);
				Ok(endpoint)
			}
			Err(_) => {
				self.diagnostics.report(&Diagnostic::MissingEndpoint {
					form_id: self.form_id.clone(),
				});
				self.transition(AttemptState::Validating, AttemptState::Rejected);
				Err(Rejection::MissingEndpoint)
			}
		}
	}

	/// Sends the payload to `endpoint` and dispatches the result.
	pub async fn submit(&self, endpoint: String) -> Outcome {
		let result = match self.request(endpoint) {
			Ok(request) => self.transport.post_json(request).await,
			Err(err) => Err(err),
		};
		self.dispatch(result)
	}

	fn request(&self, endpoint: String) -> Result<SubmitRequest, SubmitError> {
		match &self.config.data_source {
			Some(_) => SubmitRequest::json(endpoint, &self.config.payload()?),
			None => SubmitRequest::json(endpoint, &self.config.data),
		}
	}

	fn dispatch(&self, result: Result<SubmitResponse, SubmitError>) -> Outcome {
		match result {
			Ok(response) if response.ok() => {
				self.diagnostics.report(&Diagnostic::Submitted {
					form_id: self.form_id.clone(),
					status: response.status,
				});
				self.transition(AttemptState::Submitting, AttemptState::Succeeded);
				if let Some(on_success) = &self.config.on_success {
					on_success.call(response.clone());
				}
				Outcome::Succeeded(response)
			}
			Ok(response) => {
				self.diagnostics.report(&Diagnostic::SubmissionFailed {
					form_id: self.form_id.clone(),
					status: response.status,
				});
				self.fail(Failure::Response(response))
			}
			Err(error) => {
				self.diagnostics.report(&Diagnostic::Error {
					form_id: self.form_id.clone(),
					error: error.clone(),
				});
				self.fail(Failure::Error(error))
			}
		}
	}

	fn fail(&self, failure: Failure) -> Outcome {
		self.transition(AttemptState::Submitting, AttemptState::Failed);
		if let Some(on_error) = &self.config.on_error {
			on_error.call(failure.clone());
		}
		Outcome::Failed(failure)
	}

	fn transition(&self, from: AttemptState, to: AttemptState) {
		debug_assert!(from.can_transition_to(to));
		debug_log!("Form \"{}\": {:?} -> {:?}", self.form_id, from, to);
	}

	#[cfg(target_arch = "wasm32")]
	fn into_listener(self) -> SubmitListener {
		Box::new(move |event: &SubmitEvent| self.handle(event))
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn into_listener(self) -> SubmitListener {
		Arc::new(move |event: &SubmitEvent| self.handle(event))
	}
}
