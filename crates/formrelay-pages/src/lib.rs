//! Formrelay Pages - Form Submission Binder
//!
//! Binds an HTML form to a submission endpoint. On every submit the binder
//! suppresses the browser's native submission, runs an optional validation
//! gate, POSTs a configured JSON payload and reports the result to
//! `on_success` or `on_error`.
//!
//! The endpoint is either an explicit `submit_url` or the FormSubmit relay
//! (`https://formsubmit.co/ajax/<key>`) when only a relay key is given.
//!
//! ## Architecture
//!
//! - [`binder`]: form lookup, listener attachment and the per-attempt protocol
//! - [`config`]: submission configuration and declarative settings
//! - [`endpoint`]: endpoint resolution
//! - [`outcome`]: attempt states and outcomes
//! - [`transport`]: HTTP transport seam with a reqwest implementation
//! - [`diagnostics`]: human-readable reporting of attempt milestones
//! - [`dom`]: DOM boundary (web-sys on WASM, in-memory on native)
//! - [`testing`]: test doubles for the transport and diagnostics seams
//!
//! ## Example
//!
//! ```ignore
//! use formrelay_pages::{Callback, Failure, FormSubmitter, SubmissionConfig, SubmitResponse};
//! use serde_json::json;
//!
//! let submitter = FormSubmitter::global().expect("no document");
//! submitter.bind(
//!     "contact",
//!     SubmissionConfig::new()
//!         .with_key("abc123")
//!         .with_data(&json!({ "email": "a@b.com" }))?
//!         .on_success(Callback::new(|response: SubmitResponse| {
//!             formrelay_pages::info_log!("sent: {}", response.status);
//!         }))
//!         .on_error(Callback::new(|failure: Failure| {
//!             formrelay_pages::error_log!("failed: {}", failure);
//!         })),
//! )?;
//! ```
//!
//! From JavaScript the same binder is exposed as `easyFormSubmit(formID, options)`.

#![warn(missing_docs)]

// Core modules
pub mod callback;
pub mod logging;
pub mod platform;
pub mod spawn;

// Submission protocol
pub mod binder;
pub mod config;
pub mod endpoint;
pub mod outcome;

// Boundaries
pub mod diagnostics;
pub mod dom;
pub mod transport;

// JavaScript entry point
#[cfg(target_arch = "wasm32")]
pub mod js;

// Testing utilities (available on both WASM and native)
pub mod testing;

// Re-export commonly used types
#[cfg(target_arch = "wasm32")]
pub use binder::bind;
pub use binder::{BindError, FormSubmitter, SETTINGS_ATTRIBUTE, SubmissionInterceptor};
pub use callback::Callback;
pub use config::{ConfigError, DEFAULT_RELAY_BASE_URL, SubmissionConfig, SubmissionSettings};
pub use diagnostics::{
	ConsoleDiagnostics, Diagnostic, DiagnosticLevel, Diagnostics, SharedDiagnostics,
};
#[cfg(not(target_arch = "wasm32"))]
pub use dom::SubmitDispatch;
pub use dom::{Document, FormHandle, SubmitEvent};
pub use endpoint::{relay_endpoint, resolve_endpoint};
pub use outcome::{AttemptState, Failure, Outcome, Rejection};
pub use transport::{
	ReqwestTransport, SharedTransport, SubmitError, SubmitRequest, SubmitResponse, Transport,
};

// Logging macros are exported via #[macro_export]
// Users can access them as: formrelay_pages::info_log!, formrelay_pages::error_log!, etc.
