//! Diagnostic boundary.
//!
//! Every notable event of a binding is reported as a [`Diagnostic`] to an
//! injectable [`Diagnostics`] sink. [`ConsoleDiagnostics`] forwards them to
//! the logging macros (browser console on WASM, `tracing` on native).
//! Tests inject [`RecordingDiagnostics`](crate::testing::RecordingDiagnostics)
//! and assert on the captured values.

use std::sync::Arc;

use crate::platform::MaybeSendSync;
use crate::transport::SubmitError;
use crate::{error_log, info_log};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
	/// Normal operation.
	Info,
	/// A failure of the binding or of an attempt.
	Error,
}

/// An event worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
	/// `bind` was called with an ID that matches no form.
	FormNotFound {
		/// Requested form ID.
		form_id: String,
	},
	/// The validation gate rejected the form.
	ValidationFailed {
		/// Bound form ID.
		form_id: String,
	},
	/// Neither a submit URL nor a relay key is configured.
	MissingEndpoint {
		/// Bound form ID.
		form_id: String,
	},
	/// The server answered with a 2xx status.
	Submitted {
		/// Bound form ID.
		form_id: String,
		/// HTTP status.
		status: u16,
	},
	/// The server answered with a non-2xx status.
	SubmissionFailed {
		/// Bound form ID.
		form_id: String,
		/// HTTP status.
		status: u16,
	},
	/// The request could not be completed.
	Error {
		/// Bound form ID.
		form_id: String,
		/// What went wrong.
		error: SubmitError,
	},
}

impl Diagnostic {
	/// Severity of this diagnostic.
	pub fn level(&self) -> DiagnosticLevel {
		match self {
			Self::Submitted { .. } => DiagnosticLevel::Info,
			Self::FormNotFound { .. }
			| Self::ValidationFailed { .. }
			| Self::MissingEndpoint { .. }
			| Self::SubmissionFailed { .. }
			| Self::Error { .. } => DiagnosticLevel::Error,
		}
	}

	/// Form ID the diagnostic refers to.
	pub fn form_id(&self) -> &str {
		match self {
			Self::FormNotFound { form_id }
			| Self::ValidationFailed { form_id }
			| Self::MissingEndpoint { form_id }
			| Self::Submitted { form_id, .. }
			| Self::SubmissionFailed { form_id, .. }
			| Self::Error { form_id, .. } => form_id,
		}
	}
}

impl std::fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::FormNotFound { form_id } => write!(f, "Form with ID \"{}\" not found.", form_id),
			Self::ValidationFailed { .. } => write!(f, "Form validation failed."),
			Self::MissingEndpoint { .. } => write!(
				f,
				"Form submission skipped: no submit URL or relay key configured."
			),
			Self::Submitted { .. } => write!(f, "Form submitted successfully"),
			Self::SubmissionFailed { status, .. } => {
				write!(f, "Form submission failed (status {})", status)
			}
			Self::Error { error, .. } => write!(f, "An error occurred: {}", error),
		}
	}
}

/// Receives diagnostics.
pub trait Diagnostics: MaybeSendSync {
	/// Handles one diagnostic. Must not panic.
	fn report(&self, diagnostic: &Diagnostic);
}

/// Shared handle to a diagnostics sink.
pub type SharedDiagnostics = Arc<dyn Diagnostics>;

/// Writes diagnostics through the logging macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
	fn report(&self, diagnostic: &Diagnostic) {
		match diagnostic.level() {
			DiagnosticLevel::Info => info_log!("{}", diagnostic),
			DiagnosticLevel::Error => error_log!("{}", diagnostic),
		}
	}
}
