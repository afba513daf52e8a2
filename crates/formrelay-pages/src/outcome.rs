//! Submission outcomes and the per-attempt state machine.
//!
//! ```text
//! Idle ──▶ Validating ──┬──▶ Rejected
//!                       └──▶ Submitting ──┬──▶ Succeeded
//!                                         └──▶ Failed
//! ```
//!
//! Each triggering event starts a fresh attempt in `Idle`; nothing is
//! carried between attempts.

use crate::transport::{SubmitError, SubmitResponse};

/// Why an attempt stopped before reaching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
	/// The validation gate returned `false`.
	Validation,
	/// Neither a submit URL nor a relay key is configured.
	MissingEndpoint,
}

/// What `on_error` receives.
///
/// A non-success HTTP response and a transport error share the same hook;
/// the variant tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
	/// The server answered with a non-2xx status.
	Response(SubmitResponse),
	/// The request could not be completed.
	Error(SubmitError),
}

impl Failure {
	/// The response, when the server answered.
	pub fn response(&self) -> Option<&SubmitResponse> {
		match self {
			Self::Response(response) => Some(response),
			Self::Error(_) => None,
		}
	}

	/// The error, when the request did not complete.
	pub fn error(&self) -> Option<&SubmitError> {
		match self {
			Self::Response(_) => None,
			Self::Error(error) => Some(error),
		}
	}
}

impl std::fmt::Display for Failure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Response(response) => {
				write!(f, "Submission failed with status {}", response.status)
			}
			Self::Error(error) => write!(f, "{}", error),
		}
	}
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// Stopped before any network activity.
	Rejected(Rejection),
	/// The server answered with a 2xx status.
	Succeeded(SubmitResponse),
	/// The server answered with another status, or the request failed.
	Failed(Failure),
}

impl Outcome {
	/// Terminal state reached by this outcome.
	pub fn state(&self) -> AttemptState {
		match self {
			Self::Rejected(_) => AttemptState::Rejected,
			Self::Succeeded(_) => AttemptState::Succeeded,
			Self::Failed(_) => AttemptState::Failed,
		}
	}

	/// Whether the attempt got past validation and endpoint resolution.
	pub fn passed_preflight(&self) -> bool {
		!matches!(self, Self::Rejected(_))
	}
}

/// State of a single submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptState {
	/// Fresh attempt, nothing done yet.
	Idle,
	/// Running the validation gate.
	Validating,
	/// Stopped before the network.
	Rejected,
	/// Waiting for the response.
	Submitting,
	/// Answered with a 2xx status.
	Succeeded,
	/// Answered with another status, or the request failed.
	Failed,
}

impl AttemptState {
	/// Whether `next` directly follows `self`.
	pub fn can_transition_to(self, next: AttemptState) -> bool {
		use AttemptState::*;

		matches!(
			(self, next),
			(Idle, Validating)
				| (Validating, Rejected)
				| (Validating, Submitting)
				| (Submitting, Succeeded)
				| (Submitting, Failed)
		)
	}

	/// Whether the attempt is finished.
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Rejected | Self::Succeeded | Self::Failed)
	}
}
