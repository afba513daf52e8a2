//! # Formrelay
//!
//! Bind HTML forms to JSON endpoints from Rust and WebAssembly.
//!
//! A bound form never performs the browser's native submission. Each submit
//! runs an optional validation gate, POSTs the configured payload as JSON to
//! an explicit URL or to the FormSubmit relay (`https://formsubmit.co/ajax/<key>`),
//! and hands the result to `on_success` or `on_error`.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - Form submission binder
//! - `debug-hooks` - Log attempt state transitions in debug builds
//! - `web-sys-full` - Full web-sys feature set for embedding applications
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use formrelay::prelude::*;
//!
//! let submitter = FormSubmitter::global().expect("no document");
//! submitter.bind(
//!     "contact",
//!     SubmissionConfig::new()
//!         .with_key("abc123")
//!         .with_field("email", "a@b.com")
//!         .on_error(Callback::new(|failure: Failure| {
//!             formrelay::pages::error_log!("{}", failure);
//!         })),
//! )?;
//! ```

#[cfg(feature = "pages")]
pub mod pages;

/// Commonly used types.
#[cfg(feature = "pages")]
pub mod prelude {
	#[cfg(target_arch = "wasm32")]
	pub use crate::pages::bind;
	pub use crate::pages::{
		BindError, Callback, Diagnostic, Diagnostics, Document, Failure, FormHandle,
		FormSubmitter, Outcome, Rejection, SubmissionConfig, SubmissionSettings, SubmitError,
		SubmitResponse, Transport,
	};
}
