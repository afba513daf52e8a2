//! Form submission binder
//!
//! This module provides access to formrelay-pages, which binds HTML forms to
//! JSON endpoints or the FormSubmit relay from Rust and WebAssembly.
//!
//! ## Architecture
//!
//! - **Binder**: looks forms up by ID and attaches one submit listener each
//! - **Transport**: POSTs the configured payload as JSON (reqwest)
//! - **Diagnostics**: reports every attempt milestone to an injectable sink
//!
//! ## Example
//!
//! ```rust,ignore
//! use formrelay::pages::{Callback, Document, FormSubmitter, SubmissionConfig};
//!
//! let document = Document::new();
//! let form = document.insert_form("contact");
//!
//! FormSubmitter::new(document).bind(
//!     "contact",
//!     SubmissionConfig::new()
//!         .with_key("abc123")
//!         .with_field("email", "a@b.com"),
//! )?;
//!
//! form.dispatch_submit().settled().await;
//! ```

// Re-export all formrelay-pages functionality
pub use formrelay_pages::*;
