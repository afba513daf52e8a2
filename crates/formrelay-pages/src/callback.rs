//! Callback types for caller-supplied hooks.
//!
//! `validate`, `on_success` and `on_error` are stored as [`Callback`]s so a
//! [`SubmissionConfig`](crate::config::SubmissionConfig) can be cloned into
//! each spawned submission attempt without copying the closures.
//!
//! ## Example
//!
//! ```ignore
//! use formrelay_pages::{Callback, FormHandle, SubmitResponse};
//!
//! let validate = Callback::new(|form: FormHandle| {
//!     form.field_value("email").is_some_and(|v| v.contains('@'))
//! });
//!
//! let on_success = Callback::new(|response: SubmitResponse| {
//!     info_log!("Relay accepted submission with status {}", response.status);
//! });
//! ```

use std::sync::Arc;

/// A type-safe, cloneable callback wrapper.
///
/// `Callback` wraps a function in an `Arc`, making it cheaply cloneable.
///
/// ## Type Parameters
///
/// - `Args`: The argument type the callback receives
/// - `Ret`: The return type of the callback (defaults to `()`)
// Callback struct with conditional Send + Sync bounds for non-WASM targets
#[cfg(target_arch = "wasm32")]
pub struct Callback<Args, Ret = ()> {
	inner: Arc<dyn Fn(Args) -> Ret + 'static>,
}

/// A type-safe, cloneable callback wrapper (native version).
///
/// See the WASM version for full documentation.
/// This version requires `Send + Sync` bounds so submission attempts can run
/// on a multi-threaded tokio runtime.
#[cfg(not(target_arch = "wasm32"))]
pub struct Callback<Args, Ret = ()> {
	inner: Arc<dyn Fn(Args) -> Ret + Send + Sync + 'static>,
}

// WASM implementation without Send + Sync bounds
#[cfg(target_arch = "wasm32")]
impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

// Non-WASM implementation with Send + Sync bounds
#[cfg(not(target_arch = "wasm32"))]
impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}
