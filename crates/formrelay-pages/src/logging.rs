//! Logging macros shared by the binder and its diagnostics.
//!
//! On WASM the macros write to the browser console. On native targets they
//! emit `tracing` events under the `formrelay` target, so the host decides
//! where they go by installing a subscriber.
//!
//! | Macro | Condition | WASM | Non-WASM |
//! |-------|-----------|------|----------|
//! | `debug_log!` | `debug-hooks` + `debug_assertions` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | always | `console.info` | `tracing::info!` |
//! | `error_log!` | always | `console.error` | `tracing::error!` |
//!
//! Diagnostics are best-effort observability, not a stable contract. Code
//! that needs to assert on them should inject a
//! [`Diagnostics`](crate::diagnostics::Diagnostics) implementation instead
//! of capturing output.

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
pub use tracing as __tracing;

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub use web_sys as __web_sys;

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
///
/// Used for attempt state transitions. Compiles to a no-op otherwise.
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::debug!(target: "formrelay", "{}", format!($($arg)*));
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
///
/// # Example
///
/// ```ignore
/// info_log!("Form submitted successfully");
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::info!(target: "formrelay", "{}", format!($($arg)*));
	}};
}

/// Logs an error message
///
/// # Example
///
/// ```ignore
/// error_log!("Form with ID \"{}\" not found.", form_id);
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::error!(target: "formrelay", "{}", format!($($arg)*));
	}};
}
