//! Task spawning for submission attempts.
//!
//! Each triggering event runs its network round trip as an independent
//! task. On WASM that is `spawn_local` on the browser event loop. On native
//! targets it is `tokio::spawn` on the ambient runtime; without one the
//! future is handed back to the caller instead of panicking.

use std::future::Future;

/// Spawns `future` on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn_task<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

/// Spawns `future` on the current tokio runtime.
///
/// Returns the future unchanged in `Err` when called outside a runtime.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_task<F>(future: F) -> Result<tokio::task::JoinHandle<()>, F>
where
	F: Future<Output = ()> + Send + 'static,
{
	match tokio::runtime::Handle::try_current() {
		Ok(handle) => Ok(handle.spawn(future)),
		Err(_) => Err(future),
	}
}
