//! Platform abstraction (unified bounds for WASM and native)
//!
//! Browser code runs on a single thread and handles JS values that are
//! neither `Send` nor `Sync`. Native code runs submission attempts on a
//! multi-threaded tokio runtime. [`MaybeSendSync`] lets the seams of this
//! crate state one bound that means the right thing on each target.

/// `Send + Sync` on native targets, no bound on WASM.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

/// `Send + Sync` on native targets, no bound on WASM.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}
