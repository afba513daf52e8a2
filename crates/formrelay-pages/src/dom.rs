//! DOM boundary.
//!
//! The binder needs three things from the page: look up a form by ID,
//! attach one submit listener to it, and suppress the native submission
//! when the listener runs. On WASM these wrap `web_sys` types. On native
//! targets the same API is backed by an in-memory document, which server
//! side tooling and tests use to trigger submissions without a browser.
//!
//! The binder never creates, removes or otherwise mutates forms.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use parking_lot::Mutex;
#[cfg(not(target_arch = "wasm32"))]
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::{Arc, Weak};
#[cfg(not(target_arch = "wasm32"))]
use std::sync::atomic::{AtomicBool, Ordering};

use crate::binder::BindError;

/// Listener invoked once per triggering event.
#[cfg(target_arch = "wasm32")]
pub(crate) type SubmitListener = Box<dyn Fn(&SubmitEvent) + 'static>;

/// Listener invoked once per triggering event.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) type SubmitListener = Arc<dyn Fn(&SubmitEvent) + Send + Sync + 'static>;

// ============================================================================
// Document
// ============================================================================

/// The page forms are looked up in.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct Document {
	inner: web_sys::Document,
}

#[cfg(target_arch = "wasm32")]
impl Document {
	/// Returns the document of the current window, if any.
	pub fn global() -> Option<Self> {
		web_sys::window()?.document().map(Self::from_web_sys)
	}

	/// Wraps an existing `web_sys::Document`.
	pub fn from_web_sys(inner: web_sys::Document) -> Self {
		Self { inner }
	}

	/// Looks up a `<form>` by ID.
	///
	/// Elements with a matching ID that are not forms are ignored.
	pub fn form_by_id(&self, id: &str) -> Option<FormHandle> {
		self.inner
			.get_element_by_id(id)?
			.dyn_into::<web_sys::HtmlFormElement>()
			.ok()
			.map(FormHandle::from_element)
	}
}

/// In-memory page holding forms by ID (native version).
///
/// Cloning shares the same page.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default)]
pub struct Document {
	forms: Arc<Mutex<HashMap<String, FormHandle>>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Document {
	/// Creates an empty page.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a form with the given ID, returning the existing one if present.
	pub fn insert_form(&self, id: impl Into<String>) -> FormHandle {
		let id = id.into();
		self.forms
			.lock()
			.entry(id.clone())
			.or_insert_with(|| FormHandle::new(id))
			.clone()
	}

	/// Removes a form from the page.
	///
	/// Handles already held elsewhere keep working, like a detached DOM node.
	pub fn remove_form(&self, id: &str) -> Option<FormHandle> {
		self.forms.lock().remove(id)
	}

	/// Looks up a form by ID.
	pub fn form_by_id(&self, id: &str) -> Option<FormHandle> {
		self.forms.lock().get(id).cloned()
	}
}

// ============================================================================
// FormHandle
// ============================================================================

/// Reference to a form owned by the page.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct FormHandle {
	element: web_sys::HtmlFormElement,
}

#[cfg(target_arch = "wasm32")]
impl FormHandle {
	/// Wraps a form element.
	pub fn from_element(element: web_sys::HtmlFormElement) -> Self {
		Self { element }
	}

	/// The underlying element.
	pub fn element(&self) -> &web_sys::HtmlFormElement {
		&self.element
	}

	/// The form's `id` attribute.
	pub fn id(&self) -> String {
		self.element.id()
	}

	/// Reads an attribute of the form element.
	pub fn attribute(&self, name: &str) -> Option<String> {
		self.element.get_attribute(name)
	}

	/// Current value of the first control named `name`.
	///
	/// Supports `<input>`, `<textarea>` and `<select>`.
	pub fn field_value(&self, name: &str) -> Option<String> {
		let selector = format!("[name=\"{}\"]", name.replace('"', "\\\""));
		let control = self.element.query_selector(&selector).ok().flatten()?;

		if let Some(input) = control.dyn_ref::<web_sys::HtmlInputElement>() {
			return Some(input.value());
		}
		if let Some(textarea) = control.dyn_ref::<web_sys::HtmlTextAreaElement>() {
			return Some(textarea.value());
		}
		control
			.dyn_ref::<web_sys::HtmlSelectElement>()
			.map(|select| select.value())
	}

	/// Attaches a submit listener for the lifetime of the element.
	pub(crate) fn add_submit_listener(&self, listener: SubmitListener) -> Result<(), BindError> {
		let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
			listener(&SubmitEvent::from_web_sys(event));
		}) as Box<dyn FnMut(_)>);

		self.element
			.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
			.map_err(|err| BindError::Listener {
				form_id: self.id(),
				reason: format!("{:?}", err),
			})?;

		// The listener lives as long as the form
		closure.forget();
		Ok(())
	}

	pub(crate) fn downgrade(&self) -> FormRef {
		FormRef { form: self.clone() }
	}
}

/// Listener-side reference to a form.
///
/// The browser owns the element and the listener, so this is a plain handle.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub(crate) struct FormRef {
	form: FormHandle,
}

#[cfg(target_arch = "wasm32")]
impl FormRef {
	pub(crate) fn upgrade(&self) -> Option<FormHandle> {
		Some(self.form.clone())
	}
}

#[cfg(not(target_arch = "wasm32"))]
struct FormState {
	id: String,
	fields: Mutex<HashMap<String, String>>,
	attributes: Mutex<HashMap<String, String>>,
	listeners: Mutex<Vec<SubmitListener>>,
}

/// Reference to a form owned by the page (native version).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct FormHandle {
	state: Arc<FormState>,
}

#[cfg(not(target_arch = "wasm32"))]
impl std::fmt::Debug for FormHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormHandle")
			.field("id", &self.state.id)
			.field("listeners", &self.listener_count())
			.finish()
	}
}

#[cfg(not(target_arch = "wasm32"))]
impl FormHandle {
	/// Creates a detached form with the given ID.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			state: Arc::new(FormState {
				id: id.into(),
				fields: Mutex::new(HashMap::new()),
				attributes: Mutex::new(HashMap::new()),
				listeners: Mutex::new(Vec::new()),
			}),
		}
	}

	/// The form's ID.
	pub fn id(&self) -> String {
		self.state.id.clone()
	}

	/// Reads an attribute of the form.
	pub fn attribute(&self, name: &str) -> Option<String> {
		self.state.attributes.lock().get(name).cloned()
	}

	/// Sets an attribute of the form.
	pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
		self.state.attributes.lock().insert(name.into(), value.into());
	}

	/// Current value of the control named `name`.
	pub fn field_value(&self, name: &str) -> Option<String> {
		self.state.fields.lock().get(name).cloned()
	}

	/// Sets the value of the control named `name`.
	pub fn set_field(&self, name: impl Into<String>, value: impl Into<String>) {
		self.state.fields.lock().insert(name.into(), value.into());
	}

	/// Number of attached submit listeners.
	pub fn listener_count(&self) -> usize {
		self.state.listeners.lock().len()
	}

	/// Triggers a submit event, running every attached listener.
	///
	/// Listeners run synchronously; asynchronous work they spawn is tracked
	/// by the returned [`SubmitDispatch`].
	pub fn dispatch_submit(&self) -> SubmitDispatch {
		// Listeners run outside the lock so they may inspect the form
		let listeners: Vec<SubmitListener> = self.state.listeners.lock().clone();
		let event = SubmitEvent::new();

		for listener in &listeners {
			listener(&event);
		}

		SubmitDispatch {
			default_prevented: event.default_prevented(),
			tasks: event.tasks.into_inner(),
		}
	}

	pub(crate) fn add_submit_listener(&self, listener: SubmitListener) -> Result<(), BindError> {
		self.state.listeners.lock().push(listener);
		Ok(())
	}

	pub(crate) fn downgrade(&self) -> FormRef {
		FormRef {
			state: Arc::downgrade(&self.state),
		}
	}
}

/// Listener-side reference to a form (native version).
///
/// Listeners are stored inside the form, so they only hold a weak
/// reference; the form is freed once the page and all handles drop it.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub(crate) struct FormRef {
	state: Weak<FormState>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FormRef {
	pub(crate) fn upgrade(&self) -> Option<FormHandle> {
		self.state.upgrade().map(|state| FormHandle { state })
	}
}

// ============================================================================
// SubmitEvent
// ============================================================================

/// A triggering submit event.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct SubmitEvent {
	event: web_sys::Event,
}

#[cfg(target_arch = "wasm32")]
impl SubmitEvent {
	/// Wraps a DOM event.
	pub fn from_web_sys(event: web_sys::Event) -> Self {
		Self { event }
	}

	/// Suppresses the browser's native form submission.
	pub fn prevent_default(&self) {
		self.event.prevent_default();
	}

	/// Whether the native submission was suppressed.
	pub fn default_prevented(&self) -> bool {
		self.event.default_prevented()
	}
}

/// A triggering submit event (native version).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SubmitEvent {
	default_prevented: AtomicBool,
	tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl SubmitEvent {
	/// Creates a fresh event.
	pub fn new() -> Self {
		Self::default()
	}

	/// Suppresses the native form submission.
	pub fn prevent_default(&self) {
		self.default_prevented.store(true, Ordering::SeqCst);
	}

	/// Whether the native submission was suppressed.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.load(Ordering::SeqCst)
	}

	/// Records a task spawned while handling this event.
	pub(crate) fn track(&self, handle: tokio::task::JoinHandle<()>) {
		self.tasks.lock().push(handle);
	}
}

/// Result of [`FormHandle::dispatch_submit`].
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct SubmitDispatch {
	default_prevented: bool,
	tasks: Vec<tokio::task::JoinHandle<()>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl SubmitDispatch {
	/// Whether any listener suppressed the native submission.
	///
	/// When `false`, a browser would have navigated away.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented
	}

	/// Number of asynchronous attempts started by this event.
	pub fn pending_tasks(&self) -> usize {
		self.tasks.len()
	}

	/// Waits until every attempt started by this event has finished.
	pub async fn settled(self) {
		for task in self.tasks {
			// A panicking user callback only ends its own attempt
			let _ = task.await;
		}
	}
}
