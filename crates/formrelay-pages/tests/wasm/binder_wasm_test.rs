//! Form Binder WASM Tests
//!
//! Binds real `<form>` elements in the browser and dispatches submit
//! events through the DOM.
//!
//! **Test Categories:**
//! - Lookup against the live document
//! - Suppression of the native submission
//! - Successful submission through a DOM event
//! - JavaScript options conversion
//! - JavaScript callbacks and payloads
//! - `easyFormSubmit` entry point
//!
//! **Run with**: `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use formrelay_pages::js::{config_from_js, easy_form_submit};
use formrelay_pages::testing::{MockTransport, RecordingDiagnostics};
use formrelay_pages::{
	BindError, Callback, Document, FormHandle, FormSubmitter, SubmissionConfig, SubmitError,
	SubmitResponse,
};
use js_sys::{Function, Object, Promise, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

// ============================================================================
// Test Fixtures
// ============================================================================

/// Appends a `<form>` with the given ID to the body
fn mount_form(id: &str) -> web_sys::HtmlFormElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let form = document
		.create_element("form")
		.unwrap()
		.dyn_into::<web_sys::HtmlFormElement>()
		.unwrap();
	form.set_id(id);
	document.body().unwrap().append_child(&form).unwrap();
	form
}

/// Dispatches a cancelable submit event and returns it
fn submit(form: &web_sys::HtmlFormElement) -> web_sys::Event {
	let init = web_sys::EventInit::new();
	init.set_cancelable(true);
	let event = web_sys::Event::new_with_event_init_dict("submit", &init).unwrap();
	form.dispatch_event(&event).unwrap();
	event
}

fn submitter(transport: &MockTransport, diagnostics: &RecordingDiagnostics) -> FormSubmitter {
	FormSubmitter::new(Document::global().unwrap())
		.with_transport(transport.clone())
		.with_diagnostics(diagnostics.clone())
}

/// Resolves once a macrotask has run, after spawned attempts have settled
async fn next_tick() {
	let promise = Promise::new(&mut |resolve, _| {
		web_sys::window()
			.unwrap()
			.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
			.unwrap();
	});
	JsFuture::from(promise).await.unwrap();
}

/// A JS function recording the argument of every call
fn recorder() -> (Function, Rc<RefCell<Vec<JsValue>>>) {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let function = Closure::wrap(Box::new({
		let calls = calls.clone();
		move |value: JsValue| calls.borrow_mut().push(value)
	}) as Box<dyn FnMut(JsValue)>)
	.into_js_value()
	.unchecked_into::<Function>();
	(function, calls)
}

/// Builds a JS options object
fn options(entries: &[(&str, JsValue)]) -> JsValue {
	let options = Object::new();
	for (name, value) in entries {
		Reflect::set(&options, &JsValue::from_str(name), value).unwrap();
	}
	options.into()
}

fn property(target: &JsValue, name: &str) -> JsValue {
	Reflect::get(target, &JsValue::from_str(name)).unwrap()
}

// ============================================================================
// Lookup
// ============================================================================

/// Binding an unknown ID reports it and attaches nothing
#[wasm_bindgen_test]
fn test_bind_unknown_form() {
	let diagnostics = RecordingDiagnostics::new();

	let result = submitter(&MockTransport::new(), &diagnostics)
		.bind("wasm-missing", SubmissionConfig::new().with_key("abc123"));

	assert!(matches!(result, Err(BindError::FormNotFound { .. })));
	assert_eq!(
		diagnostics.messages(),
		vec!["Form with ID \"wasm-missing\" not found."]
	);
}

/// A non-form element with the ID is not bound
#[wasm_bindgen_test]
fn test_bind_non_form_element() {
	let document = web_sys::window().unwrap().document().unwrap();
	let div = document.create_element("div").unwrap();
	div.set_id("wasm-div");
	document.body().unwrap().append_child(&div).unwrap();

	let result = submitter(&MockTransport::new(), &RecordingDiagnostics::new())
		.bind("wasm-div", SubmissionConfig::new().with_key("abc123"));

	assert!(matches!(result, Err(BindError::FormNotFound { .. })));
}

// ============================================================================
// Native Submission Suppression
// ============================================================================

/// A rejected attempt still suppresses the navigation
#[wasm_bindgen_test]
fn test_submit_rejected_by_validation() {
	let form = mount_form("wasm-validate");
	let transport = MockTransport::new();
	let diagnostics = RecordingDiagnostics::new();
	let config = SubmissionConfig::new()
		.with_key("abc123")
		.with_validate(Callback::new(|form: FormHandle| {
			form.field_value("email").is_some()
		}));
	submitter(&transport, &diagnostics)
		.bind("wasm-validate", config)
		.unwrap();

	let event = submit(&form);

	assert!(event.default_prevented());
	assert_eq!(transport.call_count(), 0);
	assert_eq!(diagnostics.messages(), vec!["Form validation failed."]);
}

/// Missing endpoint rejections are reported per attempt
#[wasm_bindgen_test]
fn test_submit_without_endpoint() {
	let form = mount_form("wasm-no-endpoint");
	let transport = MockTransport::new();
	let diagnostics = RecordingDiagnostics::new();
	submitter(&transport, &diagnostics)
		.bind("wasm-no-endpoint", SubmissionConfig::new())
		.unwrap();

	assert!(submit(&form).default_prevented());
	assert!(submit(&form).default_prevented());

	assert_eq!(transport.call_count(), 0);
	assert_eq!(diagnostics.diagnostics().len(), 2);
}

// ============================================================================
// Successful Submission
// ============================================================================

/// A DOM submit event posts the fields and reaches on_success
#[wasm_bindgen_test]
async fn test_submit_event_reaches_on_success() {
	let form = mount_form("wasm-success");
	let transport = MockTransport::new();
	let diagnostics = RecordingDiagnostics::new();
	let statuses = Rc::new(RefCell::new(Vec::new()));
	let config = SubmissionConfig::new()
		.with_key("abc123")
		.with_field("email", "a@b.com")
		.on_success(Callback::new({
			let statuses = statuses.clone();
			move |response: SubmitResponse| statuses.borrow_mut().push(response.status)
		}));
	submitter(&transport, &diagnostics)
		.bind("wasm-success", config)
		.unwrap();

	let event = submit(&form);
	next_tick().await;

	assert!(event.default_prevented());
	let request = transport.last_request().unwrap();
	assert_eq!(request.url, "https://formsubmit.co/ajax/abc123");
	assert_eq!(request.body, r#"{"email":"a@b.com"}"#);
	assert_eq!(*statuses.borrow(), vec![200]);
	assert_eq!(diagnostics.messages(), vec!["Form submitted successfully"]);
}

// ============================================================================
// JavaScript Options
// ============================================================================

/// JS options map onto the endpoint and payload of a submission
#[wasm_bindgen_test]
async fn test_config_from_js_options() {
	let form = mount_form("wasm-js-options");
	let data = Object::new();
	Reflect::set(&data, &"email".into(), &"a@b.com".into()).unwrap();
	let options = options(&[("key", "abc123".into()), ("data", data.into())]);

	let config = config_from_js(&options);
	assert_eq!(config.key(), Some("abc123"));
	assert_eq!(config.submit_url(), None);

	let transport = MockTransport::new();
	submitter(&transport, &RecordingDiagnostics::new())
		.bind("wasm-js-options", config)
		.unwrap();
	submit(&form);
	next_tick().await;

	let request = transport.last_request().unwrap();
	assert_eq!(request.url, "https://formsubmit.co/ajax/abc123");
	assert_eq!(request.body, r#"{"email":"a@b.com"}"#);
}

/// Missing options produce an empty config
#[wasm_bindgen_test]
fn test_config_from_js_undefined() {
	let config = config_from_js(&JsValue::UNDEFINED);

	assert_eq!(config.key(), None);
	assert!(config.data().is_empty());
	assert!(!config.has_validate());
}

/// Binds `id` with JS options built around `validate_body`, submits once and
/// returns the transport and diagnostics
async fn submit_with_js_validate(
	id: &str,
	validate_body: &str,
) -> (MockTransport, RecordingDiagnostics) {
	let form = mount_form(id);
	let transport = MockTransport::new();
	let diagnostics = RecordingDiagnostics::new();
	let validate = Function::new_with_args("form", validate_body);
	let options = options(&[("key", "abc123".into()), ("validate", validate.into())]);
	submitter(&transport, &diagnostics)
		.bind(id, config_from_js(&options))
		.unwrap();

	assert!(submit(&form).default_prevented());
	next_tick().await;
	(transport, diagnostics)
}

/// A truthy validate result lets the submission through
#[wasm_bindgen_test]
async fn test_js_validate_truthy_submits() {
	let (transport, diagnostics) =
		submit_with_js_validate("wasm-validate-truthy", "return form.id;").await;

	assert_eq!(transport.call_count(), 1);
	assert_eq!(diagnostics.messages(), vec!["Form submitted successfully"]);
}

/// A falsy validate result blocks the submission
#[wasm_bindgen_test]
async fn test_js_validate_falsy_rejects() {
	let (transport, diagnostics) =
		submit_with_js_validate("wasm-validate-falsy", "return 0;").await;

	assert_eq!(transport.call_count(), 0);
	assert_eq!(diagnostics.messages(), vec!["Form validation failed."]);
}

/// A validate function that throws counts as failed validation
#[wasm_bindgen_test]
async fn test_js_validate_throwing_rejects() {
	let (transport, diagnostics) = submit_with_js_validate(
		"wasm-validate-throws",
		"throw new Error('invalid form');",
	)
	.await;

	assert_eq!(transport.call_count(), 0);
	assert_eq!(diagnostics.messages(), vec!["Form validation failed."]);
}

// ============================================================================
// JavaScript Callbacks and Payloads
// ============================================================================

/// onSuccess receives a fetch Response that can be read like one
#[wasm_bindgen_test]
async fn test_js_on_success_receives_fetch_response() {
	let form = mount_form("wasm-on-success");
	let transport = MockTransport::new();
	transport.push_response(
		SubmitResponse::new(200, r#"{"success":"true"}"#)
			.with_header("content-type", "application/json"),
	);
	let (on_success, calls) = recorder();
	let options = options(&[
		("submitURL", "https://example.test/contact".into()),
		("onSuccess", on_success.into()),
	]);
	submitter(&transport, &RecordingDiagnostics::new())
		.bind("wasm-on-success", config_from_js(&options))
		.unwrap();

	submit(&form);
	next_tick().await;

	assert_eq!(calls.borrow().len(), 1);
	let value = calls.borrow()[0].clone();
	let response = value.dyn_into::<web_sys::Response>().unwrap();
	assert!(response.ok());
	assert_eq!(response.status(), 200);
	assert_eq!(
		response.headers().get("content-type").unwrap(),
		Some("application/json".to_string())
	);
	assert_eq!(
		property(&response, "url").as_string(),
		Some("https://example.test/contact".to_string())
	);
	let body = JsFuture::from(response.json().unwrap()).await.unwrap();
	assert_eq!(property(&body, "success").as_string(), Some("true".to_string()));
}

/// onError receives a fetch Response for non-2xx statuses
#[wasm_bindgen_test]
async fn test_js_on_error_receives_error_status_response() {
	let form = mount_form("wasm-on-error-status");
	let transport = MockTransport::new();
	transport.push_response(SubmitResponse::new(500, "boom"));
	let (on_error, calls) = recorder();
	let options = options(&[("key", "abc123".into()), ("onError", on_error.into())]);
	submitter(&transport, &RecordingDiagnostics::new())
		.bind("wasm-on-error-status", config_from_js(&options))
		.unwrap();

	submit(&form);
	next_tick().await;

	assert_eq!(calls.borrow().len(), 1);
	let value = calls.borrow()[0].clone();
	let response = value.dyn_into::<web_sys::Response>().unwrap();
	assert!(!response.ok());
	assert_eq!(response.status(), 500);
	let text = JsFuture::from(response.text().unwrap()).await.unwrap();
	assert_eq!(text.as_string(), Some("boom".to_string()));
}

/// onError receives an Error for transport failures
#[wasm_bindgen_test]
async fn test_js_on_error_receives_error_for_transport_failure() {
	let form = mount_form("wasm-on-error-network");
	let transport = MockTransport::new();
	transport.push_error(SubmitError::network("offline"));
	let (on_error, calls) = recorder();
	let options = options(&[("key", "abc123".into()), ("onError", on_error.into())]);
	submitter(&transport, &RecordingDiagnostics::new())
		.bind("wasm-on-error-network", config_from_js(&options))
		.unwrap();

	submit(&form);
	next_tick().await;

	assert_eq!(calls.borrow().len(), 1);
	let value = calls.borrow()[0].clone();
	let error = value.dyn_into::<js_sys::Error>().unwrap();
	assert!(String::from(error.message()).contains("offline"));
}

/// Falsy data sends an empty JSON object
#[wasm_bindgen_test]
async fn test_js_falsy_data_sends_empty_object() {
	let falsy = [
		JsValue::from(0),
		JsValue::FALSE,
		JsValue::from_str(""),
		JsValue::NULL,
	];
	for (i, data) in falsy.into_iter().enumerate() {
		let id = format!("wasm-falsy-data-{}", i);
		let form = mount_form(&id);
		let transport = MockTransport::new();
		let options = options(&[("key", "abc123".into()), ("data", data)]);
		submitter(&transport, &RecordingDiagnostics::new())
			.bind(&id, config_from_js(&options))
			.unwrap();

		submit(&form);
		next_tick().await;

		assert_eq!(transport.last_request().unwrap().body, "{}");
	}
}

/// The data object is read on every attempt, not once at bind time
#[wasm_bindgen_test]
async fn test_js_data_is_read_per_attempt() {
	let form = mount_form("wasm-live-data");
	let transport = MockTransport::new();
	let data = Object::new();
	Reflect::set(&data, &"step".into(), &JsValue::from(1)).unwrap();
	let options = options(&[("key", "abc123".into()), ("data", data.clone().into())]);
	submitter(&transport, &RecordingDiagnostics::new())
		.bind("wasm-live-data", config_from_js(&options))
		.unwrap();

	submit(&form);
	next_tick().await;
	Reflect::set(&data, &"step".into(), &JsValue::from(2)).unwrap();
	submit(&form);
	next_tick().await;

	let bodies: Vec<String> = transport.requests().into_iter().map(|r| r.body).collect();
	assert_eq!(bodies, vec![r#"{"step":1}"#, r#"{"step":2}"#]);
}

/// Data JSON cannot encode keeps the form bound and reaches onError
#[wasm_bindgen_test]
async fn test_js_unserializable_data_reaches_on_error() {
	let unserializable = [
		js_sys::eval("({ n: 10n })").unwrap(),
		js_sys::eval("(() => { const o = {}; o.self = o; return o; })()").unwrap(),
		js_sys::eval("(() => 1)").unwrap(),
	];
	for (i, data) in unserializable.into_iter().enumerate() {
		let id = format!("wasm-bad-data-{}", i);
		let form = mount_form(&id);
		let transport = MockTransport::new();
		let diagnostics = RecordingDiagnostics::new();
		let (on_error, calls) = recorder();
		let options = options(&[
			("key", "abc123".into()),
			("data", data),
			("onError", on_error.into()),
		]);
		submitter(&transport, &diagnostics)
			.bind(&id, config_from_js(&options))
			.unwrap();

		assert!(submit(&form).default_prevented());
		assert!(submit(&form).default_prevented());
		next_tick().await;

		assert_eq!(transport.call_count(), 0);
		assert_eq!(calls.borrow().len(), 2);
		assert!(calls.borrow().iter().all(|value| value.is_instance_of::<js_sys::Error>()));
		assert_eq!(diagnostics.diagnostics().len(), 2);
	}
}

// ============================================================================
// easyFormSubmit Entry Point
// ============================================================================

/// easyFormSubmit binds the form and suppresses navigation
#[wasm_bindgen_test]
fn test_easy_form_submit_binds_form() {
	let form = mount_form("wasm-easy");

	// No endpoint, so attempts stop before any network call
	easy_form_submit("wasm-easy", options(&[]));

	assert!(submit(&form).default_prevented());
}

/// easyFormSubmit tolerates an unknown ID and missing options
#[wasm_bindgen_test]
fn test_easy_form_submit_unknown_form_does_not_throw() {
	easy_form_submit("wasm-easy-missing", JsValue::UNDEFINED);
	easy_form_submit("wasm-easy-missing", options(&[("key", "abc123".into())]));
}
