//! JavaScript entry point.
//!
//! Exposes `easyFormSubmit(formID, options)` to JavaScript with the
//! options object used by plain-JS callers:
//!
//! ```js
//! easyFormSubmit("contact", {
//!   key: "abc123",
//!   data: { email: "a@b.com" },
//!   validate: (form) => form.checkValidity(),
//!   onSuccess: (response) => console.log(response.status),
//!   onError: (responseOrError) => console.warn(responseOrError),
//! });
//! ```
//!
//! Callbacks receive what a `fetch` caller would: `onSuccess` and `onError`
//! get a `Response` built from the buffered reply (so `.json()`, `.text()`,
//! `.ok`, `.status` and `.headers` work), and transport failures reach
//! `onError` as `Error` instances. `data` is serialized on every attempt; a
//! falsy `data` sends `{}`, and one that cannot be serialized fails that
//! attempt through `onError`. A `validate` function that throws counts as a
//! failed validation.

use js_sys::{Function, JSON, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Headers, Response, ResponseInit};

use crate::callback::Callback;
use crate::config::SubmissionConfig;
use crate::dom::FormHandle;
use crate::error_log;
use crate::outcome::Failure;
use crate::transport::{SubmitError, SubmitResponse};

/// Binds `form_id` from JavaScript.
///
/// Never throws; problems are reported on the console.
#[wasm_bindgen(js_name = easyFormSubmit)]
pub fn easy_form_submit(form_id: &str, options: JsValue) {
	// Failures are already reported on the console
	let _ = crate::binder::bind(form_id, config_from_js(&options));
}

/// Converts a JS options object into a [`SubmissionConfig`].
pub fn config_from_js(options: &JsValue) -> SubmissionConfig {
	let mut config = SubmissionConfig::new();
	if options.is_undefined() || options.is_null() {
		return config;
	}

	if let Some(url) = property(options, "submitURL").as_string() {
		config = config.with_submit_url(url);
	}
	if let Some(key) = property(options, "key").as_string() {
		config = config.with_key(key);
	}

	let data = property(options, "data");
	if data.is_truthy() {
		config = config.with_data_source(Callback::new(move |()| payload_from_js(&data)));
	}

	if let Some(validate) = function(options, "validate") {
		config = config.with_validate(Callback::new(move |form: FormHandle| {
			match validate.call1(&JsValue::NULL, form.element()) {
				Ok(result) => result.is_truthy(),
				Err(err) => {
					error_log!("validate threw: {}", js_message(&err));
					false
				}
			}
		}));
	}

	if let Some(on_success) = function(options, "onSuccess") {
		config = config.on_success(Callback::new(move |response: SubmitResponse| {
			if let Err(err) = on_success.call1(&JsValue::NULL, &response_to_js(&response)) {
				error_log!("onSuccess threw: {}", js_message(&err));
			}
		}));
	}

	if let Some(on_error) = function(options, "onError") {
		config = config.on_error(Callback::new(move |failure: Failure| {
			if let Err(err) = on_error.call1(&JsValue::NULL, &failure_to_js(&failure)) {
				error_log!("onError threw: {}", js_message(&err));
			}
		}));
	}

	config
}

fn property(target: &JsValue, name: &str) -> JsValue {
	Reflect::get(target, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn function(target: &JsValue, name: &str) -> Option<Function> {
	property(target, name).dyn_into::<Function>().ok()
}

/// JSON encoding of `data`, as `JSON.stringify` produces it.
fn payload_from_js(data: &JsValue) -> Result<serde_json::Value, SubmitError> {
	let text = JSON::stringify(data).map_err(|e| SubmitError::serialization(js_message(&e)))?;
	// Functions and symbols stringify to `undefined`
	let text = text
		.as_string()
		.ok_or_else(|| SubmitError::serialization("data has no JSON representation"))?;
	serde_json::from_str(&text).map_err(|e| SubmitError::serialization(e.to_string()))
}

fn js_message(value: &JsValue) -> String {
	if let Some(error) = value.dyn_ref::<js_sys::Error>() {
		return String::from(error.message());
	}
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Converts a response into a fetch `Response`.
pub fn response_to_js(response: &SubmitResponse) -> JsValue {
	fetch_response(response).unwrap_or_else(|_| plain_response(response))
}

fn fetch_response(response: &SubmitResponse) -> Result<JsValue, JsValue> {
	let headers = Headers::new()?;
	for (name, value) in &response.headers {
		// Names the Fetch API refuses are left out
		let _ = headers.append(name, value);
	}

	let init = ResponseInit::new();
	init.set_status(response.status);
	init.set_headers(&headers);

	let body = (!is_null_body_status(response.status)).then_some(response.body.as_str());
	let fetch_response = Response::new_with_opt_str_and_init(body, &init)?;

	// `url` is read-only on constructed responses; shadow it on the instance
	let url = Object::new();
	Reflect::set(&url, &JsValue::from_str("value"), &JsValue::from_str(&response.url))?;
	Reflect::define_property(&fetch_response, &JsValue::from_str("url"), &url)?;

	Ok(fetch_response.into())
}

fn is_null_body_status(status: u16) -> bool {
	matches!(status, 101 | 103 | 204 | 205 | 304)
}

/// Statuses a `Response` cannot be constructed with end up here.
fn plain_response(response: &SubmitResponse) -> JsValue {
	let object = Object::new();
	let fields = [
		("ok", JsValue::from_bool(response.ok())),
		("status", JsValue::from_f64(f64::from(response.status))),
		("url", JsValue::from_str(&response.url)),
		("body", JsValue::from_str(&response.body)),
	];
	for (name, value) in fields {
		// Setting a property on a fresh plain object cannot fail
		let _ = Reflect::set(&object, &JsValue::from_str(name), &value);
	}
	object.into()
}

/// Converts a failure into what `onError` receives.
pub fn failure_to_js(failure: &Failure) -> JsValue {
	match failure {
		Failure::Response(response) => response_to_js(response),
		Failure::Error(error) => js_sys::Error::new(&error.to_string()).into(),
	}
}
