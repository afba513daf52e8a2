//! Submission configuration.
//!
//! [`SubmissionConfig`] is everything a single `bind` call needs: where to
//! send the data, what to send, and which hooks to run. It is built with
//! chained setters and captured by the submit listener; it is never mutated
//! after binding.
//!
//! [`SubmissionSettings`] is the serializable half (no callbacks), for
//! configuration that arrives as JSON, e.g. from a server-rendered
//! `data-formrelay` attribute.
//!
//! ## Example
//!
//! ```ignore
//! use formrelay_pages::SubmissionConfig;
//! use serde_json::json;
//!
//! let config = SubmissionConfig::new()
//!     .with_key("abc123")
//!     .with_field("email", json!("a@b.com"))
//!     .on_error(Callback::new(|failure| error_log!("{}", failure)));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::callback::Callback;
use crate::dom::FormHandle;
use crate::outcome::Failure;
use crate::transport::{SubmitError, SubmitResponse};

/// Base of the default relay endpoint; the relay key is appended to it.
pub const DEFAULT_RELAY_BASE_URL: &str = "https://formsubmit.co/ajax/";

/// Errors raised while building a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// The payload did not serialize to a JSON object.
	#[error("Submission data must serialize to a JSON object, got {found}")]
	DataNotObject {
		/// JSON type that was produced instead.
		found: &'static str,
	},

	/// The payload could not be serialized at all.
	#[error("Failed to serialize submission data: {0}")]
	Serialization(String),

	/// Settings text could not be parsed.
	#[error("Invalid submission settings: {0}")]
	InvalidSettings(String),
}

/// Serializable submission settings.
///
/// Accepts both the camelCase keys of the JavaScript API (`submitURL`,
/// `relayBaseURL`) and snake_case keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSettings {
	/// Explicit endpoint.
	#[serde(default, alias = "submitURL", alias = "submitUrl")]
	pub submit_url: Option<String>,

	/// Relay key.
	#[serde(default)]
	pub key: Option<String>,

	/// Request payload.
	#[serde(default)]
	pub data: Map<String, Value>,

	/// Relay base URL override.
	#[serde(default, alias = "relayBaseURL", alias = "relayBaseUrl")]
	pub relay_base_url: Option<String>,
}

impl SubmissionSettings {
	/// Parses settings from JSON text.
	///
	/// # Examples
	///
	/// ```ignore
	/// let settings = SubmissionSettings::from_json(r#"{"key": "abc123"}"#)?;
	/// assert_eq!(settings.key.as_deref(), Some("abc123"));
	/// ```
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		serde_json::from_str(text).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
	}
}

/// Configuration captured by a bound form.
///
/// All fields are optional. Empty `submit_url` and `key` strings count as
/// absent.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
	pub(crate) submit_url: Option<String>,
	pub(crate) key: Option<String>,
	pub(crate) data: Map<String, Value>,
	pub(crate) data_source: Option<Callback<(), Result<Value, SubmitError>>>,
	pub(crate) relay_base_url: String,
	pub(crate) validate: Option<Callback<FormHandle, bool>>,
	pub(crate) on_success: Option<Callback<SubmitResponse>>,
	pub(crate) on_error: Option<Callback<Failure>>,
}

impl Default for SubmissionConfig {
	fn default() -> Self {
		Self::new()
	}
}

impl SubmissionConfig {
	/// Creates an empty configuration targeting the default relay.
	pub fn new() -> Self {
		Self {
			submit_url: None,
			key: None,
			data: Map::new(),
			data_source: None,
			relay_base_url: DEFAULT_RELAY_BASE_URL.to_string(),
			validate: None,
			on_success: None,
			on_error: None,
		}
	}

	/// Creates a configuration from deserialized settings.
	pub fn from_settings(settings: SubmissionSettings) -> Self {
		let mut config = Self::new();
		config.submit_url = non_empty(settings.submit_url);
		config.key = non_empty(settings.key);
		config.data = settings.data;
		if let Some(base) = non_empty(settings.relay_base_url) {
			config.relay_base_url = base;
		}
		config
	}

	/// Sets an explicit endpoint, overriding the relay.
	pub fn with_submit_url(mut self, url: impl Into<String>) -> Self {
		self.submit_url = non_empty(Some(url.into()));
		self
	}

	/// Sets the relay key used when no submit URL is configured.
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = non_empty(Some(key.into()));
		self
	}

	/// Overrides the relay base URL.
	pub fn with_relay_base_url(mut self, base: impl Into<String>) -> Self {
		self.relay_base_url = base.into();
		self
	}

	/// Replaces the payload with the JSON serialization of `data`.
	///
	/// `data` must serialize to a JSON object.
	pub fn with_data<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, ConfigError> {
		let value =
			serde_json::to_value(data).map_err(|e| ConfigError::Serialization(e.to_string()))?;

		match value {
			Value::Object(map) => {
				self.data = map;
				Ok(self)
			}
			other => Err(ConfigError::DataNotObject {
				found: json_type_name(&other),
			}),
		}
	}

	/// Inserts a single payload entry.
	pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.data.insert(name.into(), value.into());
		self
	}

	/// Computes the payload anew for every attempt, replacing `data`.
	///
	/// The value is sent as returned, object or not. An error takes the
	/// same path as a failed request and reaches `on_error`.
	pub fn with_data_source(mut self, source: Callback<(), Result<Value, SubmitError>>) -> Self {
		self.data_source = Some(source);
		self
	}

	/// Sets the validation gate, called with the form before each submission.
	pub fn with_validate(mut self, validate: Callback<FormHandle, bool>) -> Self {
		self.validate = Some(validate);
		self
	}

	/// Sets the success hook.
	pub fn on_success(mut self, callback: Callback<SubmitResponse>) -> Self {
		self.on_success = Some(callback);
		self
	}

	/// Sets the error hook.
	pub fn on_error(mut self, callback: Callback<Failure>) -> Self {
		self.on_error = Some(callback);
		self
	}

	/// Explicit endpoint, if any.
	pub fn submit_url(&self) -> Option<&str> {
		self.submit_url.as_deref()
	}

	/// Relay key, if any.
	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	/// Relay base URL.
	pub fn relay_base_url(&self) -> &str {
		&self.relay_base_url
	}

	/// Request payload.
	pub fn data(&self) -> &Map<String, Value> {
		&self.data
	}

	/// Payload of the next attempt.
	pub fn payload(&self) -> Result<Value, SubmitError> {
		match &self.data_source {
			Some(source) => source.call(()),
			None => Ok(Value::Object(self.data.clone())),
		}
	}

	/// Whether a validation gate is configured.
	pub fn has_validate(&self) -> bool {
		self.validate.is_some()
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
