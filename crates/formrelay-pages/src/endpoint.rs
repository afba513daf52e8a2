//! Endpoint resolution.
//!
//! An explicit submit URL always wins and is used verbatim. Otherwise the
//! relay key is appended to the relay base URL, giving
//! `https://formsubmit.co/ajax/<key>` by default. With neither configured
//! the attempt fails before any network activity.

use crate::config::SubmissionConfig;
use crate::transport::SubmitError;

/// Builds a relay endpoint from a base URL and a key.
///
/// A missing trailing slash on `base` is added. The key is inserted
/// verbatim; FormSubmit accepts both random keys and e-mail addresses.
pub fn relay_endpoint(base: &str, key: &str) -> String {
	if base.ends_with('/') {
		format!("{}{}", base, key)
	} else {
		format!("{}/{}", base, key)
	}
}

/// Resolves the endpoint a submission is sent to.
pub fn resolve_endpoint(config: &SubmissionConfig) -> Result<String, SubmitError> {
	if let Some(url) = config.submit_url() {
		return Ok(url.to_string());
	}

	config
		.key()
		.map(|key| relay_endpoint(config.relay_base_url(), key))
		.ok_or(SubmitError::MissingEndpoint)
}
