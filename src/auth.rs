//! Application credentials and the authenticated context carried by verified callbacks.

pub mod context;
pub mod secret;

pub use context::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// Immutable application credential pair issued by the platform.
///
/// Owned by the API client for its lifetime and never mutated after construction, so any number
/// of in-flight calls may read it concurrently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppCredentials {
	app_id: String,
	app_secret: SecretString,
}
impl AppCredentials {
	/// Creates a credential pair from the platform-issued application id and secret.
	pub fn new(app_id: impl Into<String>, app_secret: impl Into<SecretString>) -> Self {
		Self { app_id: app_id.into(), app_secret: app_secret.into() }
	}

	/// Returns the application identifier.
	pub fn app_id(&self) -> &str {
		&self.app_id
	}

	/// Returns the application secret used to verify signed callbacks.
	pub fn app_secret(&self) -> &SecretString {
		&self.app_secret
	}

	/// Derives the bearer token sent in `Authorization` headers: `<app_id>_<app_secret>`.
	pub fn bearer_token(&self) -> SecretString {
		SecretString::new(format!("{}_{}", self.app_id, self.app_secret.expose()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_token_joins_id_and_secret() {
		let credentials = AppCredentials::new("app-42", "hunter2");

		assert_eq!(credentials.bearer_token().expose(), "app-42_hunter2");
		assert_eq!(credentials.app_id(), "app-42");
	}

	#[test]
	fn credentials_redact_their_secret_in_debug_output() {
		let credentials = AppCredentials::new("app-42", "hunter2");
		let rendered = format!("{credentials:?}");

		assert!(!rendered.contains("hunter2"));
	}
}
