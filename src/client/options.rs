//! Per-call override set merged over client-level defaults.

// self
use crate::{_prelude::*, auth::SecretString};

/// Overrides applied to exactly one call; never retained by the client.
///
/// Every field defaults to "use the client-level value": the derived bearer token, the versioned
/// `Accept` media type, and the body encoding's own content type.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
	/// Overrides the default `Accept` header.
	pub accept: Option<String>,
	/// Overrides the bearer token derived from the client credentials.
	pub access_token: Option<SecretString>,
	/// Overrides the `Content-Type` header attached to the request body.
	pub content_type: Option<String>,
}
impl CallOptions {
	/// Creates an empty override set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the `Accept` media type.
	pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
		self.accept = Some(accept.into());

		self
	}

	/// Overrides the bearer token for this call only.
	pub fn with_access_token(mut self, access_token: impl Into<SecretString>) -> Self {
		self.access_token = Some(access_token.into());

		self
	}

	/// Overrides the body content type.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());

		self
	}
}
