//! Optional observability helpers for API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `apphub_sdk.call` with the `call` (verb
//!   helper) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `apphub_sdk_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// API call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// GET helper.
	Get,
	/// DELETE helper.
	Delete,
	/// POST helper with a JSON body.
	Post,
	/// PUT helper with a JSON body.
	Put,
	/// POST helper with a form-encoded body.
	PostAction,
	/// General `request` entry point with a method outside the verb helpers.
	Other,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Get => "get",
			CallKind::Delete => "delete",
			CallKind::Post => "post",
			CallKind::Put => "put",
			CallKind::PostAction => "post_action",
			CallKind::Other => "other",
		}
	}

	/// Maps an HTTP method onto the closest verb-helper label.
	pub fn from_method(method: &http::Method) -> Self {
		match *method {
			http::Method::GET => Self::Get,
			http::Method::DELETE => Self::Delete,
			http::Method::POST => Self::Post,
			http::Method::PUT => Self::Put,
			_ => Self::Other,
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a verb helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
