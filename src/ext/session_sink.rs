//! Session persistence contract for applications embedding the SDK.

// self
use crate::auth::SignedContext;

/// Describes how to persist the outcome of a verified signed request without constraining the
/// storage backend.
///
/// The trait is intentionally generic over both the session and error types so implementers can
/// integrate with any store (Redis, an in-process map, a cookie jar, etc.) while keeping
/// `apphub-sdk` free of those dependencies. The SDK hands over only the verified
/// [`SignedContext`] and the opaque access token string; the persistence format and lookup key
/// are entirely the implementer's concern.
pub trait SessionSinkExt<Session, Error>
where
	Self: Send + Sync,
{
	/// Persists the verified context alongside its access token and returns the stored session.
	fn store_session(&self, context: &SignedContext, token: &str) -> Result<Session, Error>;
}
