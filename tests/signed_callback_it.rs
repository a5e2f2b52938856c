// std
use std::{collections::HashMap, sync::Mutex};
// self
use apphub_sdk::{
	_preludet::*,
	auth::{SecretString, SignedContext},
	ext::SessionSinkExt,
	signed::{self, FRESHNESS_WINDOW, ISSUED_AT_KEY, SIGNATURE_KEY, SignedPayload, VerifyError},
};

const APP_SECRET: &str = "callback-secret";

fn fixed_now() -> OffsetDateTime {
	OffsetDateTime::from_unix_timestamp(1_786_181_400)
		.expect("Fixture timestamp should be valid.")
}

/// Builds the parameter set a platform callback delivers, signed at `issued`.
fn platform_callback(issued: OffsetDateTime) -> SignedPayload {
	let mut payload = SignedPayload::new([
		("networkId", "42"),
		("userId", "7"),
		("locale", "en-US"),
		(ISSUED_AT_KEY, signed::issued_at_value(issued).as_str()),
	])
	.expect("Callback fixture should be valid.");
	let signature = signed::sign(&payload, &SecretString::new(APP_SECRET));

	payload.insert(SIGNATURE_KEY, signature).expect("Signature should be insertable.");

	payload
}

#[derive(Default)]
struct MemorySessionSink {
	sessions: Mutex<HashMap<String, String>>,
}
impl SessionSinkExt<String, String> for MemorySessionSink {
	fn store_session(
		&self,
		context: &SignedContext,
		access_token: &str,
	) -> Result<String, String> {
		let user = context.user_id.clone().ok_or_else(|| "missing user".to_owned())?;

		self.sessions
			.lock()
			.expect("Session lock should never be poisoned.")
			.insert(user.clone(), access_token.to_owned());

		Ok(user)
	}
}

#[test]
fn verified_callbacks_yield_a_session() {
	let now = fixed_now();
	let payload = platform_callback(now);
	let secret = SecretString::new(APP_SECRET);

	signed::verify_at(&payload, &secret, now + Duration::seconds(5))
		.expect("Fresh callback should verify.");

	let context = SignedContext::from_payload(&payload);
	let sink = MemorySessionSink::default();
	let session = sink
		.store_session(&context, "opaque-access-token")
		.expect("Session sink should accept the verified context.");

	assert_eq!(session, "7");
	assert_eq!(
		sink.sessions
			.lock()
			.expect("Session lock should never be poisoned.")
			.get("7")
			.map(String::as_str),
		Some("opaque-access-token"),
	);
}

#[test]
fn stale_callbacks_never_reach_the_sink() {
	let now = fixed_now();
	let payload = platform_callback(now);
	let secret = SecretString::new(APP_SECRET);
	let err = signed::verify_at(&payload, &secret, now + FRESHNESS_WINDOW + Duration::seconds(1))
		.expect_err("Stale callback should be rejected.");

	assert!(matches!(err, VerifyError::ExpiredSignature { .. }));
}

#[test]
fn reordered_form_fields_verify_identically() {
	let now = fixed_now();
	let payload = platform_callback(now);
	// Rebuild the payload in reverse order, as a form decoder might.
	let mut reordered = SignedPayload::default();

	for (key, value) in payload.iter().collect::<Vec<_>>().into_iter().rev() {
		reordered.insert(key, value).expect("Reordered pair should be insertable.");
	}

	signed::verify_at(&reordered, &SecretString::new(APP_SECRET), now)
		.expect("Field order must not affect verification.");
}
