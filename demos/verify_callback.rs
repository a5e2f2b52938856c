//! Demonstrates verifying a signed platform callback and extracting the authenticated context.

// crates.io
use color_eyre::Result;
// self
use apphub_sdk::{
	_preludet::*,
	auth::{SecretString, SignedContext},
	signed::{self, ISSUED_AT_KEY, SIGNATURE_KEY, SignedPayload},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let app_secret = SecretString::new("demo-secret");
	// Stand in for the form fields a platform callback would deliver.
	let mut payload = SignedPayload::new([
		("networkId", "42"),
		("userId", "7"),
		("locale", "en-US"),
	])?;

	payload.insert(ISSUED_AT_KEY, signed::issued_at_value(OffsetDateTime::now_utc()))?;

	let signature = signed::sign(&payload, &app_secret);

	payload.insert(SIGNATURE_KEY, signature)?;
	signed::verify(&payload, &app_secret)?;

	let context = SignedContext::from_payload(&payload);

	println!(
		"Verified callback for user {:?} on network {:?} ({:?}).",
		context.user_id, context.network_id, context.locale,
	);

	Ok(())
}
