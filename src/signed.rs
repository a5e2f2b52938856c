//! Signed-request canonicalization, signing, and verification.
//!
//! The platform delivers callback payloads as flat `key=value` parameter sets carrying a base64
//! HMAC-SHA256 [`SIGNATURE_KEY`] entry and an [`ISSUED_AT_KEY`] timestamp. Both sides serialize
//! the payload into one deterministic canonical query string—percent-encoded pairs in ascending
//! key order with the signature entry carved out—so the digest is stable under any parameter
//! reordering. [`verify`] recomputes the digest and enforces the [`FRESHNESS_WINDOW`].

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::Sha256;
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, auth::SecretString};

type HmacSha256 = Hmac<Sha256>;

/// Reserved key carrying the payload signature; always excluded from canonicalization input and
/// re-appended last in the transmitted form.
pub const SIGNATURE_KEY: &str = "signature";
/// Reserved key carrying the issuance timestamp as epoch milliseconds.
pub const ISSUED_AT_KEY: &str = "issuedAt";
/// Validity window of a signed payload, measured from its issuance timestamp.
///
/// No nonce or replay cache exists beyond this window; a captured payload stays replayable until
/// the window closes.
pub const FRESHNESS_WINDOW: Duration = Duration::milliseconds(60_000);

/// Characters escaped by [`percent_encode`]: everything except ASCII alphanumerics and
/// `- _ . ~`. This is standard URI component escaping plus `! ' ( ) *`, and the exact set must
/// match on the signing and verifying sides or digests will never agree.
const COMPONENT_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Flat string-to-string parameter set backing a signed request.
///
/// Keys are held in ascending lexicographic order, which is the canonical serialization order.
/// Empty keys are rejected at insertion so canonical strings never contain a bare `=` pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignedPayload(BTreeMap<String, String>);
impl SignedPayload {
	/// Builds a payload from key/value pairs, rejecting empty keys.
	pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, PayloadError>
	where
		K: Into<String>,
		V: Into<String>,
	{
		let mut payload = Self::default();

		for (key, value) in pairs {
			payload.insert(key, value)?;
		}

		Ok(payload)
	}

	/// Inserts a parameter, returning the previously stored value if any.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<String>,
	) -> Result<Option<String>, PayloadError> {
		let key = key.into();

		if key.is_empty() {
			return Err(PayloadError::EmptyKey);
		}

		Ok(self.0.insert(key, value.into()))
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns the attached signature entry, if present.
	pub fn signature(&self) -> Option<&str> {
		self.get(SIGNATURE_KEY)
	}

	/// Returns the raw issuance timestamp entry, if present.
	pub fn issued_at(&self) -> Option<&str> {
		self.get(ISSUED_AT_KEY)
	}

	/// Iterates parameters in ascending key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Returns the number of stored parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no parameters are stored.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl TryFrom<BTreeMap<String, String>> for SignedPayload {
	type Error = PayloadError;

	fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
		if map.keys().any(String::is_empty) {
			return Err(PayloadError::EmptyKey);
		}

		Ok(Self(map))
	}
}

/// Error returned when payload construction fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PayloadError {
	/// A parameter key was empty.
	#[error("Payload keys cannot be empty.")]
	EmptyKey,
}

/// Verification failures raised by [`verify`]; never retried internally.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerifyError {
	/// The payload carries no signature entry.
	#[error("Payload does not carry a signature.")]
	MissingSignature,
	/// The recomputed digest does not match the attached signature.
	#[error("Signature does not match the canonical payload.")]
	InvalidSignature,
	/// The payload carries no issuance timestamp.
	#[error("Payload does not carry an issuedAt timestamp.")]
	MissingIssuedAt,
	/// The issuance timestamp is not valid epoch milliseconds.
	#[error("The issuedAt value `{value}` is not a valid timestamp.")]
	InvalidIssuedAt {
		/// The rejected raw value.
		value: String,
	},
	/// The payload was issued more than [`FRESHNESS_WINDOW`] ago.
	#[error("Signature expired at {expired_at}.")]
	ExpiredSignature {
		/// Instant at which the payload stopped being acceptable.
		expired_at: OffsetDateTime,
	},
}

/// Percent-encodes one string per the signed-request escape set.
///
/// Standard URI component escaping, additionally escaping `! ' ( ) *` to their percent-coded
/// forms. Distinct from the plain form encoding used for `application/x-www-form-urlencoded`
/// bodies; the two must never be merged or wire compatibility silently changes.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, COMPONENT_ENCODE_SET).to_string()
}

/// Serializes the payload into its canonical query string.
///
/// Pairs are percent-encoded on both sides, ordered by ascending lexicographic key order, and
/// joined by `&`; the [`SIGNATURE_KEY`] entry is excluded. This string is the HMAC input.
pub fn canonical_query(payload: &SignedPayload) -> String {
	payload
		.iter()
		.filter(|(key, _)| *key != SIGNATURE_KEY)
		.map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
		.collect::<Vec<_>>()
		.join("&")
}

/// Reconstructs the exact string a client transmits: the canonical query with the existing
/// signature entry re-appended as the final pair.
///
/// Does not compute a signature; the payload is serialized as-is.
pub fn signed_request_string(payload: &SignedPayload) -> String {
	let canonical = canonical_query(payload);
	let Some(signature) = payload.signature() else {
		return canonical;
	};
	let pair = format!("{}={}", percent_encode(SIGNATURE_KEY), percent_encode(signature));

	if canonical.is_empty() { pair } else { format!("{canonical}&{pair}") }
}

/// Computes the base64 HMAC-SHA256 digest of the payload's canonical query string.
pub fn sign(payload: &SignedPayload, app_secret: &SecretString) -> String {
	let mut mac = HmacSha256::new_from_slice(app_secret.expose().as_bytes())
		.expect("HMAC can accept any key length");

	mac.update(canonical_query(payload).as_bytes());

	BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies payload authenticity and freshness against the wall clock.
///
/// Pure and synchronous; safe to call concurrently from any number of tasks.
pub fn verify(payload: &SignedPayload, app_secret: &SecretString) -> Result<(), VerifyError> {
	verify_at(payload, app_secret, OffsetDateTime::now_utc())
}

/// Verifies payload authenticity and freshness against an explicit `now`.
///
/// The attached signature must equal the recomputed digest (compared in constant time) and `now`
/// must not exceed `issuedAt + `[`FRESHNESS_WINDOW`].
pub fn verify_at(
	payload: &SignedPayload,
	app_secret: &SecretString,
	now: OffsetDateTime,
) -> Result<(), VerifyError> {
	let supplied = payload.signature().ok_or(VerifyError::MissingSignature)?;
	let computed = sign(payload, app_secret);
	let matches: bool = computed.as_bytes().ct_eq(supplied.as_bytes()).into();

	if !matches {
		return Err(VerifyError::InvalidSignature);
	}

	let expired_at = issued_instant(payload)? + FRESHNESS_WINDOW;

	if now > expired_at {
		return Err(VerifyError::ExpiredSignature { expired_at });
	}

	Ok(())
}

/// Parses the payload's [`ISSUED_AT_KEY`] entry into an instant.
pub fn issued_instant(payload: &SignedPayload) -> Result<OffsetDateTime, VerifyError> {
	let raw = payload.issued_at().ok_or(VerifyError::MissingIssuedAt)?;
	let millis =
		raw.parse::<i64>().map_err(|_| VerifyError::InvalidIssuedAt { value: raw.to_owned() })?;

	OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
		.map_err(|_| VerifyError::InvalidIssuedAt { value: raw.to_owned() })
}

/// Formats an instant as the epoch-millisecond string stored under [`ISSUED_AT_KEY`].
pub fn issued_at_value(instant: OffsetDateTime) -> String {
	(instant.unix_timestamp_nanos() / 1_000_000).to_string()
}
