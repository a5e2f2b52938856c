//! Authenticated context extracted from a verified signed payload.

// self
use crate::{_prelude::*, signed::SignedPayload};

const NETWORK_ID_KEY: &str = "networkId";
const USER_ID_KEY: &str = "userId";
const LOCALE_KEY: &str = "locale";

/// Identity fields the platform embeds in a signed callback.
///
/// Extract this only after [`crate::signed::verify`] has accepted the payload; the fields carry
/// no authenticity of their own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedContext {
	/// Network the originating user belongs to.
	pub network_id: Option<String>,
	/// Originating platform user.
	pub user_id: Option<String>,
	/// BCP 47 locale preferred by the originating user.
	pub locale: Option<String>,
}
impl SignedContext {
	/// Reads the context fields out of a payload; absent keys stay `None`.
	pub fn from_payload(payload: &SignedPayload) -> Self {
		Self {
			network_id: payload.get(NETWORK_ID_KEY).map(str::to_owned),
			user_id: payload.get(USER_ID_KEY).map(str::to_owned),
			locale: payload.get(LOCALE_KEY).map(str::to_owned),
		}
	}
}
