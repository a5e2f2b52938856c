//! SDK-level error types shared across the codec, client, and transport layers.

// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Sentinel code reported for transport-level failures (DNS, TCP, TLS).
pub const TRANSPORT_FAILURE_CODE: i64 = -1000;
/// Sentinel code reported when a reply body could not be parsed as JSON.
pub const UNEXPECTED_REPLY_CODE: i64 = -1001;

/// Canonical SDK error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Signed-request verification failure.
	#[error(transparent)]
	Verify(#[from] crate::signed::VerifyError),
	/// Signed-payload construction failure.
	#[error(transparent)]
	Payload(#[from] crate::signed::PayloadError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Well-formed error payload reported by the platform; passed through unmodified.
	#[error("Platform reported error {code}: {message}.")]
	Api {
		/// HTTP status code of the reply.
		status: u16,
		/// Platform-defined numeric error code.
		code: i64,
		/// Platform-supplied message.
		message: String,
		/// Optional longer description supplied by the platform.
		description: Option<String>,
	},
	/// Reply body could not be parsed as JSON where JSON was expected.
	#[error("Platform returned a reply that could not be parsed as JSON.")]
	UnexpectedReply {
		/// HTTP status code of the reply, when one was received.
		status: Option<u16>,
		/// Raw unparsed body, kept for diagnostics.
		body: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the numeric code of an API-call failure.
	///
	/// Platform errors carry the platform-defined code; transport and parse failures carry the
	/// [`TRANSPORT_FAILURE_CODE`] and [`UNEXPECTED_REPLY_CODE`] sentinels. Configuration and
	/// verification failures never reach the network and have no code.
	pub fn code(&self) -> Option<i64> {
		match self {
			Self::Api { code, .. } => Some(*code),
			Self::Transport(_) => Some(TRANSPORT_FAILURE_CODE),
			Self::UnexpectedReply { .. } => Some(UNEXPECTED_REPLY_CODE),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Scheme was neither `http` nor `https`.
	#[error("Unsupported scheme `{scheme}`; expected `http` or `https`.")]
	UnsupportedScheme {
		/// The rejected scheme string.
		scheme: String,
	},
	/// Hostname was empty.
	#[error("Hostname cannot be empty.")]
	EmptyHost,
	/// Request URL could not be assembled from scheme, host, and path.
	#[error("Request URL could not be constructed.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialization {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn parse_failure() -> serde_path_to_error::Error<serde_json::Error> {
		let deserializer = &mut serde_json::Deserializer::from_str("not json");

		serde_path_to_error::deserialize::<_, serde_json::Value>(deserializer)
			.expect_err("Malformed body should fail to parse.")
	}

	#[test]
	fn sentinel_codes_map_by_variant() {
		let transport = Error::Transport(TransportError::Io(std::io::Error::other("boom")));

		assert_eq!(transport.code(), Some(TRANSPORT_FAILURE_CODE));

		let unexpected =
			Error::UnexpectedReply { status: Some(200), body: "not json".into(), source: parse_failure() };

		assert_eq!(unexpected.code(), Some(UNEXPECTED_REPLY_CODE));

		let api = Error::Api { status: 404, code: 1, message: "Not Found".into(), description: None };

		assert_eq!(api.code(), Some(1));
	}

	#[test]
	fn local_failures_have_no_code() {
		let config = Error::Config(ConfigError::EmptyHost);

		assert_eq!(config.code(), None);
	}
}
