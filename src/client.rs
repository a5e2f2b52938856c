//! Platform API client: verb helpers routed through one request pipeline.

pub mod options;
pub use options::*;

mod reply;

// crates.io
use http::{
	Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE},
};
use serde_json::Value;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AppCredentials, SecretString},
	error::{ConfigError, TransportError},
	http::{ApiTransport, HttpRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Platform API version assumed when none is configured.
pub const DEFAULT_API_VERSION: &str = "1";
/// Content type attached to JSON bodies unless overridden.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Content type attached to form-encoded action bodies unless overridden.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// URL scheme accepted by [`ApiConfig`]; anything else fails construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
	/// Plain HTTP.
	Http,
	/// HTTP over TLS.
	Https,
}
impl Scheme {
	/// Returns the scheme as it appears in a URL.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Http => "http",
			Self::Https => "https",
		}
	}
}
impl Display for Scheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Scheme {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"http" => Ok(Self::Http),
			"https" => Ok(Self::Https),
			_ => Err(ConfigError::UnsupportedScheme { scheme: s.to_owned() }),
		}
	}
}

/// Immutable client configuration: scheme, host, optional credentials, API version.
///
/// Read-only after construction and safe to share across any number of in-flight calls; per-call
/// state lives exclusively in [`CallOptions`].
#[derive(Clone, Debug)]
pub struct ApiConfig {
	/// URL scheme used for every call.
	pub scheme: Scheme,
	/// Host (and optional port) of the platform API.
	pub host: String,
	/// Application credentials; when absent, no default bearer token is derived.
	pub credentials: Option<AppCredentials>,
	/// Platform API version referenced by the default `Accept` media type.
	pub api_version: String,
}
impl ApiConfig {
	/// Validates the scheme and host and assumes [`DEFAULT_API_VERSION`].
	pub fn new(scheme: &str, host: impl Into<String>) -> Result<Self, ConfigError> {
		let scheme = scheme.parse()?;
		let host = host.into();

		if host.is_empty() {
			return Err(ConfigError::EmptyHost);
		}

		Ok(Self { scheme, host, credentials: None, api_version: DEFAULT_API_VERSION.into() })
	}

	/// Attaches application credentials, enabling the derived default bearer token.
	pub fn with_credentials(
		mut self,
		app_id: impl Into<String>,
		app_secret: impl Into<SecretString>,
	) -> Self {
		self.credentials = Some(AppCredentials::new(app_id, app_secret));

		self
	}

	/// Overrides the platform API version.
	pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
		self.api_version = api_version.into();

		self
	}

	/// Returns the versioned default `Accept` media type.
	pub fn default_accept(&self) -> String {
		format!("application/vnd.apphub.api-v{}+json", self.api_version)
	}

	fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		// The path is caller-constructed (REST path plus optional query string) and appended
		// verbatim; it is not parsed or validated here.
		Url::parse(&format!("{}://{}{}", self.scheme, self.host, path))
			.map_err(|source| ConfigError::InvalidEndpoint { source })
	}

	fn resolve_bearer(&self, options: &CallOptions) -> Option<SecretString> {
		options
			.access_token
			.clone()
			.or_else(|| self.credentials.as_ref().map(AppCredentials::bearer_token))
	}
}

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Issues authorized REST calls against the platform.
///
/// Every verb helper routes through one internal pipeline: build the URL from the immutable
/// configuration, attach auth and content headers, hand the encoded request to the transport for
/// exactly one round trip, and normalize the reply into a single success value or error. Calls
/// are independent asynchronous operations; nothing is shared between them except this
/// configuration, and no call is ever retried internally.
#[derive(Clone)]
pub struct ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<C>,
	/// Immutable configuration shared by all in-flight calls.
	pub config: ApiConfig,
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a fresh default reqwest transport.
	pub fn new(config: ApiConfig) -> Self {
		Self::with_transport(config, ReqwestTransport::default())
	}
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: ApiConfig, transport: impl Into<Arc<C>>) -> Self {
		Self { transport: transport.into(), config }
	}

	/// Issues a GET request.
	pub async fn get(&self, path: &str, options: CallOptions) -> Result<Value> {
		self.dispatch(CallKind::Get, Method::GET, path, None, options).await
	}

	/// Issues a DELETE request.
	pub async fn delete(&self, path: &str, options: CallOptions) -> Result<Value> {
		self.dispatch(CallKind::Delete, Method::DELETE, path, None, options).await
	}

	/// Issues a POST request with a JSON body.
	pub async fn post(&self, path: &str, data: &Value, options: CallOptions) -> Result<Value> {
		self.dispatch(CallKind::Post, Method::POST, path, Some(RequestBody::json(data)?), options)
			.await
	}

	/// Issues a PUT request with a JSON body.
	pub async fn put(&self, path: &str, data: &Value, options: CallOptions) -> Result<Value> {
		self.dispatch(CallKind::Put, Method::PUT, path, Some(RequestBody::json(data)?), options)
			.await
	}

	/// Issues a POST request with an `application/x-www-form-urlencoded` body.
	///
	/// Form fields use plain URL encoding, not the signed-request percent-encoding variant; the
	/// two escape sets are deliberately separate.
	pub async fn post_action(
		&self,
		path: &str,
		form: &BTreeMap<String, String>,
		options: CallOptions,
	) -> Result<Value> {
		self.dispatch(
			CallKind::PostAction,
			Method::POST,
			path,
			Some(RequestBody::form(form)),
			options,
		)
		.await
	}

	/// General entry point for arbitrary methods; `data`, when present, is sent as JSON.
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		data: Option<&Value>,
		options: CallOptions,
	) -> Result<Value> {
		let body = data.map(RequestBody::json).transpose()?;

		self.dispatch(CallKind::from_method(&method), method, path, body, options).await
	}

	async fn dispatch(
		&self,
		kind: CallKind,
		method: Method,
		path: &str,
		body: Option<RequestBody>,
		options: CallOptions,
	) -> Result<Value> {
		let span = CallSpan::new(kind, "dispatch");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.build_request(method, path, body, &options)?;
				let response = self
					.transport
					.call(request)
					.await
					.map_err(|err| Error::from(TransportError::network(err)))?;

				reply::classify(response.status(), response.body())
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	fn build_request(
		&self,
		method: Method,
		path: &str,
		body: Option<RequestBody>,
		options: &CallOptions,
	) -> Result<HttpRequest> {
		let url = self.config.endpoint(path)?;
		let accept = options.accept.clone().unwrap_or_else(|| self.config.default_accept());
		let mut builder =
			http::Request::builder().method(method).uri(url.as_str()).header(ACCEPT, accept);

		if let Some(token) = self.config.resolve_bearer(options) {
			builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose()));
		}

		let bytes = match body {
			Some(body) => {
				let content_type =
					options.content_type.clone().unwrap_or_else(|| body.content_type.to_owned());

				builder = builder
					.header(CONTENT_TYPE, content_type)
					.header(CONTENT_LENGTH, body.bytes.len());

				body.bytes
			},
			None => Vec::new(),
		};

		builder.body(bytes).map_err(|err| ConfigError::from(err).into())
	}
}

/// Encoded request body plus the content type its encoding implies.
struct RequestBody {
	content_type: &'static str,
	bytes: Vec<u8>,
}
impl RequestBody {
	fn json(data: &Value) -> Result<Self, ConfigError> {
		let bytes =
			serde_json::to_vec(data).map_err(|source| ConfigError::BodySerialization { source })?;

		Ok(Self { content_type: JSON_CONTENT_TYPE, bytes })
	}

	fn form(fields: &BTreeMap<String, String>) -> Self {
		let mut serializer = form_urlencoded::Serializer::new(String::new());

		for (key, value) in fields {
			serializer.append_pair(key, value);
		}

		Self { content_type: FORM_CONTENT_TYPE, bytes: serializer.finish().into_bytes() }
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn scheme_parsing_accepts_http_and_https_only() {
		assert!(matches!("http".parse::<Scheme>(), Ok(Scheme::Http)));
		assert!(matches!("https".parse::<Scheme>(), Ok(Scheme::Https)));
		assert!(matches!(
			"ftp".parse::<Scheme>(),
			Err(ConfigError::UnsupportedScheme { scheme }) if scheme == "ftp",
		));
		assert!("HTTP".parse::<Scheme>().is_err(), "Schemes are matched exactly.");
	}

	#[test]
	fn config_rejects_an_empty_host() {
		assert!(matches!(ApiConfig::new("https", ""), Err(ConfigError::EmptyHost)));
	}

	#[test]
	fn default_accept_tracks_the_api_version() {
		let config =
			ApiConfig::new("https", "api.example.com").expect("Config fixture should be valid.");

		assert_eq!(config.default_accept(), "application/vnd.apphub.api-v1+json");

		let config = config.with_api_version("2");

		assert_eq!(config.default_accept(), "application/vnd.apphub.api-v2+json");
	}

	#[test]
	fn endpoint_appends_the_caller_path_verbatim() {
		let config =
			ApiConfig::new("https", "api.example.com").expect("Config fixture should be valid.");
		let url = config
			.endpoint("/networks/42/user/7/?full=1")
			.expect("Endpoint fixture should parse.");

		assert_eq!(url.as_str(), "https://api.example.com/networks/42/user/7/?full=1");
	}

	#[test]
	fn bearer_resolution_prefers_the_per_call_override() {
		let config = ApiConfig::new("https", "api.example.com")
			.expect("Config fixture should be valid.")
			.with_credentials("app", "secret");
		let derived = config.resolve_bearer(&CallOptions::new());

		assert_eq!(derived.map(|token| token.expose().to_owned()), Some("app_secret".to_owned()));

		let overridden =
			config.resolve_bearer(&CallOptions::new().with_access_token("user-token"));

		assert_eq!(
			overridden.map(|token| token.expose().to_owned()),
			Some("user-token".to_owned()),
		);

		let bare = ApiConfig::new("https", "api.example.com")
			.expect("Config fixture should be valid.")
			.resolve_bearer(&CallOptions::new());

		assert!(bare.is_none(), "No credentials and no override means no Authorization header.");
	}

	#[test]
	fn json_bodies_serialize_with_their_content_type() {
		let body = RequestBody::json(&json!({ "body": "hi" }))
			.expect("JSON body fixture should serialize.");

		assert_eq!(body.content_type, JSON_CONTENT_TYPE);
		assert_eq!(body.bytes, br#"{"body":"hi"}"#);
	}

	#[test]
	fn form_bodies_use_plain_url_encoding() {
		let mut fields = BTreeMap::new();

		fields.insert("b".to_owned(), "x y".to_owned());
		fields.insert("a".to_owned(), "1".to_owned());

		let body = RequestBody::form(&fields);

		assert_eq!(body.content_type, FORM_CONTENT_TYPE);
		// Plain form encoding: spaces become `+`, unlike the signed-request escape set.
		assert_eq!(body.bytes, b"a=1&b=x+y");
	}
}
