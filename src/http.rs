//! Transport primitives for platform API calls.
//!
//! The module exposes [`ApiTransport`] so downstream crates can integrate custom HTTP clients.
//! The trait is the SDK's only dependency on an HTTP stack: one request in, one response out,
//! with no retries and whatever redirect policy the transport defaults to. [`ReqwestTransport`]
//! is the stock implementation behind the `reqwest` feature.

pub use http::{HeaderMap, Method, StatusCode, header};

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;

/// Outbound request handed to a transport: method, URL, headers, and an encoded body.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Inbound reply returned by a transport: status, headers, and the collected body bytes.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`ApiTransport::call`].
pub type TransportFuture<E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + Send>>;

/// Abstraction over HTTP transports capable of executing one platform API round trip.
///
/// Implementations must be `Send + Sync + 'static` so a single client (holding the transport
/// behind `Arc<T>`) can be shared by any number of concurrent calls, and the returned future
/// must own whatever state it needs so it stays `Send` for the lifetime of the in-flight call.
/// Transports never retry; failures surface to the caller as-is.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes one request and collects the full response body.
	fn call(&self, request: HttpRequest) -> TransportFuture<Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The SDK issues exactly one request per call and leaves redirect following and timeouts at
/// reqwest's defaults; configure a custom [`ReqwestClient`] to tighten either.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn call(&self, request: HttpRequest) -> TransportFuture<Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
