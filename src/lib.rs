//! Rust SDK for the AppHub platform—verify signed platform callbacks and issue authorized REST
//! calls through one lightweight client.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

// The lib-test target gets an implicit self `--extern`, which `unused_crate_dependencies`
// flags unless the crate references itself. This satisfies the lint in test builds only.
#[cfg(test)]
use apphub_sdk as _;

pub mod auth;
pub mod client;
pub mod error;
pub mod ext;
pub mod http;
pub mod obs;
pub mod signed;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{ApiClient, ApiConfig},
		http::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs an [`ApiClient`] against a mock server with canned app credentials.
	pub fn build_reqwest_test_client(scheme: &str, host: &str) -> ReqwestTestClient {
		let config = ApiConfig::new(scheme, host)
			.expect("Failed to build test API configuration.")
			.with_credentials("test-app", "test-secret");

		ApiClient::with_transport(config, test_reqwest_transport())
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
