//! Demonstrates posting a notification message through the client's `post` helper, consuming
//! nothing but the call's success/error contract.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use apphub_sdk::{
	client::{ApiClient, ApiConfig, CallOptions},
	serde_json::json,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/messages.json");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":1,\"body\":\"Deploy finished.\"}");
		})
		.await;
	let config = ApiConfig::new("http", server.address().to_string())?
		.with_credentials("demo-app", "demo-secret");
	let client = ApiClient::new(config);

	match client
		.post("/messages.json", &json!({ "body": "Deploy finished." }), CallOptions::new())
		.await
	{
		Ok(value) => println!("Notification posted: {value}"),
		Err(err) => eprintln!("Notification failed with code {:?}: {err}", err.code()),
	}

	mock.assert_calls_async(1).await;

	Ok(())
}
