//! Reply normalization: one HTTP response in, one success value or one error out.

// crates.io
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::_prelude::*;

/// Well-formed error payload reported by the platform.
///
/// Anything that does not deserialize into this shape—on the error path or the success path—is
/// surfaced as [`Error::UnexpectedReply`] with the raw body attached.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
	code: i64,
	message: String,
	#[serde(default)]
	description: Option<String>,
}

/// Classifies one reply by status code.
///
/// - `204` succeeds with `Value::Bool(true)`; the body is never inspected.
/// - Any other 2xx succeeds with the JSON-parsed body.
/// - Everything else fails with the platform's `{code, message}` payload.
pub(crate) fn classify(status: StatusCode, body: &[u8]) -> Result<Value> {
	if status == StatusCode::NO_CONTENT {
		return Ok(Value::Bool(true));
	}
	if status.is_success() {
		return parse_json(status, body);
	}

	let reported: ApiErrorBody = parse_json(status, body)?;

	Err(Error::Api {
		status: status.as_u16(),
		code: reported.code,
		message: reported.message,
		description: reported.description,
	})
}

fn parse_json<T>(status: StatusCode, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::UnexpectedReply {
		status: Some(status.as_u16()),
		body: String::from_utf8_lossy(body).into_owned(),
		source,
	})
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::error::UNEXPECTED_REPLY_CODE;

	#[test]
	fn no_content_succeeds_without_touching_the_body() {
		let value = classify(StatusCode::NO_CONTENT, b"not json")
			.expect("204 should succeed regardless of body.");

		assert_eq!(value, Value::Bool(true));
	}

	#[test]
	fn success_replies_parse_as_json() {
		let value = classify(StatusCode::OK, br#"{"id":7,"body":"hi"}"#)
			.expect("Well-formed 200 body should parse.");

		assert_eq!(value, json!({ "id": 7, "body": "hi" }));
	}

	#[test]
	fn error_replies_pass_the_platform_payload_through() {
		let err = classify(StatusCode::NOT_FOUND, br#"{"code":1,"message":"Not Found"}"#)
			.expect_err("404 should surface as an error.");

		match err {
			Error::Api { status, code, message, description } => {
				assert_eq!(status, 404);
				assert_eq!(code, 1);
				assert_eq!(message, "Not Found");
				assert_eq!(description, None);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn unparseable_success_bodies_surface_the_sentinel() {
		let err =
			classify(StatusCode::OK, b"not json").expect_err("Malformed 200 body should fail.");

		assert_eq!(err.code(), Some(UNEXPECTED_REPLY_CODE));

		match err {
			Error::UnexpectedReply { status, body, .. } => {
				assert_eq!(status, Some(200));
				assert_eq!(body, "not json");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn unparseable_error_bodies_surface_the_sentinel() {
		let err = classify(StatusCode::INTERNAL_SERVER_ERROR, b"<html>down</html>")
			.expect_err("Malformed 500 body should fail.");

		assert_eq!(err.code(), Some(UNEXPECTED_REPLY_CODE));
	}

	#[test]
	fn error_bodies_missing_the_payload_shape_surface_the_sentinel() {
		let err = classify(StatusCode::BAD_REQUEST, br#"{"detail":"nope"}"#)
			.expect_err("Shapeless 400 body should fail.");

		assert_eq!(err.code(), Some(UNEXPECTED_REPLY_CODE));
	}

	#[test]
	fn description_field_is_carried_when_present() {
		let body = br#"{"code":16,"message":"Rate limited","description":"Try later"}"#;
		let err = classify(StatusCode::TOO_MANY_REQUESTS, body)
			.expect_err("429 should surface as an error.");

		match err {
			Error::Api { description, .. } => assert_eq!(description.as_deref(), Some("Try later")),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
