use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

pub const EXTRACT_TOOL_NAME: &str = "extract_query";

/// Calls the chat-completions endpoint with a single forced tool whose parameters are
/// `schema`, and returns the tool arguments as JSON.
///
/// Malformed output is reported, never retried.
pub async fn extract(
	cfg: &screener_config::LlmProviderConfig,
	messages: &[Value],
	schema: &Value,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = request_body(cfg, messages, schema);
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_extractor_json(json)
}

fn request_body(
	cfg: &screener_config::LlmProviderConfig,
	messages: &[Value],
	schema: &Value,
) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
		"tools": [{
			"type": "function",
			"function": {
				"name": EXTRACT_TOOL_NAME,
				"description": "Return the structured screening query extracted from the request.",
				"parameters": schema,
			}
		}],
		"tool_choice": { "type": "function", "function": { "name": EXTRACT_TOOL_NAME } },
	})
}

fn parse_extractor_json(json: Value) -> Result<Value> {
	let Some(choices) = json.get("choices") else {
		if json.is_object() {
			return Ok(json);
		}

		return Err(Error::InvalidResponse {
			message: "Extractor response is missing JSON content.".to_string(),
		});
	};
	let message = choices
		.as_array()
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Extractor response has no message.".to_string(),
		})?;
	let arguments = message
		.get("tool_calls")
		.and_then(|v| v.as_array())
		.and_then(|calls| calls.first())
		.and_then(|call| call.get("function"))
		.and_then(|function| function.get("arguments"));

	match arguments {
		Some(Value::String(raw)) => return parse_object(raw, "tool arguments"),
		Some(Value::Object(map)) => return Ok(Value::Object(map.clone())),
		_ => {},
	}

	if let Some(content) = message.get("content").and_then(|c| c.as_str()) {
		return parse_object(content, "content");
	}

	Err(Error::InvalidResponse {
		message: "Extractor response is missing JSON content.".to_string(),
	})
}

fn parse_object(raw: &str, source: &str) -> Result<Value> {
	let parsed: Value = serde_json::from_str(raw).map_err(|_| Error::InvalidResponse {
		message: format!("Extractor {source} is not valid JSON."),
	})?;

	if !parsed.is_object() {
		return Err(Error::InvalidResponse {
			message: format!("Extractor {source} must be a JSON object."),
		});
	}

	Ok(parsed)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefers_tool_call_arguments() {
		let json = serde_json::json!({
			"choices": [{
				"message": {
					"content": "{\"theme\": \"ignored\"}",
					"tool_calls": [{
						"type": "function",
						"function": {
							"name": "extract_query",
							"arguments": "{\"theme\": \"Energy Storage Solutions\"}"
						}
					}]
				}
			}]
		});
		let parsed = parse_extractor_json(json).expect("parse failed");

		assert_eq!(parsed["theme"], "Energy Storage Solutions");
	}

	#[test]
	fn falls_back_to_content_json() {
		let json = serde_json::json!({
			"choices": [{ "message": { "content": "{\"keywords\": [\"solar\"]}" } }]
		});
		let parsed = parse_extractor_json(json).expect("parse failed");

		assert!(parsed.get("keywords").is_some());
	}

	#[test]
	fn rejects_prose_content() {
		let json = serde_json::json!({
			"choices": [{ "message": { "content": "I could not find a query." } }]
		});

		assert!(matches!(parse_extractor_json(json), Err(Error::InvalidResponse { .. })));
	}

	#[test]
	fn accepts_a_bare_object() {
		let parsed =
			parse_extractor_json(serde_json::json!({ "sector": null })).expect("parse failed");

		assert!(parsed.get("sector").is_some());
	}
}
