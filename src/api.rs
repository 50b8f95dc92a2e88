//! HTTP client for the knowledge-graph service.

use gloo_net::http::Request;
use log::info;

use crate::components::knowledge_graph::GraphPayload;

/// Default service address, matching the backend's development bind.
const DEFAULT_API_BASE: &str = "http://127.0.0.1:5001";

/// Base URL of the knowledge-graph service, overridable at build time.
pub fn api_base() -> &'static str {
	option_env!("KNOWLEDGE_GRAPH_API_BASE").unwrap_or(DEFAULT_API_BASE)
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueryError {
	EmptyQuery,
	Network(String),
	Http { status: u16, body: String },
	Decode(String),
}

impl std::fmt::Display for QueryError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			QueryError::EmptyQuery => write!(f, "enter a search term"),
			QueryError::Network(msg) => write!(f, "request failed: {msg}"),
			QueryError::Http { status, body } => {
				write!(f, "request failed with status {status}: {body}")
			}
			QueryError::Decode(msg) => write!(f, "could not decode response: {msg}"),
		}
	}
}

impl std::error::Error for QueryError {}

/// Reject blank input before any network activity happens.
pub fn validate_query(query: &str) -> Result<&str, QueryError> {
	let trimmed = query.trim();
	if trimmed.is_empty() {
		return Err(QueryError::EmptyQuery);
	}
	Ok(trimmed)
}

pub fn related_words_url(base: &str, query: &str) -> String {
	format!(
		"{base}/api/get_related_words?query={}",
		urlencoding::encode(query)
	)
}

/// Fetch the terms related to `query` as a graph payload.
///
/// No retry, no timeout; an overlapping request is not cancelled, so the
/// last response to arrive wins.
pub async fn fetch_related_words(query: &str) -> Result<GraphPayload, QueryError> {
	let query = validate_query(query)?;
	let url = related_words_url(api_base(), query);

	let response = Request::get(&url)
		.header("Accept", "application/json")
		.send()
		.await
		.map_err(|e| QueryError::Network(e.to_string()))?;

	if !response.ok() {
		let body = response.text().await.unwrap_or_default();
		return Err(QueryError::Http {
			status: response.status(),
			body,
		});
	}

	let text = response
		.text()
		.await
		.map_err(|e| QueryError::Network(e.to_string()))?;
	let payload: GraphPayload =
		serde_json::from_str(&text).map_err(|e| QueryError::Decode(e.to_string()))?;
	info!(
		"api: received {} nodes, {} links",
		payload.nodes.len(),
		payload.links.len()
	);
	Ok(payload)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_blank_queries_are_rejected_before_any_request() {
		assert_eq!(validate_query(""), Err(QueryError::EmptyQuery));
		assert_eq!(validate_query("   "), Err(QueryError::EmptyQuery));
		assert_eq!(validate_query("\t\n"), Err(QueryError::EmptyQuery));
	}

	#[test]
	fn test_query_is_trimmed() {
		assert_eq!(validate_query("  apple  "), Ok("apple"));
	}

	#[test]
	fn test_url_percent_encodes_query() {
		let url = related_words_url("http://127.0.0.1:5001", "shohei ohtani");
		assert_eq!(
			url,
			"http://127.0.0.1:5001/api/get_related_words?query=shohei%20ohtani"
		);

		let url = related_words_url("http://127.0.0.1:5001", "a&b=c");
		assert!(!url.contains("a&b"));
		assert!(url.ends_with("query=a%26b%3Dc"));
	}

	#[test]
	fn test_http_error_message_contains_status_code() {
		let err = QueryError::Http {
			status: 502,
			body: "bad gateway".into(),
		};
		let msg = err.to_string();
		assert!(msg.contains("502"));
		assert!(msg.contains("bad gateway"));
	}

	#[test]
	fn test_empty_query_message_prompts_for_input() {
		assert_eq!(QueryError::EmptyQuery.to_string(), "enter a search term");
	}
}
