use serde_json::Value;

const SYSTEM_PROMPT: &str = "\
You are an assistant that extracts a structured screening query for an investment-search engine. \
Call the extract_query tool with the JSON schema provided. Use only sector and theme values from \
the schema enums. If a field is absent or unclear, return null for that field. Do not invent \
numbers. Amounts are in USD millions and growth is in percent. keyword_query is the request in \
lower case without stop words.";

pub(crate) fn build_extraction_messages(user_text: &str) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_text }),
	]
}
