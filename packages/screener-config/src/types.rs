use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	/// Name of the company collection searched by the retriever.
	pub collection: String,
	pub vector_dim: u32,
	/// Optional. Blank values are treated as absent.
	pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm_extractor: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default)]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Maximum number of documents returned to the caller.
	pub limit: u32,
	/// Weight of the vector channel in hybrid fusion. The keyword channel receives the rest.
	pub fusion_weight: f32,
	/// Documents must score strictly above this value to be kept.
	pub relevance_gate: f32,
	/// Depth of each retrieval channel before fusion.
	pub candidate_k: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { limit: 10, fusion_weight: 0.7, relevance_gate: 0.01, candidate_k: 50 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
