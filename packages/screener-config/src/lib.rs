mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Providers, Qdrant, Search, Service, Storage,
};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address such as 127.0.0.1:8000."
				.to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, api_base, api_key) in [
		(
			"embedding",
			&cfg.providers.embedding.api_base,
			&cfg.providers.embedding.api_key,
		),
		(
			"llm_extractor",
			&cfg.providers.llm_extractor.api_base,
			&cfg.providers.llm_extractor.api_key,
		),
	] {
		if api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_base must be non-empty."),
			});
		}
		if api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	let temperature = cfg.providers.llm_extractor.temperature;

	if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
		return Err(Error::Validation {
			message: "providers.llm_extractor.temperature must be in the range 0.0-2.0."
				.to_string(),
		});
	}
	if cfg.search.limit == 0 {
		return Err(Error::Validation {
			message: "search.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.candidate_k < cfg.search.limit {
		return Err(Error::Validation {
			message: "search.candidate_k must be greater than or equal to search.limit."
				.to_string(),
		});
	}
	if !cfg.search.fusion_weight.is_finite() {
		return Err(Error::Validation {
			message: "search.fusion_weight must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.fusion_weight) {
		return Err(Error::Validation {
			message: "search.fusion_weight must be in the range 0.0-1.0.".to_string(),
		});
	}
	if !cfg.search.relevance_gate.is_finite() {
		return Err(Error::Validation {
			message: "search.relevance_gate must be a finite number.".to_string(),
		});
	}
	if !(0.0..1.0).contains(&cfg.search.relevance_gate) {
		return Err(Error::Validation {
			message: "search.relevance_gate must be zero or greater and less than 1.0."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.qdrant.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.storage.qdrant.api_key = None;
	}

	for api_base in
		[&mut cfg.providers.embedding.api_base, &mut cfg.providers.llm_extractor.api_base]
	{
		let trimmed = api_base.trim().trim_end_matches('/').to_string();

		*api_base = trimmed;
	}
}
