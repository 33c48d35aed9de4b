//! Shared fixtures for screener tests: a ready-made `Config`, a small company corpus, and an
//! in-memory index that honours filters the same way the Qdrant backend does.

use std::env;

use serde_json::{Map, Value};

use screener_config::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Providers, Qdrant, Search, Service,
	Storage,
};
use screener_domain::{RetrievedDocument, SearchRequest};

pub const TEST_VECTOR_DIM: u32 = 4;

pub fn test_qdrant_url() -> Option<String> {
	env::var("SCREENER_QDRANT_URL").ok().filter(|url| !url.trim().is_empty())
}

pub fn test_config(qdrant_url: impl Into<String>, collection: impl Into<String>) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			qdrant: Qdrant {
				url: qdrant_url.into(),
				collection: collection.into(),
				vector_dim: TEST_VECTOR_DIM,
				api_key: None,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "test-embed".to_string(),
				dimensions: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			llm_extractor: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/chat/completions".to_string(),
				model: "test-chat".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		search: Search::default(),
	}
}

#[derive(Clone, Debug)]
pub struct Company {
	pub properties: Map<String, Value>,
	pub vector: Vec<f32>,
}

/// Eight listed companies across energy, security, education and defence.
pub fn sample_companies() -> Vec<Company> {
	let rows = [
		(
			"NEE",
			"NextEra Energy",
			"Utilities",
			"United States",
			&["ESG & Sustainability Analytics", "Energy Storage Solutions"][..],
			14_500.0,
			5.2,
			150_000.0,
			"Wind, solar and battery utility using AI-driven software for clean energy.",
			[0.9, 0.1, 0.3, 0.0],
		),
		(
			"ENPH",
			"Enphase Energy",
			"Technology",
			"United States",
			&["Solar Inverters & Home Energy Systems"][..],
			450.0,
			-40.0,
			14_000.0,
			"Microinverters and home energy systems for residential solar.",
			[0.6, 0.6, 0.0, 0.1],
		),
		(
			"FLNC",
			"Fluence Energy",
			"Industrials",
			"United States",
			&["Energy Storage Solutions", "Energy Management Software"][..],
			-30.0,
			23.0,
			3_000.0,
			"Grid-scale battery storage with AI-driven software for energy asset optimization.",
			[0.8, 0.2, 0.4, 0.0],
		),
		(
			"ORSTED",
			"Orsted",
			"Utilities",
			"Denmark",
			&["ESG & Sustainability Analytics"][..],
			4_000.0,
			10.0,
			20_000.0,
			"Offshore wind developer with sustainability analytics for clean energy reporting.",
			[0.85, 0.05, 0.2, 0.1],
		),
		(
			"CHPT",
			"ChargePoint",
			"Industrials",
			"United States",
			&["EV Charging Infrastructure"][..],
			-250.0,
			8.0,
			800.0,
			"EV charging network with fleet and home charging software.",
			[0.5, 0.5, 0.1, 0.2],
		),
		(
			"CRWD",
			"CrowdStrike",
			"Cybersecurity",
			"United States",
			&["Endpoint & Workload Protection / XDR"][..],
			700.0,
			30.0,
			80_000.0,
			"Cloud-native endpoint protection and threat intelligence platform.",
			[0.0, 0.1, 0.9, 0.4],
		),
		(
			"DUOL",
			"Duolingo",
			"EdTech",
			"United States",
			&["EdTech & Language Learning"][..],
			100.0,
			40.0,
			15_000.0,
			"Mobile language learning app with AI tutoring.",
			[0.1, 0.0, 0.2, 0.9],
		),
		(
			"PLTR",
			"Palantir",
			"Technology",
			"United States",
			&["Intelligence / Defense Software", "Enterprise AI Platforms"][..],
			400.0,
			20.0,
			100_000.0,
			"Data integration and AI platforms for government and enterprise.",
			[0.2, 0.2, 0.6, 0.5],
		),
	];

	rows
		.into_iter()
		.enumerate()
		.map(|(index, row)| {
			let (ticker, name, sector, country, themes, ebitda, growth, cap, summary, vector) = row;
			let mut properties = Map::new();

			properties.insert("_id".to_string(), Value::from((index + 1).to_string()));
			properties.insert("ticker".to_string(), Value::from(ticker));
			properties.insert("name".to_string(), Value::from(name));
			properties.insert("sector".to_string(), Value::from(sector));
			properties.insert("country".to_string(), Value::from(country));
			properties.insert("themes".to_string(), Value::from(themes.to_vec()));
			properties.insert("ebitda_musd".to_string(), Value::from(ebitda));
			properties.insert("rev_growth_pct".to_string(), Value::from(growth));
			properties.insert("market_cap_musd".to_string(), Value::from(cap));
			properties.insert("summary".to_string(), Value::from(summary));

			Company { properties, vector: vector.to_vec() }
		})
		.collect()
}

/// Brute-force search over `companies`.
///
/// Vector relevance is clamped cosine similarity. Keyword relevance is the share of query
/// terms found in the summary. Hybrid requests blend the two with the request's fusion weight.
#[derive(Clone, Debug)]
pub struct InMemoryIndex {
	pub companies: Vec<Company>,
}
impl InMemoryIndex {
	pub fn new(companies: Vec<Company>) -> Self {
		Self { companies }
	}

	pub fn search(&self, request: &SearchRequest) -> Vec<RetrievedDocument> {
		let terms: Vec<String> = request
			.keyword_text
			.as_deref()
			.unwrap_or_default()
			.split_whitespace()
			.map(str::to_lowercase)
			.collect();

		self.companies
			.iter()
			.filter(|company| {
				request.filter.as_ref().is_none_or(|filter| filter.evaluate(&company.properties))
			})
			.map(|company| {
				let vector_score = cosine(&request.vector, &company.vector).clamp(0.0, 1.0);
				let relevance = match request.fusion_weight {
					Some(alpha) => {
						let summary = company
							.properties
							.get("summary")
							.and_then(Value::as_str)
							.unwrap_or_default()
							.to_lowercase();
						let matched =
							terms.iter().filter(|term| summary.contains(term.as_str())).count();
						let keyword_score = if terms.is_empty() {
							0.0
						} else {
							matched as f32 / terms.len() as f32
						};

						alpha * vector_score + (1.0 - alpha) * keyword_score
					},
					None => vector_score,
				};

				RetrievedDocument { properties: company.properties.clone(), relevance }
			})
			.collect()
	}
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}

	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
	let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
	let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

	if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}
