use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, FilterExpression, Result};

pub const DEFAULT_RELEVANCE_GATE: f32 = 0.01;

/// What the search collaborator is asked to run.
///
/// `fusion_weight` is set only for hybrid queries; a pure nearest-neighbour query carries none.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
	pub keyword_text: Option<String>,
	pub vector: Vec<f32>,
	pub filter: Option<FilterExpression>,
	pub limit: u32,
	pub fusion_weight: Option<f32>,
}
impl SearchRequest {
	/// Chooses hybrid search when both a keyword string and a vector exist, pure vector search
	/// when only the vector exists, and refuses to invent a query otherwise.
	pub fn plan(
		keyword_text: Option<&str>,
		vector: Option<&[f32]>,
		filter: Option<FilterExpression>,
		limit: u32,
		fusion_weight: f32,
	) -> Result<Self> {
		let vector = match vector {
			Some(vector) if !vector.is_empty() => vector.to_vec(),
			_ => return Err(Error::MissingRetrievalInput),
		};
		let keyword_text =
			keyword_text.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string);
		let fusion_weight = keyword_text.as_ref().map(|_| fusion_weight);

		Ok(Self { keyword_text, vector, filter, limit, fusion_weight })
	}

	pub fn is_hybrid(&self) -> bool {
		self.fusion_weight.is_some()
	}
}

/// A company property bag with its fused relevance in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
	pub properties: Map<String, Value>,
	pub relevance: f32,
}
impl RetrievedDocument {
	pub fn property_str(&self, key: &str) -> Option<&str> {
		self.properties.get(key).and_then(Value::as_str)
	}
}

/// Drops candidates at or below the gate, orders the rest by descending relevance, and caps
/// the list at `limit`. Ties keep backend order.
pub fn assemble_results(
	candidates: Vec<RetrievedDocument>,
	relevance_gate: f32,
	limit: u32,
) -> Vec<RetrievedDocument> {
	let mut kept: Vec<RetrievedDocument> = candidates
		.into_iter()
		.filter(|doc| doc.relevance.is_finite() && doc.relevance > relevance_gate)
		.collect();

	kept.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(Ordering::Equal));
	kept.truncate(limit as usize);

	kept
}
