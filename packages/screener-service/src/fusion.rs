//! Relevance scoring for the two retrieval channels.
//!
//! Hybrid search uses relative-score fusion: each channel is min-max normalized to `[0, 1]`
//! and the fused score is `alpha * vector + (1 - alpha) * keyword`. A document absent from a
//! channel contributes zero for it.

use std::{cmp::Ordering, collections::HashMap};

use screener_domain::{RetrievedDocument, SearchRequest};
use screener_storage::qdrant::SearchHit;

/// Keyword text and fusion weight when `request` asks for hybrid search.
pub fn hybrid_channel(request: &SearchRequest) -> Option<(&str, f32)> {
	request.keyword_text.as_deref().zip(request.fusion_weight)
}

/// Scores the dense channel alone, or fused with the keyword channel and its weight.
pub fn score_channels(
	dense: Vec<SearchHit>,
	keyword: Option<(Vec<SearchHit>, f32)>,
) -> Vec<RetrievedDocument> {
	match keyword {
		Some((keyword, alpha)) => relative_score_fusion(dense, keyword, alpha),
		None => vector_relevance(dense),
	}
}

pub fn relative_score_fusion(
	dense: Vec<SearchHit>,
	keyword: Vec<SearchHit>,
	alpha: f32,
) -> Vec<RetrievedDocument> {
	let alpha = alpha.clamp(0.0, 1.0);
	let dense_scores = normalize_scores(&dense);
	let keyword_scores = normalize_scores(&keyword);
	let mut order: Vec<String> = Vec::with_capacity(dense.len() + keyword.len());
	let mut fused: HashMap<String, (RetrievedDocument, f32)> = HashMap::new();

	for (hit, score) in dense.into_iter().zip(dense_scores) {
		let contribution = alpha * score;

		if let Some((_, total)) = fused.get_mut(&hit.id) {
			*total = total.max(contribution);

			continue;
		}

		order.push(hit.id.clone());
		fused.insert(
			hit.id,
			(RetrievedDocument { properties: hit.properties, relevance: 0.0 }, contribution),
		);
	}

	let mut keyword_best: HashMap<String, f32> = HashMap::new();

	for (hit, score) in keyword.into_iter().zip(keyword_scores) {
		let best = keyword_best.entry(hit.id.clone()).or_insert(0.0);

		*best = best.max(score);

		if !fused.contains_key(&hit.id) {
			order.push(hit.id.clone());
			fused.insert(
				hit.id,
				(RetrievedDocument { properties: hit.properties, relevance: 0.0 }, 0.0),
			);
		}
	}

	let mut out = Vec::with_capacity(order.len());

	for id in order {
		let Some((mut doc, vector_part)) = fused.remove(&id) else {
			continue;
		};
		let keyword_part = (1.0 - alpha) * keyword_best.get(&id).copied().unwrap_or(0.0);

		doc.relevance = (vector_part + keyword_part).clamp(0.0, 1.0);
		out.push(doc);
	}

	out.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(Ordering::Equal));

	out
}

/// Pure vector search: cosine similarity clamped into `[0, 1]`.
pub fn vector_relevance(dense: Vec<SearchHit>) -> Vec<RetrievedDocument> {
	dense
		.into_iter()
		.map(|hit| RetrievedDocument {
			properties: hit.properties,
			relevance: if hit.score.is_finite() { hit.score.clamp(0.0, 1.0) } else { 0.0 },
		})
		.collect()
}

/// Min-max normalization. A single hit, or a channel whose scores are all equal, maps to 1.0.
fn normalize_scores(hits: &[SearchHit]) -> Vec<f32> {
	let finite = hits.iter().map(|hit| hit.score).filter(|score| score.is_finite());
	let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), score| {
		(min.min(score), max.max(score))
	});
	let range = max - min;

	hits
		.iter()
		.map(|hit| {
			if !hit.score.is_finite() {
				0.0
			} else if range <= f32::EPSILON {
				1.0
			} else {
				(hit.score - min) / range
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use serde_json::{Map, Value};

	use super::*;

	fn hit(id: &str, score: f32) -> SearchHit {
		let mut properties = Map::new();

		properties.insert("ticker".to_string(), Value::String(id.to_string()));

		SearchHit { id: id.to_string(), properties, score }
	}

	fn relevance_of(docs: &[RetrievedDocument], ticker: &str) -> f32 {
		docs
			.iter()
			.find(|doc| doc.property_str("ticker") == Some(ticker))
			.map(|doc| doc.relevance)
			.unwrap_or(f32::NAN)
	}

	#[test]
	fn blends_channels_with_alpha() {
		let docs = relative_score_fusion(
			vec![hit("A", 0.9), hit("B", 0.5), hit("C", 0.1)],
			vec![hit("C", 12.0), hit("B", 2.0)],
			0.7,
		);

		// A: vector 1.0, keyword absent. B: vector 0.5, keyword 0.0. C: vector 0.0, keyword 1.0.
		assert!((relevance_of(&docs, "A") - 0.7).abs() < 1e-6);
		assert!((relevance_of(&docs, "B") - 0.35).abs() < 1e-6);
		assert!((relevance_of(&docs, "C") - 0.3).abs() < 1e-6);
		assert_eq!(docs[0].property_str("ticker"), Some("A"));
	}

	#[test]
	fn single_hit_channel_normalizes_to_one() {
		let docs = relative_score_fusion(vec![hit("A", 0.42)], vec![hit("A", 3.3)], 0.7);

		assert_eq!(docs.len(), 1);
		assert!((docs[0].relevance - 1.0).abs() < 1e-6);
	}

	#[test]
	fn keyword_only_documents_are_kept() {
		let docs = relative_score_fusion(Vec::new(), vec![hit("K", 1.0)], 0.7);

		assert!((relevance_of(&docs, "K") - 0.3).abs() < 1e-6);
	}

	fn request(keyword_text: Option<&str>, fusion_weight: Option<f32>) -> SearchRequest {
		SearchRequest {
			keyword_text: keyword_text.map(str::to_string),
			vector: vec![1.0, 0.0],
			filter: None,
			limit: 10,
			fusion_weight,
		}
	}

	#[test]
	fn hybrid_channel_requires_text_and_weight() {
		assert_eq!(
			hybrid_channel(&request(Some("battery storage"), Some(0.7))),
			Some(("battery storage", 0.7))
		);
		assert_eq!(hybrid_channel(&request(None, None)), None);
		assert_eq!(hybrid_channel(&request(Some("battery storage"), None)), None);
		assert_eq!(hybrid_channel(&request(None, Some(0.7))), None);
	}

	#[test]
	fn keyword_hits_switch_scoring_to_fusion() {
		let dense = vec![hit("A", 0.9), hit("B", 0.3)];
		let fused = score_channels(dense.clone(), Some((vec![hit("B", 5.0)], 0.7)));
		let vector_only = score_channels(dense, None);

		assert!((relevance_of(&fused, "A") - 0.7).abs() < 1e-6);
		assert!((relevance_of(&fused, "B") - 0.3).abs() < 1e-6);
		assert!((relevance_of(&vector_only, "A") - 0.9).abs() < 1e-6);
		assert!((relevance_of(&vector_only, "B") - 0.3).abs() < 1e-6);
	}

	#[test]
	fn pure_vector_scores_are_clamped() {
		let docs = vector_relevance(vec![hit("A", 1.2), hit("B", -0.3), hit("C", 0.4)]);
		let scores: Vec<f32> = docs.iter().map(|doc| doc.relevance).collect();

		assert_eq!(scores, vec![1.0, 0.0, 0.4]);
	}
}
