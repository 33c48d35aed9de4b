use qdrant_client::qdrant::{Document, Filter, Query, QueryPointsBuilder, ScoredPoint};
use serde_json::{Map, Value};

use crate::{Result, payload};

pub const DENSE_VECTOR_NAME: &str = "dense";
pub const SUMMARY_BM25_VECTOR_NAME: &str = "summary_bm25";
pub const BM25_MODEL: &str = "qdrant/bm25";

/// One company returned by a single retrieval channel.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
	/// Point id, used to join channels during fusion.
	pub id: String,
	pub properties: Map<String, Value>,
	/// Raw channel score: cosine similarity for the dense channel, BM25 for the keyword channel.
	pub score: f32,
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &screener_config::Qdrant) -> Result<Self> {
		let client =
			qdrant_client::Qdrant::from_url(&cfg.url).api_key(cfg.api_key.clone()).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Dense nearest-neighbour channel under a hard pre-filter.
	pub async fn nearest(
		&self,
		vector: &[f32],
		filter: Option<&Filter>,
		limit: u32,
	) -> Result<Vec<SearchHit>> {
		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.using(DENSE_VECTOR_NAME)
			.with_payload(true)
			.limit(limit as u64);

		if let Some(filter) = filter {
			search = search.filter(filter.clone());
		}

		let response = self.client.query(search).await?;
		let hits = collect_hits(response.result);

		tracing::debug!(channel = "dense", hits = hits.len(), "Qdrant channel returned.");

		Ok(hits)
	}

	/// BM25 keyword channel over the company summary only.
	pub async fn keyword(
		&self,
		text: &str,
		filter: Option<&Filter>,
		limit: u32,
	) -> Result<Vec<SearchHit>> {
		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(Document::new(text.to_string(), BM25_MODEL)))
			.using(SUMMARY_BM25_VECTOR_NAME)
			.with_payload(true)
			.limit(limit as u64);

		if let Some(filter) = filter {
			search = search.filter(filter.clone());
		}

		let response = self.client.query(search).await?;
		let hits = collect_hits(response.result);

		tracing::debug!(channel = "bm25", hits = hits.len(), "Qdrant channel returned.");

		Ok(hits)
	}
}

fn collect_hits(points: Vec<ScoredPoint>) -> Vec<SearchHit> {
	let mut hits = Vec::with_capacity(points.len());

	for point in points {
		let Some(id) = point.id.as_ref().and_then(payload::point_id_to_string) else {
			tracing::warn!("Qdrant point is missing an id.");

			continue;
		};
		let properties = payload::payload_to_properties(point.id.as_ref(), &point.payload);

		hits.push(SearchHit { id, properties, score: point.score });
	}

	hits
}
