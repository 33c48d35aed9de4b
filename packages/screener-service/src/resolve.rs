use tracing::Instrument;
use uuid::Uuid;

use screener_domain::{PipelineStage, PipelineState, StructuredQuery, structured_query_schema};

use crate::{Error, Result, ScreenerService, extraction};

const QUERY_DIGEST_LEN: usize = 16;

impl ScreenerService {
	/// Runs extraction, normalization and retrieval for one request.
	///
	/// Fatal errors are returned as `Err`. A query without a theme stops in `Clarifying`, and a
	/// search with nothing above the relevance gate ends in `Done` with `error` set.
	pub async fn resolve_and_retrieve(&self, raw_query: &str) -> Result<PipelineState> {
		let text = raw_query.trim();

		if text.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let request_id = Uuid::new_v4();
		let digest = blake3::hash(text.as_bytes()).to_hex();
		let span = tracing::info_span!(
			"resolve_and_retrieve",
			%request_id,
			query_digest = &digest.as_str()[..QUERY_DIGEST_LEN],
		);

		async move {
			let mut state = PipelineState::new(text);

			match self.run_pipeline(&mut state).await {
				Ok(()) => {
					tracing::info!(
						stage = %state.stage,
						documents = state.retrieved_documents.len(),
						needs_clarification = state.needs_clarification,
						"Pipeline finished."
					);

					Ok(state)
				},
				Err(err) => {
					let failed_at = state.stage;

					state.fail(err.to_string());

					tracing::warn!(
						%failed_at,
						stage = %state.stage,
						error = state.error.as_deref().unwrap_or_default(),
						"Pipeline failed."
					);

					Err(err)
				},
			}
		}
		.instrument(span)
		.await
	}

	async fn run_pipeline(&self, state: &mut PipelineState) -> Result<()> {
		let query = self.extract_query(&state.user_query).await?;

		state.apply_extraction(query)?;

		if state.stage == PipelineStage::Clarifying {
			tracing::info!("Query has no theme; asking for clarification.");

			return Ok(());
		}

		state.normalize()?;

		tracing::debug!(
			concepts = state.concepts.len(),
			has_filter = state.filter_expression.is_some(),
			"Query normalized."
		);

		if let Some(text) = state.embedding_text.clone() {
			let vector = self.embed_query(text).await?;

			state.attach_embedding(vector)?;
		}

		let search = &self.cfg.search;
		let request = state.search_request(search.limit, search.fusion_weight)?;

		tracing::debug!(
			hybrid = request.is_hybrid(),
			limit = request.limit,
			"Searching companies."
		);

		let candidates = self.collaborators.search.search(&request).await?;

		state.complete_retrieval(candidates, search.relevance_gate, search.limit)?;

		Ok(())
	}

	async fn extract_query(&self, user_text: &str) -> Result<StructuredQuery> {
		let messages = extraction::build_extraction_messages(user_text);
		let schema = structured_query_schema();
		let raw = self
			.collaborators
			.extractor
			.extract(&self.cfg.providers.llm_extractor, &messages, &schema)
			.await
			.map_err(|err| Error::Extraction { message: err.to_string() })?;

		StructuredQuery::from_json(raw)
			.map_err(|err| Error::Extraction { message: err.to_string() })
	}

	async fn embed_query(&self, text: String) -> Result<Vec<f32>> {
		let texts = vec![text];
		let vectors = self
			.collaborators
			.embedding
			.embed(&self.cfg.providers.embedding, &texts)
			.await
			.map_err(|err| Error::Embedding { message: err.to_string() })?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Embedding { message: "Embedding response is empty.".to_string() });
		};

		screener_providers::embedding::check_dimension(&vector, self.cfg.storage.qdrant.vector_dim)
			.map_err(|err| Error::Embedding { message: err.to_string() })?;

		Ok(vector)
	}
}
