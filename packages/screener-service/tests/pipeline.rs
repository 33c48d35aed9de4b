use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::Value;

use screener_config::{EmbeddingProviderConfig, LlmProviderConfig};
use screener_domain::{
	FilterField, FilterOperator, PipelineStage, RetrievedDocument, SearchRequest,
	pipeline::NO_RESULTS_MESSAGE,
};
use screener_service::{
	BoxFuture, Collaborators, EmbeddingProvider, Error, ExtractorProvider, ScreenerService,
	SearchBackend,
};
use screener_testkit::{InMemoryIndex, TEST_VECTOR_DIM, sample_companies, test_config};

struct StubExtractor {
	payload: Value,
	calls: AtomicUsize,
}
impl ExtractorProvider for StubExtractor {
	fn extract<'a>(
		&'a self,
		_: &'a LlmProviderConfig,
		messages: &'a [Value],
		schema: &'a Value,
	) -> BoxFuture<'a, screener_providers::Result<Value>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		assert_eq!(messages.len(), 2);
		assert!(schema["properties"].get("theme").is_some());

		let payload = self.payload.clone();

		Box::pin(async move { Ok(payload) })
	}
}

struct StubEmbedding {
	dims: usize,
	calls: AtomicUsize,
}
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		_: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, screener_providers::Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let mut vector = vec![0.0; self.dims];

		if let Some(first) = vector.first_mut() {
			*first = 1.0;
		}

		let vectors = texts.iter().map(|_| vector.clone()).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

struct SpyBackend {
	index: InMemoryIndex,
	requests: Mutex<Vec<SearchRequest>>,
}
impl SearchBackend for SpyBackend {
	fn search<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> BoxFuture<'a, screener_service::Result<Vec<RetrievedDocument>>> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request.clone());

		let docs = self.index.search(request);

		Box::pin(async move { Ok(docs) })
	}
}

struct DownBackend;
impl SearchBackend for DownBackend {
	fn search<'a>(
		&'a self,
		_: &'a SearchRequest,
	) -> BoxFuture<'a, screener_service::Result<Vec<RetrievedDocument>>> {
		Box::pin(async {
			Err(Error::BackendConnection { message: "connection refused".to_string() })
		})
	}
}

struct Harness {
	service: ScreenerService,
	extractor: Arc<StubExtractor>,
	embedding: Arc<StubEmbedding>,
	backend: Arc<SpyBackend>,
}

fn harness(payload: Value) -> Harness {
	harness_with_dims(payload, TEST_VECTOR_DIM as usize)
}

fn harness_with_dims(payload: Value, dims: usize) -> Harness {
	let extractor = Arc::new(StubExtractor { payload, calls: AtomicUsize::new(0) });
	let embedding = Arc::new(StubEmbedding { dims, calls: AtomicUsize::new(0) });
	let backend = Arc::new(SpyBackend {
		index: InMemoryIndex::new(sample_companies()),
		requests: Mutex::new(Vec::new()),
	});
	let service = ScreenerService::with_collaborators(
		test_config("http://127.0.0.1:6334", "companies"),
		Collaborators::new(extractor.clone(), embedding.clone(), backend.clone()),
	);

	Harness { service, extractor, embedding, backend }
}

fn recorded_requests(backend: &SpyBackend) -> Vec<SearchRequest> {
	backend.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
}

fn tickers(docs: &[RetrievedDocument]) -> Vec<&str> {
	docs.iter().filter_map(|doc| doc.property_str("ticker")).collect()
}

#[tokio::test]
async fn utilities_request_runs_hybrid_search_under_theme_filter() {
	let h = harness(serde_json::json!({
		"sector": "Utilities",
		"theme": "ESG & Sustainability Analytics",
		"keywords": ["AI-driven software", "clean energy"],
		"keyword_query": "ai driven software clean energy",
		"country": null,
		"ebitda_min": null,
		"revenue_min": null,
		"rev_growth_min": null,
		"market_cap_min": null,
		"budget": null
	}));
	let state = h
		.service
		.resolve_and_retrieve("utilities companies with AI-driven software for clean energy")
		.await
		.expect("Pipeline failed.");

	assert_eq!(state.stage, PipelineStage::Done);
	assert!(!state.needs_clarification);
	assert_eq!(
		state.concepts,
		vec!["AI-driven software", "clean energy", "ESG & Sustainability Analytics", "Utilities"]
	);

	let filter = state.filter_expression.as_ref().expect("Expected a filter.");
	let clauses = filter.clauses();

	assert_eq!(clauses.len(), 1);
	assert_eq!(clauses[0].field, FilterField::Themes);
	assert_eq!(clauses[0].operator, FilterOperator::Contains);

	let requests = recorded_requests(&h.backend);

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].keyword_text.as_deref(), Some("ai driven software clean energy"));
	assert_eq!(requests[0].fusion_weight, Some(0.7));
	assert_eq!(requests[0].vector.len(), TEST_VECTOR_DIM as usize);

	let found = tickers(&state.retrieved_documents);

	assert_eq!(found.len(), 2);
	assert!(found.contains(&"NEE"));
	assert!(found.contains(&"ORSTED"));
	assert!(
		state.retrieved_documents.windows(2).all(|pair| pair[0].relevance >= pair[1].relevance)
	);
	assert_eq!(state.error, None);
}

#[tokio::test]
async fn missing_theme_stops_for_clarification() {
	let h = harness(serde_json::json!({
		"sector": "Technology",
		"theme": null,
		"keywords": ["good companies"],
		"budget": 50
	}));
	let state =
		h.service.resolve_and_retrieve("good tech companies").await.expect("Pipeline failed.");

	assert_eq!(state.stage, PipelineStage::Clarifying);
	assert!(state.needs_clarification);
	assert_eq!(state.budget, Some(50.0));
	assert!(state.concepts.is_empty());
	assert_eq!(h.embedding.calls.load(Ordering::SeqCst), 0);
	assert!(recorded_requests(&h.backend).is_empty());
}

#[tokio::test]
async fn theme_without_keywords_runs_pure_vector_search() {
	let h = harness(serde_json::json!({
		"theme": "EV Charging Infrastructure",
		"keywords": [],
		"keyword_query": null
	}));
	let state = h.service.resolve_and_retrieve("EV charging").await.expect("Pipeline failed.");
	let requests = recorded_requests(&h.backend);

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].keyword_text, None);
	assert_eq!(requests[0].fusion_weight, None);
	assert_eq!(tickers(&state.retrieved_documents), vec!["CHPT"]);
	assert_eq!(state.embedding_text.as_deref(), Some("EV Charging Infrastructure"));
}

#[tokio::test]
async fn thresholds_narrow_the_candidates() {
	let h = harness(serde_json::json!({
		"theme": "Energy Storage Solutions",
		"keywords": ["battery storage"],
		"ebitda_min": 1000
	}));
	let state = h
		.service
		.resolve_and_retrieve("profitable battery storage")
		.await
		.expect("Pipeline failed.");

	assert_eq!(tickers(&state.retrieved_documents), vec!["NEE"]);

	let structured = state.structured_query.as_ref().expect("Expected a structured query.");

	assert_eq!(structured.rev_growth_min, Some(0.0));
	assert_eq!(structured.market_cap_min, Some(0.0));
}

#[tokio::test]
async fn no_matches_is_a_soft_result() {
	let h = harness(serde_json::json!({
		"theme": "BNPL & Alternative Consumer Finance",
		"keywords": ["buy now pay later"]
	}));
	let state = h.service.resolve_and_retrieve("BNPL lenders").await.expect("Pipeline failed.");

	assert_eq!(state.stage, PipelineStage::Done);
	assert!(state.retrieved_documents.is_empty());
	assert_eq!(state.error.as_deref(), Some(NO_RESULTS_MESSAGE));
}

#[tokio::test]
async fn schema_invalid_extraction_is_fatal_and_not_retried() {
	let h = harness(serde_json::json!({ "theme": "Underwater Basket Weaving" }));
	let err = h.service.resolve_and_retrieve("baskets").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::Extraction { .. }));
	assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn negative_threshold_is_an_extraction_error() {
	let h = harness(serde_json::json!({
		"theme": "Agentic AI Platforms",
		"ebitda_min": -5
	}));
	let err = h.service.resolve_and_retrieve("agents").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::Extraction { .. }));
}

#[tokio::test]
async fn wrong_embedding_dimension_is_fatal() {
	let h = harness_with_dims(
		serde_json::json!({ "theme": "Agentic AI Platforms", "keywords": ["agents"] }),
		TEST_VECTOR_DIM as usize + 1,
	);
	let err =
		h.service.resolve_and_retrieve("agent platforms").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::Embedding { .. }));
	assert!(recorded_requests(&h.backend).is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_a_connection_error() {
	let extractor = Arc::new(StubExtractor {
		payload: serde_json::json!({ "theme": "GovTech Suites (State/Local)" }),
		calls: AtomicUsize::new(0),
	});
	let embedding =
		Arc::new(StubEmbedding { dims: TEST_VECTOR_DIM as usize, calls: AtomicUsize::new(0) });
	let service = ScreenerService::with_collaborators(
		test_config("http://127.0.0.1:6334", "companies"),
		Collaborators::new(extractor, embedding, Arc::new(DownBackend)),
	);
	let err = service.resolve_and_retrieve("govtech").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::BackendConnection { .. }));
}

#[tokio::test]
async fn blank_query_is_rejected_before_extraction() {
	let h = harness(serde_json::json!({}));
	let err = h.service.resolve_and_retrieve("   ").await.expect_err("Expected failure.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert_eq!(h.extractor.calls.load(Ordering::SeqCst), 0);
}
