pub mod fusion;
pub mod resolve;

mod error;
mod extraction;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use screener_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use screener_domain::{RetrievedDocument, SearchRequest};
use screener_providers::{embedding, extractor};
use screener_storage::qdrant::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ExtractorProvider
where
	Self: Send + Sync,
{
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		schema: &'a Value,
	) -> BoxFuture<'a, screener_providers::Result<Value>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, screener_providers::Result<Vec<Vec<f32>>>>;
}

/// Filtered nearest-neighbour and hybrid search over the company index.
///
/// Returned documents carry relevance in `[0, 1]`; gating and ordering happen afterwards.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> BoxFuture<'a, Result<Vec<RetrievedDocument>>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub extractor: Arc<dyn ExtractorProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub search: Arc<dyn SearchBackend>,
}
impl Collaborators {
	pub fn new(
		extractor: Arc<dyn ExtractorProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
		search: Arc<dyn SearchBackend>,
	) -> Self {
		Self { extractor, embedding, search }
	}
}

pub struct ScreenerService {
	pub cfg: Config,
	pub collaborators: Collaborators,
}
impl ScreenerService {
	pub fn new(cfg: Config, qdrant: QdrantStore) -> Self {
		let providers = Arc::new(DefaultProviders);
		let search = Arc::new(QdrantBackend { store: qdrant, candidate_k: cfg.search.candidate_k });

		Self {
			cfg,
			collaborators: Collaborators {
				extractor: providers.clone(),
				embedding: providers,
				search,
			},
		}
	}

	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		Self { cfg, collaborators }
	}

	/// Builds the Qdrant client from `cfg` and wires the HTTP providers.
	pub fn connect(cfg: Config) -> Result<Self> {
		let qdrant = QdrantStore::new(&cfg.storage.qdrant)
			.map_err(|err| Error::Configuration { message: err.to_string() })?;

		Ok(Self::new(cfg, qdrant))
	}
}

struct DefaultProviders;
impl ExtractorProvider for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		schema: &'a Value,
	) -> BoxFuture<'a, screener_providers::Result<Value>> {
		Box::pin(extractor::extract(cfg, messages, schema))
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, screener_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

/// Runs the dense and BM25 channels against Qdrant and fuses them client-side.
pub struct QdrantBackend {
	pub store: QdrantStore,
	/// Per-channel depth before fusion and gating.
	pub candidate_k: u32,
}
impl QdrantBackend {
	async fn run(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>> {
		let filter =
			request.filter.as_ref().map(screener_storage::filter::to_qdrant_filter).transpose()?;
		let depth = self.candidate_k.max(request.limit);
		let dense = self.store.nearest(&request.vector, filter.as_ref(), depth).await?;
		let keyword = match fusion::hybrid_channel(request) {
			Some((text, alpha)) => {
				let hits = self.store.keyword(text, filter.as_ref(), depth).await?;

				tracing::debug!(
					dense_hits = dense.len(),
					keyword_hits = hits.len(),
					alpha,
					"Fusing hybrid channels."
				);

				Some((hits, alpha))
			},
			None => None,
		};

		Ok(fusion::score_channels(dense, keyword))
	}
}

impl SearchBackend for QdrantBackend {
	fn search<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> BoxFuture<'a, Result<Vec<RetrievedDocument>>> {
		Box::pin(self.run(request))
	}
}
