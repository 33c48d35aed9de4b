//! Query resolution core for the investment screener: taxonomy, structured queries, the Query
//! Normalizer and Filter Builder, retrieval planning, and the per-request pipeline state.
//!
//! Nothing in this crate performs I/O.

pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod query;
pub mod retrieval;
pub mod taxonomy;

mod error;

pub use error::{Error, Result};
pub use filter::{FilterClause, FilterExpression, FilterField, FilterOperator, FilterValue};
pub use normalizer::NormalizedQuery;
pub use pipeline::{NO_RESULTS_MESSAGE, PipelineStage, PipelineState};
pub use query::{StructuredQuery, structured_query_schema};
pub use retrieval::{RetrievedDocument, SearchRequest};
pub use taxonomy::{Sector, Theme, ThemeGroup};
