//! Per-request pipeline state and its transitions.
//!
//! ```text
//! Pending -> Clarifying                      (no theme extracted)
//! Pending -> Normalizing -> Retrieving -> Done
//! any non-terminal stage -> Failed
//! ```

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
	Error, FilterExpression, Result, RetrievedDocument, SearchRequest, StructuredQuery,
	normalizer, retrieval,
};

pub const NO_RESULTS_MESSAGE: &str = "No documents found matching the query.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
	Pending,
	Clarifying,
	Normalizing,
	Retrieving,
	Done,
	Failed,
}
impl PipelineStage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Clarifying => "clarifying",
			Self::Normalizing => "normalizing",
			Self::Retrieving => "retrieving",
			Self::Done => "done",
			Self::Failed => "failed",
		}
	}

	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Clarifying | Self::Done | Self::Failed)
	}
}
impl Display for PipelineStage {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct PipelineState {
	pub user_query: String,
	pub stage: PipelineStage,
	pub structured_query: Option<StructuredQuery>,
	pub budget: Option<f64>,
	pub needs_clarification: bool,
	pub filter_expression: Option<FilterExpression>,
	#[serde(skip)]
	pub embedding_vector: Option<Vec<f32>>,
	pub embedding_text: Option<String>,
	pub concepts: Vec<String>,
	pub retrieved_documents: Vec<RetrievedDocument>,
	pub error: Option<String>,
}
impl PipelineState {
	pub fn new(user_query: impl Into<String>) -> Self {
		Self {
			user_query: user_query.into(),
			stage: PipelineStage::Pending,
			structured_query: None,
			budget: None,
			needs_clarification: false,
			filter_expression: None,
			embedding_vector: None,
			embedding_text: None,
			concepts: Vec::new(),
			retrieved_documents: Vec::new(),
			error: None,
		}
	}

	pub fn is_terminal(&self) -> bool {
		self.stage.is_terminal()
	}

	/// Records the extracted query and decides whether the user must clarify.
	///
	/// Clarification is required exactly when no theme was extracted.
	pub fn apply_extraction(&mut self, query: StructuredQuery) -> Result<()> {
		let needs_clarification = query.theme.is_none();
		let next = if needs_clarification {
			PipelineStage::Clarifying
		} else {
			PipelineStage::Normalizing
		};

		self.expect_stage(PipelineStage::Pending, next)?;

		self.budget = query.budget;
		self.needs_clarification = needs_clarification;
		self.structured_query = Some(query);
		self.stage = next;

		Ok(())
	}

	/// Normalizes the held query in place and records the filter, concepts and embedding text.
	pub fn normalize(&mut self) -> Result<()> {
		self.expect_stage(PipelineStage::Normalizing, PipelineStage::Retrieving)?;

		let Some(query) = self.structured_query.as_ref() else {
			return Err(Error::InvalidTransition {
				from: self.stage,
				to: PipelineStage::Retrieving,
			});
		};
		let normalized = normalizer::normalize(query)?;

		self.structured_query = Some(normalized.query);
		self.filter_expression = normalized.filter;
		self.concepts = normalized.concepts;
		self.embedding_text = normalized.embedding_text;
		self.stage = PipelineStage::Retrieving;

		Ok(())
	}

	pub fn attach_embedding(&mut self, vector: Vec<f32>) -> Result<()> {
		self.expect_stage(PipelineStage::Retrieving, PipelineStage::Retrieving)?;

		self.embedding_vector = Some(vector);

		Ok(())
	}

	pub fn search_request(&self, limit: u32, fusion_weight: f32) -> Result<SearchRequest> {
		self.expect_stage(PipelineStage::Retrieving, PipelineStage::Retrieving)?;

		let keyword_text = self.structured_query.as_ref().and_then(StructuredQuery::keyword_text);

		SearchRequest::plan(
			keyword_text.as_deref(),
			self.embedding_vector.as_deref(),
			self.filter_expression.clone(),
			limit,
			fusion_weight,
		)
	}

	/// Gates and orders backend candidates. An empty result is recorded in `error` and the
	/// pipeline still finishes in `Done`.
	pub fn complete_retrieval(
		&mut self,
		candidates: Vec<RetrievedDocument>,
		relevance_gate: f32,
		limit: u32,
	) -> Result<()> {
		self.expect_stage(PipelineStage::Retrieving, PipelineStage::Done)?;

		self.retrieved_documents = retrieval::assemble_results(candidates, relevance_gate, limit);

		if self.retrieved_documents.is_empty() {
			self.error = Some(NO_RESULTS_MESSAGE.to_string());
		}

		self.stage = PipelineStage::Done;

		Ok(())
	}

	/// Moves a running pipeline to `Failed`. Terminal states are left untouched.
	pub fn fail(&mut self, message: impl Into<String>) {
		if self.is_terminal() {
			return;
		}

		self.error = Some(message.into());
		self.stage = PipelineStage::Failed;
	}

	fn expect_stage(&self, expected: PipelineStage, to: PipelineStage) -> Result<()> {
		if self.stage != expected {
			return Err(Error::InvalidTransition { from: self.stage, to });
		}

		Ok(())
	}
}
