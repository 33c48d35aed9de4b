use crate::pipeline::PipelineStage;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("No concepts could be derived from the query.")]
	NoConcepts,
	#[error("Invalid structured query at {field}: {message}")]
	InvalidQuery { field: String, message: String },
	#[error("Unknown {kind} label '{label}'.")]
	UnknownLabel { kind: &'static str, label: String },
	#[error("Pipeline cannot move from {from} to {to}.")]
	InvalidTransition { from: PipelineStage, to: PipelineStage },
	#[error("Retrieval requires an embedding vector but none was produced.")]
	MissingRetrievalInput,
}
