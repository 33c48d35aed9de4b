pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Configuration error: {message}")]
	Configuration { message: String },
	#[error("Extraction failed: {message}")]
	Extraction { message: String },
	#[error("Embedding failed: {message}")]
	Embedding { message: String },
	#[error("No concepts could be derived from the query.")]
	NoConcepts,
	#[error("Search backend unavailable: {message}")]
	BackendConnection { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Pipeline error: {message}")]
	Pipeline { message: String },
}
impl From<screener_config::Error> for Error {
	fn from(err: screener_config::Error) -> Self {
		Self::Configuration { message: err.to_string() }
	}
}

impl From<screener_domain::Error> for Error {
	fn from(err: screener_domain::Error) -> Self {
		match err {
			screener_domain::Error::NoConcepts => Self::NoConcepts,
			screener_domain::Error::InvalidQuery { .. }
			| screener_domain::Error::UnknownLabel { .. } => {
				Self::Extraction { message: err.to_string() }
			},
			screener_domain::Error::InvalidTransition { .. }
			| screener_domain::Error::MissingRetrievalInput => {
				Self::Pipeline { message: err.to_string() }
			},
		}
	}
}

impl From<screener_storage::Error> for Error {
	fn from(err: screener_storage::Error) -> Self {
		match err {
			screener_storage::Error::Qdrant(inner) => {
				Self::BackendConnection { message: inner.to_string() }
			},
			screener_storage::Error::UnsupportedFilter(_) => {
				Self::Pipeline { message: err.to_string() }
			},
		}
	}
}
