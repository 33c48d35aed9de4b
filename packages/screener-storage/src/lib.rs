//! Qdrant-backed company search: filter translation, dense and BM25 channels, payload decoding.

pub mod filter;
pub mod payload;
pub mod qdrant;

mod error;

pub use error::{Error, Result};
