//! Query Normalizer: default filling, sector inference, concept and embedding-text assembly.

use crate::{Error, FilterExpression, Result, Sector, StructuredQuery, filter};

/// Substring to sector table, checked in declaration order.
const INFER_SECTOR_KEYWORDS: [(&str, Sector); 6] = [
	("cyber", Sector::Cybersecurity),
	("climate", Sector::CleanEnergy),
	("net-zero", Sector::CleanEnergy),
	("edtech", Sector::EdTech),
	("health", Sector::HealthTech),
	("saas", Sector::EnterpriseSaas),
];
const EMBEDDING_TEXT_SEPARATOR: &str = "; ";

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedQuery {
	pub query: StructuredQuery,
	pub filter: Option<FilterExpression>,
	/// Never empty.
	pub concepts: Vec<String>,
	/// `None` means no embedding request should be made.
	pub embedding_text: Option<String>,
}

pub fn normalize(query: &StructuredQuery) -> Result<NormalizedQuery> {
	let mut query = query.clone();

	if query.sector.is_none() {
		query.sector = infer_sector(&query.keywords);
	}

	apply_defaults(&mut query);

	let concepts = assemble_concepts(&query)?;
	let filter = filter::build_filter(&query);
	let embedding_text = embedding_text(&query);

	Ok(NormalizedQuery { query, filter, concepts, embedding_text })
}

/// Returns the sector of the first table entry whose substring occurs in the keywords.
pub fn infer_sector(keywords: &[String]) -> Option<Sector> {
	if keywords.is_empty() {
		return None;
	}

	let blob = keywords.join(" ").to_lowercase();

	INFER_SECTOR_KEYWORDS
		.iter()
		.find(|(needle, _)| blob.contains(needle))
		.map(|(_, sector)| *sector)
}

/// Replaces absent thresholds with `0.0`, meaning no lower bound.
pub fn apply_defaults(query: &mut StructuredQuery) {
	for threshold in [
		&mut query.ebitda_min,
		&mut query.revenue_min,
		&mut query.rev_growth_min,
		&mut query.market_cap_min,
	] {
		threshold.get_or_insert(0.0);
	}
}

pub fn assemble_concepts(query: &StructuredQuery) -> Result<Vec<String>> {
	let mut concepts = query.keywords.clone();

	if let Some(theme) = query.theme {
		concepts.push(theme.as_str().to_string());
	}
	if let Some(sector) = query.sector {
		concepts.push(sector.as_str().to_string());
	}
	if let Some(country) = query.country.as_deref().filter(|c| !c.trim().is_empty()) {
		concepts.push(country.to_string());
	}
	if concepts.is_empty() {
		return Err(Error::NoConcepts);
	}

	Ok(concepts)
}

pub fn embedding_text(query: &StructuredQuery) -> Option<String> {
	let theme = query.theme.map(|theme| theme.as_str().to_string());
	let parts: Vec<String> = [query.keyword_text(), theme]
		.into_iter()
		.flatten()
		.filter(|part| !part.trim().is_empty())
		.collect();

	if parts.is_empty() { None } else { Some(parts.join(EMBEDDING_TEXT_SEPARATOR)) }
}
