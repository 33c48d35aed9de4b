//! Filter Builder: deterministic translation of resolved query fields into a boolean filter.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::StructuredQuery;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterField {
	/// Multi-valued theme labels of a company.
	Themes,
	Country,
	EbitdaMusd,
	RevGrowthPct,
	MarketCapMusd,
}
impl FilterField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Themes => "themes",
			Self::Country => "country",
			Self::EbitdaMusd => "ebitda_musd",
			Self::RevGrowthPct => "rev_growth_pct",
			Self::MarketCapMusd => "market_cap_musd",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOperator {
	Equal,
	/// The property is a list that holds the value.
	Contains,
	GreaterThan,
}
impl FilterOperator {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Equal => "eq",
			Self::Contains => "contains",
			Self::GreaterThan => "gt",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
	Text(String),
	Number(f64),
}
impl FilterValue {
	fn to_value(&self) -> Value {
		match self {
			Self::Text(text) => Value::String(text.clone()),
			Self::Number(number) => serde_json::json!(number),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterClause {
	pub field: FilterField,
	pub operator: FilterOperator,
	pub value: FilterValue,
}
impl FilterClause {
	pub fn new(field: FilterField, operator: FilterOperator, value: FilterValue) -> Self {
		Self { field, operator, value }
	}

	fn evaluate(&self, properties: &Map<String, Value>) -> bool {
		let Some(property) = properties.get(self.field.as_str()) else {
			return false;
		};

		match (self.operator, &self.value) {
			(FilterOperator::Equal, FilterValue::Text(expected)) => {
				property.as_str().is_some_and(|actual| actual == expected)
			},
			(FilterOperator::Equal, FilterValue::Number(expected)) => {
				property.as_f64().is_some_and(|actual| actual == *expected)
			},
			(FilterOperator::Contains, expected) => match property {
				Value::Array(items) => items.iter().any(|item| *item == expected.to_value()),
				_ => false,
			},
			(FilterOperator::GreaterThan, FilterValue::Number(bound)) => {
				property.as_f64().is_some_and(|actual| actual > *bound)
			},
			(FilterOperator::GreaterThan, FilterValue::Text(_)) => false,
		}
	}
}

/// A clause, or an ordered conjunction of sub-expressions.
///
/// "No constraint" is expressed as `Option::None` by callers, never as an empty `And`.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterExpression {
	Clause(FilterClause),
	And(Vec<FilterExpression>),
}
impl FilterExpression {
	pub fn to_value(&self) -> Value {
		match self {
			Self::Clause(clause) => serde_json::json!({
				"op": clause.operator.as_str(),
				"field": clause.field.as_str(),
				"value": clause.value.to_value(),
			}),
			Self::And(exprs) => {
				let args: Vec<Value> = exprs.iter().map(Self::to_value).collect();

				serde_json::json!({ "op": "and", "args": args })
			},
		}
	}

	/// Evaluates the expression against a document property bag.
	///
	/// A missing property never satisfies a clause.
	pub fn evaluate(&self, properties: &Map<String, Value>) -> bool {
		match self {
			Self::Clause(clause) => clause.evaluate(properties),
			Self::And(exprs) => exprs.iter().all(|expr| expr.evaluate(properties)),
		}
	}

	pub fn clauses(&self) -> Vec<&FilterClause> {
		match self {
			Self::Clause(clause) => vec![clause],
			Self::And(exprs) => exprs.iter().flat_map(Self::clauses).collect(),
		}
	}
}
impl Serialize for FilterExpression {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.to_value().serialize(serializer)
	}
}

/// Builds the hard pre-filter for a resolved query.
///
/// Clause order is fixed: theme, country, EBITDA, revenue growth, market cap. Sector never
/// becomes a clause and neither does `revenue_min`.
pub fn build_filter(query: &StructuredQuery) -> Option<FilterExpression> {
	let mut clauses = Vec::new();

	if let Some(theme) = query.theme {
		clauses.push(FilterClause::new(
			FilterField::Themes,
			FilterOperator::Contains,
			FilterValue::Text(theme.as_str().to_string()),
		));
	}
	if let Some(country) = query.country.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
		clauses.push(FilterClause::new(
			FilterField::Country,
			FilterOperator::Equal,
			FilterValue::Text(country.to_string()),
		));
	}

	for (field, threshold) in [
		(FilterField::EbitdaMusd, query.ebitda_min),
		(FilterField::RevGrowthPct, query.rev_growth_min),
		(FilterField::MarketCapMusd, query.market_cap_min),
	] {
		if let Some(bound) = threshold.filter(|bound| *bound > 0.0) {
			clauses.push(FilterClause::new(
				field,
				FilterOperator::GreaterThan,
				FilterValue::Number(bound),
			));
		}
	}

	let mut exprs: Vec<FilterExpression> =
		clauses.into_iter().map(FilterExpression::Clause).collect();

	match exprs.len() {
		0 => None,
		1 => exprs.pop(),
		_ => Some(FilterExpression::And(exprs)),
	}
}
