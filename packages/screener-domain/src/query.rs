use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, Sector, Theme};

/// An investor's screening intent, as extracted from free text.
///
/// Numeric thresholds are in USD millions except `rev_growth_min`, which is a percentage.
/// Every numeric field is either absent or a finite, non-negative number.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
	#[serde(default)]
	pub sector: Option<Sector>,
	#[serde(default)]
	pub theme: Option<Theme>,
	#[serde(default, deserialize_with = "deserialize_keywords")]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub keyword_query: Option<String>,
	#[serde(default)]
	pub country: Option<String>,
	#[serde(default)]
	pub ebitda_min: Option<f64>,
	#[serde(default)]
	pub revenue_min: Option<f64>,
	#[serde(default)]
	pub rev_growth_min: Option<f64>,
	#[serde(default)]
	pub market_cap_min: Option<f64>,
	#[serde(default)]
	pub budget: Option<f64>,
}
impl StructuredQuery {
	/// Validates an extractor payload and builds a query from it.
	///
	/// Unknown fields are ignored. Blank strings count as absent and blank keywords are dropped.
	pub fn from_json(raw: Value) -> Result<Self> {
		if !raw.is_object() {
			return Err(Error::InvalidQuery {
				field: "$".to_string(),
				message: "structured query must be a JSON object.".to_string(),
			});
		}

		let parsed: RawStructuredQuery = serde_json::from_value(raw).map_err(|err| {
			Error::InvalidQuery { field: "$".to_string(), message: err.to_string() }
		})?;
		let sector = match non_blank(parsed.sector) {
			Some(label) => Some(Sector::parse(&label).map_err(|err| Error::InvalidQuery {
				field: "sector".to_string(),
				message: err.to_string(),
			})?),
			None => None,
		};
		let theme = match non_blank(parsed.theme) {
			Some(label) => Some(Theme::parse(&label).map_err(|err| Error::InvalidQuery {
				field: "theme".to_string(),
				message: err.to_string(),
			})?),
			None => None,
		};
		let keywords = parsed
			.keywords
			.unwrap_or_default()
			.into_iter()
			.map(|keyword| keyword.trim().to_string())
			.filter(|keyword| !keyword.is_empty())
			.collect();
		let query = Self {
			sector,
			theme,
			keywords,
			keyword_query: non_blank(parsed.keyword_query),
			country: non_blank(parsed.country),
			ebitda_min: parsed.ebitda_min,
			revenue_min: parsed.revenue_min,
			rev_growth_min: parsed.rev_growth_min,
			market_cap_min: parsed.market_cap_min,
			budget: parsed.budget,
		};

		query.validate()?;

		Ok(query)
	}

	pub fn validate(&self) -> Result<()> {
		for (field, value) in self.numeric_fields() {
			let Some(value) = value else {
				continue;
			};

			if !value.is_finite() {
				return Err(Error::InvalidQuery {
					field: field.to_string(),
					message: "must be a finite number.".to_string(),
				});
			}
			if value < 0.0 {
				return Err(Error::InvalidQuery {
					field: field.to_string(),
					message: "must be zero or greater.".to_string(),
				});
			}
		}

		Ok(())
	}

	/// Text used for keyword matching: `keyword_query`, else the space-joined keywords.
	pub fn keyword_text(&self) -> Option<String> {
		let text = match self.keyword_query.as_deref() {
			Some(phrase) if !phrase.trim().is_empty() => phrase.trim().to_string(),
			_ => self.keywords.join(" ").trim().to_string(),
		};

		if text.is_empty() { None } else { Some(text) }
	}

	fn numeric_fields(&self) -> [(&'static str, Option<f64>); 5] {
		[
			("ebitda_min", self.ebitda_min),
			("revenue_min", self.revenue_min),
			("rev_growth_min", self.rev_growth_min),
			("market_cap_min", self.market_cap_min),
			("budget", self.budget),
		]
	}
}

#[derive(Deserialize)]
struct RawStructuredQuery {
	#[serde(default)]
	sector: Option<String>,
	#[serde(default)]
	theme: Option<String>,
	#[serde(default)]
	keywords: Option<Vec<String>>,
	#[serde(default)]
	keyword_query: Option<String>,
	#[serde(default)]
	country: Option<String>,
	#[serde(default)]
	ebitda_min: Option<f64>,
	#[serde(default)]
	revenue_min: Option<f64>,
	#[serde(default)]
	rev_growth_min: Option<f64>,
	#[serde(default)]
	market_cap_min: Option<f64>,
	#[serde(default)]
	budget: Option<f64>,
}

/// JSON schema handed to the extraction collaborator.
pub fn structured_query_schema() -> Value {
	let nullable_number = |description: &str| {
		serde_json::json!({ "type": ["number", "null"], "minimum": 0, "description": description })
	};
	let mut sectors: Vec<Value> =
		Sector::labels().into_iter().map(|label| Value::String(label.to_string())).collect();
	let mut themes: Vec<Value> =
		Theme::labels().into_iter().map(|label| Value::String(label.to_string())).collect();

	sectors.push(Value::Null);
	themes.push(Value::Null);

	serde_json::json!({
		"type": "object",
		"properties": {
			"sector": {
				"type": ["string", "null"],
				"enum": sectors,
				"description": "Primary industry sector."
			},
			"theme": {
				"type": ["string", "null"],
				"enum": themes,
				"description": "Investment theme from the fixed theme list."
			},
			"keywords": {
				"type": ["array", "null"],
				"items": { "type": "string" },
				"description": "Salient free-text phrases from the request."
			},
			"keyword_query": {
				"type": ["string", "null"],
				"description": "Lower-case phrase of the request without stop words."
			},
			"country": {
				"type": ["string", "null"],
				"description": "Country the company should be based in."
			},
			"ebitda_min": nullable_number("Minimum EBITDA in USD millions."),
			"revenue_min": nullable_number("Minimum revenue in USD millions."),
			"rev_growth_min": nullable_number("Minimum revenue growth in percent."),
			"market_cap_min": nullable_number("Minimum market capitalization in USD millions."),
			"budget": nullable_number("Investor budget in USD millions.")
		},
		"required": [
			"sector",
			"theme",
			"keywords",
			"keyword_query",
			"country",
			"ebitda_min",
			"revenue_min",
			"rev_growth_min",
			"market_cap_min",
			"budget"
		],
		"additionalProperties": false
	})
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|text| text.trim().to_string()).filter(|text| !text.is_empty())
}

fn deserialize_keywords<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_fields_are_treated_as_absent() {
		let query = StructuredQuery::from_json(serde_json::json!({
			"sector": " ",
			"theme": null,
			"keywords": ["  ", "solar"],
			"keyword_query": "",
			"country": "  "
		}))
		.expect("query must parse");

		assert_eq!(query.sector, None);
		assert_eq!(query.keywords, vec!["solar".to_string()]);
		assert_eq!(query.keyword_query, None);
		assert_eq!(query.country, None);
	}

	#[test]
	fn negative_thresholds_are_rejected() {
		let err = StructuredQuery::from_json(serde_json::json!({ "ebitda_min": -1.0 }))
			.expect_err("negative threshold must fail");

		assert!(matches!(err, Error::InvalidQuery { ref field, .. } if field == "ebitda_min"));
	}

	#[test]
	fn keyword_text_prefers_keyword_query() {
		let query = StructuredQuery {
			keywords: vec!["grid".to_string(), "storage".to_string()],
			keyword_query: Some("battery storage".to_string()),
			..Default::default()
		};

		assert_eq!(query.keyword_text().as_deref(), Some("battery storage"));

		let query = StructuredQuery { keyword_query: None, ..query };

		assert_eq!(query.keyword_text().as_deref(), Some("grid storage"));
		assert_eq!(StructuredQuery::default().keyword_text(), None);
	}

	#[test]
	fn schema_lists_every_theme() {
		let schema = structured_query_schema();
		let themes =
			schema["properties"]["theme"]["enum"].as_array().expect("enum must be an array");

		assert_eq!(themes.len(), Theme::ALL.len() + 1);
	}
}
