use qdrant_client::qdrant::{Condition, Filter, Range};

use screener_domain::{FilterClause, FilterExpression, FilterOperator, FilterValue};

use crate::{Error, Result};

/// Translates a filter expression into a Qdrant filter whose top-level `must` holds every clause.
pub fn to_qdrant_filter(expr: &FilterExpression) -> Result<Filter> {
	match expr {
		FilterExpression::Clause(clause) => Ok(Filter::must([clause_condition(clause)?])),
		FilterExpression::And(exprs) => {
			let mut conditions = Vec::with_capacity(exprs.len());

			for expr in exprs {
				let condition = match expr {
					FilterExpression::Clause(clause) => clause_condition(clause)?,
					nested => Condition::from(to_qdrant_filter(nested)?),
				};

				conditions.push(condition);
			}

			Ok(Filter::must(conditions))
		},
	}
}

fn clause_condition(clause: &FilterClause) -> Result<Condition> {
	let key = clause.field.as_str();

	match (clause.operator, &clause.value) {
		// Qdrant matches keyword arrays element-wise, so containment and equality coincide.
		(FilterOperator::Equal | FilterOperator::Contains, FilterValue::Text(text)) => {
			Ok(Condition::matches(key, text.clone()))
		},
		(FilterOperator::Equal, FilterValue::Number(number)) => Ok(Condition::range(
			key,
			Range { gte: Some(*number), lte: Some(*number), ..Default::default() },
		)),
		(FilterOperator::GreaterThan, FilterValue::Number(number)) => {
			Ok(Condition::range(key, Range { gt: Some(*number), ..Default::default() }))
		},
		(operator, value) => Err(Error::UnsupportedFilter(format!(
			"{} {} {value:?}",
			key,
			operator.as_str()
		))),
	}
}

#[cfg(test)]
mod tests {
	use qdrant_client::qdrant::{condition::ConditionOneOf, r#match::MatchValue};

	use screener_domain::FilterField;

	use super::*;

	fn field_key(condition: &Condition) -> Option<&str> {
		match condition.condition_one_of.as_ref()? {
			ConditionOneOf::Field(field) => Some(field.key.as_str()),
			_ => None,
		}
	}

	#[test]
	fn and_becomes_must_in_order() {
		let expr = FilterExpression::And(vec![
			FilterExpression::Clause(FilterClause::new(
				FilterField::Themes,
				FilterOperator::Contains,
				FilterValue::Text("Energy Storage Solutions".to_string()),
			)),
			FilterExpression::Clause(FilterClause::new(
				FilterField::EbitdaMusd,
				FilterOperator::GreaterThan,
				FilterValue::Number(5.0),
			)),
		]);
		let filter = to_qdrant_filter(&expr).expect("translate failed");
		let keys: Vec<_> = filter.must.iter().filter_map(field_key).collect();

		assert_eq!(keys, vec!["themes", "ebitda_musd"]);
	}

	#[test]
	fn greater_than_is_an_exclusive_range() {
		let expr = FilterExpression::Clause(FilterClause::new(
			FilterField::MarketCapMusd,
			FilterOperator::GreaterThan,
			FilterValue::Number(1_000.0),
		));
		let filter = to_qdrant_filter(&expr).expect("translate failed");
		let Some(ConditionOneOf::Field(field)) = filter.must[0].condition_one_of.as_ref() else {
			panic!("Expected a field condition.");
		};
		let range = field.range.as_ref().expect("Expected a range.");

		assert_eq!(range.gt, Some(1_000.0));
		assert_eq!(range.gte, None);
	}

	#[test]
	fn text_clause_becomes_keyword_match() {
		let expr = FilterExpression::Clause(FilterClause::new(
			FilterField::Country,
			FilterOperator::Equal,
			FilterValue::Text("Canada".to_string()),
		));
		let filter = to_qdrant_filter(&expr).expect("translate failed");
		let Some(ConditionOneOf::Field(field)) = filter.must[0].condition_one_of.as_ref() else {
			panic!("Expected a field condition.");
		};
		let matched = field.r#match.as_ref().and_then(|m| m.match_value.as_ref());

		assert_eq!(matched, Some(&MatchValue::Keyword("Canada".to_string())));
	}

	#[test]
	fn text_cannot_be_compared_by_order() {
		let expr = FilterExpression::Clause(FilterClause::new(
			FilterField::Country,
			FilterOperator::GreaterThan,
			FilterValue::Text("Canada".to_string()),
		));

		assert!(matches!(to_qdrant_filter(&expr), Err(Error::UnsupportedFilter(_))));
	}
}
