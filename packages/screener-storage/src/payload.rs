use std::collections::HashMap;

use qdrant_client::qdrant::{PointId, Value, point_id::PointIdOptions, value::Kind};
use serde_json::{Map, Number};

pub const POINT_ID_KEY: &str = "_id";

/// Converts a Qdrant payload into a JSON property bag, exposing the point id under `_id`.
pub fn payload_to_properties(
	id: Option<&PointId>,
	payload: &HashMap<String, Value>,
) -> Map<String, serde_json::Value> {
	let mut properties = Map::with_capacity(payload.len() + 1);

	for (key, value) in payload {
		properties.insert(key.clone(), value_to_json(value));
	}

	if let Some(id) = id.and_then(point_id_to_string) {
		properties.insert(POINT_ID_KEY.to_string(), serde_json::Value::String(id));
	}

	properties
}

pub fn point_id_to_string(point_id: &PointId) -> Option<String> {
	match point_id.point_id_options.as_ref()? {
		PointIdOptions::Num(num) => Some(num.to_string()),
		PointIdOptions::Uuid(id) => Some(id.clone()),
	}
}

fn value_to_json(value: &Value) -> serde_json::Value {
	match &value.kind {
		None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
		Some(Kind::BoolValue(flag)) => serde_json::Value::Bool(*flag),
		Some(Kind::IntegerValue(number)) => serde_json::Value::Number((*number).into()),
		Some(Kind::DoubleValue(number)) => {
			Number::from_f64(*number).map(serde_json::Value::Number).unwrap_or_default()
		},
		Some(Kind::StringValue(text)) => serde_json::Value::String(text.clone()),
		Some(Kind::ListValue(list)) => {
			serde_json::Value::Array(list.values.iter().map(value_to_json).collect())
		},
		Some(Kind::StructValue(object)) => serde_json::Value::Object(
			object.fields.iter().map(|(key, value)| (key.clone(), value_to_json(value))).collect(),
		),
	}
}
