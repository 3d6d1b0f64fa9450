//! JSON transcoding.
//!
//! Mapping from data to JSON:
//!   - Data::Null     -> null
//!   - Data::Bool     -> boolean
//!   - Data::Integer  -> number if it fits in i64/u64, otherwise string
//!   - Data::Float    -> number
//!   - Data::String   -> string
//!   - Data::List     -> array
//!   - Data::Map      -> object

use num_traits::ToPrimitive;
use serde_json::{Map, Number, Value as JsonValue};

use super::Data;

/// Encode data as pretty-printed JSON text.
pub fn encode(data: &Data) -> Result<String, String> {
    let value = data_to_json(data);
    let mut out =
        serde_json::to_string_pretty(&value).map_err(|e| format!("JSON encode error: {}", e))?;
    out.push('\n');
    Ok(out)
}

fn data_to_json(data: &Data) -> JsonValue {
    match data {
        Data::Null => JsonValue::Null,
        Data::Bool(b) => JsonValue::Bool(*b),
        Data::Integer(n) => {
            if let Some(i) = n.to_i64() {
                JsonValue::Number(Number::from(i))
            } else if let Some(u) = n.to_u64() {
                JsonValue::Number(Number::from(u))
            } else {
                JsonValue::String(n.to_string())
            }
        }
        Data::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Data::String(s) => JsonValue::String(s.clone()),
        Data::List(items) => JsonValue::Array(items.iter().map(data_to_json).collect()),
        Data::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                map.insert(k.clone(), data_to_json(v));
            }
            JsonValue::Object(map)
        }
    }
}
