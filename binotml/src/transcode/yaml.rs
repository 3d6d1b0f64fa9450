//! YAML transcoding.
//!
//! Mapping from data to YAML:
//!   - Data::Null     -> YAML null
//!   - Data::Bool     -> YAML bool
//!   - Data::Integer  -> YAML integer (arbitrary precision as string if > i64/u64)
//!   - Data::Float    -> YAML float
//!   - Data::String   -> YAML string
//!   - Data::List     -> YAML sequence
//!   - Data::Map      -> YAML mapping, in document order

use num_traits::ToPrimitive;

use super::Data;

/// Encode data as a YAML string.
pub fn encode(data: &Data) -> Result<String, String> {
    let yaml_value = data_to_yaml(data);
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn data_to_yaml(data: &Data) -> serde_yaml::Value {
    match data {
        Data::Null => serde_yaml::Value::Null,
        Data::Bool(b) => serde_yaml::Value::Bool(*b),
        Data::Integer(n) => {
            // Try to fit in i64 first, then u64
            if let Some(i) = n.to_i64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(i))
            } else if let Some(u) = n.to_u64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(u))
            } else {
                serde_yaml::Value::String(n.to_string())
            }
        }
        Data::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        Data::String(s) => serde_yaml::Value::String(s.clone()),
        Data::List(items) => serde_yaml::Value::Sequence(items.iter().map(data_to_yaml).collect()),
        Data::Map(entries) => {
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in entries {
                map.insert(serde_yaml::Value::String(k.clone()), data_to_yaml(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_encode_keeps_order() {
        let data = Data::Map(vec![
            ("zeta".to_string(), Data::String("last".to_string())),
            ("alpha".to_string(), Data::Integer(BigInt::from(1))),
            ("list".to_string(), Data::List(vec![Data::Float(0.5)])),
        ]);
        let text = encode(&data).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());

        let back: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back["alpha"], serde_yaml::Value::from(1));
        assert_eq!(back["zeta"], serde_yaml::Value::from("last"));
        assert_eq!(back["list"][0], serde_yaml::Value::from(0.5));
    }
}
