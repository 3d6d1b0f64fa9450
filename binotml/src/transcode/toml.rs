//! TOML transcoding.
//!
//! Mapping from data to TOML:
//!   - Data::Null     -> error (TOML has no null)
//!   - Data::Bool     -> TOML boolean
//!   - Data::Integer  -> TOML integer if it fits in i64, otherwise string
//!   - Data::Float    -> TOML float
//!   - Data::String   -> TOML string
//!   - Data::List     -> TOML array (maps inside become inline tables)
//!   - Data::Map      -> TOML table
//!
//! TOML requires the top-level value to be a table; anything else errors.

use num_traits::ToPrimitive;
use toml_edit::{Array, DocumentMut, Formatted, InlineTable, Item, Table, Value as TomlValue};

use super::Data;

/// Encode data as a TOML string.
pub fn encode(data: &Data) -> Result<String, String> {
    match data {
        Data::Map(entries) => {
            let mut doc = DocumentMut::new();
            for (key, value) in entries {
                doc[key.as_str()] = data_to_item(value)?;
            }
            Ok(doc.to_string())
        }
        _ => Err("TOML requires the top-level value to be a table".to_string()),
    }
}

fn data_to_item(data: &Data) -> Result<Item, String> {
    match data {
        Data::Map(entries) => {
            let mut table = Table::new();
            for (key, value) in entries {
                table.insert(key, data_to_item(value)?);
            }
            Ok(Item::Table(table))
        }
        _ => Ok(Item::Value(data_to_value(data)?)),
    }
}

fn data_to_value(data: &Data) -> Result<TomlValue, String> {
    match data {
        Data::Null => Err("TOML has no null type".to_string()),
        Data::Bool(b) => Ok(TomlValue::Boolean(Formatted::new(*b))),
        Data::Integer(n) => Ok(match n.to_i64() {
            Some(i) => TomlValue::Integer(Formatted::new(i)),
            None => TomlValue::String(Formatted::new(n.to_string())),
        }),
        Data::Float(f) => Ok(TomlValue::Float(Formatted::new(*f))),
        Data::String(s) => Ok(TomlValue::String(Formatted::new(s.clone()))),
        Data::List(items) => {
            let mut array = Array::new();
            for item in items {
                array.push(data_to_value(item)?);
            }
            Ok(TomlValue::Array(array))
        }
        Data::Map(entries) => {
            let mut inline = InlineTable::new();
            for (key, value) in entries {
                inline.insert(key, data_to_value(value)?);
            }
            Ok(TomlValue::InlineTable(inline))
        }
    }
}
