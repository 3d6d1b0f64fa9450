//! CBOR transcoding.
//!
//! Mapping from data to CBOR:
//!   - Data::Null     -> CBOR null (simple value 22)
//!   - Data::Bool     -> CBOR bool (simple values 20/21)
//!   - Data::Integer  -> CBOR integer, or a text string outside -2^64 to 2^64-1
//!   - Data::Float    -> CBOR float (ciborium picks the smallest lossless width)
//!   - Data::String   -> CBOR text string
//!   - Data::List     -> CBOR array (determinate length)
//!   - Data::Map      -> CBOR map (determinate length, text string keys, document order)

use ciborium::value::{Integer, Value as CborValue};
use num_traits::ToPrimitive;

use super::Data;

/// Encode data as CBOR bytes.
pub fn encode(data: &Data) -> Result<Vec<u8>, String> {
    let value = data_to_cbor(data);
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&value, &mut buf).map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn data_to_cbor(data: &Data) -> CborValue {
    match data {
        Data::Null => CborValue::Null,
        Data::Bool(b) => CborValue::Bool(*b),
        Data::Integer(n) => match n.to_i128().and_then(|i| Integer::try_from(i).ok()) {
            Some(i) => CborValue::Integer(i),
            None => CborValue::Text(n.to_string()),
        },
        Data::Float(f) => CborValue::Float(*f),
        Data::String(s) => CborValue::Text(s.clone()),
        Data::List(items) => CborValue::Array(items.iter().map(data_to_cbor).collect()),
        Data::Map(entries) => CborValue::Map(
            entries
                .iter()
                .map(|(k, v)| (CborValue::Text(k.clone()), data_to_cbor(v)))
                .collect(),
        ),
    }
}
