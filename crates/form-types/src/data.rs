//! Form data supplied by callers and its flattened lookup form

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Arbitrarily nested key/value map as stored by the form-data service
pub type FormData = Map<String, Value>;

/// Keys starting with this prefix are system-internal and never filled
pub const RESERVED_PREFIX: &str = "_";

/// Flatten nested objects into dot-joined keys.
///
/// `{"personnel": {"pi_name": "x"}}` becomes `{"personnel.pi_name": "x"}`.
/// Arrays are leaf values: repeatable rows stay intact. Empty objects
/// produce no keys. The result is ordered by key.
pub fn flatten(data: &FormData) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    for (key, value) in data {
        flatten_into(key.clone(), value, &mut flat);
    }
    flat
}

fn flatten_into(prefix: String, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(format!("{}.{}", prefix, key), nested, out);
            }
        }
        other => {
            out.insert(prefix, other.clone());
        }
    }
}
