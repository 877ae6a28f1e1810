//! Benchmark corpus generators shared by the diffkit benches.

use serde_json::{json, Value};

/// A flat API-response-shaped object with `items` records.
#[must_use]
pub fn record_list(items: usize) -> Value {
    let records: Vec<Value> = (0..items)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("item-{i}"),
                "price": i * 10 + 5,
                "active": i % 2 == 0,
                "tags": [format!("t{}", i % 7), "common"],
            })
        })
        .collect();
    json!({ "total": items, "items": records })
}

/// `record_list` with every `price` changed, to exercise the Modified
/// path on each record.
#[must_use]
pub fn record_list_churned(items: usize) -> Value {
    let mut doc = record_list(items);
    if let Some(records) = doc["items"].as_array_mut() {
        for record in records {
            record["price"] = json!(999);
        }
    }
    doc
}

/// Deeply nested single-branch object, `depth` levels.
#[must_use]
pub fn nested_chain(depth: usize) -> Value {
    let mut value = json!({"leaf": 1});
    for i in 0..depth {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(format!("level{i}"), value);
        value = Value::Object(wrapper);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_list_shape() {
        let doc = record_list(3);
        assert_eq!(doc["items"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_churn_touches_every_record() {
        let doc = record_list_churned(2);
        for record in doc["items"].as_array().expect("array") {
            assert_eq!(record["price"], json!(999));
        }
    }
}
