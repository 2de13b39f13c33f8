//! Versioned encoding of the cart in local storage.
//!
//! # Format
//!
//! ```json
//! {"version": 1, "items": [{"id": 1, "title": "...", "price": "179.90", "image": "...", "amount": 2}]}
//! ```
//!
//! A bare JSON array of items is also accepted on decode: that is the
//! unversioned layout older storefront builds wrote under the same key.
//! Encoding always writes the current version.

use std::collections::HashSet;

use rocketshoes_core::{LineItem, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Version written by [`encode`].
pub const SNAPSHOT_VERSION: u64 = 1;

/// Errors decoding a stored cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not JSON, or JSON of the wrong shape.
    #[error("malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Written by a newer (or unknown) format version.
    #[error("unsupported cart snapshot version {0}")]
    UnsupportedVersion(u64),

    /// Decoded, but violates a cart invariant.
    #[error("invalid cart snapshot: {0}")]
    Invalid(String),
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u64,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u64,
    items: Vec<LineItem>,
}

/// Encode the cart for storage.
///
/// # Errors
///
/// Returns `SnapshotError::Malformed` if serialization fails.
pub fn encode(items: &[LineItem]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&SnapshotOut {
        version: SNAPSHOT_VERSION,
        items,
    })?)
}

/// Decode a stored cart and check its invariants.
///
/// # Errors
///
/// - `Malformed` for invalid JSON or wrong shape
/// - `UnsupportedVersion` for any version other than [`SNAPSHOT_VERSION`]
/// - `Invalid` for duplicate product ids or zero quantities
pub fn decode(blob: &str) -> Result<Vec<LineItem>, SnapshotError> {
    let value: Value = serde_json::from_str(blob)?;

    let items: Vec<LineItem> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        if let Some(version) = value.get("version").and_then(Value::as_u64)
            && version != SNAPSHOT_VERSION
        {
            return Err(SnapshotError::UnsupportedVersion(version));
        }
        serde_json::from_value::<SnapshotIn>(value)?.items
    };

    validate(&items)?;
    Ok(items)
}

fn validate(items: &[LineItem]) -> Result<(), SnapshotError> {
    let mut seen: HashSet<ProductId> = HashSet::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            return Err(SnapshotError::Invalid(format!(
                "product {} has zero quantity",
                item.id
            )));
        }
        if !seen.insert(item.id) {
            return Err(SnapshotError::Invalid(format!(
                "product {} appears more than once",
                item.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::Price;

    use super::*;

    fn item(id: i64, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Price::from_cents(17990),
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            quantity,
        }
    }

    #[test]
    fn test_encode_writes_version() {
        let blob = encode(&[item(1, 2)]).unwrap();
        let value: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["items"][0]["amount"], 2);
    }

    #[test]
    fn test_restart_reloads_identical_sequence() {
        let cart = vec![item(3, 1), item(1, 2), item(2, 5)];
        assert_eq!(decode(&encode(&cart).unwrap()).unwrap(), cart);
    }

    #[test]
    fn test_decode_legacy_array() {
        let legacy = r#"[{"id":1,"title":"Tênis de Caminhada Leve Confortável","price":179.9,
            "image":"https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg",
            "amount":2}]"#;
        let items = decode(legacy).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, Price::from_cents(17990));
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let err = decode(r#"{"version": 2, "items": []}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("{oops"), Err(SnapshotError::Malformed(_))));
        assert!(matches!(decode("42"), Err(SnapshotError::Malformed(_))));
        assert!(matches!(
            decode(r#"[{"id": 1}]"#),
            Err(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invariant_violations() {
        let dup = encode(&[item(1, 1), item(1, 2)]).unwrap();
        assert!(matches!(decode(&dup), Err(SnapshotError::Invalid(_))));

        let zero = encode(&[item(4, 0)]).unwrap();
        assert!(matches!(decode(&zero), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("[]").unwrap().is_empty());
        assert!(decode(&encode(&[]).unwrap()).unwrap().is_empty());
    }
}
