//! # Action Envelopes
//!
//! Decodes the frontend's `{ "type": ..., "payload": ... }` actions into
//! typed [`CartAction`]s.
//!
//! ## Wire Format
//! ```json
//! { "type": "ADD_ITEM",
//!   "payload": { "item": { "productId": "milk", "name": "Milk", "price": 30 },
//!                "storeId": "storeA" } }
//! { "type": "REMOVE_ITEM",     "payload": { "productId": "milk" } }
//! { "type": "UPDATE_QUANTITY", "payload": { "productId": "milk", "quantity": 3 } }
//! { "type": "CLEAR_CART" }
//! ```
//!
//! ## Decoding Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Not JSON / no "type" string     → Err(InvalidEnvelope)   (defect)     │
//! │  "type" outside the four tags    → Err(UnknownAction)     (defect)     │
//! │  Known tag, bad/missing payload  → Decoded::Rejected      (data)       │
//! │  Known tag, good payload         → Decoded::Action                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Prices arrive in major units and are converted to cents from their
//! decimal text, so `29.99` is exactly 2999 cents.

use bazaar_core::validation::{parse_price_value, ValidationResult};
use bazaar_core::{CartAction, ItemDraft, ValidationError};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{SessionError, SessionResult};

/// Result of decoding a well-formed envelope with a known tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A typed action, ready for the reducer.
    Action(CartAction),
    /// The tag was known but its payload was unusable.
    Rejected {
        tag: &'static str,
        error: ValidationError,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// Decodes one action envelope.
///
/// ## Example
/// ```rust
/// use bazaar_session::envelope::{decode, Decoded};
///
/// let decoded = decode(r#"{"type":"REMOVE_ITEM","payload":{"productId":"milk"}}"#).unwrap();
/// assert!(matches!(decoded, Decoded::Action(_)));
///
/// assert!(decode(r#"{"type":"APPLY_COUPON"}"#).is_err());
/// ```
pub fn decode(json: &str) -> SessionResult<Decoded> {
    let envelope: Envelope =
        serde_json::from_str(json).map_err(|e| SessionError::InvalidEnvelope(e.to_string()))?;

    let (tag, parsed): (&'static str, ValidationResult<CartAction>) = match envelope.kind.as_str()
    {
        "ADD_ITEM" => ("ADD_ITEM", add_item(&envelope.payload)),
        "REMOVE_ITEM" => ("REMOVE_ITEM", remove_item(&envelope.payload)),
        "UPDATE_QUANTITY" => ("UPDATE_QUANTITY", update_quantity(&envelope.payload)),
        "CLEAR_CART" => ("CLEAR_CART", Ok(CartAction::ClearCart)),
        _ => return Err(SessionError::UnknownAction(envelope.kind)),
    };

    Ok(match parsed {
        Ok(action) => Decoded::Action(action),
        Err(error) => Decoded::Rejected { tag, error },
    })
}

// =============================================================================
// Payload Decoders
// =============================================================================

fn add_item(payload: &Value) -> ValidationResult<CartAction> {
    let payload = object(payload, "payload")?;
    let item = object(field(payload, "item"), "item")?;

    let product_id = string(item, "productId")?;
    let name = string(item, "name")?;
    let price = parse_price_value(field(item, "price"))?;
    let store_id = string(payload, "storeId")?;

    Ok(CartAction::add_item(
        ItemDraft::new(product_id, name, price),
        store_id,
    ))
}

fn remove_item(payload: &Value) -> ValidationResult<CartAction> {
    let payload = object(payload, "payload")?;
    Ok(CartAction::remove_item(string(payload, "productId")?))
}

fn update_quantity(payload: &Value) -> ValidationResult<CartAction> {
    let payload = object(payload, "payload")?;
    let product_id = string(payload, "productId")?;
    let quantity = match field(payload, "quantity") {
        Value::Number(n) => n.as_f64().ok_or_else(|| not_numeric("quantity"))?,
        Value::Null => {
            return Err(ValidationError::Required {
                field: "quantity".to_string(),
            })
        }
        _ => return Err(not_numeric("quantity")),
    };
    Ok(CartAction::update_quantity(product_id, quantity))
}

// =============================================================================
// Field Helpers
// =============================================================================

static NULL: Value = Value::Null;

fn field<'a>(object: &'a serde_json::Map<String, Value>, name: &str) -> &'a Value {
    object.get(name).unwrap_or(&NULL)
}

fn object<'a>(value: &'a Value, name: &str) -> ValidationResult<&'a serde_json::Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ValidationError::Required {
            field: name.to_string(),
        }),
        _ => Err(ValidationError::InvalidFormat {
            field: name.to_string(),
            reason: "must be an object".to_string(),
        }),
    }
}

fn string(object: &serde_json::Map<String, Value>, name: &str) -> ValidationResult<String> {
    match field(object, name) {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Err(ValidationError::Required {
            field: name.to_string(),
        }),
        _ => Err(ValidationError::InvalidFormat {
            field: name.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

fn not_numeric(name: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: name.to_string(),
        reason: "must be a number".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::Money;

    #[test]
    fn test_decode_add_item() {
        let decoded = decode(
            r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"milk","name":"Milk","price":29.99},"storeId":"storeA"}}"#,
        )
        .unwrap();

        assert_eq!(
            decoded,
            Decoded::Action(CartAction::add_item(
                ItemDraft::new("milk", "Milk", Money::from_cents(2999)),
                "storeA"
            ))
        );
    }

    #[test]
    fn test_decode_update_and_clear() {
        assert_eq!(
            decode(r#"{"type":"UPDATE_QUANTITY","payload":{"productId":"milk","quantity":2.5}}"#)
                .unwrap(),
            Decoded::Action(CartAction::update_quantity("milk", 2.5))
        );
        assert_eq!(
            decode(r#"{"type":"CLEAR_CART"}"#).unwrap(),
            Decoded::Action(CartAction::ClearCart)
        );
        // CLEAR_CART ignores whatever payload comes along.
        assert_eq!(
            decode(r#"{"type":"CLEAR_CART","payload":42}"#).unwrap(),
            Decoded::Action(CartAction::ClearCart)
        );
    }

    #[test]
    fn test_string_price_is_wrong_type() {
        let decoded = decode(
            r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"a","name":"A","price":"12.50"},"storeId":"s"}}"#,
        )
        .unwrap();

        assert_eq!(
            decoded,
            Decoded::Rejected {
                tag: "ADD_ITEM",
                error: ValidationError::InvalidFormat {
                    field: "price".to_string(),
                    reason: "must be a number".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_bad_payloads_are_rejections() {
        let cases = [
            (r#"{"type":"ADD_ITEM"}"#, "payload"),
            (r#"{"type":"ADD_ITEM","payload":{"storeId":"s"}}"#, "item"),
            (
                r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"a","name":"A"},"storeId":"s"}}"#,
                "price",
            ),
            (
                r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"a","name":"A","price":"abc"},"storeId":"s"}}"#,
                "price",
            ),
            (
                r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"a","name":"A","price":"12.50"},"storeId":"s"}}"#,
                "price",
            ),
            (
                r#"{"type":"ADD_ITEM","payload":{"item":{"productId":7,"name":"A","price":1},"storeId":"s"}}"#,
                "productId",
            ),
            (
                r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"a","name":"A","price":1}}}"#,
                "storeId",
            ),
            (r#"{"type":"REMOVE_ITEM","payload":{}}"#, "productId"),
            (
                r#"{"type":"UPDATE_QUANTITY","payload":{"productId":"a","quantity":"3"}}"#,
                "quantity",
            ),
            (
                r#"{"type":"UPDATE_QUANTITY","payload":{"productId":"a"}}"#,
                "quantity",
            ),
        ];

        for (json, field) in cases {
            match decode(json).unwrap() {
                Decoded::Rejected { error, .. } => assert_eq!(error.field(), field, "{json}"),
                other => panic!("expected rejection for {json}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        assert!(matches!(
            decode(r#"{"type":"APPLY_COUPON","payload":{}}"#),
            Err(SessionError::UnknownAction(tag)) if tag == "APPLY_COUPON"
        ));
        assert!(matches!(
            decode(r#"{"type":"add_item"}"#),
            Err(SessionError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_malformed_envelope_is_an_error() {
        assert!(matches!(
            decode("not json"),
            Err(SessionError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            decode(r#"{"payload":{}}"#),
            Err(SessionError::InvalidEnvelope(_))
        ));
        assert!(matches!(
            decode(r#"{"type":3}"#),
            Err(SessionError::InvalidEnvelope(_))
        ));
    }
}
