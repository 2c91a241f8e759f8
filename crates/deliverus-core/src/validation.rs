//! # Validation Module
//!
//! Field validation of order request bodies.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Customer client                                               │
//! │  ├── Cart only offers available products, quantities ≥ 0               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (field checks on raw JSON)                       │
//! │  ├── Presence, JSON type, positive integers, address length            │
//! │  └── Collects EVERY failure, not just the first                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order rules (crate::rules + database lookups)                │
//! │  ├── Restaurant exists, products belong to it and are available       │
//! │  └── Order still pending                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bodies arrive as [`serde_json::Value`] instead of typed structs so that a
//! wrong type in one field does not hide the errors of the other fields.
//! Integers are accepted as JSON numbers or as numeric strings (`"3"`).
//!
//! ## Usage
//! ```rust
//! use deliverus_core::validation::validate_create_payload;
//! use serde_json::json;
//!
//! let order = validate_create_payload(&json!({
//!     "restaurantId": 1,
//!     "address": "  Calle Sierpes 12 ",
//!     "products": [{ "productId": 3, "quantity": "2" }]
//! }))
//! .unwrap();
//!
//! assert_eq!(order.address, "Calle Sierpes 12");
//! assert_eq!(order.products[0].quantity, 2);
//! ```

use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationErrors};
use crate::payload::{CreateOrder, OrderLineRequest, UpdateOrder};
use crate::MAX_ADDRESS_LENGTH;

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the body of `POST /orders`.
///
/// ## Rules
/// - `restaurantId`: present, positive integer
/// - `products`: present, non-empty array of `{productId, quantity}` with
///   positive integers
/// - `address`: present, string, 1 to 255 characters once trimmed
///
/// Repeated product ids are merged into one line by summing quantities.
pub fn validate_create_payload(body: &Value) -> Result<CreateOrder, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let obj = as_object(body)?;

    let restaurant_id = record(&mut errors, positive_int(obj.get("restaurantId"), "restaurantId"));
    let products = products_field(obj.get("products"), &mut errors);
    let address = record(&mut errors, validate_address(obj.get("address")));

    match (restaurant_id, products, address) {
        (Some(restaurant_id), Some(products), Some(address)) if errors.is_empty() => {
            Ok(CreateOrder {
                restaurant_id,
                address,
                products: merge_lines(products),
            })
        }
        _ => Err(errors),
    }
}

/// Validates the body of `PUT /orders/{orderId}`.
///
/// Same `products` and `address` rules as [`validate_create_payload`]. A
/// `restaurantId` key is rejected whatever its value, `null` included.
pub fn validate_update_payload(body: &Value) -> Result<UpdateOrder, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let obj = as_object(body)?;

    if obj.contains_key("restaurantId") {
        errors.push(ValidationError::Forbidden {
            field: "restaurantId".to_string(),
        });
    }
    let products = products_field(obj.get("products"), &mut errors);
    let address = record(&mut errors, validate_address(obj.get("address")));

    match (products, address) {
        (Some(products), Some(address)) if errors.is_empty() => Ok(UpdateOrder {
            address,
            products: merge_lines(products),
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a delivery address and returns it trimmed.
///
/// ## Example
/// ```rust
/// use deliverus_core::validation::validate_address;
/// use serde_json::json;
///
/// assert_eq!(validate_address(Some(&json!(" Home "))).unwrap(), "Home");
/// assert!(validate_address(Some(&json!("   "))).is_err());
/// assert!(validate_address(Some(&json!(42))).is_err());
/// ```
pub fn validate_address(value: Option<&Value>) -> ValidationResult<String> {
    match value {
        None | Some(Value::Null) => Err(required("address")),
        Some(Value::String(s)) => validate_address_text(s),
        Some(_) => Err(ValidationError::InvalidFormat {
            field: "address".to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

/// Address rules on an already-typed string.
pub fn validate_address_text(address: &str) -> ValidationResult<String> {
    let address = address.trim();

    if address.is_empty() {
        return Err(required("address"));
    }

    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: MAX_ADDRESS_LENGTH,
        });
    }

    Ok(address.to_string())
}

/// Reads a positive integer given as a JSON number or a numeric string.
///
/// ## Example
/// ```rust
/// use deliverus_core::validation::positive_int;
/// use serde_json::json;
///
/// assert_eq!(positive_int(Some(&json!(7)), "quantity").unwrap(), 7);
/// assert_eq!(positive_int(Some(&json!(" 7 ")), "quantity").unwrap(), 7);
/// assert!(positive_int(Some(&json!(0)), "quantity").is_err());
/// assert!(positive_int(Some(&json!(1.5)), "quantity").is_err());
/// ```
pub fn positive_int(value: Option<&Value>, field: &str) -> ValidationResult<i64> {
    let parsed = match value {
        None | Some(Value::Null) => return Err(required(field)),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        ValidationError::InvalidFormat {
            field: "body".to_string(),
            reason: "must be a JSON object".to_string(),
        }
        .into()
    })
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

/// Keeps the value on success, records the error otherwise.
fn record<T>(errors: &mut ValidationErrors, result: ValidationResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn products_field(
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<Vec<OrderLineRequest>> {
    let entries = match value {
        None | Some(Value::Null) => {
            errors.push(required("products"));
            return None;
        }
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            errors.push(ValidationError::InvalidFormat {
                field: "products".to_string(),
                reason: "must be an array".to_string(),
            });
            return None;
        }
    };

    if entries.is_empty() {
        errors.push(ValidationError::Empty {
            field: "products".to_string(),
        });
        return None;
    }

    let before = errors.len();
    let mut lines = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let Some(entry) = entry.as_object() else {
            errors.push(ValidationError::InvalidFormat {
                field: format!("products[{i}]"),
                reason: "must be an object with productId and quantity".to_string(),
            });
            continue;
        };

        let product_id = record(
            errors,
            positive_int(entry.get("productId"), &format!("products[{i}].productId")),
        );
        let quantity = record(
            errors,
            positive_int(entry.get("quantity"), &format!("products[{i}].quantity")),
        );
        if let (Some(product_id), Some(quantity)) = (product_id, quantity) {
            lines.push(OrderLineRequest {
                product_id,
                quantity,
            });
        }
    }

    (errors.len() == before).then_some(lines)
}

/// Merges repeated product ids, keeping first-seen order.
fn merge_lines(lines: Vec<OrderLineRequest>) -> Vec<OrderLineRequest> {
    let mut merged: Vec<OrderLineRequest> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn fields(errors: &ValidationErrors) -> Vec<String> {
        errors.iter().map(|e| e.field().to_string()).collect()
    }

    #[test]
    fn test_valid_create_payload() {
        let order = validate_create_payload(&json!({
            "restaurantId": 1,
            "address": "Calle Sierpes 12",
            "products": [
                { "productId": 3, "quantity": 2 },
                { "productId": "4", "quantity": "1" }
            ]
        }))
        .unwrap();

        assert_eq!(order.restaurant_id, 1);
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[1].product_id, 4);
    }

    #[test]
    fn test_empty_products_rejected() {
        let errors = validate_create_payload(&json!({
            "restaurantId": 1,
            "address": "Home",
            "products": []
        }))
        .unwrap_err();

        assert_eq!(
            errors.0,
            vec![ValidationError::Empty {
                field: "products".to_string()
            }]
        );
    }

    #[test]
    fn test_all_field_errors_are_collected() {
        let errors = validate_create_payload(&json!({
            "restaurantId": "abc",
            "address": "   ",
            "products": [
                { "productId": 0, "quantity": 1 },
                { "productId": 2, "quantity": -3 },
                "oops"
            ]
        }))
        .unwrap_err();

        assert_eq!(
            fields(&errors),
            vec![
                "restaurantId",
                "products[0].productId",
                "products[1].quantity",
                "products[2]",
                "address"
            ]
        );
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = validate_create_payload(&json!({})).unwrap_err();
        assert_eq!(fields(&errors), vec!["restaurantId", "products", "address"]);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::Required { .. })));
    }

    #[test]
    fn test_non_object_body_rejected() {
        let errors = validate_create_payload(&json!([1, 2])).unwrap_err();
        assert_eq!(fields(&errors), vec!["body"]);
    }

    #[rstest]
    #[case(json!(1))]
    #[case(json!(null))]
    #[case(json!("1"))]
    #[case(json!({}))]
    fn test_update_rejects_any_restaurant_id(#[case] restaurant_id: Value) {
        let errors = validate_update_payload(&json!({
            "restaurantId": restaurant_id,
            "address": "Home",
            "products": [{ "productId": 1, "quantity": 1 }]
        }))
        .unwrap_err();

        assert_eq!(
            errors.0,
            vec![ValidationError::Forbidden {
                field: "restaurantId".to_string()
            }]
        );
    }

    #[test]
    fn test_valid_update_payload() {
        let update = validate_update_payload(&json!({
            "address": " New address ",
            "products": [{ "productId": 1, "quantity": 5 }]
        }))
        .unwrap();

        assert_eq!(update.address, "New address");
        assert_eq!(update.products[0].quantity, 5);
    }

    #[test]
    fn test_duplicate_products_are_merged() {
        let order = validate_create_payload(&json!({
            "restaurantId": 1,
            "address": "Home",
            "products": [
                { "productId": 3, "quantity": 1 },
                { "productId": 5, "quantity": 1 },
                { "productId": 3, "quantity": 2 }
            ]
        }))
        .unwrap();

        assert_eq!(
            order.products,
            vec![
                OrderLineRequest { product_id: 3, quantity: 3 },
                OrderLineRequest { product_id: 5, quantity: 1 }
            ]
        );
    }

    #[rstest]
    #[case(MAX_ADDRESS_LENGTH, true)]
    #[case(MAX_ADDRESS_LENGTH + 1, false)]
    fn test_address_length_boundary(#[case] len: usize, #[case] ok: bool) {
        let address = "a".repeat(len);
        assert_eq!(validate_address_text(&address).is_ok(), ok);
    }

    #[test]
    fn test_address_length_counts_characters() {
        let address = "ñ".repeat(MAX_ADDRESS_LENGTH);
        assert!(validate_address_text(&address).is_ok());
    }

    #[rstest]
    #[case(json!(3), Some(3))]
    #[case(json!("12"), Some(12))]
    #[case(json!(0), None)]
    #[case(json!(-1), None)]
    #[case(json!(2.5), None)]
    #[case(json!("two"), None)]
    #[case(json!(true), None)]
    fn test_positive_int(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(positive_int(Some(&value), "quantity").ok(), expected);
    }
}
