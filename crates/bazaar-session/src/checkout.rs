//! # Checkout Payload
//!
//! Packages the cart into the order-creation request a host sends to the
//! order service. No I/O happens here.
//!
//! ## Guest Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart page                                                              │
//! │     │  snapshot()                                                       │
//! │     ▼                                                                   │
//! │  CreateOrderRequest::from_cart(cart, customer)  ◄── THIS MODULE         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  host: POST /api/orders  (outside this crate)                          │
//! │     │                                                                   │
//! │     ├── success ──► session.complete_checkout()  (cart cleared)        │
//! │     └── failure ──► nothing; the cart stays as it was                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices go out in major units (`29.99`), which is what the order service
//! stores.

use bazaar_core::{CartState, CoreError, Money, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::error::CheckoutError;

/// Maximum length of any contact field.
pub const MAX_CONTACT_LEN: usize = 300;

/// Contact details a guest enters at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl GuestDetails {
    /// Checks every field is present and of reasonable length.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
        ] {
            let value = value.trim();
            if value.is_empty() {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                });
            }
            if value.chars().count() > MAX_CONTACT_LEN {
                return Err(ValidationError::TooLong {
                    field: field.to_string(),
                    max: MAX_CONTACT_LEN,
                });
            }
        }
        Ok(())
    }
}

/// One order line as the order service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    #[serde(serialize_with = "major_units")]
    pub price: Money,
    pub quantity: u32,
}

/// Order-creation request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Client-generated key so a retried submission isn't placed twice.
    pub client_order_id: Uuid,
    pub store_id: String,
    pub items: Vec<OrderLine>,
    pub customer: GuestDetails,
    pub created_at: DateTime<Utc>,
}

impl CreateOrderRequest {
    /// Builds the request from a cart snapshot.
    ///
    /// ## Errors
    /// - `CheckoutError::Cart(EmptyCart)` if there is nothing to order
    /// - `CheckoutError::Customer(..)` if a contact field is missing
    pub fn from_cart(cart: &CartState, customer: GuestDetails) -> Result<Self, CheckoutError> {
        let store_id = cart.store_id().ok_or(CoreError::EmptyCart)?;
        customer.validate()?;

        let items = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
            })
            .collect();

        Ok(CreateOrderRequest {
            client_order_id: Uuid::new_v4(),
            store_id: store_id.to_string(),
            items,
            customer,
            created_at: Utc::now(),
        })
    }

    /// Sum of the order lines, for display next to the submit button.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .map(|line| line.price.checked_mul_quantity(line.quantity).unwrap_or_default())
            .fold(Money::zero(), Money::saturating_add)
    }
}

fn major_units<S: Serializer>(price: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    price.to_json_number().serialize(serializer)
}
