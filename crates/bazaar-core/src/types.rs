//! # Domain Types
//!
//! Value types carried by the cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   AddItem    ┌─────────────────┐                  │
//! │  │   ItemDraft     │ ───────────► │    CartItem     │                  │
//! │  │  ─────────────  │              │  ─────────────  │                  │
//! │  │  product_id     │              │  product_id     │                  │
//! │  │  name           │              │  name           │                  │
//! │  │  price          │              │  price          │                  │
//! │  └─────────────────┘              │  quantity ≥ 1   │                  │
//! │                                   └─────────────────┘                  │
//! │                                                                         │
//! │  ┌─────────────────────────────┐                                       │
//! │  │  Phase                      │                                       │
//! │  │  Empty | Populated(store)   │                                       │
//! │  └─────────────────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item Draft
// =============================================================================

/// The product half of an AddItem payload, before it enters the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub product_id: String,
    pub name: String,
    #[serde(rename = "priceCents")]
    pub price: Money,
}

impl ItemDraft {
    /// Creates a draft from its parts.
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        ItemDraft {
            product_id: product_id.into(),
            name: name.into(),
            price,
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Invariants (held by the reducer)
/// - `product_id` is unique within a cart
/// - `quantity >= 1`
/// - `price >= 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier, the key within the cart.
    pub product_id: String,

    /// Display name captured when the item was added.
    pub name: String,

    /// Unit price captured when the item was added.
    #[serde(rename = "priceCents")]
    pub price: Money,

    /// Units in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a single-unit line from a draft.
    pub fn from_draft(draft: ItemDraft) -> Self {
        CartItem {
            product_id: draft.product_id,
            name: draft.name,
            price: draft.price,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    ///
    /// A negative price, a zero quantity or an overflowing product contributes
    /// nothing, so a cart total can never turn negative or wrap.
    pub fn line_total(&self) -> Money {
        if self.price.is_negative() || self.quantity == 0 {
            return Money::zero();
        }
        self.price
            .checked_mul_quantity(self.quantity)
            .unwrap_or_else(Money::zero)
    }
}

// =============================================================================
// Phase
// =============================================================================

/// The two states of the cart machine.
///
/// ```text
///            AddItem                   AddItem (same or other store)
///   Empty ────────────► Populated ◄──────────────┐
///     ▲                    │  └─────────────────┘
///     │  Remove/Update     │
///     └──(last item)───────┘   ClearCart from anywhere → Empty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
    /// No store, no items.
    Empty,
    /// At least one item, all from `store_id`.
    Populated { store_id: &'a str },
}

// =============================================================================
// Unit Tests
// =============================================================================
