//! # Cart State Machine
//!
//! The cart reducer: a pure function from `(state, action)` to the next
//! state snapshot.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Action            From        Condition              To               │
//! │  ──────            ────        ─────────              ──               │
//! │  AddItem           Empty       -                      Populated(s)     │
//! │  AddItem(s)        Populated(s) product present       qty + 1          │
//! │  AddItem(s)        Populated(s) product absent        append, qty 1    │
//! │  AddItem(t)        Populated(s) t ≠ s                 Populated(t, [1])│
//! │  Remove/Update≤0   Populated   last item              Empty            │
//! │  Remove/Update≤0   Populated   other items remain     Populated        │
//! │  Update>0          Populated   product present        qty replaced     │
//! │  Remove/Update     any         product absent         unchanged        │
//! │  ClearCart         any         -                      Empty            │
//! │                                                                         │
//! │  Invalid payload in any row → unchanged + Outcome::Rejected            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshots
//! States are shared as `Arc<CartState>`. The reducer never mutates its
//! input; when nothing changes it hands back the very same `Arc`, so callers
//! can detect a no-op with `Arc::ptr_eq`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use bazaar_core::cart::{reduce, CartAction, CartState};
//! use bazaar_core::{ItemDraft, Money};
//!
//! let empty = Arc::new(CartState::empty());
//! let milk = ItemDraft::new("milk", "Milk", Money::from_cents(3000));
//!
//! let step = reduce(&empty, CartAction::add_item(milk, "storeA"));
//! assert_eq!(step.state.store_id(), Some("storeA"));
//! assert_eq!(step.state.total(), Money::from_cents(3000));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartItem, ItemDraft, Phase};
use crate::validation::{
    validate_price, validate_product_id, validate_product_name, validate_quantity_input,
    validate_store_id, ValidationResult,
};

// =============================================================================
// Cart State
// =============================================================================

/// The cart: an optional store and its items in insertion order.
///
/// ## Invariants
/// - `store_id` is `None` exactly when `items` is empty
/// - product ids are unique, quantities are ≥ 1, prices are ≥ 0
///
/// Deserialization checks every invariant, so a snapshot that breaks one is
/// refused instead of producing an inconsistent cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    store_id: Option<String>,
    items: Vec<CartItem>,
}

/// Unchecked wire form of `CartState`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartState {
    store_id: Option<String>,
    #[serde(default)]
    items: Vec<CartItem>,
}

impl<'de> Deserialize<'de> for CartState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCartState::deserialize(deserializer)?;
        CartState::from_parts(raw.store_id, raw.items).map_err(de::Error::custom)
    }
}

impl CartState {
    /// The initial, empty cart.
    pub fn empty() -> Self {
        CartState {
            store_id: None,
            items: Vec::new(),
        }
    }

    /// Builds a cart from parts, checking every invariant.
    pub fn from_parts(store_id: Option<String>, items: Vec<CartItem>) -> ValidationResult<Self> {
        match (&store_id, items.is_empty()) {
            (None, true) => return Ok(CartState::empty()),
            (None, false) => {
                return Err(ValidationError::Required {
                    field: "storeId".to_string(),
                })
            }
            (Some(_), true) => {
                return Err(ValidationError::Required {
                    field: "items".to_string(),
                })
            }
            (Some(store_id), false) => validate_store_id(store_id)?,
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            validate_product_id(&item.product_id)?;
            validate_product_name(&item.name)?;
            validate_price(item.price)?;
            if item.quantity == 0 {
                return Err(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: i64::from(u32::MAX),
                });
            }
            if !seen.insert(item.product_id.as_str()) {
                return Err(ValidationError::InvalidFormat {
                    field: "items".to_string(),
                    reason: format!("duplicate productId {}", item.product_id),
                });
            }
        }

        Ok(CartState { store_id, items })
    }

    /// Store every item belongs to, `None` when the cart is empty.
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up an item by product id.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Which state of the machine this snapshot is in.
    pub fn phase(&self) -> Phase<'_> {
        match self.store_id.as_deref() {
            Some(store_id) if !self.items.is_empty() => Phase::Populated { store_id },
            _ => Phase::Empty,
        }
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `price × quantity` over all lines.
    ///
    /// Always finite and non-negative: invalid lines count as zero and the
    /// sum saturates.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Money::zero(), Money::saturating_add)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// The closed set of cart actions.
///
/// Matching is exhaustive, so the reducer has no "unknown action" branch;
/// the JSON envelope decoder in bazaar-session is where unknown tags are
/// refused.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add one unit of a product sold by `store_id`.
    AddItem { item: ItemDraft, store_id: String },
    /// Drop a line entirely.
    RemoveItem { product_id: String },
    /// Set a line's quantity; floored, and ≤ 0 removes the line.
    UpdateQuantity { product_id: String, quantity: f64 },
    /// Reset to the empty cart.
    ClearCart,
}

impl CartAction {
    /// Shorthand for [`CartAction::AddItem`].
    pub fn add_item(item: ItemDraft, store_id: impl Into<String>) -> Self {
        CartAction::AddItem {
            item,
            store_id: store_id.into(),
        }
    }

    /// Shorthand for [`CartAction::RemoveItem`].
    pub fn remove_item(product_id: impl Into<String>) -> Self {
        CartAction::RemoveItem {
            product_id: product_id.into(),
        }
    }

    /// Shorthand for [`CartAction::UpdateQuantity`].
    pub fn update_quantity(product_id: impl Into<String>, quantity: f64) -> Self {
        CartAction::UpdateQuantity {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Wire tag used by the frontend's action envelope.
    pub fn tag(&self) -> &'static str {
        match self {
            CartAction::AddItem { .. } => "ADD_ITEM",
            CartAction::RemoveItem { .. } => "REMOVE_ITEM",
            CartAction::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            CartAction::ClearCart => "CLEAR_CART",
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What an applied action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum Change {
    /// New line appended with quantity 1.
    #[serde(rename_all = "camelCase")]
    ItemAdded { product_id: String },
    /// Existing line bumped by one.
    #[serde(rename_all = "camelCase")]
    QuantityIncremented { product_id: String, quantity: u32 },
    /// Cart from another store discarded and replaced by one new line.
    StoreSwitched { from: String, to: String },
    /// Line removed, other lines remain.
    #[serde(rename_all = "camelCase")]
    ItemRemoved { product_id: String },
    /// Line quantity replaced.
    #[serde(rename_all = "camelCase")]
    QuantityUpdated { product_id: String, quantity: u32 },
    /// The last line was removed; back to the empty cart.
    #[serde(rename_all = "camelCase")]
    Emptied { product_id: String },
    /// ClearCart.
    Cleared,
}

/// Result classification of one reducer step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    /// The action changed the cart.
    Applied { change: Change },
    /// Remove/update named a product that isn't in the cart. Not an error.
    #[serde(rename_all = "camelCase")]
    NotFound { product_id: String },
    /// The payload was malformed; the cart is unchanged.
    Rejected { error: ValidationError },
}

impl Outcome {
    /// Checks if the action changed the cart.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    /// Checks if the payload was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }

    /// Converts to a `Result` for callers that treat no-ops as failures.
    ///
    /// ```rust
    /// use bazaar_core::{CoreError, Outcome};
    ///
    /// let outcome = Outcome::NotFound { product_id: "tea".to_string() };
    /// assert!(matches!(outcome.into_result(), Err(CoreError::ProductNotInCart(id)) if id == "tea"));
    /// ```
    pub fn into_result(self) -> CoreResult<Change> {
        match self {
            Outcome::Applied { change } => Ok(change),
            Outcome::NotFound { product_id } => Err(CoreError::ProductNotInCart(product_id)),
            Outcome::Rejected { error } => Err(CoreError::Validation(error)),
        }
    }
}

/// The next snapshot plus what happened.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Arc<CartState>,
    pub outcome: Outcome,
}

impl Transition {
    fn unchanged(state: &Arc<CartState>, outcome: Outcome) -> Self {
        Transition {
            state: Arc::clone(state),
            outcome,
        }
    }

    fn replaced(state: CartState, change: Change) -> Self {
        Transition {
            state: Arc::new(state),
            outcome: Outcome::Applied { change },
        }
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Computes the next cart snapshot for `action`.
///
/// Total: every action yields a transition. Malformed payloads come back as
/// [`Outcome::Rejected`] with the input snapshot, never as a panic.
pub fn reduce(state: &Arc<CartState>, action: CartAction) -> Transition {
    let result = match action {
        CartAction::AddItem { item, store_id } => add_item(state, item, store_id),
        CartAction::RemoveItem { product_id } => remove_item(state, product_id),
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => update_quantity(state, product_id, quantity),
        CartAction::ClearCart => Ok(Transition::replaced(CartState::empty(), Change::Cleared)),
    };

    match result {
        Ok(transition) => transition,
        Err(Step::NotFound(product_id)) => {
            Transition::unchanged(state, Outcome::NotFound { product_id })
        }
        Err(Step::Rejected(error)) => Transition::unchanged(state, Outcome::Rejected { error }),
    }
}

/// Early exits of a reducer step that leave the state unchanged.
enum Step {
    NotFound(String),
    Rejected(ValidationError),
}

impl From<ValidationError> for Step {
    fn from(error: ValidationError) -> Self {
        Step::Rejected(error)
    }
}

type StepResult = Result<Transition, Step>;

fn add_item(state: &CartState, item: ItemDraft, store_id: String) -> StepResult {
    validate_product_id(&item.product_id)?;
    validate_product_name(&item.name)?;
    validate_price(item.price)?;
    validate_store_id(&store_id)?;

    if let Some(current) = state.store_id.as_deref() {
        if current != store_id {
            let from = current.to_string();
            let next = CartState {
                store_id: Some(store_id.clone()),
                items: vec![CartItem::from_draft(item)],
            };
            return Ok(Transition::replaced(
                next,
                Change::StoreSwitched { from, to: store_id },
            ));
        }
    }

    let mut items = state.items.clone();
    let change = match state.position(&item.product_id) {
        Some(index) => {
            let line = &mut items[index];
            line.quantity = line.quantity.checked_add(1).ok_or_else(|| {
                ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: i64::from(u32::MAX),
                }
            })?;
            Change::QuantityIncremented {
                product_id: item.product_id,
                quantity: line.quantity,
            }
        }
        None => {
            let product_id = item.product_id.clone();
            items.push(CartItem::from_draft(item));
            Change::ItemAdded { product_id }
        }
    };

    let next = CartState {
        store_id: Some(store_id),
        items,
    };
    Ok(Transition::replaced(next, change))
}

fn remove_item(state: &CartState, product_id: String) -> StepResult {
    validate_product_id(&product_id)?;

    let index = state
        .position(&product_id)
        .ok_or_else(|| Step::NotFound(product_id.clone()))?;

    if state.items.len() == 1 {
        return Ok(Transition::replaced(
            CartState::empty(),
            Change::Emptied { product_id },
        ));
    }

    let mut items = state.items.clone();
    items.remove(index);
    let next = CartState {
        store_id: state.store_id.clone(),
        items,
    };
    Ok(Transition::replaced(
        next,
        Change::ItemRemoved { product_id },
    ))
}

fn update_quantity(state: &CartState, product_id: String, quantity: f64) -> StepResult {
    validate_product_id(&product_id)?;
    let quantity = validate_quantity_input(quantity)?;

    let quantity = match u32::try_from(quantity) {
        Ok(quantity) if quantity > 0 => quantity,
        // Zero or negative after flooring: same as RemoveItem.
        _ => return remove_item(state, product_id),
    };

    let index = state
        .position(&product_id)
        .ok_or_else(|| Step::NotFound(product_id.clone()))?;

    let mut items = state.items.clone();
    items[index].quantity = quantity;
    let next = CartState {
        store_id: state.store_id.clone(),
        items,
    };
    Ok(Transition::replaced(
        next,
        Change::QuantityUpdated {
            product_id,
            quantity,
        },
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
