//! # Cart Session
//!
//! The stateful wrapper around the pure reducer: holds the current cart
//! snapshot, dispatches actions, and memoizes derived totals.
//!
//! ## Thread Safety
//! The snapshot lives behind a `Mutex` so a host may share one session
//! between threads. Dispatch is still one action at a time: the lock is
//! held for the whole `reduce` call, and readers get an `Arc` snapshot they
//! can keep without holding the lock.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Session Operations                              │
//! │                                                                         │
//! │  UI Event               Session Call              Effect                │
//! │  ────────               ────────────              ──────                │
//! │                                                                         │
//! │  Click "Add" ─────────► add_item() ──────┐                             │
//! │  Click remove ────────► remove_item() ───┤                             │
//! │  Change quantity ─────► update_quantity()┼──► reduce() ──► new Arc     │
//! │  Click clear ─────────► clear() ─────────┤         │                   │
//! │  Raw {type, payload} ─► dispatch_json() ─┘         ▼                   │
//! │                                          totals recomputed only if     │
//! │                                          the snapshot changed          │
//! │                                                                         │
//! │  Render cart ─────────► snapshot() / totals() / response()  (read)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bazaar_core::cart::{reduce, CartAction, CartState, Change, Outcome};
use bazaar_core::{CartItem, ItemDraft, Money};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::envelope::{self, Decoded};
use crate::error::SessionResult;

// =============================================================================
// Read Models
// =============================================================================

/// Derived cart figures, recomputed only when the cart changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    #[serde(rename = "totalCents")]
    pub total: Money,
}

impl From<&CartState> for CartTotals {
    fn from(cart: &CartState) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

/// Everything the cart page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub store_id: Option<String>,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

// =============================================================================
// Cart Session
// =============================================================================

#[derive(Debug)]
struct Inner {
    state: Arc<CartState>,
    totals: CartTotals,
    revision: u64,
}

/// A cart plus its memoized totals.
///
/// ## Usage
/// ```rust
/// use bazaar_core::{ItemDraft, Money};
/// use bazaar_session::CartSession;
///
/// let session = CartSession::new();
/// session.add_item(ItemDraft::new("milk", "Milk", Money::from_cents(3000)), "storeA");
/// session.add_item(ItemDraft::new("milk", "Milk", Money::from_cents(3000)), "storeA");
///
/// assert_eq!(session.totals().total, Money::from_cents(6000));
/// ```
#[derive(Debug)]
pub struct CartSession {
    inner: Mutex<Inner>,
}

impl CartSession {
    /// Creates a session holding the empty cart.
    pub fn new() -> Self {
        Self::with_state(CartState::empty())
    }

    /// Creates a session starting from an existing cart (e.g. a restored
    /// snapshot).
    pub fn with_state(state: CartState) -> Self {
        let totals = CartTotals::from(&state);
        CartSession {
            inner: Mutex::new(Inner {
                state: Arc::new(state),
                totals,
                revision: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Snapshots are swapped whole, so a poisoned lock still guards a
        // consistent cart.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one action and reports what happened.
    ///
    /// Never fails: rejected payloads and unknown products leave the cart
    /// unchanged and are logged.
    pub fn dispatch(&self, action: CartAction) -> Outcome {
        let tag = action.tag();
        let mut inner = self.lock();
        let transition = reduce(&inner.state, action);

        if !Arc::ptr_eq(&inner.state, &transition.state) {
            inner.totals = CartTotals::from(transition.state.as_ref());
            inner.state = transition.state;
            inner.revision += 1;
        }

        log_outcome(tag, &transition.outcome, &inner.totals);
        transition.outcome
    }

    /// Decodes and applies a frontend action envelope.
    ///
    /// ## Returns
    /// - `Ok(outcome)` for every known action, including rejected payloads
    /// - `Err(UnknownAction | InvalidEnvelope)` when the envelope itself is
    ///   outside the contract; the cart is not touched
    pub fn dispatch_json(&self, json: &str) -> SessionResult<Outcome> {
        match envelope::decode(json) {
            Ok(Decoded::Action(action)) => Ok(self.dispatch(action)),
            Ok(Decoded::Rejected { tag, error }) => {
                let outcome = Outcome::Rejected { error };
                log_outcome(tag, &outcome, &self.totals());
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Cart action envelope refused");
                Err(e)
            }
        }
    }

    /// Adds one unit of `item` from `store_id`.
    pub fn add_item(&self, item: ItemDraft, store_id: impl Into<String>) -> Outcome {
        self.dispatch(CartAction::add_item(item, store_id))
    }

    /// Removes a line.
    pub fn remove_item(&self, product_id: impl Into<String>) -> Outcome {
        self.dispatch(CartAction::remove_item(product_id))
    }

    /// Sets a line's quantity (floored; ≤ 0 removes).
    pub fn update_quantity(&self, product_id: impl Into<String>, quantity: f64) -> Outcome {
        self.dispatch(CartAction::update_quantity(product_id, quantity))
    }

    /// Empties the cart.
    pub fn clear(&self) -> Outcome {
        self.dispatch(CartAction::ClearCart)
    }

    /// Called by the host after the order service accepted the order.
    pub fn complete_checkout(&self) -> Outcome {
        info!("Order placed, clearing cart");
        self.clear()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<CartState> {
        Arc::clone(&self.lock().state)
    }

    /// Memoized totals for the current snapshot.
    pub fn totals(&self) -> CartTotals {
        self.lock().totals
    }

    /// Number of snapshot replacements so far; unchanged by no-ops.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Executes a function with read access to the current cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let store = session.with_cart(|cart| cart.store_id().map(str::to_owned));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartState) -> R,
    {
        let inner = self.lock();
        f(&inner.state)
    }

    /// Builds the cart page read model.
    pub fn response(&self) -> CartResponse {
        let inner = self.lock();
        CartResponse {
            store_id: inner.state.store_id().map(str::to_owned),
            items: inner.state.items().to_vec(),
            totals: inner.totals,
        }
    }
}

impl Default for CartSession {
    fn default() -> Self {
        Self::new()
    }
}

fn log_outcome(action: &str, outcome: &Outcome, totals: &CartTotals) {
    match outcome {
        Outcome::Applied {
            change: Change::StoreSwitched { from, to },
        } => info!(
            action,
            from = %from,
            to = %to,
            "Cart replaced by item from another store"
        ),
        Outcome::Applied { change } => debug!(
            action,
            ?change,
            items = totals.item_count,
            total = %totals.total,
            "Cart updated"
        ),
        Outcome::NotFound { product_id } => debug!(
            action,
            product_id = %product_id,
            "Cart action ignored, product not in cart"
        ),
        Outcome::Rejected { error } => warn!(
            action,
            field = error.field(),
            error = %error,
            "Cart action rejected"
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> ItemDraft {
        ItemDraft::new("milk", "Milk", Money::from_major_minor(30, 0))
    }

    #[test]
    fn test_dispatch_updates_totals() {
        let session = CartSession::new();
        session.add_item(milk(), "storeA");
        session.add_item(milk(), "storeA");

        let totals = session.totals();
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.total, Money::from_major_minor(60, 0));
        assert_eq!(session.revision(), 2);
    }

    #[test]
    fn test_noop_keeps_snapshot_and_revision() {
        let session = CartSession::new();
        session.add_item(milk(), "storeA");
        let before = session.snapshot();

        let outcome = session.update_quantity("nonexistent", 3.0);
        assert!(matches!(outcome, Outcome::NotFound { .. }));
        let outcome = session.add_item(milk(), "");
        assert!(outcome.is_rejected());

        assert!(Arc::ptr_eq(&before, &session.snapshot()));
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_store_switch_through_session() {
        let session = CartSession::new();
        session.add_item(milk(), "storeA");
        let outcome = session.add_item(
            ItemDraft::new("soap", "Soap", Money::from_major_minor(10, 0)),
            "storeB",
        );

        assert!(matches!(
            outcome,
            Outcome::Applied {
                change: Change::StoreSwitched { .. }
            }
        ));
        let response = session.response();
        assert_eq!(response.store_id.as_deref(), Some("storeB"));
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.totals.total, Money::from_major_minor(10, 0));
    }

    #[test]
    fn test_complete_checkout_clears() {
        let session = CartSession::new();
        session.add_item(milk(), "storeA");
        session.complete_checkout();

        assert!(session.with_cart(CartState::is_empty));
        assert_eq!(session.totals(), CartTotals::default());
    }

    #[test]
    fn test_dispatch_json() {
        let session = CartSession::new();
        let outcome = session
            .dispatch_json(
                r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"milk","name":"Milk","price":30},"storeId":"storeA"}}"#,
            )
            .unwrap();
        assert!(outcome.is_applied());

        let outcome = session
            .dispatch_json(r#"{"type":"UPDATE_QUANTITY","payload":{"productId":"milk","quantity":"lots"}}"#)
            .unwrap();
        assert!(outcome.is_rejected());

        assert!(session
            .dispatch_json(r#"{"type":"EMPTY_TRASH","payload":{}}"#)
            .is_err());

        assert_eq!(session.totals().total, Money::from_major_minor(30, 0));
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let session = Arc::new(CartSession::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        session.add_item(milk(), "storeA");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(session.snapshot().items()[0].quantity, 100);
        assert_eq!(session.revision(), 100);
    }

    #[test]
    fn test_response_json_shape() {
        let session = CartSession::new();
        session.add_item(milk(), "storeA");
        let json = serde_json::to_value(session.response()).unwrap();

        assert_eq!(json["storeId"], "storeA");
        assert_eq!(json["items"][0]["priceCents"], 3000);
        assert_eq!(json["totals"]["totalCents"], 3000);
        assert_eq!(json["totals"]["itemCount"], 1);
    }
}
