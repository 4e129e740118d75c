//! # bazaar-core: Pure Cart Logic for Bazaar
//!
//! This crate is the **heart** of the Bazaar storefront cart. It contains
//! the cart state machine as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Stores ──► Products ──► Cart ──► Guest Checkout              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ {type, payload} actions               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                bazaar-session (CartSession)                     │   │
//! │  │    dispatch, memoized totals, checkout payload, snapshot        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ CartItem  │  │   Money   │  │  reduce   │  │   rules   │  │   │
//! │  │   │ ItemDraft │  │  (cents)  │  │ CartState │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The reducer, `CartState`, `CartAction`, `Outcome`
//! - [`types`] - `CartItem`, `ItemDraft`, `Phase`
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Payload validation and exact price parsing
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same state + same action = same next state
//! 2. **Snapshots**: the reducer returns new `Arc<CartState>` values, never
//!    mutating the one it was given
//! 3. **Integer Money**: all monetary values are in cents (i64)
//! 4. **Rejections are data**: a bad payload produces `Outcome::Rejected`,
//!    not a panic or an `Err`
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use bazaar_core::cart::{reduce, CartAction, CartState};
//! use bazaar_core::{ItemDraft, Money};
//!
//! let cart = Arc::new(CartState::empty());
//! let milk = ItemDraft::new("milk", "Milk", Money::from_major_minor(30, 0));
//!
//! let cart = reduce(&cart, CartAction::add_item(milk.clone(), "storeA")).state;
//! let cart = reduce(&cart, CartAction::add_item(milk, "storeA")).state;
//!
//! assert_eq!(cart.items()[0].quantity, 2);
//! assert_eq!(cart.total(), Money::from_major_minor(60, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{reduce, CartAction, CartState, Change, Outcome, Transition};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
