//! # bazaar-session: Cart Session Layer
//!
//! Everything between the pure reducer in `bazaar-core` and a host (UI
//! bridge, shell, server handler).
//!
//! ## Module Organization
//! ```text
//! bazaar_session/
//! ├── lib.rs          ◄─── You are here
//! ├── session.rs      ◄─── CartSession: dispatch + memoized totals
//! ├── envelope.rs     ◄─── {type, payload} JSON → CartAction
//! ├── checkout.rs     ◄─── Cart → CreateOrderRequest
//! ├── snapshot.rs     ◄─── Cart ⇄ JSON file
//! ├── config.rs       ◄─── SessionConfig (TOML + env)
//! └── error.rs        ◄─── SessionError, CheckoutError
//! ```
//!
//! ## Typical Host Loop
//! ```rust
//! use bazaar_session::CartSession;
//!
//! let session = CartSession::new();
//! let outcome = session
//!     .dispatch_json(r#"{"type":"ADD_ITEM","payload":{"item":{"productId":"milk","name":"Milk","price":30},"storeId":"storeA"}}"#)
//!     .expect("known action");
//! assert!(outcome.is_applied());
//! assert_eq!(session.totals().total.cents(), 3000);
//! ```

pub mod checkout;
pub mod config;
pub mod envelope;
pub mod error;
pub mod session;
pub mod snapshot;

pub use checkout::{CreateOrderRequest, GuestDetails, OrderLine};
pub use config::{ConfigError, SessionConfig};
pub use error::{CheckoutError, SessionError, SessionResult};
pub use session::{CartResponse, CartSession, CartTotals};
