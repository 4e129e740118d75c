//! # Cart Snapshots
//!
//! Optional persistence of the cart between runs, as a small JSON file.
//!
//! ## File Format
//! ```json
//! {
//!   "version": 1,
//!   "savedAt": "2026-10-18T09:30:00Z",
//!   "cart": { "storeId": "storeA", "items": [ ... ] }
//! }
//! ```
//!
//! The `cart` field goes through `CartState`'s checked deserialization, so a
//! file that breaks a cart invariant is refused as a whole.

use std::path::Path;

use bazaar_core::CartState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SessionResult;
use crate::session::CartSession;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    version: u32,
    saved_at: DateTime<Utc>,
    cart: CartState,
}

/// Writes `cart` to `path`, creating parent directories as needed.
pub fn save(path: &Path, cart: &CartState) -> SessionResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        cart: cart.clone(),
    };
    std::fs::write(path, serde_json::to_vec_pretty(&file)?)?;

    debug!(?path, items = cart.item_count(), "Cart snapshot saved");
    Ok(())
}

/// Reads a snapshot. `Ok(None)` when the file doesn't exist.
pub fn load(path: &Path) -> SessionResult<Option<CartState>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let file: SnapshotFile = serde_json::from_slice(&bytes)?;
    if file.version != SNAPSHOT_VERSION {
        warn!(
            ?path,
            version = file.version,
            "Snapshot written by a different version, loading anyway"
        );
    }
    Ok(Some(file.cart))
}

impl CartSession {
    /// Starts a session from the snapshot at `path`.
    ///
    /// A missing file gives an empty cart. So does an unreadable or invalid
    /// one, after logging why: a stale cart is never worth failing startup.
    pub fn restore(path: &Path) -> Self {
        match load(path) {
            Ok(Some(cart)) => {
                info!(?path, items = cart.item_count(), "Cart restored from snapshot");
                CartSession::with_state(cart)
            }
            Ok(None) => {
                debug!(?path, "No cart snapshot, starting empty");
                CartSession::new()
            }
            Err(e) => {
                warn!(?path, error = %e, "Discarding unusable cart snapshot");
                CartSession::new()
            }
        }
    }

    /// Saves the current cart to `path`.
    pub fn save_snapshot(&self, path: &Path) -> SessionResult<()> {
        save(path, &self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::{ItemDraft, Money};

    #[test]
    fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.json");

        let session = CartSession::new();
        session.add_item(ItemDraft::new("milk", "Milk", Money::from_cents(3000)), "storeA");
        session.update_quantity("milk", 4.0);
        session.save_snapshot(&path).unwrap();

        let restored = CartSession::restore(&path);
        assert_eq!(*restored.snapshot(), *session.snapshot());
        assert_eq!(restored.totals().total, Money::from_cents(12000));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        assert!(load(&path).unwrap().is_none());
        assert!(CartSession::restore(&path).snapshot().is_empty());
    }

    #[test]
    fn test_corrupt_or_invalid_snapshot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_err());
        assert!(CartSession::restore(&path).snapshot().is_empty());

        // Items without a store break the cart invariant.
        std::fs::write(
            &path,
            r#"{"version":1,"savedAt":"2026-10-18T09:30:00Z","cart":{"storeId":null,"items":[{"productId":"a","name":"A","priceCents":100,"quantity":1}]}}"#,
        )
        .unwrap();
        assert!(load(&path).is_err());
        assert!(CartSession::restore(&path).snapshot().is_empty());
    }
}
