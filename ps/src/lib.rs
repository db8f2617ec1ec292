//! ProfileStore - user-scoped JSON key-value store
//!
//! Holds the per-user records the diet planner persists between runs: the
//! profile snapshot and the saved-recipes set. Every record is a single JSON
//! document addressed by `(user, key)`.
//!
//! # Layout
//!
//! ```text
//! store/
//! ├── .lock                  # exclusive writer lock
//! └── {user}/
//!     ├── profile.json
//!     └── saved_recipes.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use profilestore::ProfileStore;
//!
//! let store = ProfileStore::open("/tmp/store")?;
//! store.put("asha", "profile", r#"{"age":31}"#)?;
//! assert!(store.get("asha", "profile")?.is_some());
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{ProfileStore, RECORD_EXTENSION};
