//! Collection-scoped JSON document storage.
//!
//! Every record is one file: `<root>/<collection>/<resource>.json`,
//! tab-indented with a trailing newline. Collections are plain directories
//! created on first write.
//!
//! # Design Rules
//!
//! 1. A committed document is always complete: writes are staged in a
//!    `.json.tmp` sibling and renamed into place.
//! 2. Writes and deletes are serialized per collection but run in parallel
//!    across collections ([`LockRegistry`]).
//! 3. Reads take no lock. They observe the previous or the new document,
//!    never a partial one.
//! 4. Every failure is returned as a typed [`StoreError`]; nothing is retried
//!    or swallowed.
//!
//! ```no_run
//! use jsondb_store::RecordStore;
//! use serde_json::json;
//!
//! let store = RecordStore::open("./db")?;
//! store.write("users", "alice", &json!({ "Name": "Alice", "Age": "30" }))?;
//! let alice: serde_json::Value = store.read("users", "alice")?;
//! assert_eq!(alice["Name"], "Alice");
//! # Ok::<(), jsondb_store::StoreError>(())
//! ```

pub mod config;
pub mod error;
pub mod lock;
pub mod names;
pub mod paths;
pub mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use lock::LockRegistry;
pub use store::RecordStore;
