// Storage module for local persistence.
// Holds tokens and app preferences in a platform key-value store.

pub mod paths;
pub mod preferences;
pub mod store;

pub use preferences::{FontMode, Preferences, ThemeMode};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoredValue};
