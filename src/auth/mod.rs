// Authentication module.
// Token persistence and the refresh cycle used by the API client.

pub mod refresh;
pub mod tokens;

pub use refresh::{REFRESH_PATH, RefreshCoordinator, RefreshFailure, RefreshPolicy};
pub use tokens::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenPair, TokenStore};
