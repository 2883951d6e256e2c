// mealbook: client data layer for the recipe, feed and calorie backend.
// Authenticated API client, token persistence, translation cache and formatters.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod storage;
pub mod translate;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, RequestDescriptor};
pub use auth::{TokenPair, TokenStore};
pub use config::Config;
pub use error::{MealbookError, Result};
pub use translate::Translator;
