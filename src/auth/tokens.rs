// Token persistence.
// Reads and writes the access/refresh token pair, never failing the caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::KeyValueStore;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Access and refresh credentials, always written and cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Keyed pass-through over the persistence layer.
///
/// Storage errors are logged and swallowed: reads degrade to `None` and
/// writes become no-ops, so a caller waiting on a token never sees a
/// storage failure.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, name: &str) -> Option<String> {
        match self.store.get(name).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}", name, e);
                None
            }
        }
    }

    /// Best-effort write. Returns whether it landed.
    pub async fn set(&self, name: &str, value: &str) -> bool {
        match self.store.set(name, value).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write {}: {}", name, e);
                false
            }
        }
    }

    pub async fn remove(&self, name: &str) {
        if let Err(e) = self.store.remove(name).await {
            warn!("Failed to remove {}: {}", name, e);
        }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY).await
    }

    /// The stored pair, or `None` unless both halves are present.
    pub async fn token_pair(&self) -> Option<TokenPair> {
        let access_token = self.access_token().await?;
        let refresh_token = self.refresh_token().await?;
        Some(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Persist both tokens, access first. Returns whether both writes landed.
    pub async fn set_pair(&self, pair: &TokenPair) -> bool {
        let access = self.set(ACCESS_TOKEN_KEY, &pair.access_token).await;
        let refresh = self.set(REFRESH_TOKEN_KEY, &pair.refresh_token).await;
        access && refresh
    }

    pub async fn clear_pair(&self) {
        self.remove(ACCESS_TOKEN_KEY).await;
        self.remove(REFRESH_TOKEN_KEY).await;
    }
}
