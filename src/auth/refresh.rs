// Access-token refresh.
// Exchanges the refresh token for a new pair, coalescing concurrent callers.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{HttpRequest, Transport};
use crate::error::{MealbookError, Result};

use super::tokens::{TokenPair, TokenStore};

/// Path of the backend's token refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// Which response statuses mean "the access token needs refreshing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    statuses: BTreeSet<u16>,
}

impl RefreshPolicy {
    pub fn new(statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            statuses: statuses.into_iter().map(|s| s.as_u16()).collect(),
        }
    }

    pub fn triggers(&self, status: StatusCode) -> bool {
        self.statuses.contains(&status.as_u16())
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new([StatusCode::UNAUTHORIZED])
    }
}

/// Why a refresh attempt gave up. Cloneable so every coalesced waiter gets a copy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RefreshFailure(pub String);

impl From<RefreshFailure> for MealbookError {
    fn from(failure: RefreshFailure) -> Self {
        MealbookError::Authentication(failure.0)
    }
}

type RefreshOutcome = std::result::Result<TokenPair, RefreshFailure>;
type InFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Runs at most one refresh at a time; later callers join the running one.
pub struct RefreshCoordinator {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    refresh_url: String,
    in_flight: Mutex<Option<InFlight>>,
}

impl RefreshCoordinator {
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenStore, refresh_url: String) -> Self {
        Self {
            transport,
            tokens,
            refresh_url,
            in_flight: Mutex::new(None),
        }
    }

    /// Get a usable token pair after `stale` was rejected by the server.
    ///
    /// If the stored access token has already moved past `stale`, the stored
    /// pair is returned without contacting the server. On failure both tokens
    /// have been cleared and the error is [`MealbookError::Authentication`].
    pub async fn refresh(&self, stale: Option<&str>) -> Result<TokenPair> {
        let refresh = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(running) => {
                    debug!("Joining in-flight token refresh");
                    running.clone()
                }
                None => {
                    let started = Self::run(
                        self.transport.clone(),
                        self.tokens.clone(),
                        self.refresh_url.clone(),
                        stale.map(str::to_string),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(started.clone());
                    started
                }
            }
        };

        let outcome = refresh.clone().await;

        {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|running| running.ptr_eq(&refresh)) {
                *slot = None;
            }
        }

        outcome.map_err(MealbookError::from)
    }

    async fn run(
        transport: Arc<dyn Transport>,
        tokens: TokenStore,
        refresh_url: String,
        stale: Option<String>,
    ) -> RefreshOutcome {
        // Read after the slot is taken so a refresh that settled just before
        // this one started is seen.
        if let Some(current) = tokens.token_pair().await {
            if stale.as_deref() != Some(current.access_token.as_str()) {
                debug!("Access token already rotated, reusing it");
                return Ok(current);
            }
        }

        match Self::exchange(transport.as_ref(), &tokens, &refresh_url).await {
            Ok(pair) => {
                if !tokens.set_pair(&pair).await {
                    warn!("Refreshed tokens not persisted, using them in memory only");
                }
                info!("Access token refreshed");
                Ok(pair)
            }
            Err(failure) => {
                warn!("Token refresh failed: {}", failure);
                tokens.clear_pair().await;
                Err(failure)
            }
        }
    }

    async fn exchange(
        transport: &dyn Transport,
        tokens: &TokenStore,
        refresh_url: &str,
    ) -> RefreshOutcome {
        let refresh_token = tokens
            .refresh_token()
            .await
            .ok_or_else(|| RefreshFailure("no refresh token stored".to_string()))?;

        let mut request = HttpRequest::new(Method::POST, refresh_url);
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request.body = Some(json!({ "refreshToken": refresh_token }));

        let response = transport
            .send(request)
            .await
            .map_err(|e| RefreshFailure(e.to_string()))?;

        if !response.status.is_success() {
            return Err(RefreshFailure(format!(
                "refresh endpoint returned {}",
                response.status
            )));
        }

        let body: RefreshResponse = serde_json::from_str(&response.body)
            .map_err(|e| RefreshFailure(format!("unusable refresh response: {}", e)))?;
        if body.access_token.is_empty() {
            return Err(RefreshFailure("refresh response had an empty access token".to_string()));
        }

        Ok(TokenPair {
            access_token: body.access_token,
            refresh_token: body
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or(refresh_token),
        })
    }
}
