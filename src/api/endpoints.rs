// Backend API endpoint functions.
// Typed methods for auth, recipes, feed, calorie tracking, search and user profiles.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::TokenPair;
use crate::error::{MealbookError, Result};

use super::client::{ApiClient, RequestDescriptor};
use super::types::{
    CalorieEntry, DailyCalories, FeedPost, InterestForm, LikeOutcome, LoginRequest, ProfileUpdate,
    Recipe, RecipeInput, RegisterRequest, ResetPasswordRequest, SearchResults, UserProfile,
};

/// Response from `/auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Treat a 403 on like/unlike as "already in that state".
fn like_outcome(result: Result<serde_json::Value>) -> Result<LikeOutcome> {
    match result {
        Ok(_) => Ok(LikeOutcome::Changed),
        Err(MealbookError::Http { status, .. }) if status == StatusCode::FORBIDDEN => {
            Ok(LikeOutcome::Unchanged)
        }
        Err(e) => Err(e),
    }
}

impl ApiClient {
    // Auth

    /// Sign in and persist the returned token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<UserProfile>> {
        let descriptor = RequestDescriptor::post("/auth/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })?
            .without_refresh();
        let response: LoginResponse = self.request_as(descriptor).await?;

        let pair = TokenPair::new(response.access_token, response.refresh_token);
        if !self.tokens().set_pair(&pair).await {
            return Err(MealbookError::Storage("could not persist tokens".to_string()));
        }
        info!("Signed in as {}", email);
        Ok(response.user)
    }

    /// Forget the stored tokens.
    pub async fn logout(&self) {
        self.tokens().clear_pair().await;
        info!("Signed out");
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/register")
            .json(request)?
            .without_refresh();
        self.request(descriptor).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/forgot-password")
            .json(&json!({ "email": email }))?
            .without_refresh();
        self.request(descriptor).await?;
        Ok(())
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<()> {
        let descriptor = RequestDescriptor::post("/auth/reset-password")
            .json(request)?
            .without_refresh();
        self.request(descriptor).await?;
        Ok(())
    }

    // Interest form

    pub async fn submit_interest_form(&self, form: &InterestForm) -> Result<()> {
        self.post("/interest-form/submit", form).await?;
        Ok(())
    }

    pub async fn get_interest_form(&self) -> Result<InterestForm> {
        self.request_as(RequestDescriptor::get("/interest-form/get"))
            .await
    }

    // Recipes

    pub async fn create_recipe(&self, recipe: &RecipeInput) -> Result<Recipe> {
        self.request_as(RequestDescriptor::post("/recipe/create").json(recipe)?)
            .await
    }

    pub async fn update_recipe(&self, id: &str, recipe: &RecipeInput) -> Result<Recipe> {
        self.request_as(RequestDescriptor::put(format!("/recipe/update/{}", id)).json(recipe)?)
            .await
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.delete(&format!("/recipe/delete/{}", id)).await?;
        Ok(())
    }

    pub async fn save_recipe(&self, id: &str) -> Result<()> {
        self.post(&format!("/recipe/save/{}", id), &json!({})).await?;
        Ok(())
    }

    pub async fn unsave_recipe(&self, id: &str) -> Result<()> {
        self.post(&format!("/recipe/unsave/{}", id), &json!({})).await?;
        Ok(())
    }

    pub async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        self.request_as(RequestDescriptor::get(format!("/recipe/get/{}", id)))
            .await
    }

    pub async fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        self.request_as(RequestDescriptor::get("/recipe/get-all"))
            .await
    }

    pub async fn get_saved_recipes(&self) -> Result<Vec<Recipe>> {
        self.request_as(RequestDescriptor::get("/saved-recipes/get-all"))
            .await
    }

    // Calorie tracking

    pub async fn add_calorie_entry(&self, entry: &CalorieEntry) -> Result<CalorieEntry> {
        self.request_as(RequestDescriptor::post("/calorie/add").json(entry)?)
            .await
    }

    /// Entries and goal for `date` (`YYYY-MM-DD`).
    pub async fn get_daily_calories(&self, date: &str) -> Result<DailyCalories> {
        self.request_as(RequestDescriptor::get("/calorie/get-daily").query("date", date))
            .await
    }

    pub async fn delete_calorie_entry(&self, id: &str) -> Result<()> {
        self.delete(&format!("/calorie/delete/{}", id)).await?;
        Ok(())
    }

    // Feed

    pub async fn get_recent_feed(&self, page: u32) -> Result<Vec<FeedPost>> {
        self.request_as(RequestDescriptor::get("/feed/get-recent").query("page", page))
            .await
    }

    pub async fn like_post(&self, post_id: &str) -> Result<LikeOutcome> {
        like_outcome(self.post(&format!("/feed/like/{}", post_id), &json!({})).await)
    }

    pub async fn unlike_post(&self, post_id: &str) -> Result<LikeOutcome> {
        like_outcome(self.post(&format!("/feed/unlike/{}", post_id), &json!({})).await)
    }

    pub async fn comment_on_post(&self, post_id: &str, text: &str) -> Result<FeedPost> {
        self.request_as(
            RequestDescriptor::post(format!("/feed/comment/{}", post_id))
                .json(&json!({ "text": text }))?,
        )
        .await
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.delete(&format!("/feed/delete-comment/{}/{}", post_id, comment_id))
            .await?;
        Ok(())
    }

    // Search and users

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        self.request_as(RequestDescriptor::get("/search").query("q", query))
            .await
    }

    pub async fn get_profile(&self) -> Result<UserProfile> {
        self.request_as(RequestDescriptor::get("/user/profile"))
            .await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
        self.request_as(RequestDescriptor::put("/user/update").json(update)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::api::HttpResponse;
    use crate::auth::{RefreshPolicy, TokenStore};
    use crate::storage::MemoryStore;
    use crate::test_support::FakeTransport;

    fn client(transport: Arc<FakeTransport>) -> ApiClient {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        ApiClient::new(transport, tokens, "http://backend", RefreshPolicy::default())
    }

    #[tokio::test]
    async fn test_login_persists_tokens() {
        let transport = FakeTransport::always(
            StatusCode::OK,
            json!({
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": { "_id": "u1", "username": "ayse" }
            }),
        );
        let api = client(transport.clone());

        let user = api.login("ayse@example.test", "secret").await.unwrap().unwrap();
        assert_eq!(user.username, "ayse");
        assert_eq!(api.tokens().token_pair().await, Some(TokenPair::new("a1", "r1")));

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://backend/auth/login");
        assert_eq!(
            sent[0].body,
            Some(json!({ "email": "ayse@example.test", "password": "secret" }))
        );

        api.logout().await;
        assert_eq!(api.tokens().access_token().await, None);
    }

    #[tokio::test]
    async fn test_bad_login_does_not_refresh() {
        let transport = FakeTransport::new(|_| Ok(HttpResponse::new(StatusCode::UNAUTHORIZED, "nope")));
        let api = client(transport.clone());

        let err = api.login("x@example.test", "wrong").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn test_like_forbidden_is_unchanged() {
        let transport = FakeTransport::new(|req| {
            if req.url.contains("/feed/like/") {
                Ok(HttpResponse::new(StatusCode::FORBIDDEN, "already liked"))
            } else {
                Ok(HttpResponse::json(StatusCode::OK, &json!({ "ok": true })))
            }
        });
        let api = client(transport);

        assert_eq!(api.like_post("p1").await.unwrap(), LikeOutcome::Unchanged);
        assert_eq!(api.unlike_post("p1").await.unwrap(), LikeOutcome::Changed);
    }

    #[tokio::test]
    async fn test_like_other_errors_propagate() {
        let transport = FakeTransport::new(|_| Ok(HttpResponse::new(StatusCode::NOT_FOUND, "no post")));
        let api = client(transport);

        let err = api.like_post("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_recipe_endpoints() {
        let transport = FakeTransport::new(|req| {
            let body = match req.url.as_str() {
                "http://backend/recipe/get-all" => json!([{ "_id": "r1", "title": "Menemen" }]),
                "http://backend/recipe/get/r1" => json!({ "_id": "r1", "title": "Menemen" }),
                _ => json!({}),
            };
            Ok(HttpResponse::json(StatusCode::OK, &body))
        });
        let api = client(transport.clone());

        let all = api.get_all_recipes().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(api.get_recipe("r1").await.unwrap().title, "Menemen");
        api.delete_recipe("r1").await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[2].method, Method::DELETE);
        assert_eq!(sent[2].url, "http://backend/recipe/delete/r1");
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let transport = FakeTransport::new(|req| {
            let body = if req.url.contains("/feed/") { json!([]) } else { json!({}) };
            Ok(HttpResponse::json(StatusCode::OK, &body))
        });
        let api = client(transport.clone());

        api.search("lentil soup").await.unwrap();
        api.get_daily_calories("2026-10-19").await.unwrap();
        assert!(api.get_recent_feed(2).await.unwrap().is_empty());

        let sent = transport.requests();
        assert_eq!(sent[0].query, vec![("q".to_string(), "lentil soup".to_string())]);
        assert_eq!(sent[1].query, vec![("date".to_string(), "2026-10-19".to_string())]);
        assert_eq!(sent[2].query, vec![("page".to_string(), "2".to_string())]);
    }
}
