// Text translation client.
// Detects the source language, calls the translation endpoint and memoizes results.

use std::sync::Arc;

use futures::future::join_all;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{HttpRequest, Recipe, ReqwestTransport, Transport};
use crate::config::Config;
use crate::error::{MealbookError, Result};

use super::cache::{MemoCache, TranslationCache};
use super::detect::detect_language;

/// Envelope returned by the translation endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationEnvelope {
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// The user-visible text fields of a recipe in one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedRecipe {
    pub title: String,
    pub description: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub recipe_type: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Translator with a text cache and a whole-recipe cache.
pub struct Translator {
    transport: Arc<dyn Transport>,
    endpoint: String,
    contact_email: String,
    texts: TranslationCache,
    recipes: MemoCache<TranslatedRecipe>,
}

impl Translator {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        contact_email: impl Into<String>,
        cache_size: usize,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            contact_email: contact_email.into(),
            texts: TranslationCache::new(cache_size),
            recipes: MemoCache::new(cache_size),
        }
    }

    /// Create a translator using `reqwest` with settings from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::new(
            transport,
            config.translate_url.clone(),
            config.contact_email.clone(),
            config.translation_cache_size,
        ))
    }

    pub fn text_cache(&self) -> &TranslationCache {
        &self.texts
    }

    /// Translate `text` into `target`.
    ///
    /// Text already in `target` (by detection) is returned unchanged without a
    /// network call, as are cache hits. Failures are not cached.
    pub async fn translate(&self, text: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let source = detect_language(text);
        if source == target {
            return Ok(text.to_string());
        }

        if let Some(cached) = self.texts.get(text, target) {
            debug!(target_lang = target, "translation cache hit");
            return Ok(cached);
        }

        let translated = self.fetch(text, source, target).await?;
        self.texts.insert(text, target, translated.clone());
        Ok(translated)
    }

    /// Translate, falling back to the original text on any failure.
    pub async fn translate_or_original(&self, text: &str, target: &str) -> String {
        self.translate_field(text, target).await.0
    }

    /// Translated text, or the original and `false` when translation failed.
    async fn translate_field(&self, text: &str, target: &str) -> (String, bool) {
        match self.translate(text, target).await {
            Ok(translated) => (translated, true),
            Err(e) => {
                warn!("Showing untranslated text: {}", e);
                (text.to_string(), false)
            }
        }
    }

    /// Translate every text field of a recipe, memoized under `key`.
    ///
    /// Only fully translated recipes are cached; a recipe with any field left
    /// in the original language is returned as is and retried next time.
    pub async fn translate_recipe(&self, key: &str, recipe: &Recipe, target: &str) -> TranslatedRecipe {
        if let Some(cached) = self.recipes.get(key, target) {
            return cached;
        }

        let (title, description, tag, recipe_type, ingredients, instructions) = futures::join!(
            self.translate_field(&recipe.title, target),
            self.translate_field(&recipe.description, target),
            self.translate_field(&recipe.tag, target),
            self.translate_field(&recipe.recipe_type, target),
            self.translate_all(&recipe.ingredients, target),
            self.translate_all(&recipe.instructions, target),
        );

        let complete =
            title.1 && description.1 && tag.1 && recipe_type.1 && ingredients.1 && instructions.1;
        let translated = TranslatedRecipe {
            title: title.0,
            description: description.0,
            tag: tag.0,
            recipe_type: recipe_type.0,
            ingredients: ingredients.0,
            instructions: instructions.0,
        };
        if complete {
            self.recipes.insert(key, target, translated.clone());
        }
        translated
    }

    async fn translate_all(&self, texts: &[String], target: &str) -> (Vec<String>, bool) {
        let fields = join_all(texts.iter().map(|t| self.translate_field(t, target))).await;
        let complete = fields.iter().all(|(_, ok)| *ok);
        (fields.into_iter().map(|(text, _)| text).collect(), complete)
    }

    async fn fetch(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let mut request = HttpRequest::new(Method::GET, self.endpoint.clone());
        request.query.push(("q".to_string(), text.to_string()));
        request
            .query
            .push(("langpair".to_string(), format!("{}|{}", source, target)));
        if !self.contact_email.is_empty() {
            request.query.push(("de".to_string(), self.contact_email.clone()));
        }

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| MealbookError::Translation(format!("endpoint unreachable: {}", e)))?;

        if !response.status.is_success() {
            return Err(MealbookError::Translation(format!(
                "endpoint returned {}",
                response.status
            )));
        }

        let envelope: TranslationEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| MealbookError::Translation(format!("unreadable response: {}", e)))?;

        envelope
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MealbookError::Translation("response has no translated text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpResponse;
    use crate::test_support::FakeTransport;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    const ENDPOINT: &str = "https://translate.example.test/get";

    /// Endpoint that upper-cases the `q` parameter.
    fn shouting_endpoint() -> Arc<FakeTransport> {
        FakeTransport::new(|req| {
            let q = req
                .query
                .iter()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.to_uppercase())
                .unwrap_or_default();
            Ok(HttpResponse::json(
                StatusCode::OK,
                &json!({ "responseData": { "translatedText": q } }),
            ))
        })
    }

    fn translator(transport: Arc<FakeTransport>) -> Translator {
        Translator::new(transport, ENDPOINT, "dev@example.test", 100)
    }

    #[tokio::test]
    async fn test_same_language_short_circuits() {
        let transport = shouting_endpoint();
        let t = translator(transport.clone());

        assert_eq!(t.translate("Lentil soup", "en").await.unwrap(), "Lentil soup");
        assert_eq!(t.translate("味噌汁", "ja").await.unwrap(), "味噌汁");
        assert_eq!(t.translate("Mercimek çorbası", "tr").await.unwrap(), "Mercimek çorbası");
        assert_eq!(t.translate("   ", "tr").await.unwrap(), "   ");
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_request_parameters() {
        let transport = shouting_endpoint();
        let t = translator(transport.clone());

        assert_eq!(t.translate("soup", "tr").await.unwrap(), "SOUP");

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].url, ENDPOINT);
        assert_eq!(
            sent[0].query,
            vec![
                ("q".to_string(), "soup".to_string()),
                ("langpair".to_string(), "en|tr".to_string()),
                ("de".to_string(), "dev@example.test".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let transport = shouting_endpoint();
        let t = translator(transport.clone());

        let first = t.translate("soup", "ja").await.unwrap();
        let second = t.translate("soup", "ja").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.count(), 1);

        t.translate("soup", "tr").await.unwrap();
        assert_eq!(transport.count(), 2);
    }

    #[tokio::test]
    async fn test_missing_field_is_error_and_not_cached() {
        let transport = FakeTransport::always(StatusCode::OK, json!({ "responseData": {} }));
        let t = translator(transport.clone());

        let err = t.translate("soup", "tr").await.unwrap_err();
        assert!(matches!(err, MealbookError::Translation(_)));
        assert!(t.translate("soup", "tr").await.is_err());
        assert_eq!(transport.count(), 2);
        assert!(t.text_cache().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let transport = FakeTransport::new(|_| Err(MealbookError::Other("connection refused".to_string())));
        let t = translator(transport);

        assert!(matches!(
            t.translate("soup", "tr").await,
            Err(MealbookError::Translation(_))
        ));
        assert_eq!(t.translate_or_original("soup", "tr").await, "soup");
    }

    #[tokio::test]
    async fn test_partially_failed_recipe_is_retried() {
        let online = Arc::new(AtomicBool::new(false));
        let flag = online.clone();
        let transport = FakeTransport::new(move |req| {
            if !flag.load(Ordering::SeqCst) {
                return Err(MealbookError::Other("offline".to_string()));
            }
            let q = req
                .query
                .iter()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.to_uppercase())
                .unwrap_or_default();
            Ok(HttpResponse::json(
                StatusCode::OK,
                &json!({ "responseData": { "translatedText": q } }),
            ))
        });
        let t = translator(transport.clone());
        let recipe = Recipe {
            title: "Soup".to_string(),
            ..Default::default()
        };

        let first = t.translate_recipe("r1", &recipe, "tr").await;
        assert_eq!(first.title, "Soup");

        online.store(true, Ordering::SeqCst);
        let second = t.translate_recipe("r1", &recipe, "tr").await;
        assert_eq!(second.title, "SOUP");

        let calls = transport.count();
        assert_eq!(t.translate_recipe("r1", &recipe, "tr").await, second);
        assert_eq!(transport.count(), calls);
    }

    #[tokio::test]
    async fn test_recipe_translation_is_memoized() {
        let transport = shouting_endpoint();
        let t = translator(transport.clone());
        let recipe = Recipe {
            id: "r1".to_string(),
            title: "Soup".to_string(),
            description: "Warm".to_string(),
            tag: "vegan".to_string(),
            recipe_type: "dinner".to_string(),
            ingredients: vec!["lentils".to_string(), "onion".to_string()],
            instructions: vec!["boil".to_string()],
            ..Default::default()
        };

        let translated = t.translate_recipe("r1", &recipe, "tr").await;
        assert_eq!(translated.title, "SOUP");
        assert_eq!(translated.ingredients, vec!["LENTILS", "ONION"]);
        assert_eq!(translated.instructions, vec!["BOIL"]);
        let calls = transport.count();
        assert_eq!(calls, 7);

        let again = t.translate_recipe("r1", &recipe, "tr").await;
        assert_eq!(again, translated);
        assert_eq!(transport.count(), calls);
    }
}
