//! Client for communicating with the backend.

use crate::error::{WebError, WebResult};
use octovoc::api::{ApiResult, ContentApi, ProgressApi, RewardApi};
use octovoc_api::{request as req, response as res};
use octovoc_core::{BatteryId, ModuleId, Phase, WordId};
use reqwasm::http::{Request, Response};
use serde::{de::DeserializeOwned, Serialize};
use web_sys::RequestCredentials;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
}

/// Non-API methods
impl Client {
    /// Creates a client for the server at `base_url`, e.g. `https://octovoc.nl`. An empty base url
    /// talks to the origin the page was served from.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url.trim_end_matches('/'))
    }

    async fn assert_success(res: &Response) -> WebResult<()> {
        match res.status() {
            100..=399 => Ok(()),
            code => {
                let bytes = res.binary().await.unwrap_or_default();
                let message = error_message(&bytes);
                if code == 401 {
                    tracing::warn!("Server unexpectedly returned 401: {message}");
                } else {
                    tracing::error!("Request failed: HTTP {code} {message}");
                }
                Err(WebError::with_status(code, message))
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> WebResult<T> {
        let res = Request::get(&self.url(path))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::from)?;
        Self::assert_success(&res).await?;
        res.json().await.map_err(WebError::from)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> WebResult<T> {
        let json = serde_json::to_string(body).map_err(WebError::from)?;
        let res = Request::post(&self.url(path))
            .credentials(RequestCredentials::Include)
            .body(json)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(WebError::from)?;
        Self::assert_success(&res).await?;
        res.json().await.map_err(WebError::from)
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> WebResult<T> {
        let res = Request::post(&self.url(path))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::from)?;
        Self::assert_success(&res).await?;
        res.json().await.map_err(WebError::from)
    }

    async fn delete(&self, path: &str) -> WebResult<()> {
        let res = Request::delete(&self.url(path))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(WebError::from)?;
        Self::assert_success(&res).await
    }
}

/// The message of an error response, or the raw body if it isn't one.
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<res::Error>(body) {
        Ok(error) => error.message,
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

/// API methods
impl Client {
    pub async fn current_user(&self) -> WebResult<Option<i32>> {
        tracing::info!("Fetching current user");
        self.get("/auth/current").await
    }
}

impl ProgressApi for Client {
    async fn start_module(&self, module_id: ModuleId) -> ApiResult<res::ModuleProgress> {
        tracing::info!("Starting module {module_id}");
        let progress = self
            .post_empty(&format!("/student/module/{module_id}/start"))
            .await?;
        Ok(progress)
    }

    async fn start_battery(&self, battery_id: BatteryId) -> ApiResult<res::BatteryStart> {
        tracing::info!("Starting battery {battery_id}");
        let start = self
            .post_empty(&format!("/student/battery/{battery_id}/start"))
            .await?;
        Ok(start)
    }

    async fn answer_question(
        &self,
        battery_progress_id: i32,
        word_id: WordId,
        answer: &str,
        phase: Phase,
    ) -> ApiResult<res::AnswerResult> {
        tracing::info!("Answering word {word_id} in phase {phase}");
        let answer = req::AnswerQuestion {
            battery_progress_id: Some(battery_progress_id),
            word_id,
            answer: answer.into(),
            phase,
        };
        let result = self.post("/student/question/answer", &answer).await?;
        Ok(result)
    }

    async fn start_final_round(&self, module_id: ModuleId) -> ApiResult<res::FinalRoundStart> {
        tracing::info!("Starting final round of module {module_id}");
        let start = self
            .post_empty(&format!("/student/module/{module_id}/final-round/start"))
            .await?;
        Ok(start)
    }

    async fn answer_final_round(
        &self,
        module_id: ModuleId,
        word_id: WordId,
        answer: &str,
    ) -> ApiResult<res::FinalRoundResult> {
        tracing::info!("Answering word {word_id} in the final round of module {module_id}");
        let answer = req::FinalRoundAnswer {
            word_id,
            answer: answer.into(),
        };
        let result = self
            .post(
                &format!("/student/module/{module_id}/final-round/answer"),
                &answer,
            )
            .await?;
        Ok(result)
    }

    async fn complete_module(&self, module_id: ModuleId) -> ApiResult<res::ModuleCompletion> {
        tracing::info!("Completing module {module_id}");
        let completion = self
            .post_empty(&format!("/student/module/{module_id}/complete"))
            .await?;
        Ok(completion)
    }

    async fn difficult_words(&self) -> ApiResult<Vec<res::DifficultWord>> {
        tracing::info!("Fetching difficult words");
        let words: Vec<res::DifficultWord> = self.get("/student/difficult-words").await?;
        tracing::info!("Fetched {} difficult words", words.len());
        Ok(words)
    }

    async fn remove_difficult_word(&self, word_id: WordId) -> ApiResult<()> {
        tracing::info!("Removing difficult word {word_id}");
        self.delete(&format!("/student/difficult-words/{word_id}"))
            .await?;
        Ok(())
    }
}

impl ContentApi for Client {
    async fn modules(&self, level: Option<i32>) -> ApiResult<Vec<res::ModuleSummary>> {
        tracing::info!("Fetching modules of level {level:?}");
        let path = match level {
            Some(level) => format!("/content/modules?level={level}"),
            None => "/content/modules".to_string(),
        };
        let modules: Vec<res::ModuleSummary> = self.get(&path).await?;
        tracing::info!("Fetched {} modules", modules.len());
        Ok(modules)
    }

    async fn module_outline(&self, module_id: ModuleId) -> ApiResult<res::ModuleOutline> {
        tracing::info!("Fetching module {module_id}");
        let outline = self.get(&format!("/content/modules/{module_id}")).await?;
        Ok(outline)
    }

    async fn battery(&self, battery_id: BatteryId) -> ApiResult<res::BatteryContent> {
        tracing::info!("Fetching battery {battery_id}");
        let battery = self.get(&format!("/content/batteries/{battery_id}")).await?;
        Ok(battery)
    }
}

impl RewardApi for Client {
    async fn random_quote(&self) -> ApiResult<Option<res::Quote>> {
        tracing::info!("Fetching a random quote");
        let random: res::RandomQuote = self.get("/student/quote/random").await?;
        Ok(random.quote)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn urls_are_under_api() {
        assert_eq!(
            Client::new("https://octovoc.nl/").url("/auth/current"),
            "https://octovoc.nl/api/auth/current"
        );
        assert_eq!(Client::new("").url("/auth/current"), "/api/auth/current");
    }

    #[test]
    fn error_messages_come_from_the_body() {
        assert_eq!(error_message(br#"{"message":"Module not found"}"#), "Module not found");
        assert_eq!(error_message(b"Bad Gateway"), "Bad Gateway");
    }
}
