//! Planner service
//!
//! Ties the request builder, a generation client and the response
//! validator together. Each request kind has its own sequencer; a response
//! that comes back after a newer request of the same kind was issued is
//! reported as [`Delivery::Superseded`] and never validated.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DietPlan, Profile, StoreList};
use crate::error::CoreError;
use crate::llm::{LlmClient, LlmError, StopReason};
use crate::policy::compose;
use crate::prompts::PromptLoader;
use crate::request::{GenerationRequest, RequestBuilder};
use crate::session::{Delivery, RequestSequencer};
use crate::validate::{validate_plan, validate_stores};

/// Default response budget when the caller does not pick one
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

pub struct Planner {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    plan_seq: RequestSequencer,
    store_seq: RequestSequencer,
}

impl Planner {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        Self {
            client,
            prompts,
            max_tokens: DEFAULT_MAX_TOKENS,
            plan_seq: RequestSequencer::new(),
            store_seq: RequestSequencer::new(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.prompts)
    }

    /// Generate a seven-day plan for `profile`
    pub async fn generate_plan(&self, profile: &Profile) -> Result<Delivery<DietPlan>, CoreError> {
        debug!(city = %profile.city(), "Planner::generate_plan: called");
        let policy = compose(profile);
        if policy.fasting_corrected {
            warn!(religion = %profile.religion(), "Generating plan with fasting mode reset to None");
        }
        let request = self.requests().diet_plan_from_policy(&policy)?;
        self.run(&self.plan_seq, request, validate_plan).await
    }

    /// Look up grocery stores near `city`
    pub async fn find_stores(&self, city: &str) -> Result<Delivery<StoreList>, CoreError> {
        debug!(%city, "Planner::find_stores: called");
        let request = self.requests().store_lookup(city)?;
        self.run(&self.store_seq, request, validate_stores).await
    }

    async fn run<T>(
        &self,
        sequencer: &RequestSequencer,
        request: GenerationRequest,
        validate: fn(&str) -> Result<T, CoreError>,
    ) -> Result<Delivery<T>, CoreError> {
        let ticket = sequencer.issue();
        let kind = request.kind;
        info!(%kind, seq = ticket.seq(), "Issuing generation request");

        let result = self.client.complete(request.to_completion(self.max_tokens)).await;

        if !sequencer.is_current(ticket) {
            let latest = sequencer.latest();
            warn!(%kind, seq = ticket.seq(), latest, ok = result.is_ok(), "Dropping superseded response");
            return Ok(Delivery::Superseded {
                seq: ticket.seq(),
                latest,
            });
        }

        let response = result?;
        if response.stop_reason == StopReason::MaxTokens {
            warn!(%kind, max_tokens = self.max_tokens, "Response hit the token limit and may be truncated");
        }
        let raw = response
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LlmError::InvalidResponse(format!("empty {} response", kind)))?;

        let value = validate(&raw)?;
        info!(%kind, seq = ticket.seq(), "Response validated");
        Ok(Delivery::Fresh(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample_profile;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use crate::validate::tests::{plan_text, stores_text};

    fn planner(client: Arc<MockLlmClient>) -> Planner {
        Planner::new(client, PromptLoader::embedded_only()).with_max_tokens(4096)
    }

    #[tokio::test]
    async fn test_generate_plan_fresh() {
        let client = Arc::new(MockLlmClient::with_texts([plan_text()]));
        let planner = planner(client.clone());

        let plan = planner
            .generate_plan(&sample_profile())
            .await
            .unwrap()
            .fresh()
            .unwrap();
        assert_eq!(plan.days().len(), 7);

        let sent = client.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].max_tokens, 4096);
        assert_eq!(sent[0].response_schema["minItems"], 7);
        assert!(sent[0].prompt.contains("USER PROFILE:"));
    }

    #[tokio::test]
    async fn test_find_stores_fresh() {
        let client = Arc::new(MockLlmClient::with_texts([stores_text(4)]));
        let stores = planner(client).find_stores("Mysuru").await.unwrap().fresh().unwrap();
        assert_eq!(stores.len(), 4);
    }

    #[tokio::test]
    async fn test_provider_error_is_generation_failed() {
        let client = Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 500,
            message: "backend unavailable".to_string(),
        })]));
        let err = planner(client).generate_plan(&sample_profile()).await.unwrap_err();
        assert!(matches!(err, CoreError::GenerationFailed(_)));
        assert!(err.user_message().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn test_empty_content_is_generation_failed() {
        let client = Arc::new(MockLlmClient::new(vec![Ok(CompletionResponse {
            content: None,
            stop_reason: StopReason::Safety,
            usage: Default::default(),
        })]));
        let err = planner(client).find_stores("Agra").await.unwrap_err();
        assert!(matches!(err, CoreError::GenerationFailed(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_malformed_plan_is_rejected() {
        let client = Arc::new(MockLlmClient::with_texts(["[]"]));
        let err = planner(client).generate_plan(&sample_profile()).await.unwrap_err();
        assert_eq!(err.raw_response(), Some("[]"));
    }

    #[tokio::test]
    async fn test_blank_city_never_reaches_client() {
        let client = Arc::new(MockLlmClient::new(vec![]));
        let planner = planner(client.clone());
        assert!(matches!(
            planner.find_stores(" ").await,
            Err(CoreError::InvalidProfile(_))
        ));
        assert_eq!(client.call_count(), 0);
    }
}
