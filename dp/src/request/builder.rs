//! Request builder
//!
//! Assembles the task text and output shape for each request kind. Building
//! is pure: the same profile and templates always give the same request.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::shape::{Field, Shape};
use crate::domain::{MAX_STORES, MIN_STORES, PLAN_DAYS, Profile};
use crate::error::CoreError;
use crate::llm::CompletionRequest;
use crate::policy::{Policy, TaskParams, compose};
use crate::prompts::PromptLoader;

/// The two things the planner can ask a model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    DietPlan,
    StoreLookup,
}

impl RequestKind {
    /// Template that frames this kind of request
    pub fn template_name(&self) -> &'static str {
        match self {
            RequestKind::DietPlan => "diet-plan",
            RequestKind::StoreLookup => "store-lookup",
        }
    }

    /// Expected response shape
    pub fn shape(&self) -> Shape {
        match self {
            RequestKind::DietPlan => diet_plan_shape(),
            RequestKind::StoreLookup => store_list_shape(),
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.template_name())
    }
}

fn meal_shape() -> Shape {
    Shape::object(vec![
        Field::required("dishName", Shape::non_empty_string()),
        Field::required("calories", Shape::non_negative_number()),
        Field::required("ingredients", Shape::array(Shape::string())),
        Field::required("instructions", Shape::string()),
    ])
}

/// Exactly seven days, each with three meals and a calorie total
pub fn diet_plan_shape() -> Shape {
    let day = Shape::object(vec![
        Field::required("day", Shape::string()),
        Field::optional("theme", Shape::string()),
        Field::required(
            "meals",
            Shape::object(vec![
                Field::required("breakfast", meal_shape()),
                Field::required("lunch", meal_shape()),
                Field::required("dinner", meal_shape()),
            ]),
        ),
        Field::required("totalCalories", Shape::number()),
    ]);
    Shape::array_between(day, PLAN_DAYS, PLAN_DAYS)
}

/// Three to five stores with six text fields each
pub fn store_list_shape() -> Shape {
    let store = Shape::object(
        ["Name", "URL", "Timing", "Address", "Offer", "Ratings"]
            .into_iter()
            .map(|name| Field::required(name, Shape::string()))
            .collect(),
    );
    Shape::array_between(store, MIN_STORES, MAX_STORES)
}

/// A fully assembled generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    pub system_prompt: String,
    pub prompt: String,
    pub shape: Shape,
}

impl GenerationRequest {
    pub fn response_schema(&self) -> Value {
        self.shape.to_json_schema()
    }

    /// Convert to the provider-neutral completion request
    pub fn to_completion(&self, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            prompt: self.prompt.clone(),
            response_schema: self.response_schema(),
            max_tokens,
        }
    }
}

#[derive(Serialize)]
struct DietPlanContext<'a> {
    #[serde(flatten)]
    params: &'a TaskParams,
    constraints: String,
    days: usize,
}

#[derive(Serialize)]
struct StoreLookupContext<'a> {
    city: &'a str,
    min_stores: usize,
    max_stores: usize,
}

/// Builds requests from profiles using the configured templates
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    prompts: &'a PromptLoader,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(prompts: &'a PromptLoader) -> Self {
        Self { prompts }
    }

    /// Diet-plan request for a profile
    pub fn diet_plan(&self, profile: &Profile) -> Result<GenerationRequest, CoreError> {
        self.diet_plan_from_policy(&compose(profile))
    }

    /// Diet-plan request from an already composed policy
    pub fn diet_plan_from_policy(&self, policy: &Policy) -> Result<GenerationRequest, CoreError> {
        debug!(clauses = policy.fragment.clauses().len(), "RequestBuilder::diet_plan_from_policy: called");
        let context = DietPlanContext {
            params: &policy.params,
            constraints: policy.fragment.render(),
            days: PLAN_DAYS,
        };
        self.build(RequestKind::DietPlan, &context)
    }

    /// Store-lookup request, parameterized only by city
    pub fn store_lookup(&self, city: &str) -> Result<GenerationRequest, CoreError> {
        debug!(%city, "RequestBuilder::store_lookup: called");
        let city = city.trim();
        if city.is_empty() {
            return Err(CoreError::InvalidProfile("city must not be empty".to_string()));
        }
        let context = StoreLookupContext {
            city,
            min_stores: MIN_STORES,
            max_stores: MAX_STORES,
        };
        self.build(RequestKind::StoreLookup, &context)
    }

    fn build<T: Serialize>(&self, kind: RequestKind, context: &T) -> Result<GenerationRequest, CoreError> {
        let system_prompt = self
            .prompts
            .system_prompt()
            .map_err(|e| CoreError::Prompt(e.to_string()))?;
        let prompt = self
            .prompts
            .render(kind.template_name(), context)
            .map_err(|e| CoreError::Prompt(e.to_string()))?;
        debug!(%kind, prompt_len = prompt.len(), "RequestBuilder::build: rendered");

        Ok(GenerationRequest {
            kind,
            system_prompt,
            prompt,
            shape: kind.shape(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FastingMode, ProfileUpdate, Religion, sample_profile};
    use crate::policy::religion::HINDU_FAST_HEADING;

    #[test]
    fn test_diet_plan_request_is_deterministic() {
        let prompts = PromptLoader::embedded_only();
        let builder = RequestBuilder::new(&prompts);
        let a = builder.diet_plan(&sample_profile()).unwrap();
        let b = builder.diet_plan(&sample_profile()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.response_schema().to_string(), b.response_schema().to_string());
    }

    #[test]
    fn test_diet_plan_prompt_carries_constraints() {
        let prompts = PromptLoader::embedded_only();
        let profile = sample_profile()
            .with(ProfileUpdate::Religion(Religion::Hindu))
            .unwrap()
            .with(ProfileUpdate::FastingMode(FastingMode::new("Ekadashi")))
            .unwrap();

        let request = RequestBuilder::new(&prompts).diet_plan(&profile).unwrap();
        assert_eq!(request.kind, RequestKind::DietPlan);
        assert!(request.prompt.contains("USER PROFILE:"));
        assert!(request.prompt.contains(HINDU_FAST_HEADING));
        assert!(request.prompt.contains("7-day"));
        assert!(request.prompt.contains("2026-10-18 (Sunday)"));
        assert!(request.prompt.contains("2026-10-24 (Saturday)"));
        assert!(!request.prompt.contains("{{"));
    }

    #[test]
    fn test_diet_plan_shape_requires_seven_days() {
        let schema = diet_plan_shape().to_json_schema();
        assert_eq!(schema["minItems"], 7);
        assert_eq!(schema["maxItems"], 7);
        assert_eq!(
            schema["items"]["required"],
            serde_json::json!(["day", "meals", "totalCalories"])
        );
        let meal = &schema["items"]["properties"]["meals"]["properties"]["lunch"];
        assert_eq!(
            meal["required"],
            serde_json::json!(["dishName", "calories", "ingredients", "instructions"])
        );
    }

    #[test]
    fn test_store_lookup_request() {
        let prompts = PromptLoader::embedded_only();
        let request = RequestBuilder::new(&prompts).store_lookup("  Indore ").unwrap();
        assert_eq!(request.kind, RequestKind::StoreLookup);
        assert!(request.prompt.contains("near Indore"));
        assert_eq!(request.response_schema()["minItems"], 3);
        assert_eq!(request.response_schema()["maxItems"], 5);
        assert_eq!(request.response_schema()["items"]["required"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_store_lookup_rejects_blank_city() {
        let prompts = PromptLoader::embedded_only();
        let result = RequestBuilder::new(&prompts).store_lookup("   ");
        assert!(matches!(result, Err(CoreError::InvalidProfile(_))));
    }

    #[test]
    fn test_to_completion_carries_schema() {
        let prompts = PromptLoader::embedded_only();
        let request = RequestBuilder::new(&prompts).store_lookup("Surat").unwrap();
        let completion = request.to_completion(2048);
        assert_eq!(completion.max_tokens, 2048);
        assert_eq!(completion.response_schema, request.response_schema());
        assert_eq!(completion.prompt, request.prompt);
    }
}
