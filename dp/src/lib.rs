//! dietplanner - profile-driven diet plans over generative models
//!
//! The crate turns a user [`Profile`](domain::Profile) into a deterministic,
//! schema-constrained generation request, sends it through an
//! [`LlmClient`](llm::LlmClient), and validates the reply into a typed
//! [`DietPlan`](domain::DietPlan) or [`StoreList`](domain::StoreList).
//!
//! Flow: profile -> [`policy::compose`] -> [`request::RequestBuilder`] ->
//! provider -> [`validate`] -> caller or [`session::Session`] recipes.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod planner;
pub mod policy;
pub mod prompts;
pub mod recipes;
pub mod request;
pub mod session;
pub mod validate;

pub use config::Config;
pub use error::CoreError;
pub use planner::Planner;
pub use recipes::SavedRecipes;
