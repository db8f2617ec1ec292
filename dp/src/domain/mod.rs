//! Domain types for the diet planner
//!
//! The user profile with its value domains, and the typed results the
//! generation flow produces: diet plans and store lists.

mod label;
mod plan;
mod profile;
mod store;

pub use plan::{DETOX_THEME, DayMeals, DayPlan, DietPlan, Meal, PLAN_DAYS};
pub use profile::{
    BudgetBand, Cuisine, FastingMode, FoodType, HealthIssue, MealTiming, Profile, ProfileUpdate, Religion, Sex,
};
pub use store::{MAX_STORES, MIN_STORES, Store, StoreList};

#[cfg(test)]
pub(crate) use profile::tests::sample_profile;
