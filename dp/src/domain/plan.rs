//! Generated diet plan types
//!
//! Field names serialize exactly as the model is asked to produce them
//! (`dishName`, `totalCalories`, ...), so a plan written back out is
//! readable by anything that consumed the original response.

use serde::{Deserialize, Serialize};

/// Number of days in every plan
pub const PLAN_DAYS: usize = 7;

/// Theme of the restorative day inserted after a festival
pub const DETOX_THEME: &str = "Detox Day";

/// A single dish; `dish_name` is its identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub dish_name: String,
    pub calories: f64,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl Meal {
    pub fn new(
        dish_name: impl Into<String>,
        calories: f64,
        ingredients: Vec<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            dish_name: dish_name.into(),
            calories,
            ingredients,
            instructions: instructions.into(),
        }
    }
}

/// The three meals of a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMeals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
}

impl DayMeals {
    /// Meals in eating order
    pub fn iter(&self) -> impl Iterator<Item = &Meal> {
        [&self.breakfast, &self.lunch, &self.dinner].into_iter()
    }
}

/// One day of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub meals: DayMeals,
    /// As reported by the model; not reconciled with the meal calories
    pub total_calories: f64,
}

/// A complete seven-day plan, in generation order
///
/// Only the response validator builds these, so a `DietPlan` always holds
/// exactly [`PLAN_DAYS`] days.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DietPlan {
    days: Vec<DayPlan>,
}

impl DietPlan {
    pub(crate) fn from_days(days: Vec<DayPlan>) -> Option<Self> {
        if days.len() == PLAN_DAYS { Some(Self { days }) } else { None }
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }

    /// Every meal of the plan, day by day
    pub fn meals(&self) -> impl Iterator<Item = &Meal> {
        self.days.iter().flat_map(|d| d.meals.iter())
    }

    /// First meal whose dish name matches exactly
    pub fn find_meal(&self, dish_name: &str) -> Option<&Meal> {
        self.meals().find(|m| m.dish_name == dish_name)
    }

    /// Days carrying a theme label (festival days, detox day)
    pub fn themed_days(&self) -> impl Iterator<Item = &DayPlan> {
        self.days.iter().filter(|d| d.theme.is_some())
    }
}
