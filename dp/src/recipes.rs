//! Saved recipes
//!
//! A per-user set of meals keyed by dish name, kept in the order they were
//! saved.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Meal;

/// Meals the user chose to keep, unique by `dish_name`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Meal>", into = "Vec<Meal>")]
pub struct SavedRecipes {
    meals: Vec<Meal>,
}

impl From<Vec<Meal>> for SavedRecipes {
    /// Later duplicates of a dish name are dropped
    fn from(meals: Vec<Meal>) -> Self {
        let mut recipes = SavedRecipes::new();
        for meal in meals {
            recipes.add(meal);
        }
        recipes
    }
}

impl From<SavedRecipes> for Vec<Meal> {
    fn from(recipes: SavedRecipes) -> Self {
        recipes.meals
    }
}

impl SavedRecipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a meal; returns false if its dish name was already saved
    pub fn add(&mut self, meal: Meal) -> bool {
        if self.contains(&meal.dish_name) {
            debug!(dish = %meal.dish_name, "SavedRecipes::add: already saved");
            return false;
        }
        debug!(dish = %meal.dish_name, "SavedRecipes::add: saved");
        self.meals.push(meal);
        true
    }

    /// Remove every meal with this dish name; returns false if none matched
    pub fn remove(&mut self, dish_name: &str) -> bool {
        let before = self.meals.len();
        self.meals.retain(|m| m.dish_name != dish_name);
        let removed = self.meals.len() != before;
        debug!(%dish_name, %removed, "SavedRecipes::remove: called");
        removed
    }

    pub fn contains(&self, dish_name: &str) -> bool {
        self.meals.iter().any(|m| m.dish_name == dish_name)
    }

    pub fn get(&self, dish_name: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.dish_name == dish_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Meal> {
        self.meals.iter()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn meal(name: &str, calories: f64) -> Meal {
        Meal::new(name, calories, vec!["rice".to_string()], "Boil.")
    }

    #[test]
    fn test_add_is_idempotent_by_dish_name() {
        let mut recipes = SavedRecipes::new();
        assert!(recipes.add(meal("Khichdi", 350.0)));
        assert!(!recipes.add(meal("Khichdi", 999.0)));
        assert_eq!(recipes.len(), 1);
        // First copy wins
        assert_eq!(recipes.get("Khichdi").unwrap().calories, 350.0);
    }

    #[test]
    fn test_double_remove_is_a_no_op() {
        let mut recipes = SavedRecipes::new();
        recipes.add(meal("Poha", 250.0));
        recipes.add(meal("Upma", 280.0));
        assert!(recipes.remove("Poha"));
        assert!(!recipes.remove("Poha"));
        assert_eq!(recipes.len(), 1);
        assert!(recipes.contains("Upma"));
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut recipes = SavedRecipes::new();
        for name in ["Dosa", "Idli", "Vada"] {
            recipes.add(meal(name, 200.0));
        }
        let names: Vec<&str> = recipes.iter().map(|m| m.dish_name.as_str()).collect();
        assert_eq!(names, ["Dosa", "Idli", "Vada"]);
    }

    #[test]
    fn test_serializes_as_plain_list_and_dedupes_on_load() {
        let mut recipes = SavedRecipes::new();
        recipes.add(meal("Dal Tadka", 320.0));
        let json = serde_json::to_value(&recipes).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["dishName"], "Dal Tadka");

        let loaded: SavedRecipes =
            serde_json::from_value(serde_json::json!([json[0].clone(), json[0].clone()])).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_dish_names_stay_unique(ops in prop::collection::vec((any::<bool>(), 0usize..4), 0..40)) {
            let names = ["Poha", "Upma", "Dosa", "Idli"];
            let mut recipes = SavedRecipes::new();
            for (add, i) in ops {
                if add {
                    recipes.add(meal(names[i], 100.0));
                } else {
                    recipes.remove(names[i]);
                }
                let mut seen: Vec<&str> = recipes.iter().map(|m| m.dish_name.as_str()).collect();
                let total = seen.len();
                seen.sort();
                seen.dedup();
                prop_assert_eq!(seen.len(), total);
            }
        }
    }
}
