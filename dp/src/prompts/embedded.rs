//! Embedded prompts
//!
//! Compiled into the binary from the `.pmt` files in `prompts/`.

use tracing::debug;

/// Persona shared by every request
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Seven-day diet plan task
pub const DIET_PLAN: &str = include_str!("../../prompts/diet-plan.pmt");

/// Grocery store lookup task
pub const STORE_LOOKUP: &str = include_str!("../../prompts/store-lookup.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "diet-plan" => Some(DIET_PLAN),
        "store-lookup" => Some(STORE_LOOKUP),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_diet_plan() {
        let plan = get_embedded("diet-plan").unwrap();
        assert!(plan.contains("{{constraints}}"));
        assert!(plan.contains("totalCalories"));
    }

    #[test]
    fn test_get_embedded_store_lookup() {
        let stores = get_embedded("store-lookup").unwrap();
        assert!(stores.contains("{{city}}"));
        for field in ["Name", "URL", "Timing", "Address", "Offer", "Ratings"] {
            assert!(stores.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
