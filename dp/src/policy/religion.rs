//! Religion rule table
//!
//! Each religion maps to at most one strict-fasting clause generator and at
//! most one standing dietary note. The composer looks rules up here instead
//! of branching on religion itself.

use crate::domain::{FastingMode, Religion};

/// Builds the strict clause for a religion given the active fast
pub type StrictFastRule = fn(&FastingMode) -> String;

/// Rules attached to one religion
#[derive(Debug, Clone, Copy)]
pub struct ReligionRules {
    /// Applied only while fasting
    pub strict_fast: Option<StrictFastRule>,
    /// Applied to every day when not fasting
    pub standing_note: Option<&'static str>,
}

impl ReligionRules {
    const NONE: ReligionRules = ReligionRules {
        strict_fast: None,
        standing_note: None,
    };
}

/// Look up the rules for a religion
pub fn rules_for(religion: Religion) -> ReligionRules {
    match religion {
        Religion::Hindu => ReligionRules {
            strict_fast: Some(hindu_fast),
            standing_note: None,
        },
        Religion::Muslim => ReligionRules {
            strict_fast: Some(muslim_fast),
            standing_note: Some(MUSLIM_STANDING_NOTE),
        },
        Religion::Christian => ReligionRules {
            strict_fast: Some(christian_fast),
            standing_note: None,
        },
        Religion::Jain => ReligionRules {
            strict_fast: Some(jain_fast),
            standing_note: Some(JAIN_STANDING_NOTE),
        },
        Religion::None | Religion::Sikh | Religion::Buddhist => ReligionRules::NONE,
    }
}

pub(crate) const HINDU_FAST_HEADING: &str = "STRICT HINDU FASTING RULES";
pub(crate) const MUSLIM_FAST_HEADING: &str = "HALAL FASTING RULES";
pub(crate) const RAMADAN_HEADING: &str = "RAMADAN MEAL STRUCTURE";
pub(crate) const CHRISTIAN_FAST_HEADING: &str = "CHRISTIAN FASTING RULES";
pub(crate) const JAIN_FAST_HEADING: &str = "STRICT JAIN FASTING RULES";

const MUSLIM_STANDING_NOTE: &str = "DIETARY NOTE (every day): The user is Muslim. Any meat must be Halal, \
and pork, pork products and alcohol must never appear in any dish.";

const JAIN_STANDING_NOTE: &str = "DIETARY NOTE (every day): The user follows a Jain diet. Every meal must be \
lacto-vegetarian (no meat, fish or eggs) and must not use any root or underground vegetables such as potato, \
onion, garlic, carrot, radish or beetroot.";

fn hindu_fast(mode: &FastingMode) -> String {
    format!(
        "{HINDU_FAST_HEADING} ({mode}): On fasting days do NOT use any grains or pulses (no rice, wheat, maida, \
semolina, dal, lentils or legumes), onion, garlic, meat, fish, eggs or alcohol. Use only fasting-permitted \
ingredients: fruits, milk, curd, paneer and other dairy, potatoes, sweet potatoes, pumpkin, nuts, makhana and \
sabudana. Use rock salt (sendha namak) instead of regular salt. For flour use only kuttu (buckwheat), singhara \
(water chestnut), rajgira (amaranth) or samak (barnyard millet)."
    )
}

fn muslim_fast(mode: &FastingMode) -> String {
    let mut text = format!(
        "{MUSLIM_FAST_HEADING} ({mode}): All food must be Halal. Never include pork, pork products, alcohol or \
ingredients containing them; any meat must be Halal."
    );
    if mode.indicates_ramadan() {
        text.push_str(&format!(
            "\n{RAMADAN_HEADING}: No food is eaten between dawn and sunset. Use the breakfast slot for Suhoor, a \
pre-dawn meal of slow-digesting complex carbohydrates, protein, healthy fats and plenty of fluids that sustains \
energy through the fast. Use the dinner slot for Iftar, the post-sunset meal: open with dates and water, then soft, \
easily digestible, hydrating food before a balanced main course. Use the lunch slot for a light, hydrating meal \
eaten after Iftar. Avoid heavily fried, very salty and very sugary dishes."
        ));
    }
    text
}

fn christian_fast(mode: &FastingMode) -> String {
    format!(
        "{CHRISTIAN_FAST_HEADING} ({mode}): Abstain from the meat of warm-blooded animals (no beef, pork, mutton, \
lamb, chicken or other poultry). Fish and seafood, dairy and eggs are permitted."
    )
}

fn jain_fast(mode: &FastingMode) -> String {
    format!(
        "{JAIN_FAST_HEADING} ({mode}): Food must be strictly lacto-vegetarian. Exclude all root and underground \
vegetables (potato, onion, garlic, ginger, carrot, radish, beetroot, sweet potato), all fungi including mushrooms, \
and honey. Schedule every meal before sunset. On strict fasts such as Ayambil, Ekasana or Upvas keep food very \
simple: plain boiled or roasted preparations with minimal spices and oil."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_rules_exist_for_named_religions() {
        for religion in [Religion::Hindu, Religion::Muslim, Religion::Christian, Religion::Jain] {
            assert!(rules_for(religion).strict_fast.is_some(), "{religion} should have a strict rule");
        }
        for religion in [Religion::None, Religion::Sikh, Religion::Buddhist] {
            assert!(rules_for(religion).strict_fast.is_none());
        }
    }

    #[test]
    fn test_standing_notes_only_for_muslim_and_jain() {
        let with_note: Vec<Religion> = Religion::ALL
            .iter()
            .copied()
            .filter(|r| rules_for(*r).standing_note.is_some())
            .collect();
        assert_eq!(with_note, vec![Religion::Muslim, Religion::Jain]);
    }

    #[test]
    fn test_ramadan_adds_meal_structure() {
        let rule = rules_for(Religion::Muslim).strict_fast.unwrap();

        let ramadan = rule(&FastingMode::new("Ramadan"));
        assert!(ramadan.contains(RAMADAN_HEADING));
        assert!(ramadan.contains("Suhoor"));
        assert!(ramadan.contains("Iftar"));

        let ashura = rule(&FastingMode::new("Ashura"));
        assert!(ashura.contains(MUSLIM_FAST_HEADING));
        assert!(!ashura.contains("Suhoor"));
    }

    #[test]
    fn test_hindu_rule_names_alternative_flours() {
        let text = (rules_for(Religion::Hindu).strict_fast.unwrap())(&FastingMode::new("Navratri"));
        assert!(text.contains("(Navratri)"));
        assert!(text.contains("kuttu"));
        assert!(text.contains("rock salt"));
    }

    #[test]
    fn test_christian_rule_allows_fish_dairy_eggs() {
        let text = (rules_for(Religion::Christian).strict_fast.unwrap())(&FastingMode::new("Lent"));
        assert!(text.starts_with(CHRISTIAN_FAST_HEADING));
        assert!(text.contains("(Lent)"));
        assert!(text.contains("warm-blooded animals"));
        for allowed in ["Fish", "dairy", "eggs"] {
            assert!(text.contains(allowed), "missing {allowed}");
        }
    }

    #[test]
    fn test_jain_rule_excludes_roots_fungi_honey() {
        let text = (rules_for(Religion::Jain).strict_fast.unwrap())(&FastingMode::new("Paryushan"));
        assert!(text.starts_with(JAIN_FAST_HEADING));
        assert!(text.contains("lacto-vegetarian"));
        for excluded in ["root and underground", "fungi", "honey"] {
            assert!(text.contains(excluded), "missing {excluded}");
        }
        assert!(text.contains("before sunset"));
    }
}
