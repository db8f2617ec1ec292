//! Policy composer
//!
//! Turns a profile into the constraint clauses for a diet-plan request.
//! Emission order:
//!
//! 1. base profile block (always)
//! 2. generic fasting block (fasting)
//! 3. religion's strict fasting block (fasting and religion has one)
//! 4. religion's standing note (not fasting and religion has one)
//! 5. festival block (festival mode)
//!
//! 3 and 4 never co-occur. The output depends only on the profile.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::fragment::{ConstraintFragment, Rule};
use super::religion::rules_for;
use crate::domain::{DETOX_THEME, FastingMode, PLAN_DAYS, Profile};

/// Plain values the task template can reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskParams {
    pub age: u32,
    pub sex: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub health_issues: String,
    pub religion: String,
    pub fasting_mode: String,
    pub allergies: String,
    pub cuisine: String,
    pub food_type: String,
    pub budget: String,
    pub city: String,
    pub meal_timing: String,
    pub start_date: String,
    pub end_date: String,
}

/// Composer output for one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    pub params: TaskParams,
    pub fragment: ConstraintFragment,
    /// The stored fasting mode was illegal for the religion and was dropped
    pub fasting_corrected: bool,
}

/// Compose the constraint clauses for a profile
pub fn compose(profile: &Profile) -> Policy {
    let (fasting, fasting_corrected) = profile.effective_fasting_mode();
    let religion = profile.religion();
    debug!(%religion, %fasting, festival = profile.festival_mode(), "compose: called");

    let params = task_params(profile, &fasting);
    let mut fragment = ConstraintFragment::new();

    fragment.push(Rule::BaseProfile, base_block(&params));

    let rules = rules_for(religion);
    if fasting.is_none() {
        if let Some(note) = rules.standing_note {
            debug!(%religion, "compose: standing religious note");
            fragment.push(Rule::StandingNote(religion), note);
        }
    } else {
        debug!(%fasting, "compose: generic fasting block");
        fragment.push(Rule::GenericFast, fasting_block(&fasting));

        if let Some(strict) = rules.strict_fast {
            debug!(%religion, "compose: strict fasting block");
            fragment.push(Rule::StrictFast(religion), strict(&fasting));
        }
    }

    if profile.festival_mode() {
        debug!("compose: festival block");
        fragment.push(Rule::Festival, festival_block(&params));
    }

    Policy {
        params,
        fragment,
        fasting_corrected,
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%A)").to_string()
}

fn or_none(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() { "None".to_string() } else { text.to_string() }
}

fn task_params(profile: &Profile, fasting: &FastingMode) -> TaskParams {
    let start = profile.plan_start();
    let end = start.checked_add_days(Days::new(PLAN_DAYS as u64 - 1)).unwrap_or(start);
    let health_issues = profile
        .health_issues()
        .iter()
        .map(|h| h.label())
        .collect::<Vec<_>>()
        .join(", ");

    TaskParams {
        age: profile.age(),
        sex: profile.sex().to_string(),
        weight_kg: profile.weight_kg(),
        height_cm: profile.height_cm(),
        health_issues: or_none(&health_issues),
        religion: profile.religion().to_string(),
        fasting_mode: fasting.to_string(),
        allergies: or_none(profile.allergies()),
        cuisine: profile.cuisine().to_string(),
        food_type: profile.food_type().to_string(),
        budget: format!("{} ({})", profile.budget(), profile.budget().range()),
        city: profile.city().to_string(),
        meal_timing: profile.meal_timing().to_string(),
        start_date: format_date(start),
        end_date: format_date(end),
    }
}

fn base_block(p: &TaskParams) -> String {
    format!(
        "USER PROFILE:\n\
- Age: {}\n\
- Sex: {}\n\
- Weight: {} kg\n\
- Height: {} cm\n\
- Health issues: {}\n\
- Religion: {}\n\
- Allergies: {}\n\
- Preferred cuisine: {}\n\
- Food type: {}\n\
- Daily budget: {}\n\
- City: {}\n\
- Meal timing: {}",
        p.age,
        p.sex,
        p.weight_kg,
        p.height_cm,
        p.health_issues,
        p.religion,
        p.allergies,
        p.cuisine,
        p.food_type,
        p.budget,
        p.city,
        p.meal_timing
    )
}

fn fasting_block(fasting: &FastingMode) -> String {
    format!(
        "FASTING: The user is observing {fasting}. Respect the fast on every day it applies and plan \
nutrient-appropriate meals for both the fasting and the feasting periods, keeping hydration, protein and energy \
balanced."
    )
}

fn festival_block(p: &TaskParams) -> String {
    format!(
        "FESTIVAL MODE: Check whether any major festivals fall between {} and {} for a user living in {}. On each \
festival day replace the regular menu with a healthier version of the traditional festive dishes and set that \
day's \"theme\" to the festival name. Immediately after the festival insert exactly one day whose \"theme\" is \
\"{}\", made of light, restorative meals such as soups, fruit, salads, buttermilk and khichdi. If no festival \
falls in this window, plan the week normally and leave \"theme\" out.",
        p.start_date, p.end_date, p.city, DETOX_THEME
    )
}
