//! User profile and its legal value domains

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::label::label_enum;
use crate::error::CoreError;

label_enum! {
    /// Biological sex as entered by the user
    pub enum Sex {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

label_enum! {
    /// Health conditions the plan must account for
    pub enum HealthIssue {
        Diabetes => "Diabetes",
        Hypertension => "Hypertension",
        Thyroid => "Thyroid",
        Pcos => "PCOS",
        HighCholesterol => "High Cholesterol",
        HeartDisease => "Heart Disease",
        Obesity => "Obesity",
        Anemia => "Anemia",
        KidneyDisease => "Kidney Disease",
        Ibs => "IBS",
    }
}

label_enum! {
    /// Preferred regional cuisine
    #[derive(Default)]
    pub enum Cuisine {
        #[default]
        NorthIndian => "North Indian",
        SouthIndian => "South Indian",
        Gujarati => "Gujarati",
        Bengali => "Bengali",
        Maharashtrian => "Maharashtrian",
        Punjabi => "Punjabi",
        Rajasthani => "Rajasthani",
        IndoChinese => "Indo-Chinese",
        Continental => "Continental",
        Mediterranean => "Mediterranean",
    }
}

label_enum! {
    /// Dietary food type
    #[derive(Default)]
    pub enum FoodType {
        #[default]
        Veg => "Veg",
        NonVeg => "Non-Veg",
        Eggetarian => "Eggetarian",
    }
}

label_enum! {
    /// Daily food budget band
    #[derive(Default)]
    pub enum BudgetBand {
        Low => "Low",
        #[default]
        Medium => "Medium",
        High => "High",
    }
}

impl BudgetBand {
    /// Spending range the band stands for, per person per day
    pub fn range(&self) -> &'static str {
        match self {
            BudgetBand::Low => "under ₹200 per day",
            BudgetBand::Medium => "₹200-500 per day",
            BudgetBand::High => "above ₹500 per day",
        }
    }
}

label_enum! {
    /// When the user prefers to eat
    #[derive(Default)]
    pub enum MealTiming {
        EarlyBird => "Early Bird",
        #[default]
        Standard => "Standard",
        LateEater => "Late Eater",
        IntermittentFasting => "Intermittent Fasting (16:8)",
    }
}

label_enum! {
    /// Religion driving fasting and dietary rules
    #[derive(Default)]
    pub enum Religion {
        #[default]
        None => "None",
        Hindu => "Hindu",
        Muslim => "Muslim",
        Christian => "Christian",
        Jain => "Jain",
        Sikh => "Sikh",
        Buddhist => "Buddhist",
    }
}

impl Religion {
    /// Fasting observances selectable for this religion, "None" first
    pub fn fasting_options(&self) -> &'static [&'static str] {
        match self {
            Religion::None | Religion::Sikh => &["None"],
            Religion::Hindu => &[
                "None",
                "Navratri",
                "Ekadashi",
                "Maha Shivratri",
                "Karva Chauth",
                "Shravan Somvar",
            ],
            Religion::Muslim => &["None", "Ramadan", "Sunnah (Monday/Thursday)", "Day of Arafah", "Ashura"],
            Religion::Christian => &["None", "Lent", "Advent", "Good Friday"],
            Religion::Jain => &["None", "Paryushan", "Ayambil", "Ekasana", "Upvas"],
            Religion::Buddhist => &["None", "Uposatha"],
        }
    }

    /// Whether `mode` is one of this religion's fasting options
    pub fn allows(&self, mode: &FastingMode) -> bool {
        mode.is_none()
            || self
                .fasting_options()
                .iter()
                .any(|option| option.eq_ignore_ascii_case(mode.as_str()))
    }
}

/// A named fasting observance; "None" means no fast
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FastingMode(String);

impl FastingMode {
    pub const NONE_LABEL: &'static str = "None";

    pub fn none() -> Self {
        Self(Self::NONE_LABEL.to_string())
    }

    pub fn new(mode: impl Into<String>) -> Self {
        Self(mode.into().trim().to_string())
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty() || self.0.eq_ignore_ascii_case(Self::NONE_LABEL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ramadan fasts get the Suhoor/Iftar meal structure
    pub fn indicates_ramadan(&self) -> bool {
        let lower = self.0.to_lowercase();
        lower.contains("ramadan") || lower.contains("ramzan")
    }
}

impl Default for FastingMode {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Display for FastingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "{}", Self::NONE_LABEL)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Snapshot of everything the planner knows about a user
///
/// Fields are only changed through [`Profile::apply`], which keeps the
/// religion/fasting pairing legal. Profiles deserialized from elsewhere may
/// still carry an illegal pairing; the policy composer corrects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    age: u32,
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    #[serde(default)]
    allergies: String,
    #[serde(default)]
    health_issues: BTreeSet<HealthIssue>,
    #[serde(default)]
    cuisine: Cuisine,
    #[serde(default)]
    food_type: FoodType,
    #[serde(default)]
    budget: BudgetBand,
    city: String,
    plan_start: NaiveDate,
    #[serde(default)]
    festival_mode: bool,
    #[serde(default)]
    meal_timing: MealTiming,
    #[serde(default)]
    religion: Religion,
    #[serde(default)]
    fasting_mode: FastingMode,
}

/// A single-field change to a profile
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    Age(u32),
    Sex(Sex),
    WeightKg(f64),
    HeightCm(f64),
    Allergies(String),
    /// Replaces the whole set
    HealthIssues(BTreeSet<HealthIssue>),
    Cuisine(Cuisine),
    FoodType(FoodType),
    Budget(BudgetBand),
    City(String),
    PlanStart(NaiveDate),
    FestivalMode(bool),
    MealTiming(MealTiming),
    /// Also resets the fasting mode when the religion actually changes
    Religion(Religion),
    FastingMode(FastingMode),
}

impl ProfileUpdate {
    /// Parse a `field value` pair as typed on the command line
    pub fn parse(field: &str, value: &str) -> Result<Self, CoreError> {
        debug!(%field, %value, "ProfileUpdate::parse: called");
        let invalid = |e: String| CoreError::InvalidProfile(e);
        let number = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| CoreError::InvalidProfile(format!("{} must be a number, got {:?}", field, v)))
        };

        let update = match field.to_lowercase().replace('-', "_").as_str() {
            "age" => ProfileUpdate::Age(
                value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("age must be a whole number, got {:?}", value)))?,
            ),
            "sex" => ProfileUpdate::Sex(value.parse().map_err(invalid)?),
            "weight" | "weight_kg" => ProfileUpdate::WeightKg(number(value)?),
            "height" | "height_cm" => ProfileUpdate::HeightCm(number(value)?),
            "allergies" => ProfileUpdate::Allergies(value.to_string()),
            "health_issues" => {
                let mut issues = BTreeSet::new();
                for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    if part.eq_ignore_ascii_case("none") {
                        continue;
                    }
                    issues.insert(part.parse().map_err(invalid)?);
                }
                ProfileUpdate::HealthIssues(issues)
            }
            "cuisine" => ProfileUpdate::Cuisine(value.parse().map_err(invalid)?),
            "food_type" => ProfileUpdate::FoodType(value.parse().map_err(invalid)?),
            "budget" => ProfileUpdate::Budget(value.parse().map_err(invalid)?),
            "city" => ProfileUpdate::City(value.to_string()),
            "plan_start" | "date" => ProfileUpdate::PlanStart(
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                    .map_err(|e| invalid(format!("plan_start must be YYYY-MM-DD: {}", e)))?,
            ),
            "festival_mode" => ProfileUpdate::FestivalMode(
                value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("festival_mode must be true or false, got {:?}", value)))?,
            ),
            "meal_timing" => ProfileUpdate::MealTiming(value.parse().map_err(invalid)?),
            "religion" => ProfileUpdate::Religion(value.parse().map_err(invalid)?),
            "fasting_mode" | "fasting" => ProfileUpdate::FastingMode(FastingMode::new(value)),
            other => return Err(invalid(format!("Unknown profile field: {}", other))),
        };
        Ok(update)
    }
}

fn check_measurement(name: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::InvalidProfile(format!("{} must be greater than zero, got {}", name, value)));
    }
    Ok(())
}

fn check_city(city: &str) -> Result<(), CoreError> {
    if city.trim().is_empty() {
        return Err(CoreError::InvalidProfile("city must not be empty".to_string()));
    }
    Ok(())
}

fn check_fasting(religion: Religion, mode: &FastingMode) -> Result<(), CoreError> {
    if !religion.allows(mode) {
        return Err(CoreError::InvalidProfile(format!(
            "fasting mode {:?} is not available for religion {}",
            mode.as_str(),
            religion
        )));
    }
    Ok(())
}

impl Profile {
    /// Create a profile from the required fields; the rest take defaults
    pub fn new(
        age: u32,
        sex: Sex,
        weight_kg: f64,
        height_cm: f64,
        city: impl Into<String>,
        plan_start: NaiveDate,
    ) -> Result<Self, CoreError> {
        let profile = Self {
            age,
            sex,
            weight_kg,
            height_cm,
            allergies: String::new(),
            health_issues: BTreeSet::new(),
            cuisine: Cuisine::default(),
            food_type: FoodType::default(),
            budget: BudgetBand::default(),
            city: city.into().trim().to_string(),
            plan_start,
            festival_mode: false,
            meal_timing: MealTiming::default(),
            religion: Religion::default(),
            fasting_mode: FastingMode::none(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check measurements, city and the religion/fasting pairing
    ///
    /// Records persisted before this check existed can still carry a
    /// mismatched pair; the composer resets those to "None".
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.age == 0 {
            return Err(CoreError::InvalidProfile("age must be greater than zero".to_string()));
        }
        check_measurement("weight", self.weight_kg)?;
        check_measurement("height", self.height_cm)?;
        check_city(&self.city)?;
        check_fasting(self.religion, &self.fasting_mode)
    }

    /// Apply a single-field update
    ///
    /// Nothing changes if the update is rejected.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), CoreError> {
        debug!(?update, "Profile::apply: called");
        match update {
            ProfileUpdate::Age(age) => {
                if age == 0 {
                    return Err(CoreError::InvalidProfile("age must be greater than zero".to_string()));
                }
                self.age = age;
            }
            ProfileUpdate::Sex(sex) => self.sex = sex,
            ProfileUpdate::WeightKg(weight) => {
                check_measurement("weight", weight)?;
                self.weight_kg = weight;
            }
            ProfileUpdate::HeightCm(height) => {
                check_measurement("height", height)?;
                self.height_cm = height;
            }
            ProfileUpdate::Allergies(allergies) => self.allergies = allergies.trim().to_string(),
            ProfileUpdate::HealthIssues(issues) => self.health_issues = issues,
            ProfileUpdate::Cuisine(cuisine) => self.cuisine = cuisine,
            ProfileUpdate::FoodType(food_type) => self.food_type = food_type,
            ProfileUpdate::Budget(budget) => self.budget = budget,
            ProfileUpdate::City(city) => {
                check_city(&city)?;
                self.city = city.trim().to_string();
            }
            ProfileUpdate::PlanStart(date) => self.plan_start = date,
            ProfileUpdate::FestivalMode(enabled) => self.festival_mode = enabled,
            ProfileUpdate::MealTiming(timing) => self.meal_timing = timing,
            ProfileUpdate::Religion(religion) => {
                if religion == self.religion {
                    debug!(%religion, "Profile::apply: religion unchanged, keeping fasting mode");
                } else {
                    debug!(from = %self.religion, to = %religion, "Profile::apply: religion changed, resetting fasting mode");
                    self.religion = religion;
                    self.fasting_mode = FastingMode::none();
                }
            }
            ProfileUpdate::FastingMode(mode) => {
                check_fasting(self.religion, &mode)?;
                self.fasting_mode = if mode.is_none() { FastingMode::none() } else { mode };
            }
        }
        Ok(())
    }

    /// Builder-style [`Profile::apply`]
    pub fn with(mut self, update: ProfileUpdate) -> Result<Self, CoreError> {
        self.apply(update)?;
        Ok(self)
    }

    /// The fasting mode the planner should honour
    ///
    /// Returns "None" plus `true` when the stored mode is not legal for the
    /// stored religion.
    pub fn effective_fasting_mode(&self) -> (FastingMode, bool) {
        if self.religion.allows(&self.fasting_mode) {
            (self.fasting_mode.clone(), false)
        } else {
            warn!(
                religion = %self.religion,
                fasting_mode = %self.fasting_mode,
                "Fasting mode not valid for religion, treating as None"
            );
            (FastingMode::none(), true)
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn allergies(&self) -> &str {
        &self.allergies
    }

    pub fn health_issues(&self) -> &BTreeSet<HealthIssue> {
        &self.health_issues
    }

    pub fn cuisine(&self) -> Cuisine {
        self.cuisine
    }

    pub fn food_type(&self) -> FoodType {
        self.food_type
    }

    pub fn budget(&self) -> BudgetBand {
        self.budget
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn plan_start(&self) -> NaiveDate {
        self.plan_start
    }

    pub fn festival_mode(&self) -> bool {
        self.festival_mode
    }

    pub fn meal_timing(&self) -> MealTiming {
        self.meal_timing
    }

    pub fn religion(&self) -> Religion {
        self.religion
    }

    pub fn fasting_mode(&self) -> &FastingMode {
        &self.fasting_mode
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn sample_profile() -> Profile {
        Profile::new(
            31,
            Sex::Female,
            62.5,
            160.0,
            "Pune",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_non_positive_measurements() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(Profile::new(0, Sex::Male, 70.0, 170.0, "Delhi", date).is_err());
        assert!(Profile::new(30, Sex::Male, 0.0, 170.0, "Delhi", date).is_err());
        assert!(Profile::new(30, Sex::Male, 70.0, -1.0, "Delhi", date).is_err());
        assert!(Profile::new(30, Sex::Male, 70.0, 170.0, "  ", date).is_err());
        assert!(Profile::new(30, Sex::Male, 70.0, 170.0, "Delhi", date).is_ok());
    }

    #[test]
    fn test_validate_rejects_foreign_fasting_mode() {
        let yaml = "age: 33\nsex: Female\nweight_kg: 60\nheight_cm: 160\ncity: Varanasi\n\
plan_start: 2026-03-01\nreligion: Hindu\nfasting_mode: Ramadan\n";
        let profile: Profile = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(profile.validate(), Err(CoreError::InvalidProfile(_))));

        let fixed = profile.with(ProfileUpdate::Religion(Religion::Muslim)).unwrap();
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn test_religion_change_resets_fasting() {
        let mut profile = sample_profile()
            .with(ProfileUpdate::Religion(Religion::Hindu))
            .unwrap()
            .with(ProfileUpdate::FastingMode(FastingMode::new("Navratri")))
            .unwrap();
        assert_eq!(profile.fasting_mode().as_str(), "Navratri");

        profile.apply(ProfileUpdate::Religion(Religion::Jain)).unwrap();
        assert_eq!(profile.religion(), Religion::Jain);
        assert!(profile.fasting_mode().is_none());
    }

    #[test]
    fn test_same_religion_is_a_no_op() {
        let mut profile = sample_profile()
            .with(ProfileUpdate::Religion(Religion::Muslim))
            .unwrap()
            .with(ProfileUpdate::FastingMode(FastingMode::new("Ramadan")))
            .unwrap();
        let before = profile.clone();

        profile.apply(ProfileUpdate::Religion(Religion::Muslim)).unwrap();
        assert_eq!(profile, before);
    }

    #[test]
    fn test_fasting_mode_must_match_religion() {
        let mut profile = sample_profile().with(ProfileUpdate::Religion(Religion::Hindu)).unwrap();
        let result = profile.apply(ProfileUpdate::FastingMode(FastingMode::new("Ramadan")));
        assert!(matches!(result, Err(CoreError::InvalidProfile(_))));
        assert!(profile.fasting_mode().is_none());

        profile
            .apply(ProfileUpdate::FastingMode(FastingMode::new("ekadashi")))
            .unwrap();
        assert_eq!(profile.fasting_mode().as_str(), "ekadashi");
    }

    #[test]
    fn test_health_issues_replace_whole_set() {
        let mut profile = sample_profile();
        profile
            .apply(ProfileUpdate::HealthIssues(BTreeSet::from([
                HealthIssue::Diabetes,
                HealthIssue::Thyroid,
            ])))
            .unwrap();
        profile
            .apply(ProfileUpdate::HealthIssues(BTreeSet::from([HealthIssue::Anemia])))
            .unwrap();
        assert_eq!(profile.health_issues(), &BTreeSet::from([HealthIssue::Anemia]));
    }

    #[test]
    fn test_rejected_update_leaves_profile_untouched() {
        let mut profile = sample_profile();
        let before = profile.clone();
        assert!(profile.apply(ProfileUpdate::WeightKg(f64::NAN)).is_err());
        assert!(profile.apply(ProfileUpdate::City(String::new())).is_err());
        assert_eq!(profile, before);
    }

    #[test]
    fn test_effective_fasting_mode_corrects_mismatch() {
        let yaml = r#"
age: 40
sex: Male
weight_kg: 80
height_cm: 175
city: Lucknow
plan_start: 2026-03-01
religion: Christian
fasting_mode: Ramadan
"#;
        let profile: Profile = serde_yaml::from_str(yaml).unwrap();
        let (mode, corrected) = profile.effective_fasting_mode();
        assert!(mode.is_none());
        assert!(corrected);
    }

    #[test]
    fn test_profile_update_parse() {
        assert_eq!(
            ProfileUpdate::parse("religion", "jain").unwrap(),
            ProfileUpdate::Religion(Religion::Jain)
        );
        assert_eq!(
            ProfileUpdate::parse("food-type", "Non-Veg").unwrap(),
            ProfileUpdate::FoodType(FoodType::NonVeg)
        );
        assert_eq!(
            ProfileUpdate::parse("health_issues", "Diabetes, PCOS").unwrap(),
            ProfileUpdate::HealthIssues(BTreeSet::from([HealthIssue::Diabetes, HealthIssue::Pcos]))
        );
        assert_eq!(
            ProfileUpdate::parse("health_issues", "None").unwrap(),
            ProfileUpdate::HealthIssues(BTreeSet::new())
        );
        assert!(ProfileUpdate::parse("age", "thirty").is_err());
        assert!(ProfileUpdate::parse("shoe_size", "9").is_err());
    }

    #[test]
    fn test_labels_serialize_verbatim() {
        assert_eq!(serde_json::to_string(&FoodType::NonVeg).unwrap(), "\"Non-Veg\"");
        assert_eq!(serde_json::to_string(&Cuisine::SouthIndian).unwrap(), "\"South Indian\"");
        assert_eq!("indo-chinese".parse::<Cuisine>().unwrap(), Cuisine::IndoChinese);
        assert_eq!("SouthIndian".parse::<Cuisine>().unwrap(), Cuisine::SouthIndian);
    }

    #[test]
    fn test_every_religion_offers_none_first() {
        for religion in Religion::ALL {
            assert_eq!(religion.fasting_options()[0], FastingMode::NONE_LABEL);
        }
    }

    fn arb_religion() -> impl Strategy<Value = Religion> {
        (0..Religion::ALL.len()).prop_map(|i| Religion::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_religion_change_always_resets_fasting(
            from in arb_religion(),
            to in arb_religion(),
            pick in 0usize..8,
        ) {
            let options = from.fasting_options();
            let mode = FastingMode::new(options[pick % options.len()]);
            let mut profile = sample_profile()
                .with(ProfileUpdate::Religion(from)).unwrap()
                .with(ProfileUpdate::FastingMode(mode.clone())).unwrap();

            profile.apply(ProfileUpdate::Religion(to)).unwrap();

            prop_assert_eq!(profile.religion(), to);
            if from == to {
                prop_assert_eq!(profile.fasting_mode(), &mode);
            } else {
                prop_assert!(profile.fasting_mode().is_none());
            }
            prop_assert!(profile.religion().allows(profile.fasting_mode()));
        }
    }
}
