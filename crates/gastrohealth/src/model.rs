//! Core record types for gastrohealth.
//!
//! These are the shapes exchanged with the browser client and stored in the
//! flat-file database. Field names serialize in camelCase and enum variants
//! serialize to the labels the client displays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest pain level on the 0-10 scale.
pub const MAX_PAIN_LEVEL: u8 = 10;

/// The gastric condition a user is managing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Peptic ulcer.
    #[serde(rename = "Viêm loét dạ dày")]
    Ulcer,
    /// Gastroesophageal reflux.
    #[serde(rename = "Trào ngược dạ dày thực quản")]
    Reflux,
    /// Anything else.
    #[serde(rename = "Khác")]
    Other,
}

impl Condition {
    /// Every condition the survey offers.
    pub const ALL: [Self; 3] = [Self::Ulcer, Self::Reflux, Self::Other];

    /// The label sent to and received from the client.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ulcer => "Viêm loét dạ dày",
            Self::Reflux => "Trào ngược dạ dày thực quản",
            Self::Other => "Khác",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user wants their diet to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietaryGoal {
    /// Reduce pain.
    #[serde(rename = "Giảm đau")]
    PainRelief,
    /// Reduce heartburn.
    #[serde(rename = "Giảm ợ nóng")]
    HeartburnRelief,
    /// Recover after a flare-up.
    #[serde(rename = "Phục hồi")]
    Recovery,
}

impl DietaryGoal {
    /// Every goal the survey offers.
    pub const ALL: [Self; 3] = [Self::PainRelief, Self::HeartburnRelief, Self::Recovery];

    /// The label sent to and received from the client.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PainRelief => "Giảm đau",
            Self::HeartburnRelief => "Giảm ợ nóng",
            Self::Recovery => "Phục hồi",
        }
    }
}

impl std::fmt::Display for DietaryGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The survey answers a user gives during onboarding.
///
/// One per user; edits replace the whole profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The condition being managed.
    pub condition: Condition,
    /// Current pain level, 0-10.
    pub pain_level: u8,
    /// Foods the user already knows cause trouble, free text.
    #[serde(default)]
    pub trigger_foods: String,
    /// The dietary goal.
    pub dietary_goal: DietaryGoal,
}

impl UserProfile {
    /// Check the profile's values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the pain level is above 10.
    pub fn validate(&self) -> Result<()> {
        validate_pain_level(self.pain_level)
    }
}

/// One entry in a user's symptom journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLog {
    /// Client-supplied identifier. Assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// Pain level, 0-10.
    pub pain_level: u8,
    /// Where it hurt.
    #[serde(default)]
    pub pain_location: String,
    /// When the pain started, as entered by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// When the pain ended, as entered by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// What the user ate beforehand.
    #[serde(default)]
    pub eaten_foods: String,
    /// Physical activity around the meal. Empty means none.
    #[serde(default)]
    pub physical_activity: String,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

impl SymptomLog {
    /// Create a log entry stamped with the current time.
    #[must_use]
    pub fn new(pain_level: u8, pain_location: &str, eaten_foods: &str) -> Self {
        Self {
            id: String::new(),
            pain_level,
            pain_location: pain_location.to_string(),
            start_time: None,
            end_time: None,
            eaten_foods: eaten_foods.to_string(),
            physical_activity: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Check the entry's values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the pain level is above 10.
    pub fn validate(&self) -> Result<()> {
        validate_pain_level(self.pain_level)
    }

    /// Derive a stable identifier from the owner and the entry's content.
    #[must_use]
    pub fn derive_id(&self, owner: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(owner.as_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        hasher.update(&[self.pain_level]);
        hasher.update(self.pain_location.as_bytes());
        hasher.update(self.eaten_foods.as_bytes());
        hasher.update(self.physical_activity.as_bytes());
        let hex = hasher.finalize().to_hex();
        hex.as_str()[..16].to_string()
    }

    /// Whether the user reported any pain.
    #[must_use]
    pub fn is_painful(&self) -> bool {
        self.pain_level > 0
    }
}

fn validate_pain_level(level: u8) -> Result<()> {
    if level > MAX_PAIN_LEVEL {
        return Err(Error::invalid_input(format!(
            "painLevel must be between 0 and {MAX_PAIN_LEVEL}, got {level}"
        )));
    }
    Ok(())
}

/// A single meal in a daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Dish name.
    pub name: String,
    /// Suggested time, e.g. "7:00 AM".
    pub time: String,
    /// Suggested portion.
    pub portion: String,
    /// Why this dish suits the user.
    #[serde(default)]
    pub note: String,
}

/// The meals for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// Day label, e.g. "Ngày 1".
    pub day: String,
    /// Meals in eating order.
    pub meals: Vec<Meal>,
}

/// A multi-day meal plan. Never persisted.
pub type MealPlan = Vec<DailyPlan>;

/// How safe a food is for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodSafety {
    /// Fine to eat.
    #[serde(rename = "An toàn")]
    Safe,
    /// Eat sparingly.
    #[serde(rename = "Hạn chế")]
    Limit,
    /// Do not eat.
    #[serde(rename = "Tránh")]
    Avoid,
}

impl FoodSafety {
    /// All levels, in increasing order of caution.
    pub const ALL: [Self; 3] = [Self::Safe, Self::Limit, Self::Avoid];

    /// The label sent to and received from the client.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Safe => "An toàn",
            Self::Limit => "Hạn chế",
            Self::Avoid => "Tránh",
        }
    }
}

/// Outcome of a food safety check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodCheckResult {
    /// The rating.
    pub safety_level: FoodSafety,
    /// Short explanation.
    pub reason: String,
    /// Supporting evidence, with sources when the model has them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_evidence: Option<String>,
}

/// A photo of a food, forwarded to the model as inline data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodImage {
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

/// Recipe grouping shown in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeCategory {
    /// Soothing dishes.
    #[serde(rename = "Giảm đau")]
    PainRelief,
    /// Dishes that counter heartburn.
    #[serde(rename = "Chống ợ nóng")]
    AntiHeartburn,
    /// Nourishing dishes for recovery.
    #[serde(rename = "Phục hồi")]
    Recovery,
    /// Generated on request by the assistant.
    #[serde(rename = "AI Tùy chỉnh")]
    AiCustom,
}

impl RecipeCategory {
    /// All categories, library ones first.
    pub const ALL: [Self; 4] = [
        Self::PainRelief,
        Self::AntiHeartburn,
        Self::Recovery,
        Self::AiCustom,
    ];

    /// The label sent to and received from the client.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PainRelief => "Giảm đau",
            Self::AntiHeartburn => "Chống ợ nóng",
            Self::Recovery => "Phục hồi",
            Self::AiCustom => "AI Tùy chỉnh",
        }
    }

    /// Look up a category by its client label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

/// A recipe, either from the seed library or generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Dish name.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Library grouping.
    pub category: RecipeCategory,
    /// Cooking time, free text.
    pub cook_time: String,
    /// Ingredient list.
    pub ingredients: Vec<String>,
    /// Preparation steps.
    pub instructions: String,
}
