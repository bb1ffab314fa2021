//! The diet assistant: prompts and schemas in front of a generative model.
//!
//! Each operation renders a prompt, makes one model call and parses the
//! reply into a typed record. There is no retry; any failure is returned to
//! the caller as-is.

pub mod gemini;
pub mod prompts;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    FoodCheckResult, FoodImage, MealPlan, Recipe, RecipeCategory, SymptomLog, UserProfile,
};

pub use gemini::GeminiClient;

/// Logs needed before a trigger analysis is worth running.
pub const MIN_LOGS_FOR_ANALYSIS: usize = 3;

/// Returned instead of an analysis when the journal is too short.
pub const NOT_ENOUGH_DATA_MESSAGE: &str = "Chưa đủ dữ liệu để phân tích. Hãy ghi lại thêm các triệu chứng của bạn, bao gồm cả những ngày bạn cảm thấy khỏe (mức đau = 0).";

/// One call to a generative model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Prompt text.
    pub prompt: String,
    /// Optional image sent alongside the prompt.
    pub image: Option<FoodImage>,
    /// When set, the model is asked for JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// A free-text request.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            response_schema: None,
        }
    }

    /// A request for JSON output matching `schema`.
    #[must_use]
    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            response_schema: Some(schema),
        }
    }

    /// Attach an image.
    #[must_use]
    pub fn with_image(mut self, image: Option<FoodImage>) -> Self {
        self.image = image;
        self
    }
}

/// A hosted text generation model.
#[async_trait]
pub trait GenerativeModel: Send + Sync + std::fmt::Debug {
    /// Model name, for logs and the health endpoint.
    fn name(&self) -> &str;

    /// Run one generation and return the raw text output.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached, rejects the request,
    /// or answers without text.
    async fn generate(&self, request: GenerateRequest) -> Result<String>;
}

/// Diet assistant operations over a [`GenerativeModel`].
#[derive(Debug, Clone)]
pub struct Assistant {
    model: Arc<dyn GenerativeModel>,
    language: String,
}

/// A recipe as the model returns it, before the server assigns a category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRecipe {
    title: String,
    description: String,
    cook_time: String,
    ingredients: Vec<String>,
    instructions: String,
}

impl From<GeneratedRecipe> for Recipe {
    fn from(generated: GeneratedRecipe) -> Self {
        Self {
            title: generated.title,
            description: generated.description,
            category: RecipeCategory::AiCustom,
            cook_time: generated.cook_time,
            ingredients: generated.ingredients,
            instructions: generated.instructions,
        }
    }
}

impl Assistant {
    /// Create an assistant that asks for answers in `language`.
    #[must_use]
    pub fn new(model: Arc<dyn GenerativeModel>, language: impl Into<String>) -> Self {
        Self {
            model,
            language: language.into(),
        }
    }

    /// Name of the underlying model.
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Generate a seven-day meal plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails or its output is not a plan.
    pub async fn meal_plan(
        &self,
        profile: &UserProfile,
        symptoms: &[SymptomLog],
    ) -> Result<MealPlan> {
        let prompt = prompts::meal_plan(profile, symptoms, &self.language);
        let text = self
            .model
            .generate(GenerateRequest::structured(prompt, schema::meal_plan()))
            .await?;
        let plan: MealPlan = parse_output(&text)?;
        info!(days = plan.len(), "Generated meal plan");
        Ok(plan)
    }

    /// Rate how safe a food is for the user, by name, photo, or both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if neither a name nor a photo is
    /// given, or an error if the model call fails or its output is not a
    /// verdict.
    pub async fn check_food(
        &self,
        profile: &UserProfile,
        food_name: Option<&str>,
        image: Option<FoodImage>,
    ) -> Result<FoodCheckResult> {
        let food_name = food_name.map(str::trim).filter(|name| !name.is_empty());
        if food_name.is_none() && image.is_none() {
            return Err(Error::invalid_input("either a food name or an image is required"));
        }

        let prompt = prompts::food_check(profile, food_name, &self.language);
        let request = GenerateRequest::structured(prompt, schema::food_check()).with_image(image);
        let text = self.model.generate(request).await?;
        let result: FoodCheckResult = parse_output(&text)?;
        info!(safety = result.safety_level.label(), "Checked food");
        Ok(result)
    }

    /// Produce a markdown report on what seems to trigger the user's pain.
    ///
    /// With fewer than [`MIN_LOGS_FOR_ANALYSIS`] logs the model is not
    /// called and [`NOT_ENOUGH_DATA_MESSAGE`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails.
    pub async fn analyze_triggers(
        &self,
        profile: &UserProfile,
        symptoms: &[SymptomLog],
    ) -> Result<String> {
        if symptoms.len() < MIN_LOGS_FOR_ANALYSIS {
            debug!(logs = symptoms.len(), "Not enough logs for trigger analysis");
            return Ok(NOT_ENOUGH_DATA_MESSAGE.to_string());
        }

        let prompt = prompts::trigger_analysis(profile, symptoms, &self.language);
        let text = self.model.generate(GenerateRequest::text(prompt)).await?;
        info!(logs = symptoms.len(), "Analyzed triggers");
        Ok(text)
    }

    /// Create a recipe for the user's request.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails or its output is not a
    /// recipe.
    pub async fn suggest_recipe(&self, profile: &UserProfile, request: &str) -> Result<Recipe> {
        let prompt = prompts::recipe(profile, request, &self.language);
        let text = self
            .model
            .generate(GenerateRequest::structured(prompt, schema::recipe()))
            .await?;
        let recipe: GeneratedRecipe = parse_output(&text)?;
        info!(title = %recipe.title, "Suggested recipe");
        Ok(recipe.into())
    }
}

/// Parse structured model output.
fn parse_output<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text.trim()).map_err(|source| Error::ModelOutput { source })
}
