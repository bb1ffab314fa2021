//! Response schemas sent with structured-output requests.
//!
//! These use the OpenAPI subset understood by `generateContent`. Property
//! names match the camelCase fields of the records in [`crate::model`].

use serde_json::{json, Value};

use crate::model::FoodSafety;

/// Schema for a multi-day meal plan.
#[must_use]
pub fn meal_plan() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": { "type": "STRING", "description": "Day label, e.g. \"Ngày 1\" or a weekday" },
                "meals": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING", "description": "Dish name" },
                            "time": { "type": "STRING", "description": "Suggested time, e.g. 7:00 AM" },
                            "portion": { "type": "STRING", "description": "Suggested portion, e.g. 1 small bowl" },
                            "note": { "type": "STRING", "description": "Short note on why the dish suits the user" }
                        },
                        "required": ["name", "time", "portion", "note"]
                    }
                }
            },
            "required": ["day", "meals"]
        }
    })
}

/// Schema for a food safety verdict.
#[must_use]
pub fn food_check() -> Value {
    let levels: Vec<&str> = FoodSafety::ALL.iter().map(|level| level.label()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "safetyLevel": { "type": "STRING", "enum": levels },
            "reason": { "type": "STRING", "description": "Explanation of the rating" },
            "scientificEvidence": { "type": "STRING", "description": "Scientific evidence and cited sources, if any" }
        },
        "required": ["safetyLevel", "reason"]
    })
}

/// Schema for a generated recipe. The category is filled in by the server.
#[must_use]
pub fn recipe() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "cookTime": { "type": "STRING" },
            "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
            "instructions": { "type": "STRING" }
        },
        "required": ["title", "description", "cookTime", "ingredients", "instructions"]
    })
}
