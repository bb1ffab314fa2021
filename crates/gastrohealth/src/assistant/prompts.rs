//! Prompt templates for the assistant.

use crate::model::{SymptomLog, UserProfile};

/// Render one line per symptom for the meal plan prompt.
#[must_use]
pub fn symptom_history(symptoms: &[SymptomLog]) -> String {
    if symptoms.is_empty() {
        return "No symptom history yet.".to_string();
    }

    symptoms
        .iter()
        .map(|s| {
            format!(
                "- On {}, ate '{}' and had pain {}/10 at {}.",
                s.timestamp.format("%d/%m/%Y %H:%M"),
                s.eaten_foods,
                s.pain_level,
                s.pain_location
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one line per symptom for the trigger analysis prompt.
///
/// Pain-free days are kept; they are what the protective-factor analysis
/// compares against.
#[must_use]
pub fn health_journal(symptoms: &[SymptomLog]) -> String {
    symptoms
        .iter()
        .map(|s| {
            let activity = if s.physical_activity.trim().is_empty() {
                "No physical activity".to_string()
            } else {
                format!("Activity: \"{}\"", s.physical_activity)
            };
            let outcome = if s.is_painful() {
                format!("pain {}/10 at {}", s.pain_level, s.pain_location)
            } else {
                "no pain".to_string()
            };
            format!(
                "- {}: ate \"{}\". {activity}. Outcome: {outcome}.",
                s.timestamp.format("%d/%m/%Y"),
                s.eaten_foods
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for a seven-day meal plan.
#[must_use]
pub fn meal_plan(profile: &UserProfile, symptoms: &[SymptomLog], language: &str) -> String {
    format!(
        "Based on the following health information, create a detailed meal plan for the next 7 days.\n\
         {profile}\n\
         RECENT SYMPTOM HISTORY:\n{history}\n\n\
         REQUIREMENTS:\n\
         - Plan 7 days, each with 3 main meals (breakfast, lunch, dinner) and 2 snacks.\n\
         - Dishes must be easy to digest and suit the user's condition and goal.\n\
         - Completely avoid the known trigger foods.\n\
         - Give the dish name, a suggested time and a reasonable portion.\n\
         - For each dish add a short \"note\" explaining why it is good for the user's condition \
         (for example: \"Rich in soluble fibre, soothes the stomach lining\").\n\
         - Keep the plan varied and nutritionally complete.\n\
         {language}",
        profile = profile_section(profile, true),
        history = symptom_history(symptoms),
        language = language_line(language),
    )
}

/// Prompt for a food safety check.
#[must_use]
pub fn food_check(profile: &UserProfile, food_name: Option<&str>, language: &str) -> String {
    let food = match food_name.map(str::trim) {
        Some(name) if !name.is_empty() => format!("\"{name}\""),
        _ => "the food in the attached photo".to_string(),
    };

    format!(
        "Analyse this food for a user with the following health information:\n\
         - Condition: {condition}\n\
         - Known trigger foods: {triggers}\n\n\
         Food to check: {food}\n\n\
         REQUIREMENTS:\n\
         1. Rate how safe this food is using exactly one of three levels: \
         \"An toàn\" (safe), \"Hạn chế\" (limit), \"Tránh\" (avoid).\n\
         2. Briefly explain the reason for the rating.\n\
         3. Give short \"scientific evidence\" for the rating, citing sources (study or journal article names) \
         where possible. Without specific evidence, explain from general nutrition principles.\n\
         {language}",
        condition = profile.condition,
        triggers = profile.trigger_foods,
        language = language_line(language),
    )
}

/// Prompt for the trigger analysis report.
#[must_use]
pub fn trigger_analysis(profile: &UserProfile, symptoms: &[SymptomLog], language: &str) -> String {
    format!(
        "Using the user profile and health journal below, run a detailed comparative analysis \
         to identify what affects their condition.\n\
         {profile}\n\
         HEALTH JOURNAL:\n{journal}\n\n\
         ANALYSIS:\n\
         1. **Pain triggers (culprits):**\n\
         \x20  * Identify foods, drinks or physical activity that often appear BEFORE the user records pain (pain > 0).\n\
         \x20  * Propose hypotheses about likely culprits.\n\
         2. **Protective factors (what works):**\n\
         \x20  * Identify foods, drinks or physical activity that often appear when the user records NO pain (pain = 0).\n\
         \x20  * Point out protective habits.\n\
         3. **Comparison and recommendations:**\n\
         \x20  * Compare the two groups and draw conclusions.\n\
         \x20  * Give concrete, actionable recommendations in three sections:\n\
         \x20    * **AVOID:** what to limit or stop.\n\
         \x20    * **KEEP:** good habits to continue.\n\
         \x20    * **TRY:** new changes or additions based on the analysis.\n\n\
         Present the result as a clear, easy-to-read markdown report with bold headings.\n\
         {language}",
        profile = profile_section(profile, false),
        journal = health_journal(symptoms),
        language = language_line(language),
    )
}

/// Prompt for a custom recipe.
#[must_use]
pub fn recipe(profile: &UserProfile, request: &str, language: &str) -> String {
    format!(
        "As a nutrition expert for people with stomach conditions, create a new recipe \
         based on the user's request and health profile.\n\
         {profile}\
         - Dietary goal: {goal}\n\n\
         USER REQUEST:\n\"{request}\"\n\n\
         RECIPE REQUIREMENTS:\n\
         - The recipe must be completely safe, easy to digest and fit the user's profile.\n\
         - Avoid all known trigger foods.\n\
         - Provide the dish name (title), a short description, cooking time (cookTime), \
         an ingredient list (ingredients) and detailed instructions.\n\
         {language}",
        profile = profile_section(profile, false),
        goal = profile.dietary_goal,
        language = language_line(language),
    )
}

/// The profile block. Every line, the last included, ends with a newline.
fn profile_section(profile: &UserProfile, full: bool) -> String {
    let mut section = format!("\nUSER PROFILE:\n- Condition: {}\n", profile.condition);
    if full {
        section.push_str(&format!("- Current pain level: {}/10\n", profile.pain_level));
    }
    section.push_str(&format!("- Known trigger foods: {}\n", profile.trigger_foods));
    if full {
        section.push_str(&format!("- Dietary goal: {}\n", profile.dietary_goal));
    }
    section
}

fn language_line(language: &str) -> String {
    format!("\nWrite every text value in {language}.")
}
