//! Route handlers.
//!
//! Request bodies use optional fields so a missing field becomes a 400 with
//! a readable message instead of a serde rejection.

use std::sync::LazyLock;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::{ApiError, INTERNAL_ERROR};
use super::AppState;
use crate::model::{
    FoodCheckResult, FoodImage, MealPlan, Recipe, RecipeCategory, SymptomLog, UserProfile,
};
use crate::recipes;
use crate::report::HealthReport;
use crate::storage::UserRecord;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern"));

type ApiResult<T> = Result<T, ApiError>;

/// Trim an email and check its shape.
fn normalize_email(email: Option<String>, missing: &str) -> ApiResult<String> {
    let email = email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request(missing))?;
    if !EMAIL.is_match(&email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(email)
}

fn validated_profile(profile: Option<UserProfile>, missing: &str) -> ApiResult<UserProfile> {
    let profile = profile.ok_or_else(|| ApiError::bad_request(missing))?;
    profile
        .validate()
        .map_err(ApiError::context(INTERNAL_ERROR))?;
    Ok(profile)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
}

/// A user's record together with their email.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    email: String,
    #[serde(flatten)]
    record: UserRecord,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let email = normalize_email(request.email, "Email is required")?;

    let key = email.clone();
    let record = state
        .with_storage(move |storage| storage.login(&key))
        .await
        .map_err(ApiError::context(INTERNAL_ERROR))?;
    Ok(Json(LoginResponse { email, record }))
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    email: Option<String>,
    profile: Option<UserProfile>,
}

pub async fn save_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> ApiResult<Json<UserProfile>> {
    const MISSING: &str = "Email and profile are required";

    let Json(request) = payload?;
    let email = normalize_email(request.email, MISSING)?;
    let profile = validated_profile(request.profile, MISSING)?;

    let profile = state
        .with_storage(move |storage| storage.save_profile(&email, profile))
        .await
        .map_err(ApiError::context(INTERNAL_ERROR))?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct SymptomRequest {
    email: Option<String>,
    symptom: Option<SymptomLog>,
}

pub async fn add_symptom(
    State(state): State<AppState>,
    payload: Result<Json<SymptomRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<SymptomLog>>)> {
    const MISSING: &str = "Email and symptom are required";

    let Json(request) = payload?;
    let email = normalize_email(request.email, MISSING)?;
    let symptom = request.symptom.ok_or_else(|| ApiError::bad_request(MISSING))?;
    symptom
        .validate()
        .map_err(ApiError::context(INTERNAL_ERROR))?;

    let symptoms = state
        .with_storage(move |storage| storage.append_symptom(&email, symptom))
        .await
        .map_err(ApiError::context(INTERNAL_ERROR))?;
    Ok((StatusCode::CREATED, Json(symptoms)))
}

#[derive(Debug, Deserialize)]
pub struct MealPlanRequest {
    profile: Option<UserProfile>,
    symptoms: Option<Vec<SymptomLog>>,
}

pub async fn meal_plan(
    State(state): State<AppState>,
    payload: Result<Json<MealPlanRequest>, JsonRejection>,
) -> ApiResult<Json<MealPlan>> {
    let Json(request) = payload?;
    let profile = validated_profile(request.profile, "User profile is required")?;
    let symptoms = request.symptoms.unwrap_or_default();

    let plan = state
        .assistant
        .meal_plan(&profile, &symptoms)
        .await
        .map_err(ApiError::context("Failed to generate meal plan"))?;
    Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFoodRequest {
    profile: Option<UserProfile>,
    food_name: Option<String>,
    food_image: Option<FoodImage>,
}

pub async fn check_food(
    State(state): State<AppState>,
    payload: Result<Json<CheckFoodRequest>, JsonRejection>,
) -> ApiResult<Json<FoodCheckResult>> {
    const MISSING: &str = "Profile and either food name or image are required";

    let Json(request) = payload?;
    let profile = validated_profile(request.profile, MISSING)?;
    let food_name = request
        .food_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if food_name.is_none() && request.food_image.is_none() {
        return Err(ApiError::bad_request(MISSING));
    }

    let result = state
        .assistant
        .check_food(&profile, food_name.as_deref(), request.food_image)
        .await
        .map_err(ApiError::context("Failed to check food safety"))?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTriggersRequest {
    profile: Option<UserProfile>,
    symptoms: Option<Vec<SymptomLog>>,
}

pub async fn analyze_triggers(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTriggersRequest>, JsonRejection>,
) -> ApiResult<Json<String>> {
    const MISSING: &str = "Profile and symptoms are required";

    let Json(request) = payload?;
    let profile = validated_profile(request.profile, MISSING)?;
    let symptoms = request
        .symptoms
        .ok_or_else(|| ApiError::bad_request(MISSING))?;

    let analysis = state
        .assistant
        .analyze_triggers(&profile, &symptoms)
        .await
        .map_err(ApiError::context("Failed to analyze triggers"))?;
    Ok(Json(analysis))
}

#[derive(Debug, Deserialize)]
pub struct SuggestRecipeRequest {
    profile: Option<UserProfile>,
    request: Option<String>,
}

pub async fn suggest_recipe(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRecipeRequest>, JsonRejection>,
) -> ApiResult<Json<Recipe>> {
    const MISSING: &str = "Profile and request are required";

    let Json(body) = payload?;
    let profile = validated_profile(body.profile, MISSING)?;
    let request = body
        .request
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING))?;

    let recipe = state
        .assistant
        .suggest_recipe(&profile, &request)
        .await
        .map_err(ApiError::context("Failed to suggest recipe"))?;
    Ok(Json(recipe))
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    category: Option<String>,
}

pub async fn list_recipes(
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let Query(query) = query?;
    // `?category=` with no value means no filter.
    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(label) => Some(RecipeCategory::from_label(label).ok_or_else(|| {
            ApiError::bad_request(format!("Unknown recipe category: {label}"))
        })?),
    };
    let recipes = recipes::by_category(category);
    debug!(count = recipes.len(), "Listing recipes");
    Ok(Json(recipes))
}

pub async fn user_report(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<HealthReport>> {
    let email = normalize_email(Some(email), "Email is required")?;

    let record = state
        .with_storage(move |storage| storage.get_user(&email))
        .await
        .map_err(ApiError::context(INTERNAL_ERROR))?
        .ok_or_else(ApiError::not_found)?;

    let report = HealthReport::from_symptoms(&record.symptoms);
    info!(logs = report.total_logs, "Built health report");
    Ok(Json(report))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.assistant.model_name(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::assistant::testing::ScriptedModel;
    use crate::assistant::{Assistant, NOT_ENOUGH_DATA_MESSAGE};
    use crate::server::router;
    use crate::storage::Storage;

    const LIMIT: usize = 10 * 1024 * 1024;

    fn profile_json() -> Value {
        json!({
            "condition": "Viêm loét dạ dày",
            "painLevel": 4,
            "triggerFoods": "ớt, cà phê",
            "dietaryGoal": "Giảm đau"
        })
    }

    fn symptom_json(id: &str, pain: u8) -> Value {
        json!({
            "id": id,
            "painLevel": pain,
            "painLocation": "Thượng vị",
            "eatenFoods": "Phở",
            "physicalActivity": "",
            "timestamp": "2024-05-01T08:00:00Z"
        })
    }

    /// A server on an ephemeral port, backed by a temporary store.
    struct TestServer {
        _dir: TempDir,
        base: String,
        client: reqwest::Client,
    }

    impl TestServer {
        async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
            let response = self
                .client
                .post(format!("{}{path}", self.base))
                .json(&body)
                .send()
                .await
                .unwrap();
            (response.status(), response.json().await.unwrap())
        }

        async fn post_raw(&self, path: &str, body: &'static str) -> (StatusCode, Value) {
            let response = self
                .client
                .post(format!("{}{path}", self.base))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .unwrap();
            (response.status(), response.json().await.unwrap())
        }

        async fn get(&self, path: &str) -> (StatusCode, Value) {
            let response = self
                .client
                .get(format!("{}{path}", self.base))
                .send()
                .await
                .unwrap();
            (response.status(), response.json().await.unwrap())
        }
    }

    async fn spawn_app(model: Arc<ScriptedModel>) -> TestServer {
        crate::logging::init_test_logging();
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("db.json")).unwrap();
        let state = AppState::new(storage, Assistant::new(model, "Vietnamese"));
        let app = router(state, LIMIT);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            _dir: dir,
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    #[tokio::test]
    async fn test_login_creates_user_once() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.post("/api/login", json!({ "email": " a@example.com " })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "email": "a@example.com", "userProfile": null, "symptoms": [] })
        );

        app.post(
            "/api/profile",
            json!({ "email": "a@example.com", "profile": profile_json() }),
        )
        .await;

        let (status, body) = app.post("/api/login", json!({ "email": "a@example.com" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userProfile"]["painLevel"], 4);
    }

    #[tokio::test]
    async fn test_login_requires_valid_email() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.post("/api/login", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email is required");

        let (status, body) = app.post("/api/login", json!({ "email": "not-an-email" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid email address");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.post_raw("/api/login", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_save_profile_unknown_user() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.post(
            "/api/profile",
            json!({ "email": "ghost@example.com", "profile": profile_json() }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn test_save_profile_overwrites() {
        let app = spawn_app(ScriptedModel::replying([])).await;
        app.post("/api/login", json!({ "email": "a@example.com" })).await;

        let mut profile = profile_json();
        let (status, body) = app.post(
            "/api/profile",
            json!({ "email": "a@example.com", "profile": profile }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["condition"], "Viêm loét dạ dày");

        profile = profile_json();
        profile["painLevel"] = json!(1);
        let (status, body) = app.post(
            "/api/profile",
            json!({ "email": "a@example.com", "profile": profile }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["painLevel"], 1);
    }

    #[tokio::test]
    async fn test_save_profile_rejects_pain_out_of_range() {
        let app = spawn_app(ScriptedModel::replying([])).await;
        app.post("/api/login", json!({ "email": "a@example.com" })).await;

        let mut profile = profile_json();
        profile["painLevel"] = json!(11);
        let (status, body) = app.post(
            "/api/profile",
            json!({ "email": "a@example.com", "profile": profile }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("painLevel"));
    }

    #[tokio::test]
    async fn test_add_symptom_appends_and_dedups() {
        let app = spawn_app(ScriptedModel::replying([])).await;
        app.post("/api/login", json!({ "email": "a@example.com" })).await;

        let (status, body) = app.post(
            "/api/symptoms",
            json!({ "email": "a@example.com", "symptom": symptom_json("s1", 5) }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = app.post(
            "/api/symptoms",
            json!({ "email": "a@example.com", "symptom": symptom_json("s1", 5) }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = app.post(
            "/api/symptoms",
            json!({ "email": "a@example.com", "symptom": symptom_json("s2", 0) }),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_symptom_errors() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, _) = app.post(
            "/api/symptoms",
            json!({ "email": "ghost@example.com", "symptom": symptom_json("s1", 5) }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) =
            app.post("/api/symptoms", json!({ "email": "a@example.com" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email and symptom are required");
    }

    #[tokio::test]
    async fn test_meal_plan_requires_profile() {
        let model = ScriptedModel::replying([]);
        let app = spawn_app(model.clone()).await;

        let (status, body) = app.post("/api/gemini/meal-plan", json!({ "symptoms": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User profile is required");
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_meal_plan_returns_plan() {
        let app = spawn_app(ScriptedModel::replying([
            r#"[{"day":"Ngày 1","meals":[{"name":"Cháo","time":"7:00 AM","portion":"1 bát","note":"Dễ tiêu"}]}]"#,
        ])).await;

        let (status, body) = app.post(
            "/api/gemini/meal-plan",
            json!({ "profile": profile_json() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["meals"][0]["name"], "Cháo");
    }

    #[tokio::test]
    async fn test_meal_plan_null_symptoms_is_empty_history() {
        let model = ScriptedModel::replying([r#"[{"day":"Ngày 1","meals":[]}]"#]);
        let app = spawn_app(model.clone()).await;

        let (status, body) = app.post(
            "/api/gemini/meal-plan",
            json!({ "profile": profile_json(), "symptoms": null }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["day"], "Ngày 1");
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_check_food_requires_name_or_image() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.post(
            "/api/gemini/check-food",
            json!({ "profile": profile_json(), "foodName": "" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Profile and either food name or image are required"
        );
    }

    #[tokio::test]
    async fn test_check_food_with_image() {
        let model = ScriptedModel::replying([r#"{"safetyLevel":"Tránh","reason":"Cay"}"#]);
        let app = spawn_app(model.clone()).await;

        let (status, body) = app.post(
            "/api/gemini/check-food",
            json!({
                "profile": profile_json(),
                "foodImage": { "mimeType": "image/jpeg", "data": "/9j/" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["safetyLevel"], "Tránh");
        assert!(model.requests()[0].image.is_some());
    }

    #[tokio::test]
    async fn test_analyze_triggers_with_few_logs() {
        let model = ScriptedModel::replying([]);
        let app = spawn_app(model.clone()).await;

        let (status, body) = app.post(
            "/api/gemini/analyze-triggers",
            json!({ "profile": profile_json(), "symptoms": [symptom_json("s1", 3)] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(NOT_ENOUGH_DATA_MESSAGE));
        assert!(model.requests().is_empty());

        let (status, _) = app.post(
            "/api/gemini/analyze-triggers",
            json!({ "profile": profile_json() }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suggest_recipe_sets_ai_category() {
        let app = spawn_app(ScriptedModel::replying([r#"{
            "title": "Súp bí đỏ",
            "description": "Mềm",
            "cookTime": "30 phút",
            "ingredients": ["Bí đỏ"],
            "instructions": "Nấu nhừ."
        }"#])).await;

        let (status, body) = app.post(
            "/api/gemini/suggest-recipe",
            json!({ "profile": profile_json(), "request": "món súp" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "AI Tùy chỉnh");
        assert_eq!(body["cookTime"], "30 phút");
    }

    #[tokio::test]
    async fn test_malformed_model_output_is_internal_error() {
        let app = spawn_app(ScriptedModel::replying(["this is not json"])).await;

        let (status, body) = app.post(
            "/api/gemini/suggest-recipe",
            json!({ "profile": profile_json(), "request": "món súp" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to suggest recipe" }));
    }

    #[tokio::test]
    async fn test_list_recipes() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.get("/api/recipes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);

        let (status, body) = app.get("/api/recipes?category=Ph%E1%BB%A5c%20h%E1%BB%93i").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = app.get("/api/recipes?category=unknown").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown recipe category: unknown");
    }

    #[tokio::test]
    async fn test_list_recipes_empty_category_is_unfiltered() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.get("/api/recipes?category=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);

        let (status, body) = app.get("/api/recipes?category=%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_user_report() {
        let app = spawn_app(ScriptedModel::replying([])).await;
        app.post("/api/login", json!({ "email": "a@example.com" })).await;
        for (id, pain) in [("s1", 2), ("s2", 5)] {
            app.post(
                "/api/symptoms",
                json!({ "email": "a@example.com", "symptom": symptom_json(id, pain) }),
            )
            .await;
        }

        let (status, body) = app.get("/api/users/a@example.com/report").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalLogs"], 2);
        assert_eq!(body["averagePain"], 3.5);

        let (status, body) = app.get("/api/users/ghost@example.com/report").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = spawn_app(ScriptedModel::replying([])).await;

        let (status, body) = app.get("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "model": "scripted" }));
    }
}
