use crate::chemistry::elements::{Element, ElementCategory};
use crate::chemistry::lessons::Lesson;
use crate::chemistry::reactions::Reaction;
use crate::resolver::Resolution;
use crate::server::AppState;
use crate::server::error::{AI_FAILURE_MESSAGE, ApiError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct ElementQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LessonQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindReactionRequest {
    #[serde(default)]
    pub reactants: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

pub async fn list_elements(
    State(state): State<AppState>,
    Query(query): Query<ElementQuery>,
) -> Result<Json<Vec<Element>>, ApiError> {
    let elements = match query.category.as_deref().map(str::trim) {
        None | Some("") => state.store.elements.get_all().to_vec(),
        Some(category) => {
            let category = category
                .parse::<ElementCategory>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            state
                .store
                .elements
                .by_category(category)
                .into_iter()
                .cloned()
                .collect()
        }
    };
    Ok(Json(elements))
}

pub async fn get_element(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Element>, ApiError> {
    state
        .store
        .elements
        .get_by_symbol(&symbol)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Element not found".to_string()))
}

pub async fn explain_element(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ExplanationResponse>, ApiError> {
    let element = state
        .store
        .elements
        .get_by_symbol(&symbol)
        .ok_or_else(|| ApiError::NotFound("Element not found".to_string()))?;

    let explanation = match state.gateway.explain_element(element).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Falling back to the static explanation of {}: {}", element.symbol, e);
            fallback_explanation(element)
        }
    };
    Ok(Json(ExplanationResponse { explanation }))
}

/// shown when no model could explain the element
pub fn fallback_explanation(element: &Element) -> String {
    format!(
        "{} ({}) is an important chemical element with atomic number {}. The AI explanation \
         service is temporarily unavailable, please try again in a few minutes for a detailed \
         explanation.",
        element.name, element.symbol, element.atomic_number
    )
}

pub async fn list_reactions(State(state): State<AppState>) -> Json<Vec<Reaction>> {
    Json(state.store.reactions.all().to_vec())
}

pub async fn find_reaction(
    State(state): State<AppState>,
    body: Result<Json<FindReactionRequest>, JsonRejection>,
) -> Result<Json<Resolution>, ApiError> {
    let Json(request) = body?;
    let reactants = request
        .reactants
        .filter(|reactants| !reactants.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Invalid reactants".to_string()))?;
    if reactants.iter().any(|symbol| symbol.trim().is_empty()) {
        return Err(ApiError::BadRequest("Invalid reactants".to_string()));
    }

    let resolution = state.resolver.resolve(reactants.as_slice()).await?;
    Ok(Json(resolution))
}

fn required_question(body: Result<Json<QuestionRequest>, JsonRejection>) -> Result<String, ApiError> {
    let Json(request) = body?;
    request
        .question
        .filter(|question| !question.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Question is required".to_string()))
}

async fn answer(state: &AppState, question: &str) -> Result<String, ApiError> {
    state.gateway.assistant_chat(question).await.map_err(|e| {
        error!("Assistant chat failed: {}", e);
        ApiError::Internal(AI_FAILURE_MESSAGE.to_string())
    })
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = required_question(body)?;
    let response = answer(&state, &question).await?;
    Ok(Json(ChatResponse { response }))
}

pub async fn ai_assistant(
    State(state): State<AppState>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AssistantResponse>, ApiError> {
    let question = required_question(body)?;
    let response = answer(&state, &question).await?;
    Ok(Json(AssistantResponse {
        response,
        kind: "text",
    }))
}

pub async fn list_lessons(
    State(state): State<AppState>,
    Query(query): Query<LessonQuery>,
) -> Json<Vec<Lesson>> {
    let lessons = state
        .store
        .lessons
        .search(query.search.as_deref(), query.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Json(lessons)
}

pub async fn lesson_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .store
            .lessons
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lesson>, ApiError> {
    id.trim()
        .parse::<u32>()
        .ok()
        .and_then(|id| state.store.lessons.get(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "aiConfigured": state.gateway.is_configured(),
        "models": state.gateway.policy().models,
    }))
}
