//! Axum app: state, router, and request handlers.
//!
//! Three routes share one [`AppState`]: the form page, the form submission
//! (HTML result), and the JSON API (typed result). Each submission assembles
//! a fresh chain from the shared model client and prompts.

use std::sync::Arc;

use atelier::{
    Campaign, Chain, ChainError, ChainPrompts, GeminiClient, MarketContext, ModelClient, RawBrief,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::json;
use tracing::{error, info};

use super::pages;

/// Shared state: one model client plus the step prompts.
#[derive(Clone)]
pub struct AppState {
    model: Arc<dyn ModelClient>,
    prompts: ChainPrompts,
}

impl AppState {
    pub fn new(model: Arc<dyn ModelClient>, prompts: ChainPrompts) -> Self {
        Self { model, prompts }
    }

    /// Builds the Gemini client from the environment and loads prompts from
    /// `PROMPTS_DIR` (embedded defaults otherwise).
    pub fn from_env() -> Result<Self, ChainError> {
        let model = Arc::new(GeminiClient::from_env()?);
        Ok(Self::new(model, atelier::prompts::load_or_default(None)))
    }

    fn chain(&self) -> Chain {
        Chain::new(Arc::clone(&self.model), self.prompts.clone())
    }
}

/// Routes: the form page, the form submission, and the JSON API.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate_form))
        .route("/api/generate", post(generate_api))
        .with_state(state)
}

/// `GET /`: the brief form with the current market context line.
async fn index() -> Html<String> {
    Html(pages::form_page(&MarketContext::now(), None))
}

/// `POST /generate`: runs the chain over the submitted form and renders the
/// result; failures re-render the form with an error banner.
async fn generate_form(
    State(state): State<Arc<AppState>>,
    Form(raw): Form<RawBrief>,
) -> Html<String> {
    info!(product = %raw.product, "form submission");
    let ctx = MarketContext::now();
    match state.chain().run(raw, &ctx, None).await {
        Ok(campaign) => Html(pages::result_page(&campaign)),
        Err(e) => {
            error!(error = %e, "chain run failed");
            Html(pages::form_page(&ctx, Some(&banner_message(&e))))
        }
    }
}

/// `POST /api/generate`: the same chain behind a JSON API. Returns the full
/// campaign (brief, insights, angles, ideas, markdown) on success.
async fn generate_api(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawBrief>,
) -> Result<Json<Campaign>, (StatusCode, Json<serde_json::Value>)> {
    let ctx = MarketContext::now();
    match state.chain().run(raw, &ctx, None).await {
        Ok(campaign) => Ok(Json(campaign)),
        Err(e) => {
            error!(error = %e, "chain run failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

/// Error text shown in the form's banner.
fn banner_message(e: &ChainError) -> String {
    match e {
        ChainError::NoIdeas => "The model returned no ideas. Please try again.".to_string(),
        other => format!("Generation failed: {other}"),
    }
}
