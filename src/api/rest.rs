// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// The game client calls `/api/real-stock-analysis/:symbol`, `/mentor-chat`
// and `/generate-quiz` at the top level. Everything else lives under
// `/api/`.
//
// CORS is permissive; the game client is served from a different origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::advice::{mentor_reply, pnl_advice, technical_advice};
use crate::analysis::{history_stats, indicator_panel, technical_snapshot};
use crate::app_state::AppState;
use crate::catalog::{self, ALL_SECTORS};
use crate::market_data::closes;
use crate::mentor::MentorContext;
use crate::quiz::questions_for_level;
use crate::types::LearningMode;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Game client routes ──────────────────────────────────────
        .route("/api/real-stock-analysis/:symbol", get(real_stock_analysis))
        .route("/mentor-chat", post(mentor_chat))
        .route("/generate-quiz", post(generate_quiz))
        // ── Server ──────────────────────────────────────────────────
        .route("/api/health", get(health))
        .route("/api/stocks", get(stocks))
        .route("/api/analysis/:symbol", get(analysis))
        .route("/api/live/select", post(live_select))
        .route("/api/live/deselect", post(live_deselect))
        .route("/api/live/:symbol", get(live_symbol))
        .route("/api/portfolio", get(portfolio))
        .route("/api/portfolio/buy", post(portfolio_buy))
        .route("/api/portfolio/sell", post(portfolio_sell))
        .route("/api/mentor/local", post(mentor_local))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
    uptime_secs: u64,
    live_ticks: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.uptime_secs(),
        live_ticks: state.live.read().ticks(),
    };
    Json(resp)
}

// =============================================================================
// Historical series
// =============================================================================

async fn real_stock_analysis(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    match state.history(&symbol) {
        Some(series) => {
            info!(symbol = %symbol, points = series.len(), "historical series served");
            Json(series.clone()).into_response()
        }
        None => {
            warn!(symbol = %symbol, "no historical series for symbol");
            let body = json!({
                "error": "Failed to fetch stock data",
                "message": format!(
                    "Stock {symbol} not available. Try: HDFCBANK, TCS, RELIANCE, INFY"
                ),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let series = state
        .history(&symbol)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown symbol: {symbol}")))?;

    let closes = closes(series);
    let snapshot = technical_snapshot(&closes);

    Ok(Json(json!({
        "symbol": symbol,
        "snapshot": snapshot,
        "stats": history_stats(series),
        "indicators": indicator_panel(&closes),
        "advice": technical_advice(&snapshot),
    })))
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Deserialize)]
struct StockQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    sector: Option<String>,
}

#[derive(Serialize)]
struct StockQuote {
    symbol: String,
    name: String,
    sector: String,
    price: f64,
}

async fn stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockQuery>,
) -> impl IntoResponse {
    let sector = query.sector.as_deref().unwrap_or(ALL_SECTORS);
    let live = state.live.read();

    let stocks: Vec<StockQuote> = catalog::filter(&state.stocks, &query.search, sector)
        .into_iter()
        .map(|s| StockQuote {
            symbol: s.symbol.clone(),
            name: s.name.clone(),
            sector: s.sector.clone(),
            price: live.quote(&s.symbol).unwrap_or(s.price),
        })
        .collect();

    Json(json!({
        "sectors": catalog::sectors(&state.stocks),
        "stocks": stocks,
    }))
}

// =============================================================================
// Live market
// =============================================================================

#[derive(Deserialize)]
struct SymbolRequest {
    symbol: String,
}

async fn live_select(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SymbolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = {
        let mut live = state.live.write();
        live.select(&req.symbol)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
        live.view(&req.symbol)
    };
    state.increment_version();
    Ok(Json(view))
}

async fn live_deselect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.live.write().deselect();
    state.increment_version();
    Json(json!({ "selected": null }))
}

async fn live_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (view, closes) = {
        let live = state.live.read();
        if live.quote(&symbol).is_none() {
            return Err(api_error(
                StatusCode::NOT_FOUND,
                format!("unknown symbol: {symbol}"),
            ));
        }
        (live.view(&symbol), live.closes(&symbol))
    };
    let snapshot = technical_snapshot(&closes);

    Ok(Json(json!({
        "live": view,
        "snapshot": snapshot,
        "advice": technical_advice(&snapshot),
    })))
}

// =============================================================================
// Portfolio
// =============================================================================

#[derive(Deserialize)]
struct ModeQuery {
    #[serde(default)]
    mode: LearningMode,
}

async fn portfolio(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> impl IntoResponse {
    let valuation = state.valuation();
    let portfolio = state.portfolio.read().clone();

    Json(json!({
        "portfolio": portfolio,
        "valuation": valuation,
        "league": valuation.league.to_string(),
        "advice": pnl_advice(valuation.overall_pnl, query.mode),
    }))
}

async fn portfolio_buy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SymbolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stock = state
        .stock(&req.symbol)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown symbol: {}", req.symbol)))?;
    let price = state.quote(&stock.symbol).unwrap_or(stock.price);

    let holding = state
        .portfolio
        .write()
        .buy(&stock.symbol, &stock.name, price)
        .cloned()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    state.increment_version();

    Ok(Json(json!({
        "holding": holding,
        "valuation": state.valuation(),
    })))
}

async fn portfolio_sell(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SymbolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stock = state
        .stock(&req.symbol)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown symbol: {}", req.symbol)))?;
    let price = state.quote(&stock.symbol).unwrap_or(stock.price);

    let receipt = state
        .portfolio
        .write()
        .sell(&stock.symbol, price)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    state.increment_version();

    Ok(Json(json!({
        "receipt": receipt,
        "valuation": state.valuation(),
    })))
}

// =============================================================================
// Mentor
// =============================================================================

#[derive(Deserialize)]
struct MentorChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    context: MentorContext,
}

async fn mentor_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MentorChatRequest>,
) -> impl IntoResponse {
    let reply = state.mentor.reply(&req.message, &req.context).await;
    Json(json!({ "reply": reply }))
}

#[derive(Deserialize)]
struct LocalMentorRequest {
    #[serde(default)]
    message: String,
    #[serde(default, alias = "learningMode")]
    learning_mode: LearningMode,
}

/// Keyword mentor driven by the server's own selection and portfolio.
async fn mentor_local(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocalMentorRequest>,
) -> impl IntoResponse {
    let selected = state.selected_stock_name();
    let pnl = state.valuation().overall_pnl;
    let reply = mentor_reply(&req.message, selected.as_deref(), pnl, req.learning_mode);
    Json(json!({ "reply": reply }))
}

// =============================================================================
// Quiz
// =============================================================================

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    level: String,
}

async fn generate_quiz(Json(req): Json<QuizRequest>) -> impl IntoResponse {
    let questions = questions_for_level(&req.level);
    if questions.is_empty() {
        warn!(level = %req.level, "quiz requested for unknown level");
    }
    Json(questions)
}
