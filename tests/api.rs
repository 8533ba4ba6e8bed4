// =============================================================================
// HTTP API integration tests — router driven with tower's `oneshot`
// =============================================================================

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use finance_wars::api::rest::router;
use finance_wars::app_state::AppState;
use finance_wars::market_data::PricePoint;
use finance_wars::portfolio::STARTING_CASH;
use finance_wars::runtime_config::RuntimeConfig;
use finance_wars::simulator::PriceSimulator;

fn test_state() -> Arc<AppState> {
    let config = RuntimeConfig {
        rng_seed: Some(2024),
        ..RuntimeConfig::default()
    };
    Arc::new(AppState::new(config, None).unwrap())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

// =============================================================================
// Historical series
// =============================================================================

#[tokio::test]
async fn real_stock_analysis_serves_sixty_points_ending_at_reference_price() {
    let state = test_state();
    let (status, body) = get(router(state), "/api/real-stock-analysis/TCS").await;

    assert_eq!(status, StatusCode::OK);
    let series: Vec<PricePoint> = serde_json::from_value(body).unwrap();
    assert_eq!(series.len(), 60);
    assert_eq!(series.last().map(|p| p.close), Some(3_800.0));
    for w in series.windows(2) {
        assert!(w[1].timestamp > w[0].timestamp);
    }
    assert!(series.iter().all(PricePoint::is_consistent));
}

#[tokio::test]
async fn real_stock_analysis_is_stable_between_calls() {
    let state = test_state();
    let (_, first) = get(router(state.clone()), "/api/real-stock-analysis/INFY").await;
    let (_, second) = get(router(state), "/api/real-stock-analysis/INFY").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_symbol_returns_500_with_message() {
    let (status, body) = get(router(test_state()), "/api/real-stock-analysis/AAPL").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch stock data");
    assert!(body["message"].as_str().unwrap().contains("AAPL"));
}

#[tokio::test]
async fn analysis_reports_snapshot_stats_and_indicators() {
    let (status, body) = get(router(test_state()), "/api/analysis/RELIANCE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "RELIANCE");
    assert!(body["snapshot"]["rsi"].is_number());
    assert!(body["snapshot"]["moving_averages"]["ma50"].is_number());
    assert_eq!(body["stats"]["last_price"], 2_900.0);
    assert!(body["indicators"]["bollinger"]["upper"].is_number());
    assert!(body["advice"].is_string());

    let (status, _) = get(router(test_state()), "/api/analysis/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Quiz & mentor
// =============================================================================

#[tokio::test]
async fn generate_quiz_sizes_per_level() {
    let state = test_state();
    for (level, expected) in [("beginner", 5), ("intermediate", 3), ("advanced", 3), ("guru", 0)] {
        let (status, body) = post(router(state.clone()), "/generate-quiz", json!({ "level": level })).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body.as_array().unwrap();
        assert_eq!(questions.len(), expected, "level {level}");
        for q in questions {
            assert_eq!(q["options"].as_array().unwrap().len(), 4);
            assert!(q["correct"].as_u64().unwrap() < 4);
        }
    }
}

#[tokio::test]
async fn mentor_chat_without_key_returns_fallback() {
    let body = json!({
        "message": "Should I buy more?",
        "context": { "learningMode": "beginner", "pnl": -500, "stock": "Infosys" }
    });
    let (status, body) = post(router(test_state()), "/mentor-chat", body).await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("Learning Mode: beginner"));
    assert!(reply.contains("₹-500"));
    assert!(reply.contains("Stock: Infosys"));
}

#[tokio::test]
async fn local_mentor_needs_a_selection() {
    let state = test_state();
    let (_, body) = post(router(state.clone()), "/api/mentor/local", json!({ "message": "buy?" })).await;
    assert_eq!(body["reply"], "Select a stock first so I can guide you better.");

    post(router(state.clone()), "/api/live/select", json!({ "symbol": "TCS" })).await;
    let (_, body) = post(router(state), "/api/mentor/local", json!({ "message": "Should I BUY?" })).await;
    assert_eq!(
        body["reply"],
        "Price looks stable. Consider buying only if volume supports it."
    );
}

// =============================================================================
// Catalog & live market
// =============================================================================

#[tokio::test]
async fn stocks_filter_by_search_and_sector() {
    let state = test_state();
    let (_, body) = get(router(state.clone()), "/api/stocks").await;
    assert_eq!(body["stocks"].as_array().unwrap().len(), 56);
    assert_eq!(body["sectors"].as_array().unwrap().len(), 9);

    let (_, body) = get(router(state.clone()), "/api/stocks?search=bank&sector=Banking").await;
    let stocks = body["stocks"].as_array().unwrap();
    assert!(!stocks.is_empty());
    assert!(stocks.iter().all(|s| s["sector"] == "Banking"));

    let (_, body) = get(router(state), "/api/stocks?sector=IT").await;
    assert!(body["stocks"].as_array().unwrap().iter().all(|s| s["sector"] == "IT"));
}

#[tokio::test]
async fn select_then_tick_records_live_candles() {
    let state = test_state();

    let (status, body) = post(router(state.clone()), "/api/live/select", json!({ "symbol": "WIPRO" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], true);

    {
        let mut sim = PriceSimulator::seeded(5);
        let mut live = state.live.write();
        for t in 0..25 {
            live.on_tick(&mut sim, 1_700_000_000 + t);
        }
    }

    let (status, body) = get(router(state.clone()), "/api/live/WIPRO").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["live"]["candles"].as_array().unwrap().len(), 25);
    assert!(body["snapshot"]["rsi"].is_number());

    let (status, body) = post(router(state.clone()), "/api/live/deselect", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["selected"].is_null());
    assert!(state.live.read().selected().is_none());
}

#[tokio::test]
async fn selecting_unknown_symbol_is_rejected() {
    let (status, body) = post(router(test_state()), "/api/live/select", json!({ "symbol": "AAPL" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("AAPL"));

    let (status, _) = get(router(test_state()), "/api/live/AAPL").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Portfolio
// =============================================================================

#[tokio::test]
async fn buy_and_sell_round_trip_at_live_quote() {
    let state = test_state();

    let (status, body) = post(router(state.clone()), "/api/portfolio/buy", json!({ "symbol": "ITC" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["holding"]["quantity"], 1);
    assert_eq!(body["holding"]["buy_price"], 450.0);
    assert_eq!(body["valuation"]["wallet"], STARTING_CASH - 450.0);

    let (status, body) = post(router(state.clone()), "/api/portfolio/sell", json!({ "symbol": "ITC" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["receipt"]["realized_pnl"], 0.0);
    assert_eq!(body["valuation"]["wallet"], STARTING_CASH);

    let (_, body) = get(router(state), "/api/portfolio?mode=advanced").await;
    assert_eq!(body["league"], "Rookie Trader");
    assert!(body["portfolio"]["holdings"].as_array().unwrap().is_empty());
    assert!(body["advice"].is_null());
}

#[tokio::test]
async fn portfolio_rejects_bad_trades() {
    let state = test_state();

    let (status, _) = post(router(state.clone()), "/api/portfolio/sell", json!({ "symbol": "TCS" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(router(state.clone()), "/api/portfolio/buy", json!({ "symbol": "AAPL" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Three Shree Cement shares exceed the starting wallet.
    for _ in 0..3 {
        post(router(state.clone()), "/api/portfolio/buy", json!({ "symbol": "SHREECEM" })).await;
    }
    let (status, body) = post(router(state.clone()), "/api/portfolio/buy", json!({ "symbol": "SHREECEM" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("insufficient funds"));
    assert_eq!(state.portfolio.read().holding("SHREECEM").unwrap().quantity, 3);
}

#[tokio::test]
async fn health_reports_ok() {
    let state = test_state();
    post(router(state.clone()), "/api/live/select", json!({ "symbol": "LT" })).await;
    let (status, body) = get(router(state), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["state_version"], 1);
}
