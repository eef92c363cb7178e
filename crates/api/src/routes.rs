use crate::error::WebError;
use crate::state::AppState;
use crate::views::{self, FormValues};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Form, Json, Router,
};
use chrono::Utc;
use futbot_brokers_crypto::{place_order, FuturesApi};
use futbot_core::{field_text, validate_order, validate_symbol, AccountSummary, RawOrderInput};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Orders shown on the dashboard.
const DASHBOARD_ORDERS: usize = 20;

pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard))
        .route("/order", get(order_form).post(submit_order))
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/price/{symbol}", get(symbol_price))
        .route("/account", get(account))
        .route("/orders", get(order_history))
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

async fn fetch_account(state: &AppState) -> Result<AccountSummary, WebError> {
    let client = state.client()?;
    let raw = client.account_info().await?;
    Ok(AccountSummary::from_account(&raw))
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let (account, error) = match fetch_account(&state).await {
        Ok(summary) => (Some(summary), None),
        Err(err) => {
            error!(error = %err, "Dashboard account fetch failed");
            (None, Some(err.to_string()))
        }
    };
    let orders = state.recent_orders(DASHBOARD_ORDERS).await;
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    Html(views::dashboard(
        account.as_ref(),
        error.as_deref(),
        &orders,
        &now,
    ))
}

async fn order_form() -> Html<String> {
    Html(views::order_form(&FormValues::default(), None))
}

async fn submit_order(
    State(state): State<Arc<AppState>>,
    Form(raw): Form<RawOrderInput>,
) -> impl IntoResponse {
    let rerender = |message: String| {
        let values = FormValues {
            symbol: &raw.symbol,
            side: &raw.side,
            order_type: &raw.order_type,
            quantity: &raw.quantity,
            price: raw.price.as_deref().unwrap_or_default(),
            stop_price: raw.stop_price.as_deref().unwrap_or_default(),
            time_in_force: raw.time_in_force.as_deref().unwrap_or_default(),
        };
        (
            StatusCode::BAD_REQUEST,
            Html(views::order_form(&values, Some(&message))),
        )
    };

    let order = match validate_order(&raw) {
        Ok(order) => order,
        Err(errors) => {
            info!(error = %errors, "Order form rejected");
            return rerender(errors.to_string());
        }
    };

    let placed = async {
        let client = state.client()?;
        let response = place_order(&client, &order).await?;
        Ok::<_, WebError>(response)
    }
    .await;

    match placed {
        Ok(response) => {
            let record = state.record_order(&response, order.order_type()).await;
            info!(order_id = %record.order_id, status = %record.status, "Order recorded");
            (
                StatusCode::OK,
                Html(views::order_result(&response, order.order_type())),
            )
        }
        Err(err) => {
            error!(error = %err, "Order placement failed");
            rerender(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn symbol_price(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, WebError> {
    let symbol = validate_symbol(&symbol)?;
    let client = state.client()?;
    let data = client.symbol_price(&symbol).await?;
    Ok(Json(json!({
        "symbol": field_text(&data, "symbol").unwrap_or(symbol),
        "price": data.get("price").cloned().unwrap_or_default(),
    })))
}

async fn account(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, WebError> {
    Ok(Json(fetch_account(&state).await?))
}

async fn order_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent_orders(usize::MAX).await)
}
