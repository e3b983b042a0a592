//! HTML front-end: `GET /` serves the search form, `POST /result` the label summary.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::error;

use crate::entities::drug;
use crate::error::DrugInfoError;
use crate::render::html;
use crate::sources::openfda::OpenFdaClient;

#[derive(Clone)]
pub(crate) struct AppState {
    client: OpenFdaClient,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DrugForm {
    #[serde(default)]
    drug: String,
}

pub(crate) fn router(client: OpenFdaClient) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/result", post(result))
        .fallback(not_found)
        .with_state(AppState { client })
}

async fn index() -> Response {
    page(StatusCode::OK, html::index_page())
}

async fn result(State(state): State<AppState>, Form(form): Form<DrugForm>) -> Response {
    match drug::get(&state.client, &form.drug).await {
        Ok(info) => page(StatusCode::OK, html::result_page(&info)),
        Err(err) => internal_error(&err),
    }
}

async fn not_found() -> Response {
    page(StatusCode::NOT_FOUND, html::error_page("Page not found."))
}

fn page(status: StatusCode, rendered: Result<String, DrugInfoError>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => internal_error(&err),
    }
}

fn internal_error(err: &DrugInfoError) -> Response {
    error!("Request failed: {err}");
    let body = html::error_page("The drug information page could not be produced.")
        .unwrap_or_else(|_| "Internal server error".to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down…");
    }
}

/// Serves the front-end on `host:port` until Ctrl-C.
///
/// # Errors
///
/// Returns an error when the address is invalid, the HTTP client or
/// templates cannot be initialized, or the listener fails.
pub async fn run_http(host: &str, port: u16) -> anyhow::Result<()> {
    let ip: std::net::IpAddr = host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid host address: {e}"))?;
    let bind = std::net::SocketAddr::new(ip, port);

    let client = OpenFdaClient::new()?;
    crate::render::env()?;

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP server: {e}"))?;
    tracing::info!("druginfo listening on http://{bind}");

    axum::serve(listener, router(client))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
