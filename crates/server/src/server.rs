use axum::{
    Json, Router,
    extract::{
        Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use std::{net::SocketAddr, sync::Arc};

use crate::{ServerError, groups, members, settlement, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Logs every request with its outcome and latency.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis();
    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), latency_ms, "request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), latency_ms, "request");
    }
    response
}

/// Unwraps a JSON body, reporting malformed payloads as 400.
pub(crate) fn json_body<T: DeserializeOwned>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ServerError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

/// Unwraps path parameters, reporting malformed ids as 400.
pub(crate) fn path_params<T: DeserializeOwned + Send>(
    params: Result<Path<T>, PathRejection>,
) -> Result<T, ServerError> {
    params
        .map(|Path(value)| value)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", get(groups::list).post(groups::create))
        .route(
            "/groups/{group_id}",
            get(groups::get).delete(groups::delete),
        )
        .route(
            "/groups/{group_id}/members",
            get(members::list).post(members::add),
        )
        .route(
            "/groups/{group_id}/members/{member_id}",
            axum::routing::delete(members::remove),
        )
        .route(
            "/groups/{group_id}/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/groups/{group_id}/transactions/{transaction_id}",
            get(transactions::get_detail),
        )
        .route(
            "/groups/{group_id}/settle/{member_id}",
            post(settlement::settle),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
