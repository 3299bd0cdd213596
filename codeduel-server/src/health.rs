use axum::{extract::State, Json};
use log::warn;
use serde::Serialize;
use utoipa::ToSchema;

use crate::context::ServerContext;

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    backend: &'static str,
    database: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, body = Health)
    )
)]
pub async fn health(State(context): State<ServerContext>) -> Json<Health> {
    let database = match context.platform.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!("Store is unreachable: {}", e);
            "unavailable"
        }
    };

    Json(Health {
        backend: "running",
        database,
    })
}
