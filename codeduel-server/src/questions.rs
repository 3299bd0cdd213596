use axum::{
    extract::State,
    routing::{get, post},
    Json,
};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    serialized::{Question, SeedResult, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/api/questions",
    tag = "questions",
    responses(
        (status = 200, body = Vec<Question>)
    )
)]
pub async fn list_questions(
    State(context): State<ServerContext>,
) -> ServerResult<Json<Vec<Question>>> {
    let questions = context.platform.questions.list().await?;

    Ok(Json(questions.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/api/questions/seed",
    tag = "questions",
    responses(
        (status = 200, body = SeedResult, description = "No-op if the catalog already has content")
    )
)]
pub async fn seed_questions(State(context): State<ServerContext>) -> ServerResult<Json<SeedResult>> {
    let summary = context.platform.questions.seed().await?;

    Ok(Json(summary.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_questions))
        .route("/seed", post(seed_questions))
}
