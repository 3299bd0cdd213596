use axum::{extract::State, routing::post, Json};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{JoinSchema, ValidatedJson},
    serialized::{JoinResult, ToSerialized},
    Router,
};

#[utoipa::path(
    post,
    path = "/api/matchmaking/join",
    tag = "matchmaking",
    request_body = JoinSchema,
    responses(
        (status = 200, body = JoinResult),
        (status = 400, description = "Display name is empty")
    )
)]
pub async fn join(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<JoinSchema>,
) -> ServerResult<Json<JoinResult>> {
    let outcome = context.platform.matchmaking.join(&body.name).await?;

    Ok(Json(outcome.to_serialized()))
}

pub fn router() -> Router {
    Router::new().route("/join", post(join))
}
