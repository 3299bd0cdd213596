use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::{health, matchmaking, questions, rooms, schemas, serialized};

#[derive(OpenApi)]
#[openapi(
    info(
        description = "codeduel-server exposes endpoints to pair users into shared coding interview rooms"
    ),
    paths(
        health::health,
        matchmaking::join,
        questions::list_questions,
        questions::seed_questions,
        rooms::room,
        rooms::list_messages,
        rooms::send_message,
        rooms::update_editor,
    ),
    components(schemas(
        schemas::JoinSchema,
        schemas::SendMessageSchema,
        schemas::UpdateEditorSchema,
        serialized::JoinResult,
        serialized::Question,
        serialized::QuestionExample,
        serialized::Room,
        serialized::Message,
        serialized::SeedResult,
        serialized::Ack,
        health::Health,
    ))
)]
pub struct ApiDoc;

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
