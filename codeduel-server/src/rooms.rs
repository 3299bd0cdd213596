use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json,
};

use crate::{
    context::ServerContext,
    errors::ServerResult,
    schemas::{MessagesQuery, SendMessageSchema, UpdateEditorSchema, ValidatedJson},
    serialized::{Ack, Message, Room, ToSerialized},
    Router,
};

/// Applied when the caller doesn't pass a limit
const DEFAULT_MESSAGE_LIMIT: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/rooms/{code}",
    tag = "rooms",
    params(
        ("code" = String, Path, description = "Shareable room code")
    ),
    responses(
        (status = 200, body = Room),
        (status = 404, description = "Room not found")
    )
)]
pub async fn room(
    State(context): State<ServerContext>,
    Path(code): Path<String>,
) -> ServerResult<Json<Room>> {
    let resolved = context.platform.rooms.room_by_code(&code).await?;

    Ok(Json(resolved.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{code}/messages",
    tag = "rooms",
    params(
        ("code" = String, Path, description = "Shareable room code"),
        MessagesQuery
    ),
    responses(
        (status = 200, body = Vec<Message>),
        (status = 404, description = "Room not found")
    )
)]
pub async fn list_messages(
    State(context): State<ServerContext>,
    Path(code): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> ServerResult<Json<Vec<Message>>> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT).max(0);
    let messages = context.platform.rooms.list_messages(&code, limit).await?;

    Ok(Json(messages.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{code}/messages",
    tag = "rooms",
    request_body = SendMessageSchema,
    params(
        ("code" = String, Path, description = "Shareable room code")
    ),
    responses(
        (status = 200, body = Ack),
        (status = 404, description = "Room not found")
    )
)]
pub async fn send_message(
    State(context): State<ServerContext>,
    Path(code): Path<String>,
    ValidatedJson(body): ValidatedJson<SendMessageSchema>,
) -> ServerResult<Json<Ack>> {
    context
        .platform
        .rooms
        .send_message(&code, &body.sender, &body.content)
        .await?;

    Ok(Json(Ack::ok()))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{code}/editor",
    tag = "rooms",
    request_body = UpdateEditorSchema,
    params(
        ("code" = String, Path, description = "Shareable room code")
    ),
    responses(
        (status = 200, body = Ack),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_editor(
    State(context): State<ServerContext>,
    Path(code): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateEditorSchema>,
) -> ServerResult<Json<Ack>> {
    context
        .platform
        .rooms
        .update_editor(&code, &body.content)
        .await?;

    Ok(Json(Ack::ok()))
}

pub fn router() -> Router {
    Router::new()
        .route("/:code", get(room))
        .route("/:code/messages", get(list_messages).post(send_message))
        .route("/:code/editor", put(update_editor))
}
