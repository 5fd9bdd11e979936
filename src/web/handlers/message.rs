//! Private message handlers for the web API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::message::{MessageService, SendMessageRequest};
use crate::web::dto::{
    ApiResponse, ComposeMessageRequest, InboxResponse, MessageResponse, SentMessageResponse,
    UnreadCountResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/messages - Send a message.
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = ComposeMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = SentMessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation failed or unknown recipients")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<ComposeMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SentMessageResponse>>), ApiError> {
    let service = MessageService::new(&state.db, state.keys.as_ref());
    let request =
        SendMessageRequest::from_recipient_field(user.id, &req.recipients, req.title, req.content);

    let message = service.send(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(SentMessageResponse::from(message))),
    ))
}

/// GET /api/messages - Received and sent messages of the caller.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, description = "Inbox with decrypted content", body = InboxResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_inbox(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<InboxResponse>>, ApiError> {
    let service = MessageService::new(&state.db, state.keys.as_ref());
    let inbox = service.list_inbox(&user).await?;

    Ok(Json(ApiResponse::new(InboxResponse::from(inbox))))
}

/// GET /api/messages/unread-count - Unread message count.
#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    tag = "messages",
    responses(
        (status = 200, description = "Unread message count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_unread_count(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, ApiError> {
    let service = MessageService::new(&state.db, state.keys.as_ref());
    let count = service.unread_count(&user).await?;

    Ok(Json(ApiResponse::new(UnreadCountResponse { count })))
}

/// GET /api/messages/:id - View a message.
///
/// Marks the message read when a recipient opens it.
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    tag = "messages",
    params(
        ("id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message with decrypted content", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Message not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let service = MessageService::new(&state.db, state.keys.as_ref());
    let message = service.view(message_id, &user).await?;

    Ok(Json(ApiResponse::new(MessageResponse::from(message))))
}

/// GET /api/admin/messages - Every message, for staff.
///
/// Content is only decrypted for superusers.
#[utoipa::path(
    get,
    path = "/api/admin/messages",
    tag = "admin",
    responses(
        (status = 200, description = "All messages", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff privileges required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn admin_list_messages(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ApiError> {
    let service = MessageService::new(&state.db, state.keys.as_ref());
    let messages = service.list_all(&user).await?;

    tracing::info!(
        user_id = user.id,
        count = messages.len(),
        "Administrative message listing"
    );

    Ok(Json(ApiResponse::new(
        messages.into_iter().map(MessageResponse::from).collect(),
    )))
}
