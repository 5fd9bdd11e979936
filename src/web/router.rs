//! Router configuration for the vimi web API.

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{
    ComposeMessageRequest, InboxResponse, MessageResponse, ParticipantInfo, SentMessageResponse,
    UnreadCountResponse,
};
use super::handlers::{
    admin_list_messages, get_message, get_unread_count, list_inbox, message, send_message,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// OpenAPI documentation for the messaging API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "vimi private messaging API",
        description = "Encrypted private messages between forum users"
    ),
    paths(
        message::send_message,
        message::list_inbox,
        message::get_unread_count,
        message::get_message,
        message::admin_list_messages,
    ),
    components(schemas(
        ComposeMessageRequest,
        SentMessageResponse,
        InboxResponse,
        MessageResponse,
        ParticipantInfo,
        UnreadCountResponse,
    )),
    tags(
        (name = "messages", description = "Sending and reading private messages"),
        (name = "admin", description = "Administrative message listing"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let message_routes = Router::new()
        .route("/", get(list_inbox).post(send_message))
        .route("/unread-count", get(get_unread_count))
        .route("/:id", get(get_message));

    let admin_routes = Router::new().route("/messages", get(admin_list_messages));

    let api_routes = Router::new()
        .nest("/messages", message_routes)
        .nest("/admin", admin_routes);

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
