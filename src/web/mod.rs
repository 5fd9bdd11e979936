//! Web API module for vimi.
//!
//! REST endpoints for sending and reading private messages. Callers are
//! identified by bearer tokens issued by the forum's identity provider.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use middleware::JwtState;
pub use router::{create_health_router, create_router, create_swagger_router};
pub use server::WebServer;
