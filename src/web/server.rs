//! Web server for vimi.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::WebConfig;
use crate::crypto::KeyProvider;
use crate::{Database, Result, VimiError};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::{create_health_router, create_router, create_swagger_router};

/// Web server for the messaging API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &WebConfig, db: Arc<Database>, keys: Arc<dyn KeyProvider>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| VimiError::Config(format!("invalid web server address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(db, keys)),
            jwt_state: Arc::new(JwtState::new(&config.jwt_secret)),
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn into_router(self) -> axum::Router {
        create_router(self.app_state, self.jwt_state, &self.cors_origins)
            .merge(create_health_router())
            .merge(create_swagger_router())
            .layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.into_router();

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{MessageKey, StaticKeyProvider};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn create_test_config() -> WebConfig {
        WebConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            cors_origins: vec![],
            jwt_secret: "test-secret-key".to_string(),
        }
    }

    fn test_keys() -> Arc<dyn KeyProvider> {
        Arc::new(StaticKeyProvider::new(
            MessageKey::from_hex("000102030405060708090a0b0c0d0e0f").unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let server = WebServer::new(&create_test_config(), db, test_keys()).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_rejects_bad_address() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let config = WebConfig {
            host: "not an address".to_string(),
            ..create_test_config()
        };
        assert!(matches!(
            WebServer::new(&config, db, test_keys()),
            Err(VimiError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let server = WebServer::new(&create_test_config(), db, test_keys()).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("OK"));
    }
}
