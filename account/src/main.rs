//! Storefront Account Service Entry Point

use std::net::SocketAddr;
use std::sync::Arc;
use storefront_account::{api, auth, directory::MemoryDirectory, logging, secret, AppState};
use storefront_common::config::{resolve_env_or, resolve_env_parse};
use tracing::info;

#[derive(Clone)]
struct ServerConfig {
    host: String,
    port: u16,
    rotate_refresh: bool,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = resolve_env_or("STOREFRONT_HOST", "ACCOUNT_HOST", "0.0.0.0");
        let port = resolve_env_parse("STOREFRONT_PORT", "ACCOUNT_PORT", 8080);
        let rotate_refresh =
            resolve_env_parse("STOREFRONT_ROTATE_REFRESH", "ROTATE_REFRESH", true);
        Self {
            host,
            port,
            rotate_refresh,
        }
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[tokio::main]
async fn main() {
    logging::init().expect("failed to initialize logging");
    run_server(ServerConfig::from_env()).await;
}

async fn run_server(config: ServerConfig) {
    info!("Storefront Account Service v{}", env!("CARGO_PKG_VERSION"));

    let directory = Arc::new(MemoryDirectory::new());

    // 管理者が存在しない場合は環境変数から作成
    match auth::bootstrap::create_admin_from_env(directory.as_ref()).await {
        Ok(Some(email)) => info!("Admin account available: {}", email),
        Ok(None) => info!("No admin bootstrap requested"),
        Err(e) => panic!("Failed to bootstrap admin account: {}", e),
    }

    // トークン署名鍵を取得または生成（以後は発行器/検証器に注入される）
    let token_secret =
        secret::get_or_create_token_secret().expect("Failed to resolve token secret");

    let state = AppState::new(directory, &token_secret, config.rotate_refresh);
    info!("Authentication system initialized");

    let router = api::create_router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    info!("Account service listening on {}", bind_addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
