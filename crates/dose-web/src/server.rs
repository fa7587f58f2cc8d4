//! Web服务器

use axum::{
    routing::{delete, get, post},
    Router,
};
use dose_core::{DoseError, Result};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    add_favorite, api_root, clear_favorites, clear_recent, get_drug, get_drugs, get_favorites,
    get_quick_drugs, get_recent, get_stats, get_systems, get_weight_estimate, health,
    post_dosage, post_quick_dosage, post_recent, remove_favorite, AppState,
};

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        let app = Self::create_app(state);
        Self { addr, app }
    }

    fn create_app(state: AppState) -> Router {
        Router::new()
            // 根路径
            .route("/", get(api_root))
            // 健康检查
            .route("/health", get(health))
            // API路由
            .nest("/api/v1", api_routes())
            .with_state(state)
            // 全局中间件
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(
                        CorsLayer::new()
                            .allow_origin(Any)
                            .allow_methods(Any)
                            .allow_headers(Any),
                    ),
            )
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(|e| DoseError::Internal(format!("Failed to start web server: {}", e)))?;

        Ok(())
    }
}

/// API v1 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        // 目录浏览
        .route("/systems", get(get_systems))
        .route("/drugs", get(get_drugs))
        .route("/drugs/:drug_id", get(get_drug))
        // 剂量计算
        .route("/dosage", post(post_dosage))
        .route("/dosage/quick", get(get_quick_drugs).post(post_quick_dosage))
        .route("/weight-estimate", get(get_weight_estimate))
        // 收藏夹与最近记录
        .route("/favorites", get(get_favorites).post(add_favorite).delete(clear_favorites))
        .route("/favorites/:drug_id", delete(remove_favorite))
        .route("/recent", get(get_recent).post(post_recent).delete(clear_recent))
        .route("/stats", get(get_stats))
}
