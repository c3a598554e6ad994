//! 应用层：路由装配

pub mod catalog;

use std::path::Path;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::middleware::request_logging_middleware;
use catalog::handler::{self, AppState};

/// 商品路由，每个路由在构建时注册一次
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_items))
        .route(
            "/cadastro",
            get(handler::show_create_form).post(handler::create_item),
        )
        .route(
            "/editar/:id",
            get(handler::show_edit_form).post(handler::update_item),
        )
        .route("/deletar/:id", post(handler::delete_item))
        .route("/relatorio", get(handler::download_report))
}

/// 完整应用：商品路由、静态资源和中间件
pub fn build_router(state: AppState, public_dir: impl AsRef<Path>, timeout: Duration) -> Router {
    catalog_routes()
        .fallback_service(ServeDir::new(public_dir.as_ref()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}
