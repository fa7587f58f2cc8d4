//! # Dose Web
//!
//! HTTP接口层：剂量计算API、目录浏览以及收藏夹协作组件。
//! 每个请求独立无状态（收藏夹除外），错误以显式结果值返回，
//! 单个请求的失败不影响其他并发请求。

pub mod favorites;
pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::WebServer;
