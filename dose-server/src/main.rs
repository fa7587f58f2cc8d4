//! 剂量服务主程序

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dose_catalog::Catalog;
use dose_core::{DoseError, Result};
use dose_resolver::{DoseResolver, QuickTable};
use dose_web::favorites::FavoritesStore;
use dose_web::{AppState, WebServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// 剂量服务命令行参数
#[derive(Parser, Debug)]
#[command(name = "dose-server")]
#[command(about = "儿科药物剂量参考与计算服务")]
struct Args {
    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 药物目录文件路径（缺省使用内置目录）
    #[arg(long)]
    catalog: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("启动剂量服务...");

    // 加载配置，命令行参数覆盖配置文件
    let mut app_config = AppConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }
    if let Some(catalog_path) = args.catalog {
        app_config.catalog.path = Some(catalog_path);
    }
    app_config.validate()?;

    info!("剂量服务配置:");
    info!("  监听地址: {}:{}", app_config.server.host, app_config.server.port);
    info!(
        "  药物目录: {}",
        app_config.catalog.path.as_deref().unwrap_or("内置")
    );

    // 加载药物目录
    let catalog = match &app_config.catalog.path {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin()?,
    };
    info!(
        "目录加载完成: {} 个系统, {} 种药物",
        catalog.systems().len(),
        catalog.drugs().len()
    );

    let resolver = DoseResolver::with_config(Arc::new(catalog), app_config.resolver_config());
    let state = AppState {
        resolver: Arc::new(resolver),
        quick: Arc::new(QuickTable::with_decimals(app_config.resolver.rounding_decimals)),
        favorites: Arc::new(FavoritesStore::new()),
    };

    let addr: SocketAddr = format!("{}:{}", app_config.server.host, app_config.server.port)
        .parse()
        .map_err(|e| DoseError::Config(format!("监听地址无效: {}", e)))?;

    // 启动Web服务器
    let server = WebServer::new(addr, state);
    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e);
    }

    Ok(())
}
