//! 配置管理
//!
//! 分层加载：内置默认值 → 可选配置文件 → `DOSE_` 前缀环境变量。
//! 所有字段都有默认值，没有配置文件也能启动。

use config::{Config, Environment, File};
use dose_core::{DoseError, Result};
use dose_resolver::{AgeBandThresholds, ResolverConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 服务完整配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 药物目录配置
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// 解析器配置
    #[serde(default)]
    pub resolver: ResolverSettings,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 药物目录配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// 外部目录文件路径；缺省使用内置目录
    pub path: Option<String>,
}

/// 解析器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// 新生儿上限（岁）
    pub neonatal_max_years: f64,
    /// 婴儿上限（岁）
    pub infant_max_years: f64,
    /// 儿童上限（岁）
    pub child_max_years: f64,
    /// 剂量保留小数位
    pub rounding_decimals: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        let defaults = ResolverConfig::default();
        Self {
            neonatal_max_years: defaults.age_bands.neonatal_max_years,
            infant_max_years: defaults.age_bands.infant_max_years,
            child_max_years: defaults.age_bands.child_max_years,
            rounding_decimals: defaults.rounding_decimals,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置：默认值 + 可选文件 + 环境变量
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix("DOSE").separator("_"))
            .build()
            .map_err(|e| DoseError::Config(format!("配置加载失败: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| DoseError::Config(format!("配置反序列化失败: {}", e)))?;

        config.validate()?;

        if let Some(path) = config_path {
            info!("配置文件加载成功: {}", path);
        }
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(DoseError::Config("服务器端口不能为0".to_string()));
        }
        if !self.resolver_config().age_bands.is_valid() {
            return Err(DoseError::Config(
                "年龄段阈值必须为正且严格递增".to_string(),
            ));
        }
        Ok(())
    }

    /// 转换为解析器配置
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            age_bands: AgeBandThresholds {
                neonatal_max_years: self.resolver.neonatal_max_years,
                infant_max_years: self.resolver.infant_max_years,
                child_max_years: self.resolver.child_max_years,
            },
            rounding_decimals: self.resolver.rounding_decimals,
        }
    }
}
