//! 错误定义模块

use thiserror::Error;

/// 剂量计算系统统一错误类型
///
/// 注意：剂量表达式无数值内容（"Not recommended" 等）不属于错误，
/// 它是合法的定性回退结果，见 `models::Resolution`。
#[derive(Error, Debug)]
pub enum DoseError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("输入校验错误: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("药物目录数据缺陷: {0}")]
    Catalog(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// 剂量计算系统统一结果类型
pub type Result<T> = std::result::Result<T, DoseError>;
