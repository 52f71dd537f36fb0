// ==========================================
// 智能补货决策系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换 Repository/Import 错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因（可解释性）
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("导入失败: {0}")]
    ImportFailed(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 内部错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// Repository错误转换为API错误
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("field={}: {}", field, message))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// 导入错误转换为API错误
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportFailed(err.to_string())
    }
}

/// API层结果类型别名
pub type ApiResult<T> = Result<T, ApiError>;
