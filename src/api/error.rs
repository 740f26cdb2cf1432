// ==========================================
// 活动跟踪看板 - API 层错误类型
// ==========================================
// 职责: 汇总各层错误，向调用方提供带原因的错误消息
// 约定: 筛选后无数据不是错误（ViewOutcome::NoData）
// ==========================================

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 分层错误
    // ==========================================
    #[error("数据加载失败: {0}")]
    Import(#[from] ImportError),

    #[error("报表导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 调用错误
    // ==========================================
    #[error("数据集尚未加载")]
    DatasetNotLoaded,

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为数据加载阶段的终止性错误
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ApiError::Import(_))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
