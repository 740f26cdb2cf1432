// ==========================================
// 活动跟踪看板 - API 层
// ==========================================
// 职责: 提供看板业务接口，供 CLI 或界面调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardView, ExportArtifact, ViewOutcome};
pub use error::{ApiError, ApiResult};
