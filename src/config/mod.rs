// ==========================================
// 活动跟踪看板 - 配置层
// ==========================================
// 职责: 看板配置管理（同义词表、缓存路径、报表版式）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config;
pub mod error;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use dashboard_config::{
    app_home_dir, default_cache_path, default_config_db_path, default_status_synonyms,
    DashboardConfig,
};
pub use error::{ConfigError, ConfigResult};
