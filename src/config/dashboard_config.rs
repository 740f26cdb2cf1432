// ==========================================
// 活动跟踪看板 - 看板配置
// ==========================================
// 职责: 配置结构体 + 默认值 + 默认路径
// 存储: 由 ConfigManager 读写 config_kv 表
// ==========================================

use crate::domain::TaskStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 覆盖数据目录的环境变量
pub const HOME_ENV_VAR: &str = "ACTIVITY_DASHBOARD_HOME";

/// 缓存数据文件名
pub const CACHE_FILE_NAME: &str = "datafile.xlsx";

/// 配置数据库文件名
pub const CONFIG_DB_FILE_NAME: &str = "activity_dashboard.db";

// ==========================================
// DashboardConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 状态同义词表 {旧值: 规范状态}，可在不改代码的情况下扩展
    pub status_synonyms: BTreeMap<String, TaskStatus>,
    /// 图表标签最大长度（字符数）
    pub label_max_len: usize,
    /// 原始数据缓存文件路径
    pub cache_file_path: PathBuf,
    /// Excel 导出工作表名
    pub export_sheet_name: String,
    /// PDF 报表标题
    pub report_title: String,
    /// PDF 列宽下限（mm）
    pub pdf_min_col_width_mm: f64,
    /// PDF 列宽上限（mm）
    pub pdf_max_col_width_mm: f64,
    /// PDF 正文字号（pt）
    pub pdf_body_font_size: f64,
    /// PDF 标题字号（pt）
    pub pdf_title_font_size: f64,
    /// 界面语言
    pub locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            status_synonyms: default_status_synonyms(),
            label_max_len: 30,
            cache_file_path: default_cache_path(),
            export_sheet_name: "Activites".to_string(),
            report_title: "Tableau des activités".to_string(),
            pdf_min_col_width_mm: 15.0,
            pdf_max_col_width_mm: 60.0,
            pdf_body_font_size: 9.0,
            pdf_title_font_size: 16.0,
            locale: "fr".to_string(),
        }
    }
}

/// 默认状态同义词表
///
/// 包含历史数据中出现过的写法以及法语显示标签
pub fn default_status_synonyms() -> BTreeMap<String, TaskStatus> {
    [
        ("In progress (executing)", TaskStatus::InProgress),
        ("in-progress", TaskStatus::InProgress),
        ("En cours d'execution", TaskStatus::InProgress),
        ("En cours d'exécution", TaskStatus::InProgress),
        ("encours", TaskStatus::InProgress),
        ("En cours", TaskStatus::InProgress),
        ("Terminée", TaskStatus::Completed),
        ("Terminé", TaskStatus::Completed),
        ("En attente", TaskStatus::Pending),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// 应用数据目录
///
/// 优先级: 环境变量 ACTIVITY_DASHBOARD_HOME > 用户数据目录 > 当前目录
pub fn app_home_dir() -> PathBuf {
    if let Ok(path) = std::env::var(HOME_ENV_VAR) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("activity-dashboard"),
        None => PathBuf::from("."),
    }
}

/// 默认缓存文件路径
pub fn default_cache_path() -> PathBuf {
    app_home_dir().join(CACHE_FILE_NAME)
}

/// 默认配置数据库路径
pub fn default_config_db_path() -> PathBuf {
    app_home_dir().join(CONFIG_DB_FILE_NAME)
}
