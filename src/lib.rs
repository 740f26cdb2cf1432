// ==========================================
// 活动跟踪看板 - 核心库
// ==========================================
// 流水线: 导入 → 清洗规范化 → 活动聚合 → 逾期判定 → 看板视图 → 报表导出
// 技术栈: Rust + SQLite(配置) + calamine/csv(读取) + rust_xlsxwriter/printpdf(导出)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "fr");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据读取与规范化
pub mod importer;

// 引擎层 - 聚合与判定规则
pub mod engine;

// 导出层 - Excel / PDF 报表
pub mod export;

// 配置层 - 看板配置
pub mod config;

// 数据库基础设施（配置存储连接）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 看板接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ActivityKey, ActivityRecord, FilterCriteria, FilterOptions, RawTaskRecord, TaskRecord,
    TaskStatus,
};

// 引擎
pub use engine::{ActivityAggregator, AggregateOutcome, ChartBuilder, KpiSummary, OverdueClassifier};

// 导入
pub use importer::{LoadMode, TaskNormalizer};

// 导出
pub use export::{ExcelExporter, PdfExporter};

// API
pub use api::{DashboardApi, DashboardView, ViewOutcome};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "活动跟踪看板";
