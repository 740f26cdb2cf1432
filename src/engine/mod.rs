// ==========================================
// 活动跟踪看板 - 引擎层
// ==========================================
// 职责: 聚合 / 逾期分类 / KPI / 图表序列
// 红线: 纯计算，不做 I/O；同一输入得到同一输出
// ==========================================

pub mod aggregator;
pub mod chart;
pub mod kpi;
pub mod overdue;

// 重导出核心引擎
pub use aggregator::{sort_by_completion_desc, sort_by_key, ActivityAggregator, AggregateOutcome};
pub use chart::{truncate_label, ChartBuilder, GroupedCount, ValueBar, DEFAULT_LABEL_MAX_LEN};
pub use kpi::KpiSummary;
pub use overdue::{OverdueClassifier, OverdueReport};
