// ==========================================
// 活动跟踪看板 - 领域模型层
// ==========================================
// 职责: 定义任务/活动实体、状态类型、筛选条件
// 红线: 不含数据读取逻辑,不含引擎逻辑
// ==========================================

pub mod activity;
pub mod filter;
pub mod task;
pub mod types;

// 重导出核心类型
pub use activity::{ActivityKey, ActivityRecord, ACTIVITY_FIELDS, ACTIVITY_FIELD_I18N_KEYS};
pub use filter::{FilterCriteria, FilterOptions};
pub use task::{RawTaskRecord, TaskRecord, UNDEFINED_TASK};
pub use types::TaskStatus;
