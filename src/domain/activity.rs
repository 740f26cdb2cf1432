// ==========================================
// 活动跟踪看板 - 活动领域模型
// ==========================================
// 活动 = (责任人, 领域, 活动名) 下的一组任务
// 派生数据，每次筛选变化时重新计算，不持久化
// ==========================================

use crate::domain::types::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 活动记录的字段名（导出表头，顺序固定）
pub const ACTIVITY_FIELDS: [&str; 10] = [
    "Responsible",
    "Domain",
    "Activity",
    "TotalTasks",
    "CompletedTasks",
    "InProgressTasks",
    "PendingTasks",
    "CompletionRate",
    "LatestDeadline",
    "Status",
];

/// 活动记录字段对应的 i18n 键（与 ACTIVITY_FIELDS 一一对应）
pub const ACTIVITY_FIELD_I18N_KEYS: [&str; 10] = [
    "column.responsible",
    "column.domain",
    "column.activity",
    "column.total_tasks",
    "column.completed_tasks",
    "column.in_progress_tasks",
    "column.pending_tasks",
    "column.completion_rate",
    "column.latest_deadline",
    "column.status",
];

// ==========================================
// ActivityKey - 活动键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityKey {
    pub responsible: String,
    pub domain: String,
    pub activity: String,
}

impl ActivityKey {
    pub fn new(responsible: &str, domain: &str, activity: &str) -> Self {
        Self {
            responsible: responsible.to_string(),
            domain: domain.to_string(),
            activity: activity.to_string(),
        }
    }
}

// ==========================================
// ActivityRecord - 活动汇总行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub responsible: String,
    pub domain: String,
    pub activity: String,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub in_progress_tasks: u32,
    pub pending_tasks: u32,
    pub completion_rate: f64, // round(100 × completed / total, 1)
    pub latest_deadline: Option<NaiveDate>,
    pub status: TaskStatus, // 汇总状态（重新推导，非任务状态拷贝）
}

impl ActivityRecord {
    pub fn key(&self) -> ActivityKey {
        ActivityKey::new(&self.responsible, &self.domain, &self.activity)
    }

    /// 计数守恒: total = completed + in_progress + pending
    pub fn counts_consistent(&self) -> bool {
        self.total_tasks == self.completed_tasks + self.in_progress_tasks + self.pending_tasks
    }

    /// 按 ACTIVITY_FIELDS 顺序输出各列文本（报表渲染与列宽估算使用）
    ///
    /// 状态输出规范名称；需要本地化标签时由调用方替换
    pub fn field_texts(&self) -> Vec<String> {
        vec![
            self.responsible.clone(),
            self.domain.clone(),
            self.activity.clone(),
            self.total_tasks.to_string(),
            self.completed_tasks.to_string(),
            self.in_progress_tasks.to_string(),
            self.pending_tasks.to_string(),
            format!("{:.1}", self.completion_rate),
            self.latest_deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            self.status.as_str().to_string(),
        ]
    }
}
