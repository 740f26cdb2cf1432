// ==========================================
// 活动跟踪看板 - KPI 汇总
// ==========================================
// 已完成: 完成率 == 100（按完成率统计）
// 进行中 / 待开始: 按汇总状态统计
// 逾期: OverdueClassifier
// ==========================================

use crate::domain::{ActivityRecord, TaskStatus};
use crate::engine::overdue::OverdueClassifier;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KpiSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
    pub pending: usize,
}

impl KpiSummary {
    pub fn compute(records: &[ActivityRecord], classifier: &OverdueClassifier) -> Self {
        let count_status =
            |status: TaskStatus| records.iter().filter(|r| r.status == status).count();

        Self {
            total: records.len(),
            completed: records
                .iter()
                .filter(|r| r.completion_rate >= 100.0)
                .count(),
            in_progress: count_status(TaskStatus::InProgress),
            overdue: classifier.count(records),
            pending: count_status(TaskStatus::Pending),
        }
    }

    /// (i18n 键, 数值) 列表，顺序与界面一致
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("kpi.total_activities", self.total),
            ("kpi.completed_activities", self.completed),
            ("kpi.in_progress_activities", self.in_progress),
            ("kpi.overdue_activities", self.overdue),
            ("kpi.pending_activities", self.pending),
        ]
    }
}
