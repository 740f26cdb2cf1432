// ==========================================
// 活动跟踪看板 - 逾期分类器
// ==========================================
// 逾期判定: 截止日期存在 且 截止日期 < 今天 且 完成率 < 100
// 今天由调用方注入（NaiveDate），便于测试
// ==========================================

use crate::domain::ActivityRecord;
use chrono::{Local, NaiveDate};
use serde::Serialize;

// ==========================================
// OverdueReport
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueReport {
    /// 逾期活动（保持输入顺序）
    pub activities: Vec<ActivityRecord>,
    /// 所有逾期活动完成率均为 0（界面据此提示"无进度"而非绘制空柱）
    pub all_zero_progress: bool,
}

impl OverdueReport {
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }
}

// ==========================================
// OverdueClassifier
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct OverdueClassifier {
    today: NaiveDate,
}

impl OverdueClassifier {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// 以本地日期为今天
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_overdue(&self, record: &ActivityRecord) -> bool {
        match record.latest_deadline {
            Some(deadline) => deadline < self.today && record.completion_rate < 100.0,
            None => false,
        }
    }

    /// 筛出逾期活动
    pub fn overdue(&self, records: &[ActivityRecord]) -> Vec<ActivityRecord> {
        records
            .iter()
            .filter(|r| self.is_overdue(r))
            .cloned()
            .collect()
    }

    pub fn count(&self, records: &[ActivityRecord]) -> usize {
        records.iter().filter(|r| self.is_overdue(r)).count()
    }

    pub fn overdue_report(&self, records: &[ActivityRecord]) -> OverdueReport {
        let activities = self.overdue(records);
        let all_zero_progress =
            !activities.is_empty() && activities.iter().all(|r| r.completion_rate == 0.0);

        if !activities.is_empty() {
            tracing::debug!(
                today = %self.today,
                overdue = activities.len(),
                all_zero_progress,
                "逾期活动分类完成"
            );
        }

        OverdueReport {
            activities,
            all_zero_progress,
        }
    }
}
