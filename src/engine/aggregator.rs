// ==========================================
// 活动跟踪看板 - 活动聚合引擎
// ==========================================
// 职责: 任务 → 活动汇总行
// 输入: 规范化任务 + FilterCriteria
// 输出: AggregateOutcome（活动列表 或 NoData）
// ==========================================
// 规则:
// 1. 筛选；筛选后为空 → NoData（与空列表成功区分）
// 2. 按 (责任人, 领域, 活动) 分组，保持首次出现顺序
// 3. 完成率 = round(100 × 已完成 / 总数, 1)
// 4. 汇总状态（顺序执行，命中即返回）:
//    总数 == 已完成 → Completed
//    总数 == 待开始 → Pending
//    其他 → InProgress
// ==========================================

use crate::domain::{ActivityKey, ActivityRecord, FilterCriteria, TaskRecord, TaskStatus};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::instrument;

// ==========================================
// AggregateOutcome
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    /// 至少一个活动
    Activities(Vec<ActivityRecord>),
    /// 筛选后无任务
    NoData,
}

impl AggregateOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, AggregateOutcome::NoData)
    }

    pub fn activities(&self) -> Option<&[ActivityRecord]> {
        match self {
            AggregateOutcome::Activities(records) => Some(records),
            AggregateOutcome::NoData => None,
        }
    }

    pub fn into_activities(self) -> Option<Vec<ActivityRecord>> {
        match self {
            AggregateOutcome::Activities(records) => Some(records),
            AggregateOutcome::NoData => None,
        }
    }
}

// 分组累加器
struct GroupAccumulator {
    key: ActivityKey,
    total: u32,
    completed: u32,
    in_progress: u32,
    pending: u32,
    latest_deadline: Option<NaiveDate>,
}

impl GroupAccumulator {
    fn new(key: ActivityKey) -> Self {
        Self {
            key,
            total: 0,
            completed: 0,
            in_progress: 0,
            pending: 0,
            latest_deadline: None,
        }
    }

    fn add(&mut self, task: &TaskRecord) {
        self.total += 1;
        match task.status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Pending => self.pending += 1,
        }
        if let Some(deadline) = task.deadline {
            self.latest_deadline = Some(match self.latest_deadline {
                Some(current) => current.max(deadline),
                None => deadline,
            });
        }
    }

    fn finish(self) -> ActivityRecord {
        ActivityRecord {
            completion_rate: ActivityAggregator::completion_rate(self.completed, self.total),
            status: ActivityAggregator::rollup_status(self.total, self.completed, self.pending),
            responsible: self.key.responsible,
            domain: self.key.domain,
            activity: self.key.activity,
            total_tasks: self.total,
            completed_tasks: self.completed,
            in_progress_tasks: self.in_progress,
            pending_tasks: self.pending,
            latest_deadline: self.latest_deadline,
        }
    }
}

// ==========================================
// ActivityAggregator
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivityAggregator;

impl ActivityAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 筛选并聚合
    #[instrument(skip(self, tasks, filter), fields(tasks = tasks.len()))]
    pub fn aggregate(&self, tasks: &[TaskRecord], filter: &FilterCriteria) -> AggregateOutcome {
        let filtered: Vec<&TaskRecord> = tasks.iter().filter(|t| filter.matches(t)).collect();

        if filtered.is_empty() {
            tracing::info!(unrestricted = filter.is_unrestricted(), "筛选后无数据");
            return AggregateOutcome::NoData;
        }

        let records = self.group(filtered);
        tracing::debug!(activities = records.len(), "活动聚合完成");
        AggregateOutcome::Activities(records)
    }

    /// 分组（保持首次出现顺序）
    fn group<'a, I>(&self, tasks: I) -> Vec<ActivityRecord>
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        let mut index: HashMap<ActivityKey, usize> = HashMap::new();
        let mut groups: Vec<GroupAccumulator> = Vec::new();

        for task in tasks {
            let key = task.activity_key();
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    groups.push(GroupAccumulator::new(key.clone()));
                    index.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[slot].add(task);
        }

        groups.into_iter().map(GroupAccumulator::finish).collect()
    }

    /// 完成率（百分比，保留 1 位小数，半数取偶）
    ///
    /// total 为 0 时返回 0（分组内不会出现）
    pub fn completion_rate(completed: u32, total: u32) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let rate = 100.0 * f64::from(completed) / f64::from(total);
        (rate * 10.0).round_ties_even() / 10.0
    }

    /// 汇总状态（求值顺序固定: Completed → Pending → InProgress）
    pub fn rollup_status(total: u32, completed: u32, pending: u32) -> TaskStatus {
        if total == completed {
            TaskStatus::Completed
        } else if total == pending {
            TaskStatus::Pending
        } else {
            TaskStatus::InProgress
        }
    }
}

// ==========================================
// 显示排序（聚合输出顺序不具业务含义，需要时显式排序）
// ==========================================

/// 按 (责任人, 领域, 活动) 排序
pub fn sort_by_key(records: &mut [ActivityRecord]) {
    records.sort_by(|a, b| {
        (&a.responsible, &a.domain, &a.activity).cmp(&(&b.responsible, &b.domain, &b.activity))
    });
}

/// 按完成率降序（相同完成率按活动键升序）
pub fn sort_by_completion_desc(records: &mut [ActivityRecord]) {
    records.sort_by(|a, b| {
        b.completion_rate
            .partial_cmp(&a.completion_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key().cmp(&b.key()))
    });
}
