// ==========================================
// 活动跟踪看板 - 图表数据序列
// ==========================================
// 只生成数据，不负责绘制
// 标签截断: 字符数 < 上限 原样保留，否则取前 (上限 - 3) 个字符 + "..."
// 分组序列按标签排序（BTreeMap），保证输出确定
// ==========================================

use crate::domain::{ActivityRecord, TaskRecord, TaskStatus, UNDEFINED_TASK};
use serde::Serialize;
use std::collections::BTreeMap;

/// 默认标签最大长度
pub const DEFAULT_LABEL_MAX_LEN: usize = 30;

const ELLIPSIS: &str = "...";

/// 截断标签（按字符计数，不会切开多字节字符）
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() < max_len {
        return label.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = label.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

// ==========================================
// 序列数据结构
// ==========================================

/// 分组计数柱（x = 标签，按状态着色）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedCount {
    pub label: String,
    pub status: TaskStatus,
    pub count: usize,
}

/// 数值柱（x = 标签，y = 完成率）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueBar {
    pub label: String,
    pub value: f64,
    /// 着色分组（逾期图按领域着色）
    pub group: Option<String>,
}

// ==========================================
// ChartBuilder
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ChartBuilder {
    label_max_len: usize,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_MAX_LEN)
    }
}

impl ChartBuilder {
    pub fn new(label_max_len: usize) -> Self {
        Self { label_max_len }
    }

    pub fn label(&self, text: &str) -> String {
        truncate_label(text, self.label_max_len)
    }

    /// 活动数 按 (领域, 状态)
    pub fn by_domain(&self, records: &[ActivityRecord]) -> Vec<GroupedCount> {
        self.grouped(records, |r| r.domain.as_str())
    }

    /// 活动数 按 (责任人, 状态)
    pub fn by_responsible(&self, records: &[ActivityRecord]) -> Vec<GroupedCount> {
        self.grouped(records, |r| r.responsible.as_str())
    }

    /// 活动数 按状态（只包含出现过的状态）
    pub fn by_status(&self, records: &[ActivityRecord]) -> Vec<(TaskStatus, usize)> {
        let mut counts: BTreeMap<TaskStatus, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// 完成率 > 0 的活动（保持输入顺序）
    pub fn completion_by_activity(&self, records: &[ActivityRecord]) -> Vec<ValueBar> {
        records
            .iter()
            .filter(|r| r.completion_rate > 0.0)
            .map(|r| ValueBar {
                label: self.label(&r.activity),
                value: r.completion_rate,
                group: None,
            })
            .collect()
    }

    /// 逾期活动完成率（按领域着色）
    pub fn overdue_bars(&self, overdue: &[ActivityRecord]) -> Vec<ValueBar> {
        overdue
            .iter()
            .map(|r| ValueBar {
                label: self.label(&r.activity),
                value: r.completion_rate,
                group: Some(r.domain.clone()),
            })
            .collect()
    }

    /// 状态分布图仅在存在已定义任务时显示
    pub fn has_defined_tasks<'a, I>(tasks: I) -> bool
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        tasks.into_iter().any(|t| t.task != UNDEFINED_TASK)
    }

    fn grouped<F>(&self, records: &[ActivityRecord], label_of: F) -> Vec<GroupedCount>
    where
        F: Fn(&ActivityRecord) -> &str,
    {
        let mut counts: BTreeMap<(String, TaskStatus), usize> = BTreeMap::new();
        for record in records {
            *counts
                .entry((self.label(label_of(record)), record.status))
                .or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|((label, status), count)| GroupedCount {
                label,
                status,
                count,
            })
            .collect()
    }
}
