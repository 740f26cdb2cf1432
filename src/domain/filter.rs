// ==========================================
// 活动跟踪看板 - 筛选条件
// ==========================================
// 显式不可变值，传入聚合器；空集合 = 该维度不限制
// ==========================================

use crate::domain::task::TaskRecord;
use crate::domain::types::TaskStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// FilterCriteria - 筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub responsibles: BTreeSet<String>,
    pub domains: BTreeSet<String>,
    pub statuses: BTreeSet<TaskStatus>,
}

impl FilterCriteria {
    /// 不限制任何维度
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_responsibles<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responsibles = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_domains<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_statuses<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        self.statuses = values.into_iter().collect();
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.responsibles.is_empty() && self.domains.is_empty() && self.statuses.is_empty()
    }

    /// 任务是否满足所有维度
    pub fn matches(&self, task: &TaskRecord) -> bool {
        (self.responsibles.is_empty() || self.responsibles.contains(&task.responsible))
            && (self.domains.is_empty() || self.domains.contains(&task.domain))
            && (self.statuses.is_empty() || self.statuses.contains(&task.status))
    }
}

// ==========================================
// FilterOptions - 可选筛选值
// ==========================================
// 用途: 看板侧栏候选项（排序去重）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub responsibles: Vec<String>,
    pub domains: Vec<String>,
    pub statuses: Vec<TaskStatus>,
}

impl FilterOptions {
    pub fn from_tasks(tasks: &[TaskRecord]) -> Self {
        let responsibles: BTreeSet<&str> = tasks.iter().map(|t| t.responsible.as_str()).collect();
        let domains: BTreeSet<&str> = tasks.iter().map(|t| t.domain.as_str()).collect();
        let statuses: BTreeSet<TaskStatus> = tasks.iter().map(|t| t.status).collect();

        Self {
            responsibles: responsibles.into_iter().map(String::from).collect(),
            domains: domains.into_iter().map(String::from).collect(),
            statuses: statuses.into_iter().collect(),
        }
    }
}
