// ==========================================
// 活动跟踪看板 - 任务领域模型
// ==========================================
// RawTaskRecord: 字段映射后的原始行（未清洗）
// TaskRecord: 规范化后的任务（一次加载内不可变）
// ==========================================

use crate::domain::activity::ActivityKey;
use crate::domain::types::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 任务名为空时的占位值
pub const UNDEFINED_TASK: &str = "UNDEFINED";

// ==========================================
// RawTaskRecord - 原始任务行
// ==========================================
// 用途: FieldMapper 输出，TaskNormalizer 输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTaskRecord {
    pub responsible: Option<String>,
    pub domain: Option<String>,
    pub activity: Option<String>,
    pub task: Option<String>,
    pub deadline: Option<String>,
    pub completion_rate: Option<String>,
    pub status: Option<String>,
    pub progress_note: Option<String>, // 执行情况跟踪（可选）

    // 元信息: 数据行号（从 1 开始，不含表头）
    pub row_number: usize,
}

// ==========================================
// TaskRecord - 规范化任务
// ==========================================
// 身份: (responsible, domain, activity, task) 规范化后唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub responsible: String,
    pub domain: String,
    pub activity: String,
    pub task: String,
    pub deadline: Option<NaiveDate>,
    pub completion_rate: f64, // 0..=100
    pub status: TaskStatus,
    pub progress_note: Option<String>,
    pub row_number: usize,
}

impl TaskRecord {
    /// 任务身份（去重键）
    pub fn identity(&self) -> (&str, &str, &str, &str) {
        (&self.responsible, &self.domain, &self.activity, &self.task)
    }

    /// 所属活动键
    pub fn activity_key(&self) -> ActivityKey {
        ActivityKey::new(&self.responsible, &self.domain, &self.activity)
    }
}

// 规范化结果回写为原始行（规范化幂等性的基础）
impl From<&TaskRecord> for RawTaskRecord {
    fn from(task: &TaskRecord) -> Self {
        RawTaskRecord {
            responsible: Some(task.responsible.clone()),
            domain: Some(task.domain.clone()),
            activity: Some(task.activity.clone()),
            task: Some(task.task.clone()),
            deadline: task.deadline.map(|d| d.format("%Y-%m-%d").to_string()),
            completion_rate: Some(task.completion_rate.to_string()),
            status: Some(task.status.as_str().to_string()),
            progress_note: task.progress_note.clone(),
            row_number: task.row_number,
        }
    }
}
