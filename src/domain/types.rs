// ==========================================
// 活动跟踪看板 - 领域类型定义
// ==========================================
// 红线: 规范化之后状态只允许三个取值（封闭枚举）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 任务状态 (Canonical Status)
// ==========================================
// 同时用于任务状态与活动汇总状态
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Completed,  // 已完成
    InProgress, // 进行中
    Pending,    // 待开始
}

impl TaskStatus {
    /// 全部规范状态（显示顺序）
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Completed,
        TaskStatus::InProgress,
        TaskStatus::Pending,
    ];

    /// 规范名称（导出表格与回读使用此名称）
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "Completed",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Pending => "Pending",
        }
    }

    /// 由完成率推断状态
    ///
    /// 规则:
    /// - rate <= 0 → Pending
    /// - rate >= 100 → Completed
    /// - 其他 → InProgress
    pub fn from_completion_rate(rate: f64) -> TaskStatus {
        if rate <= 0.0 {
            TaskStatus::Pending
        } else if rate >= 100.0 {
            TaskStatus::Completed
        } else {
            TaskStatus::InProgress
        }
    }

    /// i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "status.completed",
            TaskStatus::InProgress => "status.in_progress",
            TaskStatus::Pending => "status.pending",
        }
    }

    /// 当前语言下的显示标签
    pub fn label(&self) -> String {
        crate::i18n::t(self.i18n_key())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// 只接受规范名称（忽略大小写与首尾空白）；同义词折叠由 DataCleaner 负责
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("未知状态: {}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_completion_rate() {
        assert_eq!(TaskStatus::from_completion_rate(0.0), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_completion_rate(45.0), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_completion_rate(99.9), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_completion_rate(100.0), TaskStatus::Completed);
    }

    #[test]
    fn test_from_str_canonical_only() {
        assert_eq!("Completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert_eq!(" in progress ".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("PENDING".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
        assert!("encours".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for status in TaskStatus::ALL {
            assert_eq!(status.to_string().parse::<TaskStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
