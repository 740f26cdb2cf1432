// ==========================================
// 活动跟踪看板 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 阶段: 文件解析 → 字段映射 → 清洗 → 规范化（去重/推断）
// ==========================================

use crate::domain::{RawTaskRecord, TaskStatus};
use crate::importer::error::ImportResult;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

/// 原始行: 列名 → 单元格文本
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（HashMap<列名, 值>）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过完全空白的行）
    /// - Err: 文件不存在、格式错误
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行记录映射为 RawTaskRecord（不做类型转换，不会失败）
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - row_number: 行号（从 1 开始）
    fn map_to_raw_task(&self, row: &RawRow, row_number: usize) -> RawTaskRecord;
}

// ==========================================
// StatusFolding - 状态折叠结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFolding {
    /// 原值即规范名称
    Canonical(TaskStatus),
    /// 经同义词表折叠
    Folded(TaskStatus),
    /// 空值或无法识别（需按完成率推断）
    Unrecognized,
}

impl StatusFolding {
    pub fn status(&self) -> Option<TaskStatus> {
        match self {
            StatusFolding::Canonical(s) | StatusFolding::Folded(s) => Some(*s),
            StatusFolding::Unrecognized => None,
        }
    }
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 数据清洗接口（阶段 2）
// 约定: 所有方法不返回错误，脏数据降级为默认值
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段: TRIM + 空值标记（"", "None", "NaN" 及大小写变体）→ None
    fn clean_text(&self, value: Option<&str>) -> Option<String>;

    /// 状态同义词折叠
    fn fold_status(&self, value: Option<&str>) -> StatusFolding;

    /// 解析完成率（空值/无法解析 → 0，结果限制在 [0, 100]）
    fn parse_completion_rate(&self, value: Option<&str>) -> f64;

    /// 尽力解析截止日期（无法解析 → None）
    fn parse_deadline(&self, value: Option<&str>) -> Option<NaiveDate>;
}
