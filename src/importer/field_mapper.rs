// ==========================================
// 活动跟踪看板 - 字段映射器实现
// ==========================================
// 阶段 1: 源字段 → 标准字段
// 列名: 规范英文列名 + 原始法语列名（别名）
// ==========================================

use crate::domain::RawTaskRecord;
use crate::importer::importer_trait::{FieldMapper as FieldMapperTrait, RawRow};

// ==========================================
// 标准字段与列名别名
// ==========================================
pub mod columns {
    pub const RESPONSIBLE: &str = "Responsible";
    pub const DOMAIN: &str = "Domain";
    pub const ACTIVITY: &str = "Activity";
    pub const TASK: &str = "Task";
    pub const DEADLINE: &str = "Deadline";
    pub const COMPLETION_RATE: &str = "CompletionRate";
    pub const STATUS: &str = "Status";
    pub const PROGRESS_NOTE: &str = "ProgressNote";

    /// 原始数据集的标准列顺序（缓存文件表头）
    pub const RAW_COLUMNS: [&str; 8] = [
        RESPONSIBLE,
        DOMAIN,
        ACTIVITY,
        TASK,
        DEADLINE,
        PROGRESS_NOTE,
        COMPLETION_RATE,
        STATUS,
    ];

    /// 主键列（任一缺失则整行丢弃；整列缺失则视为加载失败）
    pub const MANDATORY_COLUMNS: [&str; 3] = [RESPONSIBLE, DOMAIN, ACTIVITY];
}

/// 标准字段 → 可接受的列名
fn aliases(key: &str) -> &'static [&'static str] {
    match key {
        columns::RESPONSIBLE => &["Responsible", "Responsable"],
        columns::DOMAIN => &["Domain", "Domaine"],
        columns::ACTIVITY => &["Activity", "Activité", "Activite"],
        columns::TASK => &["Task", "Tache", "Tâche"],
        columns::DEADLINE => &["Deadline", "Date limite", "Date_limite"],
        columns::COMPLETION_RATE => &["CompletionRate", "Taux réalisation", "Taux realisation"],
        columns::STATUS => &["Status", "Statut"],
        columns::PROGRESS_NOTE => &["ProgressNote", "Suivi des réalisations"],
        _ => &[],
    }
}

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_raw_task(&self, row: &RawRow, row_number: usize) -> RawTaskRecord {
        RawTaskRecord {
            responsible: self.get_raw(row, columns::RESPONSIBLE),
            domain: self.get_raw(row, columns::DOMAIN),
            activity: self.get_raw(row, columns::ACTIVITY),
            task: self.get_raw(row, columns::TASK),
            deadline: self.get_raw(row, columns::DEADLINE),
            completion_rate: self.get_raw(row, columns::COMPLETION_RATE),
            status: self.get_raw(row, columns::STATUS),
            progress_note: self.get_raw(row, columns::PROGRESS_NOTE),
            row_number,
        }
    }
}

impl FieldMapper {
    /// 按别名顺序提取字段（保留原值，清洗交给 DataCleaner）
    ///
    /// 同一字段出现多个别名列时，取第一个非空白值
    fn get_raw(&self, row: &RawRow, key: &str) -> Option<String> {
        aliases(key)
            .iter()
            .filter_map(|alias| row.get(*alias))
            .find(|v| !v.trim().is_empty())
            .or_else(|| aliases(key).iter().find_map(|alias| row.get(*alias)))
            .cloned()
    }

    /// 检查数据集缺失的主键列
    ///
    /// 以所有行的列名并集为准；空数据集不报缺列
    pub fn missing_mandatory_columns(&self, rows: &[RawRow]) -> Vec<String> {
        if rows.is_empty() {
            return Vec::new();
        }

        columns::MANDATORY_COLUMNS
            .iter()
            .filter(|key| {
                !rows
                    .iter()
                    .any(|row| aliases(key).iter().any(|alias| row.contains_key(*alias)))
            })
            .map(|key| key.to_string())
            .collect()
    }
}
