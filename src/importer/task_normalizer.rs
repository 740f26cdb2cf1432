// ==========================================
// 活动跟踪看板 - 任务规范化器
// ==========================================
// 职责: 原始行 → 规范化任务记录
// 流程（顺序执行）:
// 1. 字段映射
// 2. 主键列清洗，任一为空则丢弃整行
// 3. 状态同义词折叠 / 截止日期解析 / 任务与完成率默认值
// 4. 按 (责任人, 领域, 活动, 任务) 去重，保留首次出现
// 5. 状态为空或无法识别时按完成率推断（显式状态永不覆盖）
// ==========================================

use crate::domain::{RawTaskRecord, TaskRecord, TaskStatus, UNDEFINED_TASK};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait, RawRow, StatusFolding,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

// ==========================================
// NormalizeReport - 规范化统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub input_rows: usize,
    pub dropped_missing_keys: usize,
    pub duplicates_removed: usize,
    pub statuses_folded: usize,
    pub statuses_inferred: usize,
    pub unparsed_deadlines: usize,
    pub output_rows: usize,
}

// ==========================================
// NormalizeOutcome
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub tasks: Vec<TaskRecord>,
    pub report: NormalizeReport,
}

// ==========================================
// TaskNormalizer
// ==========================================
pub struct TaskNormalizer {
    mapper: FieldMapper,
    cleaner: DataCleaner,
}

impl TaskNormalizer {
    pub fn new(cleaner: DataCleaner) -> Self {
        Self {
            mapper: FieldMapper,
            cleaner,
        }
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    /// 从解析后的原始行规范化（行号从 1 开始）
    pub fn normalize_rows(&self, rows: &[RawRow]) -> NormalizeOutcome {
        let raws = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.mapper.map_to_raw_task(row, idx + 1))
            .collect();
        self.normalize(raws)
    }

    /// 规范化原始任务记录
    ///
    /// 对已规范化的数据再次执行结果不变（幂等）
    #[instrument(skip(self, raws), fields(input = raws.len()))]
    pub fn normalize(&self, raws: Vec<RawTaskRecord>) -> NormalizeOutcome {
        let mut report = NormalizeReport {
            input_rows: raws.len(),
            ..Default::default()
        };

        let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
        let mut tasks = Vec::with_capacity(raws.len());

        for raw in raws {
            // 主键列
            let (Some(responsible), Some(domain), Some(activity)) = (
                self.cleaner.clean_text(raw.responsible.as_deref()),
                self.cleaner.clean_text(raw.domain.as_deref()),
                self.cleaner.clean_text(raw.activity.as_deref()),
            ) else {
                report.dropped_missing_keys += 1;
                continue;
            };

            let task = self
                .cleaner
                .clean_text(raw.task.as_deref())
                .unwrap_or_else(|| UNDEFINED_TASK.to_string());

            // 去重（保留首次出现）
            let identity = (
                responsible.clone(),
                domain.clone(),
                activity.clone(),
                task.clone(),
            );
            if !seen.insert(identity) {
                report.duplicates_removed += 1;
                continue;
            }

            let completion_rate = self
                .cleaner
                .parse_completion_rate(raw.completion_rate.as_deref());

            let deadline = self.cleaner.parse_deadline(raw.deadline.as_deref());
            if deadline.is_none() && self.cleaner.clean_text(raw.deadline.as_deref()).is_some() {
                report.unparsed_deadlines += 1;
            }

            let status = match self.cleaner.fold_status(raw.status.as_deref()) {
                StatusFolding::Canonical(status) => status,
                StatusFolding::Folded(status) => {
                    report.statuses_folded += 1;
                    status
                }
                StatusFolding::Unrecognized => {
                    report.statuses_inferred += 1;
                    TaskStatus::from_completion_rate(completion_rate)
                }
            };

            tasks.push(TaskRecord {
                responsible,
                domain,
                activity,
                task,
                deadline,
                completion_rate,
                status,
                progress_note: self.cleaner.clean_text(raw.progress_note.as_deref()),
                row_number: raw.row_number,
            });
        }

        report.output_rows = tasks.len();
        tracing::info!(
            input = report.input_rows,
            output = report.output_rows,
            dropped = report.dropped_missing_keys,
            duplicates = report.duplicates_removed,
            folded = report.statuses_folded,
            inferred = report.statuses_inferred,
            unparsed_deadlines = report.unparsed_deadlines,
            "任务规范化完成"
        );

        NormalizeOutcome { tasks, report }
    }
}

impl Default for TaskNormalizer {
    fn default() -> Self {
        Self::new(DataCleaner::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(
        responsible: &str,
        domain: &str,
        activity: &str,
        task: &str,
        rate: &str,
        status: &str,
    ) -> RawTaskRecord {
        RawTaskRecord {
            responsible: Some(responsible.to_string()),
            domain: Some(domain.to_string()),
            activity: Some(activity.to_string()),
            task: Some(task.to_string()),
            deadline: None,
            completion_rate: Some(rate.to_string()),
            status: Some(status.to_string()),
            progress_note: None,
            row_number: 0,
        }
    }

    #[test]
    fn test_rows_with_missing_keys_dropped() {
        let normalizer = TaskNormalizer::default();
        let outcome = normalizer.normalize(vec![
            raw("Alice", "Health", "Vaccination", "T1", "0", ""),
            raw("nan", "Health", "Vaccination", "T2", "0", ""),
            raw("Alice", " ", "Vaccination", "T3", "0", ""),
            raw("Alice", "Health", "None", "T4", "0", ""),
        ]);

        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.report.dropped_missing_keys, 3);
    }

    #[test]
    fn test_defaults_and_inference() {
        let normalizer = TaskNormalizer::default();
        let outcome = normalizer.normalize(vec![
            raw("Alice", "Health", "A", "", "", ""),
            raw("Alice", "Health", "B", "T", "45", "nan"),
            raw("Alice", "Health", "C", "T", "100", "None"),
        ]);

        let tasks = &outcome.tasks;
        assert_eq!(tasks[0].task, UNDEFINED_TASK);
        assert_eq!(tasks[0].completion_rate, 0.0);
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(tasks[1].status, TaskStatus::InProgress);
        assert_eq!(tasks[2].status, TaskStatus::Completed);
        assert_eq!(outcome.report.statuses_inferred, 3);
    }

    #[test]
    fn test_explicit_status_never_overridden() {
        let normalizer = TaskNormalizer::default();
        let outcome = normalizer.normalize(vec![raw("Alice", "Health", "A", "T", "100", "Pending")]);
        assert_eq!(outcome.tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn test_synonym_folded_and_counted() {
        let normalizer = TaskNormalizer::default();
        let outcome =
            normalizer.normalize(vec![raw("Alice", "Health", "A", "T", "10", "in-progress")]);
        assert_eq!(outcome.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(outcome.report.statuses_folded, 1);
    }

    #[test]
    fn test_deduplication_first_wins() {
        let normalizer = TaskNormalizer::default();
        let outcome = normalizer.normalize(vec![
            raw("Alice", "Health", "A", "T", "100", "Completed"),
            raw(" Alice ", "Health", "A", "T ", "0", "Pending"),
        ]);

        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.tasks[0].status, TaskStatus::Completed);
        assert_eq!(outcome.report.duplicates_removed, 1);
    }

    #[test]
    fn test_undefined_tasks_collapse_under_same_activity() {
        let normalizer = TaskNormalizer::default();
        let outcome = normalizer.normalize(vec![
            raw("Alice", "Health", "A", "", "0", ""),
            raw("Alice", "Health", "A", "None", "50", ""),
        ]);
        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn test_unparsed_deadline_counted() {
        let normalizer = TaskNormalizer::default();
        let mut bad = raw("Alice", "Health", "A", "T1", "0", "");
        bad.deadline = Some("demain".to_string());
        let mut good = raw("Alice", "Health", "A", "T2", "0", "");
        good.deadline = Some("2025-05-01".to_string());

        let outcome = normalizer.normalize(vec![bad, good]);
        assert_eq!(outcome.tasks[0].deadline, None);
        assert_eq!(outcome.tasks[1].deadline, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(outcome.report.unparsed_deadlines, 1);
    }

    #[test]
    fn test_idempotent() {
        let normalizer = TaskNormalizer::default();
        let mut first = raw("Alice", "Health", "A", "", "45,5", "encours");
        first.deadline = Some("45778".to_string());
        let once = normalizer.normalize(vec![
            first,
            raw("Bob", "Education", "B", "T", "", ""),
            raw("Bob", "Education", "B", "T", "100", "Completed"),
        ]);

        let again_input: Vec<RawTaskRecord> = once.tasks.iter().map(RawTaskRecord::from).collect();
        let twice = normalizer.normalize(again_input);

        assert_eq!(twice.tasks, once.tasks);
        assert_eq!(twice.report.dropped_missing_keys, 0);
        assert_eq!(twice.report.duplicates_removed, 0);
    }
}
