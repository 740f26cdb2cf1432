// ==========================================
// 活动跟踪看板 - 数据清洗器实现
// ==========================================
// 阶段 2: TRIM / NULL 标准化 / 状态同义词折叠 / 数值与日期解析
// 红线: 单元格级别的脏数据一律降级为默认值，不抛错
// ==========================================

use crate::config::default_status_synonyms;
use crate::domain::TaskStatus;
use crate::importer::importer_trait::{DataCleaner as DataCleanerTrait, StatusFolding};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

/// 视为空值的字面量（比较时忽略大小写）
pub const NULL_TOKENS: [&str; 3] = ["", "none", "nan"];

/// 纯日期格式（按顺序尝试）
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// 日期时间格式（时间部分被丢弃）
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
];

/// Excel 序列日期的合理范围（1954-10-03 ~ 2173 年）
///
/// 下限排除纯年份（如 "2025"）与小整数，避免被误读为 1900 年代的日期
const EXCEL_SERIAL_RANGE: std::ops::Range<f64> = 20_000.0..100_000.0;

/// 是否为空值字面量
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    NULL_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

pub struct DataCleaner {
    synonyms: BTreeMap<String, TaskStatus>,
    synonyms_lower: HashMap<String, TaskStatus>,
}

impl DataCleaner {
    /// 使用给定同义词表创建清洗器
    pub fn new(synonyms: BTreeMap<String, TaskStatus>) -> Self {
        let synonyms: BTreeMap<String, TaskStatus> = synonyms
            .into_iter()
            .map(|(k, v)| (k.trim().to_string(), v))
            .collect();
        let synonyms_lower = synonyms
            .iter()
            .map(|(k, v)| (k.to_lowercase(), *v))
            .collect();

        Self {
            synonyms,
            synonyms_lower,
        }
    }

    pub fn synonyms(&self) -> &BTreeMap<String, TaskStatus> {
        &self.synonyms
    }

    /// Excel 序列号 → 日期（1899-12-30 起算）
    fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
        if !EXCEL_SERIAL_RANGE.contains(&serial) {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        epoch.checked_add_signed(Duration::days(serial.floor() as i64))
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(default_status_synonyms())
    }
}

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            if is_null_token(v) {
                None
            } else {
                Some(v.trim().to_string())
            }
        })
    }

    fn fold_status(&self, value: Option<&str>) -> StatusFolding {
        let Some(raw) = self.clean_text(value) else {
            return StatusFolding::Unrecognized;
        };

        if let Ok(status) = raw.parse::<TaskStatus>() {
            return StatusFolding::Canonical(status);
        }

        if let Some(status) = self.synonyms.get(&raw) {
            return StatusFolding::Folded(*status);
        }

        match self.synonyms_lower.get(&raw.to_lowercase()) {
            Some(status) => StatusFolding::Folded(*status),
            None => {
                tracing::debug!(raw_status = %raw, "无法识别的状态值，将按完成率推断");
                StatusFolding::Unrecognized
            }
        }
    }

    fn parse_completion_rate(&self, value: Option<&str>) -> f64 {
        let Some(raw) = self.clean_text(value) else {
            return 0.0;
        };

        let normalized = raw.trim_end_matches('%').trim().replace(',', ".");
        match normalized.parse::<f64>() {
            Ok(rate) if rate.is_finite() => rate.clamp(0.0, 100.0),
            _ => {
                tracing::debug!(raw_rate = %raw, "完成率无法解析，按 0 处理");
                0.0
            }
        }
    }

    fn parse_deadline(&self, value: Option<&str>) -> Option<NaiveDate> {
        let raw = self.clean_text(value)?;

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&raw, format) {
                return Some(date);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, format) {
                return Some(dt.date());
            }
        }

        // 带时区偏移：取所述偏移下的日期，丢弃偏移
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Some(dt.date_naive());
        }

        // Excel 序列日期（单元格为日期类型时读取为数字）
        if let Ok(serial) = raw.parse::<f64>() {
            return Self::excel_serial_to_date(serial);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clean_text_null_tokens() {
        let cleaner = DataCleaner::default();
        assert_eq!(cleaner.clean_text(Some("  hello  ")), Some("hello".to_string()));
        assert_eq!(cleaner.clean_text(Some("   ")), None);
        assert_eq!(cleaner.clean_text(Some("None")), None);
        assert_eq!(cleaner.clean_text(Some("nan")), None);
        assert_eq!(cleaner.clean_text(Some(" NaN ")), None);
        assert_eq!(cleaner.clean_text(None), None);
        assert_eq!(cleaner.clean_text(Some("Nancy")), Some("Nancy".to_string()));
    }

    #[test]
    fn test_fold_status() {
        let cleaner = DataCleaner::default();
        assert_eq!(
            cleaner.fold_status(Some("Completed")),
            StatusFolding::Canonical(TaskStatus::Completed)
        );
        assert_eq!(
            cleaner.fold_status(Some("In progress (executing)")),
            StatusFolding::Folded(TaskStatus::InProgress)
        );
        assert_eq!(
            cleaner.fold_status(Some("IN-PROGRESS")),
            StatusFolding::Folded(TaskStatus::InProgress)
        );
        assert_eq!(
            cleaner.fold_status(Some(" encours ")),
            StatusFolding::Folded(TaskStatus::InProgress)
        );
        assert_eq!(cleaner.fold_status(Some("???")), StatusFolding::Unrecognized);
        assert_eq!(cleaner.fold_status(Some("NaN")), StatusFolding::Unrecognized);
    }

    #[test]
    fn test_fold_status_custom_table() {
        let mut table = BTreeMap::new();
        table.insert("Fait".to_string(), TaskStatus::Completed);
        let cleaner = DataCleaner::new(table);

        assert_eq!(cleaner.fold_status(Some("fait")).status(), Some(TaskStatus::Completed));
        // 默认表不再生效
        assert_eq!(cleaner.fold_status(Some("encours")), StatusFolding::Unrecognized);
    }

    #[test]
    fn test_parse_completion_rate() {
        let cleaner = DataCleaner::default();
        assert_eq!(cleaner.parse_completion_rate(None), 0.0);
        assert_eq!(cleaner.parse_completion_rate(Some("nan")), 0.0);
        assert_eq!(cleaner.parse_completion_rate(Some("45")), 45.0);
        assert_eq!(cleaner.parse_completion_rate(Some("45.5")), 45.5);
        assert_eq!(cleaner.parse_completion_rate(Some("45,5")), 45.5);
        assert_eq!(cleaner.parse_completion_rate(Some("80 %")), 80.0);
        assert_eq!(cleaner.parse_completion_rate(Some("150")), 100.0);
        assert_eq!(cleaner.parse_completion_rate(Some("-3")), 0.0);
        assert_eq!(cleaner.parse_completion_rate(Some("abc")), 0.0);
        assert_eq!(cleaner.parse_completion_rate(Some("inf")), 0.0);
    }

    #[test]
    fn test_parse_deadline_formats() {
        let cleaner = DataCleaner::default();
        assert_eq!(cleaner.parse_deadline(Some("2025-05-01")), Some(date(2025, 5, 1)));
        assert_eq!(cleaner.parse_deadline(Some("20250501")), Some(date(2025, 5, 1)));
        assert_eq!(cleaner.parse_deadline(Some("01/05/2025")), Some(date(2025, 5, 1)));
        assert_eq!(
            cleaner.parse_deadline(Some("2025-05-01 17:30:00")),
            Some(date(2025, 5, 1))
        );
        assert_eq!(
            cleaner.parse_deadline(Some("2025-05-01T23:00:00+02:00")),
            Some(date(2025, 5, 1))
        );
        assert_eq!(
            cleaner.parse_deadline(Some("2025-04-30T22:00:00Z")),
            Some(date(2025, 4, 30))
        );
    }

    #[test]
    fn test_parse_deadline_excel_serial() {
        let cleaner = DataCleaner::default();
        // 45778 = 2025-05-01
        assert_eq!(cleaner.parse_deadline(Some("45778")), Some(date(2025, 5, 1)));
        assert_eq!(cleaner.parse_deadline(Some("45778.75")), Some(date(2025, 5, 1)));
        assert_eq!(cleaner.parse_deadline(Some("20000")), Some(date(1954, 10, 3)));
    }

    #[test]
    fn test_parse_deadline_year_only_is_none() {
        let cleaner = DataCleaner::default();
        assert_eq!(cleaner.parse_deadline(Some("2025")), None);
        assert_eq!(cleaner.parse_deadline(Some("12")), None);
        assert_eq!(cleaner.parse_deadline(Some("19999")), None);
    }

    #[test]
    fn test_parse_deadline_unparsable_is_none() {
        let cleaner = DataCleaner::default();
        assert_eq!(cleaner.parse_deadline(Some("bientôt")), None);
        assert_eq!(cleaner.parse_deadline(Some("NaT")), None);
        assert_eq!(cleaner.parse_deadline(Some("2025-13-45")), None);
        assert_eq!(cleaner.parse_deadline(Some("-5")), None);
        assert_eq!(cleaner.parse_deadline(None), None);
    }
}
