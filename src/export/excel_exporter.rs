// ==========================================
// 活动跟踪看板 - Excel 导出
// ==========================================
// 单个工作表，表头 = 活动字段名，每个活动一行
// 计数与完成率写为数值；截止日期写为 YYYY-MM-DD 文本（无时区）
// ==========================================

use crate::domain::{ActivityRecord, TaskStatus, ACTIVITY_FIELDS};
use crate::export::error::{ExportError, ExportResult};
use crate::export::scoped_output::persist_atomically;
use crate::importer::RawRow;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const DEFAULT_SHEET_NAME: &str = "Activites";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ExcelExporter {
    sheet_name: String,
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

impl ExcelExporter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// 生成 xlsx 字节
    pub fn to_bytes(&self, records: &[ActivityRecord]) -> ExportResult<Vec<u8>> {
        if records.is_empty() {
            return Err(ExportError::EmptyTable);
        }

        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&self.sheet_name)?;

        let header_format = Format::new().set_bold();
        for (col, header) in ACTIVITY_FIELDS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, &record.responsible)?;
            worksheet.write_string(row, 1, &record.domain)?;
            worksheet.write_string(row, 2, &record.activity)?;
            worksheet.write_number(row, 3, f64::from(record.total_tasks))?;
            worksheet.write_number(row, 4, f64::from(record.completed_tasks))?;
            worksheet.write_number(row, 5, f64::from(record.in_progress_tasks))?;
            worksheet.write_number(row, 6, f64::from(record.pending_tasks))?;
            worksheet.write_number(row, 7, record.completion_rate)?;
            if let Some(deadline) = record.latest_deadline {
                worksheet.write_string(row, 8, deadline.format(DATE_FORMAT).to_string())?;
            }
            worksheet.write_string(row, 9, record.status.as_str())?;
        }

        workbook.push_worksheet(worksheet);
        let buffer = workbook.save_to_buffer()?;

        tracing::debug!(rows = records.len(), bytes = buffer.len(), "Excel 报表生成完成");
        Ok(buffer)
    }

    /// 写出到目标路径（失败时不留文件）
    pub fn write_to(&self, records: &[ActivityRecord], dest: &Path) -> ExportResult<()> {
        let bytes = self.to_bytes(records)?;
        persist_atomically(dest, &bytes)?;
        tracing::info!(path = %dest.display(), rows = records.len(), "Excel 报表已导出");
        Ok(())
    }
}

// ==========================================
// 导出表回读
// ==========================================

/// 将导出表的行解析回活动记录（行号从 1 开始，不含表头）
pub fn parse_activity_rows(rows: &[RawRow]) -> ExportResult<Vec<ActivityRecord>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| parse_activity_row(row, idx + 1))
        .collect()
}

fn parse_activity_row(row: &RawRow, row_number: usize) -> ExportResult<ActivityRecord> {
    let text = |column: &str| row.get(column).map(|v| v.trim()).unwrap_or("");

    let malformed = |column: &str, message: String| ExportError::MalformedSheet {
        row: row_number,
        column: column.to_string(),
        message,
    };

    let count = |column: &str| -> ExportResult<u32> {
        let raw = text(column);
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u32)
            .ok_or_else(|| malformed(column, format!("非法计数 '{raw}'")))
    };

    let rate_raw = text("CompletionRate");
    let completion_rate = rate_raw
        .parse::<f64>()
        .map_err(|_| malformed("CompletionRate", format!("非法完成率 '{rate_raw}'")))?;

    let deadline_raw = text("LatestDeadline");
    let latest_deadline = if deadline_raw.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(deadline_raw, DATE_FORMAT)
                .map_err(|e| malformed("LatestDeadline", e.to_string()))?,
        )
    };

    let status_raw = text("Status");
    let status = status_raw
        .parse::<TaskStatus>()
        .map_err(|e| malformed("Status", e))?;

    Ok(ActivityRecord {
        responsible: text("Responsible").to_string(),
        domain: text("Domain").to_string(),
        activity: text("Activity").to_string(),
        total_tasks: count("TotalTasks")?,
        completed_tasks: count("CompletedTasks")?,
        in_progress_tasks: count("InProgressTasks")?,
        pending_tasks: count("PendingTasks")?,
        completion_rate,
        latest_deadline,
        status,
    })
}
