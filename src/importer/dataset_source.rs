// ==========================================
// 活动跟踪看板 - 数据源与缓存文件
// ==========================================
// 数据源: 外部列表服务（不在本仓库实现）或本地文件，统一为 DatasetSource
// 缓存: 固定路径的单个 xlsx 文件，保存最近一次成功加载的原始数据集
// - LoadMode::Cached: 读取缓存
// - LoadMode::Fresh: 从数据源拉取后整体覆盖缓存
// ==========================================

use crate::domain::RawTaskRecord;
use crate::export::scoped_output::persist_atomically;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::columns::RAW_COLUMNS;
use crate::importer::file_parser::{ExcelParser, UniversalFileParser};
use crate::importer::importer_trait::{FileParser, RawRow};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 缓存文件工作表名
pub const CACHE_SHEET_NAME: &str = "Data";

// ==========================================
// LoadMode - 加载模式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadMode {
    Cached, // 使用上次缓存的数据集
    Fresh,  // 从数据源重新拉取
}

// ==========================================
// DatasetSource Trait
// ==========================================
// 实现者: FileDatasetSource（远程列表客户端由外部提供）
pub trait DatasetSource {
    /// 数据源描述（日志用）
    fn describe(&self) -> String;

    /// 拉取完整原始数据集
    ///
    /// 失败即整体失败，不返回部分数据；
    /// 远程实现在连接、认证或服务端错误时返回 ImportError::SourceUnavailable
    fn fetch(&self) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FileDatasetSource - 本地文件数据源
// ==========================================
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileDatasetSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch(&self) -> ImportResult<Vec<RawRow>> {
        UniversalFileParser.parse(&self.path)
    }
}

// ==========================================
// DatasetCache - 原始数据缓存文件
// ==========================================
pub struct DatasetCache {
    path: PathBuf,
}

impl DatasetCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// 缓存文件最后修改时间（界面显示"最近数据集"时间）
    pub fn last_modified(&self) -> Option<DateTime<Local>> {
        let modified = std::fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified))
    }

    /// 读取缓存文件
    pub fn load(&self) -> ImportResult<Vec<RawRow>> {
        if !self.exists() {
            return Err(ImportError::FileNotFound(self.path.display().to_string()));
        }
        ExcelParser.parse_to_raw_records(&self.path)
    }

    /// 整体覆盖缓存文件
    ///
    /// 先写入同目录临时文件再原子替换；失败时不留下临时文件，旧缓存保持不变
    pub fn store(&self, records: &[RawTaskRecord]) -> ImportResult<()> {
        let bytes = Self::build_workbook(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        persist_atomically(&self.path, &bytes)
            .map_err(|e| ImportError::CacheWriteError(e.to_string()))?;

        tracing::info!(path = %self.path.display(), rows = records.len(), "缓存文件已更新");
        Ok(())
    }

    fn build_workbook(records: &[RawTaskRecord]) -> ImportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(CACHE_SHEET_NAME)?;

        for (col, header) in RAW_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            let values = [
                &record.responsible,
                &record.domain,
                &record.activity,
                &record.task,
                &record.deadline,
                &record.progress_note,
                &record.completion_rate,
                &record.status,
            ];
            for (col, value) in values.iter().enumerate() {
                if let Some(text) = value.as_deref() {
                    worksheet.write_string(row, col as u16, text)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}
