// ==========================================
// 活动跟踪看板 - 看板 API
// ==========================================
// 职责: 串联 加载 → 规范化 → 聚合 → 视图 → 导出
// 架构: API 层 → 导入层 (TaskNormalizer) / 引擎层 / 导出层
// 状态: 已加载数据集只读，重新加载时整体替换
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::DashboardConfig;
use crate::domain::{ActivityRecord, FilterCriteria, FilterOptions, RawTaskRecord, TaskRecord, TaskStatus};
use crate::engine::{
    ActivityAggregator, AggregateOutcome, ChartBuilder, GroupedCount, KpiSummary,
    OverdueClassifier, OverdueReport, ValueBar,
};
use crate::export::{ExcelExporter, PdfExporter, PDF_MIME, XLSX_MIME};
use crate::importer::FieldMapper as _;
use crate::importer::{
    DataCleanerImpl, DatasetCache, DatasetSource, FieldMapperImpl, FileDatasetSource, ImportError,
    LoadMode, NormalizeReport, RawRow, TaskNormalizer,
};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

// ==========================================
// 视图数据结构
// ==========================================

/// 一次筛选对应的完整看板视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub today: NaiveDate,
    pub activities: Vec<ActivityRecord>,
    pub kpi: KpiSummary,
    pub overdue: OverdueReport,
    pub by_domain: Vec<GroupedCount>,
    pub by_responsible: Vec<GroupedCount>,
    /// 全部任务均为未定义任务时不显示
    pub by_status: Option<Vec<(TaskStatus, usize)>>,
    pub completion_by_activity: Vec<ValueBar>,
    pub overdue_bars: Vec<ValueBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewOutcome {
    Ready(Box<DashboardView>),
    /// 筛选后无数据（非错误）
    NoData,
}

impl ViewOutcome {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            ViewOutcome::Ready(view) => Some(view),
            ViewOutcome::NoData => None,
        }
    }
}

/// 已导出文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub mime: &'static str,
}

struct LoadedDataset {
    tasks: Vec<TaskRecord>,
    report: NormalizeReport,
    mode: LoadMode,
}

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi {
    config: DashboardConfig,
    normalizer: TaskNormalizer,
    aggregator: ActivityAggregator,
    charts: ChartBuilder,
    cache: DatasetCache,
    dataset: Option<LoadedDataset>,
    export_seq: AtomicU64,
}

impl DashboardApi {
    pub fn new(config: DashboardConfig) -> Self {
        let normalizer = TaskNormalizer::new(DataCleanerImpl::new(config.status_synonyms.clone()));
        let cache = DatasetCache::new(config.cache_file_path.clone());
        let charts = ChartBuilder::new(config.label_max_len);

        Self {
            config,
            normalizer,
            aggregator: ActivityAggregator::new(),
            charts,
            cache,
            dataset: None,
            export_seq: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// 缓存数据集的时间（界面显示"最近数据集"）
    pub fn cache_last_modified(&self) -> Option<DateTime<Local>> {
        self.cache.last_modified()
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载数据集
    ///
    /// - Cached: 读取缓存文件
    /// - Fresh: 从 source 拉取，校验通过后整体覆盖缓存
    ///
    /// 任一步骤失败即整体失败，之前已加载的数据集保持不变
    pub fn load_dataset(
        &mut self,
        mode: LoadMode,
        source: Option<&dyn DatasetSource>,
    ) -> ApiResult<&NormalizeReport> {
        let rows = match mode {
            LoadMode::Cached => {
                tracing::info!(path = %self.cache.path().display(), "读取缓存数据集");
                self.cache.load()?
            }
            LoadMode::Fresh => {
                let source = source.ok_or_else(|| {
                    ApiError::InvalidInput("Fresh 模式必须提供数据源".to_string())
                })?;
                tracing::info!(source = %source.describe(), "从数据源拉取数据集");
                source.fetch()?
            }
        };

        Self::validate_rows(&rows)?;
        let raws = self.map_rows(&rows);

        if mode == LoadMode::Fresh {
            // 缓存写入失败不影响本次加载
            if let Err(e) = self.cache.store(&raws) {
                tracing::warn!(error = %e, "缓存文件更新失败，继续使用已拉取的数据");
            }
        }

        Ok(self.install(raws, mode))
    }

    /// 从本地文件加载（Fresh）
    pub fn load_from_file(&mut self, path: &Path) -> ApiResult<&NormalizeReport> {
        let source = FileDatasetSource::new(path);
        self.load_dataset(LoadMode::Fresh, Some(&source as &dyn DatasetSource))
    }

    /// 从已解析的行加载（不读写缓存）
    pub fn load_from_rows(&mut self, rows: &[RawRow]) -> ApiResult<&NormalizeReport> {
        Self::validate_rows(rows)?;
        let raws = self.map_rows(rows);
        Ok(self.install(raws, LoadMode::Fresh))
    }

    fn validate_rows(rows: &[RawRow]) -> ApiResult<()> {
        if rows.is_empty() {
            return Err(ImportError::EmptyDataset("数据源未返回任何行".to_string()).into());
        }
        let missing = FieldMapperImpl.missing_mandatory_columns(rows);
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing).into());
        }
        Ok(())
    }

    fn map_rows(&self, rows: &[RawRow]) -> Vec<RawTaskRecord> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.normalizer.mapper().map_to_raw_task(row, idx + 1))
            .collect()
    }

    fn install(&mut self, raws: Vec<RawTaskRecord>, mode: LoadMode) -> &NormalizeReport {
        let outcome = self.normalizer.normalize(raws);
        let dataset = self.dataset.insert(LoadedDataset {
            tasks: outcome.tasks,
            report: outcome.report,
            mode,
        });
        &dataset.report
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn load_mode(&self) -> Option<LoadMode> {
        self.dataset.as_ref().map(|d| d.mode)
    }

    pub fn tasks(&self) -> ApiResult<&[TaskRecord]> {
        self.dataset
            .as_ref()
            .map(|d| d.tasks.as_slice())
            .ok_or(ApiError::DatasetNotLoaded)
    }

    pub fn normalize_report(&self) -> ApiResult<&NormalizeReport> {
        self.dataset
            .as_ref()
            .map(|d| &d.report)
            .ok_or(ApiError::DatasetNotLoaded)
    }

    /// 筛选项（来自全部已加载任务）
    pub fn filter_options(&self) -> ApiResult<FilterOptions> {
        Ok(FilterOptions::from_tasks(self.tasks()?))
    }

    /// 聚合（不含视图）
    pub fn aggregate(&self, filter: &FilterCriteria) -> ApiResult<AggregateOutcome> {
        Ok(self.aggregator.aggregate(self.tasks()?, filter))
    }

    /// 构建看板视图
    pub fn build_view(&self, filter: &FilterCriteria, today: NaiveDate) -> ApiResult<ViewOutcome> {
        let tasks = self.tasks()?;
        let activities = match self.aggregator.aggregate(tasks, filter) {
            AggregateOutcome::Activities(records) => records,
            AggregateOutcome::NoData => return Ok(ViewOutcome::NoData),
        };

        let classifier = OverdueClassifier::new(today);
        let overdue = classifier.overdue_report(&activities);
        let show_status =
            ChartBuilder::has_defined_tasks(tasks.iter().filter(|t| filter.matches(t)));

        let view = DashboardView {
            today,
            kpi: KpiSummary::compute(&activities, &classifier),
            by_domain: self.charts.by_domain(&activities),
            by_responsible: self.charts.by_responsible(&activities),
            by_status: show_status.then(|| self.charts.by_status(&activities)),
            completion_by_activity: self.charts.completion_by_activity(&activities),
            overdue_bars: self.charts.overdue_bars(&overdue.activities),
            overdue,
            activities,
        };

        tracing::debug!(
            activities = view.activities.len(),
            overdue = view.kpi.overdue,
            "看板视图构建完成"
        );
        Ok(ViewOutcome::Ready(Box::new(view)))
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出 Excel 到目录（文件名按序号生成）
    pub fn export_excel(&self, records: &[ActivityRecord], out_dir: &Path) -> ApiResult<ExportArtifact> {
        let path = self.next_export_path(out_dir, "xlsx")?;
        ExcelExporter::new(self.config.export_sheet_name.clone()).write_to(records, &path)?;
        Ok(ExportArtifact {
            path,
            mime: XLSX_MIME,
        })
    }

    /// 导出 PDF 到目录（文件名按序号生成）
    pub fn export_pdf(&self, records: &[ActivityRecord], out_dir: &Path) -> ApiResult<ExportArtifact> {
        let path = self.next_export_path(out_dir, "pdf")?;
        PdfExporter::from_config(&self.config).write_to(records, &path)?;
        Ok(ExportArtifact {
            path,
            mime: PDF_MIME,
        })
    }

    /// 下一个导出文件路径
    ///
    /// 序号在进程内递增；目录中已存在的文件（如上次运行的导出）会被跳过，不会被覆盖
    fn next_export_path(&self, out_dir: &Path, extension: &str) -> ApiResult<PathBuf> {
        if !out_dir.is_dir() {
            return Err(ApiError::InvalidInput(format!(
                "导出目录不存在: {}",
                out_dir.display()
            )));
        }
        loop {
            let seq = self.export_seq.fetch_add(1, Ordering::Relaxed);
            let path = out_dir.join(format!("activites_{seq:04}.{extension}"));
            if !path.exists() {
                return Ok(path);
            }
            tracing::debug!(path = %path.display(), "导出文件已存在，跳过该序号");
        }
    }
}
