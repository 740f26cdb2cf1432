// ==========================================
// 活动跟踪看板 - 导入层
// ==========================================
// 职责: 外部数据读取 + 规范化，生成 TaskRecord
// 支持: Excel, CSV, 自定义 DatasetSource
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod dataset_source;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod task_normalizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use dataset_source::{DatasetCache, DatasetSource, FileDatasetSource, LoadMode};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use task_normalizer::{NormalizeOutcome, NormalizeReport, TaskNormalizer};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, FieldMapper, FileParser, RawRow, StatusFolding};
