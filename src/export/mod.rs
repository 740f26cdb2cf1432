// ==========================================
// 活动跟踪看板 - 导出层
// ==========================================
// 职责: 活动表 → Excel / PDF 报表
// 红线: 空表拒绝导出；任何失败都不在目标目录留下文件
// ==========================================

pub mod error;
pub mod excel_exporter;
pub mod pdf_layout;
pub mod pdf_renderer;
pub mod scoped_output;

pub use error::{ExportError, ExportResult};
pub use excel_exporter::{parse_activity_rows, ExcelExporter, DEFAULT_SHEET_NAME, XLSX_MIME};
pub use pdf_layout::{estimate_text_width_mm, wrap_text, LayoutOptions, TableLayout};
pub use pdf_renderer::{PdfExporter, PDF_MIME};
pub use scoped_output::persist_atomically;
