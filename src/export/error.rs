// ==========================================
// 活动跟踪看板 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 任一错误发生时目标路径下不留任何文件
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("活动表为空，无法导出")]
    EmptyTable,

    #[error("Excel 写出失败: {0}")]
    XlsxError(String),

    #[error("PDF 写出失败: {0}")]
    PdfError(String),

    #[error("文件写入失败: {0}")]
    Io(String),

    #[error("导出表格式错误: 第 {row} 行 {column} 列 - {message}")]
    MalformedSheet {
        row: usize,
        column: String,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::XlsxError(err.to_string())
    }
}

// 实现 From<printpdf::Error>
impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::PdfError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
