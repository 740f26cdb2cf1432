// ==========================================
// 活动跟踪看板 - PDF 表格布局
// ==========================================
// 纯函数: (标题, 表头, 行文本, 选项) → TableLayout
// 1. 列宽 = 列内最长文本估算宽度 + 内边距，限制在 [最小, 最大]
// 2. 列宽总和超出可用宽度时按比例缩放
// 3. 单元格文本超出列宽时按词换行，超长单词强制拆分
// 4. 分页: 标题仅在第 1 页，表头每页重复，每页至少 1 行
// 5. 单行高于整页可用高度时按文本行拆到后续页（续行标记 continued）
// ==========================================

use crate::export::error::{ExportError, ExportResult};
use serde::Serialize;

/// 点 → 毫米
pub const PT_TO_MM: f32 = 0.352_778;

/// Helvetica 平均字宽约为字号的一半
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

const LINE_HEIGHT_FACTOR: f32 = 1.2;

// ==========================================
// LayoutOptions
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOptions {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub title_font_pt: f32,
    pub body_font_pt: f32,
    pub min_col_width_mm: f32,
    pub max_col_width_mm: f32,
    pub cell_padding_mm: f32,
    /// 页脚前缀（如 "Page"）
    pub footer_prefix: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        // A4 横向
        Self {
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            margin_mm: 12.0,
            title_font_pt: 16.0,
            body_font_pt: 9.0,
            min_col_width_mm: 15.0,
            max_col_width_mm: 60.0,
            cell_padding_mm: 1.5,
            footer_prefix: "Page".to_string(),
        }
    }
}

impl LayoutOptions {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    pub fn line_height_mm(&self) -> f32 {
        self.body_font_pt * PT_TO_MM * LINE_HEIGHT_FACTOR
    }

    pub fn title_block_mm(&self) -> f32 {
        self.title_font_pt * PT_TO_MM * 2.0
    }

    pub fn footer_block_mm(&self) -> f32 {
        self.body_font_pt * PT_TO_MM * 2.0
    }

    fn row_height_mm(&self, line_count: usize) -> f32 {
        line_count.max(1) as f32 * self.line_height_mm() + 2.0 * self.cell_padding_mm
    }
}

// ==========================================
// 文本度量
// ==========================================

/// 估算单行文本宽度（毫米）
pub fn estimate_text_width_mm(text: &str, font_pt: f32) -> f32 {
    text.chars().count() as f32 * font_pt * AVG_CHAR_WIDTH_EM * PT_TO_MM
}

fn max_chars_for(width_mm: f32, font_pt: f32) -> usize {
    let per_char = font_pt * AVG_CHAR_WIDTH_EM * PT_TO_MM;
    if per_char <= 0.0 {
        return usize::MAX;
    }
    // 容差: 按最长文本定宽的列不应把该文本折行
    ((width_mm / per_char + 1e-3).floor() as usize).max(1)
}

/// 按词贪心换行；单词本身超宽时按字符强制拆分
///
/// 空文本返回一个空行
pub fn wrap_text(text: &str, max_width_mm: f32, font_pt: f32) -> Vec<String> {
    let max_chars = max_chars_for(max_width_mm, font_pt);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut rest = word;
        loop {
            let word_len = rest.chars().count();
            let current_len = current.chars().count();
            let needed = if current_len == 0 {
                word_len
            } else {
                current_len + 1 + word_len
            };

            if needed <= max_chars {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(rest);
                break;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }

            // 单词独占一行仍超宽
            let split_at = rest
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            lines.push(rest[..split_at].to_string());
            rest = &rest[split_at..];
            if rest.is_empty() {
                break;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// 计算列宽
pub fn compute_column_widths(
    headers: &[String],
    rows: &[Vec<String>],
    options: &LayoutOptions,
) -> Vec<f32> {
    let mut widths: Vec<f32> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .chain(std::iter::once(header))
                .map(|text| estimate_text_width_mm(text, options.body_font_pt))
                .fold(0.0_f32, f32::max);
            (longest + 2.0 * options.cell_padding_mm)
                .clamp(options.min_col_width_mm, options.max_col_width_mm)
        })
        .collect();

    let total: f32 = widths.iter().sum();
    let available = options.content_width_mm();
    if total > available && total > 0.0 {
        let scale = available / total;
        for width in &mut widths {
            *width *= scale;
        }
    }
    widths
}

// ==========================================
// 布局结果
// ==========================================

/// 已换行的一行（每个单元格若干文本行）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutRow {
    pub cells: Vec<Vec<String>>,
    pub height_mm: f32,
    /// 上一页同一行的延续部分
    pub continued: bool,
}

impl LaidOutRow {
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// 在第 `lines` 个文本行处拆分，返回 (前段, 续段)
    fn split_at_line(self, lines: usize, options: &LayoutOptions) -> (LaidOutRow, LaidOutRow) {
        let mut head_cells = Vec::with_capacity(self.cells.len());
        let mut tail_cells = Vec::with_capacity(self.cells.len());
        for mut cell in self.cells {
            let tail = cell.split_off(lines.min(cell.len()));
            head_cells.push(cell);
            tail_cells.push(tail);
        }

        let head_lines = head_cells.iter().map(Vec::len).max().unwrap_or(0);
        let tail_lines = tail_cells.iter().map(Vec::len).max().unwrap_or(0);
        (
            LaidOutRow {
                cells: head_cells,
                height_mm: options.row_height_mm(head_lines),
                continued: self.continued,
            },
            LaidOutRow {
                cells: tail_cells,
                height_mm: options.row_height_mm(tail_lines),
                continued: true,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    /// 页码（从 1 开始）
    pub number: usize,
    pub show_title: bool,
    pub rows: Vec<LaidOutRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub title: String,
    pub options: LayoutOptions,
    pub column_widths: Vec<f32>,
    pub header_row: LaidOutRow,
    pub pages: Vec<PageLayout>,
}

impl TableLayout {
    /// 计算布局
    ///
    /// 行数为 0 时返回 EmptyTable
    pub fn compute(
        title: &str,
        headers: &[String],
        rows: &[Vec<String>],
        options: &LayoutOptions,
    ) -> ExportResult<Self> {
        if rows.is_empty() {
            return Err(ExportError::EmptyTable);
        }

        let column_widths = compute_column_widths(headers, rows, options);
        let header_row = lay_out_row(headers, &column_widths, options);
        let body_rows: Vec<LaidOutRow> = rows
            .iter()
            .map(|row| lay_out_row(row, &column_widths, options))
            .collect();

        let pages = paginate(body_rows, header_row.height_mm, options);

        Ok(Self {
            title: title.to_string(),
            options: options.clone(),
            column_widths,
            header_row,
            pages,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 数据行数（拆分续段不重复计数）
    pub fn row_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.rows)
            .filter(|r| !r.continued)
            .count()
    }

    /// 页面可用于数据行的高度（不含标题、表头、页脚）
    pub fn body_height_mm(&self, page: &PageLayout) -> f32 {
        let body = page_body_height(self.header_row.height_mm, &self.options);
        if page.show_title {
            body - self.options.title_block_mm()
        } else {
            body
        }
    }

    /// 页脚文本，如 "Page 2 / 5"
    pub fn footer_text(&self, page_number: usize) -> String {
        format!(
            "{} {} / {}",
            self.options.footer_prefix,
            page_number,
            self.page_count()
        )
    }

    /// 标题起始横坐标（居中，不小于页边距）
    pub fn title_x_mm(&self) -> f32 {
        let width = estimate_text_width_mm(&self.title, self.options.title_font_pt);
        ((self.options.page_width_mm - width) / 2.0).max(self.options.margin_mm)
    }

    /// 各列左边界横坐标
    pub fn column_offsets_mm(&self) -> Vec<f32> {
        let mut x = self.options.margin_mm;
        self.column_widths
            .iter()
            .map(|width| {
                let left = x;
                x += width;
                left
            })
            .collect()
    }
}

fn lay_out_row(cells: &[String], widths: &[f32], options: &LayoutOptions) -> LaidOutRow {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(col, width)| {
            let text = cells.get(col).map(String::as_str).unwrap_or("");
            let inner = (width - 2.0 * options.cell_padding_mm).max(0.0);
            wrap_text(text, inner, options.body_font_pt)
        })
        .collect();

    let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    LaidOutRow {
        cells: wrapped,
        height_mm: options.row_height_mm(line_count),
        continued: false,
    }
}

fn page_body_height(header_height: f32, options: &LayoutOptions) -> f32 {
    options.page_height_mm - 2.0 * options.margin_mm - options.footer_block_mm() - header_height
}

/// 给定高度内可容纳的文本行数
fn lines_fitting(height_mm: f32, options: &LayoutOptions) -> usize {
    let usable = height_mm - 2.0 * options.cell_padding_mm;
    let lines = (usable / options.line_height_mm() + 1e-6).floor();
    if lines > 0.0 {
        lines as usize
    } else {
        0
    }
}

fn paginate(rows: Vec<LaidOutRow>, header_height: f32, options: &LayoutOptions) -> Vec<PageLayout> {
    let body_height = page_body_height(header_height, options);

    let mut pages: Vec<PageLayout> = Vec::new();
    let mut current = PageLayout {
        number: 1,
        show_title: true,
        rows: Vec::new(),
    };
    let mut remaining = body_height - options.title_block_mm();

    for row in rows {
        let mut pending = row;
        loop {
            if pending.height_mm <= remaining {
                remaining -= pending.height_mm;
                current.rows.push(pending);
                break;
            }

            // 行高超出整页: 在本页放下能容纳的文本行，其余续到下一页
            let page_empty = current.rows.is_empty();
            if page_empty || pending.line_count() > lines_fitting(body_height, options) {
                let mut fit = lines_fitting(remaining, options);
                if page_empty {
                    // 每页至少放下 1 个文本行
                    fit = fit.max(1);
                }
                if fit >= pending.line_count() {
                    remaining -= pending.height_mm;
                    current.rows.push(pending);
                    break;
                }
                if fit > 0 {
                    let (head, tail) = pending.split_at_line(fit, options);
                    current.rows.push(head);
                    pending = tail;
                }
            }

            let next_number = current.number + 1;
            pages.push(std::mem::replace(
                &mut current,
                PageLayout {
                    number: next_number,
                    show_title: false,
                    rows: Vec::new(),
                },
            ));
            remaining = body_height;
        }
    }

    pages.push(current);
    pages
}
