// ==========================================
// 活动跟踪看板 - PDF 导出
// ==========================================
// 先由 TableLayout 计算布局，再用 printpdf 逐页绘制
// 表头: 灰色底 + 粗体；标题: 第 1 页居中；页脚: 页码
// 内置 Helvetica 字体（WinAnsi 编码）
// ==========================================

use crate::config::DashboardConfig;
use crate::domain::{ActivityRecord, ACTIVITY_FIELD_I18N_KEYS};
use crate::export::error::{ExportError, ExportResult};
use crate::export::pdf_layout::{LaidOutRow, LayoutOptions, TableLayout, PT_TO_MM};
use crate::export::scoped_output::persist_atomically;
use crate::i18n::t;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
    Rgb,
};
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";

const LAYER_NAME: &str = "Table";

const HEADER_FILL: (f32, f32, f32) = (0.85, 0.85, 0.85);
const GRID_GREY: f32 = 0.6;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub struct PdfExporter {
    title: String,
    options: LayoutOptions,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(t("report.title"), LayoutOptions::default())
    }
}

impl PdfExporter {
    pub fn new(title: impl Into<String>, options: LayoutOptions) -> Self {
        Self {
            title: title.into(),
            options,
        }
    }

    /// 由看板配置构造（字号、列宽范围、标题）
    pub fn from_config(config: &DashboardConfig) -> Self {
        let options = LayoutOptions {
            title_font_pt: config.pdf_title_font_size as f32,
            body_font_pt: config.pdf_body_font_size as f32,
            min_col_width_mm: config.pdf_min_col_width_mm as f32,
            max_col_width_mm: config.pdf_max_col_width_mm as f32,
            footer_prefix: t("report.page"),
            ..LayoutOptions::default()
        };
        Self::new(config.report_title.clone(), options)
    }

    /// 表头与行文本（本地化表头与状态标签）
    pub fn table_texts(records: &[ActivityRecord]) -> (Vec<String>, Vec<Vec<String>>) {
        let headers = ACTIVITY_FIELD_I18N_KEYS.iter().map(|key| t(key)).collect();
        let rows = records
            .iter()
            .map(|record| {
                let mut texts = record.field_texts();
                if let Some(status) = texts.last_mut() {
                    *status = record.status.label();
                }
                texts
            })
            .collect();
        (headers, rows)
    }

    /// 计算布局（不绘制）
    pub fn layout(&self, records: &[ActivityRecord]) -> ExportResult<TableLayout> {
        if records.is_empty() {
            return Err(ExportError::EmptyTable);
        }
        let (headers, rows) = Self::table_texts(records);
        TableLayout::compute(&self.title, &headers, &rows, &self.options)
    }

    /// 生成 PDF 字节
    pub fn to_bytes(&self, records: &[ActivityRecord]) -> ExportResult<Vec<u8>> {
        let layout = self.layout(records)?;
        let bytes = render(&layout)?;
        tracing::debug!(
            rows = layout.row_count(),
            pages = layout.page_count(),
            bytes = bytes.len(),
            "PDF 报表生成完成"
        );
        Ok(bytes)
    }

    /// 写出到目标路径（失败时不留文件）
    pub fn write_to(&self, records: &[ActivityRecord], dest: &Path) -> ExportResult<()> {
        let bytes = self.to_bytes(records)?;
        persist_atomically(dest, &bytes)?;
        tracing::info!(path = %dest.display(), rows = records.len(), "PDF 报表已导出");
        Ok(())
    }
}

// ==========================================
// 绘制
// ==========================================

fn render(layout: &TableLayout) -> ExportResult<Vec<u8>> {
    let options = &layout.options;
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(options.page_width_mm),
        Mm(options.page_height_mm),
        LAYER_NAME,
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for page in &layout.pages {
        let layer = if page.number == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(
                Mm(options.page_width_mm),
                Mm(options.page_height_mm),
                LAYER_NAME,
            );
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        let mut top = options.page_height_mm - options.margin_mm;

        if page.show_title {
            let baseline = top - options.title_font_pt * PT_TO_MM;
            layer.set_fill_color(black());
            layer.use_text(
                layout.title.as_str(),
                options.title_font_pt,
                Mm(layout.title_x_mm()),
                Mm(baseline),
                &fonts.bold,
            );
            top -= options.title_block_mm();
        }

        draw_row(&layer, layout, &layout.header_row, top, &fonts.bold, true);
        top -= layout.header_row.height_mm;

        for row in &page.rows {
            draw_row(&layer, layout, row, top, &fonts.regular, false);
            top -= row.height_mm;
        }

        layer.set_fill_color(black());
        layer.use_text(
            layout.footer_text(page.number),
            options.body_font_pt,
            Mm(options.margin_mm),
            Mm(options.margin_mm / 2.0),
            &fonts.regular,
        );
    }

    Ok(doc.save_to_bytes()?)
}

fn draw_row(
    layer: &PdfLayerReference,
    layout: &TableLayout,
    row: &LaidOutRow,
    top: f32,
    font: &IndirectFontRef,
    is_header: bool,
) {
    let options = &layout.options;
    let left = options.margin_mm;
    let right = left + layout.column_widths.iter().sum::<f32>();
    let bottom = top - row.height_mm;

    if is_header {
        let (r, g, b) = HEADER_FILL;
        layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        layer.add_rect(
            Rect::new(Mm(left), Mm(bottom), Mm(right), Mm(top)).with_mode(PaintMode::Fill),
        );
    }

    layer.set_fill_color(black());
    let line_height = options.line_height_mm();
    let offsets = layout.column_offsets_mm();
    for (col, lines) in row.cells.iter().enumerate() {
        let x = offsets.get(col).copied().unwrap_or(left) + options.cell_padding_mm;
        for (idx, text) in lines.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            // 基线位于行高的下 3/4 处
            let baseline = top - options.cell_padding_mm - line_height * (idx as f32 + 0.75);
            layer.use_text(text.as_str(), options.body_font_pt, Mm(x), Mm(baseline), font);
        }
    }

    layer.set_outline_color(Color::Rgb(Rgb::new(GRID_GREY, GRID_GREY, GRID_GREY, None)));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(left), Mm(bottom)), false),
            (Point::new(Mm(right), Mm(bottom)), false),
        ],
        is_closed: false,
    });
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}
