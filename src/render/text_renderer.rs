// ==========================================
// маршрутная карта - 文本预览渲染器
// ==========================================
// 用于命令行预览: 每页表头 + 等宽对齐的 7 列表格
// ==========================================

use crate::domain::route::{RouteCardDocument, RoutePage};
use crate::render::labels::RenderLabels;
use crate::render::{row_cells, DocumentRenderer, RenderResult};
use std::fmt::Write;

pub struct TextRenderer {
    labels: RenderLabels,
}

impl TextRenderer {
    pub fn new(labels: RenderLabels) -> Self {
        Self { labels }
    }

    pub fn render_to_string(&self, document: &RouteCardDocument) -> String {
        let mut out = String::new();
        let labels = &self.labels;
        let info = &document.info;

        if document.is_empty() {
            self.push_first_header(&mut out, document);
            out.push('\n');
            out.push_str(&labels.no_data);
            out.push('\n');
            return out;
        }

        for page in &document.pages {
            if page.is_first() {
                self.push_first_header(&mut out, document);
            } else {
                out.push('\n');
                let _ = writeln!(
                    out,
                    "{}: {} | {}: {}",
                    labels.designation, info.designation, labels.sheet, page.number
                );
                let _ = writeln!(out, "{}", labels.continuation_title);
            }
            out.push('\n');
            self.push_table(&mut out, page);
        }

        out
    }

    fn push_first_header(&self, out: &mut String, document: &RouteCardDocument) {
        let labels = &self.labels;
        let info = &document.info;
        let _ = writeln!(out, "{}", labels.title);
        let _ = writeln!(out, "{}: {}", labels.product_name, info.product_name);
        let _ = writeln!(
            out,
            "{}: {} | {}: 1",
            labels.designation, info.designation, labels.sheet
        );
        let _ = writeln!(
            out,
            "{}: {} | {}: {}",
            labels.developer, info.developer, labels.date, info.date
        );
    }

    fn push_table(&self, out: &mut String, page: &RoutePage) {
        let rows: Vec<[String; 7]> = page.rows.iter().map(row_cells).collect();

        let mut widths = [0usize; 7];
        for cells in std::iter::once(&self.labels.columns).chain(rows.iter()) {
            for (width, cell) in widths.iter_mut().zip(cells.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut push_line = |cells: &[String; 7]| {
            let line: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| pad(cell, width))
                .collect();
            let _ = writeln!(out, "{}", line.join(" | ").trim_end());
        };

        push_line(&self.labels.columns);
        for cells in &rows {
            push_line(cells);
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(RenderLabels::default())
    }
}

impl DocumentRenderer for TextRenderer {
    fn format_name(&self) -> &'static str {
        "txt"
    }

    fn render_bytes(&self, document: &RouteCardDocument) -> RenderResult<Vec<u8>> {
        Ok(self.render_to_string(document).into_bytes())
    }
}
