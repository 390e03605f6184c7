// ==========================================
// маршрутная карта - Word 渲染器
// ==========================================
// 依据: ГОСТ 3.1118，A4 纵向
//   - 首页 (Форма 4): 标题 + 信息表 + 7 列工艺表
//   - 续页 (Форма 3б): 图号/页码 + 续页标题 + 7 列工艺表
// 分页之间插入分页符；无数据时输出首页 + "无数据"提示
// ==========================================

use crate::domain::route::{DocumentInfo, RouteCardDocument, RoutePage};
use crate::render::labels::RenderLabels;
use crate::render::{row_cells, DocumentRenderer, RenderError, RenderResult};
use docx_rs::{
    AlignmentType, BreakType, Docx, PageMargin, Paragraph, Run, Table, TableCell,
    TableRow as DocxRow,
};
use std::io::Cursor;
use tracing::debug;

// A4 (twips)
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;

// 页边距: 左 2 cm, 右 1 cm, 上下 1.5 cm
const MARGIN_LEFT: i32 = 1134;
const MARGIN_RIGHT: i32 = 567;
const MARGIN_VERTICAL: i32 = 850;

/// 7 列列宽 (twips)
const COLUMN_WIDTHS: [usize; 7] = [450, 700, 4100, 1700, 1700, 775, 775];

/// 字号 (半磅)
const TITLE_SIZE: usize = 28;
const TEXT_SIZE: usize = 20;

fn text_run(text: &str) -> Run {
    Run::new().add_text(text).size(TEXT_SIZE)
}

fn cell(text: &str, bold: bool, span: usize) -> TableCell {
    let run = if bold { text_run(text).bold() } else { text_run(text) };
    let cell = TableCell::new().add_paragraph(Paragraph::new().add_run(run));
    if span > 1 {
        cell.grid_span(span)
    } else {
        cell
    }
}

fn title(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text).bold().size(TITLE_SIZE))
        .align(AlignmentType::Center)
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

pub struct DocxRenderer {
    labels: RenderLabels,
}

impl DocxRenderer {
    pub fn new(labels: RenderLabels) -> Self {
        Self { labels }
    }

    /// 构建 Word 文档（未打包）
    pub fn build_docx(&self, document: &RouteCardDocument) -> Docx {
        let mut docx = Docx::new().page_size(PAGE_WIDTH, PAGE_HEIGHT).page_margin(
            PageMargin::new()
                .top(MARGIN_VERTICAL)
                .bottom(MARGIN_VERTICAL)
                .left(MARGIN_LEFT)
                .right(MARGIN_RIGHT),
        );

        if document.is_empty() {
            docx = self.add_first_header(docx, &document.info);
            return docx.add_paragraph(
                Paragraph::new().add_run(text_run(&self.labels.no_data).italic()),
            );
        }

        for (idx, page) in document.pages.iter().enumerate() {
            if idx > 0 {
                docx = docx.add_paragraph(page_break());
            }
            docx = if page.is_first() {
                self.add_first_header(docx, &document.info)
            } else {
                self.add_continuation_header(docx, &document.info, page.number)
            };
            docx = docx.add_table(self.route_table(page));
            debug!(page = page.number, rows = page.rows.len(), "Word 页已写入");
        }

        docx
    }

    /// 标签 | 值(2 列) | 标签(2 列) | 值(2 列)
    fn info_row(cells: [&str; 4]) -> DocxRow {
        DocxRow::new(vec![
            cell(cells[0], true, 1),
            cell(cells[1], false, 2),
            cell(cells[2], true, 2),
            cell(cells[3], false, 2),
        ])
    }

    fn add_first_header(&self, docx: Docx, info: &DocumentInfo) -> Docx {
        let labels = &self.labels;
        let rows = vec![
            DocxRow::new(vec![
                cell(&labels.product_name, true, 1),
                cell(&info.product_name, false, 6),
            ]),
            Self::info_row([&labels.designation, &info.designation, &labels.sheet, "1"]),
            Self::info_row([&labels.developer, &info.developer, &labels.date, &info.date]),
            Self::info_row([&labels.checked, "", &labels.date, ""]),
        ];

        docx.add_paragraph(title(&labels.title))
            .add_table(Table::new(rows).set_grid(COLUMN_WIDTHS.to_vec()))
            .add_paragraph(Paragraph::new())
    }

    fn add_continuation_header(&self, docx: Docx, info: &DocumentInfo, page_number: usize) -> Docx {
        let labels = &self.labels;
        let page = page_number.to_string();
        let rows = vec![Self::info_row([
            &labels.designation,
            &info.designation,
            &labels.sheet,
            &page,
        ])];

        docx.add_table(Table::new(rows).set_grid(COLUMN_WIDTHS.to_vec()))
            .add_paragraph(title(&labels.continuation_title))
    }

    fn route_table(&self, page: &RoutePage) -> Table {
        let header = DocxRow::new(
            self.labels
                .columns
                .iter()
                .map(|name| cell(name, true, 1))
                .collect(),
        );

        let rows = std::iter::once(header)
            .chain(page.rows.iter().map(|route_row| {
                DocxRow::new(
                    row_cells(route_row)
                        .iter()
                        .map(|value| cell(value, false, 1))
                        .collect(),
                )
            }))
            .collect();

        Table::new(rows).set_grid(COLUMN_WIDTHS.to_vec())
    }
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self::new(RenderLabels::default())
    }
}

impl DocumentRenderer for DocxRenderer {
    fn format_name(&self) -> &'static str {
        "docx"
    }

    fn render_bytes(&self, document: &RouteCardDocument) -> RenderResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.build_docx(document)
            .build()
            .pack(&mut buffer)
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteRow;
    use crate::domain::types::{PageKind, RowType};
    use std::io::Read;
    use tempfile::TempDir;

    fn transition(seq: usize) -> RouteRow {
        RouteRow {
            row_type: RowType::Transition,
            number: RouteRow::format_number(RowType::Transition, seq),
            sequence: seq,
            name: format!("R{}", seq),
            equipment: String::new(),
            material: String::new(),
            time_prep: String::new(),
            time_piece: "1".to_string(),
            source_row: seq - 1,
        }
    }

    fn info() -> DocumentInfo {
        DocumentInfo {
            product_name: "Плата".to_string(),
            designation: "АБВГ.001".to_string(),
            developer: "Иванов".to_string(),
            date: "01.02.2024".to_string(),
        }
    }

    fn document_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_page_break_between_pages() {
        let pages = vec![
            RoutePage { number: 1, kind: PageKind::First, rows: vec![transition(1)] },
            RoutePage { number: 2, kind: PageKind::Continuation, rows: vec![transition(2)] },
            RoutePage { number: 3, kind: PageKind::Continuation, rows: vec![transition(3)] },
        ];
        let document = RouteCardDocument::new(info(), pages);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("card.docx");
        DocxRenderer::default().render(&document, &path).unwrap();

        let xml = document_xml(&std::fs::read(&path).unwrap());
        assert_eq!(xml.matches("w:type=\"page\"").count(), 2);
        assert!(xml.contains("МАРШРУТНАЯ КАРТА"));
        assert!(xml.contains("АБВГ.001"));
        assert!(xml.contains("Т03"));
    }

    #[test]
    fn test_empty_document_has_no_data_text() {
        let document = RouteCardDocument::new(info(), Vec::new());
        let bytes = DocxRenderer::default().render_bytes(&document).unwrap();

        let xml = document_xml(&bytes);
        assert!(xml.contains("Нет данных для отображения"));
        assert!(!xml.contains("w:type=\"page\""));
    }
}
