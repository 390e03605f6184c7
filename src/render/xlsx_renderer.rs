// ==========================================
// маршрутная карта - Excel 渲染器
// ==========================================
// 依据: ГОСТ 3.1118
//   - 首页 (Форма 4): 标题 + 产品/图号/页码/编制/日期/审核 信息块
//   - 续页 (Форма 3б): 图号/页码 + 续页标题
//   - 每页: 7 列工艺表
// 每个分页对应一个工作表；无数据时输出首页 + "无数据"提示
// ==========================================

use crate::domain::route::{DocumentInfo, RouteCardDocument, RoutePage};
use crate::render::labels::RenderLabels;
use crate::render::{row_cells, DocumentRenderer, RenderError, RenderResult};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

/// 7 列列宽
const COLUMN_WIDTHS: [f64; 7] = [6.0, 8.0, 48.0, 22.0, 22.0, 8.0, 8.0];

const LAST_COL: u16 = 6;

struct SheetFormats {
    title: Format,
    label: Format,
    value: Format,
    header: Format,
    cell: Format,
    text: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let bordered = Format::new().set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center),
            label: bordered.clone().set_bold(),
            value: bordered.clone(),
            header: bordered
                .clone()
                .set_bold()
                .set_text_wrap()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            cell: bordered.set_text_wrap(),
            text: Format::new().set_italic(),
        }
    }
}

fn row_num(idx: usize) -> RenderResult<u32> {
    u32::try_from(idx).map_err(|_| RenderError::OutOfRange(format!("row {}", idx)))
}

pub struct XlsxRenderer {
    labels: RenderLabels,
}

impl XlsxRenderer {
    pub fn new(labels: RenderLabels) -> Self {
        Self { labels }
    }

    /// 构建工作簿（未写盘）
    pub fn build_workbook(&self, document: &RouteCardDocument) -> RenderResult<Workbook> {
        let mut workbook = Workbook::new();
        let formats = SheetFormats::new();

        if document.is_empty() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(self.sheet_name(1))?;
            let next = self.write_first_header(worksheet, &formats, &document.info)?;
            worksheet.write_string_with_format(next, 0, &self.labels.no_data, &formats.text)?;
            return Ok(workbook);
        }

        for page in &document.pages {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(self.sheet_name(page.number))?;

            let next = if page.is_first() {
                self.write_first_header(worksheet, &formats, &document.info)?
            } else {
                self.write_continuation_header(worksheet, &formats, &document.info, page.number)?
            };
            self.write_route_table(worksheet, &formats, page, next)?;
            debug!(page = page.number, rows = page.rows.len(), "工作表已写入");
        }

        Ok(workbook)
    }

    fn sheet_name(&self, page: usize) -> String {
        format!("{} {}", self.labels.sheet, page)
    }

    /// 标签 | 值(2 列) | 标签(2 列) | 值(2 列)
    fn write_info_row(
        worksheet: &mut Worksheet,
        formats: &SheetFormats,
        row: u32,
        cells: [&str; 4],
    ) -> RenderResult<()> {
        worksheet.write_string_with_format(row, 0, cells[0], &formats.label)?;
        worksheet.merge_range(row, 1, row, 2, cells[1], &formats.value)?;
        worksheet.merge_range(row, 3, row, 4, cells[2], &formats.label)?;
        worksheet.merge_range(row, 5, row, LAST_COL, cells[3], &formats.value)?;
        Ok(())
    }

    /// 首页表头，返回表格起始行
    fn write_first_header(
        &self,
        worksheet: &mut Worksheet,
        formats: &SheetFormats,
        info: &DocumentInfo,
    ) -> RenderResult<u32> {
        let labels = &self.labels;
        worksheet.merge_range(0, 0, 0, LAST_COL, &labels.title, &formats.title)?;

        worksheet.write_string_with_format(1, 0, &labels.product_name, &formats.label)?;
        worksheet.merge_range(1, 1, 1, LAST_COL, &info.product_name, &formats.value)?;

        Self::write_info_row(
            worksheet,
            formats,
            2,
            [&labels.designation, &info.designation, &labels.sheet, "1"],
        )?;
        Self::write_info_row(
            worksheet,
            formats,
            3,
            [&labels.developer, &info.developer, &labels.date, &info.date],
        )?;
        Self::write_info_row(worksheet, formats, 4, [&labels.checked, "", &labels.date, ""])?;

        Ok(6)
    }

    /// 续页表头，返回表格起始行
    fn write_continuation_header(
        &self,
        worksheet: &mut Worksheet,
        formats: &SheetFormats,
        info: &DocumentInfo,
        page_number: usize,
    ) -> RenderResult<u32> {
        let labels = &self.labels;
        let page = page_number.to_string();
        Self::write_info_row(
            worksheet,
            formats,
            0,
            [&labels.designation, &info.designation, &labels.sheet, &page],
        )?;
        worksheet.merge_range(1, 0, 1, LAST_COL, &labels.continuation_title, &formats.title)?;

        Ok(3)
    }

    fn write_route_table(
        &self,
        worksheet: &mut Worksheet,
        formats: &SheetFormats,
        page: &RoutePage,
        start_row: u32,
    ) -> RenderResult<()> {
        for (col, (title, width)) in self.labels.columns.iter().zip(COLUMN_WIDTHS).enumerate() {
            let col = col as u16;
            worksheet.set_column_width(col, width)?;
            worksheet.write_string_with_format(start_row, col, title, &formats.header)?;
        }

        for (offset, route_row) in page.rows.iter().enumerate() {
            let row = start_row + 1 + row_num(offset)?;
            for (col, value) in row_cells(route_row).iter().enumerate() {
                worksheet.write_string_with_format(row, col as u16, value, &formats.cell)?;
            }
        }

        Ok(())
    }
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self::new(RenderLabels::default())
    }
}

impl DocumentRenderer for XlsxRenderer {
    fn format_name(&self) -> &'static str {
        "xlsx"
    }

    fn render_bytes(&self, document: &RouteCardDocument) -> RenderResult<Vec<u8>> {
        let mut workbook = self.build_workbook(document)?;
        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteRow;
    use crate::domain::types::{PageKind, RowType};
    use calamine::{open_workbook_auto, Reader};
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

    #[test]
    fn test_one_sheet_per_page() {
        let pages = vec![
            RoutePage { number: 1, kind: PageKind::First, rows: vec![transition(1)] },
            RoutePage { number: 2, kind: PageKind::Continuation, rows: vec![transition(2)] },
        ];
        let document = RouteCardDocument::new(info(), pages);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("card.xlsx");
        XlsxRenderer::default().render(&document, &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), ["Лист 1", "Лист 2"]);

        let first = workbook.worksheet_range("Лист 1").unwrap();
        assert_eq!(first.get_value((0, 0)).unwrap().to_string(), "МАРШРУТНАЯ КАРТА");
        assert_eq!(first.get_value((7, 1)).unwrap().to_string(), "Т01");

        let second = workbook.worksheet_range("Лист 2").unwrap();
        assert_eq!(second.get_value((0, 5)).unwrap().to_string(), "2");
        assert_eq!(second.get_value((4, 2)).unwrap().to_string(), "R2");
    }

    #[test]
    fn test_empty_document_has_no_data_sheet() {
        let document = RouteCardDocument::new(info(), Vec::new());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.xlsx");
        XlsxRenderer::default().render(&document, &path).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names().len(), 1);
        let range = workbook.worksheet_range("Лист 1").unwrap();
        assert_eq!(
            range.get_value((6, 0)).unwrap().to_string(),
            "Нет данных для отображения"
        );
    }
}
