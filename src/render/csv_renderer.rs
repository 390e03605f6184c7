// ==========================================
// маршрутная карта - CSV 渲染器
// ==========================================
// 每个路线卡行一条记录，首列为页码
// ==========================================

use crate::domain::route::RouteCardDocument;
use crate::render::labels::RenderLabels;
use crate::render::{row_cells, DocumentRenderer, RenderResult};
use csv::Writer;

pub struct CsvRenderer {
    labels: RenderLabels,
}

impl CsvRenderer {
    pub fn new(labels: RenderLabels) -> Self {
        Self { labels }
    }
}

impl DocumentRenderer for CsvRenderer {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn render_bytes(&self, document: &RouteCardDocument) -> RenderResult<Vec<u8>> {
        let mut writer = Writer::from_writer(Vec::new());

        let mut header = vec![self.labels.page.as_str()];
        header.extend(self.labels.columns.iter().map(String::as_str));
        writer.write_record(&header)?;

        for page in &document.pages {
            let page_number = page.number.to_string();
            for row in &page.rows {
                let cells = row_cells(row);
                let mut record = vec![page_number.as_str()];
                record.extend(cells.iter().map(String::as_str));
                writer.write_record(&record)?;
            }
        }

        writer.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::{DocumentInfo, RoutePage, RouteRow};
    use crate::domain::types::{PageKind, RowType};

    #[test]
    fn test_one_line_per_row_with_page() {
        let row = |seq: usize| RouteRow {
            row_type: RowType::Transition,
            number: RouteRow::format_number(RowType::Transition, seq),
            sequence: seq,
            name: format!("R{} - Resistor", seq),
            equipment: String::new(),
            material: String::new(),
            time_prep: String::new(),
            time_piece: "2".to_string(),
            source_row: seq,
        };
        let pages = vec![
            RoutePage { number: 1, kind: PageKind::First, rows: vec![row(1)] },
            RoutePage { number: 2, kind: PageKind::Continuation, rows: vec![row(2)] },
        ];
        let document = RouteCardDocument::new(DocumentInfo::default(), pages);

        let bytes = CsvRenderer::new(RenderLabels::for_locale("en")).render_bytes(&document).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,Т,Т01,R1 - Resistor,,,,2");
        assert_eq!(lines[2], "2,Т,Т02,R2 - Resistor,,,,2");
    }
}
