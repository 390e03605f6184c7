// ==========================================
// маршрутная карта - 渲染层
// ==========================================
// 职责: RouteCardDocument → 输出文件
// 支持: .xlsx / .docx / .json / .csv / .txt
// 约束: 输出先写入同目录临时文件，成功后原子替换
// ==========================================

pub mod csv_renderer;
pub mod docx_renderer;
pub mod json_renderer;
pub mod labels;
pub mod output;
pub mod text_renderer;
pub mod xlsx_renderer;

use crate::domain::route::{RouteCardDocument, RouteRow};
use std::path::Path;
use thiserror::Error;

pub use csv_renderer::CsvRenderer;
pub use docx_renderer::DocxRenderer;
pub use json_renderer::JsonRenderer;
pub use labels::RenderLabels;
pub use output::write_atomic;
pub use text_renderer::TextRenderer;
pub use xlsx_renderer::XlsxRenderer;

// ==========================================
// RenderError - 渲染错误
// ==========================================
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("输出写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel 生成失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Word 文档生成失败: {0}")]
    Docx(String),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV 写出失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("输出格式不支持: {0}（仅支持 .xlsx/.docx/.json/.csv/.txt）")]
    UnsupportedFormat(String),

    #[error("行列超出范围: {0}")]
    OutOfRange(String),
}

/// Result 类型别名
pub type RenderResult<T> = Result<T, RenderError>;

// ==========================================
// DocumentRenderer Trait
// ==========================================
pub trait DocumentRenderer {
    /// 格式名称（用于日志）
    fn format_name(&self) -> &'static str;

    /// 渲染为字节
    fn render_bytes(&self, document: &RouteCardDocument) -> RenderResult<Vec<u8>>;

    /// 渲染并原子写出到目标路径
    fn render(&self, document: &RouteCardDocument, path: &Path) -> RenderResult<()> {
        let bytes = self.render_bytes(document)?;
        write_atomic(path, &bytes)?;
        tracing::info!(
            format = self.format_name(),
            path = %path.display(),
            pages = document.page_count(),
            rows = document.total_rows,
            "路线卡已输出"
        );
        Ok(())
    }
}

/// 根据扩展名选择渲染器
pub fn renderer_for_path(path: &Path, locale: &str) -> RenderResult<Box<dyn DocumentRenderer>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let labels = RenderLabels::for_locale(locale);

    match ext.as_str() {
        "xlsx" => Ok(Box::new(XlsxRenderer::new(labels))),
        "docx" => Ok(Box::new(DocxRenderer::new(labels))),
        "json" => Ok(Box::new(JsonRenderer)),
        "csv" => Ok(Box::new(CsvRenderer::new(labels))),
        "txt" => Ok(Box::new(TextRenderer::new(labels))),
        other => Err(RenderError::UnsupportedFormat(other.to_string())),
    }
}

/// 表格 7 列取值: 类型 / 编号 / 名称 / 设备 / 材料 / Тп.з / Тшт
pub(crate) fn row_cells(row: &RouteRow) -> [String; 7] {
    [
        row.row_type.to_string(),
        row.number.clone(),
        row.name.clone(),
        row.equipment.clone(),
        row.material.clone(),
        row.time_prep.clone(),
        row.time_piece.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_renderer_for_path() {
        let cases = [
            ("card.xlsx", "xlsx"),
            ("card.docx", "docx"),
            ("card.JSON", "json"),
            ("card.csv", "csv"),
            ("card.txt", "txt"),
        ];
        for (file, format) in cases {
            let renderer = renderer_for_path(&PathBuf::from(file), "ru").unwrap();
            assert_eq!(renderer.format_name(), format);
        }
    }

    #[test]
    fn test_unsupported_output() {
        let result = renderer_for_path(Path::new("card.pdf"), "ru");
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(ext)) if ext == "pdf"));
    }
}
