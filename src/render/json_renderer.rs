// ==========================================
// маршрутная карта - JSON 渲染器
// ==========================================
// 输出完整分页文档（4 空格缩进，UTF-8）
// ==========================================

use crate::domain::route::RouteCardDocument;
use crate::render::{DocumentRenderer, RenderResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub struct JsonRenderer;

impl DocumentRenderer for JsonRenderer {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn render_bytes(&self, document: &RouteCardDocument) -> RenderResult<Vec<u8>> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        document.serialize(&mut serializer)?;
        Ok(buf)
    }
}
