// ==========================================
// маршрутная карта - 路线卡 API
// ==========================================
// 职责: 串联 加载 → 合并 → 校验 → 构建 → 分页 → 输出
// 约束: 每次调用使用传入的表格快照，不持有缓存
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::RouteCardConfig;
use crate::domain::route::{DocumentInfo, RouteCardDocument};
use crate::domain::table::RawTable;
use crate::engine::{MergeStrategy, MergedTable, ValidationLevel, ValidationMessage};
use crate::i18n::t_with_args;
use crate::importer::{TableParser, UniversalFileParser};
use crate::render::{renderer_for_path, RenderLabels, TextRenderer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

// ==========================================
// BuiltDocument - 构建结果
// ==========================================
#[derive(Debug, Clone)]
pub struct BuiltDocument {
    pub document: RouteCardDocument,
    pub dropped_rows: Vec<usize>,
    pub skipped_duplicates: Vec<usize>,
}

// ==========================================
// GenerationSummary - 生成摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub output: PathBuf,
    pub page_count: usize,
    pub total_rows: usize,
    pub merged_rows: usize,
    pub positional_merge: bool,
    /// 无工序变化且无元件信息而丢弃的合并行
    pub dropped_rows: Vec<usize>,
    /// 按重复位号策略跳过的合并行
    pub skipped_duplicates: Vec<usize>,
    pub advisories: Vec<ValidationMessage>,
}

// ==========================================
// RouteCardApi
// ==========================================
#[derive(Debug, Clone)]
pub struct RouteCardApi {
    config: RouteCardConfig,
}

impl RouteCardApi {
    pub fn new(config: RouteCardConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RouteCardConfig {
        &self.config
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载元件表（Excel / CSV / JSON）
    pub fn load_elements<P: AsRef<Path>>(&self, path: P) -> ApiResult<RawTable> {
        Ok(UniversalFileParser.parse(path.as_ref())?)
    }

    /// 加载工艺表（Proc.txt / Excel / CSV / JSON）
    pub fn load_process<P: AsRef<Path>>(&self, path: P) -> ApiResult<RawTable> {
        Ok(UniversalFileParser.parse(path.as_ref())?)
    }

    // ==========================================
    // 合并与校验
    // ==========================================

    pub fn merge(&self, elements: &RawTable, process: &RawTable) -> ApiResult<MergedTable> {
        Ok(self.config.merger().merge(elements, process)?)
    }

    /// 预检提示（不阻断生成）
    pub fn validate(&self, table: &RawTable) -> Vec<ValidationMessage> {
        self.config.validator().validate(table)
    }

    /// 合并结果的提示: 校验消息 + 按位置合并提醒
    pub fn advisories(&self, merged: &MergedTable) -> Vec<ValidationMessage> {
        let mut messages = self.validate(&merged.table);
        if merged.is_positional() {
            messages.push(ValidationMessage {
                level: ValidationLevel::Warning,
                field: self.config.merge.key.clone(),
                rows: Vec::new(),
                message: t_with_args(
                    "validation.positional_merge",
                    &self.config.locale,
                    &[("key", self.config.merge.key.as_str())],
                ),
            });
        }
        messages
    }

    // ==========================================
    // 构建与输出
    // ==========================================

    /// 构建分页文档；未提供文档信息时使用配置默认值
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn build_document(
        &self,
        table: &RawTable,
        info: Option<DocumentInfo>,
    ) -> ApiResult<BuiltDocument> {
        let outcome = self.config.route_builder().build(table);
        let pages = self.config.paginator()?.paginate(outcome.rows);
        let info = info.unwrap_or_else(|| self.config.default_document_info());

        let document = RouteCardDocument::new(info, pages);
        info!(
            pages = document.page_count(),
            total_rows = document.total_rows,
            "路线卡文档已构建"
        );
        Ok(BuiltDocument {
            document,
            dropped_rows: outcome.dropped_rows,
            skipped_duplicates: outcome.skipped_duplicates,
        })
    }

    /// 按扩展名选择格式输出
    pub fn render(&self, document: &RouteCardDocument, output: &Path) -> ApiResult<()> {
        let renderer = renderer_for_path(output, &self.config.locale)?;
        renderer.render(document, output)?;
        Ok(())
    }

    /// 文本预览
    pub fn preview(&self, table: &RawTable, info: Option<DocumentInfo>) -> ApiResult<String> {
        let built = self.build_document(table, info)?;
        let renderer = TextRenderer::new(RenderLabels::for_locale(&self.config.locale));
        Ok(renderer.render_to_string(&built.document))
    }

    /// 完整流程: 合并 → 校验 → 构建 → 输出
    #[instrument(skip_all, fields(output = %output.display()))]
    pub fn generate(
        &self,
        elements: &RawTable,
        process: &RawTable,
        info: Option<DocumentInfo>,
        output: &Path,
    ) -> ApiResult<GenerationSummary> {
        let merged = self.merge(elements, process)?;
        self.generate_from_merged(&merged, info, output)
    }

    /// 基于已合并表格生成
    pub fn generate_from_merged(
        &self,
        merged: &MergedTable,
        info: Option<DocumentInfo>,
        output: &Path,
    ) -> ApiResult<GenerationSummary> {
        let advisories = self.advisories(merged);
        for advisory in &advisories {
            warn!(field = %advisory.field, "{}", advisory.message);
        }

        let built = self.build_document(&merged.table, info)?;
        self.render(&built.document, output)?;

        Ok(GenerationSummary {
            output: output.to_path_buf(),
            page_count: built.document.page_count(),
            total_rows: built.document.total_rows,
            merged_rows: merged.table.len(),
            positional_merge: matches!(merged.strategy, MergeStrategy::Positional),
            dropped_rows: built.dropped_rows,
            skipped_duplicates: built.skipped_duplicates,
            advisories,
        })
    }
}

impl Default for RouteCardApi {
    fn default() -> Self {
        Self {
            config: RouteCardConfig::default(),
        }
    }
}

/// 解析 CLI / 外部传入的文档信息（空字段回落到默认值）
pub fn document_info_or_default(
    config: &RouteCardConfig,
    product_name: Option<String>,
    designation: Option<String>,
    developer: Option<String>,
    date: Option<String>,
) -> ApiResult<DocumentInfo> {
    let mut info = config.default_document_info();
    if let Some(product) = product_name.filter(|s| !s.trim().is_empty()) {
        info.product_name = product;
    }
    if let Some(designation) = designation {
        info.designation = designation;
    }
    if let Some(developer) = developer {
        info.developer = developer;
    }
    if let Some(date) = date.filter(|s| !s.trim().is_empty()) {
        if date.chars().any(|c| c.is_control()) {
            return Err(ApiError::InvalidInput(format!("日期包含非法字符: {:?}", date)));
        }
        info.date = date;
    }
    Ok(info)
}
