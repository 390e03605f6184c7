// ==========================================
// маршрутная карта - 编辑会话
// ==========================================
// 职责: 持有元件表/工艺表，缓存合并结果
// 约束: 任一表格被修改后合并缓存立即失效
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::route_card_api::{GenerationSummary, RouteCardApi};
use crate::domain::route::DocumentInfo;
use crate::domain::table::{CellValue, RawTable, TableRow};
use crate::engine::{MergedTable, ValidationMessage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 编辑目标表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSide {
    Elements,
    Process,
}

#[derive(Debug, Clone, Default)]
pub struct RouteCardSession {
    api: RouteCardApi,
    elements: Option<RawTable>,
    process: Option<RawTable>,
    merged: Option<MergedTable>,
}

impl RouteCardSession {
    pub fn new(api: RouteCardApi) -> Self {
        Self {
            api,
            elements: None,
            process: None,
            merged: None,
        }
    }

    pub fn api(&self) -> &RouteCardApi {
        &self.api
    }

    // ==========================================
    // 加载 / 替换
    // ==========================================

    pub fn load_elements<P: AsRef<Path>>(&mut self, path: P) -> ApiResult<&RawTable> {
        let table = self.api.load_elements(path)?;
        self.set_table(TableSide::Elements, table);
        self.require(TableSide::Elements)
    }

    pub fn load_process<P: AsRef<Path>>(&mut self, path: P) -> ApiResult<&RawTable> {
        let table = self.api.load_process(path)?;
        self.set_table(TableSide::Process, table);
        self.require(TableSide::Process)
    }

    pub fn set_table(&mut self, side: TableSide, table: RawTable) {
        *self.slot(side) = Some(table);
        self.invalidate();
    }

    pub fn table(&self, side: TableSide) -> Option<&RawTable> {
        match side {
            TableSide::Elements => self.elements.as_ref(),
            TableSide::Process => self.process.as_ref(),
        }
    }

    // ==========================================
    // 编辑（每次编辑都会使合并缓存失效）
    // ==========================================

    pub fn set_cell(
        &mut self,
        side: TableSide,
        row: usize,
        column: &str,
        value: CellValue,
    ) -> ApiResult<()> {
        self.edit(side, |table| table.set_cell(row, column, value))
    }

    pub fn push_row(&mut self, side: TableSide, row: TableRow) -> ApiResult<()> {
        self.edit(side, |table| {
            table.push_row(row);
            Ok(())
        })
    }

    pub fn insert_row(&mut self, side: TableSide, index: usize, row: TableRow) -> ApiResult<()> {
        self.edit(side, |table| table.insert_row(index, row))
    }

    pub fn remove_row(&mut self, side: TableSide, index: usize) -> ApiResult<TableRow> {
        self.edit(side, |table| table.remove_row(index))
    }

    pub fn add_column(&mut self, side: TableSide, name: &str) -> ApiResult<()> {
        self.edit(side, |table| {
            table.add_column(name);
            Ok(())
        })
    }

    // ==========================================
    // 合并缓存
    // ==========================================

    pub fn is_merge_cached(&self) -> bool {
        self.merged.is_some()
    }

    pub fn invalidate(&mut self) {
        if self.merged.take().is_some() {
            debug!("合并缓存已失效");
        }
    }

    /// 合并结果（两表均已加载时可用）
    pub fn merged(&mut self) -> ApiResult<&MergedTable> {
        if self.merged.is_none() {
            let elements = self.require(TableSide::Elements)?;
            let process = self.require(TableSide::Process)?;
            let merged = self.api.merge(elements, process)?;
            self.merged = Some(merged);
        }
        self.merged
            .as_ref()
            .ok_or_else(|| ApiError::InternalError("合并缓存不可用".to_string()))
    }

    pub fn advisories(&mut self) -> ApiResult<Vec<ValidationMessage>> {
        let merged = self.merged()?.clone();
        Ok(self.api.advisories(&merged))
    }

    pub fn preview(&mut self, info: Option<DocumentInfo>) -> ApiResult<String> {
        let table = self.merged()?.table.clone();
        self.api.preview(&table, info)
    }

    pub fn generate(
        &mut self,
        info: Option<DocumentInfo>,
        output: &Path,
    ) -> ApiResult<GenerationSummary> {
        let merged = self.merged()?.clone();
        self.api.generate_from_merged(&merged, info, output)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn slot(&mut self, side: TableSide) -> &mut Option<RawTable> {
        match side {
            TableSide::Elements => &mut self.elements,
            TableSide::Process => &mut self.process,
        }
    }

    fn require(&self, side: TableSide) -> ApiResult<&RawTable> {
        self.table(side).ok_or_else(|| {
            ApiError::InvalidInput(match side {
                TableSide::Elements => "元件表未加载".to_string(),
                TableSide::Process => "工艺表未加载".to_string(),
            })
        })
    }

    fn edit<T, F>(&mut self, side: TableSide, op: F) -> ApiResult<T>
    where
        F: FnOnce(&mut RawTable) -> Result<T, crate::domain::table::TableEditError>,
    {
        let table = self.slot(side).as_mut().ok_or_else(|| {
            ApiError::InvalidInput(format!("{:?} 表未加载", side))
        })?;
        let result = op(table)?;
        self.invalidate();
        Ok(result)
    }
}
