// ==========================================
// маршрутная карта - 表格合并器
// ==========================================
// 职责: 元件表 + 工艺表 → 合并表
// 规则: 两表均含合并键 → 外连接；否则按位置拼接列
// 约束: 不对合并键去重，重复键产生笛卡尔积行
// ==========================================

use crate::domain::table::{CellValue, RawTable, TableRow};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// 默认合并键
pub const DEFAULT_MERGE_KEY: &str = "Designator";

/// 同名列的元件侧后缀
pub const ELEMENTS_SUFFIX: &str = "_elem";

/// 同名列的工艺侧后缀
pub const PROCESS_SUFFIX: &str = "_proc";

// ==========================================
// 合并策略配置
// ==========================================

/// 缺少共同合并键时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionalFallback {
    /// 无条件按位置拼接（行数不一致时短表补空）
    Allow,
    /// 行数一致时按位置拼接，否则报错
    #[default]
    AllowEqualLength,
    /// 拒绝按位置拼接
    Reject,
}

/// 外连接结果行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOrder {
    /// 元件表顺序，仅工艺表存在的行追加在末尾
    #[default]
    ElementsFirst,
    /// 按合并键字典序，空键行置于末尾
    SortedByKey,
}

/// 实际采用的合并方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    KeyedOuterJoin { key: String },
    Positional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub key: String,
    pub positional_fallback: PositionalFallback,
    pub join_order: JoinOrder,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_MERGE_KEY.to_string(),
            positional_fallback: PositionalFallback::default(),
            join_order: JoinOrder::default(),
        }
    }
}

impl MergeOptions {
    /// 宽松模式: 任何情况下都允许按位置拼接
    pub fn permissive() -> Self {
        Self {
            positional_fallback: PositionalFallback::Allow,
            ..Self::default()
        }
    }
}

// ==========================================
// MergedTable - 合并结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub table: RawTable,
    pub strategy: MergeStrategy,
    pub elements_rows: usize,
    pub process_rows: usize,
}

impl MergedTable {
    pub fn is_positional(&self) -> bool {
        self.strategy == MergeStrategy::Positional
    }

    /// 按位置拼接且两表行数不一致（结果可能错位）
    pub fn is_misaligned(&self) -> bool {
        self.is_positional() && self.elements_rows != self.process_rows
    }
}

/// 使用默认合并键、宽松策略合并
pub fn merge(elements: &RawTable, process: &RawTable) -> MergedTable {
    // 宽松策略不做拦截，直接执行
    Merger::new(MergeOptions::permissive()).execute(elements, process)
}

// ==========================================
// Merger - 合并器
// ==========================================
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    #[instrument(skip_all, fields(key = %self.options.key))]
    pub fn merge(&self, elements: &RawTable, process: &RawTable) -> EngineResult<MergedTable> {
        self.check_positional(elements, process)?;
        Ok(self.execute(elements, process))
    }

    fn is_keyed(&self, elements: &RawTable, process: &RawTable) -> bool {
        elements.has_column(&self.options.key) && process.has_column(&self.options.key)
    }

    /// 按位置拼接的策略检查（外连接总是放行）
    fn check_positional(&self, elements: &RawTable, process: &RawTable) -> EngineResult<()> {
        if self.is_keyed(elements, process) {
            return Ok(());
        }
        match self.options.positional_fallback {
            PositionalFallback::Reject => Err(EngineError::PositionalMergeRejected {
                key: self.options.key.clone(),
            }),
            PositionalFallback::AllowEqualLength if elements.len() != process.len() => {
                Err(EngineError::RowCountMismatch {
                    elements: elements.len(),
                    process: process.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn execute(&self, elements: &RawTable, process: &RawTable) -> MergedTable {
        if self.is_keyed(elements, process) {
            let merged =
                keyed_outer_join(elements, process, &self.options.key, self.options.join_order);
            info!(
                elements = elements.len(),
                process = process.len(),
                merged = merged.table.len(),
                "按合并键外连接完成"
            );
            return merged;
        }

        if elements.len() != process.len() {
            warn!(
                elements = elements.len(),
                process = process.len(),
                "按位置合并行数不一致，结果可能错位"
            );
        }
        let merged = positional_concat(elements, process);
        info!(merged = merged.table.len(), "按位置合并完成");
        merged
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(MergeOptions::default())
    }
}

// ==========================================
// 列名映射（同名列加侧后缀）
// ==========================================
struct ColumnPlan {
    columns: Vec<String>,
    left: Vec<(String, String)>,  // (源列, 合并列)
    right: Vec<(String, String)>,
}

fn plan_columns(elements: &RawTable, process: &RawTable, key: Option<&str>) -> ColumnPlan {
    let left_names: HashSet<&str> = elements.columns().iter().map(String::as_str).collect();
    let right_names: HashSet<&str> = process.columns().iter().map(String::as_str).collect();

    let mut columns = Vec::new();
    let mut left = Vec::new();
    let mut right = Vec::new();

    for col in elements.columns() {
        let target = if Some(col.as_str()) == key {
            col.clone()
        } else if right_names.contains(col.as_str()) {
            format!("{}{}", col, ELEMENTS_SUFFIX)
        } else {
            col.clone()
        };
        columns.push(target.clone());
        left.push((col.clone(), target));
    }

    for col in process.columns() {
        if Some(col.as_str()) == key {
            // 合并键只保留一列（取值见 combine_rows）
            continue;
        }
        let target = if left_names.contains(col.as_str()) {
            format!("{}{}", col, PROCESS_SUFFIX)
        } else {
            col.clone()
        };
        columns.push(target.clone());
        right.push((col.clone(), target));
    }

    ColumnPlan {
        columns,
        left,
        right,
    }
}

fn combine_rows(
    plan: &ColumnPlan,
    key: Option<&str>,
    left: Option<&TableRow>,
    right: Option<&TableRow>,
) -> TableRow {
    let mut row = TableRow::with_capacity(plan.columns.len());

    for (src, target) in &plan.left {
        let value = left
            .and_then(|r| r.get(src))
            .cloned()
            .unwrap_or(CellValue::Empty);
        row.insert(target.clone(), value);
    }

    for (src, target) in &plan.right {
        let value = right
            .and_then(|r| r.get(src))
            .cloned()
            .unwrap_or(CellValue::Empty);
        row.insert(target.clone(), value);
    }

    // 仅工艺表存在的行，合并键取工艺表的值
    if let (Some(key), None, Some(right)) = (key, left, right) {
        let value = right.get(key).cloned().unwrap_or(CellValue::Empty);
        row.insert(key.to_string(), value);
    }

    row
}

fn key_of(row: &TableRow, key: &str) -> Option<String> {
    row.get(key).and_then(CellValue::as_text)
}

fn keyed_outer_join(
    elements: &RawTable,
    process: &RawTable,
    key: &str,
    order: JoinOrder,
) -> MergedTable {
    let plan = plan_columns(elements, process, Some(key));
    let mut merged = RawTable::new(plan.columns.clone());

    match order {
        JoinOrder::ElementsFirst => {
            let mut index: HashMap<String, Vec<usize>> = HashMap::new();
            for (idx, row) in process.rows().iter().enumerate() {
                if let Some(k) = key_of(row, key) {
                    index.entry(k).or_default().push(idx);
                }
            }

            let mut matched = vec![false; process.len()];
            for left in elements.rows() {
                let partners = key_of(left, key).and_then(|k| index.get(&k));
                match partners {
                    Some(partners) => {
                        for &j in partners {
                            matched[j] = true;
                            merged.push_row(combine_rows(
                                &plan,
                                Some(key),
                                Some(left),
                                process.row(j),
                            ));
                        }
                    }
                    None => merged.push_row(combine_rows(&plan, Some(key), Some(left), None)),
                }
            }

            for (j, right) in process.rows().iter().enumerate() {
                if !matched[j] {
                    merged.push_row(combine_rows(&plan, Some(key), None, Some(right)));
                }
            }
        }
        JoinOrder::SortedByKey => {
            let mut groups: BTreeMap<String, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
            let mut blank_left = Vec::new();
            let mut blank_right = Vec::new();

            for (i, row) in elements.rows().iter().enumerate() {
                match key_of(row, key) {
                    Some(k) => groups.entry(k).or_default().0.push(i),
                    None => blank_left.push(i),
                }
            }
            for (j, row) in process.rows().iter().enumerate() {
                match key_of(row, key) {
                    Some(k) => groups.entry(k).or_default().1.push(j),
                    None => blank_right.push(j),
                }
            }

            for (lefts, rights) in groups.values() {
                if rights.is_empty() {
                    for &i in lefts {
                        merged.push_row(combine_rows(&plan, Some(key), elements.row(i), None));
                    }
                } else if lefts.is_empty() {
                    for &j in rights {
                        merged.push_row(combine_rows(&plan, Some(key), None, process.row(j)));
                    }
                } else {
                    for &i in lefts {
                        for &j in rights {
                            merged.push_row(combine_rows(
                                &plan,
                                Some(key),
                                elements.row(i),
                                process.row(j),
                            ));
                        }
                    }
                }
            }

            for i in blank_left {
                merged.push_row(combine_rows(&plan, Some(key), elements.row(i), None));
            }
            for j in blank_right {
                merged.push_row(combine_rows(&plan, Some(key), None, process.row(j)));
            }
        }
    }

    debug!(columns = merged.columns().len(), "外连接列规划完成");

    MergedTable {
        table: merged,
        strategy: MergeStrategy::KeyedOuterJoin {
            key: key.to_string(),
        },
        elements_rows: elements.len(),
        process_rows: process.len(),
    }
}

fn positional_concat(elements: &RawTable, process: &RawTable) -> MergedTable {
    let plan = plan_columns(elements, process, None);
    let mut merged = RawTable::new(plan.columns.clone());

    let total = elements.len().max(process.len());
    for i in 0..total {
        merged.push_row(combine_rows(&plan, None, elements.row(i), process.row(i)));
    }

    MergedTable {
        table: merged,
        strategy: MergeStrategy::Positional,
        elements_rows: elements.len(),
        process_rows: process.len(),
    }
}
