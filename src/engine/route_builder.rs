// ==========================================
// маршрутная карта - 行分类与分组
// ==========================================
// 依据: ГОСТ 3.1118 工序(О)/工步(Т) 行
// 职责: 合并表行 → 有序、带编号的路线卡行
// 规则:
//   1. 工序值变化时插入一行工序（О），紧邻其后的工步之前
//   2. 每个含位号或描述的合并行产生一行工步（Т）
//   3. 工序/工步共享同一个单调递增序号，从不重置
// 实现: 单次左到右 fold，累加器显式携带当前工序与计数器
// ==========================================

use crate::domain::route::RouteRow;
use crate::domain::table::{RawTable, TableRow};
use crate::domain::types::{LogicalField, RowType};
use crate::engine::field_resolver::{FieldResolver, FieldSynonyms, ResolvedField};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// 位号与描述均缺失时的工步名称
pub const ELEMENT_PLACEHOLDER: &str = "Элемент";

/// 数量缺失时的默认值
pub const DEFAULT_QUANTITY: &str = "1";

/// 重复位号处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateDesignatorPolicy {
    /// 每次出现都生成工步（重复贴装）
    #[default]
    Keep,
    /// 仅首次出现生成工步，之后的行记为跳过
    SkipRepeated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteBuildOptions {
    pub synonyms: FieldSynonyms,
    pub element_placeholder: String,
    pub default_quantity: String,
    pub duplicate_designators: DuplicateDesignatorPolicy,
}

impl Default for RouteBuildOptions {
    fn default() -> Self {
        Self {
            synonyms: FieldSynonyms::default(),
            element_placeholder: ELEMENT_PLACEHOLDER.to_string(),
            default_quantity: DEFAULT_QUANTITY.to_string(),
            duplicate_designators: DuplicateDesignatorPolicy::default(),
        }
    }
}

// ==========================================
// RouteBuildOutcome - 构建结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RouteBuildOutcome {
    pub rows: Vec<RouteRow>,
    /// 未产生任何路线卡行的合并行（0 起）
    pub dropped_rows: Vec<usize>,
    /// 因重复位号策略而未生成工步的合并行
    pub skipped_duplicates: Vec<usize>,
    /// 下一个可用序号（最终计数器状态）
    pub next_sequence: usize,
}

impl RouteBuildOutcome {
    pub fn operation_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_operation()).count()
    }

    pub fn transition_count(&self) -> usize {
        self.rows.len() - self.operation_count()
    }
}

// 一行合并数据解析后的逻辑字段
struct ResolvedRow {
    operation: ResolvedField,
    designator: ResolvedField,
    description: ResolvedField,
    quantity: ResolvedField,
    equipment: ResolvedField,
    material: ResolvedField,
}

impl ResolvedRow {
    fn resolve(resolver: &FieldResolver, row: &TableRow) -> Self {
        Self {
            operation: resolver.resolve(row, LogicalField::Operation),
            designator: resolver.resolve(row, LogicalField::Designator),
            description: resolver.resolve(row, LogicalField::Description),
            quantity: resolver.resolve(row, LogicalField::Quantity),
            equipment: resolver.resolve(row, LogicalField::Equipment),
            material: resolver.resolve(row, LogicalField::Material),
        }
    }
}

// fold 累加器
struct RouteAccumulator {
    rows: Vec<RouteRow>,
    dropped_rows: Vec<usize>,
    skipped_duplicates: Vec<usize>,
    current_operation: Option<String>,
    next_sequence: usize,
    seen_designators: HashSet<String>,
}

impl RouteAccumulator {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            dropped_rows: Vec::new(),
            skipped_duplicates: Vec::new(),
            current_operation: None,
            next_sequence: 1,
            seen_designators: HashSet::new(),
        }
    }

    fn emit(&mut self, row_type: RowType, source_row: usize, fill: RowFill) {
        let sequence = self.next_sequence;
        self.rows.push(RouteRow {
            row_type,
            number: RouteRow::format_number(row_type, sequence),
            sequence,
            name: fill.name,
            equipment: fill.equipment,
            material: fill.material,
            time_prep: String::new(),
            time_piece: fill.time_piece,
            source_row,
        });
        self.next_sequence += 1;
    }

    fn finish(self) -> RouteBuildOutcome {
        RouteBuildOutcome {
            rows: self.rows,
            dropped_rows: self.dropped_rows,
            skipped_duplicates: self.skipped_duplicates,
            next_sequence: self.next_sequence,
        }
    }
}

struct RowFill {
    name: String,
    equipment: String,
    material: String,
    time_piece: String,
}

// ==========================================
// RouteBuilder - 路线卡行构建器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    options: RouteBuildOptions,
}

impl RouteBuilder {
    pub fn new(options: RouteBuildOptions) -> Self {
        Self { options }
    }

    /// 构建路线卡行（纯函数: 相同输入得到相同编号与顺序）
    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn build(&self, table: &RawTable) -> RouteBuildOutcome {
        let resolver = FieldResolver::for_columns(table.columns(), &self.options.synonyms);
        debug!(
            operation = ?resolver.candidates(LogicalField::Operation),
            designator = ?resolver.candidates(LogicalField::Designator),
            "字段探测顺序"
        );

        let outcome = table
            .rows()
            .iter()
            .enumerate()
            .fold(RouteAccumulator::new(), |acc, (idx, row)| {
                self.step(acc, &resolver, idx, row)
            })
            .finish();

        info!(
            emitted = outcome.rows.len(),
            operations = outcome.operation_count(),
            dropped = outcome.dropped_rows.len(),
            skipped_duplicates = outcome.skipped_duplicates.len(),
            "路线卡行构建完成"
        );
        outcome
    }

    fn step(
        &self,
        mut acc: RouteAccumulator,
        resolver: &FieldResolver,
        idx: usize,
        row: &TableRow,
    ) -> RouteAccumulator {
        let resolved = ResolvedRow::resolve(resolver, row);
        let mut emitted = false;

        // 1. 工序变化 → 工序行
        if let ResolvedField::Present(operation) = &resolved.operation {
            if acc.current_operation.as_deref() != Some(operation.as_str()) {
                acc.emit(
                    RowType::Operation,
                    idx,
                    RowFill {
                        name: operation.clone(),
                        equipment: resolved.equipment.or_empty(),
                        material: resolved.material.or_empty(),
                        time_piece: String::new(),
                    },
                );
                acc.current_operation = Some(operation.clone());
                emitted = true;
            }
        }

        // 2. 位号或描述存在 → 工步行
        if resolved.designator.is_present() || resolved.description.is_present() {
            let repeated = match (&resolved.designator, self.options.duplicate_designators) {
                (ResolvedField::Present(designator), DuplicateDesignatorPolicy::SkipRepeated) => {
                    !acc.seen_designators.insert(designator.clone())
                }
                _ => false,
            };

            if repeated {
                acc.skipped_duplicates.push(idx);
            } else {
                acc.emit(
                    RowType::Transition,
                    idx,
                    RowFill {
                        name: element_name(
                            resolved.designator.as_deref(),
                            resolved.description.as_deref(),
                            &self.options.element_placeholder,
                        ),
                        equipment: resolved.equipment.or_empty(),
                        material: resolved.material.or_empty(),
                        time_piece: normalize_quantity(
                            resolved.quantity.as_deref(),
                            &self.options.default_quantity,
                        ),
                    },
                );
            }
        } else if !emitted {
            acc.dropped_rows.push(idx);
        }

        acc
    }
}

/// 使用默认选项构建路线卡行
pub fn build_route_rows(table: &RawTable) -> Vec<RouteRow> {
    RouteBuilder::default().build(table).rows
}

/// 工步名称: "位号 - 描述" / 位号 / 描述 / 占位名
pub fn element_name(designator: Option<&str>, description: Option<&str>, placeholder: &str) -> String {
    match (designator, description) {
        (Some(d), Some(desc)) => format!("{} - {}", d, desc),
        (Some(d), None) => d.to_string(),
        (None, Some(desc)) => desc.to_string(),
        (None, None) => placeholder.to_string(),
    }
}

/// 数量规范化: 可解析为浮点数 → 截断取整；否则保留原文；缺失 → 默认值
pub fn normalize_quantity(raw: Option<&str>, default: &str) -> String {
    match raw {
        None => default.to_string(),
        Some(value) => match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => integer_text(n.trunc()),
            _ => value.to_string(),
        },
    }
}

// 整数的十进制全精度文本（不受 i64 范围限制，-0 记为 0）
fn integer_text(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", n)
    }
}
