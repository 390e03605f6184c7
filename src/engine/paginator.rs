// ==========================================
// маршрутная карта - 分页器
// ==========================================
// 依据: ГОСТ 3.1118 Форма 4（首页）/ Форма 3б（续页）
// 规则: 首页容量 C1，续页容量 C2；严格按原顺序填充，不拆行不重排
// ==========================================

use crate::domain::route::{RoutePage, RouteRow};
use crate::domain::types::PageKind;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

/// 首页行数
pub const FIRST_PAGE_CAPACITY: usize = 15;

/// 续页行数
pub const CONTINUATION_PAGE_CAPACITY: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    first_capacity: usize,
    continuation_capacity: usize,
}

impl Paginator {
    pub fn new(first_capacity: usize, continuation_capacity: usize) -> EngineResult<Self> {
        if first_capacity == 0 {
            return Err(EngineError::InvalidCapacity {
                field: "first_page_capacity".to_string(),
            });
        }
        if continuation_capacity == 0 {
            return Err(EngineError::InvalidCapacity {
                field: "continuation_page_capacity".to_string(),
            });
        }
        Ok(Self {
            first_capacity,
            continuation_capacity,
        })
    }

    pub fn first_capacity(&self) -> usize {
        self.first_capacity
    }

    pub fn continuation_capacity(&self) -> usize {
        self.continuation_capacity
    }

    /// 给定行数需要的总页数（0 行 → 0 页）
    pub fn page_count(&self, rows: usize) -> usize {
        if rows == 0 {
            return 0;
        }
        let rest = rows.saturating_sub(self.first_capacity);
        1 + rest.div_ceil(self.continuation_capacity)
    }

    pub fn paginate(&self, rows: Vec<RouteRow>) -> Vec<RoutePage> {
        let total = rows.len();
        let mut pages = Vec::with_capacity(self.page_count(total));
        let mut remaining = rows.into_iter();

        let first: Vec<RouteRow> = remaining.by_ref().take(self.first_capacity).collect();
        if first.is_empty() {
            return pages;
        }
        pages.push(RoutePage {
            number: 1,
            kind: PageKind::First,
            rows: first,
        });

        loop {
            let chunk: Vec<RouteRow> = remaining
                .by_ref()
                .take(self.continuation_capacity)
                .collect();
            if chunk.is_empty() {
                break;
            }
            pages.push(RoutePage {
                number: pages.len() + 1,
                kind: PageKind::Continuation,
                rows: chunk,
            });
        }

        debug!(rows = total, pages = pages.len(), "分页完成");
        pages
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            first_capacity: FIRST_PAGE_CAPACITY,
            continuation_capacity: CONTINUATION_PAGE_CAPACITY,
        }
    }
}

/// 按指定容量分页
pub fn paginate(
    rows: Vec<RouteRow>,
    first_capacity: usize,
    continuation_capacity: usize,
) -> EngineResult<Vec<RoutePage>> {
    Ok(Paginator::new(first_capacity, continuation_capacity)?.paginate(rows))
}
