//! 表格交互状态
//!
//! 由单个表格外壳独占：排序、全局过滤、隐藏列和分页。

use std::collections::HashSet;

/// 默认每页行数
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    pub column_id: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    /// 排序列表，第一个是主排序，其余用于打破平局
    pub sorting: Vec<ColumnSort>,
    pub global_filter: String,
    pub hidden_columns: HashSet<String>,
    pub page_index: usize,
    page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    /// 页大小至少为 1
    pub fn new(page_size: usize) -> Self {
        Self {
            sorting: Vec::new(),
            global_filter: String::new(),
            hidden_columns: HashSet::new(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|sort| sort.column_id == column_id)
            .map(|sort| sort.direction)
    }

    /// 切换单列排序：升序 -> 降序 -> 不排序
    ///
    /// 切换到另一列时替换原有排序。
    pub fn toggle_sort(&mut self, column_id: &str) {
        let next = match self.sort_direction(column_id) {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
        self.sorting.clear();
        if let Some(direction) = next {
            self.sorting.push(ColumnSort {
                column_id: column_id.to_string(),
                direction,
            });
        }
    }

    /// 直接设置单列排序
    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) {
        self.sorting = vec![ColumnSort {
            column_id: column_id.to_string(),
            direction,
        }];
    }

    /// 追加一个次级排序（已存在则更新方向）
    pub fn add_sort(&mut self, column_id: &str, direction: SortDirection) {
        match self.sorting.iter_mut().find(|sort| sort.column_id == column_id) {
            Some(sort) => sort.direction = direction,
            None => self.sorting.push(ColumnSort {
                column_id: column_id.to_string(),
                direction,
            }),
        }
    }

    pub fn clear_sort(&mut self) {
        self.sorting.clear();
    }

    /// 修改过滤条件后回到第一页
    pub fn set_global_filter(&mut self, filter: impl Into<String>) {
        self.global_filter = filter.into();
        self.page_index = 0;
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.hidden_columns.contains(column_id)
    }

    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) {
        if visible {
            self.hidden_columns.remove(column_id);
        } else {
            self.hidden_columns.insert(column_id.to_string());
        }
    }

    /// 返回切换后是否可见
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> bool {
        let visible = !self.is_column_visible(column_id);
        self.set_column_visibility(column_id, visible);
        visible
    }

    /// 总页数；没有行时仍为 1 页
    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self, total_rows: usize) -> bool {
        self.page_index + 1 < self.page_count(total_rows)
    }

    pub fn next_page(&mut self, total_rows: usize) -> bool {
        if self.can_next_page(total_rows) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.can_previous_page() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// 跳转到指定页，超出范围时不变并返回 false
    pub fn set_page_index(&mut self, page_index: usize, total_rows: usize) -> bool {
        if page_index < self.page_count(total_rows) {
            self.page_index = page_index;
            true
        } else {
            false
        }
    }

    /// 行数减少后把页码收回到最后一页
    pub fn clamp_page(&mut self, total_rows: usize) {
        let last = self.page_count(total_rows) - 1;
        if self.page_index > last {
            self.page_index = last;
        }
    }
}
