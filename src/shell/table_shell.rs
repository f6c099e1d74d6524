//! 表格外壳
//!
//! 持有列定义、交互状态和一个查询观察者，把查询状态和表格计算拼成可渲染的内容。

use crate::data::cache::{QueryCache, QueryDescriptor, QueryObserver, QueryState};
use crate::services::request::RequestError;
use crate::table::{
    compute_loading_view, compute_view, ColumnDef, SortDirection, TableState, TableView,
};

/// 外壳当前应显示的内容
#[derive(Debug)]
pub enum ShellContent<'a, R> {
    /// 表格（加载中时主体为占位行）
    Table(TableView<'a, R>),
    /// 查询失败
    Failed(RequestError),
}

/// 某一时刻的查询快照，视图中的行借用自这里
pub struct ShellFrame<R> {
    pub query: QueryState<Vec<R>>,
}

pub struct TableShell<R> {
    columns: Vec<ColumnDef<R>>,
    state: TableState,
    observer: QueryObserver<Vec<R>>,
}

impl<R: Send + Sync + 'static> TableShell<R> {
    pub fn new(
        cache: &QueryCache,
        descriptor: &QueryDescriptor<Vec<R>>,
        columns: Vec<ColumnDef<R>>,
        state: TableState,
    ) -> Self {
        Self {
            columns,
            state,
            observer: cache.observe(descriptor),
        }
    }

    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn frame(&self) -> ShellFrame<R> {
        ShellFrame {
            query: self.observer.state(),
        }
    }

    /// 根据快照计算内容
    pub fn view<'a>(&self, frame: &'a ShellFrame<R>) -> ShellContent<'a, R> {
        if frame.query.is_error() {
            if let Some(error) = frame.query.error.clone() {
                return ShellContent::Failed(error);
            }
        }

        match frame.query.data.as_deref() {
            Some(rows) => ShellContent::Table(compute_view(rows, &self.columns, &self.state)),
            None => ShellContent::Table(compute_loading_view(&self.columns, &self.state)),
        }
    }

    /// 过滤后的行数，加载中为 0
    fn filtered_rows(&self) -> usize {
        let frame = self.frame();
        let total_rows = match self.view(&frame) {
            ShellContent::Table(view) => view.page.total_rows,
            ShellContent::Failed(_) => 0,
        };
        total_rows
    }

    fn column(&self, column_id: &str) -> Option<&ColumnDef<R>> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// 切换排序；列不存在或不可排序时返回 false
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        if !self.column(column_id).is_some_and(ColumnDef::can_sort) {
            return false;
        }
        self.state.toggle_sort(column_id);
        true
    }

    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) -> bool {
        if !self.column(column_id).is_some_and(ColumnDef::can_sort) {
            return false;
        }
        self.state.set_sort(column_id, direction);
        true
    }

    pub fn clear_sort(&mut self) {
        self.state.clear_sort();
    }

    pub fn set_global_filter(&mut self, filter: impl Into<String>) {
        self.state.set_global_filter(filter);
    }

    /// 切换列显示；不可隐藏的列返回 None
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> Option<bool> {
        if !self.column(column_id).is_some_and(ColumnDef::can_hide) {
            return None;
        }
        Some(self.state.toggle_column_visibility(column_id))
    }

    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> bool {
        if !self.column(column_id).is_some_and(ColumnDef::can_hide) {
            return false;
        }
        self.state.set_column_visibility(column_id, visible);
        true
    }

    /// 翻页前先把页码收回到有效范围，数据变少后不会停在空页
    pub fn next_page(&mut self) -> bool {
        let total_rows = self.filtered_rows();
        self.state.clamp_page(total_rows);
        self.state.next_page(total_rows)
    }

    pub fn previous_page(&mut self) -> bool {
        let total_rows = self.filtered_rows();
        self.state.clamp_page(total_rows);
        self.state.previous_page()
    }

    /// 跳转到指定页（从 0 开始），超出范围返回 false
    pub fn set_page(&mut self, page_index: usize) -> bool {
        let total_rows = self.filtered_rows();
        self.state.set_page_index(page_index, total_rows)
    }

    /// 等待下一次查询状态变化
    pub async fn changed(&mut self) -> bool {
        self.observer.changed().await
    }

    /// 等待当前请求结束
    pub async fn settled(&mut self) -> ShellFrame<R> {
        ShellFrame {
            query: self.observer.settled().await,
        }
    }

    pub fn refetch(&self) -> bool {
        self.observer.refetch()
    }
}
