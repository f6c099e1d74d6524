//! 列定义
//!
//! 列通过访问器读取记录；没有访问器的展示列（例如操作列）永远不能排序或参与过滤。

use std::fmt;
use std::sync::Arc;

use super::state::SortDirection;
use super::value::CellValue;

type Accessor<R> = Arc<dyn Fn(&R) -> CellValue + Send + Sync>;
type CellRenderer<R> = Arc<dyn Fn(&R, &CellValue) -> String + Send + Sync>;
type HeaderRenderer = Arc<dyn Fn(HeaderContext) -> String + Send + Sync>;

/// 动态表头可见的上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderContext {
    pub sort: Option<SortDirection>,
}

/// 表头：静态文本或按当前排序方向生成
#[derive(Clone)]
pub enum Header {
    Label(String),
    Dynamic(HeaderRenderer),
}

impl Header {
    pub fn render(&self, context: HeaderContext) -> String {
        match self {
            Header::Label(label) => label.clone(),
            Header::Dynamic(render) => render(context),
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Header::Label(label) => f.debug_tuple("Label").field(label).finish(),
            Header::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

pub struct ColumnDef<R> {
    pub id: String,
    pub header: Header,
    accessor: Option<Accessor<R>>,
    cell: Option<CellRenderer<R>>,
    pub enable_sorting: bool,
    pub enable_hiding: bool,
    pub enable_global_filter: bool,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
            enable_sorting: self.enable_sorting,
            enable_hiding: self.enable_hiding,
            enable_global_filter: self.enable_global_filter,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("has_accessor", &self.accessor.is_some())
            .field("enable_sorting", &self.enable_sorting)
            .field("enable_hiding", &self.enable_hiding)
            .field("enable_global_filter", &self.enable_global_filter)
            .finish()
    }
}

impl<R> ColumnDef<R> {
    /// 数据列：默认可排序、可隐藏、参与全局过滤，表头为 id
    pub fn accessor<F, V>(id: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        let id = id.into();
        Self {
            header: Header::Label(id.clone()),
            id,
            accessor: Some(Arc::new(move |record| accessor(record).into())),
            cell: None,
            enable_sorting: true,
            enable_hiding: true,
            enable_global_filter: true,
        }
    }

    /// 展示列：没有访问器，只能通过 `cell` 渲染
    pub fn display(id: impl Into<String>) -> Self {
        Self {
            header: Header::Label(String::new()),
            id: id.into(),
            accessor: None,
            cell: None,
            enable_sorting: false,
            enable_hiding: false,
            enable_global_filter: false,
        }
    }

    pub fn header(mut self, label: impl Into<String>) -> Self {
        self.header = Header::Label(label.into());
        self
    }

    /// 表头随排序方向变化（例如带箭头的排序按钮）
    pub fn header_fn<F>(mut self, render: F) -> Self
    where
        F: Fn(HeaderContext) -> String + Send + Sync + 'static,
    {
        self.header = Header::Dynamic(Arc::new(render));
        self
    }

    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&R, &CellValue) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(render));
        self
    }

    pub fn sortable(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    pub fn hideable(mut self, enabled: bool) -> Self {
        self.enable_hiding = enabled;
        self
    }

    pub fn filterable(mut self, enabled: bool) -> Self {
        self.enable_global_filter = enabled;
        self
    }

    pub fn has_accessor(&self) -> bool {
        self.accessor.is_some()
    }

    pub fn can_sort(&self) -> bool {
        self.enable_sorting && self.accessor.is_some()
    }

    pub fn can_filter(&self) -> bool {
        self.enable_global_filter && self.accessor.is_some()
    }

    pub fn can_hide(&self) -> bool {
        self.enable_hiding
    }

    pub fn value(&self, record: &R) -> CellValue {
        self.accessor
            .as_ref()
            .map_or(CellValue::Empty, |accessor| accessor(record))
    }

    /// 渲染单元格文本：有自定义渲染用自定义渲染，否则用取值的字符串形式
    pub fn render_cell(&self, record: &R) -> String {
        let value = self.value(record);
        match &self.cell {
            Some(render) => render(record, &value),
            None => value.to_display_string(),
        }
    }
}
