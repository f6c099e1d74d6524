//! 通用表格引擎
//!
//! - `value`: 单元格取值与全序比较
//! - `column`: 列定义（访问器、表头、渲染、能力开关）
//! - `state`: 交互状态（排序、过滤、隐藏列、分页）
//! - `engine`: 纯函数 `compute_view`
//! - `render`: comfy-table 终端渲染

pub mod column;
pub mod engine;
pub mod render;
pub mod state;
pub mod value;

pub use column::{ColumnDef, Header, HeaderContext};
pub use engine::{
    compute_loading_view, compute_view, ColumnToggle, HeaderCell, PageInfo, RowView, TableBody,
    TableView, LOADING_ROW_COUNT, NO_RESULTS_TEXT, PLACEHOLDER_CELL,
};
pub use render::{apply_table_style, render_footer, render_table, render_to_string};
pub use state::{ColumnSort, SortDirection, TableState, DEFAULT_PAGE_SIZE};
pub use value::CellValue;
