//! 表格计算
//!
//! `compute_view` 是纯函数：给定记录、列定义和交互状态，依次执行
//! 全局过滤 -> 排序 -> 分页，并生成可直接渲染的表头和单元格文本。

use super::column::{ColumnDef, HeaderContext};
use super::state::{SortDirection, TableState};
use super::value::CellValue;
use std::cmp::Ordering;

/// 加载占位行数
pub const LOADING_ROW_COUNT: usize = 5;

/// 过滤后没有任何行时显示的文本
pub const NO_RESULTS_TEXT: &str = "No results.";

/// 加载占位单元格
pub const PLACEHOLDER_CELL: &str = "░░░░░░";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub sort: Option<SortDirection>,
    pub can_sort: bool,
}

/// 列显示开关（仅可隐藏的列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub column_id: String,
    pub visible: bool,
}

#[derive(Debug)]
pub struct RowView<'a, R> {
    /// 在原始记录切片中的下标
    pub index: usize,
    pub record: &'a R,
    pub cells: Vec<String>,
}

#[derive(Debug)]
pub enum TableBody<'a, R> {
    Rows(Vec<RowView<'a, R>>),
    /// 没有匹配的行，渲染 `NO_RESULTS_TEXT`
    Empty,
    /// 加载中的占位行
    Placeholder(Vec<Vec<String>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// 过滤后的总行数
    pub total_rows: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

#[derive(Debug)]
pub struct TableView<'a, R> {
    pub headers: Vec<HeaderCell>,
    pub body: TableBody<'a, R>,
    pub page: PageInfo,
    pub column_toggles: Vec<ColumnToggle>,
}

impl<R> TableView<'_, R> {
    /// 当前页的记录
    pub fn records(&self) -> Vec<&R> {
        match &self.body {
            TableBody::Rows(rows) => rows.iter().map(|row| row.record).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, TableBody::Placeholder(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, TableBody::Empty)
    }
}

/// 计算表格视图
pub fn compute_view<'a, R>(
    rows: &'a [R],
    columns: &[ColumnDef<R>],
    state: &TableState,
) -> TableView<'a, R> {
    let filtered = filter_rows(rows, columns, &state.global_filter);
    let sorted = sort_rows(rows, filtered, columns, state);

    let page = page_info(state, sorted.len());
    let start = page.page_index * page.page_size;
    let end = (start + page.page_size).min(sorted.len());

    let visible = visible_columns(columns, state);
    let page_rows: Vec<RowView<'a, R>> = sorted[start.min(end)..end]
        .iter()
        .map(|&index| RowView {
            index,
            record: &rows[index],
            cells: visible.iter().map(|column| column.render_cell(&rows[index])).collect(),
        })
        .collect();

    let body = if page_rows.is_empty() {
        TableBody::Empty
    } else {
        TableBody::Rows(page_rows)
    };

    TableView {
        headers: header_cells(&visible, state),
        body,
        page,
        column_toggles: column_toggles(columns, state),
    }
}

/// 加载中的视图：表头正常，主体为固定数量的占位行
pub fn compute_loading_view<'a, R>(
    columns: &[ColumnDef<R>],
    state: &TableState,
) -> TableView<'a, R> {
    let visible = visible_columns(columns, state);
    let placeholder = vec![vec![PLACEHOLDER_CELL.to_string(); visible.len()]; LOADING_ROW_COUNT];

    TableView {
        headers: header_cells(&visible, state),
        body: TableBody::Placeholder(placeholder),
        page: page_info(state, 0),
        column_toggles: column_toggles(columns, state),
    }
}

/// 全局过滤：任一可过滤列的字符串形式包含过滤文本（忽略大小写）
fn filter_rows<R>(rows: &[R], columns: &[ColumnDef<R>], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..rows.len()).collect();
    }

    let needle = filter.to_lowercase();
    let filterable: Vec<&ColumnDef<R>> = columns.iter().filter(|c| c.can_filter()).collect();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            filterable.iter().any(|column| {
                column
                    .value(row)
                    .to_display_string()
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .map(|(index, _)| index)
        .collect()
}

/// 稳定排序；未知列或不可排序的列被忽略
fn sort_rows<R>(
    rows: &[R],
    indices: Vec<usize>,
    columns: &[ColumnDef<R>],
    state: &TableState,
) -> Vec<usize> {
    let sorters: Vec<(&ColumnDef<R>, SortDirection)> = state
        .sorting
        .iter()
        .filter_map(|sort| {
            columns
                .iter()
                .find(|column| column.id == sort.column_id && column.can_sort())
                .map(|column| (column, sort.direction))
        })
        .collect();

    if sorters.is_empty() {
        return indices;
    }

    let mut keyed: Vec<(usize, Vec<CellValue>)> = indices
        .into_iter()
        .map(|index| {
            let keys = sorters
                .iter()
                .map(|(column, _)| column.value(&rows[index]))
                .collect();
            (index, keys)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        for (position, (_, direction)) in sorters.iter().enumerate() {
            let ordering = a[position].compare(&b[position]);
            let ordering = if direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    keyed.into_iter().map(|(index, _)| index).collect()
}

fn page_info(state: &TableState, total_rows: usize) -> PageInfo {
    let page_count = state.page_count(total_rows);
    let page_index = state.page_index.min(page_count - 1);
    PageInfo {
        page_index,
        page_size: state.page_size(),
        page_count,
        total_rows,
        can_previous: page_index > 0,
        can_next: page_index + 1 < page_count,
    }
}

fn visible_columns<'c, R>(
    columns: &'c [ColumnDef<R>],
    state: &TableState,
) -> Vec<&'c ColumnDef<R>> {
    columns
        .iter()
        .filter(|column| !column.can_hide() || state.is_column_visible(&column.id))
        .collect()
}

fn header_cells<R>(visible: &[&ColumnDef<R>], state: &TableState) -> Vec<HeaderCell> {
    visible
        .iter()
        .map(|column| {
            let sort = if column.can_sort() {
                state.sort_direction(&column.id)
            } else {
                None
            };
            HeaderCell {
                column_id: column.id.clone(),
                label: column.header.render(HeaderContext { sort }),
                sort,
                can_sort: column.can_sort(),
            }
        })
        .collect()
}

fn column_toggles<R>(columns: &[ColumnDef<R>], state: &TableState) -> Vec<ColumnToggle> {
    columns
        .iter()
        .filter(|column| column.can_hide())
        .map(|column| ColumnToggle {
            column_id: column.id.clone(),
            visible: state.is_column_visible(&column.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: i64,
        first: &'static str,
        last: &'static str,
        roll_call: i64,
        status: &'static str,
    }

    fn people() -> Vec<Person> {
        [
            (1, "Ada", "Smith", 301, "Active"),
            (2, "Bo", "Li", 120, "Alumnus"),
            (3, "Cy", "Smithers", 205, "Active"),
            (4, "Di", "Jones", 120, "Co-op"),
            (5, "Ed", "Smith", 99, "Active"),
        ]
        .into_iter()
        .map(|(id, first, last, roll_call, status)| Person {
            id,
            first,
            last,
            roll_call,
            status,
        })
        .collect()
    }

    fn columns() -> Vec<ColumnDef<Person>> {
        vec![
            ColumnDef::accessor("rollCall", |p: &Person| p.roll_call).header("Roll Call"),
            ColumnDef::accessor("firstName", |p: &Person| p.first).header("First Name"),
            ColumnDef::accessor("lastName", |p: &Person| p.last).header("Last Name"),
            ColumnDef::accessor("status", |p: &Person| p.status).header("Status"),
            ColumnDef::display("actions").cell(|p: &Person, _| format!("#{}", p.id)),
        ]
    }

    fn numbered(roll_calls: &[i64]) -> Vec<Person> {
        roll_calls
            .iter()
            .zip(1..)
            .map(|(&roll_call, id)| Person {
                id,
                first: "Row",
                last: "Member",
                roll_call,
                status: "Active",
            })
            .collect()
    }

    fn ids(view: &TableView<'_, Person>) -> Vec<i64> {
        view.records().iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_empty_filter_keeps_all_rows() {
        let rows = people();
        let view = compute_view(&rows, &columns(), &TableState::default());
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
        assert_eq!(view.page.total_rows, 5);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let rows = people();
        let mut state = TableState::default();
        state.set_global_filter("SMITH");
        let view = compute_view(&rows, &columns(), &state);
        assert_eq!(ids(&view), vec![1, 3, 5]);
    }

    #[test]
    fn test_filter_matches_numbers_as_decimal() {
        let rows = people();
        let mut state = TableState::default();
        state.set_global_filter("12");
        let view = compute_view(&rows, &columns(), &state);
        assert_eq!(ids(&view), vec![2, 4]);
    }

    #[test]
    fn test_display_column_is_not_filtered() {
        let rows = people();
        let mut state = TableState::default();
        state.set_global_filter("#3");
        let view = compute_view(&rows, &columns(), &state);
        assert!(view.is_empty());
    }

    #[test]
    fn test_sort_is_stable_and_reversible() {
        let rows = people();
        let cols = columns();
        let mut state = TableState::default();

        state.toggle_sort("rollCall");
        let view = compute_view(&rows, &cols, &state);
        // 2 和 4 的 roll call 相同，保持原有顺序
        assert_eq!(ids(&view), vec![5, 2, 4, 3, 1]);
        assert_eq!(view.headers[0].sort, Some(SortDirection::Ascending));

        state.toggle_sort("rollCall");
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![1, 3, 2, 4, 5]);

        state.toggle_sort("rollCall");
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
        assert_eq!(view.headers[0].sort, None);
    }

    #[test]
    fn test_sort_keeps_input_order_among_many_ties() {
        let rows = numbered(&[50, 10, 50, 30, 50, 50]);
        let cols = columns();
        let mut state = TableState::default();

        state.set_sort("rollCall", SortDirection::Ascending);
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![2, 4, 1, 3, 5, 6]);

        state.set_sort("rollCall", SortDirection::Descending);
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![1, 3, 5, 6, 4, 2]);
    }

    #[test]
    fn test_secondary_sort_breaks_ties() {
        let rows = people();
        let mut state = TableState::default();
        state.set_sort("status", SortDirection::Ascending);
        state.add_sort("rollCall", SortDirection::Ascending);
        let view = compute_view(&rows, &columns(), &state);
        assert_eq!(ids(&view), vec![5, 3, 1, 2, 4]);
    }

    #[test]
    fn test_sort_on_display_column_is_ignored() {
        let rows = people();
        let mut state = TableState::default();
        state.set_sort("actions", SortDirection::Descending);
        let view = compute_view(&rows, &columns(), &state);
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pagination_slices_and_clamps() {
        let rows = people();
        let cols = columns();
        let mut state = TableState::new(2);

        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![1, 2]);
        assert_eq!(view.page.page_count, 3);
        assert!(!view.page.can_previous);
        assert!(view.page.can_next);

        state.page_index = 2;
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![5]);
        assert!(view.page.can_previous);
        assert!(!view.page.can_next);

        state.page_index = 9;
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(view.page.page_index, 2);
        assert_eq!(ids(&view), vec![5]);
    }

    #[test]
    fn test_twelve_rows_in_pages_of_five() {
        let rows = numbered(&[100; 12]);
        let cols = columns();
        let mut state = TableState::new(5);

        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
        assert_eq!(view.page.page_count, 3);
        assert_eq!(view.page.total_rows, 12);

        state.page_index = 2;
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(ids(&view), vec![11, 12]);
        assert!(!view.page.can_next);

        state.page_index = 3;
        let view = compute_view(&rows, &cols, &state);
        assert_eq!(view.page.page_index, 2);
        assert_eq!(ids(&view), vec![11, 12]);
        assert!(view.page.can_previous);
        assert!(!view.page.can_next);
    }

    #[test]
    fn test_pagination_applies_after_filter() {
        let rows = people();
        let mut state = TableState::new(2);
        state.set_global_filter("active");
        state.page_index = 1;
        let view = compute_view(&rows, &columns(), &state);
        assert_eq!(view.page.total_rows, 3);
        assert_eq!(view.page.page_count, 2);
        assert_eq!(ids(&view), vec![5]);
    }

    #[test]
    fn test_hidden_column_still_sorts_and_filters() {
        let rows = people();
        let mut state = TableState::default();
        state.set_column_visibility("lastName", false);
        state.set_global_filter("jones");
        state.set_sort("lastName", SortDirection::Ascending);

        let view = compute_view(&rows, &columns(), &state);
        assert_eq!(ids(&view), vec![4]);
        let header_ids: Vec<&str> = view.headers.iter().map(|h| h.column_id.as_str()).collect();
        assert_eq!(header_ids, vec!["rollCall", "firstName", "status", "actions"]);
        match &view.body {
            TableBody::Rows(rows) => assert_eq!(rows[0].cells, vec!["120", "Di", "Co-op", "#4"]),
            other => panic!("unexpected body: {other:?}"),
        }
        let hidden = view
            .column_toggles
            .iter()
            .find(|t| t.column_id == "lastName")
            .unwrap();
        assert!(!hidden.visible);
        assert!(view.column_toggles.iter().all(|t| t.column_id != "actions"));
    }

    #[test]
    fn test_loading_view_differs_from_empty() {
        let cols = columns();
        let state = TableState::default();

        let loading = compute_loading_view::<Person>(&cols, &state);
        assert!(loading.is_loading());
        match &loading.body {
            TableBody::Placeholder(rows) => {
                assert_eq!(rows.len(), LOADING_ROW_COUNT);
                assert_eq!(rows[0].len(), 5);
            }
            other => panic!("unexpected body: {other:?}"),
        }

        let empty: Vec<Person> = Vec::new();
        let view = compute_view(&empty, &cols, &state);
        assert!(view.is_empty());
        assert!(!view.is_loading());
        assert_eq!(view.page.page_count, 1);
    }
}
