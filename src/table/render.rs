//! 终端渲染
//!
//! 把 `TableView` 转成 comfy-table 表格和分页页脚。

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::engine::{PageInfo, TableBody, TableView, NO_RESULTS_TEXT};
use super::state::SortDirection;

/// 终端表格最大宽度
const TABLE_WIDTH: u16 = 120;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH);
}

/// 生成带样式的表格
pub fn render_table<R>(view: &TableView<'_, R>) -> Table {
    let mut table = Table::new();
    table.set_header(view.headers.iter().map(|header| {
        let label = match header.sort {
            Some(SortDirection::Ascending) => format!("{} ↑", header.label),
            Some(SortDirection::Descending) => format!("{} ↓", header.label),
            None => header.label.clone(),
        };
        Cell::new(label).add_attribute(Attribute::Bold)
    }));
    apply_table_style(&mut table);

    match &view.body {
        TableBody::Rows(rows) => {
            for row in rows {
                table.add_row(row.cells.iter().map(Cell::new));
            }
        }
        TableBody::Empty => {
            let mut cells = vec![Cell::new(NO_RESULTS_TEXT).fg(Color::DarkGrey)];
            cells.extend((1..view.headers.len()).map(|_| Cell::new("")));
            table.add_row(cells);
        }
        TableBody::Placeholder(rows) => {
            for row in rows {
                table.add_row(row.iter().map(|cell| Cell::new(cell).fg(Color::DarkGrey)));
            }
        }
    }

    table
}

/// 分页页脚，例如 `Page 1 of 3 · 25 rows · [Next]`
pub fn render_footer(page: &PageInfo) -> String {
    let mut parts = vec![
        format!("Page {} of {}", page.page_index + 1, page.page_count),
        format!("{} rows", page.total_rows),
    ];
    if page.can_previous {
        parts.push("[Previous]".to_string());
    }
    if page.can_next {
        parts.push("[Next]".to_string());
    }
    parts.join(" · ")
}

/// 表格和页脚拼成完整文本
pub fn render_to_string<R>(view: &TableView<'_, R>) -> String {
    format!("{}\n{}", render_table(view), render_footer(&view.page))
}
